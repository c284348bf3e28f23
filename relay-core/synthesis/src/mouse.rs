//! 鼠标操作

use relay_driver::{MouseState, MouseStroke};
use serde::{Deserialize, Serialize};

/// 滚轮单格滚动量
pub const WHEEL_DELTA: i16 = 120;

/// 鼠标按钮
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Button4,
    Button5,
}

impl MouseButton {
    pub fn down_state(self) -> MouseState {
        match self {
            Self::Left => MouseState::LEFT_BUTTON_DOWN,
            Self::Right => MouseState::RIGHT_BUTTON_DOWN,
            Self::Middle => MouseState::MIDDLE_BUTTON_DOWN,
            Self::Button4 => MouseState::BUTTON4_DOWN,
            Self::Button5 => MouseState::BUTTON5_DOWN,
        }
    }

    pub fn up_state(self) -> MouseState {
        match self {
            Self::Left => MouseState::LEFT_BUTTON_UP,
            Self::Right => MouseState::RIGHT_BUTTON_UP,
            Self::Middle => MouseState::MIDDLE_BUTTON_UP,
            Self::Button4 => MouseState::BUTTON4_UP,
            Self::Button5 => MouseState::BUTTON5_UP,
        }
    }
}

/// 滚动方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollDirection {
    Up,
    Down,
    Left,
    Right,
}

/// 单条鼠标合成动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseAction {
    Press(MouseButton),
    Release(MouseButton),
    Scroll(ScrollDirection),
}

impl MouseAction {
    /// 构造对应的驱动记录
    ///
    /// 滚动使用固定滚动量：上/右为 +120，下/左为 -120。
    /// 其它动作不携带位移。
    pub fn stroke(self) -> MouseStroke {
        match self {
            Self::Press(button) => MouseStroke::button(button.down_state()),
            Self::Release(button) => MouseStroke::button(button.up_state()),
            Self::Scroll(ScrollDirection::Up) => MouseStroke::wheel(MouseState::WHEEL, WHEEL_DELTA),
            Self::Scroll(ScrollDirection::Down) => {
                MouseStroke::wheel(MouseState::WHEEL, -WHEEL_DELTA)
            }
            Self::Scroll(ScrollDirection::Left) => {
                MouseStroke::wheel(MouseState::HWHEEL, -WHEEL_DELTA)
            }
            Self::Scroll(ScrollDirection::Right) => {
                MouseStroke::wheel(MouseState::HWHEEL, WHEEL_DELTA)
            }
        }
    }
}

impl From<ScrollDirection> for MouseAction {
    fn from(direction: ScrollDirection) -> Self {
        Self::Scroll(direction)
    }
}
