//! 过滤模式
//!
//! 过滤模式决定驱动向泵投递哪些事件子类型。必须在泵启动前设置，
//! 否则不会捕获到任何事件。

use serde::{Deserialize, Serialize};

/// 设备类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceClass {
    Keyboard,
    Mouse,
}

/// 键盘过滤模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyboardFilter {
    /// 不拦截
    #[default]
    None,
    /// 拦截全部
    All,
    KeyDown,
    KeyUp,
    KeyE0,
    KeyE1,
    TermsrvSetLed,
    TermsrvShadow,
    TermsrvVkPacket,
}

impl KeyboardFilter {
    /// 驱动使用的过滤掩码
    pub fn mask(self) -> u16 {
        match self {
            Self::None => 0x0000,
            Self::All => 0xFFFF,
            Self::KeyDown => 0x0001,
            Self::KeyUp => 0x0002,
            Self::KeyE0 => 0x0004,
            Self::KeyE1 => 0x0008,
            Self::TermsrvSetLed => 0x0010,
            Self::TermsrvShadow => 0x0020,
            Self::TermsrvVkPacket => 0x0040,
        }
    }
}

/// 鼠标过滤模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseFilter {
    /// 不拦截
    #[default]
    None,
    /// 拦截全部
    All,
    LeftButtonDown,
    LeftButtonUp,
    RightButtonDown,
    RightButtonUp,
    MiddleButtonDown,
    MiddleButtonUp,
    Button4Down,
    Button4Up,
    Button5Down,
    Button5Up,
    Wheel,
    Hwheel,
    Move,
}

impl MouseFilter {
    /// 驱动使用的过滤掩码
    pub fn mask(self) -> u16 {
        match self {
            Self::None => 0x0000,
            Self::All => 0xFFFF,
            Self::LeftButtonDown => 0x0001,
            Self::LeftButtonUp => 0x0002,
            Self::RightButtonDown => 0x0004,
            Self::RightButtonUp => 0x0008,
            Self::MiddleButtonDown => 0x0010,
            Self::MiddleButtonUp => 0x0020,
            Self::Button4Down => 0x0040,
            Self::Button4Up => 0x0080,
            Self::Button5Down => 0x0100,
            Self::Button5Up => 0x0200,
            Self::Wheel => 0x0400,
            Self::Hwheel => 0x0800,
            Self::Move => 0x1000,
        }
    }
}

/// 一次加载周期使用的过滤配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default)]
    pub keyboard: KeyboardFilter,
    #[serde(default)]
    pub mouse: MouseFilter,
}

impl FilterConfig {
    pub fn new(keyboard: KeyboardFilter, mouse: MouseFilter) -> Self {
        Self { keyboard, mouse }
    }

    /// 是否什么都不拦截
    pub fn is_empty(&self) -> bool {
        self.keyboard == KeyboardFilter::None && self.mouse == MouseFilter::None
    }
}
