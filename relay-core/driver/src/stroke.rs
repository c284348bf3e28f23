//! 原始事件记录
//!
//! 与拦截驱动传输的记录结构一一对应，泵和合成接口直接构造/消费这些类型。

use relay_codec::KeyCode;
use serde::{Deserialize, Serialize};

/// 设备标识
///
/// 约定：1..=10 为键盘，11..=20 为鼠标。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(pub u16);

impl DeviceId {
    pub const MAX_KEYBOARD: u16 = 10;
    pub const MAX_MOUSE: u16 = 10;

    /// 合成键盘事件使用的默认设备
    pub const DEFAULT_KEYBOARD: DeviceId = DeviceId(1);
    /// 合成鼠标事件使用的默认设备
    pub const DEFAULT_MOUSE: DeviceId = DeviceId(Self::MAX_KEYBOARD + 1);

    /// 第 `index` 个键盘设备（从 0 开始），超出范围返回 `None`
    pub fn keyboard(index: u16) -> Option<Self> {
        (index < Self::MAX_KEYBOARD).then(|| DeviceId(index + 1))
    }

    /// 第 `index` 个鼠标设备（从 0 开始），超出范围返回 `None`
    pub fn mouse(index: u16) -> Option<Self> {
        (index < Self::MAX_MOUSE).then(|| DeviceId(Self::MAX_KEYBOARD + index + 1))
    }

    pub fn is_keyboard(self) -> bool {
        (1..=Self::MAX_KEYBOARD).contains(&self.0)
    }

    pub fn is_mouse(self) -> bool {
        (Self::MAX_KEYBOARD + 1..=Self::MAX_KEYBOARD + Self::MAX_MOUSE).contains(&self.0)
    }
}

impl std::fmt::Display for DeviceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 键盘按键状态标志
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyState(pub u16);

impl KeyState {
    pub const DOWN: KeyState = KeyState(0x00);
    pub const UP: KeyState = KeyState(0x01);
    pub const E0: KeyState = KeyState(0x02);
    pub const E1: KeyState = KeyState(0x04);
    pub const TERMSRV_SET_LED: KeyState = KeyState(0x08);
    pub const TERMSRV_SHADOW: KeyState = KeyState(0x10);
    pub const TERMSRV_VK_PACKET: KeyState = KeyState(0x20);

    pub fn bits(self) -> u16 {
        self.0
    }

    pub fn contains(self, other: KeyState) -> bool {
        self.0 & other.0 == other.0
    }

    /// 按下（不含 UP 标志）
    pub fn is_down(self) -> bool {
        !self.is_up()
    }

    pub fn is_up(self) -> bool {
        self.contains(Self::UP)
    }

    /// 是否为扩展键（E0 前缀）
    pub fn is_extended(self) -> bool {
        self.contains(Self::E0)
    }
}

impl std::ops::BitOr for KeyState {
    type Output = KeyState;

    fn bitor(self, rhs: KeyState) -> KeyState {
        KeyState(self.0 | rhs.0)
    }
}

/// 鼠标按钮状态标志
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MouseState(pub u16);

impl MouseState {
    pub const NONE: MouseState = MouseState(0x000);
    pub const LEFT_BUTTON_DOWN: MouseState = MouseState(0x001);
    pub const LEFT_BUTTON_UP: MouseState = MouseState(0x002);
    pub const RIGHT_BUTTON_DOWN: MouseState = MouseState(0x004);
    pub const RIGHT_BUTTON_UP: MouseState = MouseState(0x008);
    pub const MIDDLE_BUTTON_DOWN: MouseState = MouseState(0x010);
    pub const MIDDLE_BUTTON_UP: MouseState = MouseState(0x020);
    pub const BUTTON4_DOWN: MouseState = MouseState(0x040);
    pub const BUTTON4_UP: MouseState = MouseState(0x080);
    pub const BUTTON5_DOWN: MouseState = MouseState(0x100);
    pub const BUTTON5_UP: MouseState = MouseState(0x200);
    pub const WHEEL: MouseState = MouseState(0x400);
    pub const HWHEEL: MouseState = MouseState(0x800);

    pub fn bits(self) -> u16 {
        self.0
    }

    pub fn contains(self, other: MouseState) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_wheel(self) -> bool {
        self.contains(Self::WHEEL) || self.contains(Self::HWHEEL)
    }
}

impl std::ops::BitOr for MouseState {
    type Output = MouseState;

    fn bitor(self, rhs: MouseState) -> MouseState {
        MouseState(self.0 | rhs.0)
    }
}

/// 鼠标移动标志
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MouseFlags(pub u16);

impl MouseFlags {
    pub const MOVE_RELATIVE: MouseFlags = MouseFlags(0x000);
    pub const MOVE_ABSOLUTE: MouseFlags = MouseFlags(0x001);
    pub const VIRTUAL_DESKTOP: MouseFlags = MouseFlags(0x002);
    pub const ATTRIBUTES_CHANGED: MouseFlags = MouseFlags(0x004);
    pub const MOVE_NOCOALESCE: MouseFlags = MouseFlags(0x008);
    pub const TERMSRV_SRC_SHADOW: MouseFlags = MouseFlags(0x100);

    pub fn bits(self) -> u16 {
        self.0
    }

    pub fn contains(self, other: MouseFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_absolute(self) -> bool {
        self.contains(Self::MOVE_ABSOLUTE)
    }
}

impl std::ops::BitOr for MouseFlags {
    type Output = MouseFlags;

    fn bitor(self, rhs: MouseFlags) -> MouseFlags {
        MouseFlags(self.0 | rhs.0)
    }
}

/// 键盘事件记录
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeyStroke {
    /// 扫描码
    pub code: KeyCode,
    /// 按键状态
    pub state: KeyState,
    /// 驱动附加信息
    pub information: u32,
}

impl KeyStroke {
    pub fn new(code: KeyCode, state: KeyState) -> Self {
        Self {
            code,
            state,
            information: 0,
        }
    }

    pub fn down(code: KeyCode) -> Self {
        Self::new(code, KeyState::DOWN)
    }

    pub fn up(code: KeyCode) -> Self {
        Self::new(code, KeyState::UP)
    }
}

/// 鼠标事件记录
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MouseStroke {
    /// 按钮状态
    pub state: MouseState,
    /// 移动标志（相对/绝对等）
    pub flags: MouseFlags,
    /// 滚轮滚动量
    pub rolling: i16,
    pub x: i32,
    pub y: i32,
    /// 驱动附加信息
    pub information: u32,
}

impl MouseStroke {
    /// 仅携带按钮状态的记录（无位移）
    pub fn button(state: MouseState) -> Self {
        Self {
            state,
            ..Default::default()
        }
    }

    /// 滚轮记录
    pub fn wheel(state: MouseState, rolling: i16) -> Self {
        Self {
            state,
            rolling,
            ..Default::default()
        }
    }

    /// 移动记录
    pub fn motion(x: i32, y: i32, flags: MouseFlags) -> Self {
        Self {
            flags,
            x,
            y,
            ..Default::default()
        }
    }
}

/// 驱动传输的事件记录（键盘或鼠标）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Stroke {
    Keyboard(KeyStroke),
    Mouse(MouseStroke),
}

impl Default for Stroke {
    fn default() -> Self {
        Stroke::Keyboard(KeyStroke::default())
    }
}

impl From<KeyStroke> for Stroke {
    fn from(stroke: KeyStroke) -> Self {
        Stroke::Keyboard(stroke)
    }
}

impl From<MouseStroke> for Stroke {
    fn from(stroke: MouseStroke) -> Self {
        Stroke::Mouse(stroke)
    }
}
