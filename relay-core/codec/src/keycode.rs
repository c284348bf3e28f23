//! 键盘扫描码定义
//!
//! 使用 PC AT 扫描码集 1（与拦截驱动传输的 `code` 字段一致）。
//! 扩展键（方向键、右侧修饰键等）与主键区共用同一扫描码，
//! 区别在于按键状态中的 E0 标志。

use serde::{Deserialize, Serialize};

/// 键盘扫描码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyCode(pub u16);

impl KeyCode {
    // 功能键
    pub const ESCAPE: KeyCode = KeyCode(0x01);
    pub const BACKSPACE: KeyCode = KeyCode(0x0E);
    pub const TAB: KeyCode = KeyCode(0x0F);
    pub const ENTER: KeyCode = KeyCode(0x1C);
    pub const SPACE: KeyCode = KeyCode(0x39);
    pub const CAPS_LOCK: KeyCode = KeyCode(0x3A);
    pub const NUM_LOCK: KeyCode = KeyCode(0x45);
    pub const SCROLL_LOCK: KeyCode = KeyCode(0x46);

    // 修饰键
    pub const LEFT_CTRL: KeyCode = KeyCode(0x1D);
    pub const LEFT_SHIFT: KeyCode = KeyCode(0x2A);
    pub const RIGHT_SHIFT: KeyCode = KeyCode(0x36);
    pub const LEFT_ALT: KeyCode = KeyCode(0x38);
    pub const LEFT_WIN: KeyCode = KeyCode(0x5B);
    pub const RIGHT_WIN: KeyCode = KeyCode(0x5C);

    // 数字行
    pub const D1: KeyCode = KeyCode(0x02);
    pub const D2: KeyCode = KeyCode(0x03);
    pub const D3: KeyCode = KeyCode(0x04);
    pub const D4: KeyCode = KeyCode(0x05);
    pub const D5: KeyCode = KeyCode(0x06);
    pub const D6: KeyCode = KeyCode(0x07);
    pub const D7: KeyCode = KeyCode(0x08);
    pub const D8: KeyCode = KeyCode(0x09);
    pub const D9: KeyCode = KeyCode(0x0A);
    pub const D0: KeyCode = KeyCode(0x0B);
    pub const MINUS: KeyCode = KeyCode(0x0C);
    pub const EQUALS: KeyCode = KeyCode(0x0D);

    // 字母
    pub const Q: KeyCode = KeyCode(0x10);
    pub const W: KeyCode = KeyCode(0x11);
    pub const E: KeyCode = KeyCode(0x12);
    pub const R: KeyCode = KeyCode(0x13);
    pub const T: KeyCode = KeyCode(0x14);
    pub const Y: KeyCode = KeyCode(0x15);
    pub const U: KeyCode = KeyCode(0x16);
    pub const I: KeyCode = KeyCode(0x17);
    pub const O: KeyCode = KeyCode(0x18);
    pub const P: KeyCode = KeyCode(0x19);
    pub const A: KeyCode = KeyCode(0x1E);
    pub const S: KeyCode = KeyCode(0x1F);
    pub const D: KeyCode = KeyCode(0x20);
    pub const F: KeyCode = KeyCode(0x21);
    pub const G: KeyCode = KeyCode(0x22);
    pub const H: KeyCode = KeyCode(0x23);
    pub const J: KeyCode = KeyCode(0x24);
    pub const K: KeyCode = KeyCode(0x25);
    pub const L: KeyCode = KeyCode(0x26);
    pub const Z: KeyCode = KeyCode(0x2C);
    pub const X: KeyCode = KeyCode(0x2D);
    pub const C: KeyCode = KeyCode(0x2E);
    pub const V: KeyCode = KeyCode(0x2F);
    pub const B: KeyCode = KeyCode(0x30);
    pub const N: KeyCode = KeyCode(0x31);
    pub const M: KeyCode = KeyCode(0x32);

    // 标点
    pub const OPEN_BRACKET: KeyCode = KeyCode(0x1A);
    pub const CLOSE_BRACKET: KeyCode = KeyCode(0x1B);
    pub const SEMICOLON: KeyCode = KeyCode(0x27);
    pub const APOSTROPHE: KeyCode = KeyCode(0x28);
    pub const TILDE: KeyCode = KeyCode(0x29);
    pub const BACKSLASH: KeyCode = KeyCode(0x2B);
    pub const COMMA: KeyCode = KeyCode(0x33);
    pub const DOT: KeyCode = KeyCode(0x34);
    pub const SLASH: KeyCode = KeyCode(0x35);

    // F 键
    pub const F1: KeyCode = KeyCode(0x3B);
    pub const F2: KeyCode = KeyCode(0x3C);
    pub const F3: KeyCode = KeyCode(0x3D);
    pub const F4: KeyCode = KeyCode(0x3E);
    pub const F5: KeyCode = KeyCode(0x3F);
    pub const F6: KeyCode = KeyCode(0x40);
    pub const F7: KeyCode = KeyCode(0x41);
    pub const F8: KeyCode = KeyCode(0x42);
    pub const F9: KeyCode = KeyCode(0x43);
    pub const F10: KeyCode = KeyCode(0x44);
    pub const F11: KeyCode = KeyCode(0x57);
    pub const F12: KeyCode = KeyCode(0x58);

    // 导航键（发送时需带 E0 标志）
    pub const HOME: KeyCode = KeyCode(0x47);
    pub const UP: KeyCode = KeyCode(0x48);
    pub const PAGE_UP: KeyCode = KeyCode(0x49);
    pub const LEFT: KeyCode = KeyCode(0x4B);
    pub const RIGHT: KeyCode = KeyCode(0x4D);
    pub const END: KeyCode = KeyCode(0x4F);
    pub const DOWN: KeyCode = KeyCode(0x50);
    pub const PAGE_DOWN: KeyCode = KeyCode(0x51);
    pub const INSERT: KeyCode = KeyCode(0x52);
    pub const DELETE: KeyCode = KeyCode(0x53);

    /// 原始扫描码
    pub fn raw(self) -> u16 {
        self.0
    }

    /// 是否为 Shift 键（左或右）
    pub fn is_shift(self) -> bool {
        self == Self::LEFT_SHIFT || self == Self::RIGHT_SHIFT
    }

    /// 按键名称（用于日志和诊断输出）
    pub fn name(self) -> Option<&'static str> {
        let name = match self {
            Self::ESCAPE => "ESC",
            Self::BACKSPACE => "BACKSPACE",
            Self::TAB => "TAB",
            Self::ENTER => "ENTER",
            Self::SPACE => "SPACE",
            Self::CAPS_LOCK => "CAPSLOCK",
            Self::NUM_LOCK => "NUMLOCK",
            Self::SCROLL_LOCK => "SCROLLLOCK",
            Self::LEFT_CTRL => "CTRL",
            Self::LEFT_SHIFT => "LSHIFT",
            Self::RIGHT_SHIFT => "RSHIFT",
            Self::LEFT_ALT => "ALT",
            Self::LEFT_WIN => "LWIN",
            Self::RIGHT_WIN => "RWIN",
            Self::HOME => "HOME",
            Self::UP => "UP",
            Self::PAGE_UP => "PAGEUP",
            Self::LEFT => "LEFT",
            Self::RIGHT => "RIGHT",
            Self::END => "END",
            Self::DOWN => "DOWN",
            Self::PAGE_DOWN => "PAGEDOWN",
            Self::INSERT => "INSERT",
            Self::DELETE => "DELETE",
            Self::F1 => "F1",
            Self::F2 => "F2",
            Self::F3 => "F3",
            Self::F4 => "F4",
            Self::F5 => "F5",
            Self::F6 => "F6",
            Self::F7 => "F7",
            Self::F8 => "F8",
            Self::F9 => "F9",
            Self::F10 => "F10",
            Self::F11 => "F11",
            Self::F12 => "F12",
            _ => return crate::layout::glyph_name(self),
        };
        Some(name)
    }
}

impl From<u16> for KeyCode {
    fn from(raw: u16) -> Self {
        KeyCode(raw)
    }
}

impl std::fmt::Display for KeyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} (0x{:02X})", name, self.0),
            None => write!(f, "0x{:02X}", self.0),
        }
    }
}
