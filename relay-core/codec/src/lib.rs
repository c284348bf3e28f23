//! Input Relay 键码编解码
//!
//! 纯函数、无状态的双向映射：
//! - 字符 → (扫描码, 是否需要 Shift)，用于文本合成
//! - 扫描码 → 字符（结合 Caps Lock 与 Shift 状态），用于入站事件的字符解析
//!
//! 两个方向共享同一张 US 布局映射表，保证可打印字符的往返一致性。

pub mod keycode;
pub mod layout;

pub use keycode::KeyCode;
pub use layout::{char_to_key, key_to_char, plan_text, supported_chars, KeyMapping, KeyPress, FALLBACK};
