//! US 键盘布局映射表
//!
//! 表中每一项描述一个物理按键在未按 Shift 与按下 Shift 时产生的字符。
//! 字符 → 按键的查找按表顺序进行，先匹配未按 Shift 的字符，再匹配按下
//! Shift 的字符，第一个命中的条目生效。

use crate::KeyCode;

/// 单个按键的字符映射
#[derive(Debug, Clone, Copy)]
struct KeyEntry {
    key: KeyCode,
    normal: char,
    shifted: char,
    name: &'static str,
}

const fn entry(key: KeyCode, normal: char, shifted: char, name: &'static str) -> KeyEntry {
    KeyEntry {
        key,
        normal,
        shifted,
        name,
    }
}

/// 映射表（顺序敏感）
static LAYOUT: &[KeyEntry] = &[
    // 数字行
    entry(KeyCode::D1, '1', '!', "1"),
    entry(KeyCode::D2, '2', '@', "2"),
    entry(KeyCode::D3, '3', '#', "3"),
    entry(KeyCode::D4, '4', '$', "4"),
    entry(KeyCode::D5, '5', '%', "5"),
    entry(KeyCode::D6, '6', '^', "6"),
    entry(KeyCode::D7, '7', '&', "7"),
    entry(KeyCode::D8, '8', '*', "8"),
    entry(KeyCode::D9, '9', '(', "9"),
    entry(KeyCode::D0, '0', ')', "0"),
    entry(KeyCode::MINUS, '-', '_', "-"),
    entry(KeyCode::EQUALS, '=', '+', "="),
    // 第一行字母
    entry(KeyCode::Q, 'q', 'Q', "Q"),
    entry(KeyCode::W, 'w', 'W', "W"),
    entry(KeyCode::E, 'e', 'E', "E"),
    entry(KeyCode::R, 'r', 'R', "R"),
    entry(KeyCode::T, 't', 'T', "T"),
    entry(KeyCode::Y, 'y', 'Y', "Y"),
    entry(KeyCode::U, 'u', 'U', "U"),
    entry(KeyCode::I, 'i', 'I', "I"),
    entry(KeyCode::O, 'o', 'O', "O"),
    entry(KeyCode::P, 'p', 'P', "P"),
    entry(KeyCode::OPEN_BRACKET, '[', '{', "["),
    entry(KeyCode::CLOSE_BRACKET, ']', '}', "]"),
    entry(KeyCode::BACKSLASH, '\\', '|', "\\"),
    // 第二行字母
    entry(KeyCode::A, 'a', 'A', "A"),
    entry(KeyCode::S, 's', 'S', "S"),
    entry(KeyCode::D, 'd', 'D', "D"),
    entry(KeyCode::F, 'f', 'F', "F"),
    entry(KeyCode::G, 'g', 'G', "G"),
    entry(KeyCode::H, 'h', 'H', "H"),
    entry(KeyCode::J, 'j', 'J', "J"),
    entry(KeyCode::K, 'k', 'K', "K"),
    entry(KeyCode::L, 'l', 'L', "L"),
    entry(KeyCode::SEMICOLON, ';', ':', ";"),
    entry(KeyCode::APOSTROPHE, '\'', '"', "'"),
    entry(KeyCode::TILDE, '`', '~', "`"),
    // 第三行字母
    entry(KeyCode::Z, 'z', 'Z', "Z"),
    entry(KeyCode::X, 'x', 'X', "X"),
    entry(KeyCode::C, 'c', 'C', "C"),
    entry(KeyCode::V, 'v', 'V', "V"),
    entry(KeyCode::B, 'b', 'B', "B"),
    entry(KeyCode::N, 'n', 'N', "N"),
    entry(KeyCode::M, 'm', 'M', "M"),
    entry(KeyCode::COMMA, ',', '<', ","),
    entry(KeyCode::DOT, '.', '>', "."),
    entry(KeyCode::SLASH, '/', '?', "/"),
    // 空白字符
    entry(KeyCode::SPACE, ' ', ' ', "SPACE"),
    entry(KeyCode::ENTER, '\n', '\n', "ENTER"),
    entry(KeyCode::TAB, '\t', '\t', "TAB"),
];

/// 无法映射的字符使用的默认按键：`?`（Slash + Shift）
pub const FALLBACK: KeyMapping = KeyMapping {
    key: KeyCode::SLASH,
    shift: true,
    fallback: true,
};

/// 字符 → 按键映射结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyMapping {
    /// 需要按下的按键
    pub key: KeyCode,
    /// 是否需要同时按住 Shift
    pub shift: bool,
    /// 是否为回退映射（字符不在映射表中）
    pub fallback: bool,
}

impl KeyMapping {
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }
}

/// 将字符映射为按键
///
/// 映射表之外的字符不会报错，而是回退为 [`FALLBACK`]（输入 `?`），
/// 调用方可以通过 [`KeyMapping::is_fallback`] 判断是否发生了回退。
pub fn char_to_key(ch: char) -> KeyMapping {
    if let Some(e) = LAYOUT.iter().find(|e| e.normal == ch) {
        return KeyMapping {
            key: e.key,
            shift: false,
            fallback: false,
        };
    }

    if let Some(e) = LAYOUT.iter().find(|e| e.shifted == ch) {
        return KeyMapping {
            key: e.key,
            shift: true,
            fallback: false,
        };
    }

    FALLBACK
}

/// 将按键映射为字符
///
/// 字母键的大小写由 `caps_lock XOR shift` 决定，数字和符号键只看 Shift。
/// 功能键、导航键、修饰键等没有字符，返回 `None`。
pub fn key_to_char(key: KeyCode, caps_lock: bool, shift: bool) -> Option<char> {
    let e = LAYOUT.iter().find(|e| e.key == key)?;

    let use_shifted = if e.normal.is_ascii_lowercase() {
        caps_lock ^ shift
    } else {
        shift
    };

    Some(if use_shifted { e.shifted } else { e.normal })
}

/// 映射表覆盖的全部字符（未按 Shift 的在前）
pub fn supported_chars() -> impl Iterator<Item = char> {
    LAYOUT
        .iter()
        .map(|e| e.normal)
        .chain(LAYOUT.iter().filter(|e| e.shifted != e.normal).map(|e| e.shifted))
}

pub(crate) fn glyph_name(key: KeyCode) -> Option<&'static str> {
    LAYOUT.iter().find(|e| e.key == key).map(|e| e.name)
}

/// 单次按键操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    /// 扫描码
    pub key: KeyCode,
    /// 按下（true）或释放（false）
    pub press: bool,
}

impl KeyPress {
    pub fn press(key: KeyCode) -> Self {
        Self { key, press: true }
    }

    pub fn release(key: KeyCode) -> Self {
        Self { key, press: false }
    }

    /// 完整的按键操作（按下并释放）
    pub fn full(key: KeyCode) -> [Self; 2] {
        [Self::press(key), Self::release(key)]
    }
}

/// 将文本展开为有序的按键序列
///
/// 需要 Shift 的字符被包裹在左 Shift 的按下/释放之间，每个字符单独包裹。
pub fn plan_text(text: &str) -> Vec<KeyPress> {
    let mut plan = Vec::with_capacity(text.len() * 2);

    for ch in text.chars() {
        let mapping = char_to_key(ch);

        if mapping.shift {
            plan.push(KeyPress::press(KeyCode::LEFT_SHIFT));
        }

        plan.extend(KeyPress::full(mapping.key));

        if mapping.shift {
            plan.push(KeyPress::release(KeyCode::LEFT_SHIFT));
        }
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_to_key() {
        assert_eq!(char_to_key('a').key, KeyCode::A);
        assert!(!char_to_key('a').shift);
        assert_eq!(char_to_key('A').key, KeyCode::A);
        assert!(char_to_key('A').shift);
        assert_eq!(char_to_key('!').key, KeyCode::D1);
        assert!(char_to_key('!').shift);
        assert_eq!(char_to_key(' ').key, KeyCode::SPACE);
        assert_eq!(char_to_key('\n').key, KeyCode::ENTER);
    }

    #[test]
    fn test_unsupported_character_falls_back() {
        let mapping = char_to_key('中');
        assert_eq!(mapping, FALLBACK);
        assert!(mapping.is_fallback());
        assert_eq!(key_to_char(mapping.key, false, mapping.shift), Some('?'));
    }

    #[test]
    fn test_question_mark_is_not_fallback() {
        let mapping = char_to_key('?');
        assert_eq!(mapping.key, KeyCode::SLASH);
        assert!(mapping.shift);
        assert!(!mapping.is_fallback());
    }

    #[test]
    fn test_key_to_char_non_printable() {
        assert_eq!(key_to_char(KeyCode::F1, false, false), None);
        assert_eq!(key_to_char(KeyCode::LEFT_SHIFT, false, true), None);
        assert_eq!(key_to_char(KeyCode::HOME, true, true), None);
    }

    #[test]
    fn test_caps_lock_does_not_affect_symbols() {
        assert_eq!(key_to_char(KeyCode::D1, true, false), Some('1'));
        assert_eq!(key_to_char(KeyCode::D1, true, true), Some('!'));
        assert_eq!(key_to_char(KeyCode::SEMICOLON, true, false), Some(';'));
    }

    #[test]
    fn test_plan_text() {
        let plan = plan_text("aB");
        assert_eq!(
            plan,
            vec![
                KeyPress::press(KeyCode::A),
                KeyPress::release(KeyCode::A),
                KeyPress::press(KeyCode::LEFT_SHIFT),
                KeyPress::press(KeyCode::B),
                KeyPress::release(KeyCode::B),
                KeyPress::release(KeyCode::LEFT_SHIFT),
            ]
        );
    }
}
