//! 合成事件之间的延迟
//!
//! 延迟随时可改，在每次发送时读取。

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// 默认按键延迟（毫秒）
pub const DEFAULT_KEY_PRESS_MS: u64 = 1;
/// 默认点击延迟（毫秒）
pub const DEFAULT_CLICK_MS: u64 = 1;
/// 默认滚轮延迟（毫秒）
pub const DEFAULT_SCROLL_MS: u64 = 15;

/// 延迟设置
#[derive(Debug)]
pub struct DelaySettings {
    key_press_ms: AtomicU64,
    click_ms: AtomicU64,
    scroll_ms: AtomicU64,
}

impl DelaySettings {
    pub fn new(key_press_ms: u64, click_ms: u64, scroll_ms: u64) -> Self {
        Self {
            key_press_ms: AtomicU64::new(key_press_ms),
            click_ms: AtomicU64::new(click_ms),
            scroll_ms: AtomicU64::new(scroll_ms),
        }
    }

    /// 全部为零（测试或批量回放使用）
    pub fn none() -> Self {
        Self::new(0, 0, 0)
    }

    pub fn key_press(&self) -> Duration {
        Duration::from_millis(self.key_press_ms.load(Ordering::Relaxed))
    }

    pub fn click(&self) -> Duration {
        Duration::from_millis(self.click_ms.load(Ordering::Relaxed))
    }

    pub fn scroll(&self) -> Duration {
        Duration::from_millis(self.scroll_ms.load(Ordering::Relaxed))
    }

    pub fn set_key_press_ms(&self, ms: u64) {
        self.key_press_ms.store(ms, Ordering::Relaxed);
    }

    pub fn set_click_ms(&self, ms: u64) {
        self.click_ms.store(ms, Ordering::Relaxed);
    }

    pub fn set_scroll_ms(&self, ms: u64) {
        self.scroll_ms.store(ms, Ordering::Relaxed);
    }
}

impl Default for DelaySettings {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_PRESS_MS, DEFAULT_CLICK_MS, DEFAULT_SCROLL_MS)
    }
}

pub(crate) fn pause(duration: Duration) {
    if !duration.is_zero() {
        std::thread::sleep(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_delays() {
        let delays = DelaySettings::default();
        assert_eq!(delays.key_press(), Duration::from_millis(1));
        assert_eq!(delays.click(), Duration::from_millis(1));
        assert_eq!(delays.scroll(), Duration::from_millis(15));
    }

    #[test]
    fn test_update_delays() {
        let delays = DelaySettings::none();
        delays.set_scroll_ms(40);
        assert_eq!(delays.scroll(), Duration::from_millis(40));
        assert!(delays.key_press().is_zero());
    }
}
