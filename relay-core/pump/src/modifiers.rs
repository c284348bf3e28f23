//! 修饰键与锁定键状态

use relay_driver::KeyStroke;

/// 锁定键状态查询
///
/// Caps Lock 由操作系统维护，泵在每次键盘事件时查询一次。
pub trait LockKeyState: Send + Sync {
    fn caps_lock(&self) -> bool;
}

impl<F> LockKeyState for F
where
    F: Fn() -> bool + Send + Sync,
{
    fn caps_lock(&self) -> bool {
        self()
    }
}

/// 始终报告 Caps Lock 关闭
#[derive(Debug, Clone, Copy, Default)]
pub struct CapsLockOff;

impl LockKeyState for CapsLockOff {
    fn caps_lock(&self) -> bool {
        false
    }
}

/// Shift 键跟踪
///
/// 只记录一个布尔值：任一 Shift 键按下置位，任一 Shift 键释放清零。
/// 同时按住左右 Shift 再松开其中一个时会误判为未按下。
#[derive(Debug, Clone, Copy, Default)]
pub struct ShiftTracker {
    pressed: bool,
}

impl ShiftTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// 根据原始键盘记录更新状态
    pub fn observe(&mut self, stroke: &KeyStroke) {
        if stroke.code.is_shift() {
            self.pressed = stroke.state.is_down();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_codec::KeyCode;
    use relay_driver::KeyState;

    #[test]
    fn test_shift_tracker() {
        let mut tracker = ShiftTracker::new();
        assert!(!tracker.is_pressed());

        tracker.observe(&KeyStroke::down(KeyCode::LEFT_SHIFT));
        assert!(tracker.is_pressed());

        tracker.observe(&KeyStroke::down(KeyCode::A));
        assert!(tracker.is_pressed());

        tracker.observe(&KeyStroke::new(KeyCode::RIGHT_SHIFT, KeyState::UP | KeyState::E0));
        assert!(!tracker.is_pressed());
    }

    #[test]
    fn test_lock_state_closure() {
        let on = || true;
        assert!(on.caps_lock());
        assert!(!CapsLockOff.caps_lock());
    }
}
