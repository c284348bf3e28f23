//! 平台能力
//!
//! Windows 上查询 Caps Lock 状态并直接定位系统光标；其它平台
//! Caps Lock 始终视为关闭，系统光标不可用。

use std::sync::Arc;

use relay_pump::LockKeyState;
use relay_synthesis::CursorControl;

#[cfg(target_os = "windows")]
mod imp {
    use relay_pump::LockKeyState;
    use relay_synthesis::{CursorControl, Result, SynthesisError};
    use windows::Win32::Foundation::POINT;
    use windows::Win32::UI::Input::KeyboardAndMouse::{GetKeyState, VK_CAPITAL};
    use windows::Win32::UI::WindowsAndMessaging::{GetCursorPos, SetCursorPos};

    /// 系统 Caps Lock 状态（每次调用实时查询）
    #[derive(Debug, Default)]
    pub struct SystemLockState;

    impl LockKeyState for SystemLockState {
        fn caps_lock(&self) -> bool {
            // 低位为切换状态
            let state = unsafe { GetKeyState(VK_CAPITAL.0 as i32) };
            state & 1 != 0
        }
    }

    /// 系统光标
    #[derive(Debug, Default)]
    pub struct SystemCursor;

    impl CursorControl for SystemCursor {
        fn position(&self) -> Result<(i32, i32)> {
            let mut point = POINT::default();
            unsafe { GetCursorPos(&mut point) }
                .map_err(|e| SynthesisError::CursorFailed(e.to_string()))?;
            Ok((point.x, point.y))
        }

        fn set_position(&self, x: i32, y: i32) -> Result<()> {
            unsafe { SetCursorPos(x, y) }.map_err(|e| SynthesisError::CursorFailed(e.to_string()))
        }
    }
}

#[cfg(target_os = "windows")]
pub use imp::{SystemCursor, SystemLockState};

/// 当前平台的 Caps Lock 查询
pub fn lock_state() -> Arc<dyn LockKeyState> {
    #[cfg(target_os = "windows")]
    {
        Arc::new(SystemLockState)
    }

    #[cfg(not(target_os = "windows"))]
    {
        tracing::warn!("当前平台无法查询 Caps Lock，视为关闭");
        Arc::new(relay_pump::CapsLockOff)
    }
}

/// 当前平台的系统光标
pub fn cursor() -> Option<Arc<dyn CursorControl>> {
    #[cfg(target_os = "windows")]
    {
        Some(Arc::new(SystemCursor))
    }

    #[cfg(not(target_os = "windows"))]
    {
        tracing::warn!("当前平台不支持系统光标定位");
        None
    }
}
