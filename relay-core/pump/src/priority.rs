//! 泵线程优先级

#[cfg(target_os = "windows")]
pub(crate) fn raise_current_thread() {
    use tracing::{debug, warn};
    use windows::Win32::System::Threading::{
        GetCurrentThread, SetThreadPriority, THREAD_PRIORITY_HIGHEST,
    };

    // SAFETY: GetCurrentThread 返回伪句柄，无需关闭
    match unsafe { SetThreadPriority(GetCurrentThread(), THREAD_PRIORITY_HIGHEST) } {
        Ok(()) => debug!("泵线程优先级已提升为 HIGHEST"),
        Err(e) => warn!("提升泵线程优先级失败: {}", e),
    }
}

#[cfg(not(target_os = "windows"))]
pub(crate) fn raise_current_thread() {
    tracing::debug!("当前平台不支持调整线程优先级，保持默认");
}
