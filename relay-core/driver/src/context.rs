//! 共享设备上下文
//!
//! 封装驱动会话句柄：泵线程与调用方线程共享同一个上下文，
//! 所有 `send` 在句柄锁内串行执行；`close` 同样需要拿到句柄锁，
//! 因此不会与正在进行的发送交错。

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, trace};

use crate::{decode_hardware_id, ContextHandle, DeviceClass, DeviceId, DriverBinding, DriverError, Result, Stroke};

/// 设备上下文
pub struct DeviceContext {
    /// 驱动绑定
    binding: Arc<dyn DriverBinding>,
    /// 当前会话句柄（未打开时为 None）
    handle: Mutex<Option<ContextHandle>>,
}

impl DeviceContext {
    /// 创建未打开的设备上下文
    pub fn new(binding: Arc<dyn DriverBinding>) -> Self {
        Self {
            binding,
            handle: Mutex::new(None),
        }
    }

    /// 获取驱动绑定
    pub fn binding(&self) -> &Arc<dyn DriverBinding> {
        &self.binding
    }

    fn slot(&self) -> MutexGuard<'_, Option<ContextHandle>> {
        self.handle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 打开驱动会话（已打开时直接返回现有句柄）
    pub fn open(&self) -> Result<ContextHandle> {
        let mut slot = self.slot();
        if let Some(handle) = *slot {
            debug!("驱动上下文已打开: {:?}", handle);
            return Ok(handle);
        }

        let handle = self
            .binding
            .create_context()
            .ok_or(DriverError::ContextUnavailable)?;

        *slot = Some(handle);
        info!("驱动上下文已创建: {:?}", handle);
        Ok(handle)
    }

    /// 关闭驱动会话
    ///
    /// 句柄只会被销毁一次：返回 `true` 表示本次调用完成了销毁。
    pub fn close(&self) -> bool {
        let mut slot = self.slot();
        match slot.take() {
            Some(handle) => {
                self.binding.destroy_context(handle);
                info!("驱动上下文已销毁: {:?}", handle);
                true
            }
            None => false,
        }
    }

    /// 当前句柄
    pub fn handle(&self) -> Option<ContextHandle> {
        *self.slot()
    }

    pub fn is_open(&self) -> bool {
        self.slot().is_some()
    }

    /// 设置某类设备的过滤掩码
    pub fn set_filter(&self, class: DeviceClass, mask: u16) -> Result<()> {
        let slot = self.slot();
        let handle = (*slot).ok_or(DriverError::ContextNotOpen)?;

        self.binding.set_filter(handle, class, mask);
        debug!("设置过滤: {:?} mask=0x{:04X}", class, mask);
        Ok(())
    }

    /// 向设备发送一条事件记录
    pub fn send(&self, device: DeviceId, stroke: impl Into<Stroke>) -> Result<()> {
        let slot = self.slot();
        let handle = (*slot).ok_or(DriverError::ContextNotOpen)?;
        self.send_locked(handle, device, stroke.into())
    }

    /// 仅在 `handle` 仍是当前会话时发送
    ///
    /// 会话已关闭或已被重新打开时返回 [`DriverError::ContextNotOpen`]。
    pub fn send_on(
        &self,
        handle: ContextHandle,
        device: DeviceId,
        stroke: impl Into<Stroke>,
    ) -> Result<()> {
        let slot = self.slot();
        if *slot != Some(handle) {
            return Err(DriverError::ContextNotOpen);
        }
        self.send_locked(handle, device, stroke.into())
    }

    fn send_locked(&self, handle: ContextHandle, device: DeviceId, stroke: Stroke) -> Result<()> {
        let sent = self.binding.send(handle, device, &[stroke]);
        if sent <= 0 {
            return Err(DriverError::SendFailed(device));
        }

        trace!("发送事件: device={} {:?}", device, stroke);
        Ok(())
    }

    /// 查询并解码设备硬件 ID
    pub fn hardware_id(&self, device: DeviceId, buffer_size: usize) -> Result<String> {
        let handle = self.handle().ok_or(DriverError::ContextNotOpen)?;

        let mut buffer = vec![0u8; buffer_size];
        let length = self.binding.hardware_id(handle, device, &mut buffer);
        let length = length.min(buffer.len());

        Ok(decode_hardware_id(&buffer[..length]))
    }
}

impl std::fmt::Debug for DeviceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceContext")
            .field("handle", &self.handle())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockDriver;
    use crate::{KeyCode, KeyStroke};

    fn context() -> (Arc<MockDriver>, DeviceContext) {
        let driver = Arc::new(MockDriver::new());
        let context = DeviceContext::new(driver.clone());
        (driver, context)
    }

    #[test]
    fn test_open_and_close() {
        let (driver, context) = context();

        assert!(!context.is_open());
        let handle = context.open().unwrap();
        assert_eq!(context.handle(), Some(handle));
        assert_eq!(context.open().unwrap(), handle);
        assert_eq!(driver.created_count(), 1);

        assert!(context.close());
        assert!(!context.close());
        assert_eq!(driver.destroyed_count(), 1);
        assert!(!context.is_open());
    }

    #[test]
    fn test_open_failure() {
        let (driver, context) = context();
        driver.fail_create(true);

        assert!(matches!(context.open(), Err(DriverError::ContextUnavailable)));
        assert!(!context.is_open());
    }

    #[test]
    fn test_send_requires_open_context() {
        let (driver, context) = context();
        let stroke = KeyStroke::down(KeyCode::A);

        assert!(matches!(
            context.send(DeviceId::DEFAULT_KEYBOARD, stroke),
            Err(DriverError::ContextNotOpen)
        ));

        context.open().unwrap();
        context.send(DeviceId::DEFAULT_KEYBOARD, stroke).unwrap();

        assert_eq!(
            driver.sent(),
            vec![(DeviceId::DEFAULT_KEYBOARD, Stroke::Keyboard(stroke))]
        );
    }

    #[test]
    fn test_send_on_rejects_stale_session() {
        let (driver, context) = context();
        let stroke = KeyStroke::down(KeyCode::X);

        let first = context.open().unwrap();
        context.send_on(first, DeviceId::DEFAULT_KEYBOARD, stroke).unwrap();

        context.close();
        let second = context.open().unwrap();
        assert_ne!(first, second);
        assert_eq!(driver.live_handle(), Some(second));

        assert!(matches!(
            context.send_on(first, DeviceId::DEFAULT_KEYBOARD, stroke),
            Err(DriverError::ContextNotOpen)
        ));
        assert_eq!(driver.sent().len(), 1);
    }

    #[test]
    fn test_set_filter() {
        let (driver, context) = context();
        assert!(context.set_filter(DeviceClass::Keyboard, 0xFFFF).is_err());

        context.open().unwrap();
        context.set_filter(DeviceClass::Keyboard, 0xFFFF).unwrap();
        assert_eq!(driver.filters(), vec![(DeviceClass::Keyboard, 0xFFFF)]);
    }

    #[test]
    fn test_hardware_id_query() {
        let (driver, context) = context();
        driver.set_hardware_id(DeviceId(1), &[0x41, 0, 0, 0, 0x42, 0]);
        context.open().unwrap();

        assert_eq!(context.hardware_id(DeviceId(1), 500).unwrap(), "A; B");
        assert_eq!(context.hardware_id(DeviceId(1), 2).unwrap(), "A");
        assert_eq!(context.hardware_id(DeviceId(2), 500).unwrap(), "");
    }
}
