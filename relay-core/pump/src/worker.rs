//! 单个事件的处理流程
//!
//! 泵线程循环调用 [`PumpWorker::step`]：阻塞等待设备、读取一条记录、
//! 交给观察者裁决、按裁决转发或丢弃。

use std::sync::Arc;
use tracing::{debug, trace, warn};

use relay_codec::key_to_char;
use relay_driver::{
    ContextHandle, DeviceContext, DeviceId, DriverError, KeyStroke, MouseStroke, Stroke,
};

use crate::observer::dispatch;
use crate::{
    KeyboardNotification, KeyboardObserver, LockKeyState, MouseNotification, MouseObserver,
    ObserverList, PumpFault, PumpStats, ShiftTracker,
};

/// 事件处理器（运行在泵线程上）
pub struct PumpWorker {
    context: Arc<DeviceContext>,
    handle: ContextHandle,
    keyboard: Arc<ObserverList<dyn KeyboardObserver>>,
    mouse: Arc<ObserverList<dyn MouseObserver>>,
    lock_state: Arc<dyn LockKeyState>,
    stats: Arc<PumpStats>,
    shift: ShiftTracker,
    hardware_id_buffer: usize,
}

impl PumpWorker {
    pub fn new(
        context: Arc<DeviceContext>,
        handle: ContextHandle,
        keyboard: Arc<ObserverList<dyn KeyboardObserver>>,
        mouse: Arc<ObserverList<dyn MouseObserver>>,
        lock_state: Arc<dyn LockKeyState>,
        stats: Arc<PumpStats>,
        hardware_id_buffer: usize,
    ) -> Self {
        Self {
            context,
            handle,
            keyboard,
            mouse,
            lock_state,
            stats,
            shift: ShiftTracker::new(),
            hardware_id_buffer,
        }
    }

    /// 当前 Shift 跟踪状态
    pub fn shift_pressed(&self) -> bool {
        self.shift.is_pressed()
    }

    /// 处理一个事件
    ///
    /// 阻塞直到有设备就绪。驱动接收失败时返回 [`PumpFault`]，
    /// 由调用方区分是卸载引起的中断还是真正的通道故障。
    pub fn step(&mut self) -> Result<(), PumpFault> {
        let binding = Arc::clone(self.context.binding());

        let device = binding.wait(self.handle);
        let mut strokes = [Stroke::default()];
        let received = binding.receive(self.handle, device, &mut strokes);
        if received <= 0 {
            return Err(PumpFault::new(device, received));
        }

        self.stats.record_received();
        trace!("收到事件: device={} {:?}", device, strokes[0]);

        let outcome = match strokes[0] {
            Stroke::Keyboard(stroke) => self.on_keyboard(device, stroke).map(Stroke::from),
            Stroke::Mouse(stroke) => self.on_mouse(device, stroke).map(Stroke::from),
        };

        match outcome {
            Some(stroke) => self.forward(device, stroke),
            None => {
                self.stats.record_suppressed();
                trace!("事件已丢弃: device={}", device);
            }
        }

        Ok(())
    }

    fn forward(&self, device: DeviceId, stroke: Stroke) {
        match self.context.send_on(self.handle, device, stroke) {
            Ok(()) => self.stats.record_forwarded(),
            // 观察者回调内卸载（或卸载后重新加载）了事件泵
            Err(DriverError::ContextNotOpen) => {
                debug!("本次会话已结束，放弃转发: device={}", device)
            }
            Err(e) => warn!("转发事件失败: {}", e),
        }
    }

    fn on_keyboard(&mut self, device: DeviceId, stroke: KeyStroke) -> Option<KeyStroke> {
        let shift = self.shift.is_pressed();
        let observers = self.keyboard.snapshot();

        let outcome = if observers.is_empty() {
            Some(stroke)
        } else {
            let hardware_id = self
                .context
                .hardware_id(device, self.hardware_id_buffer)
                .unwrap_or_default();
            let caps_lock = self.lock_state.caps_lock();

            let mut notification = KeyboardNotification {
                device,
                stroke,
                character: key_to_char(stroke.code, caps_lock, shift),
                hardware_id,
                caps_lock,
                shift,
            };

            dispatch(&mut notification, &observers, |o, n| o.on_keyboard(n))
        };

        // 字符按事件发生前的 Shift 状态解析，之后再更新跟踪状态
        self.shift.observe(&stroke);
        outcome
    }

    fn on_mouse(&self, device: DeviceId, stroke: MouseStroke) -> Option<MouseStroke> {
        let observers = self.mouse.snapshot();
        if observers.is_empty() {
            return Some(stroke);
        }

        let mut notification = MouseNotification { device, stroke };
        dispatch(&mut notification, &observers, |o, n| o.on_mouse(n))
    }
}

impl std::fmt::Debug for PumpWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PumpWorker")
            .field("handle", &self.handle)
            .field("shift", &self.shift)
            .finish()
    }
}
