//! 脚本化的模拟驱动
//!
//! 按脚本顺序投递入站事件或通道故障，记录所有发送、过滤设置和上下文
//! 创建/销毁次数。`wait` 在脚本为空时阻塞，上下文销毁后立即返回，
//! 因此可以在真实的泵线程上端到端地验证卸载流程。

use std::collections::{HashMap, VecDeque};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::{ContextHandle, DeviceClass, DeviceId, DriverBinding, Stroke};

/// 脚本项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scripted {
    /// 设备产生一条事件
    Stroke(DeviceId, Stroke),
    /// 设备就绪但接收失败（通道故障）
    Fault(DeviceId),
}

impl Scripted {
    fn device(&self) -> DeviceId {
        match self {
            Self::Stroke(device, _) | Self::Fault(device) => *device,
        }
    }
}

#[derive(Default)]
struct MockState {
    next_handle: usize,
    live: Option<ContextHandle>,
    fail_create: bool,
    script: VecDeque<Scripted>,
    sent: Vec<(DeviceId, Stroke)>,
    filters: Vec<(DeviceClass, u16)>,
    created: usize,
    destroyed: usize,
    hardware_ids: HashMap<DeviceId, Vec<u8>>,
}

/// 模拟驱动
#[derive(Default)]
pub struct MockDriver {
    state: Mutex<MockState>,
    changed: Condvar,
}

impl MockDriver {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn update(&self, f: impl FnOnce(&mut MockState)) {
        f(&mut self.state());
        self.changed.notify_all();
    }

    /// 让后续的 `create_context` 失败
    pub fn fail_create(&self, fail: bool) {
        self.update(|s| s.fail_create = fail);
    }

    /// 追加一条入站事件
    pub fn push_stroke(&self, device: DeviceId, stroke: impl Into<Stroke>) {
        let stroke = stroke.into();
        self.update(|s| s.script.push_back(Scripted::Stroke(device, stroke)));
    }

    /// 追加一次通道故障
    pub fn push_fault(&self, device: DeviceId) {
        self.update(|s| s.script.push_back(Scripted::Fault(device)));
    }

    /// 设置设备的原始硬件 ID 字节
    pub fn set_hardware_id(&self, device: DeviceId, bytes: &[u8]) {
        let bytes = bytes.to_vec();
        self.update(|s| {
            s.hardware_ids.insert(device, bytes);
        });
    }

    /// 已发送的全部事件
    pub fn sent(&self) -> Vec<(DeviceId, Stroke)> {
        self.state().sent.clone()
    }

    /// 已设置的过滤（按调用顺序）
    pub fn filters(&self) -> Vec<(DeviceClass, u16)> {
        self.state().filters.clone()
    }

    pub fn created_count(&self) -> usize {
        self.state().created
    }

    pub fn destroyed_count(&self) -> usize {
        self.state().destroyed
    }

    /// 当前存活的句柄
    pub fn live_handle(&self) -> Option<ContextHandle> {
        self.state().live
    }

    fn wait_until(&self, timeout: Duration, mut done: impl FnMut(&MockState) -> bool) -> bool {
        let deadline = Instant::now() + timeout;
        let mut state = self.state();

        while !done(&state) {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            state = match self.changed.wait_timeout(state, deadline - now) {
                Ok((guard, _)) => guard,
                Err(poisoned) => poisoned.into_inner().0,
            };
        }

        true
    }

    /// 等待至少 `count` 条发送记录（超时返回当前记录）
    pub fn wait_for_sent(&self, count: usize, timeout: Duration) -> Vec<(DeviceId, Stroke)> {
        self.wait_until(timeout, |s| s.sent.len() >= count);
        self.sent()
    }

    /// 等待销毁次数达到 `count`
    pub fn wait_for_destroyed(&self, count: usize, timeout: Duration) -> bool {
        self.wait_until(timeout, |s| s.destroyed >= count)
    }
}

impl DriverBinding for MockDriver {
    fn create_context(&self) -> Option<ContextHandle> {
        let mut state = self.state();
        if state.fail_create {
            return None;
        }

        state.next_handle += 1;
        let handle = ContextHandle::from_raw(state.next_handle);
        state.live = handle;
        state.created += 1;
        drop(state);

        self.changed.notify_all();
        handle
    }

    fn destroy_context(&self, context: ContextHandle) {
        self.update(|s| {
            if s.live == Some(context) {
                s.live = None;
            }
            s.destroyed += 1;
        });
    }

    fn set_filter(&self, _context: ContextHandle, class: DeviceClass, mask: u16) {
        self.update(|s| s.filters.push((class, mask)));
    }

    fn wait(&self, context: ContextHandle) -> DeviceId {
        let mut state = self.state();

        loop {
            if state.live != Some(context) {
                return DeviceId(0);
            }
            if let Some(item) = state.script.front() {
                return item.device();
            }
            state = self
                .changed
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    fn receive(&self, context: ContextHandle, _device: DeviceId, strokes: &mut [Stroke]) -> i32 {
        let mut state = self.state();
        if state.live != Some(context) || strokes.is_empty() {
            return 0;
        }

        let received = match state.script.pop_front() {
            Some(Scripted::Stroke(_, stroke)) => {
                strokes[0] = stroke;
                1
            }
            Some(Scripted::Fault(_)) | None => 0,
        };
        drop(state);

        self.changed.notify_all();
        received
    }

    fn send(&self, _context: ContextHandle, device: DeviceId, strokes: &[Stroke]) -> i32 {
        self.update(|s| s.sent.extend(strokes.iter().map(|stroke| (device, *stroke))));
        strokes.len() as i32
    }

    fn hardware_id(&self, _context: ContextHandle, device: DeviceId, buffer: &mut [u8]) -> usize {
        let state = self.state();
        let Some(bytes) = state.hardware_ids.get(&device) else {
            return 0;
        };

        let length = bytes.len().min(buffer.len());
        buffer[..length].copy_from_slice(&bytes[..length]);
        length
    }
}
