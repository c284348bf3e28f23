//! 驱动绑定接口
//!
//! 拦截驱动本身是外部协作方，这里只定义核心依赖的类型化协议。
//! 所有方法都是同步的；`wait` 与 `receive` 会无限期阻塞，直到有设备事件
//! 就绪，或者上下文被销毁（此时必须返回失败值）。

use crate::{DeviceClass, DeviceId, Stroke};

/// 驱动会话句柄（不透明）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextHandle(usize);

impl ContextHandle {
    /// 由原生句柄构造，空句柄返回 `None`
    pub fn from_raw(raw: usize) -> Option<Self> {
        if raw == 0 {
            None
        } else {
            Some(Self(raw))
        }
    }

    pub fn as_raw(self) -> usize {
        self.0
    }
}

/// 驱动绑定 trait
///
/// 实现必须容忍以下并发：泵线程阻塞在 `wait`/`receive` 中时，其他线程调用
/// `destroy_context`，阻塞调用随即返回失败值。`send` 的并发由
/// [`DeviceContext`](crate::DeviceContext) 串行化，实现无需自行加锁。
pub trait DriverBinding: Send + Sync {
    /// 创建驱动会话，失败返回 `None`
    fn create_context(&self) -> Option<ContextHandle>;

    /// 销毁驱动会话
    fn destroy_context(&self, context: ContextHandle);

    /// 为某一类设备设置过滤掩码
    fn set_filter(&self, context: ContextHandle, class: DeviceClass, mask: u16);

    /// 阻塞等待下一个有待处理事件的设备
    fn wait(&self, context: ContextHandle) -> DeviceId;

    /// 从设备接收事件，返回接收到的记录数，`<= 0` 表示通道故障
    fn receive(&self, context: ContextHandle, device: DeviceId, strokes: &mut [Stroke]) -> i32;

    /// 向设备发送事件，返回发送成功的记录数
    fn send(&self, context: ContextHandle, device: DeviceId, strokes: &[Stroke]) -> i32;

    /// 查询设备的硬件 ID，写入 `buffer` 并返回字节长度
    fn hardware_id(&self, context: ContextHandle, device: DeviceId, buffer: &mut [u8]) -> usize;

    fn is_keyboard(&self, device: DeviceId) -> bool {
        device.is_keyboard()
    }

    fn is_mouse(&self, device: DeviceId) -> bool {
        device.is_mouse()
    }
}

impl DeviceClass {
    /// 判断设备所属类别
    pub fn of(binding: &dyn DriverBinding, device: DeviceId) -> Option<Self> {
        if binding.is_keyboard(device) {
            Some(Self::Keyboard)
        } else if binding.is_mouse(device) {
            Some(Self::Mouse)
        } else {
            None
        }
    }
}
