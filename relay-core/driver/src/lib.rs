//! Input Relay 驱动绑定层
//!
//! 定义核心依赖的拦截驱动协议（创建/销毁会话、过滤、阻塞等待、接收、
//! 发送、硬件 ID 查询），驱动传输的原始事件记录，以及在泵线程与调用方
//! 线程之间共享的设备上下文。

pub mod binding;
pub mod context;
pub mod filter;
pub mod hardware_id;
pub mod stroke;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use binding::{ContextHandle, DriverBinding};
pub use context::DeviceContext;
pub use filter::{DeviceClass, FilterConfig, KeyboardFilter, MouseFilter};
pub use hardware_id::{decode_hardware_id, DEFAULT_HARDWARE_ID_BUFFER};
pub use stroke::{DeviceId, KeyState, KeyStroke, MouseFlags, MouseState, MouseStroke, Stroke};

pub use relay_codec::KeyCode;

use thiserror::Error;

/// 驱动层错误
#[derive(Error, Debug)]
pub enum DriverError {
    #[error("驱动上下文创建失败（驱动未安装或无权限）")]
    ContextUnavailable,

    #[error("驱动上下文未打开")]
    ContextNotOpen,

    #[error("向设备 {0} 发送事件失败")]
    SendFailed(DeviceId),
}

pub type Result<T> = std::result::Result<T, DriverError>;
