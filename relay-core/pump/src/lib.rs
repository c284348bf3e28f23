//! Input Relay 事件泵
//!
//! 在专用线程上拦截驱动投递的键盘/鼠标事件，按注册顺序通知观察者，
//! 根据观察者的裁决转发（可能已改写）或丢弃事件。

pub mod modifiers;
pub mod notification;
pub mod observer;
pub mod pump;
pub mod stats;
pub mod worker;

mod priority;

pub use modifiers::{CapsLockOff, LockKeyState, ShiftTracker};
pub use notification::{KeyboardNotification, MouseNotification, Verdict};
pub use observer::{KeyboardObserver, MouseObserver, ObserverId, ObserverList};
pub use pump::{EventPump, PumpState};
pub use stats::{PumpFault, PumpStats, PumpStatsSnapshot};
pub use worker::PumpWorker;

use relay_driver::DriverError;
use thiserror::Error;

/// 事件泵错误
#[derive(Error, Debug)]
pub enum PumpError {
    #[error("事件泵已加载")]
    AlreadyLoaded,

    #[error("无法创建驱动上下文: {0}")]
    ContextCreation(DriverError),

    #[error("驱动错误: {0}")]
    Driver(#[from] DriverError),

    #[error("启动泵线程失败: {0}")]
    ThreadSpawn(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PumpError>;
