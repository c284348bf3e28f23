//! Input Relay 输入合成
//!
//! 以硬件事件的形式合成键盘与鼠标输入：单键、按键序列、文本、
//! 组合键、点击、滚动和光标移动。

pub mod cursor;
pub mod delay;
pub mod mouse;
pub mod synthesizer;

pub use cursor::CursorControl;
pub use delay::{DelaySettings, DEFAULT_CLICK_MS, DEFAULT_KEY_PRESS_MS, DEFAULT_SCROLL_MS};
pub use mouse::{MouseAction, MouseButton, ScrollDirection, WHEEL_DELTA};
pub use synthesizer::Synthesizer;

use relay_driver::DriverError;
use thiserror::Error;

/// 输入合成错误
#[derive(Error, Debug)]
pub enum SynthesisError {
    #[error("驱动错误: {0}")]
    Driver(#[from] DriverError),

    #[error("当前平台不支持系统光标定位")]
    CursorUnavailable,

    #[error("系统光标操作失败: {0}")]
    CursorFailed(String),
}

pub type Result<T> = std::result::Result<T, SynthesisError>;
