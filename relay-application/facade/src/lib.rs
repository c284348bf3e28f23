//! Input Relay
//!
//! 通过内核级拦截驱动截获键盘与鼠标的原始硬件事件，交给应用代码检查、
//! 改写或丢弃后再注入回系统；同时以硬件事件的形式合成键盘与鼠标输入。
//!
//! ```text
//! InputRelay
//!   ├── EventPump     (专用线程：等待 → 接收 → 观察者裁决 → 转发)
//!   ├── Synthesizer   (调用方线程：按键 / 文本 / 点击 / 滚动 / 移动)
//!   └── DeviceContext (共享驱动会话，发送串行化)
//! ```

pub mod config;
pub mod platform;
pub mod relay;

pub use config::{DelayConfig, DeviceConfig, RelayConfig};
pub use relay::{InputRelay, InputRelayBuilder};

pub use relay_codec::{char_to_key, key_to_char, plan_text, KeyCode, KeyMapping, KeyPress};
pub use relay_driver::{
    decode_hardware_id, DeviceId, DriverBinding, DriverError, FilterConfig, KeyState, KeyStroke,
    KeyboardFilter, MouseFilter, MouseFlags, MouseState, MouseStroke, Stroke,
};
pub use relay_pump::{
    CapsLockOff, KeyboardNotification, LockKeyState, MouseNotification, ObserverId, PumpError,
    PumpFault, PumpState, PumpStatsSnapshot, Verdict,
};
pub use relay_synthesis::{
    CursorControl, DelaySettings, MouseAction, MouseButton, ScrollDirection, SynthesisError,
};

use thiserror::Error;

/// Input Relay 错误
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Input Relay 未加载")]
    NotLoaded,

    #[error("事件泵错误: {0}")]
    Pump(#[from] PumpError),

    #[error("输入合成错误: {0}")]
    Synthesis(#[from] SynthesisError),

    #[error("驱动错误: {0}")]
    Driver(#[from] DriverError),

    #[error("配置错误: {0}")]
    Config(String),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("解析配置失败: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("序列化配置失败: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, RelayError>;
