//! 观察者通知与裁决

use relay_codec::KeyCode;
use relay_driver::{DeviceId, KeyState, KeyStroke, MouseStroke};

/// 观察者对一个事件的裁决
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict<T> {
    /// 原样转发（或沿用前面观察者的改写）
    Forward,
    /// 以改写后的记录转发
    Replace(T),
    /// 丢弃事件，不再转发
    Suppress,
}

/// 键盘事件通知
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardNotification {
    /// 产生事件的设备
    pub device: DeviceId,
    /// 当前记录（已包含前面观察者的改写）
    pub stroke: KeyStroke,
    /// 解析出的字符，不可打印的按键为 None
    pub character: Option<char>,
    /// 设备硬件 ID
    pub hardware_id: String,
    /// 事件发生时 Caps Lock 是否开启
    pub caps_lock: bool,
    /// 事件发生前 Shift 是否按住
    pub shift: bool,
}

impl KeyboardNotification {
    pub fn key(&self) -> KeyCode {
        self.stroke.code
    }

    pub fn state(&self) -> KeyState {
        self.stroke.state
    }

    pub fn is_down(&self) -> bool {
        self.stroke.state.is_down()
    }
}

/// 鼠标事件通知
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MouseNotification {
    /// 产生事件的设备
    pub device: DeviceId,
    /// 当前记录（已包含前面观察者的改写）
    pub stroke: MouseStroke,
}
