//! 输入合成
//!
//! 构造驱动记录并通过共享设备上下文发送，与事件泵是否运行无关。
//! 所有发送都要求上下文已打开，否则返回 `ContextNotOpen`。

use std::sync::Arc;
use tracing::{debug, trace};

use relay_codec::{plan_text, KeyCode};
use relay_driver::{DeviceContext, DeviceId, KeyState, KeyStroke, MouseFlags, MouseStroke};

use crate::delay::pause;
use crate::{
    CursorControl, DelaySettings, MouseAction, MouseButton, Result, ScrollDirection,
    SynthesisError,
};

/// 输入合成器
pub struct Synthesizer {
    context: Arc<DeviceContext>,
    delays: Arc<DelaySettings>,
    /// 合成键盘事件使用的设备
    keyboard: DeviceId,
    /// 合成鼠标事件使用的设备
    mouse: DeviceId,
    /// 操作系统光标（不经过驱动的移动）
    cursor: Option<Arc<dyn CursorControl>>,
}

impl Synthesizer {
    pub fn new(context: Arc<DeviceContext>, delays: Arc<DelaySettings>) -> Self {
        Self {
            context,
            delays,
            keyboard: DeviceId::DEFAULT_KEYBOARD,
            mouse: DeviceId::DEFAULT_MOUSE,
            cursor: None,
        }
    }

    /// 指定合成事件使用的设备
    pub fn with_devices(mut self, keyboard: DeviceId, mouse: DeviceId) -> Self {
        self.keyboard = keyboard;
        self.mouse = mouse;
        self
    }

    pub fn with_cursor(mut self, cursor: Arc<dyn CursorControl>) -> Self {
        self.cursor = Some(cursor);
        self
    }

    pub fn delays(&self) -> &Arc<DelaySettings> {
        &self.delays
    }

    pub fn keyboard_device(&self) -> DeviceId {
        self.keyboard
    }

    pub fn mouse_device(&self) -> DeviceId {
        self.mouse
    }

    // ========================================================================
    // 键盘操作
    // ========================================================================

    /// 发送单条键盘事件，之后等待按键延迟
    pub fn send_key(&self, code: KeyCode, state: KeyState) -> Result<()> {
        self.context.send(self.keyboard, KeyStroke::new(code, state))?;
        trace!("合成按键: {} state=0x{:X}", code, state.bits());

        pause(self.delays.key_press());
        Ok(())
    }

    /// 发送完整的按键操作（按下 + 释放）
    pub fn tap_key(&self, code: KeyCode) -> Result<()> {
        self.send_key(code, KeyState::DOWN)?;
        self.send_key(code, KeyState::UP)
    }

    /// 依次敲击一组按键
    pub fn send_keys(&self, codes: &[KeyCode]) -> Result<()> {
        for &code in codes {
            self.tap_key(code)?;
        }
        Ok(())
    }

    /// 发送文本
    ///
    /// 需要 Shift 的字符逐个包裹在左 Shift 的按下/释放之间；
    /// 无法映射的字符按 `?` 输入。
    pub fn send_text(&self, text: &str) -> Result<()> {
        debug!("合成文本: {} 个字符", text.chars().count());

        for press in plan_text(text) {
            let state = if press.press { KeyState::DOWN } else { KeyState::UP };
            self.send_key(press.key, state)?;
        }
        Ok(())
    }

    /// 发送组合键：按顺序按下修饰键，敲击按键，再逆序释放修饰键
    pub fn send_key_combination(&self, modifiers: &[KeyCode], key: KeyCode) -> Result<()> {
        for &modifier in modifiers {
            self.send_key(modifier, KeyState::DOWN)?;
        }

        self.tap_key(key)?;

        for &modifier in modifiers.iter().rev() {
            self.send_key(modifier, KeyState::UP)?;
        }
        Ok(())
    }

    // ========================================================================
    // 鼠标操作
    // ========================================================================

    /// 发送单条鼠标事件
    pub fn send_mouse_event(&self, action: MouseAction) -> Result<()> {
        let stroke = action.stroke();
        self.context.send(self.mouse, stroke)?;
        trace!("合成鼠标事件: {:?}", action);
        Ok(())
    }

    /// 点击（按下 + 释放），两者之间等待点击延迟
    pub fn click(&self, button: MouseButton) -> Result<()> {
        self.send_mouse_event(MouseAction::Press(button))?;
        pause(self.delays.click());
        self.send_mouse_event(MouseAction::Release(button))
    }

    pub fn left_click(&self) -> Result<()> {
        self.click(MouseButton::Left)
    }

    pub fn right_click(&self) -> Result<()> {
        self.click(MouseButton::Right)
    }

    pub fn middle_click(&self) -> Result<()> {
        self.click(MouseButton::Middle)
    }

    /// 滚动一格，之后等待滚轮延迟
    pub fn scroll(&self, direction: ScrollDirection) -> Result<()> {
        self.send_mouse_event(direction.into())?;
        pause(self.delays.scroll());
        Ok(())
    }

    /// 相对移动光标
    ///
    /// 经过驱动时按原样发送相对位移（精度不可靠）；否则读取系统光标
    /// 位置后偏移，调用方的 `dy` 向上为正，因此屏幕坐标中取反。
    pub fn move_mouse_by(&self, dx: i32, dy: i32, use_driver: bool) -> Result<()> {
        if use_driver {
            self.context
                .send(self.mouse, MouseStroke::motion(dx, dy, MouseFlags::MOVE_RELATIVE))?;
            trace!("驱动相对移动: ({}, {})", dx, dy);
            return Ok(());
        }

        let cursor = self.cursor()?;
        let (x, y) = cursor.position()?;
        let (target_x, target_y) = (x.saturating_add(dx), y.saturating_sub(dy));
        cursor.set_position(target_x, target_y)?;
        trace!("系统光标相对移动: ({}, {}) -> ({}, {})", x, y, target_x, target_y);
        Ok(())
    }

    /// 移动光标到绝对位置
    ///
    /// 经过驱动时坐标使用驱动的绝对坐标空间（0..=65535 归一化）。
    pub fn move_mouse_to(&self, x: i32, y: i32, use_driver: bool) -> Result<()> {
        if use_driver {
            self.context
                .send(self.mouse, MouseStroke::motion(x, y, MouseFlags::MOVE_ABSOLUTE))?;
            trace!("驱动绝对移动: ({}, {})", x, y);
            return Ok(());
        }

        self.cursor()?.set_position(x, y)?;
        trace!("系统光标移动到: ({}, {})", x, y);
        Ok(())
    }

    fn cursor(&self) -> Result<&Arc<dyn CursorControl>> {
        self.cursor.as_ref().ok_or(SynthesisError::CursorUnavailable)
    }
}

impl std::fmt::Debug for Synthesizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Synthesizer")
            .field("keyboard", &self.keyboard)
            .field("mouse", &self.mouse)
            .field("delays", &self.delays)
            .field("cursor", &self.cursor.is_some())
            .finish()
    }
}
