//! Input Relay 门面
//!
//! 组装设备上下文、事件泵与输入合成器，负责加载/卸载、过滤与延迟
//! 配置、观察者注册，并在未加载时拒绝合成调用。

use std::sync::{Arc, PoisonError, RwLock};

use async_channel::Receiver;
use tracing::{debug, error, info};

use relay_codec::KeyCode;
use relay_driver::{
    DeviceContext, DeviceId, DriverBinding, FilterConfig, KeyState, KeyboardFilter, MouseFilter,
};
use relay_pump::{
    EventPump, KeyboardObserver, LockKeyState, MouseObserver, ObserverId, PumpError, PumpFault,
    PumpState, PumpStatsSnapshot,
};
use relay_synthesis::{
    CursorControl, DelaySettings, MouseAction, MouseButton, ScrollDirection, Synthesizer,
};

use crate::{platform, RelayConfig, RelayError, Result};

/// Input Relay 构建器
pub struct InputRelayBuilder {
    binding: Arc<dyn DriverBinding>,
    config: RelayConfig,
    lock_state: Arc<dyn LockKeyState>,
    cursor: Option<Arc<dyn CursorControl>>,
}

impl InputRelayBuilder {
    pub fn config(mut self, config: RelayConfig) -> Self {
        self.config = config;
        self
    }

    /// 替换 Caps Lock 查询
    pub fn with_lock_state(mut self, lock_state: Arc<dyn LockKeyState>) -> Self {
        self.lock_state = lock_state;
        self
    }

    /// 替换系统光标
    pub fn with_cursor(mut self, cursor: Arc<dyn CursorControl>) -> Self {
        self.cursor = Some(cursor);
        self
    }

    /// 不使用系统光标
    pub fn without_cursor(mut self) -> Self {
        self.cursor = None;
        self
    }

    pub fn build(self) -> InputRelay {
        let config = self.config;
        let context = Arc::new(DeviceContext::new(self.binding));

        let delays = Arc::new(DelaySettings::new(
            config.delays.key_press_ms,
            config.delays.click_ms,
            config.delays.scroll_ms,
        ));

        let pump = EventPump::new(Arc::clone(&context), self.lock_state)
            .with_hardware_id_buffer(config.hardware_id_buffer);

        let mut synthesizer = Synthesizer::new(Arc::clone(&context), Arc::clone(&delays))
            .with_devices(config.devices.keyboard, config.devices.mouse);
        if let Some(cursor) = self.cursor {
            synthesizer = synthesizer.with_cursor(cursor);
        }

        InputRelay {
            context,
            pump,
            synthesizer,
            delays,
            filters: RwLock::new(config.filter),
            hardware_id_buffer: config.hardware_id_buffer,
        }
    }
}

/// Input Relay
pub struct InputRelay {
    context: Arc<DeviceContext>,
    pump: EventPump,
    synthesizer: Synthesizer,
    delays: Arc<DelaySettings>,
    /// 下次加载使用的过滤模式
    filters: RwLock<FilterConfig>,
    hardware_id_buffer: usize,
}

impl InputRelay {
    /// 使用默认配置和当前平台能力创建
    pub fn new(binding: Arc<dyn DriverBinding>) -> Self {
        Self::builder(binding).build()
    }

    pub fn with_config(binding: Arc<dyn DriverBinding>, config: RelayConfig) -> Self {
        Self::builder(binding).config(config).build()
    }

    pub fn builder(binding: Arc<dyn DriverBinding>) -> InputRelayBuilder {
        InputRelayBuilder {
            binding,
            config: RelayConfig::default(),
            lock_state: platform::lock_state(),
            cursor: platform::cursor(),
        }
    }

    // ========================================================================
    // 配置
    // ========================================================================

    /// 当前过滤模式
    pub fn filters(&self) -> FilterConfig {
        *self.filters.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// 设置键盘过滤模式（下次加载生效）
    pub fn set_keyboard_filter(&self, filter: KeyboardFilter) {
        self.filters
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .keyboard = filter;
        if self.is_loaded() {
            debug!("键盘过滤已修改，下次加载生效: {:?}", filter);
        }
    }

    /// 设置鼠标过滤模式（下次加载生效）
    pub fn set_mouse_filter(&self, filter: MouseFilter) {
        self.filters
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .mouse = filter;
        if self.is_loaded() {
            debug!("鼠标过滤已修改，下次加载生效: {:?}", filter);
        }
    }

    pub fn delays(&self) -> &Arc<DelaySettings> {
        &self.delays
    }

    pub fn set_key_press_delay(&self, ms: u64) {
        self.delays.set_key_press_ms(ms);
    }

    pub fn set_click_delay(&self, ms: u64) {
        self.delays.set_click_ms(ms);
    }

    pub fn set_scroll_delay(&self, ms: u64) {
        self.delays.set_scroll_ms(ms);
    }

    // ========================================================================
    // 生命周期
    // ========================================================================

    /// 加载，返回是否成功
    ///
    /// 已加载时返回 `false` 且不做任何事。
    pub fn load(&self) -> bool {
        match self.try_load() {
            Ok(()) => true,
            Err(RelayError::Pump(PumpError::AlreadyLoaded)) => {
                debug!("Input Relay 已加载，忽略重复加载");
                false
            }
            Err(e) => {
                error!("Input Relay 加载失败: {}", e);
                false
            }
        }
    }

    /// 加载，返回详细错误
    pub fn try_load(&self) -> Result<()> {
        let filters = self.filters();
        self.pump.load(filters)?;
        info!("Input Relay 已加载");
        Ok(())
    }

    /// 卸载（未加载时为无操作）
    pub fn unload(&self) {
        self.pump.unload();
    }

    pub fn is_loaded(&self) -> bool {
        self.pump.is_loaded()
    }

    pub fn state(&self) -> PumpState {
        self.pump.state()
    }

    /// 通道故障通知
    pub fn faults(&self) -> Receiver<PumpFault> {
        self.pump.faults()
    }

    pub fn stats(&self) -> PumpStatsSnapshot {
        self.pump.stats()
    }

    /// 查询设备硬件 ID
    pub fn hardware_id(&self, device: DeviceId) -> Result<String> {
        self.ensure_loaded()?;
        Ok(self.context.hardware_id(device, self.hardware_id_buffer)?)
    }

    // ========================================================================
    // 观察者
    // ========================================================================

    pub fn subscribe_keyboard(&self, observer: impl KeyboardObserver + 'static) -> ObserverId {
        self.pump.subscribe_keyboard(observer)
    }

    pub fn subscribe_mouse(&self, observer: impl MouseObserver + 'static) -> ObserverId {
        self.pump.subscribe_mouse(observer)
    }

    pub fn unsubscribe_keyboard(&self, id: ObserverId) -> bool {
        self.pump.unsubscribe_keyboard(id)
    }

    pub fn unsubscribe_mouse(&self, id: ObserverId) -> bool {
        self.pump.unsubscribe_mouse(id)
    }

    // ========================================================================
    // 输入合成
    // ========================================================================

    fn ensure_loaded(&self) -> Result<()> {
        if self.is_loaded() {
            Ok(())
        } else {
            Err(RelayError::NotLoaded)
        }
    }

    fn synthesizer(&self) -> Result<&Synthesizer> {
        self.ensure_loaded()?;
        Ok(&self.synthesizer)
    }

    pub fn send_key(&self, code: KeyCode, state: KeyState) -> Result<()> {
        Ok(self.synthesizer()?.send_key(code, state)?)
    }

    pub fn tap_key(&self, code: KeyCode) -> Result<()> {
        Ok(self.synthesizer()?.tap_key(code)?)
    }

    pub fn send_keys(&self, codes: &[KeyCode]) -> Result<()> {
        Ok(self.synthesizer()?.send_keys(codes)?)
    }

    pub fn send_text(&self, text: &str) -> Result<()> {
        Ok(self.synthesizer()?.send_text(text)?)
    }

    pub fn send_key_combination(&self, modifiers: &[KeyCode], key: KeyCode) -> Result<()> {
        Ok(self.synthesizer()?.send_key_combination(modifiers, key)?)
    }

    pub fn send_mouse_event(&self, action: MouseAction) -> Result<()> {
        Ok(self.synthesizer()?.send_mouse_event(action)?)
    }

    pub fn click(&self, button: MouseButton) -> Result<()> {
        Ok(self.synthesizer()?.click(button)?)
    }

    pub fn left_click(&self) -> Result<()> {
        Ok(self.synthesizer()?.left_click()?)
    }

    pub fn right_click(&self) -> Result<()> {
        Ok(self.synthesizer()?.right_click()?)
    }

    pub fn middle_click(&self) -> Result<()> {
        Ok(self.synthesizer()?.middle_click()?)
    }

    pub fn scroll(&self, direction: ScrollDirection) -> Result<()> {
        Ok(self.synthesizer()?.scroll(direction)?)
    }

    pub fn move_mouse_by(&self, dx: i32, dy: i32, use_driver: bool) -> Result<()> {
        Ok(self.synthesizer()?.move_mouse_by(dx, dy, use_driver)?)
    }

    pub fn move_mouse_to(&self, x: i32, y: i32, use_driver: bool) -> Result<()> {
        Ok(self.synthesizer()?.move_mouse_to(x, y, use_driver)?)
    }
}

impl Drop for InputRelay {
    fn drop(&mut self) {
        if self.is_loaded() {
            debug!("Input Relay 释放时自动卸载");
        }
        self.pump.unload();
    }
}

impl std::fmt::Debug for InputRelay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputRelay")
            .field("pump", &self.pump)
            .field("filters", &self.filters())
            .field("synthesizer", &self.synthesizer)
            .finish()
    }
}
