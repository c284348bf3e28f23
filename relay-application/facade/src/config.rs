//! 配置管理
//!
//! **数据存储方式**: TOML 文件 (~/.config/input-relay/config.toml)
//!
//! 过滤模式在加载时读取一次；延迟随时可改，在发送时读取。

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use relay_driver::{DeviceId, FilterConfig, DEFAULT_HARDWARE_ID_BUFFER};
use relay_synthesis::{DEFAULT_CLICK_MS, DEFAULT_KEY_PRESS_MS, DEFAULT_SCROLL_MS};

use crate::{RelayError, Result};

/// Input Relay 配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayConfig {
    /// 过滤模式
    #[serde(default)]
    pub filter: FilterConfig,

    /// 合成延迟
    #[serde(default)]
    pub delays: DelayConfig,

    /// 合成事件使用的设备
    #[serde(default)]
    pub devices: DeviceConfig,

    /// 硬件 ID 查询缓冲区大小
    #[serde(default = "default_hardware_id_buffer")]
    pub hardware_id_buffer: usize,
}

fn default_hardware_id_buffer() -> usize {
    DEFAULT_HARDWARE_ID_BUFFER
}

/// 延迟配置（毫秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayConfig {
    #[serde(default = "default_key_press_ms")]
    pub key_press_ms: u64,

    #[serde(default = "default_click_ms")]
    pub click_ms: u64,

    #[serde(default = "default_scroll_ms")]
    pub scroll_ms: u64,
}

fn default_key_press_ms() -> u64 {
    DEFAULT_KEY_PRESS_MS
}

fn default_click_ms() -> u64 {
    DEFAULT_CLICK_MS
}

fn default_scroll_ms() -> u64 {
    DEFAULT_SCROLL_MS
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            key_press_ms: default_key_press_ms(),
            click_ms: default_click_ms(),
            scroll_ms: default_scroll_ms(),
        }
    }
}

/// 设备配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceConfig {
    #[serde(default = "default_keyboard_device")]
    pub keyboard: DeviceId,

    #[serde(default = "default_mouse_device")]
    pub mouse: DeviceId,
}

fn default_keyboard_device() -> DeviceId {
    DeviceId::DEFAULT_KEYBOARD
}

fn default_mouse_device() -> DeviceId {
    DeviceId::DEFAULT_MOUSE
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            keyboard: default_keyboard_device(),
            mouse: default_mouse_device(),
        }
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            filter: FilterConfig::default(),
            delays: DelayConfig::default(),
            devices: DeviceConfig::default(),
            hardware_id_buffer: default_hardware_id_buffer(),
        }
    }
}

impl RelayConfig {
    /// 默认配置文件路径
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| RelayError::Config("无法获取用户主目录".to_string()))?;
        Ok(home.join(".config").join("input-relay").join("config.toml"))
    }

    /// 从 TOML 文本解析
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// 加载配置（文件不存在时返回默认配置）
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            debug!("配置文件不存在，使用默认配置: {:?}", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// 保存配置
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        // 确保目录存在
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;

        debug!("配置已保存: {:?}", path);
        Ok(())
    }

    /// 验证配置
    pub fn validate(&self) -> Result<()> {
        if !self.devices.keyboard.is_keyboard() {
            return Err(RelayError::Config(format!(
                "键盘设备 {} 不在键盘设备范围内 (1..=10)",
                self.devices.keyboard
            )));
        }

        if !self.devices.mouse.is_mouse() {
            return Err(RelayError::Config(format!(
                "鼠标设备 {} 不在鼠标设备范围内 (11..=20)",
                self.devices.mouse
            )));
        }

        if self.hardware_id_buffer == 0 {
            return Err(RelayError::Config("硬件 ID 缓冲区大小不能为 0".to_string()));
        }

        Ok(())
    }
}
