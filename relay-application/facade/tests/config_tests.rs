//! 配置测试

use input_relay::{DeviceId, KeyboardFilter, MouseFilter, RelayConfig, RelayError};

#[test]
fn test_default_config() {
    let config = RelayConfig::default();

    assert_eq!(config.filter.keyboard, KeyboardFilter::None);
    assert_eq!(config.filter.mouse, MouseFilter::None);
    assert_eq!(config.delays.key_press_ms, 1);
    assert_eq!(config.delays.click_ms, 1);
    assert_eq!(config.delays.scroll_ms, 15);
    assert_eq!(config.devices.keyboard, DeviceId(1));
    assert_eq!(config.devices.mouse, DeviceId(11));
    assert_eq!(config.hardware_id_buffer, 500);
}

#[test]
fn test_empty_toml_uses_defaults() {
    let config = RelayConfig::from_toml_str("").unwrap();
    assert_eq!(config, RelayConfig::default());
}

#[test]
fn test_partial_toml() {
    let content = r#"
[filter]
keyboard = "all"
mouse = "left_button_down"

[delays]
scroll_ms = 40
"#;

    let config = RelayConfig::from_toml_str(content).unwrap();
    assert_eq!(config.filter.keyboard, KeyboardFilter::All);
    assert_eq!(config.filter.mouse, MouseFilter::LeftButtonDown);
    assert_eq!(config.delays.scroll_ms, 40);
    assert_eq!(config.delays.key_press_ms, 1);
    assert_eq!(config.devices.mouse, DeviceId(11));
}

#[test]
fn test_invalid_filter_name() {
    let result = RelayConfig::from_toml_str("[filter]\nkeyboard = \"everything\"\n");
    assert!(matches!(result, Err(RelayError::TomlParse(_))));
}

#[test]
fn test_device_out_of_range() {
    let result = RelayConfig::from_toml_str("[devices]\nkeyboard = 12\n");
    assert!(matches!(result, Err(RelayError::Config(_))));

    let result = RelayConfig::from_toml_str("[devices]\nmouse = 3\n");
    assert!(matches!(result, Err(RelayError::Config(_))));
}

#[test]
fn test_zero_hardware_id_buffer() {
    let result = RelayConfig::from_toml_str("hardware_id_buffer = 0\n");
    assert!(matches!(result, Err(RelayError::Config(_))));
}

#[test]
fn test_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut config = RelayConfig::default();
    config.filter.mouse = MouseFilter::Move;
    config.delays.click_ms = 30;
    config.devices.keyboard = DeviceId(2);
    config.save(&path).unwrap();

    let loaded = RelayConfig::load(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_load_missing_file_returns_default() {
    let dir = tempfile::tempdir().unwrap();
    let config = RelayConfig::load(dir.path().join("missing.toml")).unwrap();
    assert_eq!(config, RelayConfig::default());
}

#[test]
fn test_default_path() {
    if let Ok(path) = RelayConfig::default_path() {
        assert!(path.ends_with("input-relay/config.toml"));
    }
}
