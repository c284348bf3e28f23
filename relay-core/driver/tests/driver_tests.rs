//! 驱动协议类型测试

use relay_driver::{
    ContextHandle, DeviceClass, DeviceId, DriverBinding, FilterConfig, KeyCode, KeyState,
    KeyStroke, KeyboardFilter, MouseFilter, MouseFlags, MouseState, MouseStroke, Stroke,
};

/// 只使用默认设备类别判断的空驱动
struct NullDriver;

impl DriverBinding for NullDriver {
    fn create_context(&self) -> Option<ContextHandle> {
        None
    }

    fn destroy_context(&self, _context: ContextHandle) {}

    fn set_filter(&self, _context: ContextHandle, _class: DeviceClass, _mask: u16) {}

    fn wait(&self, _context: ContextHandle) -> DeviceId {
        DeviceId(0)
    }

    fn receive(&self, _context: ContextHandle, _device: DeviceId, _strokes: &mut [Stroke]) -> i32 {
        0
    }

    fn send(&self, _context: ContextHandle, _device: DeviceId, _strokes: &[Stroke]) -> i32 {
        0
    }

    fn hardware_id(&self, _context: ContextHandle, _device: DeviceId, _buffer: &mut [u8]) -> usize {
        0
    }
}

#[test]
fn test_device_class_predicates() {
    let driver = NullDriver;

    assert_eq!(DeviceClass::of(&driver, DeviceId(1)), Some(DeviceClass::Keyboard));
    assert_eq!(DeviceClass::of(&driver, DeviceId(10)), Some(DeviceClass::Keyboard));
    assert_eq!(DeviceClass::of(&driver, DeviceId(11)), Some(DeviceClass::Mouse));
    assert_eq!(DeviceClass::of(&driver, DeviceId(20)), Some(DeviceClass::Mouse));
    assert_eq!(DeviceClass::of(&driver, DeviceId(0)), None);
    assert_eq!(DeviceClass::of(&driver, DeviceId(21)), None);
}

#[test]
fn test_null_context_handle() {
    assert!(ContextHandle::from_raw(0).is_none());
    assert_eq!(ContextHandle::from_raw(7).map(ContextHandle::as_raw), Some(7));
}

#[test]
fn test_stroke_json_shape() {
    let stroke = Stroke::from(KeyStroke::new(KeyCode::A, KeyState::UP | KeyState::E0));
    let json = serde_json::to_value(stroke).unwrap();

    assert_eq!(json["kind"], "keyboard");
    assert_eq!(json["code"], 0x1E);
    assert_eq!(json["state"], 3);

    let mouse: Stroke = serde_json::from_str(
        r#"{"kind":"mouse","state":1024,"flags":0,"rolling":-120,"x":0,"y":0,"information":0}"#,
    )
    .unwrap();
    assert_eq!(mouse, Stroke::Mouse(MouseStroke::wheel(MouseState::WHEEL, -120)));
}

#[test]
fn test_motion_stroke() {
    let stroke = MouseStroke::motion(-5, 7, MouseFlags::MOVE_ABSOLUTE | MouseFlags::VIRTUAL_DESKTOP);
    assert!(stroke.flags.is_absolute());
    assert_eq!(stroke.state, MouseState::NONE);
    assert_eq!((stroke.x, stroke.y), (-5, 7));
}

#[test]
fn test_filter_config_json() {
    let config: FilterConfig = serde_json::from_str(r#"{"keyboard":"key_e0"}"#).unwrap();
    assert_eq!(config.keyboard, KeyboardFilter::KeyE0);
    assert_eq!(config.mouse, MouseFilter::None);
    assert_eq!(config.keyboard.mask(), 0x0004);
}
