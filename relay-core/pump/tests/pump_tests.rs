//! 事件泵测试（使用脚本化模拟驱动）

use std::sync::{Arc, Mutex, Weak};
use std::time::{Duration, Instant};

use relay_driver::mock::MockDriver;
use relay_driver::{
    DeviceClass, DeviceContext, DeviceId, FilterConfig, KeyCode, KeyState, KeyStroke,
    KeyboardFilter, MouseFilter, MouseState, MouseStroke, Stroke,
};
use relay_pump::{
    CapsLockOff, EventPump, KeyboardNotification, KeyboardObserver, MouseNotification,
    ObserverList, PumpError, PumpState, PumpStats, PumpWorker, Verdict,
};

const TIMEOUT: Duration = Duration::from_secs(5);

fn all_filters() -> FilterConfig {
    FilterConfig::new(KeyboardFilter::All, MouseFilter::All)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn setup() -> (Arc<MockDriver>, Arc<DeviceContext>) {
    init_tracing();
    let driver = Arc::new(MockDriver::new());
    let context = Arc::new(DeviceContext::new(driver.clone()));
    (driver, context)
}

fn wait_until(mut done: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + TIMEOUT;
    while Instant::now() < deadline {
        if done() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    done()
}

fn worker_with(
    context: &Arc<DeviceContext>,
    keyboard: &Arc<ObserverList<dyn KeyboardObserver>>,
    caps_lock: bool,
) -> PumpWorker {
    let handle = context.open().unwrap();
    PumpWorker::new(
        Arc::clone(context),
        handle,
        Arc::clone(keyboard),
        Arc::new(ObserverList::new()),
        Arc::new(move || caps_lock),
        Arc::new(PumpStats::default()),
        500,
    )
}

#[test]
fn test_shift_tracking_resolves_characters() {
    let (driver, context) = setup();
    let keyboard: Arc<ObserverList<dyn KeyboardObserver>> = Arc::new(ObserverList::new());
    let seen = Arc::new(Mutex::new(Vec::new()));

    let record = Arc::clone(&seen);
    keyboard.subscribe(Arc::new(move |n: &KeyboardNotification| -> Verdict<KeyStroke> {
        record.lock().unwrap().push(n.character);
        Verdict::Forward
    }));

    let mut worker = worker_with(&context, &keyboard, false);
    let device = DeviceId::DEFAULT_KEYBOARD;
    driver.push_stroke(device, KeyStroke::down(KeyCode::LEFT_SHIFT));
    driver.push_stroke(device, KeyStroke::down(KeyCode::A));
    driver.push_stroke(device, KeyStroke::up(KeyCode::LEFT_SHIFT));
    driver.push_stroke(device, KeyStroke::down(KeyCode::A));

    for _ in 0..4 {
        worker.step().unwrap();
    }

    assert_eq!(*seen.lock().unwrap(), vec![None, Some('A'), None, Some('a')]);
    assert!(!worker.shift_pressed());
    assert_eq!(driver.sent().len(), 4);
}

#[test]
fn test_caps_lock_and_hardware_id_in_notification() {
    let (driver, context) = setup();
    let keyboard: Arc<ObserverList<dyn KeyboardObserver>> = Arc::new(ObserverList::new());
    let seen = Arc::new(Mutex::new(None));

    let record = Arc::clone(&seen);
    keyboard.subscribe(Arc::new(move |n: &KeyboardNotification| -> Verdict<KeyStroke> {
        *record.lock().unwrap() = Some(n.clone());
        Verdict::Forward
    }));

    let device = DeviceId::keyboard(2).unwrap();
    driver.set_hardware_id(device, b"HID\\VID_1\0\0\0\0HID_DEVICE");
    driver.push_stroke(device, KeyStroke::down(KeyCode::A));

    let mut worker = worker_with(&context, &keyboard, true);
    worker.step().unwrap();

    let notification = seen.lock().unwrap().clone().unwrap();
    assert_eq!(notification.device, device);
    assert_eq!(notification.character, Some('A'));
    assert!(notification.caps_lock);
    assert!(!notification.shift);
    assert_eq!(notification.hardware_id, "HID\\VID_1; HID_DEVICE");
}

#[test]
fn test_keyboard_rewrite_is_forwarded() {
    let (driver, context) = setup();
    let pump = EventPump::new(context, Arc::new(CapsLockOff));

    pump.subscribe_keyboard(|n: &KeyboardNotification| -> Verdict<KeyStroke> {
        if n.key() == KeyCode::A {
            Verdict::Replace(KeyStroke::new(KeyCode::B, n.state() | KeyState::E0))
        } else {
            Verdict::Forward
        }
    });

    pump.load(all_filters()).unwrap();
    driver.push_stroke(DeviceId::DEFAULT_KEYBOARD, KeyStroke::down(KeyCode::A));

    let sent = driver.wait_for_sent(1, TIMEOUT);
    assert_eq!(
        sent,
        vec![(
            DeviceId::DEFAULT_KEYBOARD,
            Stroke::Keyboard(KeyStroke::new(KeyCode::B, KeyState::E0))
        )]
    );

    pump.unload();
}

#[test]
fn test_suppressed_mouse_event_is_not_sent() {
    let (driver, context) = setup();
    let pump = EventPump::new(context, Arc::new(CapsLockOff));

    pump.subscribe_mouse(|_: &MouseNotification| -> Verdict<MouseStroke> { Verdict::Suppress });
    pump.load(all_filters()).unwrap();

    driver.push_stroke(DeviceId::DEFAULT_MOUSE, MouseStroke::button(MouseState::LEFT_BUTTON_DOWN));
    // 键盘事件没有观察者，原样转发，作为处理完毕的标记
    driver.push_stroke(DeviceId::DEFAULT_KEYBOARD, KeyStroke::down(KeyCode::Z));

    let sent = driver.wait_for_sent(1, TIMEOUT);
    assert_eq!(
        sent,
        vec![(DeviceId::DEFAULT_KEYBOARD, Stroke::Keyboard(KeyStroke::down(KeyCode::Z)))]
    );

    assert!(wait_until(|| pump.stats().forwarded == 1));
    let stats = pump.stats();
    assert_eq!(stats.received, 2);
    assert_eq!(stats.suppressed, 1);
    assert_eq!(stats.forwarded, 1);

    pump.unload();
}

#[test]
fn test_passthrough_without_observers() {
    let (driver, context) = setup();
    let pump = EventPump::new(context, Arc::new(CapsLockOff));
    pump.load(all_filters()).unwrap();

    let key = Stroke::Keyboard(KeyStroke::up(KeyCode::ENTER));
    let motion = Stroke::Mouse(MouseStroke::wheel(MouseState::WHEEL, -120));
    driver.push_stroke(DeviceId::DEFAULT_KEYBOARD, key);
    driver.push_stroke(DeviceId::mouse(3).unwrap(), motion);

    let sent = driver.wait_for_sent(2, TIMEOUT);
    assert_eq!(
        sent,
        vec![(DeviceId::DEFAULT_KEYBOARD, key), (DeviceId::mouse(3).unwrap(), motion)]
    );

    pump.unload();
}

#[test]
fn test_observer_order() {
    let (driver, context) = setup();
    let pump = EventPump::new(context, Arc::new(CapsLockOff));
    let order = Arc::new(Mutex::new(Vec::new()));

    for index in 0..3 {
        let order = Arc::clone(&order);
        pump.subscribe_keyboard(move |_: &KeyboardNotification| -> Verdict<KeyStroke> {
            order.lock().unwrap().push(index);
            Verdict::Forward
        });
    }

    pump.load(all_filters()).unwrap();
    driver.push_stroke(DeviceId::DEFAULT_KEYBOARD, KeyStroke::down(KeyCode::Q));
    driver.wait_for_sent(1, TIMEOUT);

    assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
    pump.unload();
}

#[test]
fn test_unsubscribe_stops_notifications() {
    let (driver, context) = setup();
    let pump = EventPump::new(context, Arc::new(CapsLockOff));

    let id = pump.subscribe_keyboard(|_: &KeyboardNotification| -> Verdict<KeyStroke> {
        Verdict::Suppress
    });
    assert!(pump.unsubscribe_keyboard(id));
    assert!(!pump.unsubscribe_keyboard(id));

    pump.load(all_filters()).unwrap();
    driver.push_stroke(DeviceId::DEFAULT_KEYBOARD, KeyStroke::down(KeyCode::W));

    assert_eq!(driver.wait_for_sent(1, TIMEOUT).len(), 1);
    pump.unload();
}

#[test]
fn test_filters_applied_once_per_load() {
    let (driver, context) = setup();
    let pump = EventPump::new(context, Arc::new(CapsLockOff));

    pump.load(FilterConfig::new(KeyboardFilter::KeyDown, MouseFilter::Move))
        .unwrap();

    assert_eq!(
        driver.filters(),
        vec![(DeviceClass::Keyboard, 0x0001), (DeviceClass::Mouse, 0x1000)]
    );
    pump.unload();
}

#[test]
fn test_load_failure() {
    let (driver, context) = setup();
    driver.fail_create(true);

    let pump = EventPump::new(Arc::clone(&context), Arc::new(CapsLockOff));
    let result = pump.load(all_filters());

    assert!(matches!(result, Err(PumpError::ContextCreation(_))));
    assert!(!pump.is_loaded());
    assert!(!context.is_open());
    assert!(driver.filters().is_empty());
}

#[test]
fn test_double_load_and_unload() {
    let (driver, context) = setup();
    let pump = EventPump::new(context, Arc::new(CapsLockOff));

    pump.unload();
    assert_eq!(pump.state(), PumpState::Unloaded);

    pump.load(all_filters()).unwrap();
    assert!(matches!(pump.load(all_filters()), Err(PumpError::AlreadyLoaded)));
    assert!(pump.is_loaded());

    pump.unload();
    pump.unload();

    assert!(!pump.is_loaded());
    assert_eq!(driver.created_count(), 1);
    assert_eq!(driver.destroyed_count(), 1);
    assert_eq!(driver.filters().len(), 2);
}

#[test]
fn test_reload_after_unload() {
    let (driver, context) = setup();
    let pump = EventPump::new(context, Arc::new(CapsLockOff));

    pump.load(all_filters()).unwrap();
    pump.unload();
    pump.load(all_filters()).unwrap();

    driver.push_stroke(DeviceId::DEFAULT_KEYBOARD, KeyStroke::down(KeyCode::E));
    assert_eq!(driver.wait_for_sent(1, TIMEOUT).len(), 1);

    pump.unload();
    assert_eq!(driver.created_count(), 2);
    assert_eq!(driver.destroyed_count(), 2);
}

#[test]
fn test_channel_fault_unloads_pump() {
    let (driver, context) = setup();
    let pump = EventPump::new(Arc::clone(&context), Arc::new(CapsLockOff));
    let faults = pump.faults();

    pump.load(all_filters()).unwrap();
    driver.push_fault(DeviceId::DEFAULT_MOUSE);

    let fault = faults.recv_blocking().unwrap();
    assert_eq!(fault.device, DeviceId::DEFAULT_MOUSE);
    assert_eq!(fault.received, 0);

    assert!(!pump.is_loaded());
    assert!(!context.is_open());
    assert_eq!(driver.destroyed_count(), 1);

    // 故障后再次卸载不会重复销毁
    pump.unload();
    assert_eq!(driver.destroyed_count(), 1);
    assert!(faults.is_empty());
}

#[test]
fn test_unload_inside_observer() {
    let (driver, context) = setup();
    let pump = Arc::new(EventPump::new(context, Arc::new(CapsLockOff)));

    let weak: Weak<EventPump> = Arc::downgrade(&pump);
    pump.subscribe_keyboard(move |_: &KeyboardNotification| -> Verdict<KeyStroke> {
        if let Some(pump) = weak.upgrade() {
            pump.unload();
        }
        Verdict::Forward
    });

    pump.load(all_filters()).unwrap();
    driver.push_stroke(DeviceId::DEFAULT_KEYBOARD, KeyStroke::down(KeyCode::X));

    assert!(driver.wait_for_destroyed(1, TIMEOUT));
    assert!(wait_until(|| !pump.is_loaded()));

    // 上下文已关闭，事件不会再转发
    pump.unload();
    assert!(driver.sent().is_empty());
    assert_eq!(driver.destroyed_count(), 1);
    assert!(pump.faults().is_empty());
}

#[test]
fn test_reload_inside_observer_drops_in_flight_event() {
    let (driver, context) = setup();
    let pump = Arc::new(EventPump::new(context, Arc::new(CapsLockOff)));

    let weak: Weak<EventPump> = Arc::downgrade(&pump);
    pump.subscribe_keyboard(move |n: &KeyboardNotification| -> Verdict<KeyStroke> {
        if n.key() == KeyCode::X {
            if let Some(pump) = weak.upgrade() {
                pump.unload();
                pump.load(all_filters()).unwrap();
            }
        }
        Verdict::Forward
    });

    pump.load(all_filters()).unwrap();
    let first = pump.context().handle();
    driver.push_stroke(DeviceId::DEFAULT_KEYBOARD, KeyStroke::down(KeyCode::X));

    assert!(driver.wait_for_destroyed(1, TIMEOUT));
    assert!(wait_until(|| driver.created_count() == 2));

    // 新会话正常转发后续事件，旧会话的事件不会泄漏到新会话
    driver.push_stroke(DeviceId::DEFAULT_KEYBOARD, KeyStroke::down(KeyCode::Y));
    let sent = driver.wait_for_sent(1, TIMEOUT);
    assert_eq!(
        sent,
        vec![(
            DeviceId::DEFAULT_KEYBOARD,
            Stroke::Keyboard(KeyStroke::down(KeyCode::Y))
        )]
    );

    assert!(pump.is_loaded());
    assert_ne!(pump.context().handle(), first);
    assert_eq!(pump.context().handle(), driver.live_handle());

    pump.unload();
    assert_eq!(driver.destroyed_count(), 2);
    assert!(pump.faults().is_empty());
}
