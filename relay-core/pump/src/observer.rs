//! 观察者注册表
//!
//! 观察者按注册顺序同步调用。分发前先对列表做快照并释放锁，
//! 因此观察者可以在回调内注册或注销观察者。

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use relay_driver::{KeyStroke, MouseStroke};

use crate::{KeyboardNotification, MouseNotification, Verdict};

/// 键盘观察者
pub trait KeyboardObserver: Send + Sync {
    fn on_keyboard(&self, notification: &KeyboardNotification) -> Verdict<KeyStroke>;
}

/// 鼠标观察者
pub trait MouseObserver: Send + Sync {
    fn on_mouse(&self, notification: &MouseNotification) -> Verdict<MouseStroke>;
}

impl<F> KeyboardObserver for F
where
    F: Fn(&KeyboardNotification) -> Verdict<KeyStroke> + Send + Sync,
{
    fn on_keyboard(&self, notification: &KeyboardNotification) -> Verdict<KeyStroke> {
        self(notification)
    }
}

impl<F> MouseObserver for F
where
    F: Fn(&MouseNotification) -> Verdict<MouseStroke> + Send + Sync,
{
    fn on_mouse(&self, notification: &MouseNotification) -> Verdict<MouseStroke> {
        self(notification)
    }
}

/// 观察者 ID（注销时使用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

/// 有序观察者列表
pub struct ObserverList<O: ?Sized> {
    next_id: AtomicU64,
    entries: RwLock<Vec<(ObserverId, Arc<O>)>>,
}

impl<O: ?Sized> Default for ObserverList<O> {
    fn default() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            entries: RwLock::new(Vec::new()),
        }
    }
}

impl<O: ?Sized> ObserverList<O> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册观察者，追加到列表末尾
    pub fn subscribe(&self, observer: Arc<O>) -> ObserverId {
        let id = ObserverId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, observer));
        id
    }

    /// 注销观察者，返回是否找到
    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        entries.len() != before
    }

    /// 按注册顺序的快照
    pub fn snapshot(&self) -> Vec<Arc<O>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.write().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

/// 可被观察者改写的通知
pub(crate) trait Rewritable {
    type Stroke: Copy;

    fn stroke_mut(&mut self) -> &mut Self::Stroke;
}

impl Rewritable for KeyboardNotification {
    type Stroke = KeyStroke;

    fn stroke_mut(&mut self) -> &mut KeyStroke {
        &mut self.stroke
    }
}

impl Rewritable for MouseNotification {
    type Stroke = MouseStroke;

    fn stroke_mut(&mut self) -> &mut MouseStroke {
        &mut self.stroke
    }
}

/// 依次调用观察者并合并裁决
///
/// 每个观察者看到的是前面观察者改写后的记录；任一观察者返回
/// `Suppress` 后事件被丢弃，但剩余观察者仍会收到通知。
/// 返回 `None` 表示丢弃，否则为最终要转发的记录。
pub(crate) fn dispatch<N, O>(
    notification: &mut N,
    observers: &[Arc<O>],
    call: impl Fn(&O, &N) -> Verdict<N::Stroke>,
) -> Option<N::Stroke>
where
    N: Rewritable,
    O: ?Sized,
{
    let mut suppressed = false;

    for observer in observers {
        match call(&**observer, &*notification) {
            Verdict::Forward => {}
            Verdict::Replace(stroke) => *notification.stroke_mut() = stroke,
            Verdict::Suppress => suppressed = true,
        }
    }

    if suppressed {
        None
    } else {
        Some(*notification.stroke_mut())
    }
}
