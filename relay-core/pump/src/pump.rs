//! 事件泵生命周期
//!
//! 加载时打开驱动会话、设置过滤并启动专用线程；卸载时销毁会话，
//! 阻塞在驱动调用中的泵线程随即返回并退出。通道故障时泵线程自行
//! 卸载，并通过故障通道上报。

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle, ThreadId};

use async_channel::{Receiver, Sender};
use tracing::{debug, error, info, warn};

use relay_driver::{DeviceClass, DeviceContext, FilterConfig, DEFAULT_HARDWARE_ID_BUFFER};

use crate::{
    priority, KeyboardObserver, LockKeyState, MouseObserver, ObserverId, ObserverList,
    PumpError, PumpFault, PumpStats, PumpStatsSnapshot, PumpWorker, Result,
};

/// 泵状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpState {
    Unloaded,
    Loading,
    Running,
}

impl PumpState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Loading,
            2 => Self::Running,
            _ => Self::Unloaded,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            Self::Unloaded => 0,
            Self::Loading => 1,
            Self::Running => 2,
        }
    }
}

/// 泵线程与控制方共享的状态
#[derive(Debug)]
struct Shared {
    state: AtomicU8,
    stats: Arc<PumpStats>,
}

impl Shared {
    fn state(&self) -> PumpState {
        PumpState::from_u8(self.state.load(Ordering::SeqCst))
    }

    fn set_state(&self, state: PumpState) {
        self.state.store(state.as_u8(), Ordering::SeqCst);
    }
}

/// 一次加载周期的取消标志
#[derive(Debug, Clone, Default)]
struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

struct WorkerThread {
    id: ThreadId,
    join: JoinHandle<()>,
}

/// 事件泵
pub struct EventPump {
    context: Arc<DeviceContext>,
    keyboard: Arc<ObserverList<dyn KeyboardObserver>>,
    mouse: Arc<ObserverList<dyn MouseObserver>>,
    lock_state: Arc<dyn LockKeyState>,
    shared: Arc<Shared>,
    /// 生命周期锁：load/unload 互斥
    worker: Mutex<Option<WorkerThread>>,
    /// 当前运行的泵线程及其取消标志（不跨阻塞调用持有）
    run: Mutex<Option<(ThreadId, CancelToken)>>,
    faults_tx: Sender<PumpFault>,
    faults_rx: Receiver<PumpFault>,
    hardware_id_buffer: usize,
}

impl EventPump {
    pub fn new(context: Arc<DeviceContext>, lock_state: Arc<dyn LockKeyState>) -> Self {
        let (faults_tx, faults_rx) = async_channel::unbounded();

        Self {
            context,
            keyboard: Arc::new(ObserverList::new()),
            mouse: Arc::new(ObserverList::new()),
            lock_state,
            shared: Arc::new(Shared {
                state: AtomicU8::new(PumpState::Unloaded.as_u8()),
                stats: Arc::new(PumpStats::default()),
            }),
            worker: Mutex::new(None),
            run: Mutex::new(None),
            faults_tx,
            faults_rx,
            hardware_id_buffer: DEFAULT_HARDWARE_ID_BUFFER,
        }
    }

    /// 设置硬件 ID 查询缓冲区大小（下次加载生效）
    pub fn with_hardware_id_buffer(mut self, size: usize) -> Self {
        self.hardware_id_buffer = size;
        self
    }

    pub fn context(&self) -> &Arc<DeviceContext> {
        &self.context
    }

    fn worker_slot(&self) -> MutexGuard<'_, Option<WorkerThread>> {
        self.worker.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn run_slot(&self) -> MutexGuard<'_, Option<(ThreadId, CancelToken)>> {
        self.run.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 加载：打开会话、设置过滤、启动泵线程
    pub fn load(&self, filters: FilterConfig) -> Result<()> {
        let mut slot = self.worker_slot();

        if self.shared.state() == PumpState::Running {
            return Err(PumpError::AlreadyLoaded);
        }

        // 回收上次运行的线程（故障退出或在回调内卸载）
        if let Some(stale) = slot.take() {
            if stale.id == thread::current().id() {
                debug!("在泵线程内重新加载，旧线程处理完当前事件后退出");
            } else {
                join_worker(stale);
            }
        }

        self.shared.set_state(PumpState::Loading);
        info!("加载事件泵: {:?}", filters);

        let handle = match self.context.open() {
            Ok(handle) => handle,
            Err(e) => {
                self.shared.set_state(PumpState::Unloaded);
                error!("加载事件泵失败: {}", e);
                return Err(PumpError::ContextCreation(e));
            }
        };

        if filters.is_empty() {
            warn!("键盘与鼠标过滤均为 None，事件泵不会收到任何事件");
        }

        let applied = self
            .context
            .set_filter(DeviceClass::Keyboard, filters.keyboard.mask())
            .and_then(|()| self.context.set_filter(DeviceClass::Mouse, filters.mouse.mask()));
        if let Err(e) = applied {
            self.context.close();
            self.shared.set_state(PumpState::Unloaded);
            return Err(PumpError::Driver(e));
        }

        self.shared.stats.reset();
        let token = CancelToken::default();

        let worker = PumpWorker::new(
            Arc::clone(&self.context),
            handle,
            Arc::clone(&self.keyboard),
            Arc::clone(&self.mouse),
            Arc::clone(&self.lock_state),
            Arc::clone(&self.shared.stats),
            self.hardware_id_buffer,
        );
        let shared = Arc::clone(&self.shared);
        let context = Arc::clone(&self.context);
        let faults = self.faults_tx.clone();
        let cancelled = token.clone();

        // 线程可能立即遇到故障并自行卸载，必须先置为 Running
        self.shared.set_state(PumpState::Running);

        let spawned = thread::Builder::new()
            .name("relay-pump".to_string())
            .spawn(move || run(worker, shared, context, cancelled, faults));

        match spawned {
            Ok(join) => {
                let id = join.thread().id();
                *self.run_slot() = Some((id, token));
                *slot = Some(WorkerThread { id, join });
                info!("事件泵已启动");
                Ok(())
            }
            Err(e) => {
                self.context.close();
                self.shared.set_state(PumpState::Unloaded);
                error!("启动泵线程失败: {}", e);
                Err(PumpError::ThreadSpawn(e))
            }
        }
    }

    /// 卸载：销毁会话并等待泵线程退出
    ///
    /// 未加载时调用是无操作。在观察者回调内调用时不会等待泵线程，
    /// 泵线程处理完当前事件后自行退出。
    pub fn unload(&self) {
        let current = thread::current().id();
        let in_pump = self.run_slot().clone().filter(|(id, _)| *id == current);

        if let Some((_, token)) = in_pump {
            token.cancel();
            self.context.close();
            self.shared.set_state(PumpState::Unloaded);
            info!("事件泵已在观察者回调内卸载");
            return;
        }

        let mut slot = self.worker_slot();
        let Some(worker) = slot.take() else {
            debug!("事件泵未加载，忽略卸载");
            return;
        };

        if let Some((_, token)) = self.run_slot().take() {
            token.cancel();
        }
        self.context.close();
        join_worker(worker);

        self.shared.set_state(PumpState::Unloaded);
        info!("事件泵已卸载");
    }

    pub fn is_loaded(&self) -> bool {
        self.shared.state() == PumpState::Running
    }

    pub fn state(&self) -> PumpState {
        self.shared.state()
    }

    /// 注册键盘观察者
    pub fn subscribe_keyboard(&self, observer: impl KeyboardObserver + 'static) -> ObserverId {
        self.keyboard.subscribe(Arc::new(observer))
    }

    /// 注册鼠标观察者
    pub fn subscribe_mouse(&self, observer: impl MouseObserver + 'static) -> ObserverId {
        self.mouse.subscribe(Arc::new(observer))
    }

    pub fn unsubscribe_keyboard(&self, id: ObserverId) -> bool {
        self.keyboard.unsubscribe(id)
    }

    pub fn unsubscribe_mouse(&self, id: ObserverId) -> bool {
        self.mouse.unsubscribe(id)
    }

    /// 故障通知接收端
    pub fn faults(&self) -> Receiver<PumpFault> {
        self.faults_rx.clone()
    }

    /// 当前运行计数
    pub fn stats(&self) -> PumpStatsSnapshot {
        self.shared.stats.snapshot()
    }
}

impl Drop for EventPump {
    fn drop(&mut self) {
        self.unload();
    }
}

impl std::fmt::Debug for EventPump {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventPump")
            .field("state", &self.state())
            .field("context", &self.context)
            .field("keyboard_observers", &self.keyboard.len())
            .field("mouse_observers", &self.mouse.len())
            .finish()
    }
}

fn join_worker(worker: WorkerThread) {
    if worker.join.join().is_err() {
        error!("泵线程异常退出");
    }
}

/// 泵线程主循环
fn run(
    mut worker: PumpWorker,
    shared: Arc<Shared>,
    context: Arc<DeviceContext>,
    cancelled: CancelToken,
    faults: Sender<PumpFault>,
) {
    priority::raise_current_thread();
    debug!("泵线程开始运行");

    while !cancelled.is_cancelled() {
        let Err(fault) = worker.step() else {
            continue;
        };

        if cancelled.is_cancelled() {
            debug!("卸载中断了阻塞的驱动调用");
            break;
        }

        error!("驱动通道故障，事件泵自行卸载: {}", fault);
        context.close();
        shared.set_state(PumpState::Unloaded);
        if faults.try_send(fault).is_err() {
            warn!("故障通知发送失败");
        }
        break;
    }

    debug!("泵线程退出");
}
