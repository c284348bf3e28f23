//! 运行统计与故障记录

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use relay_driver::DeviceId;

/// 泵的运行计数（每次加载时清零）
#[derive(Debug, Default)]
pub struct PumpStats {
    received: AtomicU64,
    forwarded: AtomicU64,
    suppressed: AtomicU64,
}

/// 计数快照
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PumpStatsSnapshot {
    pub received: u64,
    pub forwarded: u64,
    pub suppressed: u64,
}

impl PumpStats {
    pub(crate) fn record_received(&self) {
        self.received.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_forwarded(&self) {
        self.forwarded.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_suppressed(&self) {
        self.suppressed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn reset(&self) {
        self.received.store(0, Ordering::Relaxed);
        self.forwarded.store(0, Ordering::Relaxed);
        self.suppressed.store(0, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> PumpStatsSnapshot {
        PumpStatsSnapshot {
            received: self.received.load(Ordering::Relaxed),
            forwarded: self.forwarded.load(Ordering::Relaxed),
            suppressed: self.suppressed.load(Ordering::Relaxed),
        }
    }
}

/// 致命的通道故障
///
/// 驱动 `receive` 返回 `<= 0` 且并非由卸载引起时产生。故障发生后泵已自行卸载。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PumpFault {
    /// 发生故障时正在读取的设备
    pub device: DeviceId,
    /// 驱动返回的记录数
    pub received: i32,
    pub occurred_at: DateTime<Utc>,
}

impl PumpFault {
    pub fn new(device: DeviceId, received: i32) -> Self {
        Self {
            device,
            received,
            occurred_at: Utc::now(),
        }
    }
}

impl std::fmt::Display for PumpFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "设备 {} 读取失败 (返回 {}) @ {}",
            self.device,
            self.received,
            self.occurred_at.to_rfc3339()
        )
    }
}
