//! 操作系统光标
//!
//! 不经过驱动直接定位光标。由平台层注入实现。

use crate::Result;

/// 光标位置读写
pub trait CursorControl: Send + Sync {
    /// 当前光标位置（屏幕坐标，Y 轴向下）
    fn position(&self) -> Result<(i32, i32)>;

    fn set_position(&self, x: i32, y: i32) -> Result<()>;
}
