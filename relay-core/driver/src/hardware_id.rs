//! 硬件 ID 解码
//!
//! 驱动返回的硬件 ID 是夹带空字节的原始字节串（多个宽字符串首尾相连）。
//! 解码规则需与下游解析复合硬件 ID 的消费方保持兼容：
//! - 连续超过两个空字节渲染为 `"; "` 分隔符
//! - 单个或两个连续空字节直接丢弃
//! - 非空字节按字符追加
//!
//! 分隔符在遇到下一个非空字节时才写出，末尾的空字节串不产生分隔符。

/// 硬件 ID 查询的默认缓冲区大小
pub const DEFAULT_HARDWARE_ID_BUFFER: usize = 500;

/// 解码硬件 ID 字节串
pub fn decode_hardware_id(bytes: &[u8]) -> String {
    let mut decoded = String::with_capacity(bytes.len());
    let mut nulls = 0usize;

    for &byte in bytes {
        if byte == 0 {
            nulls += 1;
            continue;
        }

        if nulls > 2 {
            decoded.push_str("; ");
        }
        nulls = 0;
        decoded.push(byte as char);
    }

    decoded
}
