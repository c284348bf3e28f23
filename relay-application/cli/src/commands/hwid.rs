//! 硬件 ID 解码命令

use anyhow::{bail, Context, Result};
use colored::Colorize;

use input_relay::decode_hardware_id;

pub fn handle(args: &[String]) -> Result<()> {
    let bytes = parse_hex_bytes(args)?;
    let decoded = decode_hardware_id(&bytes);

    println!("{} 字节数: {}", "🔍".cyan(), bytes.len());
    println!("  硬件 ID: {}", decoded.green());
    Ok(())
}

/// 解析十六进制字节
///
/// 每个参数可以是单个字节（`41`、`0x41`），也可以是连续的十六进制串
/// （`410000`）。
fn parse_hex_bytes(args: &[String]) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();

    for arg in args.iter().flat_map(|a| a.split_whitespace()) {
        let hex = arg
            .strip_prefix("0x")
            .or_else(|| arg.strip_prefix("0X"))
            .unwrap_or(arg);

        if hex.is_empty() || hex.len() % 2 != 0 {
            bail!("无效的十六进制字节: {}", arg);
        }

        for i in (0..hex.len()).step_by(2) {
            let pair = hex.get(i..i + 2).context("无效的十六进制字节")?;
            let byte = u8::from_str_radix(pair, 16)
                .with_context(|| format!("无效的十六进制字节: {}", arg))?;
            bytes.push(byte);
        }
    }

    Ok(bytes)
}
