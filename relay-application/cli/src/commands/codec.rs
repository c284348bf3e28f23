//! 键码编解码命令

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;

use input_relay::{char_to_key, key_to_char, plan_text, KeyCode};

/// 按键序列中的一步
#[derive(Debug, Serialize)]
struct PlanStep {
    code: u16,
    key: String,
    action: &'static str,
}

pub fn encode(text: &str, json: bool) -> Result<()> {
    let steps: Vec<PlanStep> = plan_text(text)
        .into_iter()
        .map(|press| PlanStep {
            code: press.key.raw(),
            key: press.key.name().unwrap_or("?").to_string(),
            action: if press.press { "down" } else { "up" },
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&steps)?);
        return Ok(());
    }

    println!("{} 文本: {:?}", "⌨".cyan(), text);

    let fallbacks: Vec<char> = text.chars().filter(|&c| char_to_key(c).is_fallback()).collect();
    if !fallbacks.is_empty() {
        println!(
            "  {} 以下字符无法映射，将输入 '?': {:?}",
            "⚠".yellow(),
            fallbacks
        );
    }

    println!("{:<8} {:<12} {}", "CODE", "KEY", "ACTION");
    println!("{}", "-".repeat(30));
    for step in &steps {
        let action = if step.action == "down" {
            step.action.green()
        } else {
            step.action.normal()
        };
        println!("0x{:02X}     {:<12} {}", step.code, step.key, action);
    }

    println!("\n共 {} 个按键事件", steps.len().to_string().cyan());
    Ok(())
}

pub fn decode(code: &str, shift: bool, caps: bool) -> Result<()> {
    let key = parse_key_code(code)?;

    println!("{} 扫描码: {}", "⌨".cyan(), key.to_string().yellow());
    println!("  Shift: {}  Caps Lock: {}", shift, caps);

    match key_to_char(key, caps, shift) {
        Some(ch) => println!("  字符: {}", format!("{:?}", ch).green()),
        None => println!("  字符: {}", "(无)".dimmed()),
    }

    Ok(())
}

/// 解析十进制或 0x 开头的十六进制扫描码
fn parse_key_code(input: &str) -> Result<KeyCode> {
    let input = input.trim();
    let raw = match input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
    {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => input.parse::<u16>(),
    }
    .with_context(|| format!("无效的扫描码: {}", input))?;

    Ok(KeyCode(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_code() {
        assert_eq!(parse_key_code("0x1E").unwrap(), KeyCode::A);
        assert_eq!(parse_key_code("30").unwrap(), KeyCode::A);
        assert_eq!(parse_key_code(" 0X39 ").unwrap(), KeyCode::SPACE);
        assert!(parse_key_code("zz").is_err());
        assert!(parse_key_code("0x").is_err());
    }
}
