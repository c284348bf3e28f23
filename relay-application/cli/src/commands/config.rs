//! 配置命令

use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::path::PathBuf;

use input_relay::RelayConfig;

use crate::ConfigAction;

pub fn handle(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Init { path, force } => init(path, force),
        ConfigAction::Show { path } => show(path),
    }
}

fn resolve(path: Option<PathBuf>) -> Result<PathBuf> {
    match path {
        Some(path) => Ok(path),
        None => RelayConfig::default_path().context("无法确定默认配置路径"),
    }
}

fn init(path: Option<PathBuf>, force: bool) -> Result<()> {
    let path = resolve(path)?;

    if path.exists() && !force {
        bail!("配置文件已存在: {:?}（使用 --force 覆盖）", path);
    }

    RelayConfig::default()
        .save(&path)
        .with_context(|| format!("写入配置文件失败: {:?}", path))?;

    println!("{} 已生成默认配置: {}", "✓".green(), path.display());
    Ok(())
}

fn show(path: Option<PathBuf>) -> Result<()> {
    let path = resolve(path)?;

    let config = RelayConfig::load(&path)
        .with_context(|| format!("加载配置文件失败: {:?}", path))?;

    if !path.exists() {
        println!("{} 配置文件不存在，显示默认配置", "ℹ".cyan());
    }
    println!("{} {}", "配置文件:".bold(), path.display());
    println!();
    println!("{}", toml::to_string_pretty(&config).context("序列化配置失败")?);
    Ok(())
}
