//! Input Relay CLI 应用

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, Level};

mod commands;

#[derive(Parser)]
#[command(name = "relay")]
#[command(about = "Input Relay - 键码、硬件 ID 与配置诊断工具", long_about = None)]
#[command(version)]
struct Cli {
    /// 日志级别
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 将文本展开为按键序列
    Encode {
        /// 文本内容
        text: String,
        /// 以 JSON 输出
        #[arg(long)]
        json: bool,
    },

    /// 解析扫描码对应的字符
    Decode {
        /// 扫描码（十进制或 0x 开头的十六进制）
        code: String,
        /// 按住 Shift
        #[arg(long)]
        shift: bool,
        /// Caps Lock 开启
        #[arg(long)]
        caps: bool,
    },

    /// 解码驱动返回的硬件 ID 字节
    Hwid {
        /// 十六进制字节（可分多个参数，如 "41 00 00 00 42"）
        #[arg(required = true)]
        bytes: Vec<String>,
    },

    /// 配置管理
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// 生成默认配置文件
    Init {
        /// 配置文件路径（默认 ~/.config/input-relay/config.toml）
        #[arg(long)]
        path: Option<PathBuf>,
        /// 覆盖已存在的文件
        #[arg(long)]
        force: bool,
    },
    /// 显示当前配置
    Show {
        /// 配置文件路径（默认 ~/.config/input-relay/config.toml）
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // 初始化日志
    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    tracing_subscriber::fmt().with_max_level(log_level).init();

    debug!("Input Relay CLI 启动");

    // 处理命令
    match cli.command {
        Commands::Encode { text, json } => commands::codec::encode(&text, json)?,
        Commands::Decode { code, shift, caps } => commands::codec::decode(&code, shift, caps)?,
        Commands::Hwid { bytes } => commands::hwid::handle(&bytes)?,
        Commands::Config { action } => commands::config::handle(action)?,
    }

    Ok(())
}
