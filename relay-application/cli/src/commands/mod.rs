//! CLI 命令处理模块

pub mod codec;
pub mod config;
pub mod hwid;
