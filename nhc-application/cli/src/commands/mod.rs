//! CLI 命令处理模块

pub mod notify;
pub mod output;
pub mod run;
pub mod testbed;
