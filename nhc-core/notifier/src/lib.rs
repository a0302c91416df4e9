//! NHC 通知层
//!
//! 将运行结果整理为状态消息并推送到外部通知渠道（Webex 空间）。
//! 引擎本身不感知通知方式，这里是唯一的对外通知出口。

pub mod webex;

pub use webex::{status_lines, MessageLine, WebexNotifier};

use thiserror::Error;

/// 通知层错误
#[derive(Error, Debug)]
pub enum NotifierError {
    #[error("HTTP 错误: {0}")]
    HttpError(String),

    #[error("API 错误 [{0}]: {1}")]
    ApiError(u16, String),

    #[error("配置错误: {0}")]
    ConfigError(String),
}

pub type Result<T> = std::result::Result<T, NotifierError>;
