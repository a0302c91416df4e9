//! NHC 传输层
//!
//! 负责与网络设备的 RESTCONF 会话管理：连接建立、资源查询、
//! RPC 调用与断开。所有设备调用都带有调用方指定的超时，
//! 挂起的外部调用只会使所在步骤失败，不会阻塞整个阶段。

pub mod manager;
pub mod restconf;
pub mod session;

pub use manager::DeviceManager;
pub use restconf::{RestconfConfig, RestconfConnector, RestconfSession};
pub use session::{ConnectionState, DeviceConnector, DeviceSession, RestResponse};

use thiserror::Error;

/// 传输层错误
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("连接失败: {0}")]
    ConnectionFailed(String),

    #[error("认证失败: {0}")]
    AuthFailed(String),

    #[error("设备 {0} 未登记")]
    DeviceNotFound(String),

    #[error("调用超时")]
    Timeout,

    #[error("连接已断开")]
    Disconnected,

    #[error("HTTP 错误: {0}")]
    HttpError(String),
}

pub type Result<T> = std::result::Result<T, TransportError>;
