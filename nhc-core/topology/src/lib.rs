//! NHC 拓扑层
//!
//! 负责在运行开始前加载测试床（目标设备集合）与检查配置
//! （目的地址、接口、期望状态），并完成输入校验。

pub mod checks;
pub mod testbed;

pub use checks::{CheckConfig, ExpectedStatus};
pub use testbed::{DeviceConfig, Testbed};

use thiserror::Error;

/// 拓扑层错误
#[derive(Error, Debug)]
pub enum TopologyError {
    #[error("解析错误: {0}")]
    ParseError(String),

    #[error("设备 {0} 不存在")]
    DeviceNotFound(String),

    #[error("配置错误: {0}")]
    ConfigError(String),

    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TopologyError>;
