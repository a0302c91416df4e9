//! 检查配置
//!
//! 一次运行要检查的目的地址、接口集合与期望的接口运行状态。

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Result, TopologyError};

/// 期望的接口运行状态
///
/// 配置值为 "up"/"down"（大小写不敏感）；其他取值在校验阶段被拒绝，
/// 不会演变为运行深处的执行错误。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpectedStatus {
    Up,
    Down,
}

impl ExpectedStatus {
    /// 解析配置值
    pub fn parse(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            other => Err(TopologyError::ConfigError(format!(
                "不支持的期望状态 {}，仅支持 'up' 或 'down'",
                other
            ))),
        }
    }

    /// 对应的 YANG 模型状态值
    ///
    /// 参考 RFC 2863: The Interfaces Group MIB - ifOperStatus
    pub fn oper_state(&self) -> &'static str {
        match self {
            Self::Up => "if-oper-state-ready",
            Self::Down => "if-oper-state-no-pass",
        }
    }
}

/// 检查配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckConfig {
    /// 可达性检查的目的地址
    #[serde(default)]
    pub destinations: Vec<String>,

    /// 要检查的接口名称
    #[serde(default)]
    pub interfaces: Vec<String>,

    /// 期望的接口运行状态（"up"/"down"）
    #[serde(default = "default_expected_status")]
    pub expected_status: String,
}

fn default_expected_status() -> String {
    "up".to_string()
}

impl CheckConfig {
    /// 从 YAML 文件加载检查配置
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// 从 YAML 字符串加载检查配置
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| TopologyError::ParseError(e.to_string()))
    }

    /// 导出为 YAML
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| TopologyError::ParseError(e.to_string()))
    }

    /// 校验配置（当前只校验期望状态取值）
    pub fn validate(&self) -> Result<()> {
        ExpectedStatus::parse(&self.expected_status)?;
        Ok(())
    }
}
