//! 测试床定义
//!
//! 测试床描述一次运行可触达的目标设备集合及其 RESTCONF 接入参数。

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Result, TopologyError};

/// 设备接入配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// 设备地址（主机名或 IP）
    pub host: String,

    /// HTTPS 端口（默认: 443）
    #[serde(default = "default_port")]
    pub port: u16,

    /// 用户名
    pub username: String,

    /// 密码
    pub password: String,

    /// 是否验证 SSL 证书（默认: false）
    #[serde(default)]
    pub verify_ssl: bool,

    /// 操作系统标识（如 "iosxe"，仅作记录）
    #[serde(default)]
    pub os: Option<String>,
}

fn default_port() -> u16 {
    443
}

/// 测试床
///
/// 设备集合使用 BTreeMap，保证按名称字典序的确定性遍历顺序。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Testbed {
    /// 测试床名称
    pub name: String,

    /// 目标设备集合
    #[serde(default)]
    pub devices: BTreeMap<String, DeviceConfig>,
}

impl Testbed {
    /// 从 YAML 文件加载测试床
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// 从 YAML 字符串加载测试床
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| TopologyError::ParseError(e.to_string()))
    }

    /// 导出为 YAML
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| TopologyError::ParseError(e.to_string()))
    }

    /// 查询设备配置
    pub fn device(&self, name: &str) -> Result<&DeviceConfig> {
        self.devices
            .get(name)
            .ok_or_else(|| TopologyError::DeviceNotFound(name.to_string()))
    }

    /// 设备名称（字典序）
    pub fn device_names(&self) -> Vec<String> {
        self.devices.keys().cloned().collect()
    }

    /// 校验测试床可用（至少包含一台设备）
    pub fn validate(&self) -> Result<()> {
        if self.devices.is_empty() {
            return Err(TopologyError::ConfigError(
                "测试床不包含任何设备".to_string(),
            ));
        }
        Ok(())
    }
}
