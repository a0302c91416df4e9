//! CLI 配置管理
//!
//! **数据存储方式**: TOML 文件 (~/.config/nhc/config.toml)
//! 只保存默认文件路径这类轻量偏好，运行输入始终来自测试床与
//! 检查配置文件本身。

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// CLI 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// 默认测试床文件
    pub default_testbed: Option<String>,

    /// 默认检查配置文件
    pub default_checks: Option<String>,

    /// 配置版本
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_version() -> String {
    "1.0".to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            default_testbed: Some("testbed.yaml".to_string()),
            default_checks: Some("checks.yaml".to_string()),
            version: default_version(),
        }
    }
}

impl CliConfig {
    /// 获取配置文件路径
    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("无法获取用户主目录")?;
        Ok(home.join(".config").join("nhc").join("config.toml"))
    }

    /// 加载配置
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("读取配置文件失败: {}", path.display()))?;
        toml::from_str(&content).context("解析配置文件失败")
    }

    /// 保存配置
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// 解析测试床路径（命令行参数优先于配置文件）
    pub fn resolve_testbed(&self, arg: Option<String>) -> String {
        arg.or_else(|| self.default_testbed.clone())
            .unwrap_or_else(|| "testbed.yaml".to_string())
    }

    /// 解析检查配置路径（命令行参数优先于配置文件）
    pub fn resolve_checks(&self, arg: Option<String>) -> String {
        arg.or_else(|| self.default_checks.clone())
            .unwrap_or_else(|| "checks.yaml".to_string())
    }
}
