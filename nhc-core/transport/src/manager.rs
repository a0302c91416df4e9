//! 设备连接管理器

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::session::DeviceConnector;
use crate::{Result, TransportError};

/// 设备连接管理器
///
/// 按设备名称登记连接器，并持有设备调用的默认超时（30 秒）。
/// 连接器只负责建立会话；会话本身归各测试用例实例独占。
pub struct DeviceManager {
    connectors: HashMap<String, Arc<dyn DeviceConnector>>,
    default_timeout: Duration,
}

impl DeviceManager {
    pub fn new() -> Self {
        Self {
            connectors: HashMap::new(),
            default_timeout: Duration::from_secs(30),
        }
    }

    /// 设置默认超时
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// 登记设备连接器
    pub fn register(&mut self, connector: Arc<dyn DeviceConnector>) {
        debug!("登记设备连接器: {}", connector.device_name());
        self.connectors
            .insert(connector.device_name().to_string(), connector);
    }

    /// 查询设备连接器
    pub fn connector(&self, name: &str) -> Result<Arc<dyn DeviceConnector>> {
        self.connectors
            .get(name)
            .cloned()
            .ok_or_else(|| TransportError::DeviceNotFound(name.to_string()))
    }

    /// 默认超时
    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// 已登记的设备名称（字典序，保证遍历顺序确定）
    pub fn device_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.connectors.keys().cloned().collect();
        names.sort();
        names
    }

    /// 已登记的设备数量
    pub fn len(&self) -> usize {
        self.connectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connectors.is_empty()
    }
}

impl Default for DeviceManager {
    fn default() -> Self {
        Self::new()
    }
}
