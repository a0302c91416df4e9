//! NHC 检查项
//!
//! 基于引擎契约实现的具体网络健康检查：接口运行状态检查、
//! 可达性检查，以及运行级公共准备（输入校验）。

pub mod interface;
pub mod ping;
pub mod precheck;

pub use interface::InterfaceCheck;
pub use ping::ReachabilityCheck;
pub use precheck::RunPrecheck;

use std::sync::Arc;

use nhc_topology::Testbed;
use nhc_transport::{DeviceManager, RestconfConfig, RestconfConnector};

/// 由测试床构建 RESTCONF 设备管理器
///
/// 每台设备登记一个连接器；会话在各检查项的准备阶段建立。
pub fn device_manager_from_testbed(testbed: &Testbed) -> DeviceManager {
    let mut manager = DeviceManager::new();
    for (name, device) in &testbed.devices {
        let config = RestconfConfig {
            host: device.host.clone(),
            port: device.port,
            username: device.username.clone(),
            password: device.password.clone(),
            verify_ssl: device.verify_ssl,
            request_timeout: 30,
        };
        manager.register(Arc::new(RestconfConnector::new(name, config)));
    }
    manager
}
