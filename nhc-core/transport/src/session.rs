//! 设备会话契约

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::Result;

/// 连接状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// 未连接
    Disconnected,
    /// 连接中
    Connecting,
    /// 已连接
    Connected,
    /// 连接失败
    Failed,
}

/// REST 响应
///
/// HTTP 非 2xx 不视为传输错误：`ok` 为 false，由调用方决定结论。
/// 传输层面的失败（不可达、超时）才以错误返回。
#[derive(Debug, Clone)]
pub struct RestResponse {
    /// 状态码是否为 2xx
    pub ok: bool,

    /// HTTP 状态码
    pub status: u16,

    /// 响应体（JSON 解析失败时为 Null）
    pub body: Value,

    /// 响应原文
    pub text: String,
}

/// 设备会话
///
/// 由 [`DeviceConnector::connect`] 建立，归单个测试用例实例独占，
/// 在其清理阶段释放。
#[async_trait]
pub trait DeviceSession: Send + Sync {
    /// 查询资源路径 (GET)
    async fn query(&self, path: &str) -> Result<RestResponse>;

    /// 调用操作 (POST)
    async fn invoke(&self, path: &str, payload: Value) -> Result<RestResponse>;

    /// 断开连接（尽力而为，失败只记录不升级）
    async fn disconnect(&self) -> Result<()>;

    /// 设备名称
    fn device_name(&self) -> &str;
}

/// 设备连接器
#[async_trait]
pub trait DeviceConnector: Send + Sync {
    /// 建立会话，超时由调用方指定
    async fn connect(&self, timeout: Duration) -> Result<Box<dyn DeviceSession>>;

    /// 设备名称
    fn device_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rest_response_ok_flag() {
        let response = RestResponse {
            ok: true,
            status: 200,
            body: json!({"data": {}}),
            text: "{\"data\": {}}".to_string(),
        };
        assert!(response.ok);
        assert_eq!(response.status, 200);

        let response = RestResponse {
            ok: false,
            status: 404,
            body: Value::Null,
            text: "not found".to_string(),
        };
        assert!(!response.ok);
    }

    #[test]
    fn test_connection_state_transitions() {
        assert_ne!(ConnectionState::Connected, ConnectionState::Disconnected);
        assert_eq!(ConnectionState::Connecting, ConnectionState::Connecting);
    }
}
