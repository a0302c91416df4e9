//! RESTCONF 设备连接实现

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, info};

use crate::session::{ConnectionState, DeviceConnector, DeviceSession, RestResponse};
use crate::{Result, TransportError};

/// RESTCONF 连接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestconfConfig {
    /// 设备地址
    pub host: String,

    /// HTTPS 端口（默认: 443）
    #[serde(default = "default_port")]
    pub port: u16,

    /// 用户名
    pub username: String,

    /// 密码
    pub password: String,

    /// 是否验证 SSL 证书（默认: false，实验设备多为自签名证书）
    #[serde(default)]
    pub verify_ssl: bool,

    /// 单次请求超时（秒，默认: 30）
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

fn default_port() -> u16 {
    443
}

fn default_request_timeout() -> u64 {
    30
}

impl RestconfConfig {
    /// 请求超时
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// API 基础 URL
    pub fn base_url(&self) -> String {
        format!("https://{}:{}", self.host, self.port)
    }
}

/// RESTCONF 连接器
pub struct RestconfConnector {
    /// 设备名称
    name: String,

    /// 连接配置
    config: RestconfConfig,
}

impl RestconfConnector {
    /// 连接探测路径（RESTCONF 能力列表，支持 RESTCONF 的设备都会响应）
    const PROBE_PATH: &'static str =
        "/restconf/data/ietf-restconf-monitoring:restconf-state/capabilities";

    pub fn new(name: &str, config: RestconfConfig) -> Self {
        Self {
            name: name.to_string(),
            config,
        }
    }

    /// 连接配置
    pub fn config(&self) -> &RestconfConfig {
        &self.config
    }
}

#[async_trait]
impl DeviceConnector for RestconfConnector {
    async fn connect(&self, connect_timeout: Duration) -> Result<Box<dyn DeviceSession>> {
        info!("连接设备: {} ({})", self.name, self.config.base_url());

        let client = Client::builder()
            .timeout(self.config.request_timeout())
            .connect_timeout(connect_timeout)
            .danger_accept_invalid_certs(!self.config.verify_ssl)
            .build()
            .map_err(|e| TransportError::HttpError(e.to_string()))?;

        let session = RestconfSession {
            name: self.name.clone(),
            base_url: self.config.base_url(),
            username: self.config.username.clone(),
            password: self.config.password.clone(),
            client,
            state: Arc::new(Mutex::new(ConnectionState::Connecting)),
            request_timeout: self.config.request_timeout(),
        };

        // 通过能力探测验证可达性与凭据
        let response = match timeout(connect_timeout, session.get(Self::PROBE_PATH)).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                *session.state.lock().await = ConnectionState::Failed;
                return Err(e);
            }
            Err(_) => {
                *session.state.lock().await = ConnectionState::Failed;
                return Err(TransportError::Timeout);
            }
        };

        if response.status == 401 || response.status == 403 {
            *session.state.lock().await = ConnectionState::Failed;
            return Err(TransportError::AuthFailed(format!(
                "设备 {} 拒绝凭据 (HTTP {})",
                self.name, response.status
            )));
        }
        if !response.ok {
            *session.state.lock().await = ConnectionState::Failed;
            return Err(TransportError::ConnectionFailed(format!(
                "设备 {} 探测失败 (HTTP {})",
                self.name, response.status
            )));
        }

        *session.state.lock().await = ConnectionState::Connected;
        info!("成功连接到设备: {}", self.name);

        Ok(Box::new(session))
    }

    fn device_name(&self) -> &str {
        &self.name
    }
}

/// RESTCONF 会话
pub struct RestconfSession {
    name: String,
    base_url: String,
    username: String,
    password: String,
    client: Client,
    state: Arc<Mutex<ConnectionState>>,
    request_timeout: Duration,
}

impl RestconfSession {
    /// 执行一次 GET（不校验连接状态，连接探测也走这里）
    async fn get(&self, path: &str) -> Result<RestResponse> {
        let url = format!("{}{}", self.base_url, path);
        debug!("RESTCONF 请求: GET {}", url);

        let response = self
            .client
            .get(&url)
            .basic_auth(&self.username, Some(&self.password))
            .header("Accept", "application/yang-data+json")
            .send()
            .await
            .map_err(map_send_error)?;

        into_rest_response(response).await
    }

    async fn ensure_connected(&self) -> Result<()> {
        if *self.state.lock().await != ConnectionState::Connected {
            return Err(TransportError::Disconnected);
        }
        Ok(())
    }
}

#[async_trait]
impl DeviceSession for RestconfSession {
    async fn query(&self, path: &str) -> Result<RestResponse> {
        self.ensure_connected().await?;
        match timeout(self.request_timeout, self.get(path)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout),
        }
    }

    async fn invoke(&self, path: &str, payload: Value) -> Result<RestResponse> {
        self.ensure_connected().await?;
        let url = format!("{}{}", self.base_url, path);
        debug!("RESTCONF 请求: POST {}", url);

        let request = self
            .client
            .post(&url)
            .basic_auth(&self.username, Some(&self.password))
            .header("Accept", "application/yang-data+json")
            .header("Content-Type", "application/yang-data+json")
            .json(&payload);

        match timeout(self.request_timeout, request.send()).await {
            Ok(Ok(response)) => into_rest_response(response).await,
            Ok(Err(e)) => Err(map_send_error(e)),
            Err(_) => Err(TransportError::Timeout),
        }
    }

    async fn disconnect(&self) -> Result<()> {
        // RESTCONF 基于无状态 HTTP，断开只需标记状态并停止复用客户端
        info!("断开设备连接: {}", self.name);
        *self.state.lock().await = ConnectionState::Disconnected;
        Ok(())
    }

    fn device_name(&self) -> &str {
        &self.name
    }
}

fn map_send_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::ConnectionFailed(e.to_string())
    }
}

async fn into_rest_response(response: reqwest::Response) -> Result<RestResponse> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| TransportError::HttpError(e.to_string()))?;
    let body = serde_json::from_str(&text).unwrap_or(Value::Null);

    Ok(RestResponse {
        ok: status.is_success(),
        status: status.as_u16(),
        body,
        text,
    })
}
