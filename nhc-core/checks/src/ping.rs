//! 可达性检查
//!
//! 通过设备侧 ping 验证各目的地址可达：对每个目的地址调用一次
//! RESTCONF RPC，由设备自身发起探测。单个地址不可达不会抑制
//! 其余地址的检查。

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use nhc_engine::{
    LoopParam, RunContext, StepTracker, StepVerdict, Testcase, TestcaseFactory,
};
use nhc_transport::{DeviceManager, DeviceSession};

/// 设备侧 ping 的 RESTCONF RPC 路径
const PING_RPC_PATH: &str = "/restconf/operations/Cisco-IOS-XE-rpc:ping";

/// 可达性检查定义
pub struct ReachabilityCheck {
    devices: Arc<DeviceManager>,
    destinations: Vec<String>,
    default_device: Option<String>,
}

impl ReachabilityCheck {
    pub const NAME: &'static str = "reachability";

    pub fn new(devices: Arc<DeviceManager>, destinations: Vec<String>) -> Self {
        Self {
            devices,
            destinations,
            default_device: None,
        }
    }

    /// 未配置循环绑定时使用的默认目标设备
    pub fn with_default_device(mut self, device: &str) -> Self {
        self.default_device = Some(device.to_string());
        self
    }
}

impl TestcaseFactory for ReachabilityCheck {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn create(&self, param: Option<&LoopParam>) -> Box<dyn Testcase> {
        let device = param
            .and_then(|p| p.as_str().map(str::to_string))
            .or_else(|| self.default_device.clone());
        Box::new(ReachabilityCheckRun {
            devices: Arc::clone(&self.devices),
            device,
            destinations: self.destinations.clone(),
            session: None,
        })
    }
}

/// 可达性检查的一次实例执行
struct ReachabilityCheckRun {
    devices: Arc<DeviceManager>,
    device: Option<String>,
    destinations: Vec<String>,
    session: Option<Box<dyn DeviceSession>>,
}

#[async_trait]
impl Testcase for ReachabilityCheckRun {
    async fn setup(&mut self, _ctx: &RunContext, steps: &mut StepTracker) -> anyhow::Result<()> {
        let device = match self.device.clone() {
            Some(device) => device,
            None => {
                steps
                    .run_step("connect", false, async {
                        StepVerdict::failed("no target device bound and no default configured")
                    })
                    .await;
                return Ok(());
            }
        };

        let timeout = self.devices.default_timeout();
        let connector = self.devices.connector(&device);
        let session_slot = &mut self.session;

        steps
            .run_step("connect", false, async move {
                let connector = match connector {
                    Ok(connector) => connector,
                    Err(e) => return StepVerdict::failed(format!("{} not usable: {}", device, e)),
                };
                match connector.connect(timeout).await {
                    Ok(session) => {
                        *session_slot = Some(session);
                        StepVerdict::passed(format!("{} connected", device))
                    }
                    Err(e) => StepVerdict::failed(format!("{} connection failed: {}", device, e)),
                }
            })
            .await;
        Ok(())
    }

    async fn test(&mut self, _ctx: &RunContext, steps: &mut StepTracker) -> anyhow::Result<()> {
        let device = self.device.clone().unwrap_or_default();
        let session = self.session.as_deref();

        for destination in &self.destinations {
            steps
                .run_step(&format!("{} ping {}", device, destination), true, async move {
                    let session =
                        session.ok_or_else(|| anyhow::anyhow!("会话未建立即进入测试阶段"))?;
                    let payload = json!({
                        "Cisco-IOS-XE-rpc:input": { "destination": destination }
                    });
                    let response = match session.invoke(PING_RPC_PATH, payload).await {
                        Ok(response) => response,
                        Err(e) => {
                            return StepVerdict::failed(format!(
                                "ping {} failed: {}",
                                destination, e
                            ))
                        }
                    };
                    if !response.ok {
                        return StepVerdict::failed(format!(
                            "ping {} failed:\n{}",
                            destination, response.text
                        ));
                    }

                    let result = response.body["Cisco-IOS-XE-rpc:output"]["result"]
                        .as_str()
                        .unwrap_or_default();
                    if result.contains("Success rate is 100") {
                        StepVerdict::passed(format!("{} reachable", destination))
                    } else {
                        StepVerdict::failed(format!(
                            "{} unreachable: {}",
                            destination,
                            result.trim()
                        ))
                    }
                })
                .await;
        }
        Ok(())
    }

    async fn cleanup(&mut self, _ctx: &RunContext, steps: &mut StepTracker) -> anyhow::Result<()> {
        // 只释放确实建立过的会话
        if let Some(session) = self.session.take() {
            steps
                .run_step("disconnect", true, async move {
                    match session.disconnect().await {
                        Ok(()) => {
                            StepVerdict::passed(format!("{} disconnected", session.device_name()))
                        }
                        Err(e) => StepVerdict::failed(format!("disconnect failed: {}", e)),
                    }
                })
                .await;
        }
        Ok(())
    }
}
