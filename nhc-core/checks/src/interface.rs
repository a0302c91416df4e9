//! 接口运行状态检查
//!
//! 对每台目标设备：建立 RESTCONF 会话，获取接口运行状态，
//! 逐接口与期望状态比对。单个接口不符不会抑制其余接口的检查。

use std::sync::Arc;

use async_trait::async_trait;

use nhc_common::TestStatus;
use nhc_engine::{
    LoopParam, RunContext, StepTracker, StepVerdict, Testcase, TestcaseFactory,
};
use nhc_topology::ExpectedStatus;
use nhc_transport::{DeviceManager, DeviceSession};

/// 接口运行状态数据的 RESTCONF 路径
const INTERFACES_OPER_PATH: &str = "/restconf/data/Cisco-IOS-XE-interfaces-oper:interfaces/";

/// 接口运行状态检查定义
pub struct InterfaceCheck {
    devices: Arc<DeviceManager>,
    interfaces: Vec<String>,
    expected_status: String,
    default_device: Option<String>,
}

impl InterfaceCheck {
    pub const NAME: &'static str = "interface_status";

    pub fn new(devices: Arc<DeviceManager>, interfaces: Vec<String>, expected_status: &str) -> Self {
        Self {
            devices,
            interfaces,
            expected_status: expected_status.to_string(),
            default_device: None,
        }
    }

    /// 未配置循环绑定时使用的默认目标设备
    pub fn with_default_device(mut self, device: &str) -> Self {
        self.default_device = Some(device.to_string());
        self
    }
}

impl TestcaseFactory for InterfaceCheck {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn create(&self, param: Option<&LoopParam>) -> Box<dyn Testcase> {
        let device = param
            .and_then(|p| p.as_str().map(str::to_string))
            .or_else(|| self.default_device.clone());
        Box::new(InterfaceCheckRun {
            devices: Arc::clone(&self.devices),
            device,
            interfaces: self.interfaces.clone(),
            expected_status: self.expected_status.clone(),
            session: None,
            collected: Vec::new(),
        })
    }
}

/// 接口检查的一次实例执行
struct InterfaceCheckRun {
    devices: Arc<DeviceManager>,
    device: Option<String>,
    interfaces: Vec<String>,
    expected_status: String,
    session: Option<Box<dyn DeviceSession>>,
    /// 测试阶段收集到的接口数据 (名称, 运行状态)
    collected: Vec<(String, String)>,
}

#[async_trait]
impl Testcase for InterfaceCheckRun {
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
                    // 设备未在测试床登记属于配置问题，在触碰网络前即失败
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
        // 期望状态在触碰设备之前校验；非法取值是失败结论而不是运行时错误
        let mut expected_oper: Option<&'static str> = None;
        {
            let slot = &mut expected_oper;
            let expected = self.expected_status.clone();
            steps
                .run_step("validate_expected_status", false, async move {
                    match ExpectedStatus::parse(&expected) {
                        Ok(status) => {
                            *slot = Some(status.oper_state());
                            StepVerdict::passed(format!(
                                "expected status {} maps to {}",
                                expected,
                                status.oper_state()
                            ))
                        }
                        Err(e) => StepVerdict::failed(e.to_string()),
                    }
                })
                .await;
        }

        // 获取接口运行状态（校验未通过时此步骤被自动跳过，不触碰设备）
        let retrieve_status = {
            let session = self.session.as_deref();
            let interfaces = self.interfaces.clone();
            let slot = &mut self.collected;
            steps
                .run_step("retrieve_interface_status", false, async move {
                    let session =
                        session.ok_or_else(|| anyhow::anyhow!("会话未建立即进入测试阶段"))?;
                    let response = match session.query(INTERFACES_OPER_PATH).await {
                        Ok(response) => response,
                        Err(e) => {
                            return StepVerdict::failed(format!(
                                "Retrieving interface status failed: {}",
                                e
                            ))
                        }
                    };
                    if !response.ok {
                        return StepVerdict::failed(format!(
                            "Retrieving interface status failed:\n{}",
                            response.text
                        ));
                    }

                    let list = response.body["Cisco-IOS-XE-interfaces-oper:interfaces"]
                        ["interface"]
                        .as_array()
                        .cloned()
                        .unwrap_or_default();
                    for item in &list {
                        let name = item["name"].as_str().unwrap_or_default();
                        if interfaces.iter().any(|i| i == name) {
                            slot.push((
                                name.to_string(),
                                item["oper-status"].as_str().unwrap_or("unknown").to_string(),
                            ));
                        }
                    }
                    StepVerdict::passed("Interfaces retrieved")
                })
                .await
        };

        if retrieve_status != TestStatus::Passed {
            return Ok(());
        }

        // 逐接口比对；单接口失败不抑制其余接口的检查
        let device = self.device.clone().unwrap_or_default();
        let expected_oper = expected_oper.unwrap_or_default();
        let collected = std::mem::take(&mut self.collected);
        for (name, oper) in &collected {
            let verdict = if oper == expected_oper {
                StepVerdict::passed(format!("{} status {}", name, oper))
            } else {
                StepVerdict::failed(format!(
                    "{} status {} different from expected status {}",
                    name, oper, expected_oper
                ))
            };
            steps
                .run_step(&format!("{} interface {}", device, name), true, async move {
                    verdict
                })
                .await;
        }
        Ok(())
    }

    async fn cleanup(&mut self, _ctx: &RunContext, steps: &mut StepTracker) -> anyhow::Result<()> {
        // 只释放确实建立过的会话；未建立连接时清理阶段无事可做
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
