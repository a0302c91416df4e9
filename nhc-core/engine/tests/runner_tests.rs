//! 引擎集成测试
//!
//! 使用脚本化的测试用例验证完整阶段序列的关键性质：
//! 清理始终执行、上游失败触发跳过、实例相互独立、聚合结论正确。

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use nhc_common::{PhaseKind, TestStatus};
use nhc_engine::{
    CommonSetup, LoopParam, RunContext, StepTracker, StepVerdict, TestRunner, Testcase,
    TestcaseFactory,
};

/// 单个阶段的脚本化结论
#[derive(Clone, Copy, PartialEq)]
enum Script {
    Pass,
    Fail,
    Fault,
}

/// 脚本化测试用例：按设备名决定各阶段行为，并记录清理调用
struct ScriptedCase {
    device: String,
    setup: Script,
    fail_devices: Vec<String>,
    fault_device: Option<String>,
    log: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl Testcase for ScriptedCase {
    async fn setup(&mut self, _ctx: &RunContext, steps: &mut StepTracker) -> anyhow::Result<()> {
        if self.setup == Script::Fault {
            anyhow::bail!("connection library exploded");
        }
        let script = self.setup;
        steps
            .run_step("connect", false, async move {
                match script {
                    Script::Pass => StepVerdict::passed("connected"),
                    Script::Fail => StepVerdict::failed("device unreachable"),
                    Script::Fault => unreachable!(),
                }
            })
            .await;
        Ok(())
    }

    async fn test(&mut self, _ctx: &RunContext, steps: &mut StepTracker) -> anyhow::Result<()> {
        if self.fault_device.as_deref() == Some(self.device.as_str()) {
            anyhow::bail!("test body exploded");
        }

        let device = self.device.clone();
        steps
            .run_step(
                &format!("{} interface GigabitEthernet1", device),
                true,
                async { StepVerdict::passed("GigabitEthernet1 status if-oper-state-ready") },
            )
            .await;

        let fail_second = self.fail_devices.iter().any(|d| d == &self.device);
        steps
            .run_step(
                &format!("{} interface GigabitEthernet2", device),
                true,
                async move {
                    if fail_second {
                        StepVerdict::failed(
                            "GigabitEthernet2 status if-oper-state-no-pass different from expected status if-oper-state-ready",
                        )
                    } else {
                        StepVerdict::passed("GigabitEthernet2 status if-oper-state-ready")
                    }
                },
            )
            .await;
        Ok(())
    }

    async fn cleanup(&mut self, _ctx: &RunContext, steps: &mut StepTracker) -> anyhow::Result<()> {
        self.log
            .lock()
            .unwrap()
            .push(format!("cleanup:{}", self.device));
        steps
            .run_step("disconnect", true, async { StepVerdict::passed("disconnected") })
            .await;
        Ok(())
    }
}

struct ScriptedFactory {
    name: String,
    setup: Script,
    fail_devices: Vec<String>,
    fault_device: Option<String>,
    log: Arc<Mutex<Vec<String>>>,
}

impl ScriptedFactory {
    fn new(name: &str, log: &Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            name: name.to_string(),
            setup: Script::Pass,
            fail_devices: Vec::new(),
            fault_device: None,
            log: Arc::clone(log),
        }
    }

    fn with_setup(mut self, setup: Script) -> Self {
        self.setup = setup;
        self
    }

    fn with_fail_device(mut self, device: &str) -> Self {
        self.fail_devices.push(device.to_string());
        self
    }

    fn with_fault_device(mut self, device: &str) -> Self {
        self.fault_device = Some(device.to_string());
        self
    }
}

impl TestcaseFactory for ScriptedFactory {
    fn name(&self) -> &str {
        &self.name
    }

    fn create(&self, param: Option<&LoopParam>) -> Box<dyn Testcase> {
        let device = param
            .and_then(|p| p.as_str())
            .unwrap_or("default")
            .to_string();
        Box::new(ScriptedCase {
            device,
            setup: self.setup,
            fail_devices: self.fail_devices.clone(),
            fault_device: self.fault_device.clone(),
            log: Arc::clone(&self.log),
        })
    }
}

/// 脚本化公共准备：可失败/出错，并记录资源释放调用
struct ScriptedCommon {
    script: Script,
    released: Arc<Mutex<bool>>,
}

#[async_trait]
impl CommonSetup for ScriptedCommon {
    async fn run(&self, _ctx: &RunContext, steps: &mut StepTracker) -> anyhow::Result<()> {
        let script = self.script;
        steps
            .run_step("topology_check", false, async move {
                match script {
                    Script::Pass => StepVerdict::passed("topology loaded"),
                    Script::Fail => StepVerdict::failed("topology invalid"),
                    Script::Fault => anyhow::bail!("topology loader exploded"),
                }
            })
            .await;
        Ok(())
    }

    async fn release(&self, _ctx: &RunContext, _steps: &mut StepTracker) -> anyhow::Result<()> {
        *self.released.lock().unwrap() = true;
        Ok(())
    }
}

fn cleanup_count(log: &Arc<Mutex<Vec<String>>>) -> usize {
    log.lock()
        .unwrap()
        .iter()
        .filter(|e| e.starts_with("cleanup:"))
        .count()
}

#[tokio::test]
async fn test_cleanup_runs_once_for_every_setup_outcome() {
    for setup in [Script::Pass, Script::Fail, Script::Fault] {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut runner = TestRunner::new();
        runner.register(Arc::new(
            ScriptedFactory::new("case", &log).with_setup(setup),
        ));

        let report = runner.run("cleanup-run").await;

        assert_eq!(cleanup_count(&log), 1);
        let case = &report.testcases[0];
        let cleanup = case
            .phases
            .iter()
            .find(|p| p.kind == PhaseKind::Cleanup)
            .unwrap();
        assert_eq!(cleanup.status, TestStatus::Passed);
    }
}

#[tokio::test]
async fn test_setup_failure_skips_test_phase() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut runner = TestRunner::new();
    runner.register(Arc::new(
        ScriptedFactory::new("case", &log).with_setup(Script::Fail),
    ));

    let report = runner.run("setup-failure").await;
    let case = &report.testcases[0];

    let setup = case
        .phases
        .iter()
        .find(|p| p.kind == PhaseKind::Setup)
        .unwrap();
    assert_eq!(setup.status, TestStatus::Failed);

    let test = case
        .phases
        .iter()
        .find(|p| p.kind == PhaseKind::Test)
        .unwrap();
    assert_eq!(test.status, TestStatus::Skipped);
    assert!(test.steps.is_empty());
    assert!(test
        .message
        .as_deref()
        .unwrap()
        .contains("device unreachable"));

    assert_eq!(case.status, TestStatus::Failed);
}

#[tokio::test]
async fn test_setup_fault_contained_and_cleanup_still_runs() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut runner = TestRunner::new();
    runner.register(Arc::new(
        ScriptedFactory::new("case", &log).with_setup(Script::Fault),
    ));

    let report = runner.run("setup-fault").await;
    let case = &report.testcases[0];

    let setup = case
        .phases
        .iter()
        .find(|p| p.kind == PhaseKind::Setup)
        .unwrap();
    assert_eq!(setup.status, TestStatus::Errored);
    assert!(setup.steps[0].message.contains("connection library exploded"));

    assert_eq!(cleanup_count(&log), 1);
    assert_eq!(case.status, TestStatus::Errored);
}

#[tokio::test]
async fn test_end_to_end_two_devices_aggregate_failed() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let common_released = Arc::new(Mutex::new(false));

    let mut runner = TestRunner::new().with_common_setup(Arc::new(ScriptedCommon {
        script: Script::Pass,
        released: Arc::clone(&common_released),
    }));
    // 两台设备的第二个接口都不符合期望状态
    runner.register(Arc::new(
        ScriptedFactory::new("interface_status", &log)
            .with_fail_device("sw01")
            .with_fail_device("sw02"),
    ));
    runner.mark_loop("interface_status", "device", vec![json!("sw01"), json!("sw02")]);

    let report = runner.run("nightly").await;

    assert_eq!(report.status, TestStatus::Failed);
    assert_eq!(report.testcases.len(), 2);
    assert_eq!(report.common_setup.as_ref().unwrap().status, TestStatus::Passed);

    // 执行顺序与取值顺序一致
    assert_eq!(report.testcases[0].name, "interface_status[device=sw01]");
    assert_eq!(report.testcases[1].name, "interface_status[device=sw02]");

    // 两个实例: 接口 1 通过, 接口 2 失败 (continue_on_failure 下仍执行)
    for case in &report.testcases {
        let test = case
            .phases
            .iter()
            .find(|p| p.kind == PhaseKind::Test)
            .unwrap();
        assert_eq!(test.steps[0].status, TestStatus::Passed);
        assert_eq!(test.steps[1].status, TestStatus::Failed);
        assert_eq!(test.status, TestStatus::Failed);
    }

    // 两个实例都执行了清理
    assert_eq!(cleanup_count(&log), 2);
    assert!(*common_released.lock().unwrap());
}

#[tokio::test]
async fn test_instance_fault_does_not_abort_run() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut runner = TestRunner::new();
    runner.register(Arc::new(
        ScriptedFactory::new("interface_status", &log).with_fault_device("sw01"),
    ));
    runner.mark_loop("interface_status", "device", vec![json!("sw01"), json!("sw02")]);

    let report = runner.run("fault-run").await;

    assert_eq!(report.testcases[0].status, TestStatus::Errored);
    assert_eq!(report.testcases[1].status, TestStatus::Passed);
    assert_eq!(report.status, TestStatus::Errored);

    // 两个实例的清理都执行了
    assert_eq!(cleanup_count(&log), 2);
}

#[tokio::test]
async fn test_common_setup_failure_skips_all_instances() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let common_released = Arc::new(Mutex::new(false));

    let mut runner = TestRunner::new().with_common_setup(Arc::new(ScriptedCommon {
        script: Script::Fault,
        released: Arc::clone(&common_released),
    }));
    runner.register(Arc::new(ScriptedFactory::new("interface_status", &log)));
    runner.mark_loop("interface_status", "device", vec![json!("sw01"), json!("sw02")]);

    let report = runner.run("common-fault").await;

    assert_eq!(report.common_setup.as_ref().unwrap().status, TestStatus::Errored);
    assert_eq!(report.status, TestStatus::Errored);

    for case in &report.testcases {
        assert_eq!(case.status, TestStatus::Skipped);
        assert!(case.phases.is_empty());
        assert!(case
            .message
            .as_deref()
            .unwrap()
            .contains("topology loader exploded"));
    }

    // 实例阶段未执行: 未占用的资源不产生清理动作
    assert_eq!(cleanup_count(&log), 0);

    // 公共准备自身的资源仍然被释放
    assert!(*common_released.lock().unwrap());
}

#[tokio::test]
async fn test_empty_loop_yields_vacuous_pass() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut runner = TestRunner::new();
    runner.register(Arc::new(ScriptedFactory::new("interface_status", &log)));
    runner.mark_loop("interface_status", "device", vec![]);

    let report = runner.run("empty-loop").await;

    assert!(report.testcases.is_empty());
    assert_eq!(report.status, TestStatus::Passed);
}

#[tokio::test]
async fn test_instance_results_are_independent() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut runner = TestRunner::new();
    runner.register(Arc::new(
        ScriptedFactory::new("interface_status", &log).with_fail_device("sw02"),
    ));
    runner.mark_loop(
        "interface_status",
        "device",
        vec![json!("sw01"), json!("sw02"), json!("sw03")],
    );

    let report = runner.run("independence").await;

    assert_eq!(report.testcases[0].status, TestStatus::Passed);
    assert_eq!(report.testcases[1].status, TestStatus::Failed);
    assert_eq!(report.testcases[2].status, TestStatus::Passed);
}
