//! 测试运行器
//!
//! 驱动固定阶段序列：公共准备一次 → 每个实例依次 准备 → 测试 → 清理。
//! 上游失败触发跳过，清理保证执行，未预期错误被限制在所属实例内。

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{error, info, warn};

use nhc_common::{PhaseKind, PhaseReport, RunReport, TestcaseReport};

use crate::registry::LoopRegistry;
use crate::step::StepTracker;
use crate::testcase::{CommonSetup, TestcaseFactory, TestcaseInstance};

/// 运行级上下文
///
/// 每次运行创建一次，按引用传入所有阶段。
#[derive(Debug, Clone)]
pub struct RunContext {
    /// 运行名称
    pub run_name: String,

    /// 开始时间
    pub started_at: DateTime<Utc>,
}

impl RunContext {
    pub fn new(run_name: &str) -> Self {
        Self {
            run_name: run_name.to_string(),
            started_at: Utc::now(),
        }
    }
}

/// 测试运行器
pub struct TestRunner {
    /// 公共准备（可选）
    common_setup: Option<Arc<dyn CommonSetup>>,

    /// 测试用例定义（按登记顺序执行）
    factories: Vec<Arc<dyn TestcaseFactory>>,

    /// 循环绑定注册表
    registry: LoopRegistry,
}

impl TestRunner {
    pub fn new() -> Self {
        Self {
            common_setup: None,
            factories: Vec::new(),
            registry: LoopRegistry::new(),
        }
    }

    /// 设置公共准备
    pub fn with_common_setup(mut self, common_setup: Arc<dyn CommonSetup>) -> Self {
        self.common_setup = Some(common_setup);
        self
    }

    /// 登记测试用例定义
    pub fn register(&mut self, factory: Arc<dyn TestcaseFactory>) {
        self.factories.push(factory);
    }

    /// 登记循环绑定（运行开始前调用，后写覆盖）
    pub fn mark_loop(&mut self, testcase: &str, param: &str, values: Vec<Value>) {
        self.registry.mark(testcase, param, values);
    }

    /// 执行一次完整运行
    ///
    /// 实例严格串行且相互独立；任何实例内部的未预期错误都被限制在
    /// 该实例内，不会中断后续实例或整个运行。返回完整的运行报告。
    pub async fn run(&self, run_name: &str) -> RunReport {
        let start = Instant::now();
        let ctx = RunContext::new(run_name);
        let mut report = RunReport::new(run_name);
        report.started_at = ctx.started_at;

        info!("开始执行测试运行: {}", run_name);

        // 公共准备阶段（一次，所有实例共享结论）
        let mut common_failure: Option<String> = None;
        if let Some(common_setup) = &self.common_setup {
            let mut steps = StepTracker::new();
            if let Err(e) = common_setup.run(&ctx, &mut steps).await {
                error!("公共准备阶段出现未预期错误: {}", e);
                steps.record_fault(PhaseKind::CommonSetup.name(), &e);
            }
            // 公共准备自身占用的资源在此释放，未占用时为空实现
            if let Err(e) = common_setup.release(&ctx, &mut steps).await {
                warn!("公共准备资源释放出现未预期错误: {}", e);
                steps.record_fault("release", &e);
            }

            let phase = PhaseReport::from_steps(PhaseKind::CommonSetup, steps.into_records());
            if phase.status.is_problem() {
                common_failure = Some(
                    phase
                        .failure_message()
                        .unwrap_or("公共准备阶段未通过")
                        .to_string(),
                );
            }
            report.common_setup = Some(phase);
        }

        // 展开实例并依次执行
        let instances = self.registry.expand(&self.factories);
        info!("展开 {} 个测试用例实例", instances.len());

        for mut instance in instances {
            let testcase_report = match &common_failure {
                Some(reason) => {
                    warn!("实例 {} 跳过: 公共准备阶段未通过", instance.name);
                    TestcaseReport::skipped(
                        &instance.name,
                        format!("公共准备阶段未通过: {}", reason),
                    )
                }
                None => self.run_instance(&ctx, &mut instance).await,
            };
            report.testcases.push(testcase_report);
        }

        report.duration_ms = start.elapsed().as_millis() as u64;
        report.recompute_status();

        info!(
            "测试运行完成: {} - {}/{} 实例通过, 结论: {}",
            run_name,
            report.passed_count(),
            report.testcases.len(),
            report.status.display_name()
        );

        report
    }

    /// 执行单个实例（核心阶段序列）
    async fn run_instance(
        &self,
        ctx: &RunContext,
        instance: &mut TestcaseInstance,
    ) -> TestcaseReport {
        info!("执行测试用例实例: {}", instance.name);
        let mut phases = Vec::new();

        // 准备阶段
        let mut steps = StepTracker::new();
        if let Err(e) = instance.testcase.setup(ctx, &mut steps).await {
            error!("实例 {} 准备阶段出现未预期错误: {}", instance.name, e);
            steps.record_fault(PhaseKind::Setup.name(), &e);
        }
        let setup_phase = PhaseReport::from_steps(PhaseKind::Setup, steps.into_records());
        let setup_problem = setup_phase.status.is_problem();
        let setup_reason = setup_phase.failure_message().map(str::to_string);
        phases.push(setup_phase);

        // 测试阶段（准备未通过时整体跳过，不影响清理）
        if setup_problem {
            let reason = setup_reason.as_deref().unwrap_or("准备阶段未通过");
            warn!("实例 {} 测试阶段跳过: {}", instance.name, reason);
            phases.push(PhaseReport::skipped(
                PhaseKind::Test,
                format!("准备阶段未通过: {}", reason),
            ));
        } else {
            let mut steps = StepTracker::new();
            if let Err(e) = instance.testcase.test(ctx, &mut steps).await {
                error!("实例 {} 测试阶段出现未预期错误: {}", instance.name, e);
                steps.record_fault(PhaseKind::Test.name(), &e);
            }
            phases.push(PhaseReport::from_steps(PhaseKind::Test, steps.into_records()));
        }

        // 清理阶段（无论前序结果如何都执行一次）
        let mut steps = StepTracker::new();
        if let Err(e) = instance.testcase.cleanup(ctx, &mut steps).await {
            error!("实例 {} 清理阶段出现未预期错误: {}", instance.name, e);
            steps.record_fault(PhaseKind::Cleanup.name(), &e);
        }
        phases.push(PhaseReport::from_steps(
            PhaseKind::Cleanup,
            steps.into_records(),
        ));

        TestcaseReport::from_phases(&instance.name, phases)
    }
}

impl Default for TestRunner {
    fn default() -> Self {
        Self::new()
    }
}
