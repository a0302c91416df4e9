//! 基础运行示例
//!
//! 演示如何注册测试用例、登记循环绑定并执行一次完整运行

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use nhc_engine::{
    LoopParam, RunContext, StepTracker, StepVerdict, TestRunner, Testcase, TestcaseFactory,
};

/// 演示用测试用例：对绑定的设备执行两个检查步骤
struct DemoCase {
    device: String,
}

#[async_trait]
impl Testcase for DemoCase {
    async fn setup(&mut self, _ctx: &RunContext, steps: &mut StepTracker) -> anyhow::Result<()> {
        let device = self.device.clone();
        steps
            .run_step("connect", false, async move {
                StepVerdict::passed(format!("connected to {}", device))
            })
            .await;
        Ok(())
    }

    async fn test(&mut self, _ctx: &RunContext, steps: &mut StepTracker) -> anyhow::Result<()> {
        let device = self.device.clone();
        steps
            .run_step(&format!("{} interface GigabitEthernet1", device), true, async {
                StepVerdict::passed("GigabitEthernet1 status if-oper-state-ready")
            })
            .await;
        steps
            .run_step(&format!("{} interface GigabitEthernet2", device), true, async {
                StepVerdict::failed(
                    "GigabitEthernet2 status if-oper-state-no-pass different from expected status if-oper-state-ready",
                )
            })
            .await;
        Ok(())
    }

    async fn cleanup(&mut self, _ctx: &RunContext, steps: &mut StepTracker) -> anyhow::Result<()> {
        steps
            .run_step("disconnect", true, async { StepVerdict::passed("disconnected") })
            .await;
        Ok(())
    }
}

struct DemoFactory;

impl TestcaseFactory for DemoFactory {
    fn name(&self) -> &str {
        "interface_status"
    }

    fn create(&self, param: Option<&LoopParam>) -> Box<dyn Testcase> {
        let device = param
            .and_then(|p| p.as_str())
            .unwrap_or("sw01")
            .to_string();
        Box::new(DemoCase { device })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志
    tracing_subscriber::fmt::init();

    // 1. 创建运行器并登记测试用例
    let mut runner = TestRunner::new();
    runner.register(Arc::new(DemoFactory));

    // 2. 登记循环绑定: 每台设备一个实例
    runner.mark_loop(
        "interface_status",
        "device",
        vec![json!("sw01"), json!("sw02")],
    );

    // 3. 执行运行
    println!("开始执行运行...");
    println!("========================================");

    let report = runner.run("demo").await;

    // 4. 打印运行报告
    println!("========================================");
    println!("运行完成!");
    println!();
    println!("运行: {}", report.name);
    println!("结论: {}", report.status.display_with_glyph());
    println!("实例: {}/{} 通过", report.passed_count(), report.testcases.len());
    println!("总耗时: {} ms", report.duration_ms);
    println!();

    // 5. 打印结果树
    for case in &report.testcases {
        println!("{} {}", case.status.glyph(), case.name);
        for phase in &case.phases {
            println!("  [{}] {}", phase.kind.display_name(), phase.status.display_name());
            for step in &phase.steps {
                println!("    {} {} - {}", step.status.glyph(), step.name, step.message);
            }
        }
    }

    Ok(())
}
