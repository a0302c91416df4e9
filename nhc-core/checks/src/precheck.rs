//! 运行级公共准备
//!
//! 在任何设备交互发生之前校验运行输入。公共准备未通过时，
//! 运行器会跳过所有测试用例实例。

use std::sync::Arc;

use async_trait::async_trait;

use nhc_engine::{CommonSetup, RunContext, StepTracker, StepVerdict};
use nhc_topology::Testbed;

/// 运行前输入校验
///
/// 不占用外部资源，因此资源释放保持默认空实现。
pub struct RunPrecheck {
    testbed: Arc<Testbed>,
}

impl RunPrecheck {
    pub fn new(testbed: Arc<Testbed>) -> Self {
        Self { testbed }
    }
}

#[async_trait]
impl CommonSetup for RunPrecheck {
    async fn run(&self, _ctx: &RunContext, steps: &mut StepTracker) -> anyhow::Result<()> {
        let testbed = Arc::clone(&self.testbed);
        steps
            .run_step("validate_testbed", false, async move {
                match testbed.validate() {
                    Ok(()) => StepVerdict::passed(format!(
                        "testbed {} with {} devices",
                        testbed.name,
                        testbed.devices.len()
                    )),
                    Err(e) => StepVerdict::failed(e.to_string()),
                }
            })
            .await;
        Ok(())
    }
}
