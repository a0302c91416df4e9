//! 步骤执行与结果追踪

use std::future::Future;
use std::time::Instant;

use tracing::{debug, warn};

use nhc_common::{aggregate, StepRecord, TestStatus};

/// 步骤执行结论（由步骤闭包显式给出）
///
/// 通过/失败必须显式给出；步骤闭包返回的 `Err` 视为未预期错误，
/// 在步骤边界被转换为 Errored 记录。
#[derive(Debug, Clone)]
pub enum StepVerdict {
    /// 通过
    Passed(String),
    /// 失败
    Failed(String),
}

impl StepVerdict {
    /// 构造通过结论
    pub fn passed(message: impl Into<String>) -> anyhow::Result<Self> {
        Ok(Self::Passed(message.into()))
    }

    /// 构造失败结论
    pub fn failed(message: impl Into<String>) -> anyhow::Result<Self> {
        Ok(Self::Failed(message.into()))
    }
}

/// 阶段内的步骤追踪器
///
/// 记录每个命名步骤的唯一结果，并维护"失败后跳过"策略：
/// 一旦某个步骤失败或出错，`continue_on_failure` 为 false 的后续步骤
/// 将被直接记录为跳过而不执行。
pub struct StepTracker {
    records: Vec<StepRecord>,
    first_failure: Option<String>,
}

impl StepTracker {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            first_failure: None,
        }
    }

    /// 执行一个命名步骤
    ///
    /// `work` 的显式结论记录为 Passed/Failed；`work` 返回的未预期错误
    /// 在此处被拦截并记录为 Errored，绝不越过步骤边界向外传播。
    pub async fn run_step<F>(
        &mut self,
        name: &str,
        continue_on_failure: bool,
        work: F,
    ) -> TestStatus
    where
        F: Future<Output = anyhow::Result<StepVerdict>>,
    {
        if let Some(failed_step) = &self.first_failure {
            if !continue_on_failure {
                let message = format!("前序步骤 {} 未通过，跳过执行", failed_step);
                debug!("步骤 {} 跳过: {}", name, message);
                self.records
                    .push(StepRecord::new(name, TestStatus::Skipped, message, 0));
                return TestStatus::Skipped;
            }
        }

        let start = Instant::now();
        let (status, message) = match work.await {
            Ok(StepVerdict::Passed(msg)) => (TestStatus::Passed, msg),
            Ok(StepVerdict::Failed(msg)) => {
                warn!("步骤 {} 失败: {}", name, msg);
                (TestStatus::Failed, msg)
            }
            Err(err) => {
                warn!("步骤 {} 出现未预期错误: {}", name, err);
                (TestStatus::Errored, format!("未预期错误: {}", err))
            }
        };
        let duration_ms = start.elapsed().as_millis() as u64;

        if status.is_problem() && self.first_failure.is_none() {
            self.first_failure = Some(name.to_string());
        }
        self.records
            .push(StepRecord::new(name, status, message, duration_ms));
        status
    }

    /// 将阶段体层面的未预期错误记录为一个 Errored 步骤
    pub fn record_fault(&mut self, name: &str, err: &anyhow::Error) {
        if self.first_failure.is_none() {
            self.first_failure = Some(name.to_string());
        }
        self.records.push(StepRecord::new(
            name,
            TestStatus::Errored,
            format!("未预期错误: {}", err),
            0,
        ));
    }

    /// 当前已记录步骤的聚合状态
    pub fn status(&self) -> TestStatus {
        aggregate(self.records.iter().map(|r| r.status))
    }

    /// 是否已出现失败或错误步骤
    pub fn has_failure(&self) -> bool {
        self.first_failure.is_some()
    }

    /// 已记录的步骤
    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    /// 取出全部步骤记录
    pub fn into_records(self) -> Vec<StepRecord> {
        self.records
    }
}

impl Default for StepTracker {
    fn default() -> Self {
        Self::new()
    }
}
