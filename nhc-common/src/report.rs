//! 测试结果报告树
//!
//! 运行 → 测试用例实例 → 阶段 → 步骤 的有序结果结构。
//! 每层状态由其子结果按支配序聚合得到，顺序与执行顺序严格一致，
//! 不做任何重排序。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::status::{aggregate, TestStatus};

/// 阶段类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    /// 公共准备（每次运行只执行一次，所有实例共享）
    CommonSetup,
    /// 实例准备
    Setup,
    /// 测试
    Test,
    /// 清理
    Cleanup,
}

impl PhaseKind {
    /// 获取阶段标识
    pub fn name(&self) -> &'static str {
        match self {
            Self::CommonSetup => "common_setup",
            Self::Setup => "setup",
            Self::Test => "test",
            Self::Cleanup => "cleanup",
        }
    }

    /// 获取中文显示名称
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::CommonSetup => "公共准备",
            Self::Setup => "准备",
            Self::Test => "测试",
            Self::Cleanup => "清理",
        }
    }
}

impl std::fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 步骤记录
///
/// 每个步骤恰好产生一条记录，且只归属于一个阶段。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRecord {
    /// 步骤名称
    pub name: String,

    /// 结果状态
    pub status: TestStatus,

    /// 结果描述
    pub message: String,

    /// 耗时（毫秒）
    pub duration_ms: u64,
}

impl StepRecord {
    pub fn new(name: &str, status: TestStatus, message: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            name: name.to_string(),
            status,
            message: message.into(),
            duration_ms,
        }
    }
}

/// 阶段报告
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseReport {
    /// 阶段类型
    pub kind: PhaseKind,

    /// 聚合状态
    pub status: TestStatus,

    /// 阶段级说明（仅在整个阶段被跳过等情况下设置）
    pub message: Option<String>,

    /// 步骤记录（按执行顺序）
    pub steps: Vec<StepRecord>,
}

impl PhaseReport {
    /// 由步骤记录构建，状态为所有步骤状态的聚合
    pub fn from_steps(kind: PhaseKind, steps: Vec<StepRecord>) -> Self {
        let status = aggregate(steps.iter().map(|s| s.status));
        Self {
            kind,
            status,
            message: None,
            steps,
        }
    }

    /// 构建被整体跳过的阶段（步骤未执行，无子记录）
    pub fn skipped(kind: PhaseKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            status: TestStatus::Skipped,
            message: Some(message.into()),
            steps: Vec::new(),
        }
    }

    /// 第一个失败或错误步骤的描述
    pub fn failure_message(&self) -> Option<&str> {
        self.steps
            .iter()
            .find(|s| s.status.is_problem())
            .map(|s| s.message.as_str())
    }

    /// 转换为统一的报告树节点
    pub fn to_node(&self) -> ReportNode {
        ReportNode {
            name: self.kind.name().to_string(),
            status: self.status,
            message: self.message.clone().unwrap_or_default(),
            children: self
                .steps
                .iter()
                .map(|s| ReportNode {
                    name: s.name.clone(),
                    status: s.status,
                    message: s.message.clone(),
                    children: Vec::new(),
                })
                .collect(),
        }
    }
}

/// 测试用例实例报告
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestcaseReport {
    /// 实例名称（如 `interface_status[device=sw01]`）
    pub name: String,

    /// 聚合状态
    pub status: TestStatus,

    /// 实例级说明（仅在整个实例被跳过等情况下设置）
    pub message: Option<String>,

    /// 阶段报告（按执行顺序）
    pub phases: Vec<PhaseReport>,
}

impl TestcaseReport {
    /// 由阶段报告构建，状态为所有阶段状态的聚合
    pub fn from_phases(name: &str, phases: Vec<PhaseReport>) -> Self {
        let status = aggregate(phases.iter().map(|p| p.status));
        Self {
            name: name.to_string(),
            status,
            message: None,
            phases,
        }
    }

    /// 构建被整体跳过的实例（所有阶段未执行）
    pub fn skipped(name: &str, message: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            status: TestStatus::Skipped,
            message: Some(message.into()),
            phases: Vec::new(),
        }
    }

    /// 转换为统一的报告树节点
    pub fn to_node(&self) -> ReportNode {
        ReportNode {
            name: self.name.clone(),
            status: self.status,
            message: self.message.clone().unwrap_or_default(),
            children: self.phases.iter().map(|p| p.to_node()).collect(),
        }
    }
}

/// 运行报告
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// 运行 ID
    pub run_id: String,

    /// 运行名称
    pub name: String,

    /// 聚合状态
    pub status: TestStatus,

    /// 公共准备阶段（未配置时为 None）
    pub common_setup: Option<PhaseReport>,

    /// 各测试用例实例报告（按执行顺序）
    pub testcases: Vec<TestcaseReport>,

    /// 开始时间
    pub started_at: DateTime<Utc>,

    /// 总耗时（毫秒）
    pub duration_ms: u64,
}

impl RunReport {
    pub fn new(name: &str) -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            status: TestStatus::Passed,
            common_setup: None,
            testcases: Vec::new(),
            started_at: Utc::now(),
            duration_ms: 0,
        }
    }

    /// 重新计算聚合状态（公共准备阶段 + 所有实例）
    pub fn recompute_status(&mut self) {
        self.status = aggregate(
            self.common_setup
                .iter()
                .map(|p| p.status)
                .chain(self.testcases.iter().map(|t| t.status)),
        );
    }

    /// 通过的测试用例实例数
    pub fn passed_count(&self) -> usize {
        self.testcases
            .iter()
            .filter(|t| t.status == TestStatus::Passed)
            .count()
    }

    /// 失败或错误的测试用例实例数
    pub fn problem_count(&self) -> usize {
        self.testcases
            .iter()
            .filter(|t| t.status.is_problem())
            .count()
    }

    /// 导出为 JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// 转换为统一的报告树视图
    ///
    /// 公共准备阶段（如有）为首个子节点，之后按执行顺序排列各实例。
    pub fn to_node(&self) -> ReportNode {
        let mut children = Vec::new();
        if let Some(common) = &self.common_setup {
            children.push(common.to_node());
        }
        children.extend(self.testcases.iter().map(|t| t.to_node()));

        ReportNode {
            name: self.name.clone(),
            status: self.status,
            message: String::new(),
            children,
        }
    }
}

/// 报告树节点
///
/// 交给外部通知方的只读统一视图，顺序与执行顺序一致。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportNode {
    /// 节点名称
    pub name: String,

    /// 聚合状态
    pub status: TestStatus,

    /// 结果描述
    pub message: String,

    /// 子节点（按执行顺序）
    pub children: Vec<ReportNode>,
}
