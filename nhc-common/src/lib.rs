//! NHC 通用类型定义
//!
//! 此 crate 包含引擎、检查项和通知组件之间共享的类型：
//! 测试结果状态及其聚合规则，以及分层的结果报告树。

pub mod report;
pub mod status;

pub use report::{PhaseKind, PhaseReport, ReportNode, RunReport, StepRecord, TestcaseReport};
pub use status::{aggregate, TestStatus};
