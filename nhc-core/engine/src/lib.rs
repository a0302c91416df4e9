//! NHC 引擎
//!
//! 测试生命周期与结果聚合引擎：固定阶段序列（公共准备 → 实例准备 →
//! 测试 → 清理）、按循环绑定展开实例、步骤级结果追踪与自底向上的
//! 状态聚合。引擎本身不触碰网络，设备交互全部通过步骤闭包完成。

pub mod registry;
pub mod runner;
pub mod step;
pub mod testcase;

pub use registry::{LoopBinding, LoopRegistry};
pub use runner::{RunContext, TestRunner};
pub use step::{StepTracker, StepVerdict};
pub use testcase::{CommonSetup, LoopParam, Testcase, TestcaseFactory, TestcaseInstance};
