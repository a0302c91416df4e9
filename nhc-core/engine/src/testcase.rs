//! 测试用例契约定义

use async_trait::async_trait;
use serde_json::Value;

use crate::runner::RunContext;
use crate::step::StepTracker;

/// 循环参数绑定
#[derive(Debug, Clone)]
pub struct LoopParam {
    /// 参数名称
    pub name: String,

    /// 绑定值
    pub value: Value,
}

impl LoopParam {
    /// 值的显示形式（字符串值不带引号）
    pub fn display_value(&self) -> String {
        match &self.value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// 以字符串形式取值
    pub fn as_str(&self) -> Option<&str> {
        self.value.as_str()
    }
}

/// 测试用例实例的生命周期契约
///
/// 三个阶段按 准备 → 测试 → 清理 依次执行。阶段体返回的错误会被
/// 运行器在阶段边界拦截，记录为该阶段的一个 Errored 步骤，
/// 不会中断后续实例或整个运行。
#[async_trait]
pub trait Testcase: Send {
    /// 准备阶段（通常建立设备连接）
    async fn setup(&mut self, ctx: &RunContext, steps: &mut StepTracker) -> anyhow::Result<()>;

    /// 测试阶段（准备阶段未通过时整体跳过）
    async fn test(&mut self, ctx: &RunContext, steps: &mut StepTracker) -> anyhow::Result<()>;

    /// 清理阶段（无论前序结果如何都会执行一次）
    async fn cleanup(&mut self, ctx: &RunContext, steps: &mut StepTracker) -> anyhow::Result<()>;
}

/// 公共准备契约
///
/// 每次运行只执行一次，所有实例共享其结论。
#[async_trait]
pub trait CommonSetup: Send + Sync {
    /// 公共准备步骤
    async fn run(&self, ctx: &RunContext, steps: &mut StepTracker) -> anyhow::Result<()>;

    /// 释放公共准备阶段占用的资源
    ///
    /// 无论准备结论如何都会被调用；未占用资源时保持空实现即可。
    async fn release(&self, _ctx: &RunContext, _steps: &mut StepTracker) -> anyhow::Result<()> {
        Ok(())
    }
}

/// 测试用例定义（实例工厂）
pub trait TestcaseFactory: Send + Sync {
    /// 定义名称
    fn name(&self) -> &str;

    /// 创建一个实例；存在循环绑定时传入当前参数
    fn create(&self, param: Option<&LoopParam>) -> Box<dyn Testcase>;
}

/// 测试用例实例
///
/// 一次具体执行，绑定某个循环值（或无绑定）。实例之间相互独立，
/// 不共享可变状态，结果也互不渗透。
pub struct TestcaseInstance {
    /// 实例名称（如 `interface_status[device=sw01]`）
    pub name: String,

    /// 循环参数绑定
    pub param: Option<LoopParam>,

    /// 实例执行体
    pub testcase: Box<dyn Testcase>,
}
