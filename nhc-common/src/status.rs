//! 测试结果状态定义

use serde::{Deserialize, Serialize};

/// 测试结果状态
///
/// 按严重程度从低到高排序: Passed < Skipped < Failed < Errored。
/// 任意一层的结果由其子结果在此顺序下的最大值决定（见 [`aggregate`]）。
/// Skipped 表示"无信息"：比已记录的 Passed 更弱，但不阻塞运行成功。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    /// 通过
    Passed,
    /// 跳过（未执行）
    Skipped,
    /// 失败（检查结果与期望不符）
    Failed,
    /// 错误（执行过程中出现未预期的异常）
    Errored,
}

impl TestStatus {
    /// 检查是否为非失败状态（跳过不阻塞运行成功）
    pub fn is_passing(&self) -> bool {
        matches!(self, Self::Passed | Self::Skipped)
    }

    /// 检查是否为失败或错误状态
    pub fn is_problem(&self) -> bool {
        matches!(self, Self::Failed | Self::Errored)
    }

    /// 获取英文标识（与序列化名称一致）
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Skipped => "skipped",
            Self::Failed => "failed",
            Self::Errored => "errored",
        }
    }

    /// 获取中文显示名称
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Passed => "通过",
            Self::Skipped => "跳过",
            Self::Failed => "失败",
            Self::Errored => "错误",
        }
    }

    /// 获取状态图标
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Passed => "✅",
            Self::Skipped => "🚧",
            Self::Failed => "❌",
            Self::Errored => "💥",
        }
    }

    /// 获取带图标的显示名称
    pub fn display_with_glyph(&self) -> &'static str {
        match self {
            Self::Passed => "通过 ✅",
            Self::Skipped => "跳过 🚧",
            Self::Failed => "失败 ❌",
            Self::Errored => "错误 💥",
        }
    }
}

impl std::fmt::Display for TestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 聚合一组状态，返回支配序下的最大值
///
/// 空输入聚合为 Passed：空阶段/空测试用例不产生负面结论。
/// 结果只取决于输入状态的多重集合，与出现顺序无关，
/// 因此对序列化后的报告树重新聚合会得到相同结论。
pub fn aggregate<I>(statuses: I) -> TestStatus
where
    I: IntoIterator<Item = TestStatus>,
{
    statuses.into_iter().max().unwrap_or(TestStatus::Passed)
}
