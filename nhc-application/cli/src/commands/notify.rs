//! Notify 命令处理

use anyhow::{Context, Result};
use colored::Colorize;

use nhc_notifier::WebexNotifier;

pub async fn handle(action: crate::NotifyAction) -> Result<()> {
    match action {
        crate::NotifyAction::Test { message } => test_notification(&message).await,
    }
}

async fn test_notification(message: &str) -> Result<()> {
    let notifier = WebexNotifier::from_env()
        .context("Webex 通知配置无效 (需要环境变量 WEBEX_TOKEN 与 WEBEX_ROOM)")?;

    notifier.send_markdown(message).await?;
    println!("{} 测试消息已发送", "✓".green().bold());
    Ok(())
}
