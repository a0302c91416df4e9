//! Webex 状态通知

use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use nhc_common::{ReportNode, TestStatus};

use crate::{NotifierError, Result};

/// Webex 消息接口地址
const WEBEX_MESSAGES_URL: &str = "https://webexapis.com/v1/messages";

/// 消息行
#[derive(Debug, Clone, Serialize)]
pub struct MessageLine {
    /// 文本内容
    pub text: String,

    /// 是否加粗强调
    pub emphasized: bool,
}

/// 从报告树节点生成状态行
///
/// 首行为该节点的汇总结论（强调），之后每个直接子节点一行，
/// 带状态图标，顺序与执行顺序一致。
pub fn status_lines(node: &ReportNode) -> Vec<MessageLine> {
    let summary = match node.status {
        TestStatus::Passed => format!("✅ {} passed ✅", node.name),
        TestStatus::Failed => format!("❌ {} failed ❌", node.name),
        status => format!("{} not successful: {}", node.name, status),
    };

    let mut lines = vec![MessageLine {
        text: summary,
        emphasized: true,
    }];
    for child in &node.children {
        lines.push(MessageLine {
            text: format!(
                "- {} ➡️ {} {}",
                child.name,
                child.status,
                child.status.glyph()
            ),
            emphasized: false,
        });
    }
    lines
}

/// Webex 通知客户端
pub struct WebexNotifier {
    http_client: Client,
    token: String,
    room_id: String,
}

impl WebexNotifier {
    pub fn new(token: &str, room_id: &str) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| NotifierError::HttpError(e.to_string()))?;

        Ok(Self {
            http_client,
            token: token.to_string(),
            room_id: room_id.to_string(),
        })
    }

    /// 从环境变量构建（WEBEX_TOKEN / WEBEX_ROOM）
    pub fn from_env() -> Result<Self> {
        let token = std::env::var("WEBEX_TOKEN")
            .map_err(|_| NotifierError::ConfigError("未设置 WEBEX_TOKEN".to_string()))?;
        let room_id = std::env::var("WEBEX_ROOM")
            .map_err(|_| NotifierError::ConfigError("未设置 WEBEX_ROOM".to_string()))?;
        Self::new(&token, &room_id)
    }

    /// 发送状态更新卡片
    pub async fn send_status_update(&self, title: &str, lines: &[MessageLine]) -> Result<()> {
        info!("发送 Webex 状态更新: {}", title);

        let card = build_status_card("Status update", title, lines);
        let payload = json!({
            "roomId": self.room_id,
            "text": "This is an adaptive card",
            "attachments": [card],
        });
        self.post(payload).await
    }

    /// 发送 Markdown 消息
    pub async fn send_markdown(&self, message: &str) -> Result<()> {
        let payload = json!({
            "roomId": self.room_id,
            "markdown": message,
        });
        self.post(payload).await
    }

    async fn post(&self, payload: Value) -> Result<()> {
        let response = self
            .http_client
            .post(WEBEX_MESSAGES_URL)
            .bearer_auth(&self.token)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| NotifierError::HttpError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "无法读取错误响应".to_string());
            warn!("Webex 消息发送失败: {} - {}", status, text);
            return Err(NotifierError::ApiError(status.as_u16(), text));
        }

        info!("Webex 消息发送成功");
        Ok(())
    }
}

/// 构造自适应卡片负载
fn build_status_card(section_title: &str, title: &str, lines: &[MessageLine]) -> Value {
    let mut body = vec![
        json!({
            "type": "TextBlock",
            "text": section_title,
            "weight": "Bolder",
            "color": "Accent",
            "size": "Small",
        }),
        json!({
            "type": "TextBlock",
            "text": title,
            "weight": "Bolder",
            "size": "Large",
            "wrap": true,
        }),
    ];
    for line in lines {
        body.push(json!({
            "type": "TextBlock",
            "text": line.text,
            "weight": if line.emphasized { "Bolder" } else { "Default" },
            "wrap": true,
        }));
    }

    json!({
        "contentType": "application/vnd.microsoft.card.adaptive",
        "content": {
            "$schema": "http://adaptivecards.io/schemas/adaptive-card.json",
            "type": "AdaptiveCard",
            "version": "1.2",
            "body": body,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(name: &str, status: TestStatus, children: Vec<ReportNode>) -> ReportNode {
        ReportNode {
            name: name.to_string(),
            status,
            message: String::new(),
            children,
        }
    }

    #[test]
    fn test_status_lines_failed_summary() {
        let tree = node(
            "interface_status[device=sw01]",
            TestStatus::Failed,
            vec![
                node("GigabitEthernet1", TestStatus::Passed, vec![]),
                node("GigabitEthernet2", TestStatus::Failed, vec![]),
            ],
        );

        let lines = status_lines(&tree);
        assert_eq!(lines.len(), 3);

        assert!(lines[0].emphasized);
        assert_eq!(lines[0].text, "❌ interface_status[device=sw01] failed ❌");

        assert!(!lines[1].emphasized);
        assert!(lines[1].text.contains("GigabitEthernet1"));
        assert!(lines[1].text.contains("✅"));
        assert!(lines[2].text.contains("❌"));
    }

    #[test]
    fn test_status_lines_passed_summary() {
        let tree = node("reachability", TestStatus::Passed, vec![]);
        let lines = status_lines(&tree);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "✅ reachability passed ✅");
    }

    #[test]
    fn test_status_lines_other_status() {
        let tree = node("reachability", TestStatus::Skipped, vec![]);
        let lines = status_lines(&tree);
        assert_eq!(lines[0].text, "reachability not successful: skipped");
    }

    #[test]
    fn test_status_lines_preserve_child_order() {
        let tree = node(
            "run",
            TestStatus::Failed,
            vec![
                node("first", TestStatus::Passed, vec![]),
                node("second", TestStatus::Failed, vec![]),
                node("third", TestStatus::Skipped, vec![]),
            ],
        );

        let lines = status_lines(&tree);
        assert!(lines[1].text.starts_with("- first"));
        assert!(lines[2].text.starts_with("- second"));
        assert!(lines[3].text.starts_with("- third"));
    }

    #[test]
    fn test_build_status_card_shape() {
        let lines = vec![
            MessageLine {
                text: "❌ test failed ❌".to_string(),
                emphasized: true,
            },
            MessageLine {
                text: "- sw01 ➡️ failed ❌".to_string(),
                emphasized: false,
            },
        ];

        let card = build_status_card("Status update", "sw01 interface test", &lines);
        assert_eq!(
            card["contentType"],
            "application/vnd.microsoft.card.adaptive"
        );

        let body = card["content"]["body"].as_array().unwrap();
        // 小节标题 + 标题 + 两行内容
        assert_eq!(body.len(), 4);
        assert_eq!(body[1]["text"], "sw01 interface test");
        assert_eq!(body[2]["weight"], "Bolder");
        assert_eq!(body[3]["weight"], "Default");
    }
}
