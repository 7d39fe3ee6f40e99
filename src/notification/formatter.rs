//! 消息格式化模块 - 将事件转换为用户可读的通知消息

use chrono::SecondsFormat;

use super::event::{NotificationEvent, Outcome};

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// 消息格式化器（Slack mrkdwn 风格）
pub struct MessageFormatter;

impl MessageFormatter {
    fn emoji(outcome: Outcome) -> &'static str {
        match outcome {
            Outcome::Succeeded => ":tada:",
            Outcome::Failed => ":x:",
        }
    }

    fn title(outcome: Outcome) -> &'static str {
        match outcome {
            Outcome::Succeeded => "Job Completed Successfully",
            Outcome::Failed => "Job Failed",
        }
    }

    /// 生成多行摘要：名称、命名空间、状态、时间
    pub fn summary(event: &NotificationEvent) -> String {
        format!(
            "{} *{}*\n{}\n• *Name:* {}\n• *Namespace:* {}\n• *Status:* {}\n• *Time:* {}",
            Self::emoji(event.outcome),
            Self::title(event.outcome),
            RULE,
            event.key.name,
            event.key.namespace,
            event.outcome,
            event.observed_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::JobKey;
    use chrono::{TimeZone, Utc};

    fn event(outcome: Outcome) -> NotificationEvent {
        NotificationEvent::new(
            JobKey::new("batch", "nightly-report"),
            outcome,
            Utc.with_ymd_and_hms(2024, 5, 1, 3, 4, 5).unwrap(),
        )
    }

    #[test]
    fn test_success_summary() {
        let text = MessageFormatter::summary(&event(Outcome::Succeeded));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], ":tada: *Job Completed Successfully*");
        assert_eq!(lines[1], RULE);
        assert_eq!(lines[2], "• *Name:* nightly-report");
        assert_eq!(lines[3], "• *Namespace:* batch");
        assert_eq!(lines[4], "• *Status:* Succeeded");
        assert_eq!(lines[5], "• *Time:* 2024-05-01T03:04:05Z");
    }

    #[test]
    fn test_failure_summary() {
        let text = MessageFormatter::summary(&event(Outcome::Failed));
        assert!(text.starts_with(":x: *Job Failed*"));
        assert!(text.contains("• *Status:* Failed"));
    }
}
