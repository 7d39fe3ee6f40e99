//! 通知事件 - 交给渠道发送的数据结构

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::job::{JobKey, Transition};

/// Job 的终态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Succeeded,
    Failed,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Succeeded => "Succeeded",
            Outcome::Failed => "Failed",
        }
    }

    /// Outcome carried by a transition, `None` when nothing terminal happened
    pub fn from_transition(transition: Transition) -> Option<Self> {
        match transition {
            Transition::Succeeded => Some(Outcome::Succeeded),
            Transition::Failed => Some(Outcome::Failed),
            Transition::None => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 通过去重检查的 Job 完成事件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationEvent {
    pub key: JobKey,
    pub outcome: Outcome,
    /// Completion time for successes when the Job reports one, otherwise when
    /// the edge was observed
    pub observed_at: DateTime<Utc>,
}

impl NotificationEvent {
    pub fn new(key: JobKey, outcome: Outcome, observed_at: DateTime<Utc>) -> Self {
        Self {
            key,
            outcome,
            observed_at,
        }
    }
}
