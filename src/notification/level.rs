//! Notification level - which Job outcomes are worth a message

use std::fmt;
use std::str::FromStr;

use super::event::Outcome;

/// Policy applied after dedup; failures are always notified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotificationLevel {
    /// Succeeded and failed Jobs
    #[default]
    All,
    /// Failed Jobs only
    FailedOnly,
}

impl NotificationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationLevel::All => "all",
            NotificationLevel::FailedOnly => "failed",
        }
    }

    pub fn should_notify_success(&self) -> bool {
        matches!(self, NotificationLevel::All)
    }

    pub fn should_notify_failure(&self) -> bool {
        true
    }

    pub fn admits(&self, outcome: Outcome) -> bool {
        match outcome {
            Outcome::Succeeded => self.should_notify_success(),
            Outcome::Failed => self.should_notify_failure(),
        }
    }
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationLevel {
    type Err = String;

    /// Empty input selects the default
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "" | "all" => Ok(NotificationLevel::All),
            "failed" => Ok(NotificationLevel::FailedOnly),
            other => Err(format!(
                "NOTIFICATION_LEVEL must be 'all' or 'failed', got: {}",
                other
            )),
        }
    }
}
