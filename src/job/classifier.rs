//! Completion-edge detection over a pair of Job snapshots

use super::snapshot::JobSnapshot;

/// Edge observed between two consecutive snapshots of one Job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Nothing terminal happened
    None,
    /// Succeeded pod count moved from zero to positive
    Succeeded,
    /// `Failed=True` condition appeared
    Failed,
}

/// Classify the transition from `previous` to `current`.
///
/// Both edges are one-way: a resync that redelivers an already-succeeded or
/// already-failed state never fires again. A decreasing succeeded count is
/// treated as "not yet succeeded". When both edges appear in the same pair,
/// success wins; callers that filter out successes can still check
/// `is_failed_edge`.
pub fn classify(previous: &JobSnapshot, current: &JobSnapshot) -> Transition {
    if is_succeeded_edge(previous, current) {
        Transition::Succeeded
    } else if is_failed_edge(previous, current) {
        Transition::Failed
    } else {
        Transition::None
    }
}

fn is_succeeded_edge(previous: &JobSnapshot, current: &JobSnapshot) -> bool {
    previous.succeeded == 0 && current.succeeded > 0
}

/// `Failed=True` appeared between the two snapshots
pub fn is_failed_edge(previous: &JobSnapshot, current: &JobSnapshot) -> bool {
    !previous.failed && current.failed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::JobKey;

    fn job() -> JobSnapshot {
        JobSnapshot::new(JobKey::new("default", "pi"))
    }

    #[test]
    fn test_no_change_is_none() {
        assert_eq!(classify(&job(), &job()), Transition::None);

        let done = job().with_succeeded(1);
        assert_eq!(classify(&done, &done), Transition::None);

        let failed = job().with_failed(true);
        assert_eq!(classify(&failed, &failed), Transition::None);
    }

    #[test]
    fn test_succeeded_edge() {
        assert_eq!(classify(&job(), &job().with_succeeded(1)), Transition::Succeeded);
        assert_eq!(classify(&job(), &job().with_succeeded(5)), Transition::Succeeded);
    }

    #[test]
    fn test_succeeded_does_not_refire_on_increase() {
        let one = job().with_succeeded(1);
        let two = job().with_succeeded(2);
        assert_eq!(classify(&one, &two), Transition::None);
    }

    #[test]
    fn test_succeeded_count_decrease_is_tolerated() {
        let two = job().with_succeeded(2);
        assert_eq!(classify(&two, &job()), Transition::None);
    }

    #[test]
    fn test_failed_edge() {
        assert_eq!(classify(&job(), &job().with_failed(true)), Transition::Failed);
    }

    #[test]
    fn test_failed_condition_cleared_is_none() {
        assert_eq!(classify(&job().with_failed(true), &job()), Transition::None);
    }

    // Documented tie-break: a pair carrying both edges reports success.
    #[test]
    fn test_both_edges_success_wins() {
        let current = job().with_succeeded(1).with_failed(true);
        assert_eq!(classify(&job(), &current), Transition::Succeeded);
    }

    #[test]
    fn test_failed_edge_after_success() {
        let previous = job().with_succeeded(1);
        let current = job().with_succeeded(1).with_failed(true);
        assert_eq!(classify(&previous, &current), Transition::Failed);
    }
}
