use serde::{Deserialize, Serialize};

/// Run status as reported by the assistant service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Cancelled,
    Failed,
    Completed,
    Incomplete,
    Expired,
}

/// How the orchestrator should treat a reported status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunDisposition {
    /// Not terminal yet, keep polling
    Pending,
    /// Terminal success, a reply can be fetched
    Succeeded,
    /// Terminal failure, no reply will be produced
    Failed,
}

impl RunStatus {
    /// Collapse the service's status vocabulary into the three outcomes the
    /// polling loop acts on. `requires_action` never resolves for an
    /// assistant without tools, so it stays pending until the deadline.
    pub fn disposition(self) -> RunDisposition {
        match self {
            RunStatus::Completed => RunDisposition::Succeeded,
            RunStatus::Failed
            | RunStatus::Cancelled
            | RunStatus::Incomplete
            | RunStatus::Expired => RunDisposition::Failed,
            RunStatus::Queued
            | RunStatus::InProgress
            | RunStatus::RequiresAction
            | RunStatus::Cancelling => RunDisposition::Pending,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Queued => "queued",
            RunStatus::InProgress => "in_progress",
            RunStatus::RequiresAction => "requires_action",
            RunStatus::Cancelling => "cancelling",
            RunStatus::Cancelled => "cancelled",
            RunStatus::Failed => "failed",
            RunStatus::Completed => "completed",
            RunStatus::Incomplete => "incomplete",
            RunStatus::Expired => "expired",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_statuses_map_to_terminal_dispositions() {
        assert_eq!(RunStatus::Completed.disposition(), RunDisposition::Succeeded);
        for status in [
            RunStatus::Failed,
            RunStatus::Cancelled,
            RunStatus::Incomplete,
            RunStatus::Expired,
        ] {
            assert_eq!(status.disposition(), RunDisposition::Failed);
        }
    }

    #[test]
    fn in_flight_statuses_stay_pending() {
        for status in [
            RunStatus::Queued,
            RunStatus::InProgress,
            RunStatus::RequiresAction,
            RunStatus::Cancelling,
        ] {
            assert_eq!(status.disposition(), RunDisposition::Pending);
        }
    }

    #[test]
    fn status_deserializes_from_wire_format() {
        let status: RunStatus = serde_json::from_str("\"in_progress\"").unwrap();
        assert_eq!(status, RunStatus::InProgress);
    }
}
