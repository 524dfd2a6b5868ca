//! Job lifecycle event model
//!
//! Events arrive from the build orchestrator as one JSON object per line,
//! internally tagged on `type`. Event types we do not recognize deserialize
//! to `Unknown` and are ignored by every handler.

use serde::{Deserialize, Serialize};

/// Conventional shell exit code for a process killed by SIGINT (128 + 2).
///
/// Used as the default interrupt sentinel; hosts with a different
/// convention can override it via `interrupt_code` in the config.
pub const SIGINT_CODE: i32 = 130;

/// A job lifecycle event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JobEvent {
    /// A job began executing
    JobStarted { id: String },

    /// A job finished with the given return code (0 = success)
    JobEnded { id: String, rc: i32 },

    /// A job reported at least one failing test; `job` is the correlation
    /// key the orchestrator delivers alongside the event
    TestFailure { job: String },

    /// Any event type this version does not know about
    #[serde(other)]
    Unknown,
}

impl JobEvent {
    /// The job identifier this event concerns, if any.
    pub fn identifier(&self) -> Option<&str> {
        match self {
            JobEvent::JobStarted { id } | JobEvent::JobEnded { id, .. } => Some(id),
            JobEvent::TestFailure { job } => Some(job),
            JobEvent::Unknown => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_job_started() {
        let event: JobEvent = serde_json::from_str(r#"{"type": "job_started", "id": "pkg_a"}"#).unwrap();
        assert_eq!(event, JobEvent::JobStarted { id: "pkg_a".to_string() });
    }

    #[test]
    fn test_parse_job_ended() {
        let event: JobEvent = serde_json::from_str(r#"{"type": "job_ended", "id": "pkg_a", "rc": 2}"#).unwrap();
        assert_eq!(event, JobEvent::JobEnded { id: "pkg_a".to_string(), rc: 2 });
    }

    #[test]
    fn test_parse_test_failure() {
        let event: JobEvent = serde_json::from_str(r#"{"type": "test_failure", "job": "pkg_a"}"#).unwrap();
        assert_eq!(event, JobEvent::TestFailure { job: "pkg_a".to_string() });
    }

    #[test]
    fn test_unrecognized_type_is_unknown() {
        let event: JobEvent = serde_json::from_str(r#"{"type": "job_queued"}"#).unwrap();
        assert_eq!(event, JobEvent::Unknown);
    }

    #[test]
    fn test_identifier() {
        let event = JobEvent::JobEnded { id: "pkg_a".to_string(), rc: 0 };
        assert_eq!(event.identifier(), Some("pkg_a"));
        assert_eq!(JobEvent::Unknown.identifier(), None);
    }
}
