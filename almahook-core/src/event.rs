//! Job-end event model
//!
//! Wire shape of an Alma job completion notification:
//!
//! ```json
//! {"action": "JOB_END", "job_instance": {"id": "...", "name": "...",
//!  "end_time": "...", "status": {"value": "..."},
//!  "counter": [{"type": {"value": "...", "desc": "..."}, "value": "..."}]}}
//! ```
//!
//! The wire structs decode that shape; `JobEndEvent` is the validated
//! domain view the matcher and dispatcher work with.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Counter labels Alma uses for exported-record totals.
const EXPORTED_RECORD_TYPES: [&str; 3] = [
    "label.new.records",
    "label.updated.records",
    "label.deleted.records",
];

// =============================================================================
// Domain Types
// =============================================================================

/// Completion status reported in a job-end notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    CompletedSuccess,
    CompletedFailed,
    /// Any other status value Alma reports (aborted, in progress, ...).
    Other(String),
}

impl From<&str> for JobStatus {
    fn from(raw: &str) -> Self {
        match raw {
            "COMPLETED_SUCCESS" => JobStatus::CompletedSuccess,
            "COMPLETED_FAILED" => JobStatus::CompletedFailed,
            other => JobStatus::Other(other.to_string()),
        }
    }
}

/// A job completion notification, decoded and validated.
#[derive(Debug, Clone)]
pub struct JobEndEvent {
    /// Job name exactly as Alma sent it; matched literally against
    /// configuration.
    pub job_name: String,
    pub job_id: Option<String>,
    pub end_time: Option<String>,
    pub status: Option<JobStatus>,
    pub counters: Vec<JobCounter>,
}

impl JobEndEvent {
    /// Whether the job finished with `COMPLETED_SUCCESS`. A missing status
    /// counts as not successful and never dispatches.
    pub fn is_successful(&self) -> bool {
        matches!(self.status, Some(JobStatus::CompletedSuccess))
    }

    /// Sum of the new/updated/deleted record counters.
    ///
    /// Reporting only. Routing decisions never consult this value, so
    /// non-numeric counter values are skipped rather than rejected.
    pub fn exported_record_count(&self) -> u64 {
        self.counters
            .iter()
            .filter(|counter| EXPORTED_RECORD_TYPES.contains(&counter.kind.value.as_str()))
            .filter_map(|counter| counter.value.parse::<u64>().ok())
            .sum()
    }

    /// Date the export finished, used when building workflow inputs.
    ///
    /// Alma sends either an RFC 3339 timestamp or a bare `YYYY-MM-DD`
    /// date depending on the job type; anything else falls back to the
    /// current UTC date.
    pub fn export_date(&self) -> NaiveDate {
        self.end_time
            .as_deref()
            .and_then(parse_export_date)
            .unwrap_or_else(|| Utc::now().date_naive())
    }
}

fn parse_export_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.date_naive());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// One entry of a job's counter list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobCounter {
    #[serde(rename = "type")]
    pub kind: CounterType,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CounterType {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
}

// =============================================================================
// Wire Types
// =============================================================================

/// `job_instance` object as it appears on the wire. Only the name is
/// required; Alma omits the rest freely.
#[derive(Debug, Clone, Deserialize)]
pub struct JobInstanceWire {
    pub name: Option<String>,
    pub id: Option<String>,
    pub end_time: Option<String>,
    pub status: Option<StatusWire>,
    #[serde(default)]
    pub counter: Vec<JobCounter>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusWire {
    pub value: String,
}

impl TryFrom<JobInstanceWire> for JobEndEvent {
    type Error = String;

    fn try_from(wire: JobInstanceWire) -> Result<Self, Self::Error> {
        let job_name = match wire.name {
            Some(name) if !name.is_empty() => name,
            _ => return Err("job_instance.name is required".to_string()),
        };
        Ok(JobEndEvent {
            job_name,
            job_id: wire.id,
            end_time: wire.end_time,
            status: wire.status.map(|status| JobStatus::from(status.value.as_str())),
            counters: wire.counter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter(kind: &str, value: &str) -> JobCounter {
        JobCounter {
            kind: CounterType {
                value: kind.to_string(),
                desc: None,
            },
            value: value.to_string(),
        }
    }

    fn event_with_counters(counters: Vec<JobCounter>) -> JobEndEvent {
        JobEndEvent {
            job_name: "PPOD Export".to_string(),
            job_id: None,
            end_time: None,
            status: Some(JobStatus::CompletedSuccess),
            counters,
        }
    }

    #[test]
    fn test_status_from_wire_value() {
        assert_eq!(JobStatus::from("COMPLETED_SUCCESS"), JobStatus::CompletedSuccess);
        assert_eq!(JobStatus::from("COMPLETED_FAILED"), JobStatus::CompletedFailed);
        assert_eq!(
            JobStatus::from("ABORTED"),
            JobStatus::Other("ABORTED".to_string())
        );
    }

    #[test]
    fn test_missing_status_is_not_successful() {
        let mut event = event_with_counters(vec![]);
        event.status = None;
        assert!(!event.is_successful());
    }

    #[test]
    fn test_exported_record_count_sums_export_labels_only() {
        let event = event_with_counters(vec![
            counter("label.new.records", "1"),
            counter("label.updated.records", "2"),
            counter("label.deleted.records", "3"),
            counter("c.jobs.publishing.failed.publishing", "7"),
            counter("c.jobs.publishing.skipped", "9"),
        ]);
        assert_eq!(event.exported_record_count(), 6);
    }

    #[test]
    fn test_exported_record_count_skips_non_numeric_values() {
        let event = event_with_counters(vec![
            counter("label.new.records", "not-a-number"),
            counter("label.updated.records", "4"),
        ]);
        assert_eq!(event.exported_record_count(), 4);
    }

    #[test]
    fn test_exported_record_count_empty_counter_list() {
        assert_eq!(event_with_counters(vec![]).exported_record_count(), 0);
    }

    #[test]
    fn test_export_date_parses_rfc3339_end_time() {
        let mut event = event_with_counters(vec![]);
        event.end_time = Some("2022-05-01T14:55:14.894Z".to_string());
        assert_eq!(
            event.export_date(),
            NaiveDate::from_ymd_opt(2022, 5, 1).unwrap()
        );
    }

    #[test]
    fn test_export_date_parses_bare_date() {
        let mut event = event_with_counters(vec![]);
        event.end_time = Some("2022-05-23".to_string());
        assert_eq!(
            event.export_date(),
            NaiveDate::from_ymd_opt(2022, 5, 23).unwrap()
        );
    }

    #[test]
    fn test_export_date_falls_back_to_today() {
        let mut event = event_with_counters(vec![]);
        event.end_time = Some("half past never".to_string());
        assert_eq!(event.export_date(), Utc::now().date_naive());
    }

    #[test]
    fn test_wire_conversion_requires_name() {
        let wire = JobInstanceWire {
            name: None,
            id: None,
            end_time: None,
            status: None,
            counter: vec![],
        };
        assert!(JobEndEvent::try_from(wire).is_err());
    }

    #[test]
    fn test_wire_conversion_full_shape() {
        let raw = r#"{
            "id": "12345",
            "name": "PPOD Export",
            "end_time": "2022-05-01T14:55:14.894Z",
            "status": {"value": "COMPLETED_SUCCESS"},
            "counter": [
                {"type": {"value": "label.new.records", "desc": "New Records"}, "value": "1"}
            ]
        }"#;
        let wire: JobInstanceWire = serde_json::from_str(raw).unwrap();
        let event = JobEndEvent::try_from(wire).unwrap();
        assert_eq!(event.job_name, "PPOD Export");
        assert_eq!(event.job_id.as_deref(), Some("12345"));
        assert!(event.is_successful());
        assert_eq!(event.exported_record_count(), 1);
    }
}
