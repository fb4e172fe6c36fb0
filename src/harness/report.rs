use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;
use crate::models::OperationKind;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    Completed,
    Cancelled,
    TransportFailed,
    BackendUnresolved,
}

#[derive(Serialize, Debug, Clone)]
pub struct StepReport {
    pub name: String,
    pub operation: OperationKind,
    pub result: String,
    pub failure: Option<String>,
    pub transport_error: bool,
}

impl StepReport {
    pub fn passed(&self) -> bool {
        self.failure.is_none() && !self.transport_error
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct RunReport {
    pub run_id: Uuid,
    pub backend: String,
    pub base_url: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcome: RunOutcome,
    pub steps: Vec<StepReport>,
}

impl RunReport {
    // Outcome and finish time are provisional until `finish` is called
    pub(crate) fn start(backend: &str, base_url: &str) -> Self {
        let now = Utc::now();
        Self {
            run_id: Uuid::new_v4(),
            backend: backend.to_string(),
            base_url: base_url.to_string(),
            started_at: now,
            finished_at: now,
            outcome: RunOutcome::Completed,
            steps: Vec::new(),
        }
    }

    pub(crate) fn finish(&mut self, outcome: RunOutcome) {
        self.outcome = outcome;
        self.finished_at = Utc::now();
    }

    pub fn failures(&self) -> impl Iterator<Item = &StepReport> {
        self.steps.iter().filter(|s| !s.passed())
    }

    /// True when every step ran and passed.
    pub fn is_success(&self) -> bool {
        self.outcome == RunOutcome::Completed && self.failures().next().is_none()
    }
}
