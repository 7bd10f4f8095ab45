use std::fmt;

use super::plan::TeardownStep;
use crate::aws::ErrorKind;

/// A resource confirmed deleted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deleted {
    Agent { name: String, id: String },
    Role(String),
    Table { database: String, table: String },
    Database(String),
    Bucket { name: String, versions: usize },
    Function(String),
}

impl fmt::Display for Deleted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Deleted::Agent { name, id } => write!(f, "agent {} ({})", name, id),
            Deleted::Role(name) => write!(f, "IAM role {}", name),
            Deleted::Table { database, table } => write!(f, "table {}.{}", database, table),
            Deleted::Database(name) => write!(f, "database {}", name),
            Deleted::Bucket { name, versions } => {
                write!(f, "bucket {} ({} object versions purged)", name, versions)
            }
            Deleted::Function(name) => write!(f, "function {}", name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepStatus {
    Completed,
    Failed { kind: ErrorKind, message: String },
    Skipped { reason: String },
}

#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub step: TeardownStep,
    pub status: StepStatus,
    /// Deletions confirmed by this step, including those before a failure
    pub deleted: Vec<Deleted>,
}

impl StepOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self.status, StepStatus::Failed { .. })
    }
}

/// Result of a teardown run. Lists every selected step so that a partially
/// torn-down environment is never silent.
#[derive(Debug, Clone, Default)]
pub struct TeardownReport {
    pub outcomes: Vec<StepOutcome>,
}

impl TeardownReport {
    pub fn outcome(&self, step: TeardownStep) -> Option<&StepOutcome> {
        self.outcomes.iter().find(|o| o.step == step)
    }

    pub fn failed(&self) -> impl Iterator<Item = &StepOutcome> {
        self.outcomes.iter().filter(|o| o.is_failed())
    }

    pub fn skipped(&self) -> impl Iterator<Item = &StepOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, StepStatus::Skipped { .. }))
    }

    /// Steps a re-run still has to cover: failed or skipped, in run order
    pub fn incomplete_steps(&self) -> Vec<TeardownStep> {
        self.outcomes
            .iter()
            .filter(|o| o.status != StepStatus::Completed)
            .map(|o| o.step)
            .collect()
    }

    pub fn is_success(&self) -> bool {
        self.outcomes
            .iter()
            .all(|o| o.status == StepStatus::Completed)
    }

    pub fn deleted(&self) -> impl Iterator<Item = &Deleted> {
        self.outcomes.iter().flat_map(|o| o.deleted.iter())
    }
}
