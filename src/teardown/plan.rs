use anyhow::{bail, Result};
use std::fmt;
use std::str::FromStr;

/// One independently re-runnable unit of the teardown, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TeardownStep {
    Agent,
    Catalog,
    BaseBucket,
    ResultsBucket,
    Function,
}

impl TeardownStep {
    pub const ALL: [TeardownStep; 5] = [
        TeardownStep::Agent,
        TeardownStep::Catalog,
        TeardownStep::BaseBucket,
        TeardownStep::ResultsBucket,
        TeardownStep::Function,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TeardownStep::Agent => "agent",
            TeardownStep::Catalog => "catalog",
            TeardownStep::BaseBucket => "base-bucket",
            TeardownStep::ResultsBucket => "results-bucket",
            TeardownStep::Function => "function",
        }
    }

    /// Step that must not have failed earlier in the same run.
    /// Catalog drops write their results into the results bucket.
    pub fn depends_on(&self) -> Option<TeardownStep> {
        match self {
            TeardownStep::ResultsBucket => Some(TeardownStep::Catalog),
            _ => None,
        }
    }
}

impl fmt::Display for TeardownStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TeardownStep {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_lowercase().replace('_', "-");
        TeardownStep::ALL
            .into_iter()
            .find(|step| step.name() == wanted)
            .ok_or_else(|| {
                let names: Vec<_> = TeardownStep::ALL.iter().map(|s| s.name()).collect();
                format!("unknown step '{}'. Available: {}", s, names.join(", "))
            })
    }
}

/// Selected steps, always kept in canonical order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeardownPlan {
    steps: Vec<TeardownStep>,
}

impl Default for TeardownPlan {
    fn default() -> Self {
        Self {
            steps: TeardownStep::ALL.to_vec(),
        }
    }
}

impl TeardownPlan {
    /// Build a plan from `--step` selections or a `--resume-from` point
    pub fn select(only: &[TeardownStep], resume_from: Option<TeardownStep>) -> Result<Self> {
        if !only.is_empty() && resume_from.is_some() {
            bail!("--step and --resume-from cannot be combined");
        }
        let steps = TeardownStep::ALL
            .into_iter()
            .filter(|step| only.is_empty() || only.contains(step))
            .filter(|step| resume_from.map_or(true, |from| *step >= from))
            .collect();
        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[TeardownStep] {
        &self.steps
    }
}
