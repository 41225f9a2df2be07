//! Lab session reports with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::experiment::{ExperimentKind, ExperimentResult, LabSession};
use crate::statistics::OutcomeStat;

/// A snapshot of one lab session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Experiment that produced the last displayed outcome, if any.
    pub experiment: Option<ExperimentKind>,
    /// Every trial, oldest first.
    pub results: Vec<ExperimentResult>,
    pub statistics: Vec<OutcomeStat>,
    pub coins_earned: u32,
}

impl LabReport {
    /// Capture the current state of `lab`.
    pub fn from_session(lab: &LabSession) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            experiment: lab.displayed_outcome().map(|(kind, _)| kind),
            results: lab.history().to_vec(),
            statistics: lab.statistics(),
            coins_earned: lab.coins_earned(),
        }
    }

    /// File name used when saving into a directory.
    pub fn file_name(&self) -> String {
        let label = self.experiment.map(|k| k.id()).unwrap_or("lab");
        format!("{label}-{}.json", self.created_at.format("%Y%m%dT%H%M%S"))
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize lab report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write lab report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read lab report from {}", path.display()))?;
        let report: LabReport =
            serde_json::from_str(&content).context("failed to parse lab report JSON")?;
        Ok(report)
    }
}
