//! Outcome frequency statistics for lab sessions.

use serde::{Deserialize, Serialize};

use crate::experiment::ExperimentResult;

/// How often one outcome occurred.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeStat {
    pub outcome: String,
    pub frequency: u32,
    /// Share of all trials, rounded to one decimal place.
    pub percentage: f64,
}

/// Group `results` by outcome, in order of first appearance.
///
/// Percentages are `round(frequency / total * 1000) / 10`, so they may not
/// sum to exactly 100.
pub fn outcome_statistics(results: &[ExperimentResult]) -> Vec<OutcomeStat> {
    let mut stats: Vec<OutcomeStat> = Vec::new();
    for r in results {
        match stats.iter_mut().find(|s| s.outcome == r.outcome) {
            Some(stat) => stat.frequency += 1,
            None => stats.push(OutcomeStat {
                outcome: r.outcome.clone(),
                frequency: 1,
                percentage: 0.0,
            }),
        }
    }

    let total = results.len() as f64;
    for stat in &mut stats {
        stat.percentage = percentage(stat.frequency, total);
    }
    stats
}

fn percentage(frequency: u32, total: f64) -> f64 {
    if total == 0.0 {
        return 0.0;
    }
    (f64::from(frequency) / total * 1000.0).round() / 10.0
}

/// Observed share of one outcome, as a fraction in `[0, 1]`.
pub fn observed_frequency(results: &[ExperimentResult], outcome: &str) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    let hits = results.iter().filter(|r| r.outcome == outcome).count();
    hits as f64 / results.len() as f64
}
