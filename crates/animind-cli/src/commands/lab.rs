//! The `animind lab` command.

use std::path::{Path, PathBuf};

use anyhow::Result;
use comfy_table::{Cell, Table};

use animind_core::experiment::{ExperimentKind, LabSession, RECENT_RESULTS};
use animind_core::report::LabReport;

use crate::reporter::ConsoleReporter;

pub fn execute(
    config_path: Option<&Path>,
    experiment: String,
    trials: u32,
    seed: Option<u64>,
    output: Option<PathBuf>,
) -> Result<()> {
    let kind: ExperimentKind = experiment.parse()?;
    let (config, engine) = super::open(config_path)?;
    let mut engine = engine.with_reporter(Box::new(ConsoleReporter));
    let mut rng = config.lab_rng(seed);
    let mut lab = LabSession::new();

    println!(
        "{} ({}), expected probability {:.3}, {} coins per trial",
        kind.title(),
        kind.difficulty(),
        kind.expected_probability(),
        kind.reward()
    );
    for _ in 0..trials {
        engine.run_experiment(&mut lab, kind, &mut rng)?;
    }

    if lab.total_trials() > RECENT_RESULTS {
        let recent: Vec<&str> = lab
            .recent(RECENT_RESULTS)
            .iter()
            .map(|r| r.outcome.as_str())
            .collect();
        println!("\nLast {RECENT_RESULTS}: {}", recent.join(", "));
    }

    let mut table = Table::new();
    table.set_header(vec!["Outcome", "Count", "Percent"]);
    for stat in lab.statistics() {
        table.add_row(vec![
            Cell::new(&stat.outcome),
            Cell::new(stat.frequency),
            Cell::new(format!("{:.1}%", stat.percentage)),
        ]);
    }
    println!("\n{table}");
    println!(
        "{} trials, +{} coins ({} total)",
        lab.total_trials(),
        lab.coins_earned(),
        engine.progress().coins
    );

    if let Some(dir) = output {
        let report = LabReport::from_session(&lab);
        let path = dir.join(report.file_name());
        report.save_json(&path)?;
        println!("Lab report saved to: {}", path.display());
    }

    Ok(())
}
