//! The `animind achievements` command.

use std::path::Path;

use anyhow::Result;
use comfy_table::{Cell, Table};

use animind_core::achievements::summarize;

pub fn execute(config_path: Option<&Path>) -> Result<()> {
    let (config, engine) = super::open(config_path)?;
    let catalog = config.achievement_catalog()?;
    let achievements = engine.achievements(&catalog);

    let mut table = Table::new();
    table.set_header(vec!["", "Achievement", "Tier", "Requirement", "Progress"]);
    for a in &achievements {
        let progress = match (a.progress, a.max_progress) {
            (Some(p), Some(max)) => format!("{p}/{max}"),
            _ => String::new(),
        };
        table.add_row(vec![
            Cell::new(if a.unlocked { "*" } else { " " }),
            Cell::new(&a.title),
            Cell::new(a.tier),
            Cell::new(&a.requirement),
            Cell::new(progress),
        ]);
    }

    let summary = summarize(&achievements);
    println!("{table}");
    println!("{} of {} unlocked", summary.unlocked, summary.total);
    Ok(())
}
