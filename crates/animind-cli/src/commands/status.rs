//! The `animind status` command.

use std::path::Path;

use anyhow::Result;
use comfy_table::{Cell, Table};

use animind_core::achievements::summarize;
use animind_core::traits::ProgressStore;

pub fn execute(config_path: Option<&Path>, json: bool) -> Result<()> {
    let (config, engine) = super::open(config_path)?;
    let progress = engine.progress();

    if json {
        println!("{}", serde_json::to_string_pretty(progress)?);
        return Ok(());
    }

    let catalog = config.achievement_catalog()?;
    let summary = summarize(&engine.achievements(&catalog));

    let mut table = Table::new();
    table.set_header(vec!["Field", "Value"]);
    table.add_row(vec![Cell::new("Name"), Cell::new(&progress.name)]);
    table.add_row(vec![Cell::new("Grade"), Cell::new(progress.current_grade)]);
    table.add_row(vec![Cell::new("Coins"), Cell::new(progress.coins)]);
    table.add_row(vec![Cell::new("Streak"), Cell::new(progress.streak)]);
    table.add_row(vec![
        Cell::new("Problems solved"),
        Cell::new(progress.total_problems),
    ]);
    table.add_row(vec![
        Cell::new("Accuracy"),
        Cell::new(format!("{}%", progress.accuracy)),
    ]);
    table.add_row(vec![
        Cell::new("Achievements"),
        Cell::new(format!("{}/{}", summary.unlocked, summary.total)),
    ]);

    println!("{table}");
    println!("Progress file: {}", engine.store().location());
    Ok(())
}
