//! The `animind grade` command.

use std::path::Path;

use anyhow::Result;

pub fn execute(config_path: Option<&Path>, grade: u8) -> Result<()> {
    let (_, mut engine) = super::open(config_path)?;
    engine.set_grade(grade)?;
    println!("Current grade set to {grade}.");
    Ok(())
}
