//! The `animind validate` command.

use std::path::PathBuf;

use anyhow::Result;

use animind_core::parser::{load_content, validate_content};

pub fn execute(content_path: PathBuf) -> Result<()> {
    let content = load_content(&content_path)?;
    println!(
        "Content: {} topics, {} questions",
        content.topics.len(),
        content.entries.len()
    );

    let warnings = validate_content(&content);
    for w in &warnings {
        let prefix = w
            .question_id
            .as_ref()
            .map(|id| format!("  [{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("All content valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
