//! The `animind topics` command.

use std::path::Path;

use anyhow::Result;
use comfy_table::{Cell, Table};

use animind_core::model::check_grade;

pub fn execute(config_path: Option<&Path>, grade: Option<u8>) -> Result<()> {
    let (config, engine) = super::open(config_path)?;
    let grade = check_grade(grade.unwrap_or(engine.progress().current_grade))?;
    let bank = config.question_bank()?;

    let topics = bank.topics(grade);
    if topics.is_empty() {
        println!("No topics listed for grade {grade}.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["", "Topic", "Title", "Questions", "Description"]);
    for topic in topics {
        let set = bank.get_questions(grade, &topic.id);
        let count = if set.is_placeholder {
            "coming soon".to_string()
        } else {
            set.len().to_string()
        };
        table.add_row(vec![
            Cell::new(&topic.icon),
            Cell::new(&topic.id),
            Cell::new(&topic.title),
            Cell::new(count),
            Cell::new(&topic.description),
        ]);
    }

    println!("Grade {grade} topics");
    println!("{table}");
    Ok(())
}
