//! The `animind init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("animind.toml").exists() {
        println!("animind.toml already exists, skipping.");
    } else {
        std::fs::write("animind.toml", SAMPLE_CONFIG)?;
        println!("Created animind.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit animind.toml to set the student's name");
    println!("  2. Run: animind topics");
    println!("  3. Run: animind quiz --topic addition");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# animind configuration

student_name = "Student"
progress_path = "animind_user.json"

# Replace the built-in question bank with a TOML file or directory.
# content_path = "content"

# Replace the built-in achievement catalog.
# achievements_path = "achievements.toml"

# Fixed seed for reproducible lab experiments.
# lab_seed = 42
"#;
