//! TOML content parser.
//!
//! Loads question banks and achievement catalogs from TOML files and
//! directories, and validates question content.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::achievements::{AchievementRule, Metric, Tier};
use crate::model::{AnimationType, Difficulty, Question, Topic, TopicKey, MAX_GRADE, MIN_GRADE};

/// Intermediate TOML structure for question content files.
#[derive(Debug, Deserialize)]
struct TomlContentFile {
    #[serde(default)]
    topics: Vec<Topic>,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    grade: u8,
    topic: String,
    id: String,
    question: String,
    #[serde(default)]
    animation: String,
    #[serde(default = "default_animation_type")]
    animation_type: AnimationType,
    options: Vec<String>,
    correct_answer: usize,
    #[serde(default)]
    explanation: String,
    #[serde(default = "default_coins")]
    coins: u32,
    #[serde(default = "default_difficulty")]
    difficulty: Difficulty,
}

fn default_animation_type() -> AnimationType {
    AnimationType::Emoji
}

fn default_coins() -> u32 {
    10
}

fn default_difficulty() -> Difficulty {
    Difficulty::Easy
}

/// Intermediate TOML structure for achievement catalog files.
#[derive(Debug, Deserialize)]
struct TomlAchievementFile {
    #[serde(default)]
    achievements: Vec<TomlAchievement>,
}

#[derive(Debug, Deserialize)]
struct TomlAchievement {
    id: String,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    requirement: String,
    metric: Metric,
    threshold: u32,
    tier: Tier,
    #[serde(default = "default_true")]
    show_progress: bool,
    #[serde(default = "default_true")]
    cap_progress: bool,
}

fn default_true() -> bool {
    true
}

/// A question together with the topic it is filed under.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentEntry {
    pub key: TopicKey,
    pub question: Question,
}

/// Parsed question content: the topic catalog plus every authored question,
/// in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Content {
    pub topics: Vec<Topic>,
    pub entries: Vec<ContentEntry>,
}

impl Content {
    /// Append another content file's topics and questions.
    pub fn merge(&mut self, other: Content) {
        self.topics.extend(other.topics);
        self.entries.extend(other.entries);
    }
}

/// Parse a single TOML content file.
pub fn parse_content(path: &Path) -> Result<Content> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read content file: {}", path.display()))?;

    parse_content_str(&content, path)
}

/// Parse a TOML string into `Content` (useful for testing).
pub fn parse_content_str(content: &str, source_path: &Path) -> Result<Content> {
    let parsed: TomlContentFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let entries = parsed
        .questions
        .into_iter()
        .map(|q| ContentEntry {
            key: TopicKey::new(q.grade, q.topic),
            question: Question {
                id: q.id,
                question: q.question,
                animation: q.animation,
                animation_type: q.animation_type,
                options: q.options,
                correct_answer: q.correct_answer,
                explanation: q.explanation,
                coins: q.coins,
                difficulty: q.difficulty,
            },
        })
        .collect();

    Ok(Content {
        topics: parsed.topics,
        entries,
    })
}

/// Load a content file, or every `.toml` file under a directory merged
/// together. Unparseable files inside a directory are skipped with a warning.
pub fn load_content(path: &Path) -> Result<Content> {
    if path.is_dir() {
        load_content_directory(path)
    } else {
        parse_content(path)
    }
}

/// Recursively load and merge all `.toml` content files from a directory.
pub fn load_content_directory(dir: &Path) -> Result<Content> {
    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        paths.push(entry?.path());
    }
    // read_dir order is platform dependent; keep question order stable.
    paths.sort();

    let mut merged = Content::default();
    for path in paths {
        if path.is_dir() {
            merged.merge(load_content_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_content(&path) {
                Ok(content) => merged.merge(content),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(merged)
}

/// Parse an achievement catalog from a TOML string.
pub fn parse_achievements_str(content: &str, source_path: &Path) -> Result<Vec<AchievementRule>> {
    let parsed: TomlAchievementFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    Ok(parsed
        .achievements
        .into_iter()
        .map(|a| AchievementRule {
            id: a.id,
            title: a.title,
            description: a.description,
            requirement: a.requirement,
            metric: a.metric,
            threshold: a.threshold,
            tier: a.tier,
            show_progress: a.show_progress,
            cap_progress: a.cap_progress,
        })
        .collect())
}

/// Parse an achievement catalog file.
pub fn parse_achievements(path: &Path) -> Result<Vec<AchievementRule>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read achievement catalog: {}", path.display()))?;

    parse_achievements_str(&content, path)
}

/// A warning from content validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn question(id: &str, message: impl Into<String>) -> Self {
        Self {
            question_id: Some(id.to_string()),
            message: message.into(),
        }
    }
}

/// Validate question content for common authoring mistakes.
pub fn validate_content(content: &Content) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    for topic in &content.topics {
        if !(MIN_GRADE..=MAX_GRADE).contains(&topic.grade) {
            warnings.push(ValidationWarning {
                question_id: None,
                message: format!("topic '{}' has invalid grade {}", topic.id, topic.grade),
            });
        }
    }

    let known_topics: HashSet<TopicKey> = content
        .topics
        .iter()
        .map(|t| TopicKey::new(t.grade, t.id.clone()))
        .collect();

    let mut seen_ids = HashSet::new();
    for entry in &content.entries {
        let q = &entry.question;

        if !seen_ids.insert(q.id.as_str()) {
            warnings.push(ValidationWarning::question(
                &q.id,
                format!("duplicate question ID: {}", q.id),
            ));
        }

        if !(MIN_GRADE..=MAX_GRADE).contains(&entry.key.grade) {
            warnings.push(ValidationWarning::question(
                &q.id,
                format!("invalid grade {}", entry.key.grade),
            ));
        }

        if !known_topics.contains(&entry.key) {
            warnings.push(ValidationWarning::question(
                &q.id,
                format!("topic '{}' is not in the topic catalog", entry.key),
            ));
        }

        if q.options.len() < 2 {
            warnings.push(ValidationWarning::question(
                &q.id,
                "question needs at least two options",
            ));
        }

        if q.correct_answer >= q.options.len() {
            warnings.push(ValidationWarning::question(
                &q.id,
                format!(
                    "correct_answer {} is out of range for {} options",
                    q.correct_answer,
                    q.options.len()
                ),
            ));
        }

        if q.question.trim().is_empty() {
            warnings.push(ValidationWarning::question(&q.id, "question text is empty"));
        }
    }

    warnings
}
