//! Core data model types for animind.
//!
//! `UserProgress` is the single persisted record; its serialized field names
//! (`currentGrade`, `totalProblems`, `gradeProgress`, ...) are the storage
//! format and must not change.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Lowest selectable grade.
pub const MIN_GRADE: u8 = 1;
/// Highest selectable grade.
pub const MAX_GRADE: u8 = 5;

/// Coins granted to a freshly created record.
pub const STARTING_COINS: u32 = 100;

/// Name used when the caller does not supply one.
pub const DEFAULT_STUDENT_NAME: &str = "Student";

/// Check that `grade` lies in `MIN_GRADE..=MAX_GRADE`.
pub fn check_grade(grade: u8) -> Result<u8, EngineError> {
    if (MIN_GRADE..=MAX_GRADE).contains(&grade) {
        Ok(grade)
    } else {
        Err(EngineError::InvalidGrade(grade))
    }
}

/// The learner's persisted progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    /// Display name, fixed when the record is created.
    pub name: String,
    /// Grade whose topics are currently shown.
    pub current_grade: u8,
    /// Coin balance. There is no spending path, so it only grows.
    pub coins: u32,
    /// Consecutive correct answers since the last miss.
    pub streak: u32,
    /// Number of submitted answers, correct or not.
    pub total_problems: u32,
    /// Rolling accuracy percentage, 0-100.
    pub accuracy: u32,
    /// Advisory list of unlocked achievement ids.
    #[serde(default)]
    pub achievements: Vec<String>,
    /// Per-grade completion data, keyed by grade.
    #[serde(default)]
    pub grade_progress: BTreeMap<String, GradeProgress>,
}

impl UserProgress {
    /// A fresh record with the starting balance and grade 1.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            current_grade: MIN_GRADE,
            coins: STARTING_COINS,
            streak: 0,
            total_problems: 0,
            accuracy: 0,
            achievements: Vec::new(),
            grade_progress: BTreeMap::new(),
        }
    }

    /// Returns a copy with `current_grade` replaced. The caller persists it.
    pub fn with_grade(&self, grade: u8) -> Result<Self, EngineError> {
        let grade = check_grade(grade)?;
        Ok(Self {
            current_grade: grade,
            ..self.clone()
        })
    }

    /// Whether a decoded record satisfies the field ranges.
    ///
    /// Stores treat a record failing this check the same as one that does
    /// not parse.
    pub fn is_valid(&self) -> bool {
        check_grade(self.current_grade).is_ok() && self.accuracy <= 100
    }

    /// Number of distinct grades with recorded progress.
    pub fn grades_explored(&self) -> usize {
        self.grade_progress.len()
    }
}

impl Default for UserProgress {
    fn default() -> Self {
        Self::new(DEFAULT_STUDENT_NAME)
    }
}

/// Completion data for one grade. Populated outside the core.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GradeProgress {
    pub completion: f64,
    pub accuracy: f64,
}

/// How the presentation layer renders a question's animation string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationType {
    Emoji,
    Visual,
    Interactive,
}

/// Advisory difficulty tag. Rewards come from the question, not from this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Unique identifier within the bank.
    pub id: String,
    /// Prompt text shown to the learner.
    pub question: String,
    /// Animation descriptor, opaque to the core.
    #[serde(default)]
    pub animation: String,
    /// Rendering mode for `animation`.
    pub animation_type: AnimationType,
    /// Answer options, in display order.
    pub options: Vec<String>,
    /// Zero-based index into `options`.
    pub correct_answer: usize,
    /// Shown after the answer is submitted.
    #[serde(default)]
    pub explanation: String,
    /// Coins granted for a correct answer.
    pub coins: u32,
    pub difficulty: Difficulty,
}

/// Identifies a topic within a grade, e.g. `3-fractions`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TopicKey {
    pub grade: u8,
    pub topic: String,
}

impl TopicKey {
    pub fn new(grade: u8, topic: impl Into<String>) -> Self {
        Self {
            grade,
            topic: topic.into(),
        }
    }
}

impl fmt::Display for TopicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.grade, self.topic)
    }
}

/// A topic as listed on a grade's dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub grade: u8,
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

/// The ordered questions for one topic. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionSet {
    /// The key this set was requested under.
    pub key: TopicKey,
    /// Questions in play order.
    pub questions: Vec<Question>,
    /// `true` when no content was authored and the placeholder stands in.
    pub is_placeholder: bool,
}

impl QuestionSet {
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_record_defaults() {
        let p = UserProgress::default();
        assert_eq!(p.name, "Student");
        assert_eq!(p.current_grade, 1);
        assert_eq!(p.coins, 100);
        assert_eq!(p.streak, 0);
        assert_eq!(p.total_problems, 0);
        assert_eq!(p.accuracy, 0);
        assert!(p.achievements.is_empty());
        assert!(p.grade_progress.is_empty());
    }

    #[test]
    fn serialized_field_names() {
        let json = serde_json::to_value(UserProgress::new("Ada")).unwrap();
        let obj = json.as_object().unwrap();
        for key in [
            "name",
            "currentGrade",
            "coins",
            "streak",
            "totalProblems",
            "accuracy",
            "achievements",
            "gradeProgress",
        ] {
            assert!(obj.contains_key(key), "missing field {key}");
        }
        assert_eq!(obj.len(), 8);
    }

    #[test]
    fn parses_browser_record() {
        let raw = r#"{"name":"Student","currentGrade":3,"coins":245,"streak":2,
            "totalProblems":9,"accuracy":78,"achievements":[],
            "gradeProgress":{"1":{"completion":50,"accuracy":80}}}"#;
        let p: UserProgress = serde_json::from_str(raw).unwrap();
        assert_eq!(p.current_grade, 3);
        assert_eq!(p.grades_explored(), 1);
        assert!(p.is_valid());
    }

    #[test]
    fn with_grade_replaces_only_grade() {
        let p = UserProgress::default();
        let q = p.with_grade(4).unwrap();
        assert_eq!(q.current_grade, 4);
        assert_eq!(q.coins, p.coins);
        assert!(matches!(p.with_grade(0), Err(EngineError::InvalidGrade(0))));
        assert!(matches!(p.with_grade(6), Err(EngineError::InvalidGrade(6))));
    }

    #[test]
    fn validity_ranges() {
        let mut p = UserProgress::default();
        p.accuracy = 101;
        assert!(!p.is_valid());
        p.accuracy = 100;
        p.current_grade = 0;
        assert!(!p.is_valid());
    }

    #[test]
    fn difficulty_display_and_parse() {
        assert_eq!(Difficulty::Hard.to_string(), "hard");
        assert_eq!("Medium".parse::<Difficulty>().unwrap(), Difficulty::Medium);
        assert!("impossible".parse::<Difficulty>().is_err());
    }

    #[test]
    fn topic_key_display() {
        assert_eq!(TopicKey::new(2, "two-digit").to_string(), "2-two-digit");
    }
}
