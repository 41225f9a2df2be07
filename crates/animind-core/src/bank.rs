//! Question bank lookup keyed by grade and topic.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;

use crate::model::{AnimationType, Difficulty, Question, QuestionSet, Topic, TopicKey};
use crate::parser::{self, Content};

/// The question bank compiled into the binary.
pub const EMBEDDED_QUESTIONS: &str = include_str!("../content/questions.toml");

/// Coins granted by the placeholder question.
pub const PLACEHOLDER_COINS: u32 = 10;

/// Static question content, indexed by topic.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    topics: Vec<Topic>,
    sets: BTreeMap<TopicKey, Vec<Question>>,
}

impl QuestionBank {
    /// Build a bank from parsed content. Questions keep their file order
    /// within each topic.
    pub fn from_content(content: Content) -> Self {
        let mut sets: BTreeMap<TopicKey, Vec<Question>> = BTreeMap::new();
        for entry in content.entries {
            sets.entry(entry.key).or_default().push(entry.question);
        }
        Self {
            topics: content.topics,
            sets,
        }
    }

    /// The default bank shipped with animind.
    pub fn embedded() -> Result<Self> {
        let content = parser::parse_content_str(EMBEDDED_QUESTIONS, Path::new("<embedded>"))?;
        Ok(Self::from_content(content))
    }

    /// Load a bank from a content file or directory.
    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::from_content(parser::load_content(path)?))
    }

    /// Questions for `(grade, topic)`, or the one-question placeholder set
    /// when nothing has been authored for that key.
    pub fn get_questions(&self, grade: u8, topic: &str) -> QuestionSet {
        let key = TopicKey::new(grade, topic);
        match self.sets.get(&key) {
            Some(questions) if !questions.is_empty() => QuestionSet {
                key,
                questions: questions.clone(),
                is_placeholder: false,
            },
            _ => {
                tracing::debug!("no content for {key}, using placeholder");
                QuestionSet {
                    key,
                    questions: vec![placeholder_question()],
                    is_placeholder: true,
                }
            }
        }
    }

    /// Topics listed for a grade, in catalog order.
    pub fn topics(&self, grade: u8) -> Vec<&Topic> {
        self.topics.iter().filter(|t| t.grade == grade).collect()
    }

    /// Grades that have at least one listed topic, ascending.
    pub fn grades(&self) -> Vec<u8> {
        let mut grades: Vec<u8> = self.topics.iter().map(|t| t.grade).collect();
        grades.sort_unstable();
        grades.dedup();
        grades
    }

    /// Total number of authored questions.
    pub fn question_count(&self) -> usize {
        self.sets.values().map(Vec::len).sum()
    }
}

/// Stand-in for topics whose content has not been written yet. Every option
/// is an enthusiastic "yes", and the first one counts as correct.
pub fn placeholder_question() -> Question {
    Question {
        id: "demo".into(),
        question: "This topic is being prepared with amazing content!".into(),
        animation: "🚧 Under Construction... Coming Soon! 🚧".into(),
        animation_type: AnimationType::Emoji,
        options: vec![
            "I'm excited!".into(),
            "Can't wait!".into(),
            "Bring it on!".into(),
            "Let's learn!".into(),
        ],
        correct_answer: 0,
        explanation: "Thank you for your patience! This topic will have incredible interactive content soon! 🌟".into(),
        coins: PLACEHOLDER_COINS,
        difficulty: Difficulty::Easy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::validate_content;

    #[test]
    fn embedded_bank_is_valid() {
        let content =
            parser::parse_content_str(EMBEDDED_QUESTIONS, Path::new("<embedded>")).unwrap();
        let warnings = validate_content(&content);
        assert!(warnings.is_empty(), "embedded content warnings: {warnings:?}");
    }

    #[test]
    fn embedded_bank_has_four_topics_per_grade() {
        let bank = QuestionBank::embedded().unwrap();
        assert_eq!(bank.grades(), vec![1, 2, 3, 4, 5]);
        for grade in 1..=5 {
            assert_eq!(bank.topics(grade).len(), 4, "grade {grade}");
        }
        assert_eq!(bank.topics(1)[0].id, "counting");
    }

    #[test]
    fn lookup_preserves_authored_order() {
        let bank = QuestionBank::embedded().unwrap();
        let set = bank.get_questions(1, "counting");
        assert!(!set.is_placeholder);
        let ids: Vec<&str> = set.questions.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["count1", "count2", "count3"]);
    }

    #[test]
    fn unknown_topic_falls_back_to_placeholder() {
        let bank = QuestionBank::embedded().unwrap();
        let set = bank.get_questions(1, "unknown-topic");
        assert!(set.is_placeholder);
        assert_eq!(set.len(), 1);
        assert_eq!(set.questions[0].correct_answer, 0);
        assert_eq!(set.questions[0].coins, 10);
        assert_eq!(set.key, TopicKey::new(1, "unknown-topic"));
    }

    #[test]
    fn topic_in_wrong_grade_is_unknown() {
        let bank = QuestionBank::embedded().unwrap();
        assert!(bank.get_questions(2, "counting").is_placeholder);
    }

    #[test]
    fn lookup_is_deterministic() {
        let bank = QuestionBank::embedded().unwrap();
        assert_eq!(
            bank.get_questions(3, "fractions"),
            bank.get_questions(3, "fractions")
        );
    }

    #[test]
    fn empty_bank_only_serves_placeholders() {
        let bank = QuestionBank::default();
        assert_eq!(bank.question_count(), 0);
        assert!(bank.grades().is_empty());
        assert!(bank.get_questions(4, "data").is_placeholder);
    }
}
