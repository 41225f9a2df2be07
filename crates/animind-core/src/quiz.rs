//! Quiz session state machine and answer scoring.
//!
//! A session walks one `QuestionSet`:
//!
//! ```text
//! AwaitingSelection -> AwaitingSubmit -> ShowingResult -> AwaitingSelection (next question)
//!                                                      \-> TopicComplete
//! ```
//!
//! Calls made in the wrong state are rejected with
//! `EngineError::InvalidStateTransition` and leave both the session and the
//! progress record untouched.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::model::{Question, QuestionSet, TopicKey, UserProgress};

/// Where a quiz session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizState {
    AwaitingSelection,
    AwaitingSubmit,
    ShowingResult,
    TopicComplete,
}

impl fmt::Display for QuizState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizState::AwaitingSelection => write!(f, "awaiting selection"),
            QuizState::AwaitingSubmit => write!(f, "awaiting submit"),
            QuizState::ShowingResult => write!(f, "showing result"),
            QuizState::TopicComplete => write!(f, "topic complete"),
        }
    }
}

/// Outcome of a submitted answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub question_id: String,
    pub selected: usize,
    pub correct_answer: usize,
    pub correct: bool,
    /// Coins credited for this answer; zero when incorrect.
    pub earned_coins: u32,
}

/// What `advance` moved the session to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// The next question is showing with no option selected.
    NextQuestion { index: usize },
    /// The set is exhausted; control returns to the caller.
    TopicComplete,
}

/// Recompute accuracy from the rolling percentage.
///
/// The historical correct count is reconstructed as
/// `old_total * old_accuracy / 100` rather than stored, so the value drifts
/// from the exact ratio once rounding has occurred. Stored records depend on
/// this arithmetic; keep it lossy.
pub fn rolling_accuracy(old_total: u32, old_accuracy: u32, correct: bool) -> u32 {
    let implied_correct = f64::from(old_total) * f64::from(old_accuracy) / 100.0;
    let numerator = if correct {
        implied_correct + 1.0
    } else {
        implied_correct
    };
    let new_total = f64::from(old_total) + 1.0;
    (numerator / new_total * 100.0).round().clamp(0.0, 100.0) as u32
}

/// Apply one answer to the progress record and return the coins earned.
///
/// All four fields are computed from the pre-submission values before any is
/// written.
pub fn record_answer(progress: &mut UserProgress, correct: bool, reward: u32) -> u32 {
    let accuracy = rolling_accuracy(progress.total_problems, progress.accuracy, correct);
    let total_problems = progress.total_problems.saturating_add(1);
    let (coins, streak, earned) = if correct {
        (
            progress.coins.saturating_add(reward),
            progress.streak.saturating_add(1),
            reward,
        )
    } else {
        (progress.coins, 0, 0)
    };

    progress.accuracy = accuracy;
    progress.total_problems = total_problems;
    progress.coins = coins;
    progress.streak = streak;
    earned
}

/// One pass through a topic's questions.
#[derive(Debug, Clone)]
pub struct QuizSession {
    set: QuestionSet,
    index: usize,
    selected: Option<usize>,
    state: QuizState,
    last: Option<Submission>,
    correct_count: u32,
    coins_earned: u32,
}

impl QuizSession {
    pub fn new(set: QuestionSet) -> Self {
        let state = if set.is_empty() {
            QuizState::TopicComplete
        } else {
            QuizState::AwaitingSelection
        };
        Self {
            set,
            index: 0,
            selected: None,
            state,
            last: None,
            correct_count: 0,
            coins_earned: 0,
        }
    }

    pub fn key(&self) -> &TopicKey {
        &self.set.key
    }

    pub fn state(&self) -> QuizState {
        self.state
    }

    /// Zero-based position of the current question.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of questions in the set.
    pub fn total(&self) -> usize {
        self.set.len()
    }

    pub fn is_placeholder(&self) -> bool {
        self.set.is_placeholder
    }

    /// The question being shown, or `None` once the topic is complete.
    pub fn current_question(&self) -> Option<&Question> {
        match self.state {
            QuizState::TopicComplete => None,
            _ => self.set.get(self.index),
        }
    }

    /// The tentatively chosen option, if any.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// The result being shown, if the session is in `ShowingResult`.
    pub fn last_submission(&self) -> Option<&Submission> {
        self.last.as_ref()
    }

    /// Correct answers given in this session.
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    /// Coins earned in this session.
    pub fn coins_earned(&self) -> u32 {
        self.coins_earned
    }

    fn reject(&self, operation: &'static str) -> EngineError {
        EngineError::InvalidStateTransition {
            operation,
            state: self.state.to_string(),
        }
    }

    /// Record a tentative choice. Allowed until the answer is submitted.
    pub fn select_answer(&mut self, index: usize) -> Result<(), EngineError> {
        if !matches!(
            self.state,
            QuizState::AwaitingSelection | QuizState::AwaitingSubmit
        ) {
            return Err(self.reject("select an answer"));
        }
        let options = self
            .current_question()
            .map(|q| q.options.len())
            .unwrap_or(0);
        if index >= options {
            return Err(EngineError::OptionOutOfRange { index, options });
        }

        self.selected = Some(index);
        self.state = QuizState::AwaitingSubmit;
        Ok(())
    }

    /// Grade the selected option and apply the result to `progress`.
    pub fn submit(&mut self, progress: &mut UserProgress) -> Result<Submission, EngineError> {
        if self.state != QuizState::AwaitingSubmit {
            return Err(self.reject("submit"));
        }
        let (Some(selected), Some(question)) = (self.selected, self.set.get(self.index)) else {
            return Err(self.reject("submit"));
        };

        let correct = selected == question.correct_answer;
        let question_id = question.id.clone();
        let correct_answer = question.correct_answer;
        let earned_coins = record_answer(progress, correct, question.coins);

        if correct {
            self.correct_count += 1;
            self.coins_earned = self.coins_earned.saturating_add(earned_coins);
        }

        let submission = Submission {
            question_id,
            selected,
            correct_answer,
            correct,
            earned_coins,
        };
        tracing::debug!(
            "{} q{} ({}): selected {}, correct={}, +{} coins",
            self.set.key,
            self.index + 1,
            submission.question_id,
            selected,
            correct,
            earned_coins
        );
        self.last = Some(submission.clone());
        self.state = QuizState::ShowingResult;
        Ok(submission)
    }

    /// Move past the shown result to the next question or finish the topic.
    pub fn advance(&mut self) -> Result<Advance, EngineError> {
        if self.state != QuizState::ShowingResult {
            return Err(self.reject("advance"));
        }

        self.selected = None;
        self.last = None;
        if self.index + 1 < self.set.len() {
            self.index += 1;
            self.state = QuizState::AwaitingSelection;
            Ok(Advance::NextQuestion { index: self.index })
        } else {
            self.state = QuizState::TopicComplete;
            Ok(Advance::TopicComplete)
        }
    }
}
