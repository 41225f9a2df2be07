//! Progress engine: one student's record plus the sessions that mutate it.
//!
//! Every call that changes the record persists it before returning. Changes
//! are staged on copies and only become visible once the write succeeds, so
//! a rejected call or a failed write leaves the engine and session as they
//! were.

use crate::achievements::{Achievement, AchievementCatalog};
use crate::bank::QuestionBank;
use crate::error::EngineError;
use crate::experiment::{ExperimentKind, ExperimentResult, LabSession};
use crate::model::{check_grade, UserProgress};
use crate::quiz::{Advance, QuizSession, Submission};
use crate::traits::{NoopReporter, ProgressStore, RandomSource, SessionReporter};

/// Owns the progress store and the current snapshot of the record.
pub struct ProgressEngine<S: ProgressStore> {
    store: S,
    progress: UserProgress,
    reporter: Box<dyn SessionReporter>,
}

impl<S: ProgressStore> ProgressEngine<S> {
    /// Load the record from `store`, initializing it for `name` on first run.
    pub fn open(mut store: S, name: &str) -> Result<Self, EngineError> {
        let progress = store.load(name)?;
        tracing::debug!(
            "opened progress for {} at {} (grade {})",
            progress.name,
            store.location(),
            progress.current_grade
        );
        Ok(Self {
            store,
            progress,
            reporter: Box::new(NoopReporter),
        })
    }

    /// Route session events to `reporter`.
    pub fn with_reporter(mut self, reporter: Box<dyn SessionReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn progress(&self) -> &UserProgress {
        &self.progress
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Save `next` and only then make it the current record.
    fn commit(&mut self, next: UserProgress) -> Result<(), EngineError> {
        self.store.save(&next)?;
        self.progress = next;
        Ok(())
    }

    /// Change the current grade. Out-of-range grades are rejected.
    pub fn set_grade(&mut self, grade: u8) -> Result<(), EngineError> {
        let grade = check_grade(grade)?;
        let previous = self.progress.current_grade;
        let next = self.progress.with_grade(grade)?;
        self.commit(next)?;
        tracing::info!("grade changed from {previous} to {grade}");
        Ok(())
    }

    /// Begin a quiz on `(grade, topic)`. Unknown topics get the placeholder set.
    pub fn start_quiz(
        &self,
        bank: &QuestionBank,
        grade: u8,
        topic: &str,
    ) -> Result<QuizSession, EngineError> {
        let grade = check_grade(grade)?;
        Ok(QuizSession::new(bank.get_questions(grade, topic)))
    }

    /// Tentative choice; nothing is persisted.
    pub fn select_answer(
        &mut self,
        session: &mut QuizSession,
        index: usize,
    ) -> Result<(), EngineError> {
        session.select_answer(index)
    }

    /// Score the selected answer, apply it to the record and persist.
    pub fn submit(&mut self, session: &mut QuizSession) -> Result<Submission, EngineError> {
        let mut next = self.progress.clone();
        let mut staged = session.clone();
        let submission = staged.submit(&mut next)?;
        self.commit(next)?;
        *session = staged;
        self.reporter.on_answer(&submission, &self.progress);
        Ok(submission)
    }

    /// Move past the shown result.
    pub fn advance(&mut self, session: &mut QuizSession) -> Result<Advance, EngineError> {
        let step = session.advance()?;
        if step == Advance::TopicComplete {
            tracing::info!(
                "topic {} complete: {}/{} correct, {} coins",
                session.key(),
                session.correct_count(),
                session.total(),
                session.coins_earned()
            );
            self.reporter.on_topic_complete(session.key(), &self.progress);
        }
        Ok(step)
    }

    /// Run one lab trial, credit its reward and persist.
    pub fn run_experiment(
        &mut self,
        lab: &mut LabSession,
        kind: ExperimentKind,
        rng: &mut dyn RandomSource,
    ) -> Result<ExperimentResult, EngineError> {
        let mut next = self.progress.clone();
        let mut staged = lab.clone();
        let result = staged.run(kind, rng, &mut next);
        self.commit(next)?;
        *lab = staged;
        self.reporter.on_trial(&result, kind.reward());
        Ok(result)
    }

    /// Clear the lab's history. Coins stay credited, so nothing is written.
    pub fn reset_lab(&mut self, lab: &mut LabSession) {
        lab.reset();
    }

    /// Evaluate `catalog` against the current record.
    pub fn achievements(&self, catalog: &AchievementCatalog) -> Vec<Achievement> {
        catalog.evaluate(&self.progress)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::error::StoreError;
    use crate::model::TopicKey;
    use crate::quiz::QuizState;
    use crate::traits::{decode_record, ScriptedSource};

    #[derive(Default)]
    struct CountingStore {
        record: Option<String>,
        writes: usize,
    }

    impl ProgressStore for CountingStore {
        fn location(&self) -> String {
            "memory".into()
        }
        fn read_record(&self) -> Result<Option<String>, StoreError> {
            Ok(self.record.clone())
        }
        fn write_record(&mut self, contents: &str) -> Result<(), StoreError> {
            self.record = Some(contents.to_string());
            self.writes += 1;
            Ok(())
        }
    }

    #[derive(Default)]
    struct Events(RefCell<Vec<String>>);

    impl SessionReporter for Rc<Events> {
        fn on_answer(&self, s: &Submission, _: &UserProgress) {
            self.0.borrow_mut().push(format!("answer {} {}", s.question_id, s.correct));
        }
        fn on_topic_complete(&self, key: &TopicKey, _: &UserProgress) {
            self.0.borrow_mut().push(format!("complete {key}"));
        }
        fn on_trial(&self, r: &ExperimentResult, coins: u32) {
            self.0.borrow_mut().push(format!("trial {} +{coins}", r.trial));
        }
    }

    /// Accepts `writes_left` writes, then fails every one after.
    struct FlakyStore {
        record: Option<String>,
        writes_left: usize,
    }

    impl FlakyStore {
        fn failing_after(writes_left: usize) -> Self {
            Self {
                record: None,
                writes_left,
            }
        }
    }

    impl ProgressStore for FlakyStore {
        fn location(&self) -> String {
            "flaky".into()
        }
        fn read_record(&self) -> Result<Option<String>, StoreError> {
            Ok(self.record.clone())
        }
        fn write_record(&mut self, contents: &str) -> Result<(), StoreError> {
            if self.writes_left == 0 {
                return Err(StoreError::Io(std::io::Error::other("disk full")));
            }
            self.writes_left -= 1;
            self.record = Some(contents.to_string());
            Ok(())
        }
    }

    fn stored(engine: &ProgressEngine<CountingStore>) -> UserProgress {
        decode_record(engine.store().record.as_deref().unwrap()).unwrap()
    }

    #[test]
    fn open_initializes_record() {
        let engine = ProgressEngine::open(CountingStore::default(), "Ada").unwrap();
        assert_eq!(engine.progress().coins, 100);
        assert_eq!(engine.progress().current_grade, 1);
        assert_eq!(engine.store().writes, 1);
        assert_eq!(stored(&engine), *engine.progress());
    }

    #[test]
    fn set_grade_persists_and_rejects_out_of_range() {
        let mut engine = ProgressEngine::open(CountingStore::default(), "Ada").unwrap();
        engine.set_grade(3).unwrap();
        assert_eq!(stored(&engine).current_grade, 3);

        let writes = engine.store().writes;
        assert!(matches!(engine.set_grade(0), Err(EngineError::InvalidGrade(0))));
        assert!(matches!(engine.set_grade(6), Err(EngineError::InvalidGrade(6))));
        assert_eq!(engine.store().writes, writes);
        assert_eq!(engine.progress().current_grade, 3);
    }

    #[test]
    fn quiz_flow_persists_each_submission() {
        let events = Rc::new(Events::default());
        let mut engine = ProgressEngine::open(CountingStore::default(), "Ada")
            .unwrap()
            .with_reporter(Box::new(Rc::clone(&events)));
        let bank = QuestionBank::embedded().unwrap();
        let mut quiz = engine.start_quiz(&bank, 1, "addition").unwrap();

        engine.select_answer(&mut quiz, 1).unwrap();
        assert_eq!(engine.store().writes, 1);
        let first = engine.submit(&mut quiz).unwrap();
        assert!(first.correct);
        assert_eq!(engine.store().writes, 2);
        assert_eq!(stored(&engine).coins, 115);

        engine.advance(&mut quiz).unwrap();
        engine.select_answer(&mut quiz, 0).unwrap();
        engine.submit(&mut quiz).unwrap();
        assert_eq!(engine.advance(&mut quiz).unwrap(), Advance::TopicComplete);
        assert_eq!(quiz.state(), QuizState::TopicComplete);

        let log = events.0.borrow();
        assert_eq!(log.len(), 3);
        assert_eq!(log[0], "answer add1 true");
        assert_eq!(log[2], "complete 1-addition");
    }

    #[test]
    fn rejected_calls_do_not_write() {
        let mut engine = ProgressEngine::open(CountingStore::default(), "Ada").unwrap();
        let bank = QuestionBank::embedded().unwrap();
        let mut quiz = engine.start_quiz(&bank, 1, "addition").unwrap();
        let before = engine.progress().clone();

        assert!(engine.submit(&mut quiz).unwrap_err().is_rejection());
        assert!(engine.advance(&mut quiz).unwrap_err().is_rejection());
        assert!(engine.select_answer(&mut quiz, 9).unwrap_err().is_rejection());
        assert_eq!(engine.store().writes, 1);
        assert_eq!(*engine.progress(), before);
    }

    #[test]
    fn start_quiz_rejects_bad_grade() {
        let engine = ProgressEngine::open(CountingStore::default(), "Ada").unwrap();
        let bank = QuestionBank::embedded().unwrap();
        assert!(matches!(
            engine.start_quiz(&bank, 7, "addition"),
            Err(EngineError::InvalidGrade(7))
        ));
    }

    #[test]
    fn experiments_credit_and_persist() {
        let mut engine = ProgressEngine::open(CountingStore::default(), "Ada").unwrap();
        let mut lab = LabSession::new();
        let mut rng = ScriptedSource::constant(0.3);

        let r = engine
            .run_experiment(&mut lab, ExperimentKind::CoinFlip, &mut rng)
            .unwrap();
        assert_eq!(r.outcome, "heads");
        assert_eq!(stored(&engine).coins, 105);

        engine.reset_lab(&mut lab);
        assert!(lab.history().is_empty());
        assert_eq!(engine.progress().coins, 105);
        assert_eq!(engine.store().writes, 2);
    }

    #[test]
    fn reopen_sees_saved_state() {
        let mut engine = ProgressEngine::open(CountingStore::default(), "Ada").unwrap();
        engine.set_grade(4).unwrap();
        let store = engine.into_store();
        let engine = ProgressEngine::open(store, "Someone Else").unwrap();
        assert_eq!(engine.progress().name, "Ada");
        assert_eq!(engine.progress().current_grade, 4);
    }

    #[test]
    fn achievements_follow_progress() {
        let mut engine = ProgressEngine::open(CountingStore::default(), "Ada").unwrap();
        let catalog = AchievementCatalog::embedded().unwrap();
        let bank = QuestionBank::embedded().unwrap();
        assert!(!engine.achievements(&catalog)[0].unlocked);

        let mut quiz = engine.start_quiz(&bank, 1, "counting").unwrap();
        engine.select_answer(&mut quiz, 0).unwrap();
        engine.submit(&mut quiz).unwrap();
        assert!(engine.achievements(&catalog)[0].unlocked);
    }

    #[test]
    fn failed_submit_leaves_session_and_record_untouched() {
        let mut engine = ProgressEngine::open(FlakyStore::failing_after(1), "Ada").unwrap();
        let bank = QuestionBank::embedded().unwrap();
        let mut quiz = engine.start_quiz(&bank, 1, "addition").unwrap();
        let before = engine.progress().clone();
        let on_disk = engine.store().record.clone();

        engine.select_answer(&mut quiz, 1).unwrap();
        let err = engine.submit(&mut quiz).unwrap_err();
        assert!(matches!(err, EngineError::Store(StoreError::Io(_))));
        assert!(!err.is_rejection());
        assert_eq!(*engine.progress(), before);
        assert_eq!(quiz.state(), QuizState::AwaitingSubmit);
        assert_eq!(quiz.coins_earned(), 0);
        assert_eq!(engine.store().record, on_disk);

        engine.store.writes_left = 1;
        let retried = engine.submit(&mut quiz).unwrap();
        assert!(retried.correct);
        assert_eq!(engine.progress().coins, 115);
        assert_eq!(engine.progress().total_problems, 1);
    }

    #[test]
    fn failed_grade_change_keeps_old_grade() {
        let mut engine = ProgressEngine::open(FlakyStore::failing_after(1), "Ada").unwrap();
        assert!(matches!(
            engine.set_grade(4),
            Err(EngineError::Store(StoreError::Io(_)))
        ));
        assert_eq!(engine.progress().current_grade, 1);
        let on_disk = decode_record(engine.store().record.as_deref().unwrap()).unwrap();
        assert_eq!(on_disk.current_grade, 1);
    }

    #[test]
    fn failed_experiment_is_not_recorded() {
        let mut engine = ProgressEngine::open(FlakyStore::failing_after(1), "Ada").unwrap();
        let mut lab = LabSession::new();
        let mut rng = ScriptedSource::constant(0.3);

        assert!(engine
            .run_experiment(&mut lab, ExperimentKind::CoinFlip, &mut rng)
            .is_err());
        assert_eq!(engine.progress().coins, 100);
        assert!(lab.history().is_empty());
        assert_eq!(lab.coins_earned(), 0);
        assert!(lab.displayed_outcome().is_none());
    }
}
