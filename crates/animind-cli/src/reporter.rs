//! Console session reporter.

use animind_core::experiment::ExperimentResult;
use animind_core::model::{TopicKey, UserProgress};
use animind_core::quiz::Submission;
use animind_core::traits::SessionReporter;

/// Prints session events to stdout as they happen.
pub struct ConsoleReporter;

impl SessionReporter for ConsoleReporter {
    fn on_answer(&self, submission: &Submission, progress: &UserProgress) {
        if submission.correct {
            println!(
                "  Correct! +{} coins (streak {}, {} coins total)",
                submission.earned_coins, progress.streak, progress.coins
            );
        } else {
            println!(
                "  Not quite. The answer was option {}.",
                submission.correct_answer
            );
        }
    }

    fn on_topic_complete(&self, key: &TopicKey, progress: &UserProgress) {
        println!(
            "\nTopic {key} complete! {} problems solved, {}% accuracy.",
            progress.total_problems, progress.accuracy
        );
    }

    fn on_trial(&self, result: &ExperimentResult, coins_awarded: u32) {
        println!(
            "  Trial {}: {} (p = {:.3}) +{coins_awarded} coins",
            result.trial, result.outcome, result.probability
        );
    }
}
