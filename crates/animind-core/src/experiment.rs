//! Probability lab: randomized trials and their session history.
//!
//! A `LabSession` cycles `Idle -> Running -> Settled` on every run and can be
//! re-armed from `Settled` indefinitely. All randomness comes from the
//! `RandomSource` passed to `run`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::model::UserProgress;
use crate::statistics::{outcome_statistics, OutcomeStat};
use crate::traits::RandomSource;

/// Number of recent results the lab's result panel shows.
pub const RECENT_RESULTS: usize = 10;

const COIN_SIDES: [&str; 2] = ["heads", "tails"];
const SPINNER_COLORS: [&str; 4] = ["Red", "Blue", "Green", "Yellow"];
const CARD_SUITS: [&str; 4] = ["♠", "♥", "♦", "♣"];
const CARD_RANKS: [&str; 13] = [
    "A", "2", "3", "4", "5", "6", "7", "8", "9", "10", "J", "Q", "K",
];
const WEATHER: [(&str, f64); 4] = [
    ("Sunny", 0.4),
    ("Rainy", 0.3),
    ("Cloudy", 0.2),
    ("Stormy", 0.1),
];

/// The experiments the lab can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExperimentKind {
    CoinFlip,
    DiceRoll,
    SpinnerWheel,
    CardDraw,
    WeatherPrediction,
}

/// How hard an experiment is to reason about, display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExperimentLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl fmt::Display for ExperimentLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExperimentLevel::Beginner => write!(f, "Beginner"),
            ExperimentLevel::Intermediate => write!(f, "Intermediate"),
            ExperimentLevel::Advanced => write!(f, "Advanced"),
        }
    }
}

impl ExperimentKind {
    pub const ALL: [ExperimentKind; 5] = [
        ExperimentKind::CoinFlip,
        ExperimentKind::DiceRoll,
        ExperimentKind::SpinnerWheel,
        ExperimentKind::CardDraw,
        ExperimentKind::WeatherPrediction,
    ];

    pub fn id(self) -> &'static str {
        match self {
            ExperimentKind::CoinFlip => "coin-flip",
            ExperimentKind::DiceRoll => "dice-roll",
            ExperimentKind::SpinnerWheel => "spinner-wheel",
            ExperimentKind::CardDraw => "card-draw",
            ExperimentKind::WeatherPrediction => "weather-prediction",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ExperimentKind::CoinFlip => "Coin Flip Laboratory",
            ExperimentKind::DiceRoll => "Dice Rolling Chamber",
            ExperimentKind::SpinnerWheel => "Color Spinner Wheel",
            ExperimentKind::CardDraw => "Magic Card Laboratory",
            ExperimentKind::WeatherPrediction => "Weather Probability Station",
        }
    }

    pub fn difficulty(self) -> ExperimentLevel {
        match self {
            ExperimentKind::CoinFlip | ExperimentKind::DiceRoll => ExperimentLevel::Beginner,
            ExperimentKind::SpinnerWheel | ExperimentKind::CardDraw => {
                ExperimentLevel::Intermediate
            }
            ExperimentKind::WeatherPrediction => ExperimentLevel::Advanced,
        }
    }

    /// Probability of a representative single outcome. For the weighted
    /// weather experiment this is the catalog's 30% figure.
    pub fn expected_probability(self) -> f64 {
        match self {
            ExperimentKind::CoinFlip => 0.5,
            ExperimentKind::DiceRoll => 1.0 / 6.0,
            ExperimentKind::SpinnerWheel => 0.25,
            ExperimentKind::CardDraw => 1.0 / 52.0,
            ExperimentKind::WeatherPrediction => 0.3,
        }
    }

    /// Coins credited for each completed run.
    pub fn reward(self) -> u32 {
        match self {
            ExperimentKind::CoinFlip => 5,
            ExperimentKind::DiceRoll => 8,
            ExperimentKind::SpinnerWheel => 10,
            ExperimentKind::CardDraw => 12,
            ExperimentKind::WeatherPrediction => 15,
        }
    }

    /// Draw one outcome and the theoretical probability of that outcome.
    pub fn draw(self, rng: &mut dyn RandomSource) -> (String, f64) {
        match self {
            ExperimentKind::CoinFlip => {
                let side = if rng.next_unit() < 0.5 {
                    COIN_SIDES[0]
                } else {
                    COIN_SIDES[1]
                };
                (side.to_string(), 0.5)
            }
            ExperimentKind::DiceRoll => {
                let face = pick_index(rng, 6) + 1;
                (face.to_string(), 1.0 / 6.0)
            }
            ExperimentKind::SpinnerWheel => {
                let color = SPINNER_COLORS[pick_index(rng, SPINNER_COLORS.len())];
                (color.to_string(), 0.25)
            }
            ExperimentKind::CardDraw => {
                let suit = CARD_SUITS[pick_index(rng, CARD_SUITS.len())];
                let rank = CARD_RANKS[pick_index(rng, CARD_RANKS.len())];
                (format!("{rank}{suit}"), 1.0 / 52.0)
            }
            ExperimentKind::WeatherPrediction => {
                let (label, p) = pick_weighted(rng.next_unit(), &WEATHER);
                (label.to_string(), p)
            }
        }
    }
}

/// Uniform index in `0..n` from one draw.
fn pick_index(rng: &mut dyn RandomSource, n: usize) -> usize {
    ((rng.next_unit() * n as f64) as usize).min(n - 1)
}

/// Cumulative-probability sampling. A draw beyond the accumulated total
/// (only possible through float rounding) lands on the last category.
fn pick_weighted<'a>(u: f64, table: &[(&'a str, f64)]) -> (&'a str, f64) {
    let mut cumulative = 0.0;
    for &(label, p) in table {
        cumulative += p;
        if u < cumulative {
            return (label, p);
        }
    }
    table[table.len() - 1]
}

impl fmt::Display for ExperimentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ExperimentKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ExperimentKind::ALL
            .into_iter()
            .find(|k| k.id() == wanted)
            .ok_or_else(|| EngineError::UnknownExperiment(s.to_string()))
    }
}

/// One recorded trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentResult {
    /// 1-based sequence number within the session.
    pub trial: u32,
    pub outcome: String,
    /// Theoretical probability of `outcome`.
    pub probability: f64,
}

/// Lab session lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabState {
    Idle,
    /// Held only while `run` draws; every `run` returns in `Settled`.
    Running,
    Settled,
}

impl fmt::Display for LabState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabState::Idle => write!(f, "idle"),
            LabState::Running => write!(f, "running"),
            LabState::Settled => write!(f, "settled"),
        }
    }
}

/// Trial history for one visit to the lab.
#[derive(Debug, Clone)]
pub struct LabSession {
    state: LabState,
    history: Vec<ExperimentResult>,
    displayed: Option<(ExperimentKind, String)>,
    coins_earned: u32,
}

impl Default for LabSession {
    fn default() -> Self {
        Self::new()
    }
}

impl LabSession {
    pub fn new() -> Self {
        Self {
            state: LabState::Idle,
            history: Vec::new(),
            displayed: None,
            coins_earned: 0,
        }
    }

    pub fn state(&self) -> LabState {
        self.state
    }

    /// Every recorded trial, oldest first.
    pub fn history(&self) -> &[ExperimentResult] {
        &self.history
    }

    pub fn total_trials(&self) -> usize {
        self.history.len()
    }

    /// The most recent outcome and the experiment that produced it.
    pub fn displayed_outcome(&self) -> Option<(ExperimentKind, &str)> {
        self.displayed
            .as_ref()
            .map(|(kind, outcome)| (*kind, outcome.as_str()))
    }

    /// Coins credited by this session so far.
    pub fn coins_earned(&self) -> u32 {
        self.coins_earned
    }

    /// The last `n` results, newest first.
    pub fn recent(&self, n: usize) -> Vec<&ExperimentResult> {
        self.history.iter().rev().take(n).collect()
    }

    /// Frequency statistics over the whole history.
    pub fn statistics(&self) -> Vec<OutcomeStat> {
        outcome_statistics(&self.history)
    }

    /// Run one trial, record it and credit the experiment's reward.
    pub fn run(
        &mut self,
        kind: ExperimentKind,
        rng: &mut dyn RandomSource,
        progress: &mut UserProgress,
    ) -> ExperimentResult {
        self.state = LabState::Running;
        let (outcome, probability) = kind.draw(rng);
        let trial = u32::try_from(self.history.len())
            .unwrap_or(u32::MAX)
            .saturating_add(1);
        let result = ExperimentResult {
            trial,
            outcome,
            probability,
        };

        let reward = kind.reward();
        progress.coins = progress.coins.saturating_add(reward);
        self.coins_earned = self.coins_earned.saturating_add(reward);
        self.history.push(result.clone());
        self.displayed = Some((kind, result.outcome.clone()));
        self.state = LabState::Settled;

        tracing::debug!(
            "{kind} trial {}: {} (p={:.4}), +{reward} coins",
            result.trial,
            result.outcome,
            result.probability
        );
        result
    }

    /// Clear the history and displayed outcome. Coins already credited stay.
    pub fn reset(&mut self) {
        self.history.clear();
        self.displayed = None;
        self.coins_earned = 0;
        self.state = LabState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{RngSource, ScriptedSource};
    use std::collections::HashSet;

    #[test]
    fn low_draw_flips_heads() {
        let mut rng = ScriptedSource::constant(0.49);
        let mut lab = LabSession::new();
        let mut p = UserProgress::default();
        for _ in 0..5 {
            let r = lab.run(ExperimentKind::CoinFlip, &mut rng, &mut p);
            assert_eq!(r.outcome, "heads");
            assert_eq!(r.probability, 0.5);
        }
        let mut high = ScriptedSource::constant(0.5);
        let r = lab.run(ExperimentKind::CoinFlip, &mut high, &mut p);
        assert_eq!(r.outcome, "tails");
    }

    #[test]
    fn dice_faces_cover_one_to_six() {
        let mut rng = ScriptedSource::new(vec![0.0, 0.17, 0.34, 0.5, 0.67, 0.99]);
        let faces: Vec<String> = (0..6)
            .map(|_| ExperimentKind::DiceRoll.draw(&mut rng).0)
            .collect();
        assert_eq!(faces, vec!["1", "2", "3", "4", "5", "6"]);
    }

    #[test]
    fn spinner_colors() {
        let mut rng = ScriptedSource::new(vec![0.1, 0.3, 0.6, 0.8]);
        let colors: Vec<String> = (0..4)
            .map(|_| ExperimentKind::SpinnerWheel.draw(&mut rng).0)
            .collect();
        assert_eq!(colors, vec!["Red", "Blue", "Green", "Yellow"]);
    }

    #[test]
    fn card_draw_uses_suit_then_rank() {
        let mut rng = ScriptedSource::new(vec![0.3, 0.99]);
        let (card, p) = ExperimentKind::CardDraw.draw(&mut rng);
        assert_eq!(card, "K♥");
        assert!((p - 1.0 / 52.0).abs() < 1e-12);
    }

    #[test]
    fn card_draw_reaches_all_52_cards() {
        let mut rng = RngSource::seeded(52);
        let seen: HashSet<String> = (0..5000)
            .map(|_| ExperimentKind::CardDraw.draw(&mut rng).0)
            .collect();
        assert_eq!(seen.len(), 52);
    }

    #[test]
    fn weather_frequencies_follow_weights() {
        use rand::SeedableRng;
        use rand_chacha::ChaCha20Rng;

        let mut rng = RngSource(ChaCha20Rng::seed_from_u64(3));
        let mut lab = LabSession::new();
        let mut p = UserProgress::default();
        for _ in 0..20_000 {
            lab.run(ExperimentKind::WeatherPrediction, &mut rng, &mut p);
        }
        for (label, weight) in WEATHER {
            let observed = crate::statistics::observed_frequency(lab.history(), label);
            assert!(
                (observed - weight).abs() < 0.02,
                "{label}: observed {observed}, expected {weight}"
            );
        }
    }

    #[test]
    fn weather_cumulative_sampling() {
        let cases = [
            (0.0, "Sunny", 0.4),
            (0.39, "Sunny", 0.4),
            (0.4, "Rainy", 0.3),
            (0.69, "Rainy", 0.3),
            (0.75, "Cloudy", 0.2),
            (0.95, "Stormy", 0.1),
            (0.999, "Stormy", 0.1),
        ];
        for (u, label, p) in cases {
            let mut rng = ScriptedSource::constant(u);
            let (outcome, prob) = ExperimentKind::WeatherPrediction.draw(&mut rng);
            assert_eq!(outcome, label, "draw {u}");
            assert_eq!(prob, p);
        }
    }

    #[test]
    fn trials_are_numbered_and_rewarded() {
        let mut rng = RngSource::seeded(1);
        let mut lab = LabSession::new();
        let mut p = UserProgress::default();

        for (i, kind) in ExperimentKind::ALL.into_iter().enumerate() {
            let r = lab.run(kind, &mut rng, &mut p);
            assert_eq!(r.trial, i as u32 + 1);
            assert_eq!(lab.state(), LabState::Settled);
        }
        assert_eq!(p.coins, 100 + 5 + 8 + 10 + 12 + 15);
        assert_eq!(lab.coins_earned(), 50);
        assert_eq!(lab.total_trials(), 5);
        assert_eq!(p.total_problems, 0);
        assert_eq!(p.streak, 0);
    }

    #[test]
    fn reset_clears_history_but_not_coins() {
        let mut rng = ScriptedSource::constant(0.1);
        let mut lab = LabSession::new();
        let mut p = UserProgress::default();
        lab.run(ExperimentKind::DiceRoll, &mut rng, &mut p);
        lab.run(ExperimentKind::DiceRoll, &mut rng, &mut p);
        assert_eq!(lab.displayed_outcome(), Some((ExperimentKind::DiceRoll, "1")));

        lab.reset();
        assert_eq!(lab.state(), LabState::Idle);
        assert!(lab.history().is_empty());
        assert!(lab.displayed_outcome().is_none());
        assert!(lab.statistics().is_empty());
        assert_eq!(p.coins, 116);

        let r = lab.run(ExperimentKind::DiceRoll, &mut rng, &mut p);
        assert_eq!(r.trial, 1);
    }

    #[test]
    fn recent_is_newest_first() {
        let mut rng = ScriptedSource::new(vec![0.1, 0.9]);
        let mut lab = LabSession::new();
        let mut p = UserProgress::default();
        for _ in 0..12 {
            lab.run(ExperimentKind::CoinFlip, &mut rng, &mut p);
        }
        let recent = lab.recent(RECENT_RESULTS);
        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0].trial, 12);
        assert_eq!(recent[9].trial, 3);
    }

    #[test]
    fn parse_experiment_ids() {
        for kind in ExperimentKind::ALL {
            assert_eq!(kind.id().parse::<ExperimentKind>().unwrap(), kind);
            assert_eq!(kind.to_string(), kind.id());
        }
        assert_eq!(
            " Coin-Flip ".parse::<ExperimentKind>().unwrap(),
            ExperimentKind::CoinFlip
        );
        let err = "multiple-events".parse::<ExperimentKind>().unwrap_err();
        assert!(matches!(err, EngineError::UnknownExperiment(_)));
    }

    #[test]
    fn catalog_metadata() {
        assert_eq!(ExperimentKind::CoinFlip.difficulty(), ExperimentLevel::Beginner);
        assert_eq!(ExperimentKind::CardDraw.difficulty(), ExperimentLevel::Intermediate);
        assert_eq!(
            ExperimentKind::WeatherPrediction.difficulty(),
            ExperimentLevel::Advanced
        );
        assert!((ExperimentKind::DiceRoll.expected_probability() - 1.0 / 6.0).abs() < 1e-12);
        assert_eq!(ExperimentKind::WeatherPrediction.expected_probability(), 0.3);
        assert_eq!(ExperimentKind::SpinnerWheel.title(), "Color Spinner Wheel");
    }
}
