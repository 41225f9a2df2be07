//! Achievement evaluation.
//!
//! Unlock state is derived from the progress record every time it is asked
//! for; the record's own `achievements` list is advisory and never read here.

use std::fmt;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::model::UserProgress;
use crate::parser;

/// The achievement catalog compiled into the binary.
pub const EMBEDDED_ACHIEVEMENTS: &str = include_str!("../content/achievements.toml");

/// Rarity classification, display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Bronze => write!(f, "bronze"),
            Tier::Silver => write!(f, "silver"),
            Tier::Gold => write!(f, "gold"),
            Tier::Platinum => write!(f, "platinum"),
        }
    }
}

/// The progress field an achievement measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    TotalProblems,
    Accuracy,
    Streak,
    Coins,
    GradesExplored,
}

impl Metric {
    /// Current value of this metric for `progress`.
    pub fn value(self, progress: &UserProgress) -> u32 {
        match self {
            Metric::TotalProblems => progress.total_problems,
            Metric::Accuracy => progress.accuracy,
            Metric::Streak => progress.streak,
            Metric::Coins => progress.coins,
            Metric::GradesExplored => {
                u32::try_from(progress.grades_explored()).unwrap_or(u32::MAX)
            }
        }
    }
}

/// One catalog entry: unlocked once `metric >= threshold`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementRule {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Short requirement text, e.g. "Solve 10 problems".
    pub requirement: String,
    pub metric: Metric,
    pub threshold: u32,
    pub tier: Tier,
    /// Whether a progress fraction is reported at all.
    pub show_progress: bool,
    /// Report `min(value, threshold)` instead of the raw value.
    pub cap_progress: bool,
}

impl AchievementRule {
    pub fn is_unlocked(&self, progress: &UserProgress) -> bool {
        self.metric.value(progress) >= self.threshold
    }
}

/// An achievement evaluated against a progress snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: String,
    pub title: String,
    pub description: String,
    pub requirement: String,
    pub unlocked: bool,
    pub progress: Option<u32>,
    pub max_progress: Option<u32>,
    pub tier: Tier,
}

impl Achievement {
    /// Progress as a fraction, if the achievement reports progress.
    pub fn fraction(&self) -> Option<f64> {
        match (self.progress, self.max_progress) {
            (Some(p), Some(max)) if max > 0 => Some(f64::from(p) / f64::from(max)),
            _ => None,
        }
    }
}

/// Unlocked vs total count for a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementSummary {
    pub unlocked: usize,
    pub total: usize,
}

/// A fixed list of achievement rules.
#[derive(Debug, Clone, PartialEq)]
pub struct AchievementCatalog {
    rules: Vec<AchievementRule>,
}

impl AchievementCatalog {
    pub fn new(rules: Vec<AchievementRule>) -> Self {
        Self { rules }
    }

    /// The default catalog shipped with animind.
    pub fn embedded() -> Result<Self> {
        let rules = parser::parse_achievements_str(EMBEDDED_ACHIEVEMENTS, Path::new("<embedded>"))?;
        Ok(Self::new(rules))
    }

    /// Load a catalog from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::new(parser::parse_achievements(path)?))
    }

    pub fn rules(&self) -> &[AchievementRule] {
        &self.rules
    }

    /// Evaluate every rule against `progress`, in catalog order.
    ///
    /// Pure: the same snapshot always yields the same list.
    pub fn evaluate(&self, progress: &UserProgress) -> Vec<Achievement> {
        self.rules
            .iter()
            .map(|rule| {
                let value = rule.metric.value(progress);
                let (current, max) = if rule.show_progress {
                    let shown = if rule.cap_progress {
                        value.min(rule.threshold)
                    } else {
                        value
                    };
                    (Some(shown), Some(rule.threshold))
                } else {
                    (None, None)
                };
                Achievement {
                    id: rule.id.clone(),
                    title: rule.title.clone(),
                    description: rule.description.clone(),
                    requirement: rule.requirement.clone(),
                    unlocked: value >= rule.threshold,
                    progress: current,
                    max_progress: max,
                    tier: rule.tier,
                }
            })
            .collect()
    }
}

/// Count unlocked achievements in an evaluated list.
pub fn summarize(achievements: &[Achievement]) -> AchievementSummary {
    AchievementSummary {
        unlocked: achievements.iter().filter(|a| a.unlocked).count(),
        total: achievements.len(),
    }
}
