//! `animind.toml` configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use animind_core::achievements::AchievementCatalog;
use animind_core::bank::QuestionBank;
use animind_core::model::DEFAULT_STUDENT_NAME;
use animind_core::traits::RngSource;

use crate::file::{FileProgressStore, DEFAULT_PROGRESS_FILE};

/// Environment variable that overrides `progress_path`.
pub const PROGRESS_PATH_ENV: &str = "ANIMIND_PROGRESS_PATH";

/// Top-level animind configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimindConfig {
    /// Where the progress record is stored.
    #[serde(default = "default_progress_path")]
    pub progress_path: PathBuf,
    /// Question content file or directory replacing the embedded bank.
    #[serde(default)]
    pub content_path: Option<PathBuf>,
    /// Achievement catalog replacing the embedded one.
    #[serde(default)]
    pub achievements_path: Option<PathBuf>,
    /// Name given to a freshly created record.
    #[serde(default = "default_student_name")]
    pub student_name: String,
    /// Fixed seed for the lab RNG.
    #[serde(default)]
    pub lab_seed: Option<u64>,
}

fn default_progress_path() -> PathBuf {
    PathBuf::from(DEFAULT_PROGRESS_FILE)
}

fn default_student_name() -> String {
    DEFAULT_STUDENT_NAME.to_string()
}

impl Default for AnimindConfig {
    fn default() -> Self {
        Self {
            progress_path: default_progress_path(),
            content_path: None,
            achievements_path: None,
            student_name: default_student_name(),
            lab_seed: None,
        }
    }
}

impl AnimindConfig {
    /// The file store for `progress_path`.
    pub fn progress_store(&self) -> FileProgressStore {
        FileProgressStore::new(&self.progress_path)
    }

    /// The configured question bank, or the embedded one.
    pub fn question_bank(&self) -> Result<QuestionBank> {
        match &self.content_path {
            Some(path) => QuestionBank::load(path)
                .with_context(|| format!("failed to load content from {}", path.display())),
            None => QuestionBank::embedded(),
        }
    }

    /// The configured achievement catalog, or the embedded one.
    pub fn achievement_catalog(&self) -> Result<AchievementCatalog> {
        match &self.achievements_path {
            Some(path) => AchievementCatalog::load(path)
                .with_context(|| format!("failed to load achievements from {}", path.display())),
            None => AchievementCatalog::embedded(),
        }
    }

    /// Lab RNG: `seed` wins over `lab_seed`; with neither, seeded from the OS.
    pub fn lab_rng(&self, seed: Option<u64>) -> RngSource<StdRng> {
        match seed.or(self.lab_seed) {
            Some(seed) => RngSource::seeded(seed),
            None => RngSource::from_entropy(),
        }
    }

    fn apply_overrides(&mut self, progress_override: Option<String>) {
        if let Some(path) = progress_override.filter(|p| !p.is_empty()) {
            self.progress_path = PathBuf::from(path);
        }

        self.progress_path = resolve_path(&self.progress_path);
        self.content_path = self.content_path.as_deref().map(resolve_path);
        self.achievements_path = self.achievements_path.as_deref().map(resolve_path);
        self.student_name = resolve_env_vars(&self.student_name);
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are copied through verbatim, never rescanned.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + end];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `animind.toml` in the current directory
/// 2. `~/.config/animind/config.toml`
///
/// `ANIMIND_PROGRESS_PATH` overrides `progress_path`.
pub fn load_config() -> Result<AnimindConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<AnimindConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("animind.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|dir| dir.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            parse_config(&path)?
        }
        None => AnimindConfig::default(),
    };

    config.apply_overrides(std::env::var(PROGRESS_PATH_ENV).ok());
    Ok(config)
}

fn parse_config(path: &Path) -> Result<AnimindConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    toml::from_str::<AnimindConfig>(&content)
        .with_context(|| format!("failed to parse config: {}", path.display()))
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("animind"))
}
