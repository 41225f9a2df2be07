pub mod achievements;
pub mod grade;
pub mod init;
pub mod lab;
pub mod quiz;
pub mod status;
pub mod topics;
pub mod validate;

use std::path::Path;

use anyhow::Result;

use animind_core::engine::ProgressEngine;
use animind_store::{load_config_from, AnimindConfig, FileProgressStore};

/// Load config and open the progress record it points at.
pub(crate) fn open(
    config_path: Option<&Path>,
) -> Result<(AnimindConfig, ProgressEngine<FileProgressStore>)> {
    let config = load_config_from(config_path)?;
    match config_path {
        Some(path) => tracing::debug!("using config {}", path.display()),
        None => tracing::debug!("using config from the default search path"),
    }
    tracing::debug!(
        "progress record {} for {}",
        config.progress_path.display(),
        config.student_name
    );
    let engine = ProgressEngine::open(config.progress_store(), &config.student_name)?;
    Ok((config, engine))
}
