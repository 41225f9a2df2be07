//! animind-store: Progress storage backends and configuration.
//!
//! Implements the `ProgressStore` trait for a JSON file on disk and for an
//! in-memory slot, and loads `animind.toml`.

pub mod config;
pub mod file;
pub mod memory;

pub use config::{load_config, load_config_from, AnimindConfig};
pub use file::FileProgressStore;
pub use memory::MemoryProgressStore;
