//! animind-core: Progress tracking and quiz state engine.
//!
//! This crate holds the user-progress data model, the quiz session state
//! machine with its scoring rules, the achievement evaluator and the
//! probability experiment simulator. Persistence and randomness are reached
//! only through the traits in [`traits`].

pub mod achievements;
pub mod bank;
pub mod engine;
pub mod error;
pub mod experiment;
pub mod model;
pub mod parser;
pub mod quiz;
pub mod report;
pub mod statistics;
pub mod traits;
