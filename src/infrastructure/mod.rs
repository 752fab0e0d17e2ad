//! Infrastructure Layer
//!
//! Contains implementations for the domain's collaborators:
//! - In-memory database tables and repositories
//! - Configurable id sequencers

pub mod database;
pub mod repositories;
pub mod sequencer;

pub use sequencer::{create_sequencer, SnowflakeSequencer};
