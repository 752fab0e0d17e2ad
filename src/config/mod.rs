//! # Configuration Module
//!
//! This module handles application configuration loading and management.
//! Configuration can be loaded from:
//! - Environment variables (prefixed with APP__)
//! - Configuration files (config/default.toml, config/{environment}.toml)
//! - .env files (via dotenvy)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use jactor_persistence::config::Settings;
//!
//! let settings = Settings::load()?;
//! println!("Sequencing ids with {:?}", settings.sequencer.strategy);
//! ```

mod settings;

pub use settings::*;
