//! Integration Tests Entry Point
//!
//! This file serves as the entry point for integration tests.
//! Tests are organized by module:
//! - `services/` - Service tests against the in-memory database
//! - `common/` - Shared test utilities

mod common;
mod services;

// Re-export common utilities for tests
pub use common::*;
