//! # Jactor Persistence
//!
//! The persistence core of a small blogging and guest book platform:
//! - An entity graph of addresses, people, users, blogs, guest books and entries
//! - Validate-then-construct builders
//! - Id sequencing of whole entity graphs through a pluggable sequencer
//! - Lossless conversion between entities and flat DTOs
//! - Thin services over repository traits, with an in-memory database
//!
//! ## Architecture
//!
//! The crate follows Clean Architecture principles:
//!
//! - **Domain Layer**: Entities, builders, sequencing and repository traits
//! - **Application Layer**: Services and DTOs
//! - **Infrastructure Layer**: In-memory database, repositories and sequencers
//!
//! ## Module Structure
//!
//! ```text
//! jactor_persistence/
//! +-- config/         Configuration management
//! +-- domain/         Entities, value objects, builders and sequencing
//! +-- application/    Application services and DTOs
//! +-- infrastructure/ Database, repositories and sequencers
//! +-- shared/         Common utilities (errors, snowflake IDs, validation)
//! ```

// Configuration module
pub mod config;

// Domain layer - Core business logic
pub mod domain;

// Application layer - Business services
pub mod application;

// Infrastructure layer - External implementations
pub mod infrastructure;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
