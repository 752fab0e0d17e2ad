//! # Domain Layer
//!
//! The domain layer contains the entity graph of the persistence core.
//! It is independent of any storage or configuration concerns.
//!
//! ## Structure
//!
//! - **entities**: Concrete entities, the shared base contract and repository traits
//! - **value_objects**: Embeddables (audit state, entry text)
//! - **builder**: Validate-then-construct builder contract
//! - **sequencing**: Entity kinds and pluggable id sequencers
//!
//! ## Design Principles
//!
//! - No dependencies on infrastructure layers
//! - Entities never generate their own ids
//! - Equality is structural on business fields, never on id or audit state
//! - Repository traits define data access contracts

pub mod builder;
pub mod entities;
pub mod sequencing;
pub mod value_objects;

// Re-export commonly used types
pub use builder::{EntityBuilder, FieldValidator, MissingField, MissingFields};
pub use entities::*;
pub use sequencing::{EntityId, EntityKind, InMemorySequencer, Sequencer};
pub use value_objects::*;
