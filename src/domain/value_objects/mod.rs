//! # Domain Value Objects
//!
//! Embeddables without identity of their own, stored in the owning entity's row.
//!
//! ## Value Objects
//!
//! - **PersistentData**: creation/modification actor and timestamp (audit quad)
//! - **EntryEmbeddable**: creator name and free text of an entry

mod entry;
mod persistent_data;

pub use entry::*;
pub use persistent_data::*;
