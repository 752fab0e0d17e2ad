//! Id sequencing.
//!
//! Entities never generate their own ids. A [`Sequencer`] supplied by the
//! caller hands out the next id for a given [`EntityKind`], mirroring one
//! database sequence per table.

use std::collections::HashMap;
use std::fmt;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Surrogate key of a persisted entity.
pub type EntityId = i64;

/// The concrete entity types that can be sequenced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Address,
    Person,
    User,
    Blog,
    BlogEntry,
    GuestBook,
    GuestBookEntry,
}

impl EntityKind {
    pub const ALL: [EntityKind; 7] = [
        Self::Address,
        Self::Person,
        Self::User,
        Self::Blog,
        Self::BlogEntry,
        Self::GuestBook,
        Self::GuestBookEntry,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Address => "address",
            Self::Person => "person",
            Self::User => "user",
            Self::Blog => "blog",
            Self::BlogEntry => "blog_entry",
            Self::GuestBook => "guest_book",
            Self::GuestBookEntry => "guest_book_entry",
        }
    }

    /// Name of the database sequence backing this kind.
    pub fn sequence_name(&self) -> &'static str {
        match self {
            Self::Address => "T_ADDRESS_SEQ",
            Self::Person => "T_PERSON_SEQ",
            Self::User => "T_USER_SEQ",
            Self::Blog => "T_BLOG_SEQ",
            Self::BlogEntry => "T_BLOG_ENTRY_SEQ",
            Self::GuestBook => "T_GUEST_BOOK_SEQ",
            Self::GuestBookEntry => "T_GUEST_BOOK_ENTRY_SEQ",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Pluggable id source.
pub trait Sequencer: Send + Sync {
    /// Next id for an entity of the given kind.
    fn next_val(&self, kind: EntityKind) -> EntityId;
}

impl<F> Sequencer for F
where
    F: Fn(EntityKind) -> EntityId + Send + Sync,
{
    fn next_val(&self, kind: EntityKind) -> EntityId {
        self(kind)
    }
}

/// One counter per entity kind, starting at a configurable value.
#[derive(Debug)]
pub struct InMemorySequencer {
    initial_value: EntityId,
    counters: Mutex<HashMap<EntityKind, EntityId>>,
}

impl InMemorySequencer {
    pub fn new(initial_value: EntityId) -> Self {
        Self {
            initial_value,
            counters: Mutex::new(HashMap::new()),
        }
    }

    /// The last id handed out for `kind`, if any.
    pub fn current_val(&self, kind: EntityKind) -> Option<EntityId> {
        self.counters.lock().get(&kind).copied()
    }
}

impl Default for InMemorySequencer {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Sequencer for InMemorySequencer {
    fn next_val(&self, kind: EntityKind) -> EntityId {
        let mut counters = self.counters.lock();
        let next = counters
            .get(&kind)
            .map(|current| current + 1)
            .unwrap_or(self.initial_value);
        counters.insert(kind, next);
        next
    }
}
