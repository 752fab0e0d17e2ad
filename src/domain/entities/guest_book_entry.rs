//! Guest book entry entity and repository trait.

use std::hash::{Hash, Hasher};

use async_trait::async_trait;

use super::persistent::{
    EntityHandle, EntityRef, ParentRef, PersistentEntity, SequencedDependencies, WeakEntityRef,
};
use super::GuestBookEntity;
use crate::domain::builder::{EntityBuilder, FieldValidator};
use crate::domain::sequencing::{EntityId, EntityKind};
use crate::domain::value_objects::{EntryEmbeddable, PersistentData};
use crate::shared::error::AppError;

/// One entry in a guest book.
///
/// Maps to the `T_GUEST_BOOK_ENTRY` table:
/// - ID: BIGINT PRIMARY KEY (T_GUEST_BOOK_ENTRY_SEQ)
/// - GUEST_BOOK_ID: BIGINT NOT NULL REFERENCES T_GUEST_BOOK(ID)
/// - GUEST_NAME: VARCHAR NOT NULL
/// - ENTRY: VARCHAR NOT NULL
#[derive(Debug)]
pub struct GuestBookEntryEntity {
    id: Option<EntityId>,
    persistent_data: PersistentData,
    guest_book: Option<ParentRef<GuestBookEntity>>,
    entry: EntryEmbeddable,
}

impl GuestBookEntryEntity {
    pub fn builder() -> GuestBookEntryBuilder {
        GuestBookEntryBuilder::default()
    }

    pub fn guest_book(&self) -> Option<EntityRef<GuestBookEntity>> {
        self.guest_book.as_ref().and_then(ParentRef::get)
    }

    pub fn is_owned(&self) -> bool {
        self.guest_book.as_ref().is_some_and(ParentRef::is_owned)
    }

    pub fn entry(&self) -> &EntryEmbeddable {
        &self.entry
    }

    /// Points the entry at `guest_book` without making it one of its entries.
    /// Saving the entry adds it there.
    pub fn set_guest_book(&mut self, guest_book: Option<EntityRef<GuestBookEntity>>) {
        self.guest_book = guest_book.map(ParentRef::Detached);
    }

    pub(crate) fn attach_to(&mut self, guest_book: WeakEntityRef<GuestBookEntity>) {
        self.guest_book = Some(ParentRef::Owned(guest_book));
    }

    pub(crate) fn update_from(&mut self, other: &Self) {
        self.persistent_data = other.persistent_data.clone();
        self.entry = other.entry.clone();
        if self.guest_book().is_none() {
            self.guest_book = other.guest_book().map(ParentRef::Detached);
        }
    }

    /// Replaces the entry text and touches the audit state.
    pub fn modify(&mut self, modifier: &str, entry: impl Into<String>) -> &mut Self {
        self.entry.modify(modifier, entry);
        self.modified_by(modifier)
    }
}

impl PersistentEntity for GuestBookEntryEntity {
    const KIND: EntityKind = EntityKind::GuestBookEntry;

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn assign_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }

    fn persistent_data(&self) -> &PersistentData {
        &self.persistent_data
    }

    fn replace_persistent_data(&mut self, persistent_data: PersistentData) {
        self.persistent_data = persistent_data;
    }

    fn copy_without_id(&self) -> Self {
        Self {
            id: None,
            persistent_data: PersistentData::default(),
            guest_book: self.guest_book().map(ParentRef::Detached),
            entry: self.entry.clone(),
        }
    }

    fn stream_sequenced_dependencies(&self) -> SequencedDependencies {
        SequencedDependencies::of(Some([self.guest_book().map(EntityHandle::from)]))
    }
}

impl PartialEq for GuestBookEntryEntity {
    fn eq(&self, other: &Self) -> bool {
        self.entry == other.entry && self.guest_book() == other.guest_book()
    }
}

impl Eq for GuestBookEntryEntity {}

impl Hash for GuestBookEntryEntity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.entry.hash(state);
        self.guest_book().hash(state);
    }
}

#[derive(Debug, Default)]
pub struct GuestBookEntryBuilder {
    pub(crate) guest_book: Option<EntityRef<GuestBookEntity>>,
    pub(crate) creator_name: Option<String>,
    pub(crate) entry: Option<String>,
}

impl GuestBookEntryBuilder {
    pub fn with_guest_book(mut self, guest_book: EntityRef<GuestBookEntity>) -> Self {
        self.guest_book = Some(guest_book);
        self
    }

    pub fn with_creator_name(mut self, creator_name: impl Into<String>) -> Self {
        self.creator_name = Some(creator_name.into());
        self
    }

    pub fn with_entry(mut self, entry: impl Into<String>) -> Self {
        self.entry = Some(entry.into());
        self
    }

    pub(crate) fn restore(
        self,
        id: Option<EntityId>,
        persistent_data: PersistentData,
    ) -> GuestBookEntryEntity {
        GuestBookEntryEntity {
            id,
            persistent_data,
            guest_book: self.guest_book.map(ParentRef::Detached),
            entry: EntryEmbeddable::new(self.creator_name, self.entry),
        }
    }
}

impl EntityBuilder for GuestBookEntryBuilder {
    type Entity = GuestBookEntryEntity;

    fn validator(&self) -> FieldValidator {
        FieldValidator::new("GuestBookEntryEntity")
            .require("guest_book", self.guest_book.as_ref())
            .require_text("creator_name", self.creator_name.as_deref())
            .require_text("entry", self.entry.as_deref())
    }

    fn build_unchecked(self) -> GuestBookEntryEntity {
        self.restore(None, PersistentData::default())
    }
}

/// Repository trait for GuestBookEntry data access operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GuestBookEntryRepository: Send + Sync {
    async fn find_by_id(&self, id: EntityId) -> Result<Option<EntityRef<GuestBookEntryEntity>>, AppError>;

    async fn find_by_guest_book_id(
        &self,
        guest_book_id: EntityId,
    ) -> Result<Vec<EntityRef<GuestBookEntryEntity>>, AppError>;

    async fn save(
        &self,
        entry: EntityRef<GuestBookEntryEntity>,
    ) -> Result<EntityRef<GuestBookEntryEntity>, AppError>;
}
