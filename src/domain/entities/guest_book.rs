//! Guest book entity and repository trait.

use std::hash::{Hash, Hasher};

use async_trait::async_trait;

use super::persistent::{EntityHandle, EntityRef, PersistentEntity, SequencedDependencies};
use super::{GuestBookEntryEntity, UserEntity};
use crate::domain::builder::{EntityBuilder, FieldValidator};
use crate::domain::sequencing::{EntityId, EntityKind};
use crate::domain::value_objects::PersistentData;
use crate::shared::error::AppError;

/// A guest book belonging to a user.
///
/// Maps to the `T_GUEST_BOOK` table:
/// - ID: BIGINT PRIMARY KEY (T_GUEST_BOOK_SEQ)
/// - TITLE: VARCHAR NOT NULL
/// - USER_ID: BIGINT NOT NULL REFERENCES T_USER(ID)
///
/// Owns its entries.
#[derive(Debug)]
pub struct GuestBookEntity {
    id: Option<EntityId>,
    persistent_data: PersistentData,
    title: Option<String>,
    user: Option<EntityRef<UserEntity>>,
    entries: Vec<EntityRef<GuestBookEntryEntity>>,
}

impl GuestBookEntity {
    pub fn builder() -> GuestBookBuilder {
        GuestBookBuilder::default()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn user(&self) -> Option<&EntityRef<UserEntity>> {
        self.user.as_ref()
    }

    pub fn entries(&self) -> &[EntityRef<GuestBookEntryEntity>] {
        &self.entries
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn set_user(&mut self, user: Option<EntityRef<UserEntity>>) {
        self.user = user;
    }

    pub(crate) fn update_from(&mut self, other: &Self) {
        self.persistent_data = other.persistent_data.clone();
        self.title = other.title.clone();
        self.user = other.user.clone();
    }
}

impl EntityRef<GuestBookEntity> {
    /// Adds `entry` unless an entry with equal content is there already, in
    /// which case that one is returned.
    pub fn add_entry(
        &self,
        entry: EntityRef<GuestBookEntryEntity>,
    ) -> EntityRef<GuestBookEntryEntity> {
        let entries = self.read().entries.clone();
        let content = entry.read().entry().clone();

        let existing = entries
            .into_iter()
            .find(|member| member.ptr_eq(&entry) || *member.read().entry() == content);
        if let Some(existing) = existing {
            return existing;
        }

        entry.write().attach_to(self.downgrade());
        self.write().entries.push(entry.clone());
        entry
    }
}

impl PersistentEntity for GuestBookEntity {
    const KIND: EntityKind = EntityKind::GuestBook;

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
            title: self.title.clone(),
            user: self.user.clone(),
            entries: self.entries.iter().map(EntityRef::copy_without_id).collect(),
        }
    }

    fn stream_sequenced_dependencies(&self) -> SequencedDependencies {
        let user = self.user.clone().map(EntityHandle::from);
        let entries = self.entries.iter().cloned().map(|entry| Some(EntityHandle::from(entry)));

        SequencedDependencies::of(Some(std::iter::once(user).chain(entries)))
    }

    fn claim_owned(guest_book: &EntityRef<Self>) {
        let entries = guest_book.read().entries.clone();
        for entry in entries {
            entry.write().attach_to(guest_book.downgrade());
        }
    }
}

impl PartialEq for GuestBookEntity {
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title && self.user == other.user
    }
}

impl Eq for GuestBookEntity {}

impl Hash for GuestBookEntity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.title.hash(state);
        self.user.hash(state);
    }
}

#[derive(Debug, Default)]
pub struct GuestBookBuilder {
    pub(crate) title: Option<String>,
    pub(crate) user: Option<EntityRef<UserEntity>>,
}

impl GuestBookBuilder {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_user(mut self, user: EntityRef<UserEntity>) -> Self {
        self.user = Some(user);
        self
    }

    pub(crate) fn restore(self, id: Option<EntityId>, persistent_data: PersistentData) -> GuestBookEntity {
        GuestBookEntity {
            id,
            persistent_data,
            title: self.title,
            user: self.user,
            entries: Vec::new(),
        }
    }
}

impl EntityBuilder for GuestBookBuilder {
    type Entity = GuestBookEntity;

    fn validator(&self) -> FieldValidator {
        FieldValidator::new("GuestBookEntity")
            .require_text("title", self.title.as_deref())
            .require("user", self.user.as_ref())
    }

    fn build_unchecked(self) -> GuestBookEntity {
        self.restore(None, PersistentData::default())
    }
}

/// Repository trait for GuestBook data access operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GuestBookRepository: Send + Sync {
    async fn find_by_id(&self, id: EntityId) -> Result<Option<EntityRef<GuestBookEntity>>, AppError>;

    /// The guest book of the user with the given id.
    async fn find_by_user_id(&self, user_id: EntityId) -> Result<Option<EntityRef<GuestBookEntity>>, AppError>;

    async fn save(&self, guest_book: EntityRef<GuestBookEntity>) -> Result<EntityRef<GuestBookEntity>, AppError>;
}
