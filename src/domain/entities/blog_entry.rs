//! Blog entry entity and repository trait.

use std::hash::{Hash, Hasher};

use async_trait::async_trait;

use super::persistent::{
    EntityHandle, EntityRef, ParentRef, PersistentEntity, SequencedDependencies, WeakEntityRef,
};
use super::BlogEntity;
use crate::domain::builder::{EntityBuilder, FieldValidator};
use crate::domain::sequencing::{EntityId, EntityKind};
use crate::domain::value_objects::{EntryEmbeddable, PersistentData};
use crate::shared::error::AppError;

/// One entry in a blog.
///
/// Maps to the `T_BLOG_ENTRY` table:
/// - ID: BIGINT PRIMARY KEY (T_BLOG_ENTRY_SEQ)
/// - BLOG_ID: BIGINT NOT NULL REFERENCES T_BLOG(ID)
/// - CREATOR_NAME: VARCHAR NOT NULL
/// - ENTRY: VARCHAR NOT NULL
///
/// Becomes one of the blog's entries through [`EntityRef::add_entry`].
#[derive(Debug)]
pub struct BlogEntryEntity {
    id: Option<EntityId>,
    persistent_data: PersistentData,
    blog: Option<ParentRef<BlogEntity>>,
    entry: EntryEmbeddable,
}

impl BlogEntryEntity {
    pub fn builder() -> BlogEntryBuilder {
        BlogEntryBuilder::default()
    }

    /// The blog, as long as it is alive.
    pub fn blog(&self) -> Option<EntityRef<BlogEntity>> {
        self.blog.as_ref().and_then(ParentRef::get)
    }

    /// Whether the blog holds this entry among its entries.
    pub fn is_owned(&self) -> bool {
        self.blog.as_ref().is_some_and(ParentRef::is_owned)
    }

    pub fn entry(&self) -> &EntryEmbeddable {
        &self.entry
    }

    /// Points the entry at `blog` without making it one of its entries.
    /// Saving the entry adds it there.
    pub fn set_blog(&mut self, blog: Option<EntityRef<BlogEntity>>) {
        self.blog = blog.map(ParentRef::Detached);
    }

    pub(crate) fn attach_to(&mut self, blog: WeakEntityRef<BlogEntity>) {
        self.blog = Some(ParentRef::Owned(blog));
    }

    /// Takes the entry and audit state of `other`. Id stays, and so does the
    /// blog unless this entry has none.
    pub(crate) fn update_from(&mut self, other: &Self) {
        self.persistent_data = other.persistent_data.clone();
        self.entry = other.entry.clone();
        if self.blog().is_none() {
            self.blog = other.blog().map(ParentRef::Detached);
        }
    }

    /// Replaces the entry text, recording `modifier` as its creator and as
    /// the last modifier of this entity.
    pub fn modify(&mut self, modifier: &str, entry: impl Into<String>) -> &mut Self {
        self.entry.modify(modifier, entry);
        self.modified_by(modifier)
    }
}

impl PersistentEntity for BlogEntryEntity {
    const KIND: EntityKind = EntityKind::BlogEntry;

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
            blog: self.blog().map(ParentRef::Detached),
            entry: self.entry.clone(),
        }
    }

    fn stream_sequenced_dependencies(&self) -> SequencedDependencies {
        SequencedDependencies::of(Some([self.blog().map(EntityHandle::from)]))
    }
}

impl PartialEq for BlogEntryEntity {
    fn eq(&self, other: &Self) -> bool {
        self.entry == other.entry && self.blog() == other.blog()
    }
}

impl Eq for BlogEntryEntity {}

impl Hash for BlogEntryEntity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.entry.hash(state);
        self.blog().hash(state);
    }
}

/// Builder for [`BlogEntryEntity`]. Requires blog, creator name and entry.
#[derive(Debug, Default)]
pub struct BlogEntryBuilder {
    pub(crate) blog: Option<EntityRef<BlogEntity>>,
    pub(crate) creator_name: Option<String>,
    pub(crate) entry: Option<String>,
}

impl BlogEntryBuilder {
    pub fn with_blog(mut self, blog: EntityRef<BlogEntity>) -> Self {
        self.blog = Some(blog);
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

    pub(crate) fn restore(self, id: Option<EntityId>, persistent_data: PersistentData) -> BlogEntryEntity {
        BlogEntryEntity {
            id,
            persistent_data,
            blog: self.blog.map(ParentRef::Detached),
            entry: EntryEmbeddable::new(self.creator_name, self.entry),
        }
    }
}

impl EntityBuilder for BlogEntryBuilder {
    type Entity = BlogEntryEntity;

    fn validator(&self) -> FieldValidator {
        FieldValidator::new("BlogEntryEntity")
            .require("blog", self.blog.as_ref())
            .require_text("creator_name", self.creator_name.as_deref())
            .require_text("entry", self.entry.as_deref())
    }

    fn build_unchecked(self) -> BlogEntryEntity {
        self.restore(None, PersistentData::default())
    }
}

/// Repository trait for BlogEntry data access operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlogEntryRepository: Send + Sync {
    async fn find_by_id(&self, id: EntityId) -> Result<Option<EntityRef<BlogEntryEntity>>, AppError>;

    /// All entries belonging to the blog with the given id.
    async fn find_by_blog_id(&self, blog_id: EntityId) -> Result<Vec<EntityRef<BlogEntryEntity>>, AppError>;

    async fn save(&self, entry: EntityRef<BlogEntryEntity>) -> Result<EntityRef<BlogEntryEntity>, AppError>;
}
