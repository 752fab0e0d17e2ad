//! Blog entity and repository trait.
//!
//! Maps to the `T_BLOG` table in the database schema.

use std::hash::{Hash, Hasher};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use super::persistent::{EntityHandle, EntityRef, PersistentEntity, SequencedDependencies};
use super::{BlogEntryEntity, UserEntity};
use crate::domain::builder::{EntityBuilder, FieldValidator};
use crate::domain::sequencing::{EntityId, EntityKind};
use crate::domain::value_objects::PersistentData;
use crate::shared::error::AppError;

/// A blog written by a user.
///
/// Maps to the `T_BLOG` table:
/// - ID: BIGINT PRIMARY KEY (T_BLOG_SEQ)
/// - CREATED: DATE NOT NULL
/// - TITLE: VARCHAR NOT NULL
/// - USER_ID: BIGINT NOT NULL REFERENCES T_USER(ID)
///
/// The user is shared, never copied along with the blog. The entries are
/// owned: a copy of the blog gets copies of them.
#[derive(Debug)]
pub struct BlogEntity {
    id: Option<EntityId>,
    persistent_data: PersistentData,
    created: Option<NaiveDate>,
    title: Option<String>,
    user: Option<EntityRef<UserEntity>>,
    entries: Vec<EntityRef<BlogEntryEntity>>,
}

impl BlogEntity {
    pub fn builder() -> BlogBuilder {
        BlogBuilder::default()
    }

    pub fn created(&self) -> Option<NaiveDate> {
        self.created
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn user(&self) -> Option<&EntityRef<UserEntity>> {
        self.user.as_ref()
    }

    pub fn entries(&self) -> &[EntityRef<BlogEntryEntity>] {
        &self.entries
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn set_user(&mut self, user: Option<EntityRef<UserEntity>>) {
        self.user = user;
    }

    /// Takes the business fields and audit state of `other`. Id and
    /// entries stay.
    pub(crate) fn update_from(&mut self, other: &Self) {
        self.persistent_data = other.persistent_data.clone();
        self.created = other.created;
        self.title = other.title.clone();
        self.user = other.user.clone();
    }
}

impl EntityRef<BlogEntity> {
    /// Adds `entry` to the entries of this blog and points it back here.
    ///
    /// The entries form a set by content: when an equal entry is already
    /// there, that one is returned and `entry` is left as it was.
    pub fn add_entry(&self, entry: EntityRef<BlogEntryEntity>) -> EntityRef<BlogEntryEntity> {
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

impl PersistentEntity for BlogEntity {
    const KIND: EntityKind = EntityKind::Blog;

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
            created: self.created,
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

    fn claim_owned(blog: &EntityRef<Self>) {
        let entries = blog.read().entries.clone();
        for entry in entries {
            entry.write().attach_to(blog.downgrade());
        }
    }
}

impl PartialEq for BlogEntity {
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title && self.user == other.user
    }
}

impl Eq for BlogEntity {}

impl Hash for BlogEntity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.title.hash(state);
        self.user.hash(state);
    }
}

/// Builder for [`BlogEntity`]. Requires title and user; the creation date
/// defaults to today. Entries are added once the blog is behind an
/// [`EntityRef`].
#[derive(Debug, Default)]
pub struct BlogBuilder {
    pub(crate) created: Option<NaiveDate>,
    pub(crate) title: Option<String>,
    pub(crate) user: Option<EntityRef<UserEntity>>,
}

impl BlogBuilder {
    pub fn with_created(mut self, created: NaiveDate) -> Self {
        self.created = Some(created);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_user(mut self, user: EntityRef<UserEntity>) -> Self {
        self.user = Some(user);
        self
    }

    pub(crate) fn restore(self, id: Option<EntityId>, persistent_data: PersistentData) -> BlogEntity {
        BlogEntity {
            id,
            persistent_data,
            created: self.created,
            title: self.title,
            user: self.user,
            entries: Vec::new(),
        }
    }
}

impl EntityBuilder for BlogBuilder {
    type Entity = BlogEntity;

    fn validator(&self) -> FieldValidator {
        FieldValidator::new("BlogEntity")
            .require_text("title", self.title.as_deref())
            .require("user", self.user.as_ref())
    }

    fn build_unchecked(mut self) -> BlogEntity {
        self.created.get_or_insert_with(|| Utc::now().date_naive());
        self.restore(None, PersistentData::default())
    }
}

/// Repository trait for Blog data access operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlogRepository: Send + Sync {
    async fn find_by_id(&self, id: EntityId) -> Result<Option<EntityRef<BlogEntity>>, AppError>;

    /// Find all blogs with exactly this title.
    async fn find_blogs_by_title(&self, title: &str) -> Result<Vec<EntityRef<BlogEntity>>, AppError>;

    /// Insert or update a blog. The referenced user is sequenced and stored too.
    async fn save(&self, blog: EntityRef<BlogEntity>) -> Result<EntityRef<BlogEntity>, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> EntityRef<UserEntity> {
        UserEntity::builder()
            .with_username("jactor")
            .build()
            .expect("Failed to build user")
            .into()
    }

    #[test]
    fn test_builder_defaults_created_to_today() {
        let blog = BlogEntity::builder()
            .with_title("general ignorance")
            .with_user(user())
            .build()
            .expect("Failed to build blog");

        assert_eq!(blog.created(), Some(Utc::now().date_naive()));
    }

    #[test]
    fn test_build_reports_title_and_user() {
        let error = BlogEntity::builder().build().unwrap_err();

        assert_eq!(
            error.to_string(),
            "Missing required field(s): BlogEntity.title, BlogEntity.user"
        );
    }

    #[test]
    fn test_copy_without_id_shares_user() {
        let user = user();
        let mut blog = BlogEntity::builder()
            .with_title("general ignorance")
            .with_user(user.clone())
            .build()
            .expect("Failed to build blog");
        blog.add_sequenced_id(&|_: EntityKind| 9_i64);

        let copy = blog.copy_without_id();

        assert_eq!(blog, copy);
        assert_eq!(copy.id(), None);
        assert!(copy.user().expect("No user on copy").ptr_eq(&user));
        assert_eq!(user.id(), Some(9));
    }

    fn blog_of(user: EntityRef<UserEntity>) -> EntityRef<BlogEntity> {
        BlogEntity::builder()
            .with_title("general ignorance")
            .with_user(user)
            .build()
            .expect("Failed to build blog")
            .into()
    }

    fn entry_in(blog: &EntityRef<BlogEntity>, entry: &str) -> EntityRef<BlogEntryEntity> {
        BlogEntryEntity::builder()
            .with_blog(blog.clone())
            .with_creator_name("jactor")
            .with_entry(entry)
            .build()
            .expect("Failed to build blog entry")
            .into()
    }

    #[test]
    fn test_add_entry_owns_the_entry() {
        let blog = blog_of(user());
        let entry = entry_in(&blog, "the one");

        let added = blog.add_entry(entry.clone());

        assert!(added.ptr_eq(&entry));
        assert!(entry.read().is_owned());
        assert!(entry.read().blog().expect("No blog on entry").ptr_eq(&blog));
        assert_eq!(blog.read().entries().len(), 1);
    }

    #[test]
    fn test_add_entry_with_equal_content_returns_the_existing_entry() {
        let blog = blog_of(user());
        let first = blog.add_entry(entry_in(&blog, "the one"));
        let duplicate = entry_in(&blog, "the one");

        let added = blog.add_entry(duplicate.clone());
        blog.add_entry(entry_in(&blog, "the other"));

        assert!(added.ptr_eq(&first));
        assert!(!duplicate.read().is_owned());
        assert_eq!(blog.read().entries().len(), 2);
    }

    #[test]
    fn test_owned_entry_does_not_keep_the_blog_alive() {
        let blog = blog_of(user());
        let entry = blog.add_entry(entry_in(&blog, "the one"));

        drop(blog);

        assert!(entry.read().blog().is_none());
    }

    #[test]
    fn test_copy_without_id_copies_entries_onto_the_copy() {
        let blog = blog_of(user());
        let entry = blog.add_entry(entry_in(&blog, "the one"));
        entry.write().assign_id(3);

        let copy = blog.copy_without_id();

        let copied = copy.read().entries().to_vec();
        assert_eq!(copied.len(), 1);
        assert!(!copied[0].ptr_eq(&entry));
        assert_eq!(copied[0].id(), None);
        assert_eq!(copied[0].read().entry(), entry.read().entry());
        assert!(copied[0].read().blog().expect("No blog on copied entry").ptr_eq(&copy));
        assert!(entry.read().blog().expect("No blog on entry").ptr_eq(&blog));
    }

    #[test]
    fn test_entries_are_sequenced_with_the_blog() {
        let user = user();
        let blog = blog_of(user.clone());
        let entry = blog.add_entry(entry_in(&blog, "the one"));

        blog.add_sequenced_id(&|_: EntityKind| 5_i64);

        assert_eq!(blog.id(), Some(5));
        assert_eq!(entry.id(), Some(5));
        assert_eq!(user.id(), Some(5));
    }

    #[test]
    fn test_equality_is_title_and_user() {
        let user = user();
        let one = BlogEntity::builder()
            .with_title("general ignorance")
            .with_user(user.clone())
            .with_created(NaiveDate::from_ymd_opt(2020, 1, 1).expect("valid date"))
            .build()
            .expect("Failed to build blog");
        let other = BlogEntity::builder()
            .with_title("general ignorance")
            .with_user(user)
            .build()
            .expect("Failed to build blog");

        assert_eq!(one, other);
    }
}
