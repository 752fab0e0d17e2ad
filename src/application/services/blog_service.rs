//! Blog Service
//!
//! Handles blogs and their entries. Saving resolves the owning user by
//! username, and an entry's blog by id, so that stored entities are shared
//! instead of duplicated.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;

use crate::application::dto::{AsDto, BlogDto, BlogEntryDto, UserDto};
use crate::domain::entities::{
    BlogEntity, BlogEntryEntity, BlogEntryRepository, BlogRepository, EntityRef, UserEntity,
    UserRepository,
};
use crate::domain::sequencing::EntityId;
use crate::shared::error::AppError;

/// Blog service trait
#[async_trait]
pub trait BlogService: Send + Sync {
    async fn find(&self, id: EntityId) -> Result<Option<BlogDto>, AppError>;

    async fn find_entry(&self, id: EntityId) -> Result<Option<BlogEntryDto>, AppError>;

    async fn find_blogs_by_title(&self, title: &str) -> Result<Vec<BlogDto>, AppError>;

    /// Entries of a blog, without duplicates by content
    async fn find_entries_for_blog(&self, blog_id: EntityId) -> Result<Vec<BlogEntryDto>, AppError>;

    async fn save_or_update(&self, blog: BlogDto) -> Result<BlogDto, AppError>;

    async fn save_or_update_entry(&self, entry: BlogEntryDto) -> Result<BlogEntryDto, AppError>;
}

/// BlogService implementation
pub struct BlogServiceImpl<B, E, U>
where
    B: BlogRepository,
    E: BlogEntryRepository,
    U: UserRepository,
{
    blog_repo: Arc<B>,
    entry_repo: Arc<E>,
    user_repo: Arc<U>,
}

impl<B, E, U> BlogServiceImpl<B, E, U>
where
    B: BlogRepository,
    E: BlogEntryRepository,
    U: UserRepository,
{
    pub fn new(blog_repo: Arc<B>, entry_repo: Arc<E>, user_repo: Arc<U>) -> Self {
        Self {
            blog_repo,
            entry_repo,
            user_repo,
        }
    }

    /// The stored user with the DTO's username, if there is one.
    async fn stored_user(&self, user: Option<&UserDto>) -> Result<Option<EntityRef<UserEntity>>, AppError> {
        match user.and_then(|user| user.username.as_deref()) {
            Some(username) => self.user_repo.find_by_username(username).await,
            None => Ok(None),
        }
    }

    async fn blog_from(&self, dto: &BlogDto) -> Result<EntityRef<BlogEntity>, AppError> {
        let mut blog = BlogEntity::from(dto);

        if let Some(user) = self.stored_user(dto.user.as_ref()).await? {
            blog.set_user(Some(user));
        }

        Ok(blog.into())
    }
}

#[async_trait]
impl<B, E, U> BlogService for BlogServiceImpl<B, E, U>
where
    B: BlogRepository + 'static,
    E: BlogEntryRepository + 'static,
    U: UserRepository + 'static,
{
    #[instrument(skip(self))]
    async fn find(&self, id: EntityId) -> Result<Option<BlogDto>, AppError> {
        let blog = self.blog_repo.find_by_id(id).await?;

        Ok(blog.map(|blog| blog.as_dto()))
    }

    #[instrument(skip(self))]
    async fn find_entry(&self, id: EntityId) -> Result<Option<BlogEntryDto>, AppError> {
        let entry = self.entry_repo.find_by_id(id).await?;

        Ok(entry.map(|entry| entry.as_dto()))
    }

    #[instrument(skip(self))]
    async fn find_blogs_by_title(&self, title: &str) -> Result<Vec<BlogDto>, AppError> {
        let blogs = self.blog_repo.find_blogs_by_title(title).await?;

        Ok(blogs.iter().map(AsDto::as_dto).collect())
    }

    #[instrument(skip(self))]
    async fn find_entries_for_blog(&self, blog_id: EntityId) -> Result<Vec<BlogEntryDto>, AppError> {
        let entries = self.entry_repo.find_by_blog_id(blog_id).await?;

        let mut seen = HashSet::new();
        Ok(entries
            .into_iter()
            .filter(|entry| seen.insert(entry.clone()))
            .map(|entry| entry.as_dto())
            .collect())
    }

    #[instrument(skip(self, blog), fields(id = ?blog.persistent.id, title = ?blog.title))]
    async fn save_or_update(&self, blog: BlogDto) -> Result<BlogDto, AppError> {
        let blog = self.blog_from(&blog).await?;
        let saved = self.blog_repo.save(blog).await?;

        tracing::info!(id = ?saved.id(), "Blog saved");
        Ok(saved.as_dto())
    }

    #[instrument(skip(self, entry), fields(id = ?entry.persistent.id))]
    async fn save_or_update_entry(&self, entry: BlogEntryDto) -> Result<BlogEntryDto, AppError> {
        let stored_blog = match entry.blog.as_ref().and_then(|blog| blog.persistent.id) {
            Some(blog_id) => self.blog_repo.find_by_id(blog_id).await?,
            None => None,
        };
        let blog = match (stored_blog, entry.blog.as_ref()) {
            (Some(stored), _) => Some(stored),
            (None, Some(dto)) => Some(self.blog_from(dto).await?),
            (None, None) => None,
        };

        let mut blog_entry = BlogEntryEntity::from(&entry);
        blog_entry.set_blog(blog);
        let saved = self.entry_repo.save(blog_entry.into()).await?;

        tracing::info!(id = ?saved.id(), entry = %saved.read().entry(), "Blog entry saved");
        Ok(saved.as_dto())
    }
}
