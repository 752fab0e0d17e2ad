//! Blog and Blog Entry Repository Implementations

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{
    BlogEntity, BlogEntryEntity, BlogEntryRepository, BlogRepository, EntityId, EntityRef,
};
use crate::infrastructure::database::{select, select_by_id, InMemoryDatabase};
use crate::shared::error::AppError;

/// In-memory blog repository implementation.
#[derive(Clone)]
pub struct InMemoryBlogRepository {
    db: Arc<InMemoryDatabase>,
}

impl InMemoryBlogRepository {
    pub fn new(db: Arc<InMemoryDatabase>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BlogRepository for InMemoryBlogRepository {
    async fn find_by_id(&self, id: EntityId) -> Result<Option<EntityRef<BlogEntity>>, AppError> {
        Ok(select_by_id(self.db.blogs(), id))
    }

    async fn find_blogs_by_title(&self, title: &str) -> Result<Vec<EntityRef<BlogEntity>>, AppError> {
        Ok(select(self.db.blogs(), |blog| blog.title() == Some(title)))
    }

    async fn save(&self, blog: EntityRef<BlogEntity>) -> Result<EntityRef<BlogEntity>, AppError> {
        self.db.persist(blog)
    }
}

/// In-memory blog entry repository implementation.
#[derive(Clone)]
pub struct InMemoryBlogEntryRepository {
    db: Arc<InMemoryDatabase>,
}

impl InMemoryBlogEntryRepository {
    pub fn new(db: Arc<InMemoryDatabase>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BlogEntryRepository for InMemoryBlogEntryRepository {
    async fn find_by_id(&self, id: EntityId) -> Result<Option<EntityRef<BlogEntryEntity>>, AppError> {
        Ok(select_by_id(self.db.blog_entries(), id))
    }

    async fn find_by_blog_id(&self, blog_id: EntityId) -> Result<Vec<EntityRef<BlogEntryEntity>>, AppError> {
        Ok(select(self.db.blog_entries(), |entry| {
            entry.blog().and_then(|blog| blog.id()) == Some(blog_id)
        }))
    }

    async fn save(&self, entry: EntityRef<BlogEntryEntity>) -> Result<EntityRef<BlogEntryEntity>, AppError> {
        self.db.persist(entry)
    }
}
