//! Guest Book and Guest Book Entry Repository Implementations

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{
    EntityId, EntityRef, GuestBookEntity, GuestBookEntryEntity, GuestBookEntryRepository,
    GuestBookRepository,
};
use crate::infrastructure::database::{select, select_by_id, InMemoryDatabase};
use crate::shared::error::AppError;

/// In-memory guest book repository implementation.
#[derive(Clone)]
pub struct InMemoryGuestBookRepository {
    db: Arc<InMemoryDatabase>,
}

impl InMemoryGuestBookRepository {
    pub fn new(db: Arc<InMemoryDatabase>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl GuestBookRepository for InMemoryGuestBookRepository {
    async fn find_by_id(&self, id: EntityId) -> Result<Option<EntityRef<GuestBookEntity>>, AppError> {
        Ok(select_by_id(self.db.guest_books(), id))
    }

    async fn find_by_user_id(&self, user_id: EntityId) -> Result<Option<EntityRef<GuestBookEntity>>, AppError> {
        Ok(select(self.db.guest_books(), |guest_book| {
            guest_book.user().and_then(|user| user.id()) == Some(user_id)
        })
        .into_iter()
        .next())
    }

    async fn save(&self, guest_book: EntityRef<GuestBookEntity>) -> Result<EntityRef<GuestBookEntity>, AppError> {
        self.db.persist(guest_book)
    }
}

/// In-memory guest book entry repository implementation.
#[derive(Clone)]
pub struct InMemoryGuestBookEntryRepository {
    db: Arc<InMemoryDatabase>,
}

impl InMemoryGuestBookEntryRepository {
    pub fn new(db: Arc<InMemoryDatabase>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl GuestBookEntryRepository for InMemoryGuestBookEntryRepository {
    async fn find_by_id(&self, id: EntityId) -> Result<Option<EntityRef<GuestBookEntryEntity>>, AppError> {
        Ok(select_by_id(self.db.guest_book_entries(), id))
    }

    async fn find_by_guest_book_id(
        &self,
        guest_book_id: EntityId,
    ) -> Result<Vec<EntityRef<GuestBookEntryEntity>>, AppError> {
        Ok(select(self.db.guest_book_entries(), |entry| {
            entry.guest_book().and_then(|guest_book| guest_book.id()) == Some(guest_book_id)
        }))
    }

    async fn save(
        &self,
        entry: EntityRef<GuestBookEntryEntity>,
    ) -> Result<EntityRef<GuestBookEntryEntity>, AppError> {
        self.db.persist(entry)
    }
}
