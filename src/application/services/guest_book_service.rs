//! Guest Book Service
//!
//! Handles guest books and their entries.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;

use crate::application::dto::{AsDto, GuestBookDto, GuestBookEntryDto};
use crate::domain::entities::{
    EntityRef, GuestBookEntity, GuestBookEntryEntity, GuestBookEntryRepository,
    GuestBookRepository, UserRepository,
};
use crate::domain::sequencing::EntityId;
use crate::shared::error::AppError;

/// Guest book service trait
#[async_trait]
pub trait GuestBookService: Send + Sync {
    async fn find(&self, id: EntityId) -> Result<Option<GuestBookDto>, AppError>;

    async fn find_entry(&self, id: EntityId) -> Result<Option<GuestBookEntryDto>, AppError>;

    /// Entries of a guest book, without duplicates by content
    async fn find_entries_for_guest_book(
        &self,
        guest_book_id: EntityId,
    ) -> Result<Vec<GuestBookEntryDto>, AppError>;

    async fn save_or_update(&self, guest_book: GuestBookDto) -> Result<GuestBookDto, AppError>;

    async fn save_or_update_entry(
        &self,
        entry: GuestBookEntryDto,
    ) -> Result<GuestBookEntryDto, AppError>;
}

/// GuestBookService implementation
pub struct GuestBookServiceImpl<G, E, U>
where
    G: GuestBookRepository,
    E: GuestBookEntryRepository,
    U: UserRepository,
{
    guest_book_repo: Arc<G>,
    entry_repo: Arc<E>,
    user_repo: Arc<U>,
}

impl<G, E, U> GuestBookServiceImpl<G, E, U>
where
    G: GuestBookRepository,
    E: GuestBookEntryRepository,
    U: UserRepository,
{
    pub fn new(guest_book_repo: Arc<G>, entry_repo: Arc<E>, user_repo: Arc<U>) -> Self {
        Self {
            guest_book_repo,
            entry_repo,
            user_repo,
        }
    }

    async fn guest_book_from(&self, dto: &GuestBookDto) -> Result<EntityRef<GuestBookEntity>, AppError> {
        let mut guest_book = GuestBookEntity::from(dto);

        let username = dto.user.as_ref().and_then(|user| user.username.as_deref());
        if let Some(username) = username {
            if let Some(user) = self.user_repo.find_by_username(username).await? {
                guest_book.set_user(Some(user));
            }
        }

        Ok(guest_book.into())
    }
}

#[async_trait]
impl<G, E, U> GuestBookService for GuestBookServiceImpl<G, E, U>
where
    G: GuestBookRepository + 'static,
    E: GuestBookEntryRepository + 'static,
    U: UserRepository + 'static,
{
    #[instrument(skip(self))]
    async fn find(&self, id: EntityId) -> Result<Option<GuestBookDto>, AppError> {
        let guest_book = self.guest_book_repo.find_by_id(id).await?;

        Ok(guest_book.map(|guest_book| guest_book.as_dto()))
    }

    #[instrument(skip(self))]
    async fn find_entry(&self, id: EntityId) -> Result<Option<GuestBookEntryDto>, AppError> {
        let entry = self.entry_repo.find_by_id(id).await?;

        Ok(entry.map(|entry| entry.as_dto()))
    }

    #[instrument(skip(self))]
    async fn find_entries_for_guest_book(
        &self,
        guest_book_id: EntityId,
    ) -> Result<Vec<GuestBookEntryDto>, AppError> {
        let entries = self.entry_repo.find_by_guest_book_id(guest_book_id).await?;

        let mut seen = HashSet::new();
        Ok(entries
            .into_iter()
            .filter(|entry| seen.insert(entry.clone()))
            .map(|entry| entry.as_dto())
            .collect())
    }

    #[instrument(skip(self, guest_book), fields(id = ?guest_book.persistent.id))]
    async fn save_or_update(&self, guest_book: GuestBookDto) -> Result<GuestBookDto, AppError> {
        let guest_book = self.guest_book_from(&guest_book).await?;
        let saved = self.guest_book_repo.save(guest_book).await?;

        tracing::info!(id = ?saved.id(), "Guest book saved");
        Ok(saved.as_dto())
    }

    #[instrument(skip(self, entry), fields(id = ?entry.persistent.id))]
    async fn save_or_update_entry(
        &self,
        entry: GuestBookEntryDto,
    ) -> Result<GuestBookEntryDto, AppError> {
        let guest_book_id = entry
            .guest_book
            .as_ref()
            .and_then(|guest_book| guest_book.persistent.id);
        let stored = match guest_book_id {
            Some(id) => self.guest_book_repo.find_by_id(id).await?,
            None => None,
        };
        let guest_book = match (stored, entry.guest_book.as_ref()) {
            (Some(stored), _) => Some(stored),
            (None, Some(dto)) => Some(self.guest_book_from(dto).await?),
            (None, None) => None,
        };

        let mut guest_book_entry = GuestBookEntryEntity::from(&entry);
        guest_book_entry.set_guest_book(guest_book);
        let saved = self.entry_repo.save(guest_book_entry.into()).await?;

        tracing::info!(id = ?saved.id(), entry = %saved.read().entry(), "Guest book entry saved");
        Ok(saved.as_dto())
    }
}
