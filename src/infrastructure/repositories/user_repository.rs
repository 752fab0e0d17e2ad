//! User Repository Implementation
//!
//! In-memory implementation of the UserRepository trait.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{EntityId, EntityRef, UserEntity, UserRepository, UserType};
use crate::infrastructure::database::{select, select_by_id, InMemoryDatabase};
use crate::shared::error::AppError;

/// In-memory user repository implementation.
///
/// Usernames are unique across the database.
#[derive(Clone)]
pub struct InMemoryUserRepository {
    db: Arc<InMemoryDatabase>,
}

impl InMemoryUserRepository {
    /// Create a new InMemoryUserRepository over the given database.
    pub fn new(db: Arc<InMemoryDatabase>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: EntityId) -> Result<Option<EntityRef<UserEntity>>, AppError> {
        Ok(select_by_id(self.db.users(), id))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<EntityRef<UserEntity>>, AppError> {
        Ok(self
            .db
            .user_id_by_username(username)
            .and_then(|id| select_by_id(self.db.users(), id)))
    }

    async fn find_by_user_type(&self, user_type: UserType) -> Result<Vec<EntityRef<UserEntity>>, AppError> {
        Ok(select(self.db.users(), |user| user.user_type() == user_type))
    }

    async fn save(&self, user: EntityRef<UserEntity>) -> Result<EntityRef<UserEntity>, AppError> {
        self.db.persist(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EntityBuilder, EntityKind, InMemorySequencer};

    fn repository() -> InMemoryUserRepository {
        InMemoryUserRepository::new(Arc::new(InMemoryDatabase::new(Arc::new(
            InMemorySequencer::new(100),
        ))))
    }

    fn user(username: &str, user_type: UserType) -> EntityRef<UserEntity> {
        UserEntity::builder()
            .with_username(username)
            .with_user_type(user_type)
            .build()
            .expect("Failed to build user")
            .into()
    }

    #[tokio::test]
    async fn test_find_by_username_returns_saved_instance() {
        let repo = repository();
        let saved = repo.save(user("jactor", UserType::Active)).await.expect("Save failed");

        let found = repo
            .find_by_username("jactor")
            .await
            .expect("Lookup failed")
            .expect("No user found");

        assert!(found.ptr_eq(&saved));
        assert_eq!(found.id(), Some(100));
    }

    #[tokio::test]
    async fn test_find_by_user_type() {
        let repo = repository();
        repo.save(user("jactor", UserType::Active)).await.expect("Save failed");
        repo.save(user("tip", UserType::Inactive)).await.expect("Save failed");

        let inactive = repo
            .find_by_user_type(UserType::Inactive)
            .await
            .expect("Lookup failed");

        assert_eq!(inactive.len(), 1);
        assert_eq!(inactive[0].read().username(), Some("tip"));
    }

    #[test]
    fn test_find_unknown_username_is_none() {
        let repo = repository();

        let found = tokio_test::block_on(repo.find_by_username("nobody")).expect("Lookup failed");

        assert!(found.is_none());
        assert_eq!(repo.db.count(EntityKind::User), 0);
    }
}
