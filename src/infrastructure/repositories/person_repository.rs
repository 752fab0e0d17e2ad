//! Person Repository Implementation

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{EntityId, EntityRef, PersonEntity, PersonRepository};
use crate::infrastructure::database::{select, select_by_id, InMemoryDatabase};
use crate::shared::error::AppError;

/// In-memory person repository implementation.
///
/// Saving a person stores its address as well.
#[derive(Clone)]
pub struct InMemoryPersonRepository {
    db: Arc<InMemoryDatabase>,
}

impl InMemoryPersonRepository {
    pub fn new(db: Arc<InMemoryDatabase>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PersonRepository for InMemoryPersonRepository {
    async fn find_by_id(&self, id: EntityId) -> Result<Option<EntityRef<PersonEntity>>, AppError> {
        Ok(select_by_id(self.db.people(), id))
    }

    async fn find_by_surname(&self, surname: &str) -> Result<Vec<EntityRef<PersonEntity>>, AppError> {
        Ok(select(self.db.people(), |person| person.surname() == Some(surname)))
    }

    async fn save(&self, person: EntityRef<PersonEntity>) -> Result<EntityRef<PersonEntity>, AppError> {
        self.db.persist(person)
    }
}
