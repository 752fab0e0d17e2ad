//! Address Repository Implementation

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{AddressEntity, AddressRepository, EntityId, EntityRef};
use crate::infrastructure::database::{select, select_by_id, InMemoryDatabase};
use crate::shared::error::AppError;

/// In-memory address repository implementation.
#[derive(Clone)]
pub struct InMemoryAddressRepository {
    db: Arc<InMemoryDatabase>,
}

impl InMemoryAddressRepository {
    pub fn new(db: Arc<InMemoryDatabase>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AddressRepository for InMemoryAddressRepository {
    async fn find_by_id(&self, id: EntityId) -> Result<Option<EntityRef<AddressEntity>>, AppError> {
        Ok(select_by_id(self.db.addresses(), id))
    }

    async fn find_by_zip_code(&self, zip_code: &str) -> Result<Vec<EntityRef<AddressEntity>>, AppError> {
        Ok(select(self.db.addresses(), |address| {
            address.zip_code() == Some(zip_code)
        }))
    }

    async fn save(&self, address: EntityRef<AddressEntity>) -> Result<EntityRef<AddressEntity>, AppError> {
        self.db.persist(address)
    }
}
