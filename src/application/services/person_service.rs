//! Person Service

use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;

use crate::application::dto::{AsDto, PersonDto};
use crate::domain::entities::{EntityRef, PersonEntity, PersonRepository};
use crate::domain::sequencing::EntityId;
use crate::shared::error::AppError;

/// Person service trait
#[async_trait]
pub trait PersonService: Send + Sync {
    async fn find(&self, id: EntityId) -> Result<Option<PersonDto>, AppError>;

    /// Everybody with this surname
    async fn find_by_surname(&self, surname: &str) -> Result<Vec<PersonDto>, AppError>;

    async fn save_or_update(&self, person: PersonDto) -> Result<PersonDto, AppError>;
}

/// PersonService implementation
pub struct PersonServiceImpl<P>
where
    P: PersonRepository,
{
    person_repo: Arc<P>,
}

impl<P> PersonServiceImpl<P>
where
    P: PersonRepository,
{
    pub fn new(person_repo: Arc<P>) -> Self {
        Self { person_repo }
    }
}

#[async_trait]
impl<P> PersonService for PersonServiceImpl<P>
where
    P: PersonRepository + 'static,
{
    #[instrument(skip(self))]
    async fn find(&self, id: EntityId) -> Result<Option<PersonDto>, AppError> {
        let person = self.person_repo.find_by_id(id).await?;

        Ok(person.map(|person| person.as_dto()))
    }

    #[instrument(skip(self))]
    async fn find_by_surname(&self, surname: &str) -> Result<Vec<PersonDto>, AppError> {
        let people = self.person_repo.find_by_surname(surname).await?;

        Ok(people.iter().map(AsDto::as_dto).collect())
    }

    #[instrument(skip(self, person), fields(id = ?person.persistent.id))]
    async fn save_or_update(&self, person: PersonDto) -> Result<PersonDto, AppError> {
        let saved = self
            .person_repo
            .save(EntityRef::new(PersonEntity::from(&person)))
            .await?;

        tracing::info!(id = ?saved.id(), "Person saved");
        Ok(saved.as_dto())
    }
}
