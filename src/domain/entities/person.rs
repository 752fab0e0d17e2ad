//! Person entity, builder and repository trait.
//!
//! Maps to the `T_PERSON` table.

use std::hash::{Hash, Hasher};

use async_trait::async_trait;

use super::persistent::{EntityHandle, EntityRef, PersistentEntity, SequencedDependencies};
use super::AddressEntity;
use crate::domain::builder::{EntityBuilder, FieldValidator};
use crate::domain::sequencing::{EntityId, EntityKind};
use crate::domain::value_objects::PersistentData;
use crate::shared::error::AppError;

/// A person, owning an optional address.
///
/// The address is cascaded: copying a person copies its address too.
#[derive(Debug)]
pub struct PersonEntity {
    id: Option<EntityId>,
    persistent_data: PersistentData,
    address: Option<EntityRef<AddressEntity>>,
    description: Option<String>,
    first_name: Option<String>,
    locale: Option<String>,
    surname: Option<String>,
}

impl PersonEntity {
    pub fn builder() -> PersonBuilder {
        PersonBuilder::default()
    }

    pub fn address(&self) -> Option<&EntityRef<AddressEntity>> {
        self.address.as_ref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn first_name(&self) -> Option<&str> {
        self.first_name.as_deref()
    }

    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    pub fn surname(&self) -> Option<&str> {
        self.surname.as_deref()
    }

    pub fn set_address(&mut self, address: Option<EntityRef<AddressEntity>>) {
        self.address = address;
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    pub fn set_first_name(&mut self, first_name: Option<String>) {
        self.first_name = first_name;
    }

    pub fn set_locale(&mut self, locale: Option<String>) {
        self.locale = locale;
    }

    pub fn set_surname(&mut self, surname: impl Into<String>) {
        self.surname = Some(surname.into());
    }

    pub(crate) fn update_from(&mut self, other: &Self) {
        self.persistent_data = other.persistent_data.clone();
        self.address = other.address.clone();
        self.description = other.description.clone();
        self.first_name = other.first_name.clone();
        self.locale = other.locale.clone();
        self.surname = other.surname.clone();
    }
}

impl PersistentEntity for PersonEntity {
    const KIND: EntityKind = EntityKind::Person;

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
            address: self.address.as_ref().map(EntityRef::copy_without_id),
            description: self.description.clone(),
            first_name: self.first_name.clone(),
            locale: self.locale.clone(),
            surname: self.surname.clone(),
        }
    }

    fn stream_sequenced_dependencies(&self) -> SequencedDependencies {
        SequencedDependencies::of(Some([self.address.clone().map(EntityHandle::from)]))
    }
}

impl PartialEq for PersonEntity {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address
            && self.description == other.description
            && self.first_name == other.first_name
            && self.surname == other.surname
            && self.locale == other.locale
    }
}

impl Eq for PersonEntity {}

impl Hash for PersonEntity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.address.hash(state);
        self.description.hash(state);
        self.first_name.hash(state);
        self.surname.hash(state);
        self.locale.hash(state);
    }
}

/// Builder for [`PersonEntity`]. Requires a surname.
#[derive(Debug, Default)]
pub struct PersonBuilder {
    pub(crate) address: Option<EntityRef<AddressEntity>>,
    pub(crate) description: Option<String>,
    pub(crate) first_name: Option<String>,
    pub(crate) locale: Option<String>,
    pub(crate) surname: Option<String>,
}

impl PersonBuilder {
    pub fn with_address(mut self, address: EntityRef<AddressEntity>) -> Self {
        self.address = Some(address);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn with_surname(mut self, surname: impl Into<String>) -> Self {
        self.surname = Some(surname.into());
        self
    }

    /// Constructs with a known identity and audit state, skipping validation.
    pub(crate) fn restore(self, id: Option<EntityId>, persistent_data: PersistentData) -> PersonEntity {
        PersonEntity {
            id,
            persistent_data,
            address: self.address,
            description: self.description,
            first_name: self.first_name,
            locale: self.locale,
            surname: self.surname,
        }
    }
}

impl EntityBuilder for PersonBuilder {
    type Entity = PersonEntity;

    fn validator(&self) -> FieldValidator {
        FieldValidator::new("PersonEntity").require_text("surname", self.surname.as_deref())
    }

    fn build_unchecked(self) -> PersonEntity {
        self.restore(None, PersistentData::default())
    }
}

/// Repository trait for Person data access operations.
#[async_trait]
pub trait PersonRepository: Send + Sync {
    /// Find a person by id.
    async fn find_by_id(&self, id: EntityId) -> Result<Option<EntityRef<PersonEntity>>, AppError>;

    /// Find everybody with the given surname.
    async fn find_by_surname(&self, surname: &str) -> Result<Vec<EntityRef<PersonEntity>>, AppError>;

    /// Insert or update a person, cascading to its address.
    async fn save(&self, person: EntityRef<PersonEntity>) -> Result<EntityRef<PersonEntity>, AppError>;
}
