//! Address entity, builder and repository trait.
//!
//! Maps to the `T_ADDRESS` table.

use std::hash::{Hash, Hasher};

use async_trait::async_trait;

use super::persistent::{EntityRef, PersistentEntity, SequencedDependencies};
use crate::domain::builder::{EntityBuilder, FieldValidator};
use crate::domain::sequencing::{EntityId, EntityKind};
use crate::domain::value_objects::PersistentData;
use crate::shared::error::AppError;

/// A postal address. Has no references to other entities.
///
/// Maps to the `T_ADDRESS` table:
/// - ID: BIGINT PRIMARY KEY (T_ADDRESS_SEQ)
/// - ADDRESS_LINE_1: VARCHAR NOT NULL
/// - ADDRESS_LINE_2, ADDRESS_LINE_3: VARCHAR NULL
/// - CITY: VARCHAR NOT NULL
/// - COUNTRY: VARCHAR NULL
/// - ZIP_CODE: VARCHAR NOT NULL
#[derive(Debug)]
pub struct AddressEntity {
    id: Option<EntityId>,
    persistent_data: PersistentData,
    address_line_1: Option<String>,
    address_line_2: Option<String>,
    address_line_3: Option<String>,
    city: Option<String>,
    country: Option<String>,
    zip_code: Option<String>,
}

impl AddressEntity {
    pub fn builder() -> AddressBuilder {
        AddressBuilder::default()
    }

    pub fn address_line_1(&self) -> Option<&str> {
        self.address_line_1.as_deref()
    }

    pub fn address_line_2(&self) -> Option<&str> {
        self.address_line_2.as_deref()
    }

    pub fn address_line_3(&self) -> Option<&str> {
        self.address_line_3.as_deref()
    }

    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    pub fn zip_code(&self) -> Option<&str> {
        self.zip_code.as_deref()
    }

    pub fn set_address_line_1(&mut self, address_line_1: impl Into<String>) {
        self.address_line_1 = Some(address_line_1.into());
    }

    pub fn set_address_line_2(&mut self, address_line_2: Option<String>) {
        self.address_line_2 = address_line_2;
    }

    pub fn set_address_line_3(&mut self, address_line_3: Option<String>) {
        self.address_line_3 = address_line_3;
    }

    pub fn set_city(&mut self, city: impl Into<String>) {
        self.city = Some(city.into());
    }

    pub fn set_country(&mut self, country: Option<String>) {
        self.country = country;
    }

    pub fn set_zip_code(&mut self, zip_code: impl Into<String>) {
        self.zip_code = Some(zip_code.into());
    }

    /// Takes every field of `other` except the id.
    pub(crate) fn update_from(&mut self, other: &Self) {
        self.persistent_data = other.persistent_data.clone();
        self.address_line_1 = other.address_line_1.clone();
        self.address_line_2 = other.address_line_2.clone();
        self.address_line_3 = other.address_line_3.clone();
        self.city = other.city.clone();
        self.country = other.country.clone();
        self.zip_code = other.zip_code.clone();
    }
}

impl PersistentEntity for AddressEntity {
    const KIND: EntityKind = EntityKind::Address;

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
            address_line_1: self.address_line_1.clone(),
            address_line_2: self.address_line_2.clone(),
            address_line_3: self.address_line_3.clone(),
            city: self.city.clone(),
            country: self.country.clone(),
            zip_code: self.zip_code.clone(),
        }
    }

    fn stream_sequenced_dependencies(&self) -> SequencedDependencies {
        SequencedDependencies::empty()
    }
}

impl PartialEq for AddressEntity {
    fn eq(&self, other: &Self) -> bool {
        self.address_line_1 == other.address_line_1
            && self.address_line_2 == other.address_line_2
            && self.address_line_3 == other.address_line_3
            && self.city == other.city
            && self.country == other.country
            && self.zip_code == other.zip_code
    }
}

impl Eq for AddressEntity {}

impl Hash for AddressEntity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.address_line_1.hash(state);
        self.address_line_2.hash(state);
        self.address_line_3.hash(state);
        self.city.hash(state);
        self.country.hash(state);
        self.zip_code.hash(state);
    }
}

/// Builder for [`AddressEntity`]. Requires line 1, city and zip code.
#[derive(Debug, Default)]
pub struct AddressBuilder {
    pub(crate) address_line_1: Option<String>,
    pub(crate) address_line_2: Option<String>,
    pub(crate) address_line_3: Option<String>,
    pub(crate) city: Option<String>,
    pub(crate) country: Option<String>,
    pub(crate) zip_code: Option<String>,
}

impl AddressBuilder {
    pub fn with_address_line_1(mut self, address_line_1: impl Into<String>) -> Self {
        self.address_line_1 = Some(address_line_1.into());
        self
    }

    pub fn with_address_line_2(mut self, address_line_2: impl Into<String>) -> Self {
        self.address_line_2 = Some(address_line_2.into());
        self
    }

    pub fn with_address_line_3(mut self, address_line_3: impl Into<String>) -> Self {
        self.address_line_3 = Some(address_line_3.into());
        self
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn with_zip_code(mut self, zip_code: impl Into<String>) -> Self {
        self.zip_code = Some(zip_code.into());
        self
    }

    /// Constructs with a known identity and audit state, skipping validation.
    pub(crate) fn restore(self, id: Option<EntityId>, persistent_data: PersistentData) -> AddressEntity {
        AddressEntity {
            id,
            persistent_data,
            address_line_1: self.address_line_1,
            address_line_2: self.address_line_2,
            address_line_3: self.address_line_3,
            city: self.city,
            country: self.country,
            zip_code: self.zip_code,
        }
    }
}

impl EntityBuilder for AddressBuilder {
    type Entity = AddressEntity;

    fn validator(&self) -> FieldValidator {
        FieldValidator::new("AddressEntity")
            .require_text("address_line_1", self.address_line_1.as_deref())
            .require_text("city", self.city.as_deref())
            .require_text("zip_code", self.zip_code.as_deref())
    }

    fn build_unchecked(self) -> AddressEntity {
        self.restore(None, PersistentData::default())
    }
}

/// Repository trait for Address data access operations.
#[async_trait]
pub trait AddressRepository: Send + Sync {
    /// Find an address by its id.
    async fn find_by_id(&self, id: EntityId) -> Result<Option<EntityRef<AddressEntity>>, AppError>;

    /// Find all addresses with the given zip code.
    async fn find_by_zip_code(&self, zip_code: &str) -> Result<Vec<EntityRef<AddressEntity>>, AppError>;

    /// Insert or update an address, sequencing it when it has no id.
    async fn save(&self, address: EntityRef<AddressEntity>) -> Result<EntityRef<AddressEntity>, AppError>;
}
