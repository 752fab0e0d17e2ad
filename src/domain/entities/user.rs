//! User entity and repository trait.
//!
//! Maps to the `T_USER` table in the database schema.

use std::hash::{Hash, Hasher};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::persistent::{EntityHandle, EntityRef, PersistentEntity, SequencedDependencies};
use super::PersonEntity;
use crate::domain::builder::{EntityBuilder, FieldValidator};
use crate::domain::sequencing::{EntityId, EntityKind};
use crate::domain::value_objects::PersistentData;
use crate::shared::error::AppError;

/// User type enum matching the `USER_TYPE` VARCHAR column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserType {
    Admin,
    #[default]
    Active,
    Inactive,
}

impl UserType {
    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
        }
    }
}

impl std::fmt::Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents a user account.
///
/// Maps to the `T_USER` table:
/// - ID: BIGINT PRIMARY KEY (T_USER_SEQ)
/// - USER_NAME: VARCHAR NOT NULL UNIQUE
/// - PASSWORD: VARCHAR NULL
/// - EMAIL: VARCHAR NULL
/// - USER_TYPE: VARCHAR NOT NULL
/// - PERSON_ID: BIGINT NULL REFERENCES T_PERSON(ID)
///
/// The person is owned: copying a user copies its person (and address) too.
#[derive(Debug)]
pub struct UserEntity {
    id: Option<EntityId>,
    persistent_data: PersistentData,
    username: Option<String>,
    password: Option<String>,
    email_address: Option<String>,
    user_type: UserType,
    person: Option<EntityRef<PersonEntity>>,
}

impl UserEntity {
    pub fn builder() -> UserBuilder {
        UserBuilder::default()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    pub fn email_address(&self) -> Option<&str> {
        self.email_address.as_deref()
    }

    pub fn user_type(&self) -> UserType {
        self.user_type
    }

    pub fn person(&self) -> Option<&EntityRef<PersonEntity>> {
        self.person.as_ref()
    }

    /// Whether the user may log in.
    pub fn is_active(&self) -> bool {
        self.user_type != UserType::Inactive
    }

    pub fn set_username(&mut self, username: impl Into<String>) {
        self.username = Some(username.into());
    }

    pub fn set_password(&mut self, password: Option<String>) {
        self.password = password;
    }

    pub fn set_email_address(&mut self, email_address: Option<String>) {
        self.email_address = email_address;
    }

    pub fn set_user_type(&mut self, user_type: UserType) {
        self.user_type = user_type;
    }

    pub fn set_person(&mut self, person: Option<EntityRef<PersonEntity>>) {
        self.person = person;
    }

    pub(crate) fn update_from(&mut self, other: &Self) {
        self.persistent_data = other.persistent_data.clone();
        self.username = other.username.clone();
        self.password = other.password.clone();
        self.email_address = other.email_address.clone();
        self.user_type = other.user_type;
        self.person = other.person.clone();
    }
}

impl PersistentEntity for UserEntity {
    const KIND: EntityKind = EntityKind::User;

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
            username: self.username.clone(),
            password: self.password.clone(),
            email_address: self.email_address.clone(),
            user_type: self.user_type,
            person: self.person.as_ref().map(EntityRef::copy_without_id),
        }
    }

    fn stream_sequenced_dependencies(&self) -> SequencedDependencies {
        SequencedDependencies::of(Some([self.person.clone().map(EntityHandle::from)]))
    }
}

impl PartialEq for UserEntity {
    fn eq(&self, other: &Self) -> bool {
        self.username == other.username
            && self.email_address == other.email_address
            && self.person == other.person
    }
}

impl Eq for UserEntity {}

impl Hash for UserEntity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.username.hash(state);
        self.email_address.hash(state);
        self.person.hash(state);
    }
}

/// Builder for [`UserEntity`]. Requires a username.
#[derive(Debug, Default)]
pub struct UserBuilder {
    pub(crate) username: Option<String>,
    pub(crate) password: Option<String>,
    pub(crate) email_address: Option<String>,
    pub(crate) user_type: UserType,
    pub(crate) person: Option<EntityRef<PersonEntity>>,
}

impl UserBuilder {
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn with_email_address(mut self, email_address: impl Into<String>) -> Self {
        self.email_address = Some(email_address.into());
        self
    }

    pub fn with_user_type(mut self, user_type: UserType) -> Self {
        self.user_type = user_type;
        self
    }

    pub fn with_person(mut self, person: EntityRef<PersonEntity>) -> Self {
        self.person = Some(person);
        self
    }

    pub(crate) fn restore(self, id: Option<EntityId>, persistent_data: PersistentData) -> UserEntity {
        UserEntity {
            id,
            persistent_data,
            username: self.username,
            password: self.password,
            email_address: self.email_address,
            user_type: self.user_type,
            person: self.person,
        }
    }
}

impl EntityBuilder for UserBuilder {
    type Entity = UserEntity;

    fn validator(&self) -> FieldValidator {
        FieldValidator::new("UserEntity").require_text("username", self.username.as_deref())
    }

    fn build_unchecked(self) -> UserEntity {
        self.restore(None, PersistentData::default())
    }
}

/// Repository trait for User data access operations.
///
/// Implementations of this trait handle the actual storage interactions.
/// The trait is defined in the domain layer to maintain dependency inversion.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by id.
    async fn find_by_id(&self, id: EntityId) -> Result<Option<EntityRef<UserEntity>>, AppError>;

    /// Find a user by username (exact match).
    async fn find_by_username(&self, username: &str) -> Result<Option<EntityRef<UserEntity>>, AppError>;

    /// Find all users of the given type.
    async fn find_by_user_type(&self, user_type: UserType) -> Result<Vec<EntityRef<UserEntity>>, AppError>;

    /// Insert or update a user, cascading to its person and address.
    async fn save(&self, user: EntityRef<UserEntity>) -> Result<EntityRef<UserEntity>, AppError>;
}
