//! User Service
//!
//! Handles user lookup, registration and updates.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;
use validator::Validate;

use crate::application::dto::{AsDto, CreateUserCommand, UserDto};
use crate::domain::builder::EntityBuilder;
use crate::domain::entities::{
    AddressEntity, EntityRef, PersonEntity, UserEntity, UserRepository, UserType,
};
use crate::domain::sequencing::EntityId;
use crate::shared::error::AppError;

/// User service trait
#[async_trait]
pub trait UserService: Send + Sync {
    /// Get user by ID
    async fn find(&self, id: EntityId) -> Result<Option<UserDto>, AppError>;

    /// Get user by username
    async fn find_by_username(&self, username: &str) -> Result<Option<UserDto>, AppError>;

    /// Persist a user, inserting it when it has no id
    async fn save_or_update(&self, user: UserDto) -> Result<UserDto, AppError>;

    /// Usernames of every user allowed to log in, sorted
    async fn find_usernames_on_active_users(&self) -> Result<Vec<String>, AppError>;

    /// Register a new user with person and optional address
    async fn create(&self, command: CreateUserCommand) -> Result<UserDto, AppError>;
}

/// UserService implementation
pub struct UserServiceImpl<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> UserServiceImpl<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }
}

fn build_user(command: &CreateUserCommand) -> Result<UserEntity, AppError> {
    let mut person = PersonEntity::builder().with_surname(command.surname.as_str());

    if command.has_address() {
        let mut address = AddressEntity::builder();
        if let Some(line) = &command.address_line_1 {
            address = address.with_address_line_1(line.as_str());
        }
        if let Some(line) = &command.address_line_2 {
            address = address.with_address_line_2(line.as_str());
        }
        if let Some(line) = &command.address_line_3 {
            address = address.with_address_line_3(line.as_str());
        }
        if let Some(city) = &command.city {
            address = address.with_city(city.as_str());
        }
        if let Some(country) = &command.country {
            address = address.with_country(country.as_str());
        }
        if let Some(zip_code) = &command.zip_code {
            address = address.with_zip_code(zip_code.as_str());
        }
        person = person.with_address(address.build()?.into());
    }
    if let Some(first_name) = &command.first_name {
        person = person.with_first_name(first_name.as_str());
    }
    if let Some(description) = &command.description {
        person = person.with_description(description.as_str());
    }
    if let Some(locale) = &command.locale {
        person = person.with_locale(locale.as_str());
    }

    let mut user = UserEntity::builder()
        .with_username(command.username.as_str())
        .with_email_address(command.email_address.as_str())
        .with_person(person.build()?.into());
    if let Some(password) = &command.password {
        user = user.with_password(password.as_str());
    }

    Ok(user.build()?)
}

#[async_trait]
impl<U> UserService for UserServiceImpl<U>
where
    U: UserRepository + 'static,
{
    #[instrument(skip(self))]
    async fn find(&self, id: EntityId) -> Result<Option<UserDto>, AppError> {
        let user = self.user_repo.find_by_id(id).await?;

        Ok(user.map(|user| user.as_dto()))
    }

    #[instrument(skip(self))]
    async fn find_by_username(&self, username: &str) -> Result<Option<UserDto>, AppError> {
        let user = self.user_repo.find_by_username(username).await?;

        Ok(user.map(|user| user.as_dto()))
    }

    #[instrument(skip(self, user), fields(id = ?user.persistent.id, username = ?user.username))]
    async fn save_or_update(&self, user: UserDto) -> Result<UserDto, AppError> {
        let saved = self
            .user_repo
            .save(EntityRef::new(UserEntity::from(&user)))
            .await?;

        tracing::info!(id = ?saved.id(), "User saved");
        Ok(saved.as_dto())
    }

    #[instrument(skip(self))]
    async fn find_usernames_on_active_users(&self) -> Result<Vec<String>, AppError> {
        let mut usernames = Vec::new();

        for user_type in [UserType::Admin, UserType::Active] {
            let users = self.user_repo.find_by_user_type(user_type).await?;
            usernames.extend(
                users
                    .iter()
                    .filter_map(|user| user.read().username().map(str::to_string)),
            );
        }

        usernames.sort();
        usernames.dedup();
        Ok(usernames)
    }

    #[instrument(skip(self, command), fields(username = %command.username))]
    async fn create(&self, command: CreateUserCommand) -> Result<UserDto, AppError> {
        command.validate()?;

        if self
            .user_repo
            .find_by_username(&command.username)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "Username '{}' is already taken",
                command.username
            )));
        }

        let user = build_user(&command)?;
        let saved = self.user_repo.save(user.into()).await?;

        tracing::info!(id = ?saved.id(), "User created");
        Ok(saved.as_dto())
    }
}
