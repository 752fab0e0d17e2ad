//! Common Test Utilities
//!
//! Shared helpers, fixtures, and test infrastructure.

use fake::faker::internet::en::{FreeEmail, Username};
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;

use jactor_persistence::application::dto::{BlogDto, CreateUserCommand, GuestBookDto, UserDto};
use jactor_persistence::config::Settings;
use jactor_persistence::startup::{AppState, Application};

/// Test application backed by a fresh in-memory database
pub struct TestApp {
    pub state: AppState,
}

impl TestApp {
    /// Build the application with the `test` configuration
    pub fn new() -> Self {
        let _ = jactor_persistence::telemetry::try_init_tracing();

        let settings = Settings::load_from("config", "test").expect("Failed to load test settings");

        Self {
            state: Application::build(settings).into_state(),
        }
    }

    /// Register a user with a generated name and person
    pub async fn create_user(&self) -> UserDto {
        self.state
            .users
            .create(create_user_command())
            .await
            .expect("Failed to create user")
    }
}

/// A valid command with generated values
pub fn create_user_command() -> CreateUserCommand {
    let username: String = Username().fake();

    CreateUserCommand {
        username: format!("{}{}", username, (1000..9999).fake::<u32>()),
        email_address: FreeEmail().fake(),
        first_name: Some(FirstName().fake()),
        surname: LastName().fake(),
        ..Default::default()
    }
}

/// A new blog owned by `user`
pub fn blog_dto(title: &str, user: &UserDto) -> BlogDto {
    BlogDto {
        title: Some(title.to_string()),
        user: Some(user.clone()),
        ..Default::default()
    }
}

/// A new guest book owned by `user`
pub fn guest_book_dto(title: &str, user: &UserDto) -> GuestBookDto {
    GuestBookDto {
        title: Some(title.to_string()),
        user: Some(user.clone()),
        ..Default::default()
    }
}
