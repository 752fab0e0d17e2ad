//! User and Person Service Tests

use pretty_assertions::assert_eq;

use jactor_persistence::application::dto::{CreateUserCommand, UserDto};
use jactor_persistence::domain::{EntityKind, UserType};
use jactor_persistence::shared::error::AppError;

use crate::common::{create_user_command, TestApp};

#[tokio::test]
async fn test_create_user_is_sequenced_from_configured_initial_value() {
    let app = TestApp::new();

    let user = app.create_user().await;

    assert_eq!(user.persistent.id, Some(1000));
    assert_eq!(user.person.expect("No person").persistent.id, Some(1000));
    assert_eq!(app.state.db.count(EntityKind::User), 1);
    assert_eq!(app.state.db.count(EntityKind::Person), 1);
}

#[tokio::test]
async fn test_created_user_is_found_by_username_and_id() {
    let app = TestApp::new();
    let created = app.create_user().await;
    let username = created.username.clone().expect("No username");

    let by_username = app
        .state
        .users
        .find_by_username(&username)
        .await
        .expect("Lookup failed")
        .expect("No user by username");
    let by_id = app
        .state
        .users
        .find(created.persistent.id.expect("No id"))
        .await
        .expect("Lookup failed")
        .expect("No user by id");

    assert_eq!(by_username, created);
    assert_eq!(by_id, created);
}

#[tokio::test]
async fn test_create_with_existing_username_is_conflict() {
    let app = TestApp::new();
    let created = app.create_user().await;
    let command = CreateUserCommand {
        username: created.username.expect("No username"),
        ..create_user_command()
    };

    let error = app.state.users.create(command).await.unwrap_err();

    assert!(matches!(error, AppError::Conflict(_)));
    assert_eq!(app.state.db.count(EntityKind::User), 1);
}

#[tokio::test]
async fn test_save_or_update_changes_stored_user() {
    let app = TestApp::new();
    let mut user = app.create_user().await;
    user.user_type = UserType::Inactive;
    user.email_address = Some("changed@jactor.no".into());

    let saved = app.state.users.save_or_update(user.clone()).await.expect("Save failed");

    assert_eq!(saved.persistent.id, user.persistent.id);
    assert_eq!(saved.email_address.as_deref(), Some("changed@jactor.no"));
    assert_eq!(saved.persistent.modified_by.as_deref(), Some("system"));
    assert!(app
        .state
        .users
        .find_usernames_on_active_users()
        .await
        .expect("Lookup failed")
        .is_empty());
}

#[tokio::test]
async fn test_usernames_on_active_users() {
    let app = TestApp::new();
    let first = app.create_user().await;
    let second = app.create_user().await;

    let usernames = app
        .state
        .users
        .find_usernames_on_active_users()
        .await
        .expect("Lookup failed");

    let mut expected = vec![
        first.username.expect("No username"),
        second.username.expect("No username"),
    ];
    expected.sort();
    assert_eq!(usernames, expected);
}

#[tokio::test]
async fn test_person_is_found_by_surname() {
    let app = TestApp::new();
    let user = app.create_user().await;
    let surname = user.person.and_then(|person| person.surname).expect("No surname");

    let people = app
        .state
        .people
        .find_by_surname(&surname)
        .await
        .expect("Lookup failed");

    assert!(!people.is_empty());
    assert!(people.iter().all(|person| person.surname.as_deref() == Some(surname.as_str())));
}

#[tokio::test]
async fn test_new_user_dto_without_username_is_saved_as_is() {
    let app = TestApp::new();

    let saved = app
        .state
        .users
        .save_or_update(UserDto::default())
        .await
        .expect("Save failed");

    assert!(saved.persistent.id.is_some());
    assert_eq!(saved.username, None);
}
