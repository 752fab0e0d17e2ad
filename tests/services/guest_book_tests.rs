//! Guest Book Service Tests

use pretty_assertions::assert_eq;

use jactor_persistence::application::dto::{GuestBookEntryDto, UserDto};
use jactor_persistence::domain::EntityKind;

use crate::common::{guest_book_dto, TestApp};

#[tokio::test]
async fn test_guest_book_entries_round_trip() {
    let app = TestApp::new();
    let user = app.create_user().await;
    let guest_book = app
        .state
        .guest_books
        .save_or_update(guest_book_dto("enter when applied", &user))
        .await
        .expect("Save failed");
    let entry = GuestBookEntryDto {
        guest_book: Some(guest_book.clone()),
        creator_name: Some("jactor".into()),
        entry: Some("the one".into()),
        ..Default::default()
    };

    let saved = app
        .state
        .guest_books
        .save_or_update_entry(entry)
        .await
        .expect("Save failed");
    let entries = app
        .state
        .guest_books
        .find_entries_for_guest_book(guest_book.persistent.id.expect("No id"))
        .await
        .expect("Lookup failed");

    assert_eq!(entries, vec![saved]);
    assert_eq!(app.state.db.count(EntityKind::GuestBook), 1);
}

#[tokio::test]
async fn test_guest_book_for_unknown_user_keeps_given_user() {
    let app = TestApp::new();
    let stranger = UserDto {
        username: Some("stranger".into()),
        ..Default::default()
    };

    let saved = app
        .state
        .guest_books
        .save_or_update(guest_book_dto("enter when applied", &stranger))
        .await
        .expect("Save failed");

    let user = saved.user.expect("No user");
    assert_eq!(user.username.as_deref(), Some("stranger"));
    assert!(user.persistent.id.is_some());
    assert_eq!(app.state.db.count(EntityKind::User), 1);
}

#[tokio::test]
async fn test_find_unknown_guest_book_is_none() {
    let app = TestApp::new();

    let found = app.state.guest_books.find(424242).await.expect("Lookup failed");

    assert_eq!(found, None);
}
