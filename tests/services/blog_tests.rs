//! Blog Service Tests

use pretty_assertions::assert_eq;

use jactor_persistence::application::dto::BlogEntryDto;
use jactor_persistence::domain::EntityKind;

use crate::common::{blog_dto, TestApp};

#[tokio::test]
async fn test_saved_blog_shares_the_stored_user() {
    let app = TestApp::new();
    let user = app.create_user().await;

    let blog = app
        .state
        .blogs
        .save_or_update(blog_dto("general ignorance", &user))
        .await
        .expect("Save failed");

    assert_eq!(blog.user.expect("No user").persistent.id, user.persistent.id);
    assert_eq!(app.state.db.count(EntityKind::User), 1);
    assert_eq!(app.state.db.count(EntityKind::Blog), 1);
}

#[tokio::test]
async fn test_find_blogs_by_title() {
    let app = TestApp::new();
    let user = app.create_user().await;
    for title in ["general ignorance", "general ignorance", "specific knowledge"] {
        app.state
            .blogs
            .save_or_update(blog_dto(title, &user))
            .await
            .expect("Save failed");
    }

    let found = app
        .state
        .blogs
        .find_blogs_by_title("general ignorance")
        .await
        .expect("Lookup failed");

    assert_eq!(found.len(), 2);
}

#[tokio::test]
async fn test_entries_are_attached_to_the_stored_blog() {
    let app = TestApp::new();
    let user = app.create_user().await;
    let blog = app
        .state
        .blogs
        .save_or_update(blog_dto("general ignorance", &user))
        .await
        .expect("Save failed");
    let blog_id = blog.persistent.id.expect("No blog id");

    for text in ["the one", "the other", "the one"] {
        let entry = BlogEntryDto {
            blog: Some(blog.clone()),
            creator_name: user.username.clone(),
            entry: Some(text.to_string()),
            ..Default::default()
        };
        app.state
            .blogs
            .save_or_update_entry(entry)
            .await
            .expect("Save failed");
    }

    let entries = app
        .state
        .blogs
        .find_entries_for_blog(blog_id)
        .await
        .expect("Lookup failed");

    assert_eq!(app.state.db.count(EntityKind::BlogEntry), 2);
    assert_eq!(app.state.db.count(EntityKind::Blog), 1);
    assert_eq!(entries.len(), 2);
}

#[tokio::test]
async fn test_stored_blog_sees_the_user_saved_again() {
    let app = TestApp::new();
    let mut user = app.create_user().await;
    let blog = app
        .state
        .blogs
        .save_or_update(blog_dto("general ignorance", &user))
        .await
        .expect("Save failed");
    user.email_address = Some("changed@jactor.no".into());

    app.state.users.save_or_update(user).await.expect("Save failed");
    let found = app
        .state
        .blogs
        .find(blog.persistent.id.expect("No blog id"))
        .await
        .expect("Lookup failed")
        .expect("No blog");

    assert_eq!(
        found.user.expect("No user").email_address.as_deref(),
        Some("changed@jactor.no")
    );
    assert_eq!(app.state.db.count(EntityKind::User), 1);
}

#[tokio::test]
async fn test_entry_is_found_by_id() {
    let app = TestApp::new();
    let user = app.create_user().await;
    let blog = app
        .state
        .blogs
        .save_or_update(blog_dto("general ignorance", &user))
        .await
        .expect("Save failed");
    let entry = BlogEntryDto {
        blog: Some(blog),
        creator_name: Some("jactor".into()),
        entry: Some("the one".into()),
        ..Default::default()
    };

    let saved = app
        .state
        .blogs
        .save_or_update_entry(entry)
        .await
        .expect("Save failed");
    let found = app
        .state
        .blogs
        .find_entry(saved.persistent.id.expect("No id"))
        .await
        .expect("Lookup failed");

    assert_eq!(found, Some(saved));
}
