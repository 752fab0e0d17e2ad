//! Application Startup
//!
//! Wires configuration, sequencer, database, repositories and services.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::application::services::{
    BlogService, BlogServiceImpl, GuestBookService, GuestBookServiceImpl, PersonService,
    PersonServiceImpl, UserService, UserServiceImpl,
};
use crate::config::Settings;
use crate::domain::sequencing::Sequencer;
use crate::infrastructure::create_sequencer;
use crate::infrastructure::database::InMemoryDatabase;
use crate::infrastructure::repositories::{
    InMemoryBlogEntryRepository, InMemoryBlogRepository, InMemoryGuestBookEntryRepository,
    InMemoryGuestBookRepository, InMemoryPersonRepository, InMemoryUserRepository,
};

/// Application state shared by every caller
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<InMemoryDatabase>,
    pub sequencer: Arc<dyn Sequencer>,
    pub users: Arc<dyn UserService>,
    pub people: Arc<dyn PersonService>,
    pub blogs: Arc<dyn BlogService>,
    pub guest_books: Arc<dyn GuestBookService>,
    pub settings: Arc<Settings>,
}

/// Application instance
pub struct Application {
    state: AppState,
}

impl Application {
    /// Build the application from settings
    pub fn build(settings: Settings) -> Self {
        let sequencer = create_sequencer(&settings);

        let db = Arc::new(
            InMemoryDatabase::new(sequencer.clone())
                .with_default_actor(settings.audit.default_actor.clone()),
        );
        tracing::info!(environment = %settings.environment, "In-memory database created");

        let user_repo = Arc::new(InMemoryUserRepository::new(db.clone()));
        let person_repo = Arc::new(InMemoryPersonRepository::new(db.clone()));
        let blog_repo = Arc::new(InMemoryBlogRepository::new(db.clone()));
        let blog_entry_repo = Arc::new(InMemoryBlogEntryRepository::new(db.clone()));
        let guest_book_repo = Arc::new(InMemoryGuestBookRepository::new(db.clone()));
        let guest_book_entry_repo = Arc::new(InMemoryGuestBookEntryRepository::new(db.clone()));

        let state = AppState {
            db,
            sequencer,
            users: Arc::new(UserServiceImpl::new(user_repo.clone())),
            people: Arc::new(PersonServiceImpl::new(person_repo)),
            blogs: Arc::new(BlogServiceImpl::new(
                blog_repo,
                blog_entry_repo,
                user_repo.clone(),
            )),
            guest_books: Arc::new(GuestBookServiceImpl::new(
                guest_book_repo,
                guest_book_entry_repo,
                user_repo,
            )),
            settings: Arc::new(settings),
        };

        tracing::info!("Application services ready");
        Self { state }
    }

    /// Load settings from files and environment, then build
    pub fn from_env() -> Result<Self> {
        let settings = Settings::load().context("Failed to load configuration")?;

        Ok(Self::build(settings))
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn into_state(self) -> AppState {
        self.state
    }
}
