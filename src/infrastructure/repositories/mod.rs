//! Repository Implementations
//!
//! In-memory implementations of the domain repository traits, all sharing
//! one [`InMemoryDatabase`](crate::infrastructure::database::InMemoryDatabase).
//!
//! ## Available Repositories
//!
//! - **AddressRepository** - Addresses, found by zip code
//! - **PersonRepository** - People, found by surname
//! - **UserRepository** - User accounts with unique usernames
//! - **BlogRepository** / **BlogEntryRepository** - Blogs and their entries
//! - **GuestBookRepository** / **GuestBookEntryRepository** - Guest books and their entries
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use jactor_persistence::domain::InMemorySequencer;
//! use jactor_persistence::infrastructure::database::InMemoryDatabase;
//! use jactor_persistence::infrastructure::repositories::{
//!     InMemoryBlogRepository, InMemoryUserRepository,
//! };
//!
//! let db = Arc::new(InMemoryDatabase::new(Arc::new(InMemorySequencer::default())));
//! let user_repo = InMemoryUserRepository::new(db.clone());
//! let blog_repo = InMemoryBlogRepository::new(db);
//! ```

mod address_repository;
mod blog_repository;
mod guest_book_repository;
mod person_repository;
mod user_repository;

pub use address_repository::InMemoryAddressRepository;
pub use blog_repository::{InMemoryBlogEntryRepository, InMemoryBlogRepository};
pub use guest_book_repository::{InMemoryGuestBookEntryRepository, InMemoryGuestBookRepository};
pub use person_repository::InMemoryPersonRepository;
pub use user_repository::InMemoryUserRepository;
