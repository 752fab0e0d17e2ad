//! Application Services
//!
//! Thin orchestration over the repositories: DTOs in, entities persisted,
//! DTOs out.
//!
//! ## Available Services
//!
//! - **UserService**: User lookup, registration and updates
//! - **PersonService**: Person lookup and updates
//! - **BlogService**: Blogs and blog entries
//! - **GuestBookService**: Guest books and guest book entries

pub mod blog_service;
pub mod guest_book_service;
pub mod person_service;
pub mod user_service;

pub use blog_service::{BlogService, BlogServiceImpl};
pub use guest_book_service::{GuestBookService, GuestBookServiceImpl};
pub use person_service::{PersonService, PersonServiceImpl};
pub use user_service::{UserService, UserServiceImpl};
