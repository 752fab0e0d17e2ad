//! Service Tests
//!
//! Run the services end to end against the in-memory database.

mod blog_tests;
mod guest_book_tests;
mod user_tests;
