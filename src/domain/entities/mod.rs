//! # Domain Entities
//!
//! The persistent business objects of the blog and guest book domain.
//! Every entity maps directly to its corresponding database table.
//!
//! ## Core Entities
//!
//! - **Address**: A postal address
//! - **Person**: A person, owning an optional address
//! - **User**: A user account, owning a person
//! - **Blog**: A titled blog belonging to a user, owning its entries
//! - **BlogEntry**: One entry in a blog
//! - **GuestBook**: A user's guest book, owning its entries
//! - **GuestBookEntry**: One entry in a guest book
//!
//! ## Entity Graph
//!
//! Entities refer to each other through [`EntityRef`] handles. Blogs and
//! guest books hold their entries; an owned entry only refers back to its
//! parent through a [`ParentRef::Owned`] weak handle, so no two entities keep
//! each other alive.
//!
//! ## Repository Traits
//!
//! Each entity has an associated repository trait defining data access operations.
//! These traits are implemented in the infrastructure layer, following the
//! dependency inversion principle.

mod persistent;

mod address;
mod blog;
mod blog_entry;
mod guest_book;
mod guest_book_entry;
mod person;
mod user;

// Re-export the base contract
pub use persistent::{
    EntityHandle, EntityKey, EntityRef, ParentRef, PersistentEntity, SequencedDependencies,
    WeakEntityRef,
};

pub use address::{AddressBuilder, AddressEntity, AddressRepository};
pub use person::{PersonBuilder, PersonEntity, PersonRepository};
pub use user::{UserBuilder, UserEntity, UserRepository, UserType};
pub use blog::{BlogBuilder, BlogEntity, BlogRepository};
pub use blog_entry::{BlogEntryBuilder, BlogEntryEntity, BlogEntryRepository};
pub use guest_book::{GuestBookBuilder, GuestBookEntity, GuestBookRepository};
pub use guest_book_entry::{GuestBookEntryBuilder, GuestBookEntryEntity, GuestBookEntryRepository};

// Mock repositories for unit tests in the application layer
#[cfg(test)]
pub use blog::MockBlogRepository;
#[cfg(test)]
pub use blog_entry::MockBlogEntryRepository;
#[cfg(test)]
pub use guest_book::MockGuestBookRepository;
#[cfg(test)]
pub use guest_book_entry::MockGuestBookEntryRepository;
#[cfg(test)]
pub use user::MockUserRepository;
