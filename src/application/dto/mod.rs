//! Data Transfer Objects
//!
//! Flat, serializable views of the entities. Every entity converts to its
//! DTO with [`AsDto::as_dto`], nested entities become nested DTOs, and every
//! entity can be restored from a DTO with `From<&Dto>`. Restoring skips the
//! builder checks and keeps the DTO's id and audit values as they are.

mod blog;
mod command;
mod guest_book;
mod persistent;
mod user;

use crate::domain::entities::{EntityRef, PersistentEntity};

pub use blog::{BlogDto, BlogEntryDto};
pub use command::CreateUserCommand;
pub use guest_book::{GuestBookDto, GuestBookEntryDto};
pub use persistent::PersistentDto;
pub use user::{AddressDto, PersonDto, UserDto};

/// Conversion of an entity into its data transfer object.
pub trait AsDto {
    type Dto;

    fn as_dto(&self) -> Self::Dto;
}

impl<T> AsDto for EntityRef<T>
where
    T: PersistentEntity + AsDto,
{
    type Dto = T::Dto;

    fn as_dto(&self) -> T::Dto {
        self.read().as_dto()
    }
}
