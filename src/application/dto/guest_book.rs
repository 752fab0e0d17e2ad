//! Guest book and guest book entry DTOs.

use serde::{Deserialize, Serialize};

use super::{AsDto, PersistentDto, UserDto};
use crate::domain::entities::{
    EntityRef, GuestBookBuilder, GuestBookEntity, GuestBookEntryBuilder, GuestBookEntryEntity,
    PersistentEntity, UserEntity,
};

/// Guest book data transfer object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestBookDto {
    #[serde(flatten)]
    pub persistent: PersistentDto,
    pub title: Option<String>,
    pub user: Option<UserDto>,
}

/// Guest book entry data transfer object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestBookEntryDto {
    #[serde(flatten)]
    pub persistent: PersistentDto,
    pub guest_book: Option<GuestBookDto>,
    pub creator_name: Option<String>,
    pub entry: Option<String>,
}

impl AsDto for GuestBookEntity {
    type Dto = GuestBookDto;

    fn as_dto(&self) -> GuestBookDto {
        GuestBookDto {
            persistent: PersistentDto::new(self.id(), self.persistent_data()),
            title: self.title().map(str::to_string),
            user: self.user().map(|user| user.as_dto()),
        }
    }
}

impl From<&GuestBookDto> for GuestBookEntity {
    fn from(dto: &GuestBookDto) -> Self {
        GuestBookBuilder {
            title: dto.title.clone(),
            user: dto.user.as_ref().map(|user| EntityRef::new(UserEntity::from(user))),
        }
        .restore(dto.persistent.id, dto.persistent.to_persistent_data())
    }
}

impl AsDto for GuestBookEntryEntity {
    type Dto = GuestBookEntryDto;

    fn as_dto(&self) -> GuestBookEntryDto {
        GuestBookEntryDto {
            persistent: PersistentDto::new(self.id(), self.persistent_data()),
            guest_book: self.guest_book().map(|guest_book| guest_book.as_dto()),
            creator_name: self.entry().creator_name().map(str::to_string),
            entry: self.entry().entry().map(str::to_string),
        }
    }
}

impl From<&GuestBookEntryDto> for GuestBookEntryEntity {
    fn from(dto: &GuestBookEntryDto) -> Self {
        GuestBookEntryBuilder {
            guest_book: dto
                .guest_book
                .as_ref()
                .map(|guest_book| EntityRef::new(GuestBookEntity::from(guest_book))),
            creator_name: dto.creator_name.clone(),
            entry: dto.entry.clone(),
        }
        .restore(dto.persistent.id, dto.persistent.to_persistent_data())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::builder::EntityBuilder;
    use crate::domain::sequencing::EntityKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_guest_book_dto_round_trip_keeps_ids() {
        let user = UserEntity::builder()
            .with_username("jactor")
            .build()
            .expect("Failed to build user");
        let guest_book: EntityRef<GuestBookEntity> = GuestBookEntity::builder()
            .with_title("enter when applied")
            .with_user(user.into())
            .build()
            .expect("Failed to build guest book")
            .into();
        guest_book.add_sequenced_id(&|_: EntityKind| 2_i64);
        let dto = guest_book.as_dto();

        let restored = GuestBookEntity::from(&dto);

        assert_eq!(restored.as_dto(), dto);
        assert_eq!(restored.user().expect("No user").id(), Some(2));
    }

    #[test]
    fn test_guest_book_entry_round_trip_keeps_ids() {
        let user = UserEntity::builder()
            .with_username("jactor")
            .build()
            .expect("Failed to build user");
        let guest_book = GuestBookEntity::builder()
            .with_title("enter when applied")
            .with_user(user.into())
            .build()
            .expect("Failed to build guest book");
        let entry: EntityRef<GuestBookEntryEntity> = GuestBookEntryEntity::builder()
            .with_guest_book(guest_book.into())
            .with_creator_name("jactor")
            .with_entry("the one")
            .build()
            .expect("Failed to build guest book entry")
            .into();
        entry.add_sequenced_id(&|_: EntityKind| 123_i64);

        let dto = entry.as_dto();
        let restored = GuestBookEntryEntity::from(&dto);

        assert_eq!(restored, *entry.read());
        assert_eq!(restored.as_dto(), dto);
        assert_eq!(restored.id(), Some(123));
        let guest_book = restored.guest_book().expect("No guest book");
        assert_eq!(guest_book.id(), Some(123));
        assert_eq!(guest_book.read().user().expect("No user").id(), Some(123));
    }
}
