//! Blog and blog entry DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{AsDto, PersistentDto, UserDto};
use crate::domain::entities::{
    BlogBuilder, BlogEntity, BlogEntryBuilder, BlogEntryEntity, EntityRef, PersistentEntity,
    UserEntity,
};

/// Blog data transfer object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogDto {
    #[serde(flatten)]
    pub persistent: PersistentDto,
    pub created: Option<NaiveDate>,
    pub title: Option<String>,
    pub user: Option<UserDto>,
}

/// Blog entry data transfer object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogEntryDto {
    #[serde(flatten)]
    pub persistent: PersistentDto,
    pub blog: Option<BlogDto>,
    pub creator_name: Option<String>,
    pub entry: Option<String>,
}

impl AsDto for BlogEntity {
    type Dto = BlogDto;

    fn as_dto(&self) -> BlogDto {
        BlogDto {
            persistent: PersistentDto::new(self.id(), self.persistent_data()),
            created: self.created(),
            title: self.title().map(str::to_string),
            user: self.user().map(|user| user.as_dto()),
        }
    }
}

impl From<&BlogDto> for BlogEntity {
    fn from(dto: &BlogDto) -> Self {
        BlogBuilder {
            created: dto.created,
            title: dto.title.clone(),
            user: dto.user.as_ref().map(|user| EntityRef::new(UserEntity::from(user))),
        }
        .restore(dto.persistent.id, dto.persistent.to_persistent_data())
    }
}

impl AsDto for BlogEntryEntity {
    type Dto = BlogEntryDto;

    fn as_dto(&self) -> BlogEntryDto {
        BlogEntryDto {
            persistent: PersistentDto::new(self.id(), self.persistent_data()),
            blog: self.blog().map(|blog| blog.as_dto()),
            creator_name: self.entry().creator_name().map(str::to_string),
            entry: self.entry().entry().map(str::to_string),
        }
    }
}

impl From<&BlogEntryDto> for BlogEntryEntity {
    fn from(dto: &BlogEntryDto) -> Self {
        BlogEntryBuilder {
            blog: dto.blog.as_ref().map(|blog| EntityRef::new(BlogEntity::from(blog))),
            creator_name: dto.creator_name.clone(),
            entry: dto.entry.clone(),
        }
        .restore(dto.persistent.id, dto.persistent.to_persistent_data())
    }
}
