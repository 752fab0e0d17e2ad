//! Address, person and user DTOs.

use serde::{Deserialize, Serialize};

use super::{AsDto, PersistentDto};
use crate::domain::entities::{
    AddressBuilder, AddressEntity, EntityRef, PersistentEntity, PersonBuilder, PersonEntity,
    UserBuilder, UserEntity, UserType,
};

/// Address data transfer object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressDto {
    #[serde(flatten)]
    pub persistent: PersistentDto,
    pub address_line_1: Option<String>,
    pub address_line_2: Option<String>,
    pub address_line_3: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub zip_code: Option<String>,
}

/// Person data transfer object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonDto {
    #[serde(flatten)]
    pub persistent: PersistentDto,
    pub address: Option<AddressDto>,
    pub description: Option<String>,
    pub first_name: Option<String>,
    pub locale: Option<String>,
    pub surname: Option<String>,
}

/// User data transfer object
///
/// The password is accepted on input but never written out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDto {
    #[serde(flatten)]
    pub persistent: PersistentDto,
    pub username: Option<String>,
    #[serde(skip_serializing, default)]
    pub password: Option<String>,
    pub email_address: Option<String>,
    #[serde(default)]
    pub user_type: UserType,
    pub person: Option<PersonDto>,
}

impl AsDto for AddressEntity {
    type Dto = AddressDto;

    fn as_dto(&self) -> AddressDto {
        AddressDto {
            persistent: PersistentDto::new(self.id(), self.persistent_data()),
            address_line_1: self.address_line_1().map(str::to_string),
            address_line_2: self.address_line_2().map(str::to_string),
            address_line_3: self.address_line_3().map(str::to_string),
            city: self.city().map(str::to_string),
            country: self.country().map(str::to_string),
            zip_code: self.zip_code().map(str::to_string),
        }
    }
}

impl From<&AddressDto> for AddressEntity {
    fn from(dto: &AddressDto) -> Self {
        AddressBuilder {
            address_line_1: dto.address_line_1.clone(),
            address_line_2: dto.address_line_2.clone(),
            address_line_3: dto.address_line_3.clone(),
            city: dto.city.clone(),
            country: dto.country.clone(),
            zip_code: dto.zip_code.clone(),
        }
        .restore(dto.persistent.id, dto.persistent.to_persistent_data())
    }
}

impl AsDto for PersonEntity {
    type Dto = PersonDto;

    fn as_dto(&self) -> PersonDto {
        PersonDto {
            persistent: PersistentDto::new(self.id(), self.persistent_data()),
            address: self.address().map(|address| address.as_dto()),
            description: self.description().map(str::to_string),
            first_name: self.first_name().map(str::to_string),
            locale: self.locale().map(str::to_string),
            surname: self.surname().map(str::to_string),
        }
    }
}

impl From<&PersonDto> for PersonEntity {
    fn from(dto: &PersonDto) -> Self {
        PersonBuilder {
            address: dto.address.as_ref().map(|address| EntityRef::new(AddressEntity::from(address))),
            description: dto.description.clone(),
            first_name: dto.first_name.clone(),
            locale: dto.locale.clone(),
            surname: dto.surname.clone(),
        }
        .restore(dto.persistent.id, dto.persistent.to_persistent_data())
    }
}

impl AsDto for UserEntity {
    type Dto = UserDto;

    fn as_dto(&self) -> UserDto {
        UserDto {
            persistent: PersistentDto::new(self.id(), self.persistent_data()),
            username: self.username().map(str::to_string),
            password: self.password().map(str::to_string),
            email_address: self.email_address().map(str::to_string),
            user_type: self.user_type(),
            person: self.person().map(|person| person.as_dto()),
        }
    }
}

impl From<&UserDto> for UserEntity {
    fn from(dto: &UserDto) -> Self {
        UserBuilder {
            username: dto.username.clone(),
            password: dto.password.clone(),
            email_address: dto.email_address.clone(),
            user_type: dto.user_type,
            person: dto.person.as_ref().map(|person| EntityRef::new(PersonEntity::from(person))),
        }
        .restore(dto.persistent.id, dto.persistent.to_persistent_data())
    }
}
