//! Command DTOs
//!
//! Validated input for operations that create new entities.

use serde::Deserialize;
use validator::Validate;

/// Create user command
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateUserCommand {
    #[validate(length(min = 2, max = 50, message = "Username must be 2-50 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email_address: String,

    pub password: Option<String>,

    pub first_name: Option<String>,

    #[validate(length(min = 1, message = "Surname is required"))]
    pub surname: String,

    pub description: Option<String>,

    pub locale: Option<String>,

    /// Address is only created when line 1, city and zip code are all given
    pub address_line_1: Option<String>,
    pub address_line_2: Option<String>,
    pub address_line_3: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub zip_code: Option<String>,
}

impl CreateUserCommand {
    pub fn has_address(&self) -> bool {
        [&self.address_line_1, &self.city, &self.zip_code]
            .iter()
            .all(|field| field.as_deref().map_or(false, |value| !value.trim().is_empty()))
    }
}
