//! Validate-then-construct builders.
//!
//! A builder collects field values, and [`EntityBuilder::build`] runs every
//! required-field check before anything is constructed. All missing fields are
//! reported together in one [`MissingFields`] error.

use std::fmt;

/// A required field without a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingField {
    /// Owning entity type, e.g. `BlogEntity`.
    pub entity: &'static str,
    /// Field name, e.g. `title`.
    pub field: &'static str,
}

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.entity, self.field)
    }
}

/// Every required field missing when a build was attempted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Missing required field(s): {}", list(.0))]
pub struct MissingFields(Vec<MissingField>);

fn list(fields: &[MissingField]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl MissingFields {
    pub fn fields(&self) -> &[MissingField] {
        &self.0
    }

    /// Whether `field` of `entity` is among the missing ones.
    pub fn contains(&self, entity: &str, field: &str) -> bool {
        self.0.iter().any(|m| m.entity == entity && m.field == field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Declarative list of required-field checks for one entity type.
#[derive(Debug)]
pub struct FieldValidator {
    entity: &'static str,
    missing: Vec<MissingField>,
}

impl FieldValidator {
    pub fn new(entity: &'static str) -> Self {
        Self {
            entity,
            missing: Vec::new(),
        }
    }

    /// Requires a value to be present.
    pub fn require<T>(mut self, field: &'static str, value: Option<&T>) -> Self {
        if value.is_none() {
            self.add(field);
        }
        self
    }

    /// Requires text to be present and not blank.
    pub fn require_text(mut self, field: &'static str, value: Option<&str>) -> Self {
        if value.map_or(true, |text| text.trim().is_empty()) {
            self.add(field);
        }
        self
    }

    fn add(&mut self, field: &'static str) {
        self.missing.push(MissingField {
            entity: self.entity,
            field,
        });
    }

    pub fn missing_fields(self) -> Vec<MissingField> {
        self.missing
    }

    pub fn validate(self) -> Result<(), MissingFields> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(MissingFields(self.missing))
        }
    }
}

/// Builder contract shared by all entity builders.
pub trait EntityBuilder: Sized {
    type Entity;

    /// Runs the required-field checks against the accumulated values.
    fn validator(&self) -> FieldValidator;

    /// Constructs the entity without checking anything.
    fn build_unchecked(self) -> Self::Entity;

    fn missing_fields(&self) -> Vec<MissingField> {
        self.validator().missing_fields()
    }

    /// Validates, then constructs. Nothing is built when a field is missing.
    fn build(self) -> Result<Self::Entity, MissingFields> {
        self.validator().validate()?;
        Ok(self.build_unchecked())
    }
}
