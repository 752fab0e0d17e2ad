//! Audit embeddable composed into every entity.
//!
//! Maps to the `CREATED_BY`, `CREATION_TIME`, `UPDATED_BY` and `UPDATED_TIME`
//! columns shared by all tables.

use chrono::{DateTime, Utc};

/// Actor recorded when nobody else is known.
pub const SYSTEM_ACTOR: &str = "system";

/// Creation and modification actor plus timestamp.
///
/// Never takes part in entity equality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistentData {
    created_by: String,
    time_of_creation: DateTime<Utc>,
    modified_by: String,
    time_of_modification: DateTime<Utc>,
}

impl PersistentData {
    /// Fresh audit state where `actor` both created and last modified the entity now.
    pub fn new(actor: impl Into<String>) -> Self {
        let actor = actor.into();
        let now = Utc::now();

        Self {
            created_by: actor.clone(),
            time_of_creation: now,
            modified_by: actor,
            time_of_modification: now,
        }
    }

    /// Audit state copied verbatim, used when loading from a DTO.
    pub fn from_parts(
        created_by: impl Into<String>,
        time_of_creation: DateTime<Utc>,
        modified_by: impl Into<String>,
        time_of_modification: DateTime<Utc>,
    ) -> Self {
        Self {
            created_by: created_by.into(),
            time_of_creation,
            modified_by: modified_by.into(),
            time_of_modification,
        }
    }

    /// Returns a new audit state modified by `modifier` now.
    ///
    /// Creation fields are preserved and `self` is left untouched.
    pub fn touch(&self, modifier: impl Into<String>) -> Self {
        Self {
            created_by: self.created_by.clone(),
            time_of_creation: self.time_of_creation,
            modified_by: modifier.into(),
            time_of_modification: Utc::now(),
        }
    }

    /// Returns a new audit state where `actor` replaces the system actor.
    ///
    /// Timestamps and any other actor are kept.
    pub fn attributed_to(&self, actor: &str) -> Self {
        let attribute = |recorded: &str| {
            if recorded == SYSTEM_ACTOR {
                actor.to_string()
            } else {
                recorded.to_string()
            }
        };

        Self {
            created_by: attribute(&self.created_by),
            time_of_creation: self.time_of_creation,
            modified_by: attribute(&self.modified_by),
            time_of_modification: self.time_of_modification,
        }
    }

    pub fn created_by(&self) -> &str {
        &self.created_by
    }

    pub fn time_of_creation(&self) -> DateTime<Utc> {
        self.time_of_creation
    }

    pub fn modified_by(&self) -> &str {
        &self.modified_by
    }

    pub fn time_of_modification(&self) -> DateTime<Utc> {
        self.time_of_modification
    }
}

impl Default for PersistentData {
    fn default() -> Self {
        Self::new(SYSTEM_ACTOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_new_uses_same_actor_and_time_for_creation_and_modification() {
        let data = PersistentData::new("jactor");

        assert_eq!(data.created_by(), "jactor");
        assert_eq!(data.modified_by(), "jactor");
        assert_eq!(data.time_of_creation(), data.time_of_modification());
    }

    #[test]
    fn test_default_actor_is_system() {
        let data = PersistentData::default();

        assert_eq!(data.created_by(), SYSTEM_ACTOR);
    }

    #[test]
    fn test_touch_returns_new_state_and_keeps_original() {
        let created = Utc::now() - Duration::days(2);
        let original = PersistentData::from_parts("creator", created, "creator", created);

        let touched = original.touch("modifier");

        assert_eq!(touched.created_by(), "creator");
        assert_eq!(touched.time_of_creation(), created);
        assert_eq!(touched.modified_by(), "modifier");
        assert!(touched.time_of_modification() > created);

        assert_eq!(original.modified_by(), "creator");
        assert_eq!(original.time_of_modification(), created);
    }

    #[test]
    fn test_attributed_to_replaces_only_the_system_actor() {
        let created = Utc::now() - Duration::hours(3);
        let original = PersistentData::from_parts(SYSTEM_ACTOR, created, "tip", created);

        let attributed = original.attributed_to("batch");

        assert_eq!(attributed.created_by(), "batch");
        assert_eq!(attributed.modified_by(), "tip");
        assert_eq!(attributed.time_of_creation(), created);
        assert_eq!(attributed.time_of_modification(), created);
        assert_eq!(original.created_by(), SYSTEM_ACTOR);
    }

    #[test]
    fn test_from_parts_copies_values_verbatim() {
        let created = Utc::now() - Duration::hours(5);
        let modified = Utc::now() - Duration::hours(1);

        let data = PersistentData::from_parts("a", created, "b", modified);

        assert_eq!(data.created_by(), "a");
        assert_eq!(data.time_of_creation(), created);
        assert_eq!(data.modified_by(), "b");
        assert_eq!(data.time_of_modification(), modified);
    }
}
