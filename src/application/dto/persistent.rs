//! Identity and audit fields shared by every DTO.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::sequencing::EntityId;
use crate::domain::value_objects::{PersistentData, SYSTEM_ACTOR};

/// Id plus the audit quad, flattened into each entity DTO.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistentDto {
    pub id: Option<EntityId>,
    pub created_by: Option<String>,
    pub time_of_creation: Option<DateTime<Utc>>,
    pub modified_by: Option<String>,
    pub time_of_modification: Option<DateTime<Utc>>,
}

impl PersistentDto {
    pub fn new(id: Option<EntityId>, persistent_data: &PersistentData) -> Self {
        Self {
            id,
            created_by: Some(persistent_data.created_by().to_string()),
            time_of_creation: Some(persistent_data.time_of_creation()),
            modified_by: Some(persistent_data.modified_by().to_string()),
            time_of_modification: Some(persistent_data.time_of_modification()),
        }
    }

    /// Audit state carried by this DTO.
    ///
    /// Values present on the DTO are copied verbatim. A DTO that was never
    /// persisted gets the system actor and the current time.
    pub fn to_persistent_data(&self) -> PersistentData {
        let created_by = self
            .created_by
            .clone()
            .unwrap_or_else(|| SYSTEM_ACTOR.to_string());
        let time_of_creation = self.time_of_creation.unwrap_or_else(Utc::now);

        PersistentData::from_parts(
            created_by.clone(),
            time_of_creation,
            self.modified_by.clone().unwrap_or(created_by),
            self.time_of_modification.unwrap_or(time_of_creation),
        )
    }
}
