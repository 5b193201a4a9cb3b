use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::validate::{
    FieldError, MAX_NAME_LEN, check_datetime, check_max_len, check_not_blank,
};

pub const CERTIFICATE_DESCRIPTION_MAX_LEN: usize = 1000;

/// A qualification held by one coach. Deleted together with its coach.
#[derive(Debug, Clone, Serialize)]
pub struct Certificate {
    pub id: Uuid,
    pub created_datetime: DateTime<Utc>,
    pub modified_datetime: DateTime<Utc>,
    pub coach: Uuid,
    pub name: String,
    pub description: String,
}

impl Certificate {
    pub fn new(coach: Uuid, name: impl Into<String>, description: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_datetime: now,
            modified_datetime: now,
            coach,
            name: name.into(),
            description: description.into(),
        }
    }

    pub fn validate(&self) -> Result<(), FieldError> {
        check_datetime("created_datetime", self.created_datetime)?;
        check_datetime("modified_datetime", self.modified_datetime)?;
        check_not_blank("name", &self.name)?;
        check_max_len("name", &self.name, MAX_NAME_LEN)?;
        check_max_len("description", &self.description, CERTIFICATE_DESCRIPTION_MAX_LEN)?;
        Ok(())
    }
}
