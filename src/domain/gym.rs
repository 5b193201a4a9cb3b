use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::validate::{FieldError, check_datetime, check_max_len, check_not_blank};

pub const GYM_NAME_MAX_LEN: usize = 100;

#[derive(Debug, Clone, Serialize)]
pub struct Gym {
    pub id: Uuid,
    pub created_datetime: DateTime<Utc>,
    pub modified_datetime: DateTime<Utc>,
    pub gym_name: String,
    /// Optional address; deleting the referenced address deletes this gym.
    pub address: Option<Uuid>,
}

impl Gym {
    pub fn new(gym_name: impl Into<String>, address: Option<Uuid>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_datetime: now,
            modified_datetime: now,
            gym_name: gym_name.into(),
            address,
        }
    }

    pub fn validate(&self) -> Result<(), FieldError> {
        check_datetime("created_datetime", self.created_datetime)?;
        check_datetime("modified_datetime", self.modified_datetime)?;
        check_not_blank("gym_name", &self.gym_name)?;
        check_max_len("gym_name", &self.gym_name, GYM_NAME_MAX_LEN)?;
        Ok(())
    }
}

impl std::fmt::Display for Gym {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.gym_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_length_boundary() {
        assert!(Gym::new("a".repeat(100), None).validate().is_ok());
        let err = Gym::new("a".repeat(101), None).validate().unwrap_err();
        assert_eq!(err.field, "gym_name");
    }
}
