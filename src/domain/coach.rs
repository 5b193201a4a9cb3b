use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::validate::{
    FieldError, MAX_NAME_LEN, check_datetime, check_max_len, check_not_blank,
};

pub const SPECIALIZATION_MAX_LEN: usize = 100;

#[derive(Debug, Clone, Serialize)]
pub struct Coach {
    pub id: Uuid,
    pub created_datetime: DateTime<Utc>,
    pub modified_datetime: DateTime<Utc>,
    pub first_name: String,
    pub last_name: String,
    pub specialization: String,
}

impl Coach {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        specialization: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_datetime: now,
            modified_datetime: now,
            first_name: first_name.into(),
            last_name: last_name.into(),
            specialization: specialization.into(),
        }
    }

    pub fn validate(&self) -> Result<(), FieldError> {
        check_datetime("created_datetime", self.created_datetime)?;
        check_datetime("modified_datetime", self.modified_datetime)?;
        check_not_blank("first_name", &self.first_name)?;
        check_max_len("first_name", &self.first_name, MAX_NAME_LEN)?;
        check_not_blank("last_name", &self.last_name)?;
        check_max_len("last_name", &self.last_name, MAX_NAME_LEN)?;
        check_not_blank("specialization", &self.specialization)?;
        check_max_len("specialization", &self.specialization, SPECIALIZATION_MAX_LEN)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_length_boundary() {
        assert!(Coach::new("a".repeat(50), "B", "C").validate().is_ok());
        let err = Coach::new("a".repeat(51), "B", "C").validate().unwrap_err();
        assert_eq!(err.field, "first_name");
    }
}
