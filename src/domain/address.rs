use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::validate::{
    ADDRESS_NAME_LEN, FieldError, check_body, check_datetime, check_max_len, check_non_negative,
    check_not_blank,
};

/// A postal address. Gyms may reference one; deleting the address cascades
/// into the gyms that reference it.
#[derive(Debug, Clone, Serialize)]
pub struct Address {
    pub id: Uuid,
    pub created_datetime: DateTime<Utc>,
    pub modified_datetime: DateTime<Utc>,
    pub city_name: String,
    pub street_name: String,
    pub house_number: i64,
    pub apartment_number: Option<i64>,
    /// Single non-digit character or a non-negative integer string.
    pub body: Option<String>,
}

impl Address {
    pub fn new(
        city_name: impl Into<String>,
        street_name: impl Into<String>,
        house_number: i64,
        apartment_number: Option<i64>,
        body: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_datetime: now,
            modified_datetime: now,
            city_name: city_name.into(),
            street_name: street_name.into(),
            house_number,
            apartment_number,
            body,
        }
    }

    pub fn validate(&self) -> Result<(), FieldError> {
        check_datetime("created_datetime", self.created_datetime)?;
        check_datetime("modified_datetime", self.modified_datetime)?;
        check_not_blank("city_name", &self.city_name)?;
        check_max_len("city_name", &self.city_name, ADDRESS_NAME_LEN)?;
        check_not_blank("street_name", &self.street_name)?;
        check_max_len("street_name", &self.street_name, ADDRESS_NAME_LEN)?;
        check_non_negative("house_number", self.house_number)?;
        if let Some(apartment) = self.apartment_number {
            check_non_negative("apartment_number", apartment)?;
        }
        if let Some(body) = &self.body {
            check_body("body", body)?;
        }
        Ok(())
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.city_name, self.street_name, self.house_number
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Address {
        Address::new("Amsterdam", "Keizersgracht", 12, Some(3), Some("A".into()))
    }

    #[test]
    fn valid_address_passes() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn multi_letter_body_fails() {
        let mut address = valid();
        address.body = Some("ab".into());
        assert_eq!(address.validate().unwrap_err().field, "body");
    }

    #[test]
    fn negative_house_number_fails() {
        let mut address = valid();
        address.house_number = -1;
        assert_eq!(address.validate().unwrap_err().field, "house_number");
    }
}
