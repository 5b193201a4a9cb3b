//! Field validation rules shared by the domain entities.
//!
//! Each rule checks a single value and reports the offending field by name.
//! Rules run at entity-validation time, not at construction time: an entity
//! can exist in memory with invalid data but must pass `validate()` before
//! the store accepts it.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

/// Exclusive upper bound for every money value in the system.
pub const MAX_AMOUNT_OF_MONEY: i64 = 10_000_000;

pub const ADDRESS_NAME_LEN: usize = 256;
pub const DESCRIPTION_MAX_LEN: usize = 1024;
pub const MAX_NAME_LEN: usize = 50;

/// A validation failure tagged with the field it applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

pub fn max_money() -> Decimal {
    Decimal::from(MAX_AMOUNT_OF_MONEY)
}

/// Money must be in `[0, 10_000_000)`.
pub fn check_money(field: &'static str, money: Decimal) -> Result<(), FieldError> {
    if money < Decimal::ZERO || money >= max_money() {
        return Err(FieldError::new(
            field,
            "the money should be in the range between 0 and 9999999.99 inclusive",
        ));
    }
    Ok(())
}

/// Timestamps may not lie in the future.
pub fn check_datetime(field: &'static str, time: DateTime<Utc>) -> Result<(), FieldError> {
    if time > Utc::now() {
        return Err(FieldError::new(field, "datetime is not valid"));
    }
    Ok(())
}

/// Zero is allowed; only negative values are rejected.
pub fn check_non_negative(field: &'static str, number: i64) -> Result<(), FieldError> {
    if number < 0 {
        return Err(FieldError::new(field, "number must not be negative"));
    }
    Ok(())
}

/// A house "body" is either a non-negative integer string or exactly one
/// non-digit character.
pub fn check_body(field: &'static str, body: &str) -> Result<(), FieldError> {
    let is_digits = !body.is_empty() && body.chars().all(|c| c.is_ascii_digit());
    if !is_digits && body.chars().count() > 1 {
        return Err(FieldError::new(field, "body can only contain one letter"));
    }
    if is_digits {
        let number: i64 = body
            .parse()
            .map_err(|_| FieldError::new(field, "body is not a valid number"))?;
        check_non_negative(field, number)?;
    }
    Ok(())
}

/// Expiration dates must be today or later.
pub fn check_expire_date(field: &'static str, date: NaiveDate) -> Result<(), FieldError> {
    if date < Utc::now().date_naive() {
        return Err(FieldError::new(field, "date is not valid"));
    }
    Ok(())
}

/// Free-form addresses shorter than eleven characters are rejected.
pub fn check_address_len(field: &'static str, address: &str) -> Result<(), FieldError> {
    if address.chars().count() <= 10 {
        return Err(FieldError::new(
            field,
            "address length cannot be less than 10",
        ));
    }
    Ok(())
}

pub fn check_max_len(field: &'static str, value: &str, max: usize) -> Result<(), FieldError> {
    if value.chars().count() > max {
        return Err(FieldError::new(
            field,
            format!("ensure this field has no more than {max} characters"),
        ));
    }
    Ok(())
}

pub fn check_not_blank(field: &'static str, value: &str) -> Result<(), FieldError> {
    if value.trim().is_empty() {
        return Err(FieldError::new(field, "this field may not be blank"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn money_bounds() {
        assert!(check_money("money", Decimal::ZERO).is_ok());
        assert!(check_money("money", Decimal::from(9_999_999)).is_ok());
        assert!(check_money("money", Decimal::from(-1)).is_err());
        assert!(check_money("money", Decimal::from(MAX_AMOUNT_OF_MONEY)).is_err());
        assert!(check_money("money", Decimal::from(MAX_AMOUNT_OF_MONEY + 1)).is_err());
    }

    #[test]
    fn datetime_rejects_future() {
        assert!(check_datetime("created_datetime", Utc::now() - Duration::seconds(5)).is_ok());
        assert!(check_datetime("created_datetime", Utc::now() + Duration::hours(1)).is_err());
    }

    #[test]
    fn non_negative_allows_zero() {
        assert!(check_non_negative("house_number", 0).is_ok());
        assert!(check_non_negative("house_number", 7).is_ok());
        assert!(check_non_negative("house_number", -1).is_err());
    }

    #[test]
    fn body_structure() {
        assert!(check_body("body", "A").is_ok());
        assert!(check_body("body", "5").is_ok());
        assert!(check_body("body", "42").is_ok());
        assert!(check_body("body", "").is_ok());
        assert!(check_body("body", "ab").is_err());
        assert!(check_body("body", "-5").is_err());
        assert!(check_body("body", "A1").is_err());
    }

    #[test]
    fn expire_date_today_or_later() {
        let today = Utc::now().date_naive();
        assert!(check_expire_date("expire_date", today).is_ok());
        assert!(check_expire_date("expire_date", today + Duration::days(30)).is_ok());
        assert!(check_expire_date("expire_date", today - Duration::days(1)).is_err());
    }

    #[test]
    fn address_len_rule() {
        assert!(check_address_len("address", "Short st 1").is_err());
        assert!(check_address_len("address", "Long enough street 15").is_ok());
    }

    #[test]
    fn max_len_counts_chars() {
        assert!(check_max_len("gym_name", &"a".repeat(100), 100).is_ok());
        assert!(check_max_len("gym_name", &"a".repeat(101), 100).is_err());
    }
}
