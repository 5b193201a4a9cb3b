use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::validate::{
    DESCRIPTION_MAX_LEN, FieldError, check_datetime, check_expire_date, check_max_len, check_money,
};

/// A purchasable membership offered by one gym.
#[derive(Debug, Clone, Serialize)]
pub struct Subscription {
    pub id: Uuid,
    pub created_datetime: DateTime<Utc>,
    pub modified_datetime: DateTime<Utc>,
    pub price: i64,
    pub expire_date: NaiveDate,
    pub description: Option<String>,
    pub gym: Uuid,
}

impl Subscription {
    pub fn new(
        gym: Uuid,
        price: i64,
        expire_date: NaiveDate,
        description: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_datetime: now,
            modified_datetime: now,
            price,
            expire_date,
            description,
            gym,
        }
    }

    pub fn price_decimal(&self) -> Decimal {
        Decimal::from(self.price)
    }

    pub fn validate(&self) -> Result<(), FieldError> {
        check_datetime("created_datetime", self.created_datetime)?;
        check_datetime("modified_datetime", self.modified_datetime)?;
        check_money("price", self.price_decimal())?;
        check_expire_date("expire_date", self.expire_date)?;
        if let Some(description) = &self.description {
            check_max_len("description", description, DESCRIPTION_MAX_LEN)?;
        }
        Ok(())
    }
}
