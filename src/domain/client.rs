use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::validate::{FieldError, check_money};

/// A member account. Linked one-to-one with an identity principal and holds
/// the spendable balance ("net worth") used to buy subscriptions.
#[derive(Debug, Clone, Serialize)]
pub struct Client {
    pub id: Uuid,
    /// Identity principal this client belongs to. Exactly one client per
    /// principal.
    pub user: Uuid,
    pub net_worth: Decimal,
}

impl Client {
    pub fn new(user: Uuid, net_worth: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            user,
            net_worth,
        }
    }

    pub fn validate(&self) -> Result<(), FieldError> {
        check_money("net_worth", self.net_worth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::MAX_AMOUNT_OF_MONEY;

    #[test]
    fn balance_range() {
        let user = Uuid::new_v4();
        assert!(Client::new(user, Decimal::from(1000)).validate().is_ok());
        assert!(Client::new(user, Decimal::from(-1)).validate().is_err());
        assert!(
            Client::new(user, Decimal::from(MAX_AMOUNT_OF_MONEY))
                .validate()
                .is_err()
        );
    }
}
