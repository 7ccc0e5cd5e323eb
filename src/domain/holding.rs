//! Holding: a user's recorded stock position.

use chrono::NaiveDateTime;

use super::symbol::Symbol;

/// A stock position owned by exactly one account.
///
/// `owner_id` is opaque to the sweep: the refresh path updates every
/// holding regardless of owner, and only the (external) CRUD layer scopes
/// by it. `last_price` starts equal to `buy_price` and is thereafter
/// rewritten by the sweep or by an explicit owner edit.
#[derive(Debug, Clone, PartialEq)]
pub struct Holding {
    pub id: i64,
    pub symbol: Symbol,
    pub quantity: i64,
    pub buy_price: f64,
    pub last_price: f64,
    pub owner_id: i64,
    pub created_at: NaiveDateTime,
}

impl Holding {
    /// A new holding priced at its purchase price until the first sweep.
    pub fn new(
        id: i64,
        symbol: Symbol,
        quantity: i64,
        buy_price: f64,
        owner_id: i64,
        created_at: NaiveDateTime,
    ) -> Self {
        Holding {
            id,
            symbol,
            quantity,
            buy_price,
            last_price: buy_price,
            owner_id,
            created_at,
        }
    }

    pub fn market_value(&self) -> f64 {
        self.quantity as f64 * self.last_price
    }

    pub fn unrealized_pnl(&self) -> f64 {
        self.quantity as f64 * (self.last_price - self.buy_price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn sample_holding() -> Holding {
        Holding::new(
            1,
            Symbol::new("THYAO").unwrap(),
            100,
            50.0,
            7,
            NaiveDate::from_ymd_opt(2024, 3, 1)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
        )
    }

    #[test]
    fn new_holding_priced_at_buy_price() {
        let holding = sample_holding();
        assert_relative_eq!(holding.last_price, 50.0);
        assert_relative_eq!(holding.buy_price, 50.0);
    }

    #[test]
    fn market_value_uses_last_price() {
        let mut holding = sample_holding();
        holding.last_price = 55.0;
        assert_relative_eq!(holding.market_value(), 5500.0);
    }

    #[test]
    fn unrealized_pnl_positive_and_negative() {
        let mut holding = sample_holding();
        holding.last_price = 55.0;
        assert_relative_eq!(holding.unrealized_pnl(), 500.0);
        holding.last_price = 45.0;
        assert_relative_eq!(holding.unrealized_pnl(), -500.0);
    }
}
