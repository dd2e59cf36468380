//! Status enums for carts and orders.
//!
//! Both enums are stored as lowercase text in Postgres and parsed back with
//! `FromStr`; a value the database holds that no variant matches surfaces as
//! a data-corruption error at the repository layer.

use serde::{Deserialize, Serialize};

/// Cart lifecycle status.
///
/// A cart is `Active` while it accumulates items, flips to `Ordered` exactly
/// once at successful checkout, and may be marked `Abandoned` by cleanup jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CartStatus {
    #[default]
    Active,
    Ordered,
    Abandoned,
}

impl CartStatus {
    /// The lowercase database representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Ordered => "ordered",
            Self::Abandoned => "abandoned",
        }
    }
}

impl std::fmt::Display for CartStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CartStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "ordered" => Ok(Self::Ordered),
            "abandoned" => Ok(Self::Abandoned),
            _ => Err(format!("invalid cart status: {s}")),
        }
    }
}

/// Order lifecycle status.
///
/// Orders are created as `Pending`; the later transitions belong to
/// fulfillment tooling, not the checkout core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Refunded,
    Completed,
}

impl OrderStatus {
    /// The lowercase database representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
            Self::Refunded => "refunded",
            Self::Completed => "completed",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "processing" => Ok(Self::Processing),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            "refunded" => Ok(Self::Refunded),
            "completed" => Ok(Self::Completed),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cart_status_round_trips() {
        for status in [CartStatus::Active, CartStatus::Ordered, CartStatus::Abandoned] {
            assert_eq!(status.as_str().parse::<CartStatus>(), Ok(status));
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!("frozen".parse::<CartStatus>().is_err());
        assert!("".parse::<OrderStatus>().is_err());
    }
}
