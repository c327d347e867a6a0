//! Status enums for orders.
//!
//! Each enum has a canonical storage code (what the database column holds)
//! and a canonical display label shown to restaurant managers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a storage code does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind} code: {code:?}")]
pub struct UnknownCode {
    kind: &'static str,
    code: String,
}

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Create,
    Prepare,
    Deliver,
    Done,
}

impl OrderStatus {
    /// Storage code for this status.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Prepare => "PREPARE",
            Self::Deliver => "DELIVER",
            Self::Done => "DONE",
        }
    }

    /// Display label for managers.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Create => "Создан",
            Self::Prepare => "Готовится",
            Self::Deliver => "Доставляется",
            Self::Done => "Выполнен",
        }
    }

    /// Whether the order still needs work.
    #[must_use]
    pub const fn is_open(self) -> bool {
        !matches!(self, Self::Done)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREATE" => Ok(Self::Create),
            "PREPARE" => Ok(Self::Prepare),
            "DELIVER" => Ok(Self::Deliver),
            "DONE" => Ok(Self::Done),
            _ => Err(UnknownCode {
                kind: "order status",
                code: s.to_string(),
            }),
        }
    }
}

/// How the customer pays for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentType {
    /// No payment type chosen yet (stored as an empty string).
    #[default]
    Unselected,
    Cash,
    Card,
}

impl PaymentType {
    /// Storage code for this payment type.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Unselected => "",
            Self::Cash => "CASH",
            Self::Card => "CARD",
        }
    }

    /// Display label for managers.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Unselected => "Не выбрано",
            Self::Cash => "Наличные",
            Self::Card => "Карта",
        }
    }
}

impl std::fmt::Display for PaymentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for PaymentType {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(Self::Unselected),
            "CASH" => Ok(Self::Cash),
            "CARD" => Ok(Self::Card),
            _ => Err(UnknownCode {
                kind: "payment type",
                code: s.to_string(),
            }),
        }
    }
}
