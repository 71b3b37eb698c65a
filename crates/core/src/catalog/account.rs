//! Money account classification.

use serde::{Deserialize, Serialize};

use super::error::CatalogError;

/// Kind of money account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    /// Settlement or current account at a bank.
    BankAccount,
    /// Debit or credit card.
    Card,
    /// Physical cash desk.
    Cash,
    /// Online payment gateway balance.
    #[serde(alias = "robokassa")]
    PaymentGateway,
    /// Anything else.
    Other,
}

impl AccountKind {
    /// Returns the stored string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BankAccount => "bank_account",
            Self::Card => "card",
            Self::Cash => "cash",
            Self::PaymentGateway => "payment_gateway",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for AccountKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AccountKind {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bank_account" => Ok(Self::BankAccount),
            "card" => Ok(Self::Card),
            "cash" => Ok(Self::Cash),
            "payment_gateway" | "robokassa" => Ok(Self::PaymentGateway),
            "other" => Ok(Self::Other),
            _ => Err(CatalogError::InvalidAccountKind(s.to_string())),
        }
    }
}
