//! String-backed enums stored in entity columns.
//!
//! Each mirrors a closed domain enum from `tally-core`; the `From` impls are
//! the only place the two are paired.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use tally_core::catalog::{AccountKind, UserRole as CoreUserRole};
use tally_core::ledger::TransactionKind;
use tally_core::planning::RecurrencePattern as CoreRecurrencePattern;

/// Stored account type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    #[sea_orm(string_value = "bank_account")]
    BankAccount,
    #[sea_orm(string_value = "card")]
    Card,
    #[sea_orm(string_value = "cash")]
    Cash,
    #[sea_orm(string_value = "payment_gateway")]
    PaymentGateway,
    #[sea_orm(string_value = "other")]
    Other,
}

impl From<AccountKind> for AccountType {
    fn from(kind: AccountKind) -> Self {
        match kind {
            AccountKind::BankAccount => Self::BankAccount,
            AccountKind::Card => Self::Card,
            AccountKind::Cash => Self::Cash,
            AccountKind::PaymentGateway => Self::PaymentGateway,
            AccountKind::Other => Self::Other,
        }
    }
}

impl From<AccountType> for AccountKind {
    fn from(kind: AccountType) -> Self {
        match kind {
            AccountType::BankAccount => Self::BankAccount,
            AccountType::Card => Self::Card,
            AccountType::Cash => Self::Cash,
            AccountType::PaymentGateway => Self::PaymentGateway,
            AccountType::Other => Self::Other,
        }
    }
}

/// Stored transaction type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    #[sea_orm(string_value = "income")]
    Income,
    #[sea_orm(string_value = "expense")]
    Expense,
    #[sea_orm(string_value = "transfer")]
    Transfer,
}

impl From<TransactionKind> for TransactionType {
    fn from(kind: TransactionKind) -> Self {
        match kind {
            TransactionKind::Income => Self::Income,
            TransactionKind::Expense => Self::Expense,
            TransactionKind::Transfer => Self::Transfer,
        }
    }
}

impl From<TransactionType> for TransactionKind {
    fn from(kind: TransactionType) -> Self {
        match kind {
            TransactionType::Income => Self::Income,
            TransactionType::Expense => Self::Expense,
            TransactionType::Transfer => Self::Transfer,
        }
    }
}

/// Stored user role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "manager")]
    Manager,
}

impl From<CoreUserRole> for UserRole {
    fn from(role: CoreUserRole) -> Self {
        match role {
            CoreUserRole::Admin => Self::Admin,
            CoreUserRole::Manager => Self::Manager,
        }
    }
}

impl From<UserRole> for CoreUserRole {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Admin => Self::Admin,
            UserRole::Manager => Self::Manager,
        }
    }
}

/// Stored recurrence pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "lowercase")]
pub enum RecurrencePattern {
    #[sea_orm(string_value = "daily")]
    Daily,
    #[sea_orm(string_value = "weekly")]
    Weekly,
    #[sea_orm(string_value = "monthly")]
    Monthly,
    #[sea_orm(string_value = "yearly")]
    Yearly,
}

impl From<CoreRecurrencePattern> for RecurrencePattern {
    fn from(pattern: CoreRecurrencePattern) -> Self {
        match pattern {
            CoreRecurrencePattern::Daily => Self::Daily,
            CoreRecurrencePattern::Weekly => Self::Weekly,
            CoreRecurrencePattern::Monthly => Self::Monthly,
            CoreRecurrencePattern::Yearly => Self::Yearly,
        }
    }
}

impl From<RecurrencePattern> for CoreRecurrencePattern {
    fn from(pattern: RecurrencePattern) -> Self {
        match pattern {
            RecurrencePattern::Daily => Self::Daily,
            RecurrencePattern::Weekly => Self::Weekly,
            RecurrencePattern::Monthly => Self::Monthly,
            RecurrencePattern::Yearly => Self::Yearly,
        }
    }
}
