//! Core business logic for Tally.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `ledger` - Posting rules and account balance arithmetic
//! - `planning` - Planned transaction completion
//! - `catalog` - Account kinds, user roles and category trees
//! - `reports` - Cash-flow and profit/loss aggregation

pub mod catalog;
pub mod ledger;
pub mod planning;
pub mod reports;
