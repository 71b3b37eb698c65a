//! Cash-flow and profit/loss aggregation.
//!
//! The store supplies the scoped, date-filtered transactions as
//! [`ReportEntry`] rows; everything else happens here with exact decimal
//! arithmetic.

pub mod error;
pub mod service;
pub mod types;


pub use error::ReportError;
pub use service::ReportService;
pub use types::*;
