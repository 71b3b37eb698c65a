//! Planned transactions.
//!
//! A plan is a not-yet-realized transaction. Completing it produces a real
//! posting with the plan's monetary and categorical fields. Recurrence
//! patterns are stored with the plan but never executed.

pub mod error;
pub mod service;
pub mod types;

pub use error::PlanningError;
pub use service::PlanningService;
pub use types::{CompletionPolicy, CreatePlanInput, PlanCompletion, PlanSnapshot, PlanState, RecurrencePattern};
