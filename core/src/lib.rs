//! rehab-core: jurisdiction-aware personal rehabilitation repayment engine.

pub mod config;
pub mod engine;
pub mod error;
pub mod feasibility;
pub mod format;
pub mod high_income;
pub mod input;
pub mod liquidation;
pub mod living_cost;
pub mod policy_book;
pub mod policy_store;
pub mod region;
pub mod repayment;
pub mod result;
pub mod types;

pub use engine::{calculate, calculate_as_of, RehabEngine};
pub use error::{RehabError, RehabResult};
