//! Service layer for business logic
//!
//! [`LinkService`] is the single entry point; the policy and accounting
//! pieces are exposed for reuse and testing.

pub mod identity;
pub mod lifecycle;
mod link_service;
pub mod visit_accountant;

pub use identity::{Caller, Role};
pub use link_service::*;
pub use visit_accountant::{AccountingOutcome, VisitAccountant};
