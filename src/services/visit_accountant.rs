//! Visit accounting
//!
//! Every successful resolve appends one visit and bumps the link counter.
//! The two writes are independent store calls, so a partial failure leaves
//! the counter and the visit log out of step. Resolution does not fail
//! because of it.

use std::sync::Arc;

use tracing::{trace, warn};

use crate::storage::{LinkStore, VisitContext};

/// What actually got written for one resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountingOutcome {
    pub visit_recorded: bool,
    pub click_counted: bool,
}

impl AccountingOutcome {
    pub fn is_complete(&self) -> bool {
        self.visit_recorded && self.click_counted
    }
}

pub struct VisitAccountant {
    store: Arc<dyn LinkStore>,
}

impl VisitAccountant {
    pub fn new(store: Arc<dyn LinkStore>) -> Self {
        Self { store }
    }

    /// Append a visit, then increment the counter. The increment runs even
    /// when the append failed.
    pub async fn record(&self, link_id: &str, context: &VisitContext) -> AccountingOutcome {
        let visit_recorded = match self.store.insert_visit(link_id, context).await {
            Ok(visit) => {
                trace!("Visit {} recorded for link {}", visit.id, link_id);
                true
            }
            Err(e) => {
                warn!("Failed to record visit for link {}: {}", link_id, e);
                false
            }
        };

        let click_counted = match self.store.increment_clicks(link_id).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to increment clicks for link {}: {}", link_id, e);
                false
            }
        };

        AccountingOutcome {
            visit_recorded,
            click_counted,
        }
    }
}
