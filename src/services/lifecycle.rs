//! Link lifecycle policy
//!
//! Pure decisions: whether a link may be resolved right now, and whether a
//! caller may read or mutate it. No I/O.

use chrono::{DateTime, Utc};

use crate::cache::CachedLinkEntry;
use crate::errors::{Result, ShortgateError};
use crate::services::identity::Caller;
use crate::storage::Link;

/// Fields the policy needs, shared by store records and cached snapshots
pub trait LifecycleState {
    fn code(&self) -> &str;
    fn is_active(&self) -> bool;
    fn expires_at(&self) -> Option<DateTime<Utc>>;
}

impl LifecycleState for Link {
    fn code(&self) -> &str {
        &self.code
    }

    fn is_active(&self) -> bool {
        self.is_active
    }

    fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }
}

impl LifecycleState for CachedLinkEntry {
    fn code(&self) -> &str {
        &self.code
    }

    fn is_active(&self) -> bool {
        self.is_active
    }

    fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }
}

/// Active, and either no expiry or an expiry not yet passed
pub fn is_usable(is_active: bool, expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    is_active && expires_at.is_none_or(|at| at >= now)
}

pub fn ensure_usable<T: LifecycleState>(link: &T, now: DateTime<Utc>) -> Result<()> {
    if !link.is_active() {
        return Err(ShortgateError::gone(format!(
            "Link '{}' has been deactivated",
            link.code()
        )));
    }
    if !is_usable(link.is_active(), link.expires_at(), now) {
        return Err(ShortgateError::gone(format!(
            "Link '{}' has expired",
            link.code()
        )));
    }
    Ok(())
}

/// Owner or admin. Existence must be checked before calling this.
pub fn ensure_owner_or_admin(link: &Link, caller: &Caller) -> Result<()> {
    if caller.id == link.owner_id || caller.is_admin() {
        Ok(())
    } else {
        Err(ShortgateError::forbidden(format!(
            "Caller '{}' does not own link '{}'",
            caller.id, link.code
        )))
    }
}
