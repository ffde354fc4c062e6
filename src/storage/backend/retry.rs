//! Store call policy
//!
//! Every link store call runs through [`run`]. A failed call is sorted into
//! a [`Failure`]: lock contention and dropped connections are retried with
//! backoff, a duplicate short code becomes `Conflict`, a row that vanished
//! becomes `NotFound`, and everything else surfaces as `DatabaseOperation`.

use std::future::Future;
use std::time::Duration;

use rand::RngExt;
use sea_orm::error::RuntimeErr;
use sea_orm::{DbErr, SqlErr};
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::DatabaseConfig;
use crate::errors::{Result, ShortgateError};

/// MySQL deadlock / lock wait, PostgreSQL serialization / deadlock, SQLite BUSY / LOCKED
const CONTENTION_CODES: &[&str] = &["1213", "1205", "40001", "40P01", "5", "6"];

const CONTENTION_MESSAGES: &[&str] = &[
    "deadlock",
    "lock wait timeout",
    "database is locked",
    "serialization failure",
];

/// How a failed store call is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// Worth another attempt
    Transient,
    /// The unique index on `links.code` rejected the write
    Duplicate,
    /// The targeted row does not exist
    Missing,
    Fatal,
}

impl Failure {
    pub fn classify(err: &DbErr) -> Self {
        if let Some(SqlErr::UniqueConstraintViolation(_)) = err.sql_err() {
            return Failure::Duplicate;
        }

        match err {
            DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated => Failure::Missing,
            DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => Failure::Transient,
            DbErr::Exec(runtime) | DbErr::Query(runtime) if is_contention(runtime) => {
                Failure::Transient
            }
            _ => Failure::Fatal,
        }
    }

    fn into_error(self, operation: &str, err: &DbErr) -> ShortgateError {
        match self {
            Failure::Duplicate => {
                ShortgateError::conflict(format!("{}: short code already in use", operation))
            }
            Failure::Missing => ShortgateError::not_found(format!("{}: no such record", operation)),
            Failure::Transient | Failure::Fatal => {
                ShortgateError::database_operation(format!("{} failed: {}", operation, err))
            }
        }
    }
}

fn is_contention(runtime: &RuntimeErr) -> bool {
    if let RuntimeErr::SqlxError(sqlx_err) = runtime
        && let Some(code) = sqlx_err.as_database_error().and_then(|db| db.code())
    {
        return CONTENTION_CODES.contains(&code.as_ref());
    }

    let message = runtime.to_string().to_lowercase();
    CONTENTION_MESSAGES.iter().any(|m| message.contains(m))
}

/// Convert a store error without retrying (used inside transactions)
pub fn to_store_error(operation: &str, err: DbErr) -> ShortgateError {
    Failure::classify(&err).into_error(operation, &err)
}

/// Retry budget for transient failures
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Extra attempts after the first call
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl RetryPolicy {
    /// Exponential delay before retry number `retry` (1-based), capped, plus up to 25% jitter
    pub fn delay_for(&self, retry: u32) -> Duration {
        let shift = retry.saturating_sub(1).min(20);
        let capped = self
            .base_delay_ms
            .saturating_mul(1u64 << shift)
            .min(self.max_delay_ms);
        let jitter = rand::rng().random_range(0..=capped / 4);
        Duration::from_millis(capped.saturating_add(jitter))
    }
}

impl From<&DatabaseConfig> for RetryPolicy {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            max_retries: config.retry_count,
            base_delay_ms: config.retry_base_delay_ms,
            max_delay_ms: config.retry_max_delay_ms,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&DatabaseConfig::default())
    }
}

/// Run one store call under `policy`, translating the final failure
pub async fn run<T, F, Fut>(policy: RetryPolicy, operation: &str, mut call: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, DbErr>>,
{
    let mut retries = 0;
    loop {
        let err = match call().await {
            Ok(value) => {
                if retries > 0 {
                    debug!("{} succeeded after {} retries", operation, retries);
                }
                return Ok(value);
            }
            Err(err) => err,
        };

        match Failure::classify(&err) {
            Failure::Transient if retries < policy.max_retries => {
                retries += 1;
                let delay = policy.delay_for(retries);
                warn!(
                    "{} hit a transient database error (retry {}/{} in {:?}): {}",
                    operation, retries, policy.max_retries, delay, err
                );
                sleep(delay).await;
            }
            failure => return Err(failure.into_error(operation, &err)),
        }
    }
}
