//! Bounded waits for store calls.
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - No bound is applied unless one is configured
//! - Timeout errors are distinct from connection and command errors

use std::future::Future;
use std::time::Duration;

use tokio::time::timeout;

use crate::store::{StoreError, StoreResult};

/// Await `fut`, failing with [`StoreError::Timeout`] once `limit` elapses.
pub async fn bounded<F, T, E>(limit: Option<Duration>, fut: F) -> StoreResult<T>
where
    F: Future<Output = Result<T, E>>,
    E: Into<StoreError>,
{
    let Some(limit) = limit else {
        return fut.await.map_err(Into::into);
    };
    match timeout(limit, fut).await {
        Ok(result) => result.map_err(Into::into),
        Err(_) => Err(StoreError::Timeout(
            u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
        )),
    }
}
