//! Bounded store calls.

use crate::error::CommerceError;
use std::future::Future;
use std::time::Duration;

/// Run a store call, failing with [`CommerceError::Timeout`] if it does not
/// finish within `limit`.
pub(crate) async fn bounded<T, F>(limit: Duration, call: F) -> Result<T, CommerceError>
where
    F: Future<Output = Result<T, CommerceError>>,
{
    tokio::time::timeout(limit, call)
        .await
        .map_err(|_| CommerceError::Timeout(limit))?
}
