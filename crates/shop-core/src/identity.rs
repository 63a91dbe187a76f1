//! Caller identity.
//!
//! Token verification happens upstream; by the time a request reaches this
//! crate the caller is either a verified user id or nobody.

use crate::error::CommerceError;
use crate::ids::UserId;

/// Require a verified caller.
pub fn authenticated(caller: Option<&UserId>) -> Result<&UserId, CommerceError> {
    match caller {
        Some(user_id) if !user_id.as_str().trim().is_empty() => Ok(user_id),
        _ => Err(CommerceError::Unauthenticated),
    }
}
