//! Operation boundary for authorization.
//!
//! The checker only answers allow/deny; this is where a denial becomes an
//! error: anonymous callers get 401, authenticated ones without the grant 403.

use crate::auth::{Decision, RoleRequirement, check};
use crate::error::AppError;
use crate::identity::{Identity, Resolution};

pub fn require<'a>(
    resolution: &'a Resolution,
    requirement: &RoleRequirement,
) -> Result<&'a Identity, AppError> {
    match (check(resolution, requirement), resolution.identity()) {
        (Decision::Allow, Some(identity)) => Ok(identity),
        (_, None) => Err(AppError::Unauthenticated),
        (_, Some(identity)) => {
            tracing::info!(
                user_id = %identity.id(),
                grant_type = %identity.grant_type(),
                required = ?requirement.grants(),
                "operation denied"
            );
            Err(AppError::Forbidden)
        }
    }
}
