use std::time::Duration;

use thiserror::Error;

use crate::context::ContextError;
use crate::repos::RepoError;
use crate::services::cache::CacheError;

/// A user/session lookup collaborator failed (not "not found").
#[derive(Debug, Error)]
pub enum LookupError {
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error(transparent)]
    Cache(#[from] CacheError),
    #[error("lookup timed out after {0:?}")]
    Timeout(Duration),
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Context(#[from] ContextError),
    /// Infrastructure failure while resolving; never downgraded to anonymous.
    #[error("{strategy} lookup failed: {source}")]
    LookupFailure {
        strategy: &'static str,
        #[source]
        source: LookupError,
    },
}
