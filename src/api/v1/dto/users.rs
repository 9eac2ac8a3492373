/*
 * Responsibility
 * - Users の response DTO
 */
use serde::Serialize;
use uuid::Uuid;

use crate::identity::{GrantType, Identity};

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub grant_type: GrantType,
}

impl From<Identity> for UserResponse {
    fn from(identity: Identity) -> Self {
        Self {
            id: identity.id(),
            grant_type: identity.grant_type(),
        }
    }
}
