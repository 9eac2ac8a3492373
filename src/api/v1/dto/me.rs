use serde::Serialize;
use uuid::Uuid;

use crate::identity::{AuthSource, GrantType};

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: Uuid,
    pub grant_type: GrantType,
    pub source: Option<AuthSource>,
}
