/*
 * Responsibility
 * - users / apiKeys テーブル向け SQLx 操作
 * - UserLookup: identity resolver が使う user lookup の境界 (trait)
 * - DB エラーは RepoError として返す (Anonymous 扱いにはしない)
 */
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use sha2::{Digest, Sha256};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::identity::{GrantType, Identity};
use crate::repos::error::RepoError;

/// User lookup used by the authentication strategies.
///
/// `Ok(None)` means "no such principal"; `Err` means the lookup itself failed.
#[async_trait]
pub trait UserLookup: Send + Sync {
    async fn find_by_credential(&self, token: &str) -> Result<Option<Identity>, RepoError>;

    async fn find_by_principal(&self, principal: Uuid) -> Result<Option<Identity>, RepoError>;
}

#[derive(Debug, FromRow)]
pub struct UserRow {
    #[sqlx(rename = "userId")]
    pub id: Uuid,
    #[sqlx(rename = "grantType")]
    pub grant_type: String,
}

impl TryFrom<UserRow> for Identity {
    type Error = RepoError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let grant_type = row.grant_type.parse::<GrantType>()?;
        Ok(Identity::new(row.id, grant_type))
    }
}

// A row we cannot map to an identity is bad data, not an outage: log it and
// treat the principal as unknown.
fn identity_from_row(row: Option<UserRow>) -> Result<Option<Identity>, RepoError> {
    let Some(row) = row else {
        return Ok(None);
    };
    let user_id = row.id;

    match Identity::try_from(row) {
        Ok(identity) => Ok(Some(identity)),
        Err(RepoError::InvalidRow(err)) => {
            tracing::error!(
                user_id = %user_id,
                error = %err,
                "user row has an invalid grant type"
            );
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

/// API keys are stored as base64url(sha256(key)); the raw key never reaches the DB.
pub fn hash_api_key(token: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(token.as_bytes()))
}

pub async fn find_by_api_key_hash(
    db: &PgPool,
    key_hash: &str,
) -> Result<Option<UserRow>, RepoError> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT u."userId", u."grantType"
        FROM "apiKeys" k
        JOIN users u ON u."userId" = k."userId"
        WHERE k."keyHash" = $1
          AND k."revokedAt" IS NULL
        "#,
    )
    .bind(key_hash)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn get(db: &PgPool, user_id: Uuid) -> Result<Option<UserRow>, RepoError> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT "userId", "grantType"
        FROM users
        WHERE "userId" = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

/// PostgreSQL-backed `UserLookup`.
#[derive(Clone, Debug)]
pub struct PgUserLookup {
    db: PgPool,
}

impl PgUserLookup {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserLookup for PgUserLookup {
    async fn find_by_credential(&self, token: &str) -> Result<Option<Identity>, RepoError> {
        identity_from_row(find_by_api_key_hash(&self.db, &hash_api_key(token)).await?)
    }

    async fn find_by_principal(&self, principal: Uuid) -> Result<Option<Identity>, RepoError> {
        identity_from_row(get(&self.db, principal).await?)
    }
}
