/*
 * Responsibility
 * - 解決済み主体 (Identity) と grant type の定義
 * - Resolution: Identity か Anonymous のどちらか (request ごとに一度だけ決まる)
 *
 * Notes
 * - Identity は user lookup の成功からのみ作られる (crate 外からは構築できない)
 */
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Role/grant classification attached to an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GrantType {
    User,
    Service,
    Admin,
}

impl GrantType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GrantType::User => "user",
            GrantType::Service => "service",
            GrantType::Admin => "admin",
        }
    }
}

impl fmt::Display for GrantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown grant type: {0}")]
pub struct UnknownGrantType(pub String);

impl FromStr for GrantType {
    type Err = UnknownGrantType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(GrantType::User),
            "service" => Ok(GrantType::Service),
            "admin" => Ok(GrantType::Admin),
            _ => Err(UnknownGrantType(s.to_string())),
        }
    }
}

/// An authenticated principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    id: Uuid,
    grant_type: GrantType,
}

impl Identity {
    pub(crate) fn new(id: Uuid, grant_type: GrantType) -> Self {
        Self { id, grant_type }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn grant_type(&self) -> GrantType {
        self.grant_type
    }
}

/// Which strategy produced the identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthSource {
    Bearer,
    Session,
}

/// Outcome of identity resolution for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Authenticated {
        identity: Identity,
        source: AuthSource,
    },
    Anonymous,
}

impl Resolution {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Resolution::Authenticated { identity, .. } => Some(identity),
            Resolution::Anonymous => None,
        }
    }

    pub fn source(&self) -> Option<AuthSource> {
        match self {
            Resolution::Authenticated { source, .. } => Some(*source),
            Resolution::Anonymous => None,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Resolution::Anonymous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grant_type_parses_case_insensitively() {
        assert_eq!("Admin".parse::<GrantType>(), Ok(GrantType::Admin));
        assert_eq!(" service ".parse::<GrantType>(), Ok(GrantType::Service));
        assert_eq!("user".parse::<GrantType>(), Ok(GrantType::User));
    }

    #[test]
    fn grant_type_rejects_unknown_values() {
        let err = "root".parse::<GrantType>().unwrap_err();
        assert_eq!(err, UnknownGrantType("root".to_string()));
    }

    #[test]
    fn anonymous_has_no_identity_or_source() {
        let anon = Resolution::Anonymous;
        assert!(anon.is_anonymous());
        assert!(anon.identity().is_none());
        assert!(anon.source().is_none());
    }

    #[test]
    fn authenticated_exposes_identity_and_source() {
        let identity = Identity::new(Uuid::new_v4(), GrantType::User);
        let resolved = Resolution::Authenticated {
            identity: identity.clone(),
            source: AuthSource::Session,
        };

        assert_eq!(resolved.identity(), Some(&identity));
        assert_eq!(resolved.source(), Some(AuthSource::Session));
        assert!(!resolved.is_anonymous());
    }
}
