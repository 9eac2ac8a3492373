//! Role-based authorization decision.
//!
//! Consulted by the execution layer once per protected operation. The decision
//! is a value: turning `Deny` into a user-visible error belongs to the caller.

use crate::context::{self, ContextError};
use crate::identity::{GrantType, Resolution};

/// Grant types allowed to run an operation. Empty means "any authenticated identity".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleRequirement {
    grants: Vec<GrantType>,
}

impl RoleRequirement {
    pub fn any_authenticated() -> Self {
        Self::default()
    }

    pub fn of(grants: impl IntoIterator<Item = GrantType>) -> Self {
        grants.into_iter().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }

    pub fn contains(&self, grant: GrantType) -> bool {
        self.grants.contains(&grant)
    }

    pub fn grants(&self) -> &[GrantType] {
        &self.grants
    }
}

impl FromIterator<GrantType> for RoleRequirement {
    fn from_iter<I: IntoIterator<Item = GrantType>>(iter: I) -> Self {
        let mut grants = Vec::new();
        for grant in iter {
            if !grants.contains(&grant) {
                grants.push(grant);
            }
        }
        Self { grants }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

impl From<bool> for Decision {
    fn from(allowed: bool) -> Self {
        if allowed {
            Decision::Allow
        } else {
            Decision::Deny
        }
    }
}

/// Anonymous is always denied; otherwise the grant type must be in the requirement
/// (or the requirement must be empty).
pub fn authorize(resolution: &Resolution, requirement: &RoleRequirement) -> bool {
    match resolution.identity() {
        None => false,
        Some(_) if requirement.is_empty() => true,
        Some(identity) => requirement.contains(identity.grant_type()),
    }
}

pub fn check(resolution: &Resolution, requirement: &RoleRequirement) -> Decision {
    authorize(resolution, requirement).into()
}

/// Decision for the request of the current scope.
///
/// An unresolved context is treated as anonymous.
pub fn check_current(requirement: &RoleRequirement) -> Result<Decision, ContextError> {
    let ctx = context::current()?;
    let decision = match ctx.resolution() {
        Some(resolution) => check(resolution, requirement),
        None => {
            tracing::warn!(
                request_context = %ctx.id(),
                "authorization consulted before identity resolution"
            );
            Decision::Deny
        }
    };
    Ok(decision)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{AuthSource, Identity};
    use crate::testing::head;
    use uuid::Uuid;

    const ALL: [GrantType; 3] = [GrantType::User, GrantType::Service, GrantType::Admin];

    fn resolved(grant: GrantType) -> Resolution {
        Resolution::Authenticated {
            identity: Identity::new(Uuid::new_v4(), grant),
            source: AuthSource::Bearer,
        }
    }

    // Every subset of ALL, including the empty one.
    fn all_requirements() -> Vec<RoleRequirement> {
        (0..(1 << ALL.len()))
            .map(|mask: usize| {
                ALL.iter()
                    .enumerate()
                    .filter(|(i, _)| mask & (1 << *i) != 0)
                    .map(|(_, g)| *g)
                    .collect()
            })
            .collect()
    }

    #[test]
    fn anonymous_is_always_denied() {
        for requirement in all_requirements() {
            assert!(!authorize(&Resolution::Anonymous, &requirement));
        }
        assert!(!authorize(
            &Resolution::Anonymous,
            &RoleRequirement::any_authenticated()
        ));
    }

    #[test]
    fn empty_requirement_allows_any_identity() {
        for grant in ALL {
            assert!(authorize(&resolved(grant), &RoleRequirement::any_authenticated()));
        }
    }

    #[test]
    fn allowed_iff_grant_type_in_requirement() {
        for grant in ALL {
            for requirement in all_requirements().into_iter().filter(|r| !r.is_empty()) {
                assert_eq!(
                    authorize(&resolved(grant), &requirement),
                    requirement.contains(grant),
                    "{grant} against {:?}",
                    requirement.grants()
                );
            }
        }
    }

    #[test]
    fn user_is_denied_admin_operation() {
        let requirement = RoleRequirement::of([GrantType::Admin]);
        assert_eq!(check(&resolved(GrantType::User), &requirement), Decision::Deny);
    }

    #[test]
    fn admin_is_allowed_admin_or_user_operation() {
        let requirement = RoleRequirement::of([GrantType::Admin, GrantType::User]);
        assert_eq!(check(&resolved(GrantType::Admin), &requirement), Decision::Allow);
    }

    #[test]
    fn requirement_deduplicates_grants() {
        let requirement = RoleRequirement::of([GrantType::Admin, GrantType::Admin]);
        assert_eq!(requirement.grants(), &[GrantType::Admin]);
    }

    #[tokio::test]
    async fn check_current_reads_the_scope_resolution() {
        let requirement = RoleRequirement::of([GrantType::Service]);

        let decision = context::enter_scope(head(&[]), async {
            let ctx = context::current().unwrap();
            ctx.resolution_cell().set(resolved(GrantType::Service)).unwrap();
            check_current(&requirement).unwrap()
        })
        .await;
        assert_eq!(decision, Decision::Allow);

        let unresolved = context::enter_scope(head(&[]), async {
            check_current(&RoleRequirement::any_authenticated()).unwrap()
        })
        .await;
        assert_eq!(unresolved, Decision::Deny);

        assert_eq!(
            check_current(&requirement),
            Err(ContextError::NoActiveContext)
        );
    }
}
