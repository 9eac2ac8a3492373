/*
 * Responsibility
 * - request ごとの identity 解決 (bearer → session → anonymous)
 * - anonymous になった場合の session 無効化
 * - role による認可判定 (pure function)
 */
pub mod authorize;
pub mod error;
pub mod invalidator;
pub mod resolver;
pub mod strategy;

pub use authorize::{Decision, RoleRequirement, authorize, check, check_current};
pub use error::{AuthError, LookupError};
pub use invalidator::SessionInvalidator;
pub use resolver::{IdentityResolver, ResolverSettings};
pub use strategy::{AuthStrategy, BearerStrategy, SessionStrategy, StrategyOutcome};
