pub mod error;
pub mod user_repo;

pub use error::RepoError;
pub use user_repo::{PgUserLookup, UserLookup};
