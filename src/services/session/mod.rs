pub mod cookie;
pub mod store;
pub mod valkey;

pub use cookie::SessionCookieConfig;
pub use store::{SessionHandle, SessionStore};
pub use valkey::CacheSessionStore;
