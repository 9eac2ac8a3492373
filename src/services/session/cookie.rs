// Session cookie removal
//
// The auth core never issues session cookies; it only expires them when a
// request turns out to be anonymous.

use cookie::Cookie;
use cookie::time::{Duration, OffsetDateTime};

/// Configuration of the session cookie as issued by the login flow.
#[derive(Debug, Clone)]
pub struct SessionCookieConfig {
    /// Cookie name (default: `koa.sess`)
    pub name: String,
    /// Cookie path (default: "/")
    pub path: String,
    /// Whether to set the Secure flag (true in production)
    pub secure: bool,
    /// Whether the cookie carries a `<name>.sig` signature companion
    pub signed: bool,
}

impl Default for SessionCookieConfig {
    fn default() -> Self {
        Self {
            name: "koa.sess".to_string(),
            path: "/".to_string(),
            secure: true,
            signed: true,
        }
    }
}

impl SessionCookieConfig {
    /// Cookies that expire the session (and its signature) on the client.
    pub fn removal_cookies(&self) -> Vec<Cookie<'static>> {
        let mut cookies = vec![self.removal_cookie(self.name.clone())];
        if self.signed {
            cookies.push(self.removal_cookie(format!("{}.sig", self.name)));
        }
        cookies
    }

    fn removal_cookie(&self, name: String) -> Cookie<'static> {
        Cookie::build((name, ""))
            .path(self.path.clone())
            .http_only(true)
            .secure(self.secure)
            .max_age(Duration::ZERO)
            .expires(OffsetDateTime::UNIX_EPOCH)
            .build()
    }
}
