/*
 * Responsibility
 * - request ごとの RequestContext の型 (identity slot と response への指示)
 * - RequestHead: transport から受け取る request の読み取り専用 snapshot
 */
use std::sync::atomic::{AtomicBool, Ordering};

use axum::http::{HeaderMap, Method, Uri, header, request::Parts};
use cookie::Cookie;
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::identity::{Identity, Resolution};

/// Read-only view of the inbound request that the auth core needs.
#[derive(Debug, Clone)]
pub struct RequestHead {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
}

impl RequestHead {
    pub fn new(method: Method, uri: Uri, headers: HeaderMap) -> Self {
        Self {
            method,
            uri,
            headers,
        }
    }

    pub fn from_parts(parts: &Parts) -> Self {
        Self::new(parts.method.clone(), parts.uri.clone(), parts.headers.clone())
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Header value as UTF-8. Non-visible-ASCII values are treated as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Value of the first cookie named `name` across all `Cookie` headers.
    pub fn cookie(&self, name: &str) -> Option<String> {
        self.headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(Cookie::split_parse)
            .filter_map(Result::ok)
            .find(|c| c.name() == name)
            .map(|c| c.value().to_string())
    }
}

/// Per-request state shared by everything running inside the request's scope.
///
/// The resolution slot is written at most once; the response directives are
/// read by the scope middleware once the inner service has produced a response.
#[derive(Debug)]
pub struct RequestContext {
    id: Uuid,
    head: RequestHead,
    resolution: OnceCell<Resolution>,
    clear_session_cookie: AtomicBool,
}

impl RequestContext {
    pub fn new(head: RequestHead) -> Self {
        Self {
            id: Uuid::new_v4(),
            head,
            resolution: OnceCell::new(),
            clear_session_cookie: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn head(&self) -> &RequestHead {
        &self.head
    }

    /// `None` until the identity resolver has run for this request.
    pub fn resolution(&self) -> Option<&Resolution> {
        self.resolution.get()
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.resolution().and_then(Resolution::identity)
    }

    pub(crate) fn resolution_cell(&self) -> &OnceCell<Resolution> {
        &self.resolution
    }

    /// Records that the outgoing response must clear the session cookie.
    /// Returns `true` only for the first call.
    pub(crate) fn request_session_cookie_clear(&self) -> bool {
        !self.clear_session_cookie.swap(true, Ordering::AcqRel)
    }

    pub fn clears_session_cookie(&self) -> bool {
        self.clear_session_cookie.load(Ordering::Acquire)
    }
}
