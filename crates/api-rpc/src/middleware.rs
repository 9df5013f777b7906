//! HTTP middleware
//!
//! Lifts caller identity headers set by a fronting proxy into the request
//! extensions, where RPC methods pick them up when building a `Context`.

use http::{HeaderMap, Request};
use ledger_rpc_core::domain::Headers;
use ledger_rpc_core::Role;
use std::task::{Context, Poll};
use tower::{Layer, Service};

pub const USER_HEADER: &str = "x-user";
pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

/// Caller identity carried by `headers`; missing or non-UTF-8 values are empty
pub fn caller_headers(headers: &HeaderMap) -> Headers {
    let value = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .unwrap_or_default()
            .to_string()
    };
    Headers::new(value(USER_HEADER), value(FORWARDED_FOR_HEADER))
}

/// Role of a caller on a listener
///
/// Identity headers only lift a guest to `Identified` when the listener
/// sits behind a trusted proxy; otherwise anyone could skip load shedding.
pub fn caller_role(listener: Role, headers: &Headers, trust_identity_headers: bool) -> Role {
    if trust_identity_headers && listener == Role::Guest && headers.is_identified() {
        Role::Identified
    } else {
        listener
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CallerHeadersLayer;

impl<S> Layer<S> for CallerHeadersLayer {
    type Service = CallerHeaders<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CallerHeaders { inner }
    }
}

#[derive(Debug, Clone)]
pub struct CallerHeaders<S> {
    inner: S,
}

impl<S, B> Service<Request<B>> for CallerHeaders<S>
where
    S: Service<Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<B>) -> Self::Future {
        let headers = caller_headers(request.headers());
        request.extensions_mut().insert(headers);
        self.inner.call(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    #[test]
    fn test_caller_headers_extracted() {
        let mut map = HeaderMap::new();
        map.insert(USER_HEADER, HeaderValue::from_static("alice"));
        map.insert(FORWARDED_FOR_HEADER, HeaderValue::from_static(" 203.0.113.9 "));

        let headers = caller_headers(&map);
        assert_eq!(headers, Headers::new("alice", "203.0.113.9"));
        assert!(!caller_headers(&HeaderMap::new()).is_identified());
    }

    #[test]
    fn test_identified_role_needs_trust() {
        let alice = Headers::new("alice", "");
        let anonymous = Headers::default();

        assert_eq!(caller_role(Role::Guest, &alice, true), Role::Identified);
        assert_eq!(caller_role(Role::Guest, &alice, false), Role::Guest);
        assert_eq!(caller_role(Role::Guest, &anonymous, true), Role::Guest);
        assert_eq!(caller_role(Role::Admin, &alice, true), Role::Admin);
    }
}
