//! Ordered request/response hooks around every API call.
//!
//! DESIGN
//! ======
//! Cross-cutting behavior lives in an explicit [`MiddlewareChain`] owned by
//! each [`AuthApi`](crate::api::AuthApi) rather than in state shared between
//! HTTP client instances. Request middleware runs in insertion order before
//! the transport; response middleware runs in insertion order after it.
//!
//! The standard chain:
//! 1. [`RequestLog`]: debug log of each call and its outcome.
//! 2. [`BearerAuth`]: `Authorization: Bearer <access token>` unless public.
//! 3. [`UnauthorizedRedirect`]: on 401 clear tokens, send the user to sign-in.

#[cfg(test)]
#[path = "middleware_test.rs"]
mod middleware_test;

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::storage::Storage;
use crate::store::TokenStore;

/// Final path segments reachable without an access token.
pub const PUBLIC_ENDPOINTS: [&str; 6] = [
    "/Login",
    "/register-customer",
    "/forgot-password",
    "/resetpassword",
    "/google-login",
    "/email-confirmation",
];

/// Whether the last segment of `path` is a public endpoint.
#[must_use]
pub fn is_public_endpoint(path: &str) -> bool {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    PUBLIC_ENDPOINTS.iter().any(|endpoint| path.ends_with(endpoint))
}

/// Where the user is and where they can be sent.
pub trait Navigator {
    /// Current location path, if the environment has one.
    fn current_path(&self) -> Option<String>;
    /// Navigate to `path`.
    fn redirect(&self, path: &str);
}

pub trait RequestMiddleware {
    fn on_request(&self, request: &mut HttpRequest);
}

pub trait ResponseMiddleware {
    /// Called once for every response received, successful or not.
    fn on_response(&self, request: &HttpRequest, response: &HttpResponse);

    /// Called once when no response was received.
    fn on_failure(&self, _request: &HttpRequest, _error: &ApiError) {}
}

/// Ordered lists of request and response middleware.
#[derive(Default)]
pub struct MiddlewareChain {
    request: Vec<Box<dyn RequestMiddleware>>,
    response: Vec<Box<dyn ResponseMiddleware>>,
}

impl MiddlewareChain {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Logging, bearer credentials and 401 handling over `tokens`.
    #[must_use]
    pub fn standard<S, N>(tokens: TokenStore<S>, navigator: N, signin_path: &str) -> Self
    where
        S: Storage + Clone + 'static,
        N: Navigator + 'static,
    {
        Self::new()
            .with_request(RequestLog)
            .with_request(BearerAuth::new(tokens.clone()))
            .with_response(RequestLog)
            .with_response(UnauthorizedRedirect::new(tokens, navigator, signin_path))
    }

    #[must_use]
    pub fn with_request(mut self, middleware: impl RequestMiddleware + 'static) -> Self {
        self.request.push(Box::new(middleware));
        self
    }

    #[must_use]
    pub fn with_response(mut self, middleware: impl ResponseMiddleware + 'static) -> Self {
        self.response.push(Box::new(middleware));
        self
    }

    pub fn apply_request(&self, request: &mut HttpRequest) {
        for middleware in &self.request {
            middleware.on_request(request);
        }
    }

    pub fn apply_response(&self, request: &HttpRequest, response: &HttpResponse) {
        for middleware in &self.response {
            middleware.on_response(request, response);
        }
    }

    pub fn apply_failure(&self, request: &HttpRequest, error: &ApiError) {
        for middleware in &self.response {
            middleware.on_failure(request, error);
        }
    }
}

/// Attaches the stored access token to non-public requests.
pub struct BearerAuth<S> {
    tokens: TokenStore<S>,
}

impl<S: Storage> BearerAuth<S> {
    pub fn new(tokens: TokenStore<S>) -> Self {
        Self { tokens }
    }
}

impl<S: Storage> RequestMiddleware for BearerAuth<S> {
    fn on_request(&self, request: &mut HttpRequest) {
        if is_public_endpoint(&request.path) {
            return;
        }
        if let Some(token) = self.tokens.access_token() {
            request.set_header("Authorization", format!("Bearer {token}"));
        }
    }
}

/// On 401: clear stored tokens and redirect to sign-in unless already there.
pub struct UnauthorizedRedirect<S, N> {
    tokens: TokenStore<S>,
    navigator: N,
    signin_path: String,
}

impl<S: Storage, N: Navigator> UnauthorizedRedirect<S, N> {
    pub fn new(tokens: TokenStore<S>, navigator: N, signin_path: &str) -> Self {
        Self {
            tokens,
            navigator,
            signin_path: signin_path.to_owned(),
        }
    }
}

impl<S: Storage, N: Navigator> ResponseMiddleware for UnauthorizedRedirect<S, N> {
    fn on_response(&self, _request: &HttpRequest, response: &HttpResponse) {
        if response.status != 401 {
            return;
        }
        log::warn!("401 unauthorized, clearing tokens");
        self.tokens.clear_tokens();

        let on_signin = self
            .navigator
            .current_path()
            .is_some_and(|path| path.contains(&self.signin_path));
        if !on_signin {
            log::info!("redirecting to {}", self.signin_path);
            self.navigator.redirect(&self.signin_path);
        }
    }
}

/// Logs requests at debug level and non-2xx outcomes by severity.
pub struct RequestLog;

impl RequestMiddleware for RequestLog {
    fn on_request(&self, request: &mut HttpRequest) {
        log::debug!("[api request] {} {}", request.method.as_str(), request.path);
    }
}

impl ResponseMiddleware for RequestLog {
    fn on_response(&self, request: &HttpRequest, response: &HttpResponse) {
        let method = request.method.as_str();
        let path = &request.path;
        match response.status {
            200..=299 => log::debug!("[api response] {method} {path} -> {}", response.status),
            403 => log::warn!("[api] 403 forbidden: {method} {path}"),
            404 => log::warn!("[api] 404 not found: {method} {path}"),
            500.. => log::error!("[api] server error {}: {method} {path}", response.status),
            status => log::warn!("[api] {method} {path} -> {status}"),
        }
    }

    fn on_failure(&self, request: &HttpRequest, error: &ApiError) {
        log::error!("[api error] {} {}: {error}", request.method.as_str(), request.path);
    }
}
