use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::storage::MemoryStorage;
use crate::types::TokenPair;

// =============================================================
// Helpers
// =============================================================

#[derive(Clone, Default)]
struct RecordingNavigator {
    path: Option<String>,
    redirects: Rc<RefCell<Vec<String>>>,
}

impl Navigator for RecordingNavigator {
    fn current_path(&self) -> Option<String> {
        self.path.clone()
    }

    fn redirect(&self, path: &str) {
        self.redirects.borrow_mut().push(path.to_owned());
    }
}

fn store_with_tokens() -> TokenStore<MemoryStorage> {
    let store = TokenStore::new(MemoryStorage::new());
    store.save_tokens(&TokenPair::new("access-1", "refresh-1"));
    store
}

fn response(status: u16) -> HttpResponse {
    HttpResponse {
        status,
        body: String::new(),
    }
}

// =============================================================
// Public endpoint allow-list
// =============================================================

#[test]
fn public_endpoints_are_recognized() {
    assert!(is_public_endpoint("/api/Auth/Login"));
    assert!(is_public_endpoint("/api/Auth/register-customer"));
    assert!(is_public_endpoint("/api/Auth/forgot-password"));
    assert!(is_public_endpoint("/api/Auth/resetpassword"));
    assert!(is_public_endpoint("/api/Auth/google-login"));
    assert!(is_public_endpoint("/api/Auth/email-confirmation"));
}

#[test]
fn private_endpoints_are_not_public() {
    assert!(!is_public_endpoint("/api/Auth/me"));
    assert!(!is_public_endpoint("/api/Auth/Refreshtoken"));
    assert!(!is_public_endpoint("/api/Auth/profile"));
    assert!(!is_public_endpoint("/api/Auth/"));
}

#[test]
fn public_match_is_on_the_final_segment() {
    assert!(is_public_endpoint("/api/Auth/email-confirmation?userId=u1"));
    assert!(!is_public_endpoint("/api/Auth/Login%3Fx%3D1"));
    assert!(!is_public_endpoint("/api/Auth/Login/extra"));
    assert!(!is_public_endpoint("/api/Auth/user/google-login-history"));
}

// =============================================================
// BearerAuth
// =============================================================

#[test]
fn bearer_attached_to_private_path_when_token_stored() {
    let auth = BearerAuth::new(store_with_tokens());
    let mut request = HttpRequest::get("/api/Auth/me");
    auth.on_request(&mut request);
    assert_eq!(request.header("Authorization"), Some("Bearer access-1"));
}

#[test]
fn bearer_header_omitted_without_stored_token() {
    let auth = BearerAuth::new(TokenStore::new(MemoryStorage::new()));
    let mut request = HttpRequest::get("/api/Auth/me");
    auth.on_request(&mut request);
    assert_eq!(request.header("Authorization"), None);
    assert!(request.headers.is_empty());
}

#[test]
fn bearer_header_omitted_for_public_path() {
    let auth = BearerAuth::new(store_with_tokens());
    let mut request = HttpRequest::post("/api/Auth/Login");
    auth.on_request(&mut request);
    assert_eq!(request.header("authorization"), None);
}

#[test]
fn bearer_replaces_existing_header() {
    let auth = BearerAuth::new(store_with_tokens());
    let mut request = HttpRequest::get("/api/Auth/me");
    request.set_header("authorization", "Bearer stale");
    auth.on_request(&mut request);
    assert_eq!(request.headers.len(), 1);
    assert_eq!(request.header("Authorization"), Some("Bearer access-1"));
}

// =============================================================
// UnauthorizedRedirect
// =============================================================

#[test]
fn unauthorized_clears_tokens_and_redirects_once() {
    let store = store_with_tokens();
    let navigator = RecordingNavigator {
        path: Some("/admin/dashboard".to_owned()),
        ..RecordingNavigator::default()
    };
    let handler = UnauthorizedRedirect::new(store.clone(), navigator.clone(), "/auth/signin");

    handler.on_response(&HttpRequest::get("/api/Auth/me"), &response(401));

    assert_eq!(store.tokens(), None);
    assert_eq!(*navigator.redirects.borrow(), vec!["/auth/signin".to_owned()]);
}

#[test]
fn unauthorized_on_signin_page_does_not_redirect() {
    let store = store_with_tokens();
    let navigator = RecordingNavigator {
        path: Some("/auth/signin".to_owned()),
        ..RecordingNavigator::default()
    };
    let handler = UnauthorizedRedirect::new(store.clone(), navigator.clone(), "/auth/signin");

    handler.on_response(&HttpRequest::get("/api/Auth/me"), &response(401));

    assert_eq!(store.tokens(), None);
    assert!(navigator.redirects.borrow().is_empty());
}

#[test]
fn other_error_statuses_leave_tokens_alone() {
    let store = store_with_tokens();
    let navigator = RecordingNavigator::default();
    let handler = UnauthorizedRedirect::new(store.clone(), navigator.clone(), "/auth/signin");

    for status in [200, 400, 403, 404, 500, 503] {
        handler.on_response(&HttpRequest::get("/api/Auth/me"), &response(status));
    }

    assert!(store.has_tokens());
    assert!(navigator.redirects.borrow().is_empty());
}

// =============================================================
// Chain ordering
// =============================================================

struct Tag(&'static str);

impl RequestMiddleware for Tag {
    fn on_request(&self, request: &mut HttpRequest) {
        let existing = request.header("X-Trail").unwrap_or_default().to_owned();
        request.set_header("X-Trail", format!("{existing}{}", self.0));
    }
}

#[test]
fn request_middleware_runs_in_insertion_order() {
    let chain = MiddlewareChain::new().with_request(Tag("a")).with_request(Tag("b"));
    let mut request = HttpRequest::get("/x");
    chain.apply_request(&mut request);
    assert_eq!(request.header("X-Trail"), Some("ab"));
}

#[test]
fn standard_chain_attaches_bearer_and_handles_401() {
    let store = store_with_tokens();
    let navigator = RecordingNavigator::default();
    let chain = MiddlewareChain::standard(store.clone(), navigator.clone(), "/auth/signin");

    let mut request = HttpRequest::get("/api/Auth/me");
    chain.apply_request(&mut request);
    assert_eq!(request.header("Authorization"), Some("Bearer access-1"));

    chain.apply_response(&request, &response(401));
    assert!(!store.has_tokens());
    assert_eq!(navigator.redirects.borrow().len(), 1);
}
