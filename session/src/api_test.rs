use std::cell::RefCell;
use std::collections::VecDeque;
use std::future::{Future, ready};
use std::rc::Rc;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use futures::executor::block_on;
use serde_json::json;

use super::*;
use crate::claims::{EMAIL_CLAIM, ROLE_CLAIM, SUBJECT_ID_CLAIM};
use crate::error::user_message;
use crate::http::{HttpResponse, Method};
use crate::storage::MemoryStorage;
use crate::types::ApiErrorBody;

// =============================================================
// Helpers
// =============================================================

const NOW_MS: i64 = 1_700_000_000_000;

#[derive(Clone, Default)]
struct RecordingTransport {
    responses: Rc<RefCell<VecDeque<Result<HttpResponse, ApiError>>>>,
    requests: Rc<RefCell<Vec<HttpRequest>>>,
}

impl RecordingTransport {
    fn respond(&self, status: u16, body: serde_json::Value) {
        self.responses.borrow_mut().push_back(Ok(HttpResponse {
            status,
            body: body.to_string(),
        }));
    }

    fn fail(&self, error: ApiError) {
        self.responses.borrow_mut().push_back(Err(error));
    }

    fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }
}

impl Transport for RecordingTransport {
    fn send(&self, request: &HttpRequest) -> impl Future<Output = Result<HttpResponse, ApiError>> {
        self.requests.borrow_mut().push(request.clone());
        let next = self
            .responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Network("no scripted response".to_owned())));
        ready(next)
    }
}

#[derive(Clone, Default)]
struct RecordingNavigator {
    redirects: Rc<RefCell<Vec<String>>>,
}

impl Navigator for RecordingNavigator {
    fn current_path(&self) -> Option<String> {
        Some("/admin/profile".to_owned())
    }

    fn redirect(&self, path: &str) {
        self.redirects.borrow_mut().push(path.to_owned());
    }
}

struct Harness {
    transport: RecordingTransport,
    navigator: RecordingNavigator,
    api: AuthApi<RecordingTransport, MemoryStorage>,
}

impl Harness {
    fn new() -> Self {
        Self::with_config(&ApiConfig::default())
    }

    fn with_config(config: &ApiConfig) -> Self {
        let transport = RecordingTransport::default();
        let navigator = RecordingNavigator::default();
        let api = AuthApi::new(
            transport.clone(),
            TokenStore::new(MemoryStorage::new()),
            navigator.clone(),
            config,
        );
        Self {
            transport,
            navigator,
            api,
        }
    }
}

fn token(payload: &serde_json::Value) -> String {
    format!("eyJhbGciOiJIUzI1NiJ9.{}.sig", URL_SAFE_NO_PAD.encode(payload.to_string()))
}

fn identity_token(exp: i64) -> String {
    token(&json!({
        SUBJECT_ID_CLAIM: "user-42",
        EMAIL_CLAIM: "guest@hotel.test",
        ROLE_CLAIM: "Customer",
        "exp": exp,
    }))
}

fn ok(data: serde_json::Value) -> serde_json::Value {
    json!({ "success": true, "message": "ok", "data": data, "errors": [], "timestamp": "2024-01-01T00:00:00Z" })
}

fn login_payload() -> LoginPayload {
    LoginPayload {
        email: "guest@hotel.test".to_owned(),
        password: "secret1".to_owned(),
    }
}

// =============================================================
// Login / refresh persistence
// =============================================================

#[test]
fn login_persists_returned_pair() {
    let h = Harness::new();
    h.transport
        .respond(200, ok(json!({ "token": "t", "refreshToken": "r" })));

    let tokens = block_on(h.api.login(&login_payload())).expect("login");

    assert_eq!(tokens, TokenPair::new("t", "r"));
    assert_eq!(h.api.tokens().tokens(), Some(TokenPair::new("t", "r")));

    let requests = h.transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, Method::Post);
    assert_eq!(requests[0].path, "/api/Auth/Login");
    assert_eq!(requests[0].header("Authorization"), None);
    assert_eq!(
        requests[0].body,
        RequestBody::Json(json!({ "email": "guest@hotel.test", "password": "secret1" }))
    );
}

#[test]
fn rejected_login_leaves_store_empty() {
    let h = Harness::new();
    h.transport.respond(
        200,
        json!({ "success": false, "message": "Invalid credentials", "errors": [] }),
    );

    let err = block_on(h.api.login(&login_payload())).expect_err("rejected");

    assert_eq!(
        err,
        ApiError::Rejected {
            message: "Invalid credentials".to_owned(),
            errors: Vec::new(),
        }
    );
    assert_eq!(user_message(&err), "Invalid credentials");
    assert!(!h.api.tokens().has_tokens());
}

#[test]
fn refresh_token_posts_pair_and_persists_result() {
    let h = Harness::new();
    h.transport
        .respond(200, ok(json!({ "token": "t2", "refreshToken": "r2" })));

    let tokens = block_on(h.api.refresh_token("t1", "r1")).expect("refresh");

    assert_eq!(tokens, TokenPair::new("t2", "r2"));
    assert_eq!(h.api.tokens().tokens(), Some(TokenPair::new("t2", "r2")));
    let requests = h.transport.requests();
    assert_eq!(requests[0].path, "/api/Auth/Refreshtoken");
    assert_eq!(
        requests[0].body,
        RequestBody::Json(json!({ "accessToken": "t1", "refreshToken": "r1" }))
    );
}

#[test]
fn logout_is_local_only() {
    let h = Harness::new();
    h.api.tokens().save_tokens(&TokenPair::new("t", "r"));

    h.api.logout();

    assert!(!h.api.tokens().has_tokens());
    assert!(h.transport.requests().is_empty());
}

// =============================================================
// Error mapping
// =============================================================

#[test]
fn error_status_carries_parsed_body() {
    let h = Harness::new();
    h.transport.respond(
        400,
        json!({ "success": false, "message": "Validation failed", "errors": ["Email already exists"] }),
    );

    let payload = RegisterPayload {
        full_name: "Guest".to_owned(),
        email: "guest@hotel.test".to_owned(),
        password: "Secret1".to_owned(),
        confirm_password: "Secret1".to_owned(),
        phone_number: "0912345678".to_owned(),
    };
    let err = block_on(h.api.register(&payload)).expect_err("400");

    assert_eq!(
        err,
        ApiError::Status {
            status: 400,
            body: Some(ApiErrorBody {
                message: "Validation failed".to_owned(),
                errors: vec!["Email already exists".to_owned()],
            }),
        }
    );
    assert_eq!(user_message(&err), "Email already exists");
}

#[test]
fn error_status_with_non_json_body_has_no_body() {
    let h = Harness::new();
    h.transport.responses.borrow_mut().push_back(Ok(HttpResponse {
        status: 502,
        body: "<html>Bad Gateway</html>".to_owned(),
    }));

    let err = block_on(h.api.current_user()).expect_err("502");

    assert_eq!(err, ApiError::Status { status: 502, body: None });
}

#[test]
fn unauthorized_clears_tokens_and_redirects() {
    let h = Harness::new();
    h.api.tokens().save_tokens(&TokenPair::new("t", "r"));
    h.transport.respond(401, json!({ "message": "Unauthorized" }));

    let err = block_on(h.api.current_user()).expect_err("401");

    assert_eq!(err.status(), Some(401));
    assert!(!h.api.tokens().has_tokens());
    assert_eq!(*h.navigator.redirects.borrow(), vec!["/auth/signin".to_owned()]);
}

#[test]
fn network_failure_propagates_without_redirect() {
    let h = Harness::new();
    h.api.tokens().save_tokens(&TokenPair::new("t", "r"));
    h.transport.fail(ApiError::Timeout);

    let err = block_on(h.api.current_user()).expect_err("timeout");

    assert_eq!(err, ApiError::Timeout);
    assert!(h.api.tokens().has_tokens());
    assert!(h.navigator.redirects.borrow().is_empty());
}

#[test]
fn malformed_success_body_is_decode_error() {
    let h = Harness::new();
    h.transport.respond(200, json!(["not", "an", "envelope"]));

    let err = block_on(h.api.current_user()).expect_err("decode");

    assert!(matches!(err, ApiError::Decode(_)));
}

#[test]
fn accepted_envelope_without_data_is_decode_error() {
    let h = Harness::new();
    h.transport.respond(200, json!({ "success": true, "message": "ok" }));

    let err = block_on(h.api.current_user()).expect_err("no data");

    assert!(matches!(err, ApiError::Decode(_)));
}

// =============================================================
// Sign-in orchestration
// =============================================================

#[test]
fn sign_in_merges_profile_with_token_identity() {
    let h = Harness::new();
    let access = identity_token(9_999_999_999);
    h.transport
        .respond(200, ok(json!({ "token": access, "refreshToken": "r" })));
    h.transport.respond(
        200,
        ok(json!({ "id": "user-42", "fullName": "Guest One", "email": "", "emailConfirmed": true })),
    );

    let signed_in = block_on(h.api.sign_in(&login_payload())).expect("sign in");

    assert_eq!(signed_in.tokens, TokenPair::new(access.clone(), "r"));
    assert_eq!(signed_in.user.subject_id, "user-42");
    assert_eq!(signed_in.user.role, "Customer");
    assert_eq!(signed_in.user.email, "guest@hotel.test");
    assert_eq!(signed_in.user.display_name(), "Guest One");
    assert!(signed_in.user.email_confirmed);

    let requests = h.transport.requests();
    assert_eq!(requests[1].path, "/api/Auth/me");
    assert_eq!(
        requests[1].header("Authorization"),
        Some(format!("Bearer {access}").as_str())
    );
}

#[test]
fn sign_in_rejects_token_without_identity_claims() {
    let h = Harness::new();
    let access = token(&json!({ "sub": "123", "exp": 9_999_999_999_i64 }));
    h.transport
        .respond(200, ok(json!({ "token": access, "refreshToken": "r" })));

    let err = block_on(h.api.sign_in(&login_payload())).expect_err("invalid token");

    assert_eq!(err, ApiError::InvalidToken);
    assert!(!h.api.tokens().has_tokens());
    assert_eq!(h.transport.requests().len(), 1);
}

// =============================================================
// Refresh policy
// =============================================================

#[test]
fn refresh_if_needed_refreshes_inside_window() {
    let h = Harness::new();
    let expiring = identity_token((NOW_MS + 2 * 60_000) / 1000);
    h.api.tokens().save_tokens(&TokenPair::new(expiring, "r1"));
    h.transport
        .respond(200, ok(json!({ "token": "t2", "refreshToken": "r2" })));

    let refreshed = block_on(h.api.refresh_if_needed_at(5, NOW_MS)).expect("refresh");

    assert_eq!(refreshed, Some(TokenPair::new("t2", "r2")));
    assert_eq!(h.api.tokens().tokens(), Some(TokenPair::new("t2", "r2")));
}

#[test]
fn refresh_if_needed_skips_fresh_and_expired_tokens() {
    let h = Harness::new();
    for exp in [(NOW_MS + 60 * 60_000) / 1000, (NOW_MS - 60_000) / 1000] {
        h.api
            .tokens()
            .save_tokens(&TokenPair::new(identity_token(exp), "r"));
        let refreshed = block_on(h.api.refresh_if_needed_at(5, NOW_MS)).expect("no-op");
        assert_eq!(refreshed, None);
    }
    assert!(h.transport.requests().is_empty());
}

#[test]
fn refresh_if_needed_without_tokens_is_noop() {
    let h = Harness::new();
    assert_eq!(block_on(h.api.refresh_if_needed_at(5, NOW_MS)), Ok(None));
    assert!(h.transport.requests().is_empty());
}

// =============================================================
// Request shapes
// =============================================================

#[test]
fn confirm_email_sends_query_without_bearer() {
    let h = Harness::new();
    h.api.tokens().save_tokens(&TokenPair::new("t", "r"));
    h.transport.respond(200, ok(json!(null)));

    block_on(h.api.confirm_email("user-42", "abc")).expect("confirm");

    let request = &h.transport.requests()[0];
    assert_eq!(request.method, Method::Get);
    assert_eq!(request.path, "/api/Auth/email-confirmation");
    assert_eq!(
        request.query,
        vec![
            ("userId".to_owned(), "user-42".to_owned()),
            ("token".to_owned(), "abc".to_owned()),
        ]
    );
    assert_eq!(request.header("Authorization"), None);
}

#[test]
fn upload_avatar_sends_multipart_file() {
    let h = Harness::new();
    h.api.tokens().save_tokens(&TokenPair::new("t", "r"));
    h.transport
        .respond(200, ok(json!("https://cdn.hotel.test/a.png")));

    let upload = AvatarUpload {
        file_name: "a.png".to_owned(),
        content_type: "image/png".to_owned(),
        bytes: vec![1, 2, 3],
        delete_old: true,
    };
    let url = block_on(h.api.upload_avatar(&upload)).expect("upload");

    assert_eq!(url, "https://cdn.hotel.test/a.png");
    let request = &h.transport.requests()[0];
    assert_eq!(request.path, "/api/Auth/upload-avatar");
    assert_eq!(request.query, vec![("deleteOld".to_owned(), "true".to_owned())]);
    assert_eq!(request.header("Authorization"), Some("Bearer t"));
    assert_eq!(
        request.body,
        RequestBody::Multipart {
            field: "file".to_owned(),
            file_name: "a.png".to_owned(),
            content_type: "image/png".to_owned(),
            bytes: vec![1, 2, 3],
        }
    );
}

#[test]
fn list_users_passes_filters_and_decodes_page() {
    let h = Harness::new();
    h.transport.respond(
        200,
        ok(json!({
            "items": [{ "id": "u1", "email": "a@hotel.test" }],
            "pageNumber": 2,
            "pageSize": 10,
            "totalPages": 3,
            "totalCount": 21,
            "hasPreviousPage": true,
            "hasNextPage": true,
        })),
    );

    let query = UserListQuery {
        page_number: Some(2),
        page_size: Some(10),
        role: Some("Admin".to_owned()),
        ..UserListQuery::default()
    };
    let page = block_on(h.api.list_users(&query)).expect("list");

    assert_eq!(page.total_count, 21);
    assert_eq!(page.items[0].email, "a@hotel.test");
    let request = &h.transport.requests()[0];
    assert_eq!(request.path, "/api/Auth/");
    assert_eq!(request.query, query.to_pairs());
}

#[test]
fn user_by_id_targets_user_path() {
    let h = Harness::new();
    h.transport
        .respond(200, ok(json!({ "id": "u9", "email": "u9@hotel.test" })));

    let profile = block_on(h.api.user_by_id("u9")).expect("user");

    assert_eq!(profile.id.as_deref(), Some("u9"));
    assert_eq!(h.transport.requests()[0].path, "/api/Auth/u9");
}

#[test]
fn user_by_id_escapes_the_id_segment() {
    let h = Harness::new();
    h.api.tokens().save_tokens(&TokenPair::new("t", "r"));
    h.transport
        .respond(200, ok(json!({ "id": "x", "email": "x@hotel.test" })));

    block_on(h.api.user_by_id("Login?x=1#frag/..")).expect("user");

    let request = &h.transport.requests()[0];
    assert_eq!(request.path, "/api/Auth/Login%3Fx%3D1%23frag%2F..");
    assert!(request.query.is_empty());
    assert_eq!(request.header("Authorization"), Some("Bearer t"));
}

#[test]
fn google_login_url_uses_configured_origin() {
    let h = Harness::with_config(&ApiConfig::with_base_url("https://api.hotel.test/"));
    assert_eq!(
        h.api.google_login_url(),
        "https://api.hotel.test/api/Auth/google-login"
    );
    assert_eq!(
        Harness::new().api.google_login_url(),
        "/api/Auth/google-login"
    );
}
