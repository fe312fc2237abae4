use super::*;

fn status(status: u16, body: Option<ApiErrorBody>) -> ApiError {
    ApiError::Status { status, body }
}

#[test]
fn server_errors_list_wins() {
    let err = status(
        400,
        Some(ApiErrorBody {
            message: "Validation failed".to_owned(),
            errors: vec!["Email is taken".to_owned(), "Password too short".to_owned()],
        }),
    );
    assert_eq!(user_message(&err), "Email is taken\nPassword too short");
}

#[test]
fn server_message_used_when_errors_empty() {
    let err = status(
        400,
        Some(ApiErrorBody {
            message: "Invalid credentials".to_owned(),
            errors: Vec::new(),
        }),
    );
    assert_eq!(user_message(&err), "Invalid credentials");
}

#[test]
fn status_bucket_used_without_body() {
    assert_eq!(user_message(&status(403, None)), ErrorKind::Forbidden.default_message());
    assert_eq!(user_message(&status(502, None)), ErrorKind::Server.default_message());
    assert_eq!(user_message(&status(504, None)), ErrorKind::Timeout.default_message());
    assert_eq!(user_message(&status(418, None)), ErrorKind::Unknown.default_message());
}

#[test]
fn rejected_response_uses_its_message() {
    let err = ApiError::Rejected {
        message: "Email not confirmed".to_owned(),
        errors: Vec::new(),
    };
    assert_eq!(user_message(&err), "Email not confirmed");
}

#[test]
fn network_and_timeout_use_defaults() {
    assert_eq!(
        user_message(&ApiError::Network("refused".to_owned())),
        ErrorKind::Network.default_message()
    );
    assert_eq!(user_message(&ApiError::Timeout), ErrorKind::Timeout.default_message());
}

#[test]
fn status_predicates() {
    assert!(is_auth_error(&status(401, None)));
    assert!(is_forbidden(&status(403, None)));
    assert!(is_not_found(&status(404, None)));
    assert!(is_server_error(&status(500, None)));
    assert!(is_server_error(&status(599, None)));
    assert!(!is_server_error(&status(600, None)));
    assert!(is_network_error(&ApiError::Network("x".to_owned())));
    assert!(!is_network_error(&ApiError::Timeout));
}

#[test]
fn kind_maps_statuses() {
    assert_eq!(ErrorKind::from_status(400), ErrorKind::BadRequest);
    assert_eq!(ErrorKind::from_status(401), ErrorKind::Unauthorized);
    assert_eq!(ErrorKind::from_status(408), ErrorKind::Timeout);
    assert_eq!(ErrorKind::from_status(503), ErrorKind::Server);
}
