use super::*;
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

// =============================================================
// Helpers
// =============================================================

const NOW_MS: i64 = 1_700_000_000_000;

fn token(payload: &Value) -> String {
    format!("eyJhbGciOiJIUzI1NiJ9.{}.sig", URL_SAFE_NO_PAD.encode(payload.to_string()))
}

fn full_token(exp: i64) -> String {
    token(&serde_json::json!({
        SUBJECT_ID_CLAIM: "user-42",
        EMAIL_CLAIM: "guest@hotel.test",
        ROLE_CLAIM: "Customer",
        "exp": exp,
        "iss": "hotelsocial",
        "aud": "hotelsocial-web",
    }))
}

fn exp_in_ms(ms: i64) -> i64 {
    (NOW_MS + ms) / 1000
}

// =============================================================
// Claim extraction
// =============================================================

#[test]
fn extracts_long_form_identity_claims() {
    let t = full_token(exp_in_ms(3_600_000));
    assert_eq!(subject_id(&t).as_deref(), Some("user-42"));
    assert_eq!(email(&t).as_deref(), Some("guest@hotel.test"));
    assert_eq!(role(&t).as_deref(), Some("Customer"));
}

#[test]
fn decoded_claims_carry_standard_fields() {
    let claims = DecodedClaims::from_token(&full_token(1234)).expect("decode");
    assert_eq!(claims.expires_at_epoch_seconds, Some(1234));
    assert_eq!(claims.issuer.as_deref(), Some("hotelsocial"));
    assert_eq!(claims.audience.as_deref(), Some("hotelsocial-web"));
}

#[test]
fn role_array_yields_first_role() {
    let t = token(&serde_json::json!({ ROLE_CLAIM: ["Admin", "Customer"] }));
    assert_eq!(role(&t).as_deref(), Some("Admin"));
}

#[test]
fn empty_claim_counts_as_absent() {
    let t = token(&serde_json::json!({ EMAIL_CLAIM: "" }));
    assert_eq!(email(&t), None);
}

#[test]
fn float_exp_is_truncated() {
    let claims = DecodedClaims::from_token(&token(&serde_json::json!({ "exp": 99.9 }))).expect("decode");
    assert_eq!(claims.expires_at_epoch_seconds, Some(99));
}

#[test]
fn short_form_sub_is_not_a_subject_id() {
    let t = "header.eyJzdWIiOiIxMjMiLCJleHAiOjk5OTk5OTk5OTl9.sig";
    assert!(codec::decode(t).is_ok());
    assert_eq!(subject_id(t), None);
    assert_eq!(user_info(t), None);
}

#[test]
fn user_info_requires_all_three_claims() {
    let t = full_token(exp_in_ms(60_000));
    assert_eq!(
        user_info(&t),
        Some(TokenIdentity {
            subject_id: "user-42".to_owned(),
            email: "guest@hotel.test".to_owned(),
            role: "Customer".to_owned(),
        })
    );

    let missing_role = token(&serde_json::json!({
        SUBJECT_ID_CLAIM: "user-42",
        EMAIL_CLAIM: "guest@hotel.test",
    }));
    assert_eq!(user_info(&missing_role), None);
}

#[test]
fn malformed_tokens_give_defaults() {
    for bad in ["", "abc", "a.b", "a.b.c.d", "h.!!!!.s", "h.bm90IGpzb24.s"] {
        assert_eq!(subject_id(bad), None, "{bad}");
        assert_eq!(email(bad), None, "{bad}");
        assert_eq!(role(bad), None, "{bad}");
        assert_eq!(user_info(bad), None, "{bad}");
        assert_eq!(expiration_date(bad), None, "{bad}");
        assert_eq!(time_until_expiration_at(bad, NOW_MS), 0, "{bad}");
        assert!(!should_refresh_at(bad, 5, NOW_MS), "{bad}");
        assert!(is_expired_at(bad, NOW_MS), "{bad}");
    }
}

// =============================================================
// Expiry policy
// =============================================================

#[test]
fn token_without_exp_never_expires() {
    let t = token(&serde_json::json!({ "sub": "1" }));
    assert!(!is_expired_at(&t, NOW_MS));
    assert!(!is_expired_at(&t, i64::MAX));
    assert_eq!(time_until_expiration_at(&t, NOW_MS), 0);
    assert_eq!(expiration_date(&t), None);
}

#[test]
fn zero_exp_reads_as_no_expiry() {
    let t = full_token(0);
    assert_eq!(
        DecodedClaims::from_token(&t).expect("decode").expires_at_epoch_seconds,
        None
    );
    assert!(!is_expired_at(&t, NOW_MS));
    assert_eq!(expiration_date(&t), None);
    assert_eq!(time_until_expiration_at(&t, NOW_MS), 0);
}

#[test]
fn expired_exactly_at_expiry_instant() {
    let exp = NOW_MS / 1000;
    let t = full_token(exp);
    assert!(!is_expired_at(&t, exp * 1000 - 1));
    assert!(is_expired_at(&t, exp * 1000));
}

#[test]
fn is_expired_is_monotonic_in_time() {
    let t = full_token(exp_in_ms(10_000));
    let mut seen_expired = false;
    for step in 0..40 {
        let now = NOW_MS + step * 1_000;
        let expired = is_expired_at(&t, now);
        assert!(!seen_expired || expired, "expiry flipped back at {now}");
        seen_expired |= expired;
    }
    assert!(seen_expired);
}

#[test]
fn time_until_expiration_is_clamped_at_zero() {
    let t = full_token(exp_in_ms(-60_000));
    assert_eq!(time_until_expiration_at(&t, NOW_MS), 0);
}

#[test]
fn time_until_expiration_counts_down() {
    let t = full_token(exp_in_ms(120_000));
    assert_eq!(time_until_expiration_at(&t, NOW_MS), 120_000);
    assert_eq!(time_until_expiration_at(&t, NOW_MS + 20_000), 100_000);
}

#[test]
fn expiration_date_matches_exp_claim() {
    let date = expiration_date(&full_token(1_700_000_000)).expect("date");
    assert_eq!(date.unix_timestamp(), 1_700_000_000);
}

#[test]
fn should_refresh_inside_lead_window() {
    let t = full_token(exp_in_ms(2 * 60_000));
    assert!(should_refresh_at(&t, 5, NOW_MS));
}

#[test]
fn should_not_refresh_outside_lead_window() {
    let t = full_token(exp_in_ms(10 * 60_000));
    assert!(!should_refresh_at(&t, 5, NOW_MS));
}

#[test]
fn should_not_refresh_once_expired() {
    let t = full_token(exp_in_ms(60_000));
    let later = NOW_MS + 61_000;
    assert!(is_expired_at(&t, later));
    assert!(!should_refresh_at(&t, 5, later));
}

#[test]
fn should_not_refresh_at_exact_threshold() {
    let t = full_token(exp_in_ms(5 * 60_000));
    assert!(!should_refresh_at(&t, 5, NOW_MS));
}

// =============================================================
// Debug info
// =============================================================

#[test]
fn debug_info_summarizes_valid_token() {
    let t = full_token(exp_in_ms(30 * 60_000));
    let info = debug_info_at(&t, NOW_MS);
    assert!(info.is_valid);
    assert!(!info.is_expired);
    assert_eq!(info.user_id.as_deref(), Some("user-42"));
    assert_eq!(info.time_until_expiry.as_deref(), Some("30 minutes"));
    assert!(info.expires_at.is_some());
}

#[test]
fn debug_info_marks_garbage_invalid_and_expired() {
    let info = debug_info_at("garbage", NOW_MS);
    assert!(!info.is_valid);
    assert!(info.is_expired);
    assert_eq!(info.expires_at, None);
}
