//! Wire DTOs for the `/api/Auth` contract and session-level models.
//!
//! DESIGN
//! ======
//! Field names follow the server's camelCase JSON so serde round-trips stay
//! lossless; optional server fields default instead of failing the decode.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

use crate::claims::TokenIdentity;

/// Access/refresh credential pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl TokenPair {
    #[must_use]
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}

/// Response envelope shared by every endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub timestamp: String,
}

/// Envelope for endpoints whose payload the client does not inspect.
pub type Ack = ApiResponse<serde_json::Value>;

/// Error body as returned alongside non-2xx statuses.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub errors: Vec<String>,
}

/// Page of results from a list endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub page_number: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub total_count: u64,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

/// Credentials posted to `/Login`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

/// Sign-up form posted to `/register-customer`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub phone_number: String,
}

/// Token pair as returned by `/Login` and `/Refreshtoken`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    pub token: String,
    pub refresh_token: String,
}

impl From<LoginData> for TokenPair {
    fn from(data: LoginData) -> Self {
        Self::new(data.token, data.refresh_token)
    }
}

/// Body of `/Refreshtoken`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshPayload {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendConfirmEmailPayload {
    pub email: String,
    pub client_url: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordPayload {
    pub email: String,
    pub client_url: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordPayload {
    pub password: String,
    pub confirm_password: String,
    pub email: String,
    pub token: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfilePayload {
    pub user_id: String,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
}

/// File sent to `/upload-avatar`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AvatarUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
    /// Ask the server to delete the previous avatar file.
    pub delete_old: bool,
}

/// Filters for the paged user list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserListQuery {
    pub page_number: Option<u32>,
    pub page_size: Option<u32>,
    pub search_term: Option<String>,
    pub is_active: Option<bool>,
    pub gender: Option<String>,
    pub role: Option<String>,
    pub hotel_id: Option<String>,
}

impl UserListQuery {
    /// Query pairs using the server's PascalCase parameter names. Unset
    /// filters are omitted.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        let mut push = |name: &str, value: Option<String>| {
            if let Some(value) = value {
                pairs.push((name.to_owned(), value));
            }
        };
        push("PageNumber", self.page_number.map(|n| n.to_string()));
        push("PageSize", self.page_size.map(|n| n.to_string()));
        push("SearchTerm", self.search_term.clone());
        push("IsActive", self.is_active.map(|b| b.to_string()));
        push("Gender", self.gender.clone());
        push("Role", self.role.clone());
        push("HotelId", self.hotel_id.clone());
        pairs
    }
}

/// Profile as returned by `/me` and `/{userId}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub id: Option<String>,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub avatar: Option<String>,
    pub email: String,
    pub email_confirmed: bool,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub gender: Option<String>,
}

/// The signed-in user: server profile merged with identity from the token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub subject_id: String,
    pub role: String,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub avatar: Option<String>,
    pub email: String,
    pub email_confirmed: bool,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub gender: Option<String>,
}

impl AuthUser {
    /// Merge a fetched profile with identity decoded from the access token.
    /// The token's email wins when the profile omits one.
    #[must_use]
    pub fn from_parts(profile: UserProfile, identity: TokenIdentity) -> Self {
        let email = if profile.email.is_empty() {
            identity.email
        } else {
            profile.email
        };
        Self {
            subject_id: identity.subject_id,
            role: identity.role,
            username: profile.username,
            full_name: profile.full_name,
            avatar: profile.avatar,
            email,
            email_confirmed: profile.email_confirmed,
            phone_number: profile.phone_number,
            address: profile.address,
            gender: profile.gender,
        }
    }

    /// Name to greet the user with.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .or(self.username.as_deref())
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.email)
    }

    /// Whether the user holds the administrator role (case-insensitive).
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role.eq_ignore_ascii_case("admin")
    }
}
