//! `/api/Auth` request layer.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every call builds an [`HttpRequest`] with a path relative to the API
//! origin, runs it through the [`MiddlewareChain`], hands it to the
//! [`Transport`] and unwraps the `{ success, message, data, errors }`
//! envelope. `login` and `refresh_token` persist the returned pair before
//! returning, so the token store is current even if no state holder is
//! listening.
//!
//! ERROR HANDLING
//! ==============
//! Non-2xx statuses become [`ApiError::Status`] carrying the parsed error
//! body when there is one. A 2xx envelope with `success: false` becomes
//! [`ApiError::Rejected`]. Nothing is retried.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::de::DeserializeOwned;

use crate::claims;
use crate::clock::now_ms;
use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, RequestBody, Transport};
use crate::middleware::{MiddlewareChain, Navigator};
use crate::storage::Storage;
use crate::store::TokenStore;
use crate::types::{
    Ack, ApiResponse, AuthUser, AvatarUpload, ForgotPasswordPayload, LoginData, LoginPayload,
    PaginatedResponse, RefreshPayload, RegisterPayload, ResetPasswordPayload,
    SendConfirmEmailPayload, TokenPair, UpdateProfilePayload, UserListQuery, UserProfile,
};

/// Path prefix of every auth endpoint.
pub const AUTH_BASE: &str = "/api/Auth";

fn auth_path(endpoint: &str) -> String {
    format!("{AUTH_BASE}{endpoint}")
}

/// Unreserved characters stay literal in a path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

fn path_segment(value: &str) -> String {
    utf8_percent_encode(value, PATH_SEGMENT).to_string()
}

impl<T> ApiResponse<T> {
    /// The envelope itself, or [`ApiError::Rejected`] when `success` is false.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Rejected`] with the server's message and errors.
    pub fn accepted(self) -> Result<Self, ApiError> {
        if self.success {
            Ok(self)
        } else {
            Err(ApiError::Rejected {
                message: self.message,
                errors: self.errors,
            })
        }
    }

    /// The `data` payload of an accepted envelope.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Rejected`] for `success: false` and
    /// [`ApiError::Decode`] when an accepted envelope carries no data.
    pub fn into_data(self) -> Result<T, ApiError> {
        self.accepted()?
            .data
            .ok_or_else(|| ApiError::Decode("response envelope has no data".to_owned()))
    }
}

/// Result of a completed sign-in: what the state holder needs in one value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedIn {
    pub tokens: TokenPair,
    pub user: AuthUser,
}

/// Client for the `/api/Auth` endpoints.
pub struct AuthApi<T, S> {
    transport: T,
    tokens: TokenStore<S>,
    middleware: MiddlewareChain,
    config: ApiConfig,
}

impl<T, S> AuthApi<T, S>
where
    T: Transport,
    S: Storage + Clone + 'static,
{
    /// Client with the standard middleware chain.
    pub fn new<N: Navigator + 'static>(
        transport: T,
        tokens: TokenStore<S>,
        navigator: N,
        config: &ApiConfig,
    ) -> Self {
        let middleware = MiddlewareChain::standard(tokens.clone(), navigator, &config.signin_path);
        Self::with_middleware(transport, tokens, middleware, config)
    }

    /// Client with a caller-assembled middleware chain.
    pub fn with_middleware(
        transport: T,
        tokens: TokenStore<S>,
        middleware: MiddlewareChain,
        config: &ApiConfig,
    ) -> Self {
        Self {
            transport,
            tokens,
            middleware,
            config: config.clone(),
        }
    }

    pub fn tokens(&self) -> &TokenStore<S> {
        &self.tokens
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    async fn execute<R: DeserializeOwned>(
        &self,
        mut request: HttpRequest,
    ) -> Result<ApiResponse<R>, ApiError> {
        self.middleware.apply_request(&mut request);
        let response = match self.transport.send(&request).await {
            Ok(response) => response,
            Err(e) => {
                self.middleware.apply_failure(&request, &e);
                return Err(e);
            }
        };
        self.middleware.apply_response(&request, &response);

        if !response.is_success() {
            return Err(ApiError::Status {
                status: response.status,
                body: serde_json::from_str(&response.body).ok(),
            });
        }
        serde_json::from_str(&response.body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn ack(&self, request: HttpRequest) -> Result<Ack, ApiError> {
        self.execute::<serde_json::Value>(request).await?.accepted()
    }

    async fn data<R: DeserializeOwned>(&self, request: HttpRequest) -> Result<R, ApiError> {
        self.execute::<R>(request).await?.into_data()
    }

    /// `POST /register-customer`.
    ///
    /// # Errors
    ///
    /// Propagates transport, status and rejection errors.
    pub async fn register(&self, payload: &RegisterPayload) -> Result<Ack, ApiError> {
        self.ack(HttpRequest::post(auth_path("/register-customer")).json(payload)?)
            .await
    }

    /// `POST /Login`; persists the returned pair.
    ///
    /// # Errors
    ///
    /// Propagates transport, status and rejection errors. Tokens are only
    /// written on success.
    pub async fn login(&self, payload: &LoginPayload) -> Result<TokenPair, ApiError> {
        let data: LoginData = self
            .data(HttpRequest::post(auth_path("/Login")).json(payload)?)
            .await?;
        let tokens = TokenPair::from(data);
        self.tokens.save_tokens(&tokens);
        log::info!("login succeeded, tokens saved");
        Ok(tokens)
    }

    /// `GET /me`.
    ///
    /// # Errors
    ///
    /// Propagates transport, status and rejection errors.
    pub async fn current_user(&self) -> Result<UserProfile, ApiError> {
        self.data(HttpRequest::get(auth_path("/me"))).await
    }

    /// `POST /Refreshtoken`; persists the returned pair.
    ///
    /// # Errors
    ///
    /// Propagates transport, status and rejection errors.
    pub async fn refresh_token(
        &self,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<TokenPair, ApiError> {
        let payload = RefreshPayload {
            access_token: access_token.to_owned(),
            refresh_token: refresh_token.to_owned(),
        };
        let data: LoginData = self
            .data(HttpRequest::post(auth_path("/Refreshtoken")).json(&payload)?)
            .await?;
        let tokens = TokenPair::from(data);
        self.tokens.save_tokens(&tokens);
        log::info!("tokens refreshed");
        Ok(tokens)
    }

    /// Local sign-out. The server keeps no session to end.
    pub fn logout(&self) {
        self.tokens.clear_tokens();
        log::info!("logged out, tokens cleared");
    }

    /// `POST /send-confirmemail`.
    ///
    /// # Errors
    ///
    /// Propagates transport, status and rejection errors.
    pub async fn send_confirm_email(
        &self,
        payload: &SendConfirmEmailPayload,
    ) -> Result<Ack, ApiError> {
        self.ack(HttpRequest::post(auth_path("/send-confirmemail")).json(payload)?)
            .await
    }

    /// `GET /email-confirmation?userId=..&token=..`.
    ///
    /// # Errors
    ///
    /// Propagates transport, status and rejection errors.
    pub async fn confirm_email(&self, user_id: &str, token: &str) -> Result<Ack, ApiError> {
        let request = HttpRequest::get(auth_path("/email-confirmation")).query([
            ("userId".to_owned(), user_id.to_owned()),
            ("token".to_owned(), token.to_owned()),
        ]);
        self.ack(request).await
    }

    /// Absolute URL that starts the Google login handoff. The browser
    /// navigates there; it is never fetched.
    #[must_use]
    pub fn google_login_url(&self) -> String {
        self.config.url(&auth_path("/google-login"))
    }

    /// `POST /forgot-password`.
    ///
    /// # Errors
    ///
    /// Propagates transport, status and rejection errors.
    pub async fn forgot_password(&self, payload: &ForgotPasswordPayload) -> Result<Ack, ApiError> {
        self.ack(HttpRequest::post(auth_path("/forgot-password")).json(payload)?)
            .await
    }

    /// `POST /resetpassword`.
    ///
    /// # Errors
    ///
    /// Propagates transport, status and rejection errors.
    pub async fn reset_password(&self, payload: &ResetPasswordPayload) -> Result<Ack, ApiError> {
        self.ack(HttpRequest::post(auth_path("/resetpassword")).json(payload)?)
            .await
    }

    /// `PUT /profile`.
    ///
    /// # Errors
    ///
    /// Propagates transport, status and rejection errors.
    pub async fn update_profile(&self, payload: &UpdateProfilePayload) -> Result<Ack, ApiError> {
        self.ack(HttpRequest::put(auth_path("/profile")).json(payload)?)
            .await
    }

    /// `POST /upload-avatar?deleteOld=..` as multipart field `file`. Returns
    /// the stored avatar URL.
    ///
    /// # Errors
    ///
    /// Propagates transport, status and rejection errors.
    pub async fn upload_avatar(&self, upload: &AvatarUpload) -> Result<String, ApiError> {
        let mut request = HttpRequest::post(auth_path("/upload-avatar"))
            .query([("deleteOld".to_owned(), upload.delete_old.to_string())]);
        request.body = RequestBody::Multipart {
            field: "file".to_owned(),
            file_name: upload.file_name.clone(),
            content_type: upload.content_type.clone(),
            bytes: upload.bytes.clone(),
        };
        self.data(request).await
    }

    /// `GET /{userId}`.
    ///
    /// # Errors
    ///
    /// Propagates transport, status and rejection errors.
    pub async fn user_by_id(&self, user_id: &str) -> Result<UserProfile, ApiError> {
        self.data(HttpRequest::get(auth_path(&format!("/{}", path_segment(user_id)))))
            .await
    }

    /// `GET /` with paging and filter query parameters.
    ///
    /// # Errors
    ///
    /// Propagates transport, status and rejection errors.
    pub async fn list_users(
        &self,
        query: &UserListQuery,
    ) -> Result<PaginatedResponse<UserProfile>, ApiError> {
        self.data(HttpRequest::get(auth_path("/")).query(query.to_pairs()))
            .await
    }

    /// Login, gate on the token's identity claims, then fetch the profile.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidToken`] (and clears the just-saved tokens)
    /// when the access token lacks subject id, email or role. Otherwise
    /// propagates errors from `login` and `current_user`.
    pub async fn sign_in(&self, payload: &LoginPayload) -> Result<SignedIn, ApiError> {
        let tokens = self.login(payload).await?;
        let Some(identity) = claims::user_info(&tokens.access_token) else {
            self.tokens.clear_tokens();
            return Err(ApiError::InvalidToken);
        };
        let profile = self.current_user().await?;
        Ok(SignedIn {
            tokens,
            user: AuthUser::from_parts(profile, identity),
        })
    }

    /// Refresh the stored pair if the access token is inside the refresh
    /// window at `now_ms`. Returns the new pair when a refresh happened.
    ///
    /// # Errors
    ///
    /// Propagates errors from `refresh_token`.
    pub async fn refresh_if_needed_at(
        &self,
        lead_minutes: u32,
        now_ms: i64,
    ) -> Result<Option<TokenPair>, ApiError> {
        let Some(current) = self.tokens.tokens() else {
            return Ok(None);
        };
        if !claims::should_refresh_at(&current.access_token, lead_minutes, now_ms) {
            return Ok(None);
        }
        log::debug!("access token inside refresh window, refreshing");
        self.refresh_token(&current.access_token, &current.refresh_token)
            .await
            .map(Some)
    }

    /// [`refresh_if_needed_at`](Self::refresh_if_needed_at) at the current time.
    ///
    /// # Errors
    ///
    /// Propagates errors from `refresh_token`.
    pub async fn refresh_if_needed(&self, lead_minutes: u32) -> Result<Option<TokenPair>, ApiError> {
        self.refresh_if_needed_at(lead_minutes, now_ms()).await
    }
}
