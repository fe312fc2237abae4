//! Subcommand definitions and their execution against the auth API.
//!
//! SYSTEM CONTEXT
//! ==============
//! Each invocation builds one [`AuthApi`] over a [`ReqwestTransport`] and
//! the [`FileStorage`] token file, runs a single command and returns its
//! result as JSON for `main` to print. Sign-in and sign-out go through
//! [`AuthSession`] so the `auth-storage` snapshot stays in step with the
//! tokens, exactly as in the browser.

#[cfg(test)]
#[path = "commands_test.rs"]
mod commands_test;

use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use hotelsocial_session::types::{
    AvatarUpload, ForgotPasswordPayload, LoginPayload, RegisterPayload, ResetPasswordPayload,
    SendConfirmEmailPayload, UpdateProfilePayload, UserListQuery,
};
use hotelsocial_session::{ApiConfig, AuthApi, AuthSession, TokenStore, claims};
use serde_json::{Value, json};

use crate::error::CliError;
use crate::file_storage::FileStorage;
use crate::navigator::TerminalNavigator;
use crate::transport::ReqwestTransport;

pub type CliApi = AuthApi<ReqwestTransport, FileStorage>;

#[derive(Debug, Clone)]
pub struct CliContext {
    pub config: ApiConfig,
    pub storage: FileStorage,
}

impl CliContext {
    fn api(&self) -> Result<CliApi, CliError> {
        let transport = ReqwestTransport::new(self.config.clone())?;
        Ok(AuthApi::new(
            transport,
            TokenStore::new(self.storage.clone()),
            TerminalNavigator,
            &self.config,
        ))
    }

    fn session(&self) -> AuthSession<FileStorage> {
        let mut session = AuthSession::new(self.storage.clone());
        session.initialize();
        session
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a customer account.
    Register(RegisterArgs),
    /// Sign in and store the token pair.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "HOTELSOCIAL_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored tokens and user.
    Logout,
    /// Fetch the signed-in user's profile.
    Me,
    /// Refresh the token pair when it is close to expiry.
    Refresh {
        /// Refresh even if the access token is not yet due.
        #[arg(long, default_value_t = false)]
        force: bool,
    },
    Token(TokenCommand),
    Users(UsersCommand),
    Email(EmailCommand),
    Password(PasswordCommand),
    Profile(ProfileCommand),
    /// Print the URL that starts the Google sign-in handoff.
    GoogleUrl,
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    #[arg(long)]
    full_name: String,
    #[arg(long)]
    email: String,
    #[arg(long, env = "HOTELSOCIAL_PASSWORD", hide_env_values = true)]
    password: String,
    #[arg(long)]
    phone_number: String,
}

#[derive(Args, Debug)]
pub struct TokenCommand {
    #[command(subcommand)]
    command: TokenSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum TokenSubcommand {
    /// Decode a token's claims and expiry without verifying it.
    Inspect {
        /// Token to inspect; defaults to the stored access token.
        #[arg(long)]
        token: Option<String>,
        /// Inspect the stored refresh token instead.
        #[arg(long, default_value_t = false, conflicts_with = "token")]
        refresh: bool,
    },
}

#[derive(Args, Debug)]
pub struct UsersCommand {
    #[command(subcommand)]
    command: UsersSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum UsersSubcommand {
    List(ListUsersArgs),
    Get { user_id: String },
}

#[derive(Args, Debug, Default)]
pub struct ListUsersArgs {
    #[arg(long)]
    page: Option<u32>,
    #[arg(long)]
    page_size: Option<u32>,
    #[arg(long)]
    search: Option<String>,
    #[arg(long)]
    active: Option<bool>,
    #[arg(long)]
    gender: Option<String>,
    #[arg(long)]
    role: Option<String>,
    #[arg(long)]
    hotel_id: Option<String>,
}

impl ListUsersArgs {
    fn query(&self) -> UserListQuery {
        UserListQuery {
            page_number: self.page,
            page_size: self.page_size,
            search_term: self.search.clone(),
            is_active: self.active,
            gender: self.gender.clone(),
            role: self.role.clone(),
            hotel_id: self.hotel_id.clone(),
        }
    }
}

#[derive(Args, Debug)]
pub struct EmailCommand {
    #[command(subcommand)]
    command: EmailSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum EmailSubcommand {
    /// Ask the API to (re)send the confirmation email.
    SendConfirm {
        #[arg(long)]
        email: String,
        /// Front-end origin the emailed link should point at.
        #[arg(long)]
        client_url: String,
    },
    /// Confirm an address with the id and token from the emailed link.
    Confirm {
        #[arg(long)]
        user_id: String,
        #[arg(long)]
        token: String,
    },
}

#[derive(Args, Debug)]
pub struct PasswordCommand {
    #[command(subcommand)]
    command: PasswordSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum PasswordSubcommand {
    Forgot {
        #[arg(long)]
        email: String,
        #[arg(long)]
        client_url: String,
    },
    Reset {
        #[arg(long)]
        email: String,
        #[arg(long)]
        token: String,
        #[arg(long, env = "HOTELSOCIAL_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[derive(Args, Debug)]
pub struct ProfileCommand {
    #[command(subcommand)]
    command: ProfileSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ProfileSubcommand {
    /// Update contact details of the signed-in user.
    Update {
        #[arg(long)]
        gender: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        phone_number: Option<String>,
    },
    /// Upload a new avatar image.
    Avatar {
        file: PathBuf,
        /// Keep the previous avatar file on the server.
        #[arg(long, default_value_t = false)]
        keep_old: bool,
    },
}

/// MIME type for an avatar file, from its extension.
pub fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

fn read_avatar(file: &Path, keep_old: bool) -> Result<AvatarUpload, CliError> {
    let bytes = std::fs::read(file).map_err(|source| CliError::ReadFile {
        path: file.display().to_string(),
        source,
    })?;
    let file_name = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "avatar".to_owned());
    Ok(AvatarUpload {
        file_name,
        content_type: content_type_for(file).to_owned(),
        bytes,
        delete_old: !keep_old,
    })
}

/// Run one command and return what should be printed.
pub async fn execute(ctx: &CliContext, command: Command) -> Result<Value, CliError> {
    let api = ctx.api()?;
    match command {
        Command::Register(args) => {
            let payload = RegisterPayload {
                full_name: args.full_name,
                email: args.email,
                confirm_password: args.password.clone(),
                password: args.password,
                phone_number: args.phone_number,
            };
            Ok(serde_json::to_value(api.register(&payload).await?)?)
        }
        Command::Login { email, password } => {
            let signed_in = api.sign_in(&LoginPayload { email, password }).await?;
            let user = serde_json::to_value(&signed_in.user)?;
            let mut session = ctx.session();
            session.apply_sign_in(signed_in);
            tracing::info!(store = %ctx.storage.path().display(), "signed in");
            Ok(user)
        }
        Command::Logout => {
            let mut session = ctx.session();
            session.logout();
            Ok(json!({ "signedOut": true }))
        }
        Command::Me => Ok(serde_json::to_value(api.current_user().await?)?),
        Command::Refresh { force } => refresh(ctx, &api, force).await,
        Command::Token(token) => inspect_token(&api, token.command),
        Command::Users(users) => match users.command {
            UsersSubcommand::List(args) => {
                Ok(serde_json::to_value(api.list_users(&args.query()).await?)?)
            }
            UsersSubcommand::Get { user_id } => {
                Ok(serde_json::to_value(api.user_by_id(&user_id).await?)?)
            }
        },
        Command::Email(email) => {
            let ack = match email.command {
                EmailSubcommand::SendConfirm { email, client_url } => {
                    api.send_confirm_email(&SendConfirmEmailPayload { email, client_url })
                        .await?
                }
                EmailSubcommand::Confirm { user_id, token } => {
                    api.confirm_email(&user_id, &token).await?
                }
            };
            Ok(serde_json::to_value(ack)?)
        }
        Command::Password(password) => {
            let ack = match password.command {
                PasswordSubcommand::Forgot { email, client_url } => {
                    api.forgot_password(&ForgotPasswordPayload { email, client_url })
                        .await?
                }
                PasswordSubcommand::Reset {
                    email,
                    token,
                    password,
                } => {
                    let payload = ResetPasswordPayload {
                        confirm_password: password.clone(),
                        password,
                        email,
                        token,
                    };
                    api.reset_password(&payload).await?
                }
            };
            Ok(serde_json::to_value(ack)?)
        }
        Command::Profile(profile) => match profile.command {
            ProfileSubcommand::Update {
                gender,
                address,
                phone_number,
            } => {
                let user_id = api
                    .tokens()
                    .access_token()
                    .and_then(|token| claims::subject_id(&token))
                    .ok_or(CliError::NotSignedIn)?;
                let payload = UpdateProfilePayload {
                    user_id,
                    gender,
                    address,
                    phone_number,
                };
                Ok(serde_json::to_value(api.update_profile(&payload).await?)?)
            }
            ProfileSubcommand::Avatar { file, keep_old } => {
                let upload = read_avatar(&file, keep_old)?;
                let url = api.upload_avatar(&upload).await?;
                Ok(json!({ "avatar": url }))
            }
        },
        Command::GoogleUrl => Ok(Value::String(api.google_login_url())),
    }
}

async fn refresh(ctx: &CliContext, api: &CliApi, force: bool) -> Result<Value, CliError> {
    let refreshed = if force {
        let current = api.tokens().tokens().ok_or(CliError::NotSignedIn)?;
        Some(
            api.refresh_token(&current.access_token, &current.refresh_token)
                .await?,
        )
    } else {
        if !api.tokens().has_tokens() {
            return Err(CliError::NotSignedIn);
        }
        api.refresh_if_needed(ctx.config.refresh_lead_minutes).await?
    };

    let access = api.tokens().access_token().ok_or(CliError::NotSignedIn)?;
    Ok(json!({
        "refreshed": refreshed.is_some(),
        "accessToken": claims::debug_info(&access),
    }))
}

fn inspect_token(api: &CliApi, command: TokenSubcommand) -> Result<Value, CliError> {
    let TokenSubcommand::Inspect { token, refresh } = command;
    let token = match token {
        Some(token) => token,
        None if refresh => api.tokens().refresh_token().ok_or(CliError::MissingToken)?,
        None => api.tokens().access_token().ok_or(CliError::MissingToken)?,
    };
    Ok(serde_json::to_value(claims::debug_info(&token))?)
}
