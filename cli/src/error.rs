use hotelsocial_session::ApiError;
use hotelsocial_session::error::user_message;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("not signed in; run `hotelsocial login` first")]
    NotSignedIn,
    #[error("no token to inspect; pass --token or sign in first")]
    MissingToken,
    #[error("http client setup failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{}", user_message(.0))]
    Api(#[from] ApiError),
    #[error("could not read {path}: {source}")]
    ReadFile {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}
