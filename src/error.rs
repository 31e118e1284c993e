// Error taxonomy for a deploy run.
// The first four variants are reported by the CLI with a message and exit
// code 1. Everything else is a transport or parsing failure and propagates
// out of `main`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeployError {
    /// No API token in the environment or the wrangler config.
    #[error("Could not find CLOUDFLARE_API_TOKEN")]
    MissingToken,

    /// No account id on the command line, in the environment or in the config.
    #[error("Could not find CLOUDFLARE_ACCOUNT_ID")]
    MissingAccountId,

    #[error("Could not find worker script at {}", path.display())]
    ScriptNotFound { path: PathBuf },

    /// Upload answered with something other than 200/201.
    #[error("Upload failed: {status}")]
    UploadRejected { status: u16, body: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid API token: {0}")]
    InvalidToken(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Invalid JSON in response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DeployError {
    /// Whether the CLI reports this error itself instead of propagating it.
    pub fn is_handled(&self) -> bool {
        matches!(
            self,
            DeployError::MissingToken
                | DeployError::MissingAccountId
                | DeployError::ScriptNotFound { .. }
                | DeployError::UploadRejected { .. }
        )
    }
}
