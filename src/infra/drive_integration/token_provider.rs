use std::path::PathBuf;

use async_trait::async_trait;

use crate::core::config::ConfigSource;
use crate::core::drive_integration::{BoxError, TokenProvider};

/// Bearer token given directly.
pub const TOKEN_VAR: &str = "DRIVE_LINK_TOKEN";
/// Path to a file holding the bearer token. Re-read on every call.
pub const TOKEN_FILE_VAR: &str = "DRIVE_LINK_TOKEN_FILE";

/// A fixed token, typically taken from `DRIVE_LINK_TOKEN`.
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn get_auth_token(&self) -> Result<String, BoxError> {
        if self.token.is_empty() {
            return Err(format!("{} is empty", TOKEN_VAR).into());
        }
        Ok(self.token.clone())
    }
}

/// Reads the token from a file each time one is needed, so whatever keeps the
/// session alive can rewrite the file between calls.
pub struct FileTokenProvider {
    path: PathBuf,
}

impl FileTokenProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TokenProvider for FileTokenProvider {
    async fn get_auth_token(&self) -> Result<String, BoxError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| format!("Failed to read token file {}: {}", self.path.display(), e))?;
        let token = raw.trim();
        if token.is_empty() {
            return Err(format!("Token file {} is empty", self.path.display()).into());
        }
        Ok(token.to_string())
    }
}

/// Used when no token is configured. Every call fails with a hint.
pub struct MissingTokenProvider;

#[async_trait]
impl TokenProvider for MissingTokenProvider {
    async fn get_auth_token(&self) -> Result<String, BoxError> {
        Err(format!("No auth token configured; set {} or {}", TOKEN_VAR, TOKEN_FILE_VAR).into())
    }
}

/// Pick a provider from configuration. `DRIVE_LINK_TOKEN` wins over the file.
pub fn from_config(source: &dyn ConfigSource) -> Box<dyn TokenProvider> {
    if let Some(token) = source.get(TOKEN_VAR).filter(|t| !t.is_empty()) {
        tracing::debug!("Using auth token from {}", TOKEN_VAR);
        return Box::new(StaticTokenProvider::new(token));
    }
    if let Some(path) = source.get(TOKEN_FILE_VAR).filter(|p| !p.is_empty()) {
        tracing::debug!(path = %path, "Using auth token file");
        return Box::new(FileTokenProvider::new(path));
    }
    tracing::warn!("No auth token configured; requests will fail");
    Box::new(MissingTokenProvider)
}
