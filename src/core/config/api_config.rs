use std::collections::HashMap;

/// Environment variables consulted for the backend URL, highest priority first.
pub const BASE_URL_VARS: [&str; 3] = ["VITE_API_BASE_URL", "VITE_API_URL", "VITE_BACKEND_URL"];

/// Used when none of [`BASE_URL_VARS`] is set.
pub const FALLBACK_BASE_URL: &str = "http://localhost:8080";

/// Read-only view over named configuration values.
///
/// The binary reads the process environment; tests hand in a fixed map so they
/// never have to touch real environment variables.
pub trait ConfigSource {
    fn get(&self, name: &str) -> Option<String>;
}

/// The process environment (after `.env` has been loaded).
pub struct ProcessEnv;

impl ConfigSource for ProcessEnv {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl ConfigSource for HashMap<String, String> {
    fn get(&self, name: &str) -> Option<String> {
        HashMap::get(self, name).cloned()
    }
}

/// Immutable client configuration, resolved once at startup and passed into
/// the services that need it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
}

impl ApiConfig {
    /// Build a config from an explicit URL. Trailing slashes are stripped and an
    /// empty value falls back to [`FALLBACK_BASE_URL`].
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: normalize(base_url).unwrap_or_else(|| FALLBACK_BASE_URL.to_string()),
        }
    }

    /// Pick the first non-empty candidate from [`BASE_URL_VARS`].
    ///
    /// Always logs the chosen URL. With `dev_mode` set it also logs what each
    /// candidate variable held, so a misconfigured deployment is easy to spot.
    pub fn resolve(source: &dyn ConfigSource, dev_mode: bool) -> Self {
        let candidates: Vec<Option<String>> =
            BASE_URL_VARS.iter().map(|name| source.get(name)).collect();

        let chosen = candidates
            .iter()
            .flatten()
            .find(|value| normalize(value).is_some());
        let config = Self::new(chosen.map(String::as_str).unwrap_or(FALLBACK_BASE_URL));

        tracing::info!(base_url = %config.base_url, "Using API base URL");
        if dev_mode {
            tracing::info!(
                VITE_API_BASE_URL = raw_or_unset(&candidates[0]),
                VITE_API_URL = raw_or_unset(&candidates[1]),
                VITE_BACKEND_URL = raw_or_unset(&candidates[2]),
                "API environment variables"
            );
        }

        config
    }

    /// Replace the base URL with an explicit override. Empty overrides are ignored.
    pub fn with_override(self, base_url: Option<&str>) -> Self {
        match base_url.and_then(normalize) {
            Some(base_url) => {
                tracing::info!(base_url = %base_url, "Base URL overridden");
                Self { base_url }
            }
            None => self,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join a fixed, `/`-prefixed API path onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

// A value made only of slashes counts as unset.
fn normalize(raw: &str) -> Option<String> {
    let trimmed = raw.trim_end_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_string())
}

fn raw_or_unset(value: &Option<String>) -> &str {
    match value.as_deref() {
        Some(v) if !v.is_empty() => v,
        _ => "not set",
    }
}
