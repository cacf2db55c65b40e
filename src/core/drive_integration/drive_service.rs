use std::fmt;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::drive_models::ErrorBody;
use super::{AuthUrl, IntegrationStatus};
use crate::core::config::ApiConfig;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub const STATUS_PATH: &str = "/api/google-drive-integration/status";
pub const AUTH_URL_PATH: &str = "/api/google-drive-integration/oauth/url";
pub const DISCONNECT_PATH: &str = "/api/google-drive-integration/disconnect";

/// Errors surfaced by the Drive integration calls.
///
/// Token and transport failures are carried through untouched so callers see
/// exactly what the collaborator raised.
#[derive(Debug, Error)]
pub enum DriveIntegrationError {
    #[error(transparent)]
    Auth(BoxError),
    #[error(transparent)]
    Transport(BoxError),
    /// Non-2xx response. `message` is the backend's own message or `HTTP <status>`.
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Supplies the bearer token for each request. May suspend (e.g. while a
/// session refreshes) and may fail.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn get_auth_token(&self) -> Result<String, BoxError>;
}

#[async_trait]
impl TokenProvider for Box<dyn TokenProvider> {
    async fn get_auth_token(&self) -> Result<String, BoxError> {
        (**self).get_auth_token().await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpMethod::Get => write!(f, "GET"),
            HttpMethod::Post => write!(f, "POST"),
        }
    }
}

/// One outgoing request, already fully addressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
}

/// Raw response as seen by the service: status code plus unparsed body.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a single request and returns whatever came back. Errors here mean the
/// exchange itself failed, not that the server answered with an error status.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, BoxError>;
}

/// Thin client for the backend's Google Drive integration endpoints.
///
/// Holds no mutable state: concurrent calls are independent and each one asks
/// the token provider for a fresh token.
pub struct DriveIntegrationService<T: HttpTransport, P: TokenProvider> {
    config: ApiConfig,
    transport: T,
    tokens: P,
}

impl<T, P> DriveIntegrationService<T, P>
where
    T: HttpTransport,
    P: TokenProvider,
{
    pub fn new(config: ApiConfig, transport: T, tokens: P) -> Self {
        Self {
            config,
            transport,
            tokens,
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Current link state for the signed-in user.
    pub async fn get_status(&self) -> Result<IntegrationStatus, DriveIntegrationError> {
        let response = self.call(HttpMethod::Get, STATUS_PATH).await?;
        decode(&response)
    }

    /// URL of the Google OAuth consent screen for linking an account.
    pub async fn get_auth_url(&self) -> Result<AuthUrl, DriveIntegrationError> {
        let response = self.call(HttpMethod::Get, AUTH_URL_PATH).await?;
        decode(&response)
    }

    /// Unlink the Drive account. The response body is ignored.
    pub async fn disconnect(&self) -> Result<(), DriveIntegrationError> {
        self.call(HttpMethod::Post, DISCONNECT_PATH).await?;
        Ok(())
    }

    /// Fetch a token, send one request, and turn error statuses into `Api` errors.
    async fn call(
        &self,
        method: HttpMethod,
        path: &str,
    ) -> Result<ApiResponse, DriveIntegrationError> {
        let token = self
            .tokens
            .get_auth_token()
            .await
            .map_err(DriveIntegrationError::Auth)?;

        let request = ApiRequest {
            method,
            url: self.config.endpoint(path),
            headers: vec![
                ("Authorization".to_string(), format!("Bearer {}", token)),
                ("Content-Type".to_string(), "application/json".to_string()),
            ],
        };

        tracing::debug!(%method, path, "Calling Drive integration API");
        let response = self
            .transport
            .send(request)
            .await
            .map_err(DriveIntegrationError::Transport)?;

        if response.is_success() {
            return Ok(response);
        }

        let message = ErrorBody::parse(&response.body)
            .message()
            .unwrap_or_else(|| format!("HTTP {}", response.status));
        tracing::warn!(
            status = response.status,
            path,
            "Drive integration API returned an error"
        );

        Err(DriveIntegrationError::Api {
            status: response.status,
            message,
        })
    }
}

fn decode<D: DeserializeOwned>(response: &ApiResponse) -> Result<D, DriveIntegrationError> {
    Ok(serde_json::from_slice(&response.body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn header<'a>(request: &'a ApiRequest, name: &str) -> Option<&'a str> {
        request
            .headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Replays canned responses and records every request it receives.
    #[derive(Clone, Default)]
    struct FakeTransport {
        responses: Arc<Mutex<VecDeque<Result<ApiResponse, String>>>>,
        requests: Arc<Mutex<Vec<ApiRequest>>>,
    }

    impl FakeTransport {
        fn respond(&self, status: u16, body: &str) -> &Self {
            self.responses.lock().unwrap().push_back(Ok(ApiResponse {
                status,
                body: body.as_bytes().to_vec(),
            }));
            self
        }

        fn fail(&self, error: &str) -> &Self {
            self.responses
                .lock()
                .unwrap()
                .push_back(Err(error.to_string()));
            self
        }

        fn requests(&self) -> Vec<ApiRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HttpTransport for FakeTransport {
        async fn send(&self, request: ApiRequest) -> Result<ApiResponse, BoxError> {
            self.requests.lock().unwrap().push(request);
            match self.responses.lock().unwrap().pop_front() {
                Some(Ok(response)) => Ok(response),
                Some(Err(e)) => Err(e.into()),
                None => Err("no canned response".into()),
            }
        }
    }

    /// Hands out `token-1`, `token-2`, ... so tests can tell calls apart.
    #[derive(Default)]
    struct RotatingTokens {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TokenProvider for RotatingTokens {
        async fn get_auth_token(&self) -> Result<String, BoxError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(format!("token-{}", n))
        }
    }

    struct FailingTokens;

    #[async_trait]
    impl TokenProvider for FailingTokens {
        async fn get_auth_token(&self) -> Result<String, BoxError> {
            Err("session expired".into())
        }
    }

    fn service(
        transport: &FakeTransport,
    ) -> DriveIntegrationService<FakeTransport, RotatingTokens> {
        DriveIntegrationService::new(
            ApiConfig::new("https://api.example"),
            transport.clone(),
            RotatingTokens::default(),
        )
    }

    #[tokio::test]
    async fn test_get_status_connected() {
        let transport = FakeTransport::default();
        transport.respond(200, r#"{"connected":true,"email":"a@b.com"}"#);

        let status = service(&transport).get_status().await.unwrap();
        assert_eq!(
            status,
            IntegrationStatus {
                connected: true,
                email: Some("a@b.com".to_string()),
            }
        );

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, HttpMethod::Get);
        assert_eq!(
            requests[0].url,
            "https://api.example/api/google-drive-integration/status"
        );
        assert_eq!(header(&requests[0], "authorization"), Some("Bearer token-1"));
        assert_eq!(
            header(&requests[0], "Content-Type"),
            Some("application/json")
        );
    }

    #[tokio::test]
    async fn test_get_status_uses_backend_message() {
        let transport = FakeTransport::default();
        transport.respond(403, r#"{"message":"forbidden"}"#);

        let err = service(&transport).get_status().await.unwrap_err();
        assert_eq!(err.to_string(), "forbidden");
        assert!(matches!(err, DriveIntegrationError::Api { status: 403, .. }));
    }

    #[tokio::test]
    async fn test_get_status_unparsable_error_body() {
        let transport = FakeTransport::default();
        transport.respond(500, "Internal Server Error");

        let err = service(&transport).get_status().await.unwrap_err();
        assert_eq!(err.to_string(), "HTTP 500");
    }

    #[tokio::test]
    async fn test_error_body_without_message() {
        let transport = FakeTransport::default();
        transport.respond(404, r#"{"error":"not found"}"#);

        let err = service(&transport).get_auth_url().await.unwrap_err();
        assert_eq!(err.to_string(), "HTTP 404");
    }

    #[tokio::test]
    async fn test_get_auth_url() {
        let transport = FakeTransport::default();
        transport.respond(
            200,
            r#"{"url":"https://accounts.google.com/o/oauth2/v2/auth?client_id=abc"}"#,
        );

        let auth = service(&transport).get_auth_url().await.unwrap();
        assert_eq!(
            auth.url,
            "https://accounts.google.com/o/oauth2/v2/auth?client_id=abc"
        );
        assert_eq!(
            transport.requests()[0].url,
            "https://api.example/api/google-drive-integration/oauth/url"
        );
    }

    #[tokio::test]
    async fn test_disconnect_posts_once_and_ignores_body() {
        let transport = FakeTransport::default();
        transport.respond(200, "not json at all");

        service(&transport).disconnect().await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, HttpMethod::Post);
        assert_eq!(
            requests[0].url,
            "https://api.example/api/google-drive-integration/disconnect"
        );
    }

    #[tokio::test]
    async fn test_token_refreshed_per_call() {
        let transport = FakeTransport::default();
        transport
            .respond(200, r#"{"connected":false}"#)
            .respond(200, "");

        let service = service(&transport);
        service.get_status().await.unwrap();
        service.disconnect().await.unwrap();

        let requests = transport.requests();
        assert_eq!(header(&requests[0], "Authorization"), Some("Bearer token-1"));
        assert_eq!(header(&requests[1], "Authorization"), Some("Bearer token-2"));
    }

    #[tokio::test]
    async fn test_token_failure_propagates_without_request() {
        let transport = FakeTransport::default();
        let service = DriveIntegrationService::new(
            ApiConfig::new("https://api.example"),
            transport.clone(),
            FailingTokens,
        );

        let err = service.get_status().await.unwrap_err();
        assert!(matches!(err, DriveIntegrationError::Auth(_)));
        assert_eq!(err.to_string(), "session expired");
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_propagates() {
        let transport = FakeTransport::default();
        transport.fail("connection refused");

        let err = service(&transport).disconnect().await.unwrap_err();
        assert!(matches!(err, DriveIntegrationError::Transport(_)));
        assert_eq!(err.to_string(), "connection refused");
    }

    #[tokio::test]
    async fn test_success_body_with_wrong_shape() {
        let transport = FakeTransport::default();
        transport.respond(200, r#"{"connected":"yes"}"#);

        let err = service(&transport).get_status().await.unwrap_err();
        assert!(matches!(err, DriveIntegrationError::Decode(_)));
    }
}
