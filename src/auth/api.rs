//! Authentication API collaborator

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::models::{AuthResponse, LoginRequest, RefreshRequest, RegisterRequest};
use crate::config::ApiConfig;
use crate::error::Result;

/// A non-2xx response, or a transport failure (status 0)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiFailure {
    pub status: u16,
    pub message: Option<String>,
}

impl ApiFailure {
    pub fn new(status: u16, message: Option<String>) -> Self {
        Self { status, message }
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiFailure>;

/// The `/auth` endpoints of the backend
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn register(&self, request: &RegisterRequest) -> ApiResult<AuthResponse>;
    async fn login(&self, request: &LoginRequest) -> ApiResult<AuthResponse>;
    async fn refresh(&self, request: &RefreshRequest) -> ApiResult<AuthResponse>;
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// `AuthApi` over HTTP
#[derive(Debug, Clone)]
pub struct HttpAuthApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAuthApi {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self::with_client(client, &config.base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: format!("{}/auth", base_url.trim_end_matches('/')),
        }
    }

    async fn post<B, T>(&self, path: &str, body: &B, bearer: Option<&str>) -> ApiResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, path);
        debug!("POST {}", url);

        let mut builder = self.client.post(&url).json(body);
        if let Some(token) = bearer {
            builder = builder.bearer_auth(token);
        }
        let response = builder
            .send()
            .await
            .map_err(|e| ApiFailure::new(e.status().map(|s| s.as_u16()).unwrap_or(0), None))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|b| b.message);
            return Err(ApiFailure::new(status.as_u16(), message));
        }

        response
            .json::<T>()
            .await
            .map_err(|_| ApiFailure::new(status.as_u16(), Some("Malformed authentication response".to_string())))
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn register(&self, request: &RegisterRequest) -> ApiResult<AuthResponse> {
        self.post("register", request, None).await
    }

    async fn login(&self, request: &LoginRequest) -> ApiResult<AuthResponse> {
        self.post("login", request, None).await
    }

    async fn refresh(&self, request: &RefreshRequest) -> ApiResult<AuthResponse> {
        // The token being exchanged also authorizes the call
        self.post("refresh", request, Some(&request.token)).await
    }
}
