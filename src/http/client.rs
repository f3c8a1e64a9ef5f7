//! Token stamping and the global 401/403 policy

use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::auth::{SessionManager, UserSession};
use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::routing::{Navigator, Route};

/// What the client did in response to an error status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusReaction {
    None,
    /// 401: session cleared, sent to login
    LoggedOut,
    /// 403: sent to forbidden
    Forbidden,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// HTTP client that stamps every request with the current bearer token
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionManager>,
    navigator: Arc<Navigator>,
}

impl ApiClient {
    pub fn new(
        config: &ApiConfig,
        session: Arc<SessionManager>,
        navigator: Arc<Navigator>,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self::with_client(http, &config.base_url, session, navigator))
    }

    pub fn with_client(
        http: reqwest::Client,
        base_url: &str,
        session: Arc<SessionManager>,
        navigator: Arc<Navigator>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
            navigator,
        }
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    pub fn navigator(&self) -> &Arc<Navigator> {
        &self.navigator
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Value of the Authorization header for the current session
    pub fn authorization(&self) -> Option<String> {
        self.session.token().map(|t| format!("Bearer {}", t))
    }

    /// Start a request, stamped with the bearer token when one is held
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Apply the cross-cutting reaction to an error status
    pub fn react_to_status(&self, status: u16) -> StatusReaction {
        match status {
            401 => {
                warn!("Received 401, clearing session");
                self.session.logout();
                self.navigator.navigate(Route::Login.path());
                StatusReaction::LoggedOut
            }
            403 => {
                warn!("Received 403, access denied");
                self.navigator.navigate(Route::Forbidden.path());
                StatusReaction::Forbidden
            }
            _ => StatusReaction::None,
        }
    }

    /// Refresh the session token; a 401 or 403 gets the same reaction as any other call
    pub async fn refresh_session(&self) -> Result<UserSession> {
        let result = self.session.refresh_token().await;
        if let Err(Error::Auth(e)) = &result {
            self.react_to_status(e.status);
        }
        result
    }

    /// Send and turn non-2xx responses into errors, after reacting to them
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await?;
        let status = response.status();
        debug!("{} {}", status.as_u16(), response.url().path());
        if status.is_success() {
            return Ok(response);
        }

        let code = status.as_u16();
        self.react_to_status(code);
        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|b| b.message);
        Err(Error::Status {
            status: code,
            message,
        })
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send(self.request(Method::GET, path)).await?;
        Ok(response.json().await?)
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(self.request(Method::POST, path).json(body)).await?;
        Ok(response.json().await?)
    }

    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(self.request(Method::PUT, path).json(body)).await?;
        Ok(response.json().await?)
    }

    pub async fn post_text(&self, path: &str) -> Result<String> {
        let response = self
            .send(self.request(Method::POST, path).json(&serde_json::json!({})))
            .await?;
        Ok(response.text().await?)
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        self.send(self.request(Method::DELETE, path)).await?;
        Ok(())
    }

    pub async fn get_bytes(&self, path: &str) -> Result<Vec<u8>> {
        let response = self.send(self.request(Method::GET, path)).await?;
        Ok(response.bytes().await?.to_vec())
    }

    pub async fn post_bytes<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Vec<u8>> {
        let response = self.send(self.request(Method::POST, path).json(body)).await?;
        Ok(response.bytes().await?.to_vec())
    }
}
