//! Session acquisition for session-requiring backends.
//!
//! The gateway never stores sessions: each one lives exactly as long as
//! the provider instance it was acquired for. The credential used to
//! acquire them is held in a [`CredentialHandle`] shared with whatever
//! refreshes it; the gateway only reads it.

use std::fmt;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use super::traits::SessionProvider;
use crate::{HuginnError, Result};

/// Locale used when a request does not name one.
pub const DEFAULT_LOCALE: &str = "en-US";

/// An authenticated, locale-bound session token.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    locale: String,
    token: String,
}

impl Session {
    pub fn new(locale: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            token: token.into(),
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("locale", &self.locale)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Shared, externally refreshed credential for session acquisition.
///
/// Clones share the same slot. Whoever owns the credential lifecycle calls
/// [`set`](Self::set); the resolver reads the current value at each
/// acquisition.
#[derive(Clone, Default)]
pub struct CredentialHandle {
    inner: Arc<RwLock<Option<String>>>,
}

impl CredentialHandle {
    pub fn new(initial: Option<String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(initial)),
        }
    }

    /// Replace the credential.
    pub fn set(&self, credential: impl Into<String>) {
        let mut slot = self.inner.write().unwrap_or_else(|e| e.into_inner());
        *slot = Some(credential.into());
    }

    pub fn clear(&self) {
        let mut slot = self.inner.write().unwrap_or_else(|e| e.into_inner());
        *slot = None;
    }

    /// Snapshot of the current credential.
    pub fn current(&self) -> Option<String> {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl fmt::Debug for CredentialHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.current().is_some() {
            "<set>"
        } else {
            "<unset>"
        };
        f.debug_tuple("CredentialHandle").field(&state).finish()
    }
}

#[derive(Serialize)]
struct SessionRequest<'a> {
    locale: &'a str,
    credential: &'a str,
}

#[derive(Deserialize)]
struct SessionResponse {
    token: String,
}

/// Acquires sessions from an HTTP token endpoint.
///
/// POSTs `{"locale", "credential"}` as JSON and expects `{"token"}` back.
#[derive(Clone)]
pub struct HttpSessionProvider {
    http: Client,
    auth_url: String,
}

impl HttpSessionProvider {
    /// Create a provider for the token endpoint at `auth_url`.
    pub fn new(auth_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| HuginnError::Configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            auth_url: auth_url.into(),
        })
    }
}

#[async_trait]
impl SessionProvider for HttpSessionProvider {
    async fn create_session(&self, locale: &str, credential: &str) -> Result<Session> {
        let response = self
            .http
            .post(&self.auth_url)
            .json(&SessionRequest { locale, credential })
            .send()
            .await
            .map_err(|e| HuginnError::Session(e.to_string()))?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(HuginnError::Session("credential rejected".to_string()));
            }
            status if !status.is_success() => {
                return Err(HuginnError::Session(format!(
                    "token endpoint returned {status}"
                )));
            }
            _ => {}
        }

        let body: SessionResponse = response
            .json()
            .await
            .map_err(|e| HuginnError::Session(format!("invalid token response: {e}")))?;

        Ok(Session::new(locale, body.token))
    }
}
