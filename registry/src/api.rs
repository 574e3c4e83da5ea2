//! Normalized REST client for the registry backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every backend call from a page, the auth context or the CLI goes through
//! [`ApiClient::request`]. It owns header policy, bearer attachment and error
//! normalization so callers only ever see a 2xx [`HttpResponse`] or an
//! [`ApiError`].
//!
//! ERROR HANDLING
//! ==============
//! An authenticated 401 is a hard side effect: the credential is cleared and
//! the navigator is sent to the login route before `AuthExpired` is returned.
//! Concurrent 401s trip that side effect once; saving a new credential re-arms it.
//! An owner of in-memory session state registers [`ApiClient::on_session_expired`]
//! to drop it in the same step, before the redirect.

use std::sync::{Arc, Mutex, PoisonError};
use std::sync::atomic::{AtomicBool, Ordering};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::RegistryConfig;
use crate::error::{ApiError, server_error_message};
use crate::guard::LOGIN_ROUTE;
use crate::http::{HttpRequest, HttpResponse, Method, Transport};
use crate::token_store::TokenStore;

const AUTHORIZATION: &str = "Authorization";

type ExpiryHook = Arc<dyn Fn() + Send + Sync>;

/// Moves the user to another route. Browser builds assign `window.location`.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

/// Per-request knobs. Defaults to an authenticated `GET` with no body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<String>,
    /// Extra headers. `Authorization` is ignored; the client owns it.
    pub headers: Vec<(String, String)>,
    /// Attach the stored bearer credential and apply 401 session expiry.
    pub authenticated: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self { method: Method::Get, body: None, headers: Vec::new(), authenticated: true }
    }
}

impl RequestOptions {
    #[must_use]
    pub fn get() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn delete() -> Self {
        Self { method: Method::Delete, ..Self::default() }
    }

    /// `POST` with `body` serialized as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Encode`] if `body` cannot be serialized.
    pub fn post_json<B: Serialize + ?Sized>(body: &B) -> Result<Self, ApiError> {
        let body = serde_json::to_string(body).map_err(|e| ApiError::Encode(e.to_string()))?;
        Ok(Self { method: Method::Post, body: Some(body), ..Self::default() })
    }

    /// Send without a bearer credential; 401 is then an ordinary failure.
    #[must_use]
    pub fn anonymous(mut self) -> Self {
        self.authenticated = false;
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }
}

pub struct ApiClient {
    base_url: String,
    transport: Arc<dyn Transport>,
    tokens: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
    /// Set once a 401 has cleared the session; reset by `store_credential`.
    expired: AtomicBool,
    on_expired: Mutex<Option<ExpiryHook>>,
}

impl ApiClient {
    pub fn new(
        config: &RegistryConfig,
        transport: Arc<dyn Transport>,
        tokens: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            base_url: config.api_base_url.trim_end_matches('/').to_owned(),
            transport,
            tokens,
            navigator,
            expired: AtomicBool::new(false),
            on_expired: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn tokens(&self) -> &dyn TokenStore {
        self.tokens.as_ref()
    }

    #[must_use]
    pub fn navigator(&self) -> &dyn Navigator {
        self.navigator.as_ref()
    }

    /// Run `hook` whenever a 401 clears the credential. Replaces any earlier hook.
    pub fn on_session_expired<F>(&self, hook: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        *self.on_expired.lock().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(hook));
    }

    /// Persist a freshly issued credential and re-arm 401 handling.
    pub fn store_credential(&self, credential: &str) {
        self.tokens.save(credential);
        self.expired.store(false, Ordering::SeqCst);
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    /// Issue a request and normalize the outcome.
    ///
    /// # Errors
    ///
    /// - [`ApiError::AuthExpired`] on an authenticated 401 (session cleared, redirected)
    /// - [`ApiError::Status`] on any other non-2xx
    /// - [`ApiError::Network`] when the backend is unreachable
    pub async fn request(&self, path: &str, options: RequestOptions) -> Result<HttpResponse, ApiError> {
        let request = self.build_request(path, &options);
        let method = request.method.as_str();
        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(%method, %path, error = %err, "request failed before a response");
                return Err(err.into());
            }
        };
        tracing::debug!(%method, %path, status = response.status, "response received");

        if response.is_success() {
            return Ok(response);
        }
        if response.status == 401 && options.authenticated {
            self.expire_session();
            return Err(ApiError::AuthExpired);
        }
        Err(ApiError::Status { status: response.status, message: error_message(&response) })
    }

    /// `GET` `path` and decode the JSON body.
    ///
    /// # Errors
    ///
    /// See [`Self::request`]; also [`ApiError::Body`] if the body does not match `T`.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(path, RequestOptions::get()).await?.json()
    }

    /// `POST` `body` as JSON and return the raw 2xx response.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<HttpResponse, ApiError> {
        self.request(path, RequestOptions::post_json(body)?).await
    }

    fn build_request(&self, path: &str, options: &RequestOptions) -> HttpRequest {
        let mut headers = vec![
            ("Content-Type".to_owned(), "application/json".to_owned()),
            ("Accept".to_owned(), "application/json".to_owned()),
        ];
        for (name, value) in &options.headers {
            if name.eq_ignore_ascii_case(AUTHORIZATION) {
                tracing::warn!(%path, "ignoring caller-supplied Authorization header");
                continue;
            }
            match headers.iter_mut().find(|(existing, _)| existing.eq_ignore_ascii_case(name)) {
                Some(slot) => slot.1.clone_from(value),
                None => headers.push((name.clone(), value.clone())),
            }
        }
        if options.authenticated {
            if let Some(credential) = self.tokens.read() {
                headers.push((AUTHORIZATION.to_owned(), format!("Bearer {credential}")));
            }
        }
        HttpRequest { method: options.method, url: self.url(path), headers, body: options.body.clone() }
    }

    fn expire_session(&self) {
        if self.expired.swap(true, Ordering::SeqCst) {
            return;
        }
        tracing::info!("credential rejected by backend; clearing session");
        self.tokens.clear();
        let hook = self.on_expired.lock().unwrap_or_else(PoisonError::into_inner).clone();
        if let Some(hook) = hook {
            hook();
        }
        self.navigator.navigate(LOGIN_ROUTE);
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Human-readable message from a JSON error body, or the generic status message.
#[must_use]
pub fn error_message(response: &HttpResponse) -> String {
    serde_json::from_slice::<ErrorBody>(&response.body)
        .ok()
        .and_then(|body| body.message)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| server_error_message(response.status))
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
