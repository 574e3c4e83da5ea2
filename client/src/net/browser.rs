//! `gloo-net` transport, `localStorage` token store and `window.location`
//! navigator.
//!
//! ERROR HANDLING
//! ==============
//! A rejected `fetch` (offline, DNS, CORS) surfaces as
//! [`TransportError::Connect`], which the API client reports with the
//! connectivity message. Storage failures (private mode, quota) are logged
//! and read back as "no credential".

use async_trait::async_trait;
#[cfg(feature = "csr")]
use registry::http::Method;
use registry::http::{HttpRequest, HttpResponse, Transport};
#[cfg(feature = "csr")]
use registry::token_store::TOKEN_STORAGE_KEY;
use registry::{Navigator, TokenStore, TransportError};

/// Cross-origin `fetch` without cookies; the bearer header carries identity.
#[derive(Clone, Copy, Debug, Default)]
pub struct GlooTransport;

#[async_trait(?Send)]
impl Transport for GlooTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        #[cfg(feature = "csr")]
        {
            let mut builder = gloo_net::http::RequestBuilder::new(&request.url)
                .method(gloo_method(request.method))
                .mode(web_sys::RequestMode::Cors)
                .credentials(web_sys::RequestCredentials::Omit);
            for (name, value) in &request.headers {
                builder = builder.header(name, value);
            }
            let outgoing = match request.body {
                Some(body) => builder.body(body),
                None => builder.build(),
            }
            .map_err(|e| TransportError::Other(e.to_string()))?;

            let response = outgoing
                .send()
                .await
                .map_err(|e| TransportError::Connect(e.to_string()))?;
            let status = response.status();
            let body = response
                .binary()
                .await
                .map_err(|e| TransportError::Other(e.to_string()))?;
            Ok(HttpResponse::new(status, body))
        }
        #[cfg(not(feature = "csr"))]
        {
            Err(TransportError::Other(format!(
                "{} {}: fetch is only available in the browser",
                request.method.as_str(),
                request.url
            )))
        }
    }
}

#[cfg(feature = "csr")]
fn gloo_method(method: Method) -> gloo_net::http::Method {
    match method {
        Method::Get => gloo_net::http::Method::GET,
        Method::Post => gloo_net::http::Method::POST,
        Method::Put => gloo_net::http::Method::PUT,
        Method::Delete => gloo_net::http::Method::DELETE,
    }
}

/// Persists the credential under the `jwt-token` localStorage key.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorageTokenStore;

#[cfg(feature = "csr")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

impl TokenStore for LocalStorageTokenStore {
    fn save(&self, credential: &str) {
        #[cfg(feature = "csr")]
        {
            let saved = local_storage().is_some_and(|s| s.set_item(TOKEN_STORAGE_KEY, credential).is_ok());
            if !saved {
                log::warn!("could not persist credential to localStorage");
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = credential;
        }
    }

    fn read(&self) -> Option<String> {
        #[cfg(feature = "csr")]
        {
            local_storage()?
                .get_item(TOKEN_STORAGE_KEY)
                .ok()
                .flatten()
                .filter(|value| !value.is_empty())
        }
        #[cfg(not(feature = "csr"))]
        {
            None
        }
    }

    fn clear(&self) {
        #[cfg(feature = "csr")]
        {
            if let Some(storage) = local_storage() {
                let _ = storage.remove_item(TOKEN_STORAGE_KEY);
            }
        }
    }
}

/// Full-page navigation. Used for session-ending redirects so every piece
/// of page state from the old session is discarded.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocationNavigator;

impl Navigator for LocationNavigator {
    fn navigate(&self, path: &str) {
        #[cfg(feature = "csr")]
        {
            log::debug!("navigating to {path}");
            if let Some(window) = web_sys::window() {
                let _ = window.location().set_href(path);
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = path;
        }
    }
}

// =============================================================
// Page helpers
// =============================================================

pub const CAPTCHA_UNAVAILABLE: &str = "Verification is unavailable. Reload the page and try again.";

#[cfg(feature = "csr")]
mod recaptcha {
    use wasm_bindgen::prelude::*;

    #[wasm_bindgen]
    extern "C" {
        /// `grecaptcha.enterprise.execute`, loaded by the script tag in `index.html`.
        #[wasm_bindgen(js_namespace = ["grecaptcha", "enterprise"], js_name = execute, catch)]
        pub fn execute(site_key: &str, options: &JsValue) -> Result<js_sys::Promise, JsValue>;
    }
}

/// Bot-mitigation token for the anonymous result lookup.
///
/// # Errors
///
/// Returns [`CAPTCHA_UNAVAILABLE`] when the reCAPTCHA script is missing or
/// yields no token, and always outside the browser.
pub async fn recaptcha_token(site_key: &str) -> Result<String, &'static str> {
    #[cfg(feature = "csr")]
    {
        use wasm_bindgen::JsValue;

        let options = js_sys::Object::new();
        js_sys::Reflect::set(&options, &JsValue::from_str("action"), &JsValue::from_str("submit"))
            .map_err(|_| CAPTCHA_UNAVAILABLE)?;
        let promise = recaptcha::execute(site_key, &options).map_err(|_| CAPTCHA_UNAVAILABLE)?;
        let token = wasm_bindgen_futures::JsFuture::from(promise)
            .await
            .map_err(|_| CAPTCHA_UNAVAILABLE)?;
        token.as_string().filter(|t| !t.is_empty()).ok_or(CAPTCHA_UNAVAILABLE)
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = site_key;
        Err(CAPTCHA_UNAVAILABLE)
    }
}

/// Open the browser print dialog.
pub fn print_page() {
    #[cfg(feature = "csr")]
    {
        if let Some(window) = web_sys::window() {
            let _ = window.print();
        }
    }
}

#[cfg(test)]
#[path = "browser_test.rs"]
mod browser_test;
