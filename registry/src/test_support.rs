//! Shared fixtures for unit tests: credential builder, scripted transport,
//! recording navigator and a fixed clock.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use time::OffsetDateTime;
use tokio::sync::oneshot;

use crate::api::{ApiClient, Navigator};
use crate::clock::Clock;
use crate::config::RegistryConfig;
use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::token_store::{MemoryTokenStore, TokenStore};

/// 2026-01-01T00:00:00Z.
pub const NOW: i64 = 1_767_225_600;

pub fn now() -> OffsetDateTime {
    OffsetDateTime::from_unix_timestamp(NOW).unwrap()
}

/// Build an unsigned three-segment credential with the given claims.
pub fn credential(username: &str, authorities: &str, exp: i64) -> String {
    let claims = serde_json::json!({
        "username": username,
        "authorities": authorities,
        "exp": exp,
    });
    encode_credential(&claims)
}

pub fn encode_credential(claims: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.signature")
}

pub fn json_response(status: u16, body: &serde_json::Value) -> Result<HttpResponse, TransportError> {
    Ok(HttpResponse::new(status, body.to_string()))
}

// =============================================================================
// MockTransport
// =============================================================================

enum Reply {
    Ready(Result<HttpResponse, TransportError>),
    Gated(oneshot::Receiver<()>, Result<HttpResponse, TransportError>),
}

/// Replays scripted responses in FIFO order and records every request.
#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn push(&self, reply: Result<HttpResponse, TransportError>) {
        self.replies.lock().unwrap().push_back(Reply::Ready(reply));
    }

    /// Queue a reply that is only delivered once the returned sender fires.
    pub fn push_gated(&self, reply: Result<HttpResponse, TransportError>) -> oneshot::Sender<()> {
        let (release, gate) = oneshot::channel();
        self.replies.lock().unwrap().push_back(Reply::Gated(gate, reply));
        release
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait::async_trait(?Send)]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(Reply::Ready(result)) => result,
            Some(Reply::Gated(gate, result)) => {
                let _ = gate.await;
                result
            }
            None => Err(TransportError::Other("no scripted reply".to_owned())),
        }
    }
}

// =============================================================================
// RecordingNavigator / FixedClock
// =============================================================================

#[derive(Default)]
pub struct RecordingNavigator {
    visits: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn visits(&self) -> Vec<String> {
        self.visits.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.visits.lock().unwrap().push(path.to_owned());
    }
}

pub struct FixedClock(pub OffsetDateTime);

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.0
    }
}

/// Counts store writes so tests can assert "cleared exactly once".
#[derive(Default)]
pub struct CountingStore {
    inner: MemoryTokenStore,
    pub clears: Mutex<usize>,
    pub saves: Mutex<usize>,
}

impl CountingStore {
    pub fn with_credential(credential: &str) -> Self {
        Self { inner: MemoryTokenStore::with_credential(credential), ..Self::default() }
    }

    pub fn clear_count(&self) -> usize {
        *self.clears.lock().unwrap()
    }

    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap()
    }
}

impl TokenStore for CountingStore {
    fn save(&self, credential: &str) {
        *self.saves.lock().unwrap() += 1;
        self.inner.save(credential);
    }

    fn read(&self) -> Option<String> {
        self.inner.read()
    }

    fn clear(&self) {
        *self.clears.lock().unwrap() += 1;
        self.inner.clear();
    }
}

// =============================================================================
// Harness
// =============================================================================

pub struct Harness {
    pub transport: Arc<MockTransport>,
    pub store: Arc<CountingStore>,
    pub navigator: Arc<RecordingNavigator>,
    pub api: Arc<ApiClient>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_store(CountingStore::default())
    }

    pub fn with_credential(credential: &str) -> Self {
        Self::with_store(CountingStore::with_credential(credential))
    }

    fn with_store(store: CountingStore) -> Self {
        let transport = Arc::new(MockTransport::default());
        let store = Arc::new(store);
        let navigator = Arc::new(RecordingNavigator::default());
        let api = Arc::new(ApiClient::new(
            &RegistryConfig::default(),
            transport.clone(),
            store.clone(),
            navigator.clone(),
        ));
        Self { transport, store, navigator, api }
    }
}
