//! Scripted seams for native unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use registry::clock::SystemClock;
use registry::{
    ApiClient, AuthContext, HttpRequest, HttpResponse, MemoryTokenStore, Navigator, RegistryConfig, Transport,
    TransportError,
};

/// Replays queued responses in order; an empty queue reads as offline.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<HttpResponse>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn push(&self, status: u16, body: &serde_json::Value) {
        self.replies.lock().unwrap().push_back(HttpResponse::new(status, body.to_string()));
    }

    pub fn urls(&self) -> Vec<String> {
        self.requests.lock().unwrap().iter().map(|r| r.url.clone()).collect()
    }
}

#[async_trait(?Send)]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| TransportError::Connect("offline".to_owned()))
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    pub visited: Mutex<Vec<String>>,
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.visited.lock().unwrap().push(path.to_owned());
    }
}

pub struct Harness {
    pub transport: Arc<ScriptedTransport>,
    pub store: Arc<MemoryTokenStore>,
    pub navigator: Arc<RecordingNavigator>,
    pub context: Arc<AuthContext>,
}

impl Harness {
    pub fn new(store: MemoryTokenStore) -> Self {
        let transport = Arc::new(ScriptedTransport::default());
        let store = Arc::new(store);
        let navigator = Arc::new(RecordingNavigator::default());
        let api = ApiClient::new(&RegistryConfig::default(), transport.clone(), store.clone(), navigator.clone());
        let context = Arc::new(AuthContext::new(Arc::new(api), Arc::new(SystemClock)));
        Self { transport, store, navigator, context }
    }

    pub fn api(&self) -> &ApiClient {
        self.context.api()
    }
}
