//! Native HTTP transport backed by `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use registry::{HttpRequest, HttpResponse, Method, Transport, TransportError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(map_error)?;
        Ok(Self { client })
    }
}

#[async_trait(?Send)]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self.client.request(to_reqwest_method(request.method), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(map_error)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(map_error)?;
        Ok(HttpResponse::new(status, body.to_vec()))
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}

fn map_error(error: reqwest::Error) -> TransportError {
    if error.is_connect() || error.is_timeout() {
        TransportError::Connect(error.to_string())
    } else {
        TransportError::Other(error.to_string())
    }
}

#[cfg(test)]
#[path = "transport_test.rs"]
mod tests;
