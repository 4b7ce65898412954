//! Reqwest HTTP Client
//!
//! Blocking client shared by all HTTP targets. `reqwest::blocking::Client`
//! keeps a connection pool and is safe to use from several delivery workers.

use std::time::Duration;

use reqwest::blocking::Client;

use crate::domain::ports::{HttpClient, HttpRequest, HttpResponse, TransportError};

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: Client,
}

impl ReqwestClient {
    /// Build a client with the given request timeout
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::new(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn post(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self.client.post(&request.url);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some(auth) = &request.basic_auth {
            builder = builder.basic_auth(&auth.username, auth.password.as_ref());
        }

        let response = builder
            .body(request.body)
            .send()
            .map_err(|e| TransportError::new(format!("POST {} failed: {}", request.url, e)))?;

        Ok(HttpResponse {
            status: response.status().as_u16(),
        })
    }
}
