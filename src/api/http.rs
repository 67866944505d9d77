/*!
`http.rs`

Production `Transport`: a thin `reqwest` adapter.

The dispatcher is synchronous, so each round trip is driven to completion on
a Tokio runtime owned by the transport (`block_on`). Anything beyond moving
bytes (retries, auth, caching) is out of scope here.
*/

use reqwest::{Client, Url};
use tokio::runtime::Runtime;

use super::dispatch::{Transport, WireRequest, WireResponse};
use super::error::TransportError;
use super::routes::Method;
use crate::{log_debug, log_trace};

pub struct HttpTransport {
    base: Url,
    client: Client,
    runtime: Runtime,
}

impl HttpTransport {
    pub fn new(base: Url) -> anyhow::Result<Self> {
        let runtime = Runtime::new()?;
        let client = Client::builder()
            .user_agent(concat!("pipectl/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            base,
            client,
            runtime,
        })
    }

    /// Join the API base (which may carry its own path prefix) with a route path.
    fn url_for(&self, request: &WireRequest) -> Result<Url, TransportError> {
        let joined = format!(
            "{}{}",
            self.base.as_str().trim_end_matches('/'),
            request.path_and_query()
        );
        Url::parse(&joined).map_err(|e| TransportError::Connection(format!("invalid url '{joined}': {e}")))
    }

    async fn round_trip_async(&self, request: &WireRequest) -> Result<WireResponse, TransportError> {
        let url = self.url_for(request)?;
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        log_debug!("{} {}", request.method, url);
        let mut builder = self.client.request(method, url);
        if let Some(body) = &request.body {
            builder = builder
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body.clone());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?;
        log_trace!("<- {} ({} bytes)", status, body.len());

        Ok(WireResponse {
            status,
            body: body.to_vec(),
        })
    }
}

impl Transport for HttpTransport {
    fn round_trip(&self, request: &WireRequest) -> Result<WireResponse, TransportError> {
        self.runtime.block_on(self.round_trip_async(request))
    }
}
