/*!
`dispatch.rs`

Named-route request dispatch.

Flow for one `Dispatcher::send`:
  1. resolve the operation name in the `RouteTable`
  2. substitute placeholders into the URL template
  3. serialize the JSON body (if any)
  4. one `Transport::round_trip` (no retries, no caching)
  5. classify the status:
       404          -> NotFound (body not decoded)
       other non-2xx -> Transport
       2xx          -> decode into T, Decode on failure

Steps 1-3 fail with `RequestError` before any I/O.
*/

use std::collections::BTreeMap;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;
use serde::de::{DeserializeOwned, IgnoredAny};

use super::classify::{classify, presence};
use super::error::{ApiError, RequestError, TransportError};
use super::routes::{Method, RouteTable};

/// Query keys/values keep the RFC 3986 unreserved set literal.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/* -------------------------------------------------------------------------- */
/* Request                                                                    */
/* -------------------------------------------------------------------------- */

/// A call to a named operation.
#[derive(Debug, Clone, Default)]
pub struct Request {
    pub name: String,
    pub params: BTreeMap<String, String>,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl Request {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn json_body<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, RequestError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }
}

/* -------------------------------------------------------------------------- */
/* Transport seam                                                             */
/* -------------------------------------------------------------------------- */

/// What the dispatcher hands to a transport: a fully resolved call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl WireRequest {
    /// Path plus encoded query string (no leading host).
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let pairs: Vec<String> = self
            .query
            .iter()
            .map(|(k, v)| {
                format!(
                    "{}={}",
                    utf8_percent_encode(k, QUERY_COMPONENT),
                    utf8_percent_encode(v, QUERY_COMPONENT)
                )
            })
            .collect();
        format!("{}?{}", self.path, pairs.join("&"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Anything that can carry a `WireRequest` to the server.
///
/// A transport returns `Err` only when no response was obtained; every
/// received status (including 404 and 5xx) comes back as `Ok`.
pub trait Transport {
    fn round_trip(&self, request: &WireRequest) -> Result<WireResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn round_trip(&self, request: &WireRequest) -> Result<WireResponse, TransportError> {
        (**self).round_trip(request)
    }
}

/* -------------------------------------------------------------------------- */
/* Outcome                                                                    */
/* -------------------------------------------------------------------------- */

/// Exhaustive result of one dispatch attempt.
///
/// The decoded value only exists inside `Success`.
#[derive(Debug)]
pub enum DispatchOutcome<T> {
    Success(T),
    NotFound,
    Transport(TransportError),
    Decode(serde_json::Error),
}

impl<T> DispatchOutcome<T> {
    /// Three-way split: `Ok(Some)` found, `Ok(None)` absent, `Err` failure.
    pub fn found(self) -> Result<Option<T>, ApiError> {
        classify(self)
    }
}

/* -------------------------------------------------------------------------- */
/* Dispatcher                                                                 */
/* -------------------------------------------------------------------------- */

/// Sends named operations through a transport.
///
/// Holds no mutable state; concurrent `send` calls only share the table.
pub struct Dispatcher<'r, T> {
    routes: &'r RouteTable,
    transport: T,
}

impl<'r, T: Transport> Dispatcher<'r, T> {
    pub fn new(routes: &'r RouteTable, transport: T) -> Self {
        Self { routes, transport }
    }

    /// Build the wire form of `request` without sending it.
    pub fn prepare(&self, request: &Request) -> Result<WireRequest, RequestError> {
        let (method, path) = self.routes.create_path(&request.name, &request.params)?;
        let body = match &request.body {
            Some(value) => Some(serde_json::to_vec(value)?),
            None => None,
        };
        Ok(WireRequest {
            method,
            path,
            query: request.query.clone(),
            body,
        })
    }

    pub fn send<R: DeserializeOwned>(
        &self,
        request: &Request,
    ) -> Result<DispatchOutcome<R>, RequestError> {
        let wire = self.prepare(request)?;
        let response = match self.transport.round_trip(&wire) {
            Ok(r) => r,
            Err(e) => return Ok(DispatchOutcome::Transport(e)),
        };

        if response.status == 404 {
            return Ok(DispatchOutcome::NotFound);
        }
        if !(200..300).contains(&response.status) {
            return Ok(DispatchOutcome::Transport(TransportError::Status {
                status: response.status,
                body: String::from_utf8_lossy(&response.body).trim().to_string(),
            }));
        }

        Ok(match decode_body(&response.body) {
            Ok(value) => DispatchOutcome::Success(value),
            Err(e) => DispatchOutcome::Decode(e),
        })
    }

    /// `send` + classification; `Ok(None)` means the resource does not exist.
    pub fn fetch<R: DeserializeOwned>(&self, request: &Request) -> Result<Option<R>, ApiError> {
        self.send::<R>(request)?.found()
    }

    /// For operations whose response body carries nothing of interest.
    pub fn exists(&self, request: &Request) -> Result<bool, ApiError> {
        presence(self.send::<IgnoredAny>(request)?)
    }
}

/// Empty or whitespace-only bodies decode as JSON `null`.
fn decode_body<R: DeserializeOwned>(body: &[u8]) -> Result<R, serde_json::Error> {
    if body.iter().all(|b| b.is_ascii_whitespace()) {
        serde_json::from_slice(b"null")
    } else {
        serde_json::from_slice(body)
    }
}

/* --------------------------------- Tests ---------------------------------- */
