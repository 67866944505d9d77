//! Remote API client core: named routes, dispatch, outcome classification.
//!
//! routes   -> RouteTable / Route / Method
//! dispatch -> Request, Dispatcher, Transport seam, DispatchOutcome
//! classify -> found / absent / error split
//! http     -> reqwest-backed Transport

pub mod classify;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod routes;

pub use dispatch::{Dispatcher, Request, Transport};
pub use http::HttpTransport;
pub use routes::{RouteTable, names};
