//! Graph API access
//!
//! This module contains everything between the crawler and the network:
//! - The `Transport` seam and its `reqwest` implementation
//! - The authenticated `ApiClient` and its error envelope decoding
//! - Cursor-following pagination

mod client;
mod paginator;
mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{params, parse_api_error, ApiClient};
pub use paginator::{collect_capped, Paginator};
pub use transport::{build_http_client, Query, RawResponse, ReqwestTransport, Transport};
