//! Caching REST query client.
//!
//! | Module | Role |
//! |--------|------|
//! | [`endpoint`] | `Endpoint` trait and the `Static` / `Templated` path definitions |
//! | [`params`] | Query-string flattening and canonical JSON for cache keys |
//! | [`cache`] | TTL response cache, structured cache keys, statistics |
//! | [`transport`] | `Transport` trait and the `reqwest` implementation |
//! | [`client`] | `RestQueryClient`: ties the above together |

pub mod cache;
pub mod client;
pub mod endpoint;
pub mod params;
pub mod transport;

pub use cache::{CacheEntry, CacheKey, CacheStats, ResponseCache};
pub use client::{DEFAULT_TTL, QueryError, RequestConfig, RestQueryClient};
pub use endpoint::{Endpoint, EndpointDef};
pub use transport::{HttpTransport, Transport, TransportError};
