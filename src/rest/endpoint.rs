//! Typed endpoint definitions.
//!
//! Every endpoint a client can call is a type implementing [`Endpoint`]. The
//! type carries the endpoint's name (used in cache keys and invalidation), its
//! parameter and response types, and an [`EndpointDef`] describing how the
//! request path is built.
//!
//! ```text
//! Static("/artworks")                       → /artworks
//! Templated(|p| format!("/artworks/{}", p.id)) → /artworks/42
//! ```
//!
//! Endpoints that take no parameters use `Params = ()` and can be called
//! through [`RestQueryClient::get_static`](super::RestQueryClient::get_static).

use serde::Serialize;
use serde::de::DeserializeOwned;

/// How an endpoint's path is derived from its parameters.
pub enum EndpointDef<P> {
    /// Fixed path; parameters only travel as query string.
    Static(&'static str),
    /// Path built from the parameters (e.g. an id segment).
    Templated(fn(&P) -> String),
}

impl<P> EndpointDef<P> {
    /// Resolve the request path for the given parameters.
    pub fn resolve(&self, params: &P) -> String {
        match self {
            Self::Static(path) => (*path).to_string(),
            Self::Templated(build) => build(params),
        }
    }

    /// Whether the path depends on the parameters.
    pub fn is_templated(&self) -> bool {
        matches!(self, Self::Templated(_))
    }
}

/// A named REST endpoint with typed parameters and response.
pub trait Endpoint {
    /// Endpoint name as used in cache keys (e.g. `"artworks/:id"`).
    const NAME: &'static str;
    /// Parameters; serialized both into the query string and the cache key.
    type Params: Serialize + Sync;
    /// Decoded response body.
    type Response: DeserializeOwned;

    fn definition() -> EndpointDef<Self::Params>;
}
