//! # artic-gal
//!
//! A catalog browser for the Art Institute of Chicago's public artwork API.
//! The library is three independent mechanisms plus the glue that puts them
//! to work on the museum's data:
//!
//! ```text
//!   query (watch) ──▶ PagedFeed ──▶ Gallery (PageSource) ──▶ RestQueryClient ──▶ Transport ──▶ API
//!                        │                                        │
//!                        ▼                                        └─ TTL ResponseCache
//!                 FeedState (watch) ──▶ caller ──▶ MasonryGrid (container + frames)
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`rest`] | Caching REST query client: typed endpoints, normalized cache keys, TTL, invalidation |
//! | [`feed`] | Paginated feed: switch on new query, exhaust on next page, published through `watch` |
//! | [`layout`] | Masonry layout: breakpoints, shortest-column packing, frame-coalesced passes |
//! | [`artic`] | Museum API endpoint set and wire types |
//! | [`gallery`] | Listing, search and details lookups mapped to display records |
//! | [`types`] | Display records (`ArtworkCard`, `ArtworkDetails`) |
//! | [`text`] | Subtitle, IIIF URL and HTML-stripping helpers |
//! | [`favorites`] | Insertion-ordered favorites persisted as JSON |
//! | [`config`] | `config.toml` loading, merging and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Structured Cache Keys
//!
//! A cache key is `(method, endpoint, parameters)` rather than one joined
//! string. Invalidating `artworks` compares the endpoint component exactly, so
//! it never touches `artworks/search` or `artworks/:id` entries, and a
//! caller-supplied key override still belongs to its endpoint.
//!
//! ## One Task per Feed
//!
//! All feed state lives in a single tokio task. Fetches run as child tasks
//! that report back over a channel tagged with the query generation they were
//! started for, so a late answer for an old query can't leak into the new
//! one even if it slips past cancellation.
//!
//! ## Host-Driven Layout
//!
//! The masonry engine does no I/O and owns no timers. The host tells it about
//! resizes and child changes and delivers frames through a
//! [`FrameScheduler`](layout::FrameScheduler); the engine runs at most one
//! pass per frame.

pub mod artic;
pub mod config;
pub mod favorites;
pub mod feed;
pub mod gallery;
pub mod layout;
pub mod output;
pub mod rest;
pub mod text;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
