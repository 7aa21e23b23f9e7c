//! Endpoint set and wire types for the Art Institute of Chicago public API.
//!
//! | Endpoint | Path | Params | Response |
//! |----------|------|--------|----------|
//! | [`Artworks`] | `/artworks` | [`ListParams`] | [`ListResponse`] |
//! | [`ArtworksSearch`] | `/artworks/search` | [`SearchParams`] | [`ListResponse`] |
//! | [`ArtworkById`] | `/artworks/{id}` | [`DetailParams`] | [`DetailResponse`] |
//!
//! The wire types only carry the fields this crate reads. Every record field
//! except `id` may be missing or `null` depending on the `fields` projection
//! sent with the request, so they are all optional.

use serde::{Deserialize, Serialize};

use crate::rest::{Endpoint, EndpointDef};

/// Public API root.
pub const DEFAULT_BASE_URL: &str = "https://api.artic.edu/api/v1";

/// Fields requested for grid cards.
pub const LIST_FIELDS: &[&str] = &[
    "id",
    "title",
    "image_id",
    "thumbnail",
    "artist_title",
    "date_display",
    "medium_display",
    "category_titles",
];

/// Fields requested for the details view.
pub const DETAIL_FIELDS: &[&str] = &[
    "id",
    "title",
    "image_id",
    "thumbnail",
    "artist_title",
    "date_display",
    "medium_display",
    "dimensions",
    "description",
    "short_description",
    "department_title",
    "category_titles",
];

// =========================================================================
// Endpoints
// =========================================================================

/// Paginated listing of the whole collection.
pub struct Artworks;

/// Full-text search over the collection.
pub struct ArtworksSearch;

/// One artwork by id.
pub struct ArtworkById;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListParams {
    pub page: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchParams {
    pub q: String,
    pub page: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailParams {
    pub id: i64,
    pub fields: Option<Vec<String>>,
}

impl Endpoint for Artworks {
    const NAME: &'static str = "artworks";
    type Params = ListParams;
    type Response = ListResponse;

    fn definition() -> EndpointDef<ListParams> {
        EndpointDef::Static("/artworks")
    }
}

impl Endpoint for ArtworksSearch {
    const NAME: &'static str = "artworks/search";
    type Params = SearchParams;
    type Response = ListResponse;

    fn definition() -> EndpointDef<SearchParams> {
        EndpointDef::Static("/artworks/search")
    }
}

impl Endpoint for ArtworkById {
    const NAME: &'static str = "artworks/:id";
    type Params = DetailParams;
    type Response = DetailResponse;

    fn definition() -> EndpointDef<DetailParams> {
        EndpointDef::Templated(|p| format!("/artworks/{}", p.id))
    }
}

// =========================================================================
// Wire types
// =========================================================================

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub offset: u64,
    pub total_pages: u32,
    pub current_page: u32,
    #[serde(default)]
    pub next_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Thumbnail {
    #[serde(default)]
    pub lqip: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub alt_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ArtworkRecord {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub image_id: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<Thumbnail>,
    #[serde(default)]
    pub artist_title: Option<String>,
    #[serde(default)]
    pub date_display: Option<String>,
    #[serde(default)]
    pub medium_display: Option<String>,
    #[serde(default)]
    pub category_titles: Option<Vec<String>>,
    #[serde(default)]
    pub dimensions: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub department_title: Option<String>,
}

/// Asset locations sent alongside every response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiConfig {
    pub iiif_url: String,
    pub website_url: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ListResponse {
    pub pagination: Pagination,
    pub data: Vec<ArtworkRecord>,
    pub config: ApiConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DetailResponse {
    pub data: ArtworkRecord,
    pub config: ApiConfig,
}

/// Owned copy of a static field list, as sent in request params.
pub fn field_list(fields: &[&str]) -> Vec<String> {
    fields.iter().map(|f| f.to_string()).collect()
}
