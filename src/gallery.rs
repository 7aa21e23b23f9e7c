//! Gallery data access: turns museum API responses into display records.
//!
//! | Operation | Endpoint | Caching |
//! |-----------|----------|---------|
//! | browse (empty query) | `artworks` | client default TTL |
//! | search (non-empty query) | `artworks/search` | bypassed |
//! | details | `artworks/:id` | client default TTL |
//!
//! Listing and search drop records that have no image. A details lookup
//! without an id is a no-op that returns `Ok(None)` without a request.

use async_trait::async_trait;
use std::sync::Arc;

use crate::artic::{
    self, ApiConfig, ArtworkById, ArtworkRecord, Artworks, ArtworksSearch, DetailParams,
    ListParams, SearchParams,
};
use crate::feed::{PageResult, PageSource};
use crate::rest::{QueryError, RequestConfig, RestQueryClient, Transport};
use crate::text::{artwork_subtitle, iiif_image_url, strip_html};
use crate::types::{ArtworkCard, ArtworkDetails};

const UNKNOWN_ARTIST: &str = "Unknown artist";
const DEFAULT_COLLECTION: &str = "Art Institute of Chicago";

/// Request shaping for gallery lookups.
#[derive(Debug, Clone, PartialEq)]
pub struct GallerySettings {
    /// Items per page.
    pub page_limit: u32,
    /// Field projection for list and search requests.
    pub fields: Vec<String>,
    /// Requested image width for cards.
    pub card_width: u32,
    /// Requested image width for the details view.
    pub detail_width: u32,
}

impl Default for GallerySettings {
    fn default() -> Self {
        Self {
            page_limit: 20,
            fields: artic::field_list(artic::LIST_FIELDS),
            card_width: crate::text::CARD_IMAGE_WIDTH,
            detail_width: 1686,
        }
    }
}

/// Artwork lookups over a shared query client.
pub struct Gallery<T> {
    client: Arc<RestQueryClient<T>>,
    settings: GallerySettings,
}

impl<T: Transport + 'static> Gallery<T> {
    pub fn new(client: Arc<RestQueryClient<T>>, settings: GallerySettings) -> Self {
        Self { client, settings }
    }

    pub fn client(&self) -> &Arc<RestQueryClient<T>> {
        &self.client
    }

    pub fn settings(&self) -> &GallerySettings {
        &self.settings
    }

    /// One page of cards: the full listing when `query` is empty, search results otherwise.
    pub async fn cards(&self, query: &str, page: u32) -> Result<PageResult<ArtworkCard>, QueryError> {
        let response = if query.is_empty() {
            let params = ListParams {
                page,
                limit: self.settings.page_limit,
                fields: self.settings.fields.clone(),
            };
            self.client
                .get::<Artworks>(&params, RequestConfig::default())
                .await?
        } else {
            let params = SearchParams {
                q: query.to_string(),
                page,
                limit: self.settings.page_limit,
                fields: self.settings.fields.clone(),
            };
            self.client
                .get::<ArtworksSearch>(&params, RequestConfig::no_cache())
                .await?
        };

        let received = response.data.len();
        let items: Vec<ArtworkCard> = response
            .data
            .iter()
            .filter(|record| record.image_id.is_some())
            .map(|record| card_from_record(record, &response.config, self.settings.card_width))
            .collect();
        if items.len() < received {
            tracing::debug!(dropped = received - items.len(), page, "records without image");
        }

        Ok(PageResult {
            items,
            total_pages: response.pagination.total_pages,
            current_page: response.pagination.current_page,
        })
    }

    /// Full record for one artwork. `None` id means nothing to look up.
    pub async fn details(&self, id: Option<i64>) -> Result<Option<ArtworkDetails>, QueryError> {
        let Some(id) = id else {
            tracing::debug!("details skipped: no id");
            return Ok(None);
        };
        let params = DetailParams {
            id,
            fields: Some(artic::field_list(artic::DETAIL_FIELDS)),
        };
        let response = self
            .client
            .get::<ArtworkById>(&params, RequestConfig::default())
            .await?;
        Ok(Some(details_from_record(
            &response.data,
            &response.config,
            self.settings.detail_width,
        )))
    }
}

#[async_trait]
impl<T: Transport + 'static> PageSource for Gallery<T> {
    type Item = ArtworkCard;

    async fn fetch_page(
        &self,
        query: &str,
        page: u32,
    ) -> Result<PageResult<ArtworkCard>, QueryError> {
        self.cards(query, page).await
    }
}

fn text_or_default(value: Option<&String>) -> String {
    value.cloned().unwrap_or_default()
}

fn join_categories(record: &ArtworkRecord) -> String {
    record
        .category_titles
        .as_ref()
        .map(|titles| titles.join(", "))
        .unwrap_or_default()
}

/// Map a wire record to a grid card.
pub fn card_from_record(record: &ArtworkRecord, config: &ApiConfig, width: u32) -> ArtworkCard {
    let thumbnail = record.thumbnail.as_ref();
    ArtworkCard {
        id: record.id,
        title: text_or_default(record.title.as_ref()),
        artist: record
            .artist_title
            .clone()
            .unwrap_or_else(|| UNKNOWN_ARTIST.to_string()),
        subtitle: artwork_subtitle(
            record.date_display.as_deref().unwrap_or_default(),
            record.medium_display.as_deref().unwrap_or_default(),
        ),
        categories: join_categories(record),
        image_url: iiif_image_url(&config.iiif_url, record.image_id.as_deref(), width),
        lqip: thumbnail.and_then(|t| t.lqip.clone()),
        thumbnail_width: thumbnail.and_then(|t| t.width),
        thumbnail_height: thumbnail.and_then(|t| t.height),
    }
}

/// Map a wire record to the details view.
pub fn details_from_record(
    record: &ArtworkRecord,
    config: &ApiConfig,
    width: u32,
) -> ArtworkDetails {
    let thumbnail = record.thumbnail.as_ref();
    let description = record
        .description
        .as_ref()
        .or(record.short_description.as_ref())
        .map(|html| strip_html(html))
        .unwrap_or_default();
    ArtworkDetails {
        id: record.id,
        title: text_or_default(record.title.as_ref()),
        artist: record
            .artist_title
            .clone()
            .unwrap_or_else(|| UNKNOWN_ARTIST.to_string()),
        year: text_or_default(record.date_display.as_ref()),
        medium: text_or_default(record.medium_display.as_ref()),
        dimensions: text_or_default(record.dimensions.as_ref()),
        collection: record
            .department_title
            .clone()
            .unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
        description,
        image_url: iiif_image_url(&config.iiif_url, record.image_id.as_deref(), width),
        image_id: record.image_id.clone(),
        lqip: thumbnail.and_then(|t| t.lqip.clone()),
        museum_url: format!("{}/artworks/{}", config.website_url, record.id),
        categories: join_categories(record),
        thumbnail_width: thumbnail.and_then(|t| t.width),
        thumbnail_height: thumbnail.and_then(|t| t.height),
    }
}
