//! Shared test utilities for the artic-gal test suite.
//!
//! Provides a recording [`MockTransport`] and JSON builders shaped like the
//! museum API's responses.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_helpers::*;
//!
//! let transport = Arc::new(MockTransport::new(|req| {
//!     Ok(list_body(&[1, 2], req.page().unwrap_or(1), 3))
//! }));
//! let client = RestQueryClient::new("https://api.test", Arc::clone(&transport));
//! // ... exercise the client ...
//! assert_eq!(transport.request_count(), 1);
//! ```

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Value, json};

use crate::rest::{Transport, TransportError};

// =========================================================================
// Recording transport
// =========================================================================

/// A request as seen by [`MockTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
    /// 0-based order of arrival.
    pub sequence: usize,
}

impl RecordedRequest {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn page(&self) -> Option<u32> {
        self.param("page").and_then(|p| p.parse().ok())
    }
}

type Responder = Box<dyn Fn(&RecordedRequest) -> Result<Value, TransportError> + Send + Sync>;

/// Transport that records every request and answers from a closure.
pub struct MockTransport {
    requests: Mutex<Vec<RecordedRequest>>,
    responder: Responder,
}

impl MockTransport {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&RecordedRequest) -> Result<Value, TransportError> + Send + Sync + 'static,
    {
        Self {
            requests: Mutex::new(Vec::new()),
            responder: Box::new(responder),
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn urls(&self) -> Vec<String> {
        self.requests.lock().iter().map(|r| r.url.clone()).collect()
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.lock().last().cloned()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, url: &str, query: &[(String, String)]) -> Result<Value, TransportError> {
        let request = {
            let mut requests = self.requests.lock();
            let request = RecordedRequest {
                url: url.to_string(),
                query: query.to_vec(),
                sequence: requests.len(),
            };
            requests.push(request.clone());
            request
        };
        (self.responder)(&request)
    }
}

// =========================================================================
// Museum API fixtures
// =========================================================================

/// One artwork record; `id` doubles as the image id suffix.
pub fn artwork_json(id: i64) -> Value {
    json!({
        "id": id,
        "title": format!("Artwork {id}"),
        "image_id": format!("img-{id}"),
        "thumbnail": {
            "lqip": "data:image/gif;base64,R0lGOD",
            "width": 400,
            "height": 500,
            "alt_text": null
        },
        "artist_title": "Claude Monet",
        "date_display": "1906",
        "medium_display": "Oil on canvas, framed",
        "category_titles": ["Painting", "Impressionism"]
    })
}

/// A list/search response body for the given ids.
pub fn list_body(ids: &[i64], current_page: u32, total_pages: u32) -> Value {
    json!({
        "pagination": {
            "total": total_pages * 20,
            "limit": 20,
            "offset": (current_page.saturating_sub(1)) * 20,
            "total_pages": total_pages,
            "current_page": current_page,
            "next_url": null
        },
        "data": ids.iter().map(|id| artwork_json(*id)).collect::<Vec<_>>(),
        "config": {
            "iiif_url": "https://www.artic.edu/iiif/2",
            "website_url": "https://www.artic.edu"
        }
    })
}

/// A single-artwork response body.
pub fn detail_body(id: i64) -> Value {
    let mut data = artwork_json(id);
    data["dimensions"] = json!("73 × 92 cm");
    data["description"] = json!("<p>Water lilies at <em>Giverny</em>.</p>");
    data["short_description"] = Value::Null;
    data["department_title"] = json!("Painting and Sculpture of Europe");
    json!({
        "data": data,
        "config": {
            "iiif_url": "https://www.artic.edu/iiif/2",
            "website_url": "https://www.artic.edu"
        }
    })
}
