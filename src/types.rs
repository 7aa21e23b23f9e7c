//! Display records shared by the data-access layer, the favorites store and
//! the CLI output.
//!
//! These are the crate's own shapes, decoupled from the museum API's wire
//! format in [`artic`](crate::artic). They serialize to JSON so favorites can
//! be persisted between runs.

use serde::{Deserialize, Serialize};

/// An artwork as shown in a browsing grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtworkCard {
    pub id: i64,
    pub title: String,
    /// Artist name, `"Unknown artist"` when the record has none.
    pub artist: String,
    /// `date · medium` line, see [`artwork_subtitle`](crate::text::artwork_subtitle).
    pub subtitle: String,
    /// Comma-separated category titles.
    pub categories: String,
    pub image_url: String,
    /// Low-quality image placeholder (base64 data URI).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lqip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_height: Option<u32>,
}

impl ArtworkCard {
    /// Thumbnail aspect ratio as `(width, height)`, when both are known and non-zero.
    pub fn aspect(&self) -> Option<(u32, u32)> {
        match (self.thumbnail_width, self.thumbnail_height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => Some((w, h)),
            _ => None,
        }
    }
}

/// Full artwork record for the details view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtworkDetails {
    pub id: i64,
    pub title: String,
    pub artist: String,
    pub year: String,
    pub medium: String,
    pub dimensions: String,
    /// Department, `"Art Institute of Chicago"` when the record has none.
    pub collection: String,
    /// Plain-text description (HTML tags stripped).
    pub description: String,
    pub image_url: String,
    pub image_id: Option<String>,
    pub lqip: Option<String>,
    /// Public page of the artwork on the museum website.
    pub museum_url: String,
    pub categories: String,
    pub thumbnail_width: Option<u32>,
    pub thumbnail_height: Option<u32>,
}

impl From<&ArtworkDetails> for ArtworkCard {
    fn from(details: &ArtworkDetails) -> Self {
        Self {
            id: details.id,
            title: details.title.clone(),
            artist: details.artist.clone(),
            subtitle: crate::text::artwork_subtitle(&details.year, &details.medium),
            categories: details.categories.clone(),
            image_url: details.image_url.clone(),
            lqip: details.lqip.clone(),
            thumbnail_width: details.thumbnail_width,
            thumbnail_height: details.thumbnail_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(w: Option<u32>, h: Option<u32>) -> ArtworkCard {
        ArtworkCard {
            id: 1,
            title: "Water Lilies".into(),
            artist: "Claude Monet".into(),
            subtitle: "1906 · Oil on canvas".into(),
            categories: String::new(),
            image_url: String::new(),
            lqip: None,
            thumbnail_width: w,
            thumbnail_height: h,
        }
    }

    #[test]
    fn aspect_requires_both_dimensions() {
        assert_eq!(card(Some(4), Some(5)).aspect(), Some((4, 5)));
        assert_eq!(card(Some(4), None).aspect(), None);
        assert_eq!(card(Some(0), Some(5)).aspect(), None);
    }

    #[test]
    fn card_serializes_without_missing_thumbnail_fields() {
        let json = serde_json::to_value(card(None, None)).unwrap();
        assert!(json.get("thumbnail_width").is_none());
        assert!(json.get("lqip").is_none());
        let back: ArtworkCard = serde_json::from_value(json).unwrap();
        assert_eq!(back.thumbnail_width, None);
    }

    #[test]
    fn card_from_details_builds_subtitle() {
        let details = ArtworkDetails {
            id: 7,
            title: "Nighthawks".into(),
            artist: "Edward Hopper".into(),
            year: "1942".into(),
            medium: "Oil on canvas".into(),
            dimensions: String::new(),
            collection: String::new(),
            description: String::new(),
            image_url: "https://iiif/x/full/1686,/0/default.jpg".into(),
            image_id: Some("x".into()),
            lqip: None,
            museum_url: String::new(),
            categories: "Painting".into(),
            thumbnail_width: Some(3),
            thumbnail_height: Some(2),
        };
        let card = ArtworkCard::from(&details);
        assert_eq!(card.id, 7);
        assert_eq!(card.subtitle, "1942 · Oil on canvas");
        assert_eq!(card.aspect(), Some((3, 2)));
    }
}
