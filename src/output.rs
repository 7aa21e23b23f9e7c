//! CLI output formatting.
//!
//! Every command has a pure `format_*` function returning lines and a thin
//! `print_*` wrapper, so the text can be tested without capturing stdout.
//! Entities follow one pattern: a header line with a positional index and
//! title, then indented context lines.
//!
//! # Output Format
//!
//! ## Browse
//!
//! ```text
//! Search "monet" (page 2 of 41, 40 artworks)
//! 001 Water Lilies [27992] ♥
//!     Claude Monet
//!     1906 · Oil on canvas
//!     Image: https://www.artic.edu/iiif/2/3c27.../full/843,/0/default.jpg
//! ...
//! More pages available
//! ```
//!
//! ## Details
//!
//! ```text
//! Water Lilies [27992]
//!     Artist: Claude Monet
//!     Date: 1906
//!     Medium: Oil on canvas
//!     ...
//! ```
//!
//! ## Layout
//!
//! ```text
//! Layout 1100px: 4 columns of 260px, height 1843px
//! 001 Water Lilies  x=0 y=0 w=260
//! 002 Nighthawks    x=280 y=0 w=260
//! ```

use crate::favorites::Favorites;
use crate::feed::FeedState;
use crate::layout::MasonryLayout;
use crate::rest::CacheStats;
use crate::text::truncate;
use crate::types::{ArtworkCard, ArtworkDetails};

const DESCRIPTION_MAX: usize = 280;
const FAVORITE_MARK: &str = "\u{2665}";

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as zero-padded 3-digit string.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Indentation string for the given depth (4 spaces per level).
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Header line: `001 Title [id]`, with a heart for favorites.
fn card_header(index: usize, card: &ArtworkCard, favorite: bool) -> String {
    let mark = if favorite {
        format!(" {FAVORITE_MARK}")
    } else {
        String::new()
    };
    format!("{} {} [{}]{}", format_index(index), card.title, card.id, mark)
}

fn card_lines(index: usize, card: &ArtworkCard, favorite: bool) -> Vec<String> {
    let mut lines = vec![card_header(index, card, favorite)];
    lines.push(format!("{}{}", indent(1), card.artist));
    if !card.subtitle.is_empty() {
        lines.push(format!("{}{}", indent(1), card.subtitle));
    }
    if !card.image_url.is_empty() {
        lines.push(format!("{}Image: {}", indent(1), card.image_url));
    }
    lines
}

fn plural(count: usize, one: &str, many: &str) -> String {
    if count == 1 {
        format!("{count} {one}")
    } else {
        format!("{count} {many}")
    }
}

// ============================================================================
// Browse
// ============================================================================

pub fn format_feed_state(state: &FeedState<ArtworkCard>, favorites: &Favorites) -> Vec<String> {
    let title = if state.query.is_empty() {
        "Artworks".to_string()
    } else {
        format!("Search \"{}\"", state.query)
    };

    if state.initial_loading {
        return vec![format!("{title} (loading)")];
    }

    let mut lines = vec![format!(
        "{title} (page {} of {}, {})",
        state.current_page,
        state.total_pages,
        plural(state.items.len(), "artwork", "artworks")
    )];

    if state.is_empty_result() {
        lines.push(format!("{}No artworks found", indent(1)));
    }

    for (i, card) in state.items.iter().enumerate() {
        lines.extend(card_lines(i + 1, card, favorites.is_favorite(card.id)));
    }

    if let Some(error) = &state.error {
        lines.push(format!("Error: {error}"));
    }
    if state.has_more {
        lines.push("More pages available".to_string());
    }
    lines
}

pub fn print_feed_state(state: &FeedState<ArtworkCard>, favorites: &Favorites) {
    for line in format_feed_state(state, favorites) {
        println!("{line}");
    }
}

pub fn format_cache_stats(stats: &CacheStats) -> String {
    format!("Cache: {stats}")
}

// ============================================================================
// Details
// ============================================================================

pub fn format_details(details: &ArtworkDetails, favorite: bool) -> Vec<String> {
    let mark = if favorite {
        format!(" {FAVORITE_MARK}")
    } else {
        String::new()
    };
    let mut lines = vec![format!("{} [{}]{}", details.title, details.id, mark)];

    let fields = [
        ("Artist", details.artist.as_str()),
        ("Date", details.year.as_str()),
        ("Medium", details.medium.as_str()),
        ("Dimensions", details.dimensions.as_str()),
        ("Collection", details.collection.as_str()),
        ("Categories", details.categories.as_str()),
        ("Image", details.image_url.as_str()),
        ("Museum page", details.museum_url.as_str()),
    ];
    for (label, value) in fields {
        if !value.is_empty() {
            lines.push(format!("{}{label}: {value}", indent(1)));
        }
    }
    if !details.description.is_empty() {
        lines.push(format!(
            "{}Description: {}",
            indent(1),
            truncate(details.description.trim(), DESCRIPTION_MAX)
        ));
    }
    lines
}

pub fn print_details(details: &ArtworkDetails, favorite: bool) {
    for line in format_details(details, favorite) {
        println!("{line}");
    }
}

// ============================================================================
// Layout
// ============================================================================

pub fn format_layout(width: f64, layout: &MasonryLayout, cards: &[ArtworkCard]) -> Vec<String> {
    let mut lines = vec![format!(
        "Layout {width}px: {} of {}px, height {}px",
        plural(layout.columns.count, "column", "columns"),
        layout.columns.width.round(),
        layout.height.round()
    )];
    for (i, (placement, card)) in layout.placements.iter().zip(cards).enumerate() {
        lines.push(format!(
            "{} {}  x={} y={} w={}",
            format_index(i + 1),
            card.title,
            placement.x.round(),
            placement.y.round(),
            placement.width.round()
        ));
    }
    lines
}

pub fn print_layout(width: f64, layout: &MasonryLayout, cards: &[ArtworkCard]) {
    for line in format_layout(width, layout, cards) {
        println!("{line}");
    }
}

// ============================================================================
// Favorites
// ============================================================================

pub fn format_favorites(favorites: &Favorites) -> Vec<String> {
    let mut lines = vec![format!(
        "Favorites ({})",
        plural(favorites.count(), "artwork", "artworks")
    )];
    if favorites.is_empty() {
        lines.push(format!("{}No favorites yet", indent(1)));
    }
    for (i, card) in favorites.items().iter().enumerate() {
        lines.extend(card_lines(i + 1, card, false));
    }
    lines
}

pub fn print_favorites(favorites: &Favorites) {
    for line in format_favorites(favorites) {
        println!("{line}");
    }
}

pub fn format_favorite_toggle(card: &ArtworkCard, added: bool) -> String {
    if added {
        format!("Added {} [{}] to favorites", card.title, card.id)
    } else {
        format!("Removed {} [{}] from favorites", card.title, card.id)
    }
}
