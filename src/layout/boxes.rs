//! In-memory [`MasonryContainer`] of measurable boxes.

use super::engine::MasonryContainer;
use crate::types::ArtworkCard;

/// How a box measures its height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoxSizing {
    /// Height independent of width.
    Fixed(f64),
    /// Height scales with the assigned width.
    Aspect { width: f64, height: f64 },
}

impl BoxSizing {
    /// Sizing for a card: its thumbnail aspect when known, `fallback` height otherwise.
    pub fn for_card(card: &ArtworkCard, fallback: f64) -> Self {
        match card.aspect() {
            Some((w, h)) => Self::Aspect {
                width: f64::from(w),
                height: f64::from(h),
            },
            None => Self::Fixed(fallback),
        }
    }
}

/// A positioned box.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxItem {
    pub sizing: BoxSizing,
    pub width: f64,
    pub x: f64,
    pub y: f64,
}

impl BoxItem {
    pub fn height(&self) -> f64 {
        match self.sizing {
            BoxSizing::Fixed(h) => h,
            BoxSizing::Aspect { width, height } if width > 0.0 => self.width * height / width,
            BoxSizing::Aspect { .. } => 0.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoxContainer {
    width: f64,
    height: f64,
    items: Vec<BoxItem>,
}

impl BoxContainer {
    pub fn new(width: f64) -> Self {
        Self {
            width,
            ..Self::default()
        }
    }

    /// Container with one box per card.
    pub fn from_cards(width: f64, cards: &[ArtworkCard], fallback_height: f64) -> Self {
        let mut container = Self::new(width);
        for card in cards {
            container.push(BoxSizing::for_card(card, fallback_height));
        }
        container
    }

    pub fn push(&mut self, sizing: BoxSizing) {
        self.items.push(BoxItem {
            sizing,
            width: 0.0,
            x: 0.0,
            y: 0.0,
        });
    }

    pub fn set_width(&mut self, width: f64) {
        self.width = width;
    }

    pub fn items(&self) -> &[BoxItem] {
        &self.items
    }

    /// Height reported by the last layout pass.
    pub fn height(&self) -> f64 {
        self.height
    }
}

impl MasonryContainer for BoxContainer {
    fn width(&self) -> f64 {
        self.width
    }

    fn item_count(&self) -> usize {
        self.items.len()
    }

    fn set_item_width(&mut self, index: usize, width: f64) {
        if let Some(item) = self.items.get_mut(index) {
            item.width = width;
        }
    }

    fn item_height(&self, index: usize) -> f64 {
        self.items.get(index).map_or(0.0, BoxItem::height)
    }

    fn set_item_offset(&mut self, index: usize, x: f64, y: f64) {
        if let Some(item) = self.items.get_mut(index) {
            item.x = x;
            item.y = y;
        }
    }

    fn set_height(&mut self, height: f64) {
        self.height = height;
    }
}
