//! Pure masonry calculations: breakpoints, column widths and packing.
//!
//! Items are placed in order into whichever column is currently shortest
//! (lowest index wins ties):
//!
//! ```text
//!  width 700, 2 columns, gap 20 → column width 340
//!
//!  ┌──────────┐  ┌──────────┐
//!  │ 0  h=200 │  │ 1  h=100 │      item 2 goes to column 1
//!  │          │  └──────────┘      (accumulators 220 vs 120)
//!  │          │  ┌──────────┐
//!  └──────────┘  │ 2  h=50  │
//!                └──────────┘
//!  reported height = max(220, 190) − 20 = 200
//! ```
//!
//! No function in this module fails: widths that cannot hold a layout
//! (zero, negative, NaN or infinite) collapse to a single zero-width column.

/// Gap between columns and between stacked items.
pub const DEFAULT_GAP: f64 = 20.0;

/// Minimum container width for a column count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoint {
    pub min_width: f64,
    pub columns: usize,
}

/// Breakpoint table, kept sorted widest first.
#[derive(Debug, Clone, PartialEq)]
pub struct Breakpoints(Vec<Breakpoint>);

impl Breakpoints {
    /// Build a table from `(min_width, columns)` pairs in any order.
    ///
    /// Zero column counts are raised to 1.
    pub fn new(pairs: impl IntoIterator<Item = (f64, usize)>) -> Self {
        let mut table: Vec<Breakpoint> = pairs
            .into_iter()
            .map(|(min_width, columns)| Breakpoint {
                min_width,
                columns: columns.max(1),
            })
            .collect();
        table.sort_by(|a, b| b.min_width.total_cmp(&a.min_width));
        Self(table)
    }

    pub fn as_slice(&self) -> &[Breakpoint] {
        &self.0
    }

    /// Column count for a container width: the first breakpoint (widest
    /// first) with `width >= min_width`, or 1 when none matches.
    pub fn columns_for(&self, width: f64) -> usize {
        if !is_usable_width(width) {
            return 1;
        }
        self.0
            .iter()
            .find(|bp| width >= bp.min_width)
            .map_or(1, |bp| bp.columns)
    }
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self::new([(1024.0, 4), (768.0, 3), (640.0, 2), (0.0, 1)])
    }
}

/// Breakpoints and gap for a grid.
#[derive(Debug, Clone, PartialEq)]
pub struct MasonryConfig {
    pub gap: f64,
    pub breakpoints: Breakpoints,
}

impl Default for MasonryConfig {
    fn default() -> Self {
        Self {
            gap: DEFAULT_GAP,
            breakpoints: Breakpoints::default(),
        }
    }
}

impl MasonryConfig {
    /// Column count and width for a container width.
    pub fn columns(&self, width: f64) -> ColumnSpec {
        if !is_usable_width(width) {
            return ColumnSpec {
                count: 1,
                width: 0.0,
            };
        }
        let count = self.breakpoints.columns_for(width);
        ColumnSpec {
            count,
            width: column_width(width, count, self.gap),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnSpec {
    pub count: usize,
    pub width: f64,
}

/// Where one item goes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
}

/// Result of one layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct MasonryLayout {
    pub columns: ColumnSpec,
    pub placements: Vec<Placement>,
    /// Container height: tallest column minus the trailing gap, 0 when empty.
    pub height: f64,
}

impl MasonryLayout {
    /// Layout for a width that can't hold columns: everything at the origin.
    pub fn collapsed(items: usize) -> Self {
        Self {
            columns: ColumnSpec {
                count: 1,
                width: 0.0,
            },
            placements: vec![
                Placement {
                    x: 0.0,
                    y: 0.0,
                    width: 0.0,
                };
                items
            ],
            height: 0.0,
        }
    }
}

pub fn is_usable_width(width: f64) -> bool {
    width.is_finite() && width > 0.0
}

/// `(width − gap·(columns − 1)) / columns`, never negative.
pub fn column_width(width: f64, columns: usize, gap: f64) -> f64 {
    let columns = columns.max(1) as f64;
    ((width - gap * (columns - 1.0)) / columns).max(0.0)
}

/// Index of the shortest accumulator; the lowest index wins ties.
pub fn shortest_column(accumulators: &[f64]) -> usize {
    let mut best = 0;
    for (i, height) in accumulators.iter().enumerate().skip(1) {
        if *height < accumulators[best] {
            best = i;
        }
    }
    best
}

/// Greedily pack items of the given heights into `columns`.
pub fn pack(heights: &[f64], columns: ColumnSpec, gap: f64) -> MasonryLayout {
    let count = columns.count.max(1);
    let mut accumulators = vec![0.0_f64; count];
    let placements = heights
        .iter()
        .map(|height| {
            let col = shortest_column(&accumulators);
            let placement = Placement {
                x: col as f64 * (columns.width + gap),
                y: accumulators[col],
                width: columns.width,
            };
            accumulators[col] += height + gap;
            placement
        })
        .collect();

    let height = if heights.is_empty() {
        0.0
    } else {
        accumulators.iter().copied().fold(0.0, f64::max) - gap
    };

    MasonryLayout {
        columns: ColumnSpec {
            count,
            width: columns.width,
        },
        placements,
        height,
    }
}
