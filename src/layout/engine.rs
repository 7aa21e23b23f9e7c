//! Stateful masonry grid: coalesces layout requests into frame-aligned passes.
//!
//! The host feeds the grid three kinds of signals and delivers frames:
//!
//! | Signal | Effect |
//! |--------|--------|
//! | [`attach`](MasonryGrid::attach) | schedule the first pass |
//! | [`on_resize`](MasonryGrid::on_resize) | schedule a pass if the width changed |
//! | [`on_children_changed`](MasonryGrid::on_children_changed) | schedule a pass |
//! | [`on_frame`](MasonryGrid::on_frame) | run the pass if the token is the pending one |
//! | [`dispose`](MasonryGrid::dispose) | cancel the pending frame, ignore everything after |
//!
//! Resize and children signals are ignored before `attach`. At most one frame
//! is pending at a time, so any burst of signals between two frames costs
//! exactly one pass.

use super::masonry::{MasonryConfig, MasonryLayout, is_usable_width, pack};

/// A container whose children can be sized, measured and positioned.
pub trait MasonryContainer {
    /// Current content width.
    fn width(&self) -> f64;
    fn item_count(&self) -> usize;
    fn set_item_width(&mut self, index: usize, width: f64);
    /// Height of an item after its width has been set.
    fn item_height(&self, index: usize) -> f64;
    fn set_item_offset(&mut self, index: usize, x: f64, y: f64);
    fn set_height(&mut self, height: f64);
}

/// Identifies a requested frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameToken(pub u64);

/// Something that can deliver a callback on the next frame.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameToken;
    fn cancel_frame(&mut self, token: FrameToken);
}

/// Frame scheduler the host drains once per paint.
#[derive(Debug, Default)]
pub struct FrameQueue {
    next: u64,
    ready: Vec<FrameToken>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every frame requested since the last call.
    pub fn take_ready(&mut self) -> Vec<FrameToken> {
        std::mem::take(&mut self.ready)
    }

    pub fn pending(&self) -> usize {
        self.ready.len()
    }
}

impl FrameScheduler for FrameQueue {
    fn request_frame(&mut self) -> FrameToken {
        self.next += 1;
        let token = FrameToken(self.next);
        self.ready.push(token);
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        self.ready.retain(|t| *t != token);
    }
}

/// Masonry layout driver over a container and a frame scheduler.
pub struct MasonryGrid<C, S> {
    container: C,
    scheduler: S,
    config: MasonryConfig,
    observed_width: Option<f64>,
    pending: Option<FrameToken>,
    attached: bool,
    disposed: bool,
    layout: Option<MasonryLayout>,
    passes: u64,
}

impl<C: MasonryContainer, S: FrameScheduler> MasonryGrid<C, S> {
    pub fn new(container: C, scheduler: S, config: MasonryConfig) -> Self {
        Self {
            container,
            scheduler,
            config,
            observed_width: None,
            pending: None,
            attached: false,
            disposed: false,
            layout: None,
            passes: 0,
        }
    }

    pub fn container(&self) -> &C {
        &self.container
    }

    /// Mutable access for the host; follow changes with the matching signal.
    pub fn container_mut(&mut self) -> &mut C {
        &mut self.container
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn config(&self) -> &MasonryConfig {
        &self.config
    }

    /// Result of the last pass.
    pub fn layout(&self) -> Option<&MasonryLayout> {
        self.layout.as_ref()
    }

    /// Number of passes run so far.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    pub fn has_pending_frame(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Start observing the container.
    pub fn attach(&mut self) {
        if self.disposed {
            return;
        }
        self.attached = true;
        self.observed_width = Some(self.container.width());
        self.schedule();
    }

    /// The container was resized to `width`. Ignored before [`attach`](Self::attach).
    pub fn on_resize(&mut self, width: f64) {
        if !self.is_observing() || self.observed_width == Some(width) {
            return;
        }
        self.observed_width = Some(width);
        self.schedule();
    }

    /// Children were added, removed or reordered.
    pub fn on_children_changed(&mut self) {
        if !self.is_observing() {
            return;
        }
        self.schedule();
    }

    /// Deliver a frame. Returns whether a pass ran.
    pub fn on_frame(&mut self, token: FrameToken) -> bool {
        if self.disposed || self.pending != Some(token) {
            return false;
        }
        self.pending = None;
        self.run_pass();
        true
    }

    /// Stop for good, cancelling any pending frame.
    pub fn dispose(&mut self) {
        if let Some(token) = self.pending.take() {
            self.scheduler.cancel_frame(token);
        }
        self.disposed = true;
    }

    fn is_observing(&self) -> bool {
        self.attached && !self.disposed
    }

    fn schedule(&mut self) {
        if self.pending.is_none() {
            self.pending = Some(self.scheduler.request_frame());
        }
    }

    fn run_pass(&mut self) {
        let width = self.container.width();
        let count = self.container.item_count();

        let layout = if is_usable_width(width) {
            let columns = self.config.columns(width);
            for i in 0..count {
                self.container.set_item_width(i, columns.width);
            }
            let heights: Vec<f64> = (0..count).map(|i| self.container.item_height(i)).collect();
            pack(&heights, columns, self.config.gap)
        } else {
            for i in 0..count {
                self.container.set_item_width(i, 0.0);
            }
            MasonryLayout::collapsed(count)
        };

        for (i, placement) in layout.placements.iter().enumerate() {
            self.container.set_item_offset(i, placement.x, placement.y);
        }
        self.container.set_height(layout.height);

        self.passes += 1;
        tracing::debug!(
            width,
            items = count,
            columns = layout.columns.count,
            height = layout.height,
            "masonry pass"
        );
        self.layout = Some(layout);
    }
}

impl<C: MasonryContainer> MasonryGrid<C, FrameQueue> {
    /// Deliver every queued frame. Returns the number of passes run.
    pub fn run_frames(&mut self) -> usize {
        let tokens = self.scheduler.take_ready();
        tokens.into_iter().filter(|t| self.on_frame(*t)).count()
    }
}
