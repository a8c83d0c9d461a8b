//! Central application state, owned by the screen controller.
//!
//! All mutable state lives here so that rendering can be a pure function of
//! `&AppState` and event handling a set of mutations on `&mut AppState`.
//! Every mutation that changes what is on screen sets `dirty`; the main loop
//! only redraws when it is set.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use image::RgbaImage;
use ratatui::layout::Rect;

use crate::app::image_runtime::ImageUpdate;
use crate::config::AppConfig;
use crate::core::{
    header::{GridGeometry, HeaderGeometry},
    item::Item,
    progress::ScrollState,
    snap::snap_target,
    transition::FocusTransition,
};
use crate::ui::{
    grid::GridMetrics,
    halfblock::CropCache,
    header::header_rows,
    layout::{AppLayout, CellScale},
    smooth_scroll::SmoothScroll,
};

/// How far the content may be pulled down past its resting position.
pub const OVERSCROLL_LIMIT: f32 = 30.0;

/// In-flight scroll gesture.
#[derive(Debug, Clone, Copy, Default)]
pub struct Gesture {
    /// Time of the last wheel/key scroll step.
    pub last_input: Option<Instant>,
    /// Row under the pointer while dragging.
    pub drag_row: Option<u16>,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameGeometry {
    pub scroll: ScrollState,
    pub progress: f32,
    pub header: HeaderGeometry,
    pub grid: GridGeometry,
}

/// Top-level application state.
pub struct AppState {
    pub items: Vec<Item>,
    pub config: AppConfig,
    /// Latest geometry reported by the scroll surface.
    pub scroll: ScrollState,
    /// Collapse progress derived from `scroll`.  Never animated.
    pub progress: f32,
    /// Whether the search field has input focus.
    pub focused: bool,
    pub search_text: String,
    pub focus_transition: FocusTransition,
    /// Post-gesture settling toward a snap target.
    pub settle: Option<SmoothScroll>,
    pub gesture: Gesture,
    /// Decoded rasters keyed by source path.
    pub image_cache: HashMap<PathBuf, Arc<RgbaImage>>,
    /// Display-size crops of `image_cache` entries.
    pub crops: CropCache,
    /// Paths whose decode failed; their cards render without an image.
    pub failed_images: HashSet<PathBuf>,
    pub avatar: Option<PathBuf>,
    /// Full terminal area, updated on every draw / resize.
    pub terminal_area: Rect,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    pub should_quit: bool,
    /// Set by any mutation that needs a redraw.
    pub dirty: bool,
    /// `true` while the last observed frame was mid focus transition.
    focus_animating: bool,
}

impl AppState {
    pub fn new(items: Vec<Item>, config: AppConfig, now: Instant) -> Self {
        Self {
            items,
            config,
            scroll: ScrollState::default(),
            progress: 0.0,
            focused: false,
            search_text: String::new(),
            focus_transition: FocusTransition::settled(false, now),
            settle: None,
            gesture: Gesture::default(),
            image_cache: HashMap::new(),
            crops: CropCache::new(),
            failed_images: HashSet::new(),
            avatar: None,
            terminal_area: Rect::default(),
            status_message: None,
            should_quit: false,
            dirty: true,
            focus_animating: false,
        }
    }

    pub fn scale(&self) -> CellScale {
        CellScale::new(self.config.units_per_row)
    }

    pub fn content_area(&self) -> Rect {
        AppLayout::from_area(self.terminal_area).content_area
    }

    pub fn grid_metrics(&self) -> GridMetrics {
        GridMetrics::new(self.scale(), self.content_area().width)
    }

    /// Largest resting offset: total content height minus the viewport.
    pub fn max_offset(&self) -> f32 {
        let scale = self.scale();
        let header = header_rows(&HeaderGeometry::new(0.0, false), scale);
        let content = header + self.grid_metrics().content_rows(self.items.len());
        let overflow = (content - self.content_area().height as i32).max(0);
        scale.units(overflow)
    }

    // ── scroll ──────────────────────────────────────────────────

    /// Scroll-geometry change from the scroll surface.  Progress tracks the
    /// offset directly.
    pub fn on_scroll_geometry_change(&mut self, scroll: ScrollState) {
        self.scroll = scroll;
        self.progress = scroll.progress();
        self.dirty = true;
    }

    fn set_raw_offset(&mut self, raw: f32) {
        let top_inset = self.scroll.top_inset;
        self.on_scroll_geometry_change(ScrollState::new(raw - top_inset, top_inset));
    }

    /// Move the content by `delta` units as part of a gesture.  Interrupts
    /// any settling animation.
    pub fn scroll_by(&mut self, delta: f32, now: Instant) {
        self.settle = None;
        let raw = (self.scroll.raw_offset() + delta).clamp(-OVERSCROLL_LIMIT, self.max_offset());
        self.set_raw_offset(raw);
        if self.gesture.drag_row.is_none() {
            self.gesture.last_input = Some(now);
        }
    }

    /// Glide to an absolute offset without going through the snap policy.
    pub fn settle_to(&mut self, target: f32) {
        let anim = SmoothScroll::new(target.clamp(0.0, self.max_offset()), self.config.settle_speed);
        tracing::debug!(target = anim.target(), "settling");
        self.gesture = Gesture::default();
        self.settle = Some(anim);
        self.dirty = true;
    }

    /// The gesture is over: pick a rest position with the snap policy and
    /// start settling toward it.
    pub fn end_gesture(&mut self) {
        let proposed = self.scroll.raw_offset();
        let target = snap_target(proposed).min(self.max_offset()).max(0.0);
        tracing::debug!(proposed, target, "gesture ended");
        self.gesture = Gesture::default();
        if target != proposed {
            self.settle = Some(SmoothScroll::new(target, self.config.settle_speed));
        }
    }

    // ── focus & text ────────────────────────────────────────────

    pub fn set_focused(&mut self, focused: bool, now: Instant) {
        if self.focused == focused {
            return;
        }
        tracing::debug!(focused, "search focus changed");
        self.focused = focused;
        self.focus_transition.retarget(focused, now);
        self.focus_animating = true;
        self.dirty = true;
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
        self.dirty = true;
    }

    pub fn push_search_char(&mut self, c: char) {
        self.search_text.push(c);
        self.dirty = true;
    }

    pub fn pop_search_char(&mut self) {
        if self.search_text.pop().is_some() {
            self.dirty = true;
        }
    }

    // ── images ──────────────────────────────────────────────────

    pub fn apply_image_update(&mut self, update: ImageUpdate) {
        match update.result {
            Ok(img) => {
                self.crops.invalidate(&update.path);
                self.image_cache.insert(update.path, Arc::new(img));
            }
            Err(e) => {
                tracing::warn!("{e}");
                self.failed_images.insert(update.path);
            }
        }
        self.dirty = true;
    }

    // ── frame ───────────────────────────────────────────────────

    /// Advance time-based behaviour: idle gesture end, snap settling and
    /// the focus transition.
    pub fn tick(&mut self, now: Instant) {
        if let (Some(last), None) = (self.gesture.last_input, self.gesture.drag_row) {
            let idle = Duration::from_millis(self.config.gesture_idle_ms);
            if now.saturating_duration_since(last) >= idle {
                self.end_gesture();
            }
        }

        if let Some(anim) = self.settle {
            let next = anim.step(self.scroll.raw_offset());
            self.set_raw_offset(next);
            if anim.is_settled(next) {
                self.settle = None;
            }
        }

        if self.focus_animating {
            // One more frame after the transition ends so it lands exactly.
            self.focus_animating = self.focus_transition.is_animating(now);
            self.dirty = true;
        }
    }

    /// Geometry for the frame at `now`, focus transition applied.
    pub fn frame_geometry(&self, now: Instant) -> FrameGeometry {
        let min_y = self.scroll.min_y();
        FrameGeometry {
            scroll: self.scroll,
            progress: self.progress,
            header: self
                .focus_transition
                .header_geometry(self.progress, min_y, now),
            grid: self.focus_transition.grid_geometry(self.progress, now),
        }
    }

    /// Screen row of the grid's top edge for `frame`.  While the header
    /// collapses the grid offset cancels the scroll, so the grid stays
    /// glued to the header's bottom edge.
    pub fn grid_top(&self, frame: &FrameGeometry) -> i32 {
        let scale = self.scale();
        self.content_area().y as i32 + header_rows(&frame.header, scale)
            + scale.rows(frame.grid.content_offset_y)
            - scale.rows(frame.scroll.raw_offset())
    }
}
