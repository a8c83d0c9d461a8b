//! Collapsing header geometry.
//!
//! Everything here is a pure function of the collapse progress and the
//! search field's focus state.  The result is a plain description
//! ([`HeaderNode`]) that the UI layer turns into terminal cells; it is
//! rebuilt every frame and never mutated in place.

use super::progress::COLLAPSE_DISTANCE;

// ─── reference geometry (distance units) ────────────────────────

pub const TITLE_HEIGHT: f32 = 60.0;
pub const TITLE_TOP_PADDING: f32 = 15.0;
pub const TITLE_BOTTOM_PADDING: f32 = 15.0;
/// How far the title row drifts upward while fading out.
pub const TITLE_LIFT: f32 = 10.0;
pub const SEARCH_BAR_CORNER_RADIUS: f32 = 30.0;
pub const SEARCH_BAR_HORIZONTAL_PADDING: f32 = 15.0;
pub const SEARCH_BAR_VERTICAL_PADDING: f32 = 12.0;
pub const SEARCH_BAR_SPACING_TOP: f32 = 5.0;
pub const SEARCH_BAR_SPACING_BOTTOM: f32 = 10.0;
/// Extra background drawn above a focused search bar so it bleeds under
/// the top edge of the screen.
pub const FOCUSED_BACKGROUND_EXTENSION: f32 = 100.0;
pub const BLUR_RADIUS: f32 = 10.0;
pub const AVATAR_SIZE: f32 = 40.0;

pub const GREETING: &str = "Welcome Back!";
pub const SEARCH_PLACEHOLDER: &str = "Search Photos";

/// Progress after the focus override: a focused search field always shows
/// the fully collapsed header.
pub fn effective_progress(progress: f32, focused: bool) -> f32 {
    if focused {
        1.0
    } else {
        progress.clamp(0.0, 1.0)
    }
}

/// Vertical offset that keeps the header pinned to the top of the scroll
/// surface.
///
/// `min_y` is the header's leading edge relative to the surface.  Upward
/// scroll (`min_y <= 0`) is cancelled 1:1.  Pulling the content down past
/// rest lets the header travel with it, unless the search field is focused.
pub fn header_offset(min_y: f32, focused: bool) -> f32 {
    if min_y > 0.0 {
        if focused {
            -min_y
        } else {
            0.0
        }
    } else {
        -min_y
    }
}

// ─── header geometry ────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeaderGeometry {
    pub title_height: f32,
    pub title_opacity: f32,
    pub title_y_offset: f32,
    pub title_bottom_padding: f32,
    pub search_bar_corner_radius: f32,
    /// Top inset of the search bar's background.  Negative values extend
    /// the background above the bar.
    pub search_bar_top_inset: f32,
    pub search_bar_horizontal_padding: f32,
    pub blur_radius: f32,
    pub header_y_offset: f32,
}

impl HeaderGeometry {
    /// Geometry for a given progress and focus state.  `header_y_offset` is
    /// left at zero; see [`HeaderGeometry::pinned`].
    pub fn new(progress: f32, focused: bool) -> Self {
        let p = effective_progress(progress, focused);
        let remaining = 1.0 - p;
        Self {
            title_height: TITLE_HEIGHT * remaining,
            title_opacity: remaining,
            title_y_offset: -TITLE_LIFT * p,
            title_bottom_padding: TITLE_BOTTOM_PADDING * remaining,
            search_bar_corner_radius: if focused { 0.0 } else { SEARCH_BAR_CORNER_RADIUS },
            search_bar_top_inset: if focused { -FOCUSED_BACKGROUND_EXTENSION } else { 0.0 },
            search_bar_horizontal_padding: if focused {
                0.0
            } else {
                SEARCH_BAR_HORIZONTAL_PADDING
            },
            blur_radius: if focused { 0.0 } else { BLUR_RADIUS * remaining },
            header_y_offset: 0.0,
        }
    }

    /// Apply the pinning offset for a header whose leading edge sits at `min_y`.
    pub fn pinned(mut self, min_y: f32, focused: bool) -> Self {
        self.header_y_offset = header_offset(min_y, focused);
        self
    }

    /// Field-wise linear blend; `t = 0` gives `self`, `t = 1` gives `other`.
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: f32, b: f32| a * (1.0 - t) + b * t;
        Self {
            title_height: mix(self.title_height, other.title_height),
            title_opacity: mix(self.title_opacity, other.title_opacity),
            title_y_offset: mix(self.title_y_offset, other.title_y_offset),
            title_bottom_padding: mix(self.title_bottom_padding, other.title_bottom_padding),
            search_bar_corner_radius: mix(
                self.search_bar_corner_radius,
                other.search_bar_corner_radius,
            ),
            search_bar_top_inset: mix(self.search_bar_top_inset, other.search_bar_top_inset),
            search_bar_horizontal_padding: mix(
                self.search_bar_horizontal_padding,
                other.search_bar_horizontal_padding,
            ),
            blur_radius: mix(self.blur_radius, other.blur_radius),
            header_y_offset: mix(self.header_y_offset, other.header_y_offset),
        }
    }
}

// ─── grid geometry ──────────────────────────────────────────────

/// Offset applied to the card grid so it follows the shrinking header
/// instead of sliding underneath it while the header collapses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    pub content_offset_y: f32,
    /// Padding added below the grid so the content height stays constant.
    pub bottom_padding: f32,
}

impl GridGeometry {
    pub fn new(progress: f32, focused: bool) -> Self {
        let shift = if focused {
            0.0
        } else {
            progress.clamp(0.0, 1.0) * COLLAPSE_DISTANCE
        };
        Self {
            content_offset_y: shift,
            bottom_padding: shift,
        }
    }

    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            content_offset_y: self.content_offset_y * (1.0 - t) + other.content_offset_y * t,
            bottom_padding: self.bottom_padding * (1.0 - t) + other.bottom_padding * t,
        }
    }
}

// ─── render description ─────────────────────────────────────────

/// Interactive elements emitted by the header.  Their handlers live with
/// the screen controller.
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderElement {
    ProfileButton,
    SearchInput {
        text: String,
        placeholder: &'static str,
        focused: bool,
    },
    MicrophoneButton,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderNode {
    pub geometry: HeaderGeometry,
    pub elements: Vec<HeaderElement>,
}

/// Describe the header for the current progress, focus and search text.
pub fn render(progress: f32, focused: bool, search_text: &str) -> HeaderNode {
    HeaderNode {
        geometry: HeaderGeometry::new(progress, focused),
        elements: vec![
            HeaderElement::ProfileButton,
            HeaderElement::SearchInput {
                text: search_text.to_string(),
                placeholder: SEARCH_PLACEHOLDER,
                focused,
            },
            HeaderElement::MicrophoneButton,
        ],
    }
}
