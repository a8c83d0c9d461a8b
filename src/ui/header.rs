//! Collapsing header widget: greeting, avatar and the floating search bar.
//!
//! ## Architecture
//!
//! * **Geometry** (`HeaderLayout`, `header_layout`): pure cell layout
//!   derived from [`HeaderGeometry`], shared between the widget (rendering)
//!   and the input handler (hit-testing).
//! * **Widget** (`HeaderWidget`): paints a [`HeaderNode`] into the buffer.

use image::RgbaImage;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};

use crate::core::header::{
    HeaderElement, HeaderGeometry, HeaderNode, AVATAR_SIZE, GREETING, SEARCH_BAR_CORNER_RADIUS,
    SEARCH_BAR_SPACING_BOTTOM, SEARCH_BAR_SPACING_TOP, SEARCH_BAR_VERTICAL_PADDING,
    TITLE_TOP_PADDING,
};
use crate::ui::halfblock::{self, Mask};
use crate::ui::layout::{clip, CellScale};
use crate::ui::theme::Theme;

/// Horizontal inset of the title row (units).
const TITLE_HORIZONTAL_PADDING: f32 = 15.0;

const MAGNIFIER: &str = "⌕ ";
const MICROPHONE: &str = "🎤";

// ─── geometry ───────────────────────────────────────────────────

/// Cell rectangles of every header part, clipped to the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeaderLayout {
    pub area: Rect,
    pub title: Rect,
    pub profile: Rect,
    pub search_background: Rect,
    pub search_bar: Rect,
    pub microphone: Rect,
}

/// Rows of the search bar box: one text line with the vertical padding
/// above and below it.  The border always takes at least one row of each.
pub fn search_bar_rows(scale: CellScale) -> i32 {
    1 + 2 * scale.rows(SEARCH_BAR_VERTICAL_PADDING).max(1)
}

/// Rows the header occupies in the scroll content for `geometry`.
pub fn header_rows(geometry: &HeaderGeometry, scale: CellScale) -> i32 {
    scale.rows(TITLE_TOP_PADDING)
        + scale.rows(geometry.title_height)
        + scale.rows(geometry.title_bottom_padding)
        + scale.rows(SEARCH_BAR_SPACING_TOP)
        + search_bar_rows(scale)
        + scale.rows(SEARCH_BAR_SPACING_BOTTOM)
}

/// Lay out the header inside `viewport`.  `min_y` is the header's leading
/// edge relative to the scroll surface (see [`crate::core::progress::ScrollState::min_y`]).
pub fn header_layout(
    geometry: &HeaderGeometry,
    scale: CellScale,
    viewport: Rect,
    min_y: f32,
) -> HeaderLayout {
    let vx = viewport.x as i32;
    let vw = viewport.width as i32;
    let top = viewport.y as i32 + scale.rows(min_y + geometry.header_y_offset);

    let title_top = top + scale.rows(TITLE_TOP_PADDING);
    let title_h = scale.rows(geometry.title_height);
    let title_pad = scale.cols(TITLE_HORIZONTAL_PADDING);
    let title_bounds = clip(vx, title_top, vw, title_h, viewport);
    let title = clip(
        vx + title_pad,
        title_top + scale.rows(geometry.title_y_offset),
        vw - 2 * title_pad,
        title_h,
        title_bounds,
    );

    let avatar_rows = scale.rows(AVATAR_SIZE).max(1);
    let avatar_cols = avatar_rows * 2;
    let profile = clip(
        vx + vw - title_pad - avatar_cols,
        title.bottom() as i32 - avatar_rows,
        avatar_cols,
        avatar_rows,
        title,
    );

    let bar_top = title_top
        + title_h
        + scale.rows(geometry.title_bottom_padding)
        + scale.rows(SEARCH_BAR_SPACING_TOP);
    let bar_pad = scale.cols(geometry.search_bar_horizontal_padding);
    let bar_rows = search_bar_rows(scale);
    let search_bar = clip(vx + bar_pad, bar_top, vw - 2 * bar_pad, bar_rows, viewport);

    let bottom = bar_top + bar_rows + scale.rows(SEARCH_BAR_SPACING_BOTTOM);
    let area = clip(vx, top, vw, bottom - top, viewport);

    let extension = scale.rows(-geometry.search_bar_top_inset).max(0);
    let bg_top = (bar_top - extension).max(top);
    let search_background = clip(
        vx + bar_pad,
        bg_top,
        vw - 2 * bar_pad,
        bar_top + bar_rows - bg_top,
        viewport,
    );

    // Two-cell glyph, one cell of padding inside the right border.
    let microphone = clip(
        search_bar.right() as i32 - 4,
        bar_top + bar_rows / 2,
        2,
        1,
        search_bar,
    );

    HeaderLayout {
        area,
        title,
        profile,
        search_background,
        search_bar,
        microphone,
    }
}

// ─── widget ─────────────────────────────────────────────────────

pub struct HeaderWidget<'a> {
    pub node: &'a HeaderNode,
    pub layout: HeaderLayout,
    pub user_name: &'a str,
    pub avatar: Option<&'a RgbaImage>,
}

impl<'a> Widget for HeaderWidget<'a> {
    fn render(self, _area: Rect, buf: &mut Buffer) {
        let g = &self.node.geometry;
        let layout = self.layout;
        if layout.area.area() == 0 {
            return;
        }

        buf.set_style(layout.area, Theme::backdrop_style(g.blur_radius));

        if g.title_opacity > 0.02 && layout.title.area() > 0 {
            self.render_title(buf);
        }

        for element in &self.node.elements {
            match element {
                HeaderElement::SearchInput {
                    text,
                    placeholder,
                    focused,
                } => render_search_bar(g, &layout, text, placeholder, *focused, buf),
                HeaderElement::MicrophoneButton => {
                    if layout.microphone.area() > 0 {
                        Paragraph::new(Span::styled(MICROPHONE, Theme::microphone_style()))
                            .render(layout.microphone, buf);
                    }
                }
                HeaderElement::ProfileButton => {}
            }
        }
    }
}

impl<'a> HeaderWidget<'a> {
    /// Greeting and name stacked against the bottom edge of the title row,
    /// avatar on the right.
    fn render_title(&self, buf: &mut Buffer) {
        let g = &self.node.geometry;
        let title = self.layout.title;
        let profile = self.layout.profile;

        let text_width = title.width.saturating_sub(profile.width + 1);
        let lines = [
            Line::from(Span::styled(GREETING, Theme::greeting_style(g.title_opacity))),
            Line::from(Span::styled(
                self.user_name.to_string(),
                Theme::name_style(g.title_opacity),
            )),
        ];
        for (i, line) in lines.iter().rev().enumerate() {
            let Some(y) = title.bottom().checked_sub(1 + i as u16) else {
                break;
            };
            if y < title.y {
                break;
            }
            buf.set_line(title.x, y, line, text_width);
        }

        let has_profile_button = self
            .node
            .elements
            .iter()
            .any(|e| matches!(e, HeaderElement::ProfileButton));
        if !has_profile_button || profile.area() == 0 {
            return;
        }
        match self.avatar {
            Some(img) if g.title_opacity > 0.5 => {
                halfblock::render_fill(img, profile, Mask::Circle, buf)
            }
            _ => {
                let initials = initials(self.user_name);
                let y = profile.y + profile.height / 2;
                let label = format!("{initials:^width$}", width = profile.width as usize);
                buf.set_stringn(
                    profile.x,
                    y,
                    label,
                    profile.width as usize,
                    Theme::avatar_style(g.title_opacity),
                );
            }
        }
    }
}

fn render_search_bar(
    g: &HeaderGeometry,
    layout: &HeaderLayout,
    text: &str,
    placeholder: &str,
    focused: bool,
    buf: &mut Buffer,
) {
    if layout.search_bar.area() == 0 {
        return;
    }
    buf.set_style(layout.search_background, Theme::search_bg_style());

    let border_type = if g.search_bar_corner_radius >= SEARCH_BAR_CORNER_RADIUS / 2.0 {
        BorderType::Rounded
    } else {
        BorderType::Plain
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(Theme::search_border_style(focused))
        .style(Theme::search_bg_style());
    let inner = block.inner(layout.search_bar);
    block.render(layout.search_bar, buf);
    if inner.width < 2 || inner.height == 0 {
        return;
    }

    let field_width = inner
        .width
        .saturating_sub(layout.microphone.width + 2)
        .max(1) as usize;
    let mut spans = vec![Span::styled(MAGNIFIER, Theme::search_bg_style())];
    if text.is_empty() && !focused {
        spans.push(Span::styled(placeholder.to_string(), Theme::placeholder_style()));
    } else {
        // Keep the end of the text (where the caret is) in view.
        let budget = field_width.saturating_sub(MAGNIFIER.chars().count() + 1);
        let visible: String = {
            let count = text.chars().count();
            text.chars().skip(count.saturating_sub(budget)).collect()
        };
        spans.push(Span::styled(visible, Theme::search_bg_style()));
        if focused {
            spans.push(Span::styled(" ", Theme::caret_style()));
        }
    }
    let text_row = inner.y + inner.height.saturating_sub(1) / 2;
    buf.set_line(inner.x + 1, text_row, &Line::from(spans), field_width as u16);
}

fn initials(name: &str) -> String {
    let mut out: String = name
        .split_whitespace()
        .filter_map(|w| w.chars().next())
        .take(2)
        .collect();
    if out.is_empty() {
        out.push('?');
    }
    out.to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::header::{render, HeaderGeometry};

    const VIEW: Rect = Rect {
        x: 0,
        y: 0,
        width: 60,
        height: 20,
    };

    fn scale() -> CellScale {
        CellScale::new(15.0)
    }

    fn row_text(buf: &Buffer, y: u16) -> String {
        (buf.area.x..buf.area.right())
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn search_bar_height_follows_vertical_padding() {
        assert_eq!(search_bar_rows(scale()), 3);
        assert_eq!(search_bar_rows(CellScale::new(40.0)), 3);

        let fine = CellScale::new(5.0);
        assert_eq!(search_bar_rows(fine), 5);
        let tall = Rect::new(0, 0, 60, 40);
        let layout = header_layout(&HeaderGeometry::new(0.0, false), fine, tall, 0.0);
        assert_eq!(layout.search_bar.height, 5);
        assert_eq!(layout.microphone.y, layout.search_bar.y + 2);
    }

    #[test]
    fn expanded_header_stacks_title_above_search() {
        let g = HeaderGeometry::new(0.0, false);
        let l = header_layout(&g, scale(), VIEW, 0.0);
        assert_eq!(header_rows(&g, scale()), 10);
        assert_eq!(l.area, Rect::new(0, 0, 60, 10));
        assert_eq!(l.title, Rect::new(2, 1, 56, 4));
        assert_eq!(l.search_bar, Rect::new(2, 6, 56, 3));
        assert_eq!(l.profile, Rect::new(52, 2, 6, 3));
        assert_eq!(l.microphone, Rect::new(54, 7, 2, 1));
    }

    #[test]
    fn collapsed_header_hides_title() {
        let g = HeaderGeometry::new(1.0, false);
        let l = header_layout(&g, scale(), VIEW, 0.0);
        assert_eq!(l.title.area(), 0);
        assert_eq!(l.search_bar, Rect::new(2, 1, 56, 3));
        assert_eq!(header_rows(&g, scale()), 5);
    }

    #[test]
    fn focused_search_bar_spans_full_width() {
        let g = HeaderGeometry::new(0.2, true);
        let l = header_layout(&g, scale(), VIEW, 0.0);
        assert_eq!(l.search_bar.x, 0);
        assert_eq!(l.search_bar.width, 60);
        // The background bleeds up to the top of the header.
        assert_eq!(l.search_background.y, 0);
    }

    #[test]
    fn pinned_header_stays_at_top_while_scrolling() {
        let g = HeaderGeometry::new(1.0, false).pinned(-200.0, false);
        let l = header_layout(&g, scale(), VIEW, -200.0);
        assert_eq!(l.area.y, 0);
        assert_eq!(l.search_bar.y, 1);
    }

    #[test]
    fn overscroll_moves_unfocused_header_down() {
        let g = HeaderGeometry::new(0.0, false).pinned(30.0, false);
        let l = header_layout(&g, scale(), VIEW, 30.0);
        assert_eq!(l.area.y, 2);
        let g = HeaderGeometry::new(0.0, true).pinned(30.0, true);
        let l = header_layout(&g, scale(), VIEW, 30.0);
        assert_eq!(l.area.y, 0);
    }

    #[test]
    fn renders_greeting_name_and_placeholder() {
        let node = render(0.0, false, "");
        let layout = header_layout(&node.geometry, scale(), VIEW, 0.0);
        let mut buf = Buffer::empty(VIEW);
        HeaderWidget {
            node: &node,
            layout,
            user_name: "Ada Lovelace",
            avatar: None,
        }
        .render(VIEW, &mut buf);

        assert!(row_text(&buf, 3).contains(GREETING));
        assert!(row_text(&buf, 4).contains("Ada Lovelace"));
        assert!(row_text(&buf, 3).contains("AL"));
        assert!(row_text(&buf, 7).contains("Search Photos"));
        assert_eq!(buf[(2u16, 6u16)].symbol(), "╭");
    }

    #[test]
    fn focused_bar_shows_text_with_square_corners() {
        let node = render(0.0, true, "sunset");
        let layout = header_layout(&node.geometry, scale(), VIEW, 0.0);
        let mut buf = Buffer::empty(VIEW);
        HeaderWidget {
            node: &node,
            layout,
            user_name: "Ada",
            avatar: None,
        }
        .render(VIEW, &mut buf);

        let bar = layout.search_bar;
        assert_eq!(buf[(bar.x, bar.y)].symbol(), "┌");
        let text_row = row_text(&buf, bar.y + 1);
        assert!(text_row.contains("sunset"));
        assert!(!text_row.contains("Search Photos"));
        assert!(!row_text(&buf, 0).contains("Ada"));
    }

    #[test]
    fn initials_fall_back() {
        assert_eq!(initials("grace hopper"), "GH");
        assert_eq!(initials(""), "?");
    }
}
