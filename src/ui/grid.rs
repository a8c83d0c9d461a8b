//! Two-column card grid.
//!
//! Each card is an aspect-filled image inside a rounded frame with a
//! one-line caption below it.  Cards are laid out in signed row coordinates
//! because the grid scrolls past the top of the viewport; every card is
//! painted into its own scratch buffer and only the visible part is copied.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use image::RgbaImage;
use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    widgets::{Block, BorderType, Borders, Widget},
};

use crate::core::item::Item;
use crate::ui::halfblock::{self, CropCache, Mask};
use crate::ui::layout::{clip, CellScale};
use crate::ui::theme::Theme;

pub const COLUMNS: i32 = 2;
pub const CARD_IMAGE_HEIGHT: f32 = 220.0;
const GRID_PADDING: f32 = 15.0;
const GRID_SPACING: f32 = 15.0;
const CAPTION_SPACING: f32 = 8.0;

// ─── geometry ───────────────────────────────────────────────────

/// Cell metrics of the grid for a given viewport width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridMetrics {
    pub pad_rows: i32,
    pub pad_cols: i32,
    pub gap_rows: i32,
    pub gap_cols: i32,
    pub image_rows: i32,
    pub caption_gap: i32,
    pub card_width: i32,
    pub card_height: i32,
}

impl GridMetrics {
    pub fn new(scale: CellScale, width: u16) -> Self {
        let pad_cols = scale.cols(GRID_PADDING);
        let gap_cols = scale.cols(GRID_SPACING);
        let image_rows = scale.rows(CARD_IMAGE_HEIGHT).max(3);
        let caption_gap = scale.rows(CAPTION_SPACING);
        let card_width = ((width as i32 - 2 * pad_cols - gap_cols) / COLUMNS).max(1);
        Self {
            pad_rows: scale.rows(GRID_PADDING),
            pad_cols,
            gap_rows: scale.rows(GRID_SPACING),
            gap_cols,
            image_rows,
            caption_gap,
            card_width,
            card_height: image_rows + caption_gap + 1,
        }
    }

    /// Rows of grid content for `count` items, paddings included.
    pub fn content_rows(&self, count: usize) -> i32 {
        let rows = (count as i32 + COLUMNS - 1) / COLUMNS;
        if rows == 0 {
            return 2 * self.pad_rows;
        }
        2 * self.pad_rows + rows * self.card_height + (rows - 1) * self.gap_rows
    }

    /// `(x, y, width, height)` of card `index` for a grid whose top edge is
    /// at row `top` and left edge at column `left`.
    pub fn card_rect(&self, index: usize, left: i32, top: i32) -> (i32, i32, i32, i32) {
        let col = index as i32 % COLUMNS;
        let row = index as i32 / COLUMNS;
        (
            left + self.pad_cols + col * (self.card_width + self.gap_cols),
            top + self.pad_rows + row * (self.card_height + self.gap_rows),
            self.card_width,
            self.card_height,
        )
    }
}

// ─── widgets ────────────────────────────────────────────────────

/// A single card, rendered at the origin of its own buffer.
struct CardWidget<'a> {
    item: &'a Item,
    image: Option<&'a RgbaImage>,
    image_rows: u16,
    caption_gap: u16,
}

impl<'a> Widget for CardWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let frame = Rect::new(area.x, area.y, area.width, self.image_rows.min(area.height));
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::card_border_style());
        let inner = block.inner(frame);
        block.render(frame, buf);
        if let Some(img) = self.image {
            halfblock::render_fill(img, inner, Mask::None, buf);
        }

        let caption_y = area.y + self.image_rows + self.caption_gap;
        if caption_y < area.bottom() {
            let caption = truncate_end(&self.item.caption(), area.width as usize);
            buf.set_stringn(
                area.x,
                caption_y,
                caption,
                area.width as usize,
                Theme::caption_style(),
            );
        }
    }
}

pub struct GalleryWidget<'a> {
    pub items: &'a [Item],
    pub image_cache: &'a HashMap<PathBuf, Arc<RgbaImage>>,
    pub crops: &'a mut CropCache,
    pub metrics: GridMetrics,
    /// Screen row of the grid's top edge; negative once scrolled past.
    pub top: i32,
}

impl<'a> Widget for GalleryWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let GalleryWidget {
            items,
            image_cache,
            crops,
            metrics: m,
            top,
        } = self;
        // Every card frame has the same interior.
        let frame_inner = Rect::new(
            0,
            0,
            (m.card_width - 2).max(0) as u16,
            (m.image_rows - 2).max(0) as u16,
        );
        let image_px = halfblock::pixel_size(frame_inner);
        for (index, item) in items.iter().enumerate() {
            let (x, y, w, h) = m.card_rect(index, area.x as i32, top);
            if y >= area.bottom() as i32 {
                break;
            }
            let visible = clip(x, y, w, h, area);
            if visible.area() == 0 {
                continue;
            }

            let local_area = Rect::new(0, 0, w as u16, h as u16);
            let mut local = Buffer::empty(local_area);
            local.set_style(local_area, Theme::screen_style());
            let source = item
                .image
                .as_ref()
                .and_then(|path| Some((path, image_cache.get(path)?)));
            let image = match source {
                Some((path, src)) => Some(crops.get(path, src, image_px)),
                None => None,
            };
            CardWidget {
                item,
                image,
                image_rows: m.image_rows as u16,
                caption_gap: m.caption_gap as u16,
            }
            .render(local_area, &mut local);

            blit(&local, x, y, visible, buf);
        }
    }
}

/// Copy the part of `src` (placed with its origin at `(x, y)`) that falls
/// inside `visible`.
fn blit(src: &Buffer, x: i32, y: i32, visible: Rect, dst: &mut Buffer) {
    for row in visible.top()..visible.bottom() {
        for col in visible.left()..visible.right() {
            let local = Position::new((col as i32 - x) as u16, (row as i32 - y) as u16);
            let (Some(from), Some(to)) = (src.cell(local), dst.cell_mut(Position::new(col, row)))
            else {
                continue;
            };
            *to = from.clone();
        }
    }
}

fn truncate_end(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }
    let mut out: String = s.chars().take(max_chars - 1).collect();
    out.push('…');
    out
}
