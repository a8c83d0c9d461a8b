//! Raster → terminal cells using the upper half-block (`▀`): each cell shows
//! two vertically stacked pixels, the top one as foreground and the bottom
//! one as background.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::RgbaImage;
use ratatui::{buffer::Buffer, layout::Position, layout::Rect, style::Color};

/// How pixels outside the clip shape are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mask {
    None,
    /// Inscribed ellipse; pixels outside keep the cell's existing colour.
    Circle,
}

/// Scale `src` to cover `width × height` and crop the overflow evenly from
/// both sides (aspect-fill).
pub fn fill_crop(src: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    let (sw, sh) = (src.width().max(1) as f64, src.height().max(1) as f64);
    let scale = (width as f64 / sw).max(height as f64 / sh);
    let rw = ((sw * scale).ceil() as u32).max(width).max(1);
    let rh = ((sh * scale).ceil() as u32).max(height).max(1);
    let resized = imageops::resize(src, rw, rh, FilterType::Triangle);
    imageops::crop_imm(&resized, (rw - width) / 2, (rh - height) / 2, width, height).to_image()
}

/// Pixel size that exactly covers `area` at two pixels per cell.
pub fn pixel_size(area: Rect) -> (u32, u32) {
    (area.width as u32, area.height as u32 * 2)
}

/// Aspect-filled crops keyed by source path, one size per path.
///
/// Cropping resizes the whole source, so it is done once per (path, size)
/// instead of on every frame.
#[derive(Default)]
pub struct CropCache {
    entries: HashMap<PathBuf, ((u32, u32), RgbaImage)>,
}

impl CropCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Crop of `src` at `size`, computed only when missing or when the
    /// requested size changed.
    pub fn get(&mut self, path: &Path, src: &RgbaImage, size: (u32, u32)) -> &RgbaImage {
        let entry = self
            .entries
            .entry(path.to_path_buf())
            .or_insert_with(|| ((0, 0), RgbaImage::new(0, 0)));
        if entry.0 != size {
            *entry = (size, fill_crop(src, size.0, size.1));
        }
        &entry.1
    }

    /// Forget the crop of `path`, e.g. after its source was decoded again.
    pub fn invalidate(&mut self, path: &Path) {
        self.entries.remove(path);
    }
}

/// Paint `src` into `area` with aspect-fill cropping.  A source that
/// already has the area's pixel size is drawn as-is.
pub fn render_fill(src: &RgbaImage, area: Rect, mask: Mask, buf: &mut Buffer) {
    if area.width == 0 || area.height == 0 || src.width() == 0 || src.height() == 0 {
        return;
    }

    let (px_w, px_h) = pixel_size(area);
    let cropped;
    let pixels = if src.dimensions() == (px_w, px_h) {
        src
    } else {
        cropped = fill_crop(src, px_w, px_h);
        &cropped
    };

    let inside = |x: u32, y: u32| match mask {
        Mask::None => true,
        Mask::Circle => {
            let nx = (x as f32 + 0.5) / px_w as f32 * 2.0 - 1.0;
            let ny = (y as f32 + 0.5) / px_h as f32 * 2.0 - 1.0;
            nx * nx + ny * ny <= 1.0
        }
    };
    let color_at = |x: u32, y: u32| -> Option<Color> {
        let p = pixels.get_pixel(x, y);
        (p[3] >= 128 && inside(x, y)).then_some(Color::Rgb(p[0], p[1], p[2]))
    };

    for row in 0..area.height {
        let yt = row as u32 * 2;
        for col in 0..area.width {
            let x = col as u32;
            let top = color_at(x, yt);
            let bottom = color_at(x, yt + 1);
            let Some(cell) = buf.cell_mut(Position::new(area.x + col, area.y + row)) else {
                continue;
            };
            match (top, bottom) {
                (Some(t), Some(b)) => {
                    cell.set_char('▀').set_fg(t).set_bg(b);
                }
                (Some(t), None) => {
                    cell.set_char('▀').set_fg(t);
                }
                (None, Some(b)) => {
                    cell.set_char('▄').set_fg(b);
                }
                (None, None) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn fill_crop_matches_target_size() {
        let wide = RgbaImage::from_pixel(300, 100, Rgba([1, 2, 3, 255]));
        let out = fill_crop(&wide, 20, 40);
        assert_eq!(out.dimensions(), (20, 40));
        let tall = RgbaImage::from_pixel(10, 90, Rgba([1, 2, 3, 255]));
        assert_eq!(fill_crop(&tall, 33, 7).dimensions(), (33, 7));
    }

    fn cell(buf: &Buffer, x: u16, y: u16) -> &ratatui::buffer::Cell {
        &buf[(x, y)]
    }

    #[test]
    fn render_fill_paints_every_cell() {
        let src = RgbaImage::from_pixel(8, 8, Rgba([10, 20, 30, 255]));
        let area = Rect::new(1, 1, 4, 2);
        let mut buf = Buffer::empty(Rect::new(0, 0, 6, 4));
        render_fill(&src, area, Mask::None, &mut buf);
        for y in 1..3 {
            for x in 1..5 {
                assert_eq!(cell(&buf, x, y).symbol(), "▀");
                assert_eq!(cell(&buf, x, y).fg, Color::Rgb(10, 20, 30));
            }
        }
        assert_eq!(cell(&buf, 0, 0).symbol(), " ");
    }

    #[test]
    fn crop_cache_reuses_crops_until_size_changes() {
        let path = Path::new("/photos/a.png");
        let red = RgbaImage::from_pixel(8, 8, Rgba([255, 0, 0, 255]));
        let blue = RgbaImage::from_pixel(8, 8, Rgba([0, 0, 255, 255]));
        let mut cache = CropCache::new();

        assert_eq!(cache.get(path, &red, (4, 6)).get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
        // Same size: the cached crop is returned, the new source is ignored.
        assert_eq!(cache.get(path, &blue, (4, 6)).get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
        // New size: recropped.
        let resized = cache.get(path, &blue, (5, 6));
        assert_eq!(resized.dimensions(), (5, 6));
        assert_eq!(resized.get_pixel(0, 0), &Rgba([0, 0, 255, 255]));

        cache.invalidate(path);
        assert_eq!(cache.get(path, &red, (5, 6)).get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn exact_size_source_is_drawn_without_resampling() {
        let mut src = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255]));
        src.put_pixel(0, 0, Rgba([9, 8, 7, 255]));
        let mut buf = Buffer::empty(Rect::new(0, 0, 2, 1));
        render_fill(&src, Rect::new(0, 0, 2, 1), Mask::None, &mut buf);
        assert_eq!(cell(&buf, 0, 0).fg, Color::Rgb(9, 8, 7));
        assert_eq!(cell(&buf, 1, 0).fg, Color::Rgb(0, 0, 0));
    }

    #[test]
    fn circle_mask_skips_corners() {
        let src = RgbaImage::from_pixel(8, 8, Rgba([200, 0, 0, 255]));
        let mut buf = Buffer::empty(Rect::new(0, 0, 10, 5));
        render_fill(&src, Rect::new(0, 0, 10, 5), Mask::Circle, &mut buf);
        assert_eq!(cell(&buf, 0, 0).symbol(), " ");
        assert_eq!(cell(&buf, 9, 4).symbol(), " ");
        assert_eq!(cell(&buf, 5, 2).symbol(), "▀");
    }
}
