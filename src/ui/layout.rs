//! Layout helpers — split the terminal area into regions and convert the
//! core's distance units into terminal cells.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Conversion between distance units and terminal cells.
///
/// Terminal cells are roughly twice as tall as they are wide, so one column
/// covers half the distance of one row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellScale {
    pub units_per_row: f32,
}

impl CellScale {
    pub fn new(units_per_row: f32) -> Self {
        Self {
            units_per_row: units_per_row.max(1.0),
        }
    }

    /// Whole rows covering `units` (rounded half away from zero).
    pub fn rows(&self, units: f32) -> i32 {
        (units / self.units_per_row).round() as i32
    }

    pub fn cols(&self, units: f32) -> i32 {
        (units * 2.0 / self.units_per_row).round() as i32
    }

    pub fn units(&self, rows: i32) -> f32 {
        rows as f32 * self.units_per_row
    }
}

/// Primary screen layout: scrollable content plus a bottom status bar.
pub struct AppLayout {
    pub content_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    pub fn from_area(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // gallery (takes all remaining space)
                Constraint::Length(1), // status bar
            ])
            .split(area);

        Self {
            content_area: chunks[0],
            status_area: chunks[1],
        }
    }
}

/// Intersect a signed-coordinate rectangle with `bounds`.  Returns an empty
/// rect at the bounds' origin when nothing is visible.
pub fn clip(x: i32, y: i32, width: i32, height: i32, bounds: Rect) -> Rect {
    let left = x.max(bounds.x as i32);
    let top = y.max(bounds.y as i32);
    let right = (x + width.max(0)).min(bounds.right() as i32);
    let bottom = (y + height.max(0)).min(bounds.bottom() as i32);
    if right <= left || bottom <= top {
        return Rect::new(bounds.x, bounds.y, 0, 0);
    }
    Rect::new(
        left as u16,
        top as u16,
        (right - left) as u16,
        (bottom - top) as u16,
    )
}

pub fn point_in_rect(rect: Rect, x: u16, y: u16) -> bool {
    x >= rect.x && x < rect.right() && y >= rect.y && y < rect.bottom()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_conversion_rounds() {
        let s = CellScale::new(15.0);
        assert_eq!(s.rows(75.0), 5);
        assert_eq!(s.rows(220.0), 15);
        assert_eq!(s.rows(-30.0), -2);
        assert_eq!(s.rows(-30.0), -s.rows(30.0));
        assert_eq!(s.cols(15.0), 2);
        assert_eq!(s.units(3), 45.0);
    }

    #[test]
    fn clip_handles_offscreen_rects() {
        let bounds = Rect::new(0, 0, 20, 10);
        assert_eq!(clip(-5, -3, 10, 6, bounds), Rect::new(0, 0, 5, 3));
        assert_eq!(clip(0, 12, 5, 5, bounds).area(), 0);
        assert_eq!(clip(15, 8, 10, 10, bounds), Rect::new(15, 8, 5, 2));
    }

    #[test]
    fn layout_reserves_status_row() {
        let l = AppLayout::from_area(Rect::new(0, 0, 80, 24));
        assert_eq!(l.content_area.height, 23);
        assert_eq!(l.status_area, Rect::new(0, 23, 80, 1));
    }
}
