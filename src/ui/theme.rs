//! Colour palette and text styles used across the UI.
//!
//! Colours are explicit RGB so that opacity and blur can be emulated by
//! mixing toward the screen background.

use ratatui::style::{Color, Modifier, Style};

use crate::core::header::BLUR_RADIUS;

type Rgb = (u8, u8, u8);

const BACKGROUND: Rgb = (16, 16, 20);
/// Backdrop behind the header at full blur.
const FROSTED: Rgb = (40, 40, 50);
const SEARCH_BG: Rgb = (32, 32, 40);
const TEXT: Rgb = (236, 236, 242);
const MUTED: Rgb = (146, 146, 158);
const BORDER: Rgb = (92, 92, 108);
const CARD_BORDER: Rgb = (68, 68, 80);
const MICROPHONE: Rgb = (232, 72, 72);

fn rgb((r, g, b): Rgb) -> Color {
    Color::Rgb(r, g, b)
}

/// Linear mix of two colours; `t = 0` gives `a`.
fn mix(a: Rgb, b: Rgb, t: f32) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    let ch = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    (ch(a.0, b.0), ch(a.1, b.1), ch(a.2, b.2))
}

/// Central theme — change colours here and they propagate everywhere.
pub struct Theme;

impl Theme {
    pub fn background() -> Color {
        rgb(BACKGROUND)
    }

    pub fn screen_style() -> Style {
        Style::default().bg(Self::background()).fg(rgb(TEXT))
    }

    // ── header ─────────────────────────────────────────────────

    /// Header backdrop; lighter the stronger the blur.
    pub fn backdrop_style(blur_radius: f32) -> Style {
        let strength = blur_radius / BLUR_RADIUS;
        Style::default().bg(rgb(mix(BACKGROUND, FROSTED, strength)))
    }

    /// Text colour faded toward the background by `1 - opacity`.
    fn faded(color: Rgb, opacity: f32) -> Color {
        rgb(mix(BACKGROUND, color, opacity))
    }

    pub fn greeting_style(opacity: f32) -> Style {
        Style::default().fg(Self::faded(MUTED, opacity))
    }

    pub fn name_style(opacity: f32) -> Style {
        Style::default()
            .fg(Self::faded(TEXT, opacity))
            .add_modifier(Modifier::BOLD)
    }

    pub fn avatar_style(opacity: f32) -> Style {
        Style::default()
            .fg(Self::faded(BACKGROUND, opacity))
            .bg(Self::faded(MUTED, opacity))
            .add_modifier(Modifier::BOLD)
    }

    pub fn search_bg_style() -> Style {
        Style::default().bg(rgb(SEARCH_BG)).fg(rgb(TEXT))
    }

    pub fn search_border_style(focused: bool) -> Style {
        let fg = if focused { TEXT } else { BORDER };
        Style::default().bg(rgb(SEARCH_BG)).fg(rgb(fg))
    }

    pub fn placeholder_style() -> Style {
        Style::default().bg(rgb(SEARCH_BG)).fg(rgb(MUTED))
    }

    pub fn caret_style() -> Style {
        Style::default().bg(rgb(TEXT)).fg(rgb(SEARCH_BG))
    }

    pub fn microphone_style() -> Style {
        Style::default().bg(rgb(SEARCH_BG)).fg(rgb(MICROPHONE))
    }

    // ── cards ──────────────────────────────────────────────────

    pub fn card_border_style() -> Style {
        Style::default().bg(rgb(BACKGROUND)).fg(rgb(CARD_BORDER))
    }

    pub fn caption_style() -> Style {
        Style::default().bg(rgb(BACKGROUND)).fg(rgb(MUTED))
    }

    // ── chrome ─────────────────────────────────────────────────

    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mix_hits_endpoints() {
        assert_eq!(mix(BACKGROUND, TEXT, 0.0), BACKGROUND);
        assert_eq!(mix(BACKGROUND, TEXT, 1.0), TEXT);
        assert_eq!(mix((0, 0, 0), (200, 100, 50), 0.5), (100, 50, 25));
    }

    #[test]
    fn invisible_title_blends_into_background() {
        assert_eq!(Theme::name_style(0.0).fg, Some(Theme::background()));
        assert_eq!(Theme::backdrop_style(0.0).bg, Some(Theme::background()));
    }
}
