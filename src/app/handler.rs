//! Input handling — maps key/mouse events to state mutations.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::config::Action;
use crate::ui::header::{header_layout, HeaderLayout};
use crate::ui::layout::point_in_rect;

use super::state::AppState;

/// Rows scrolled per wheel notch.
const WHEEL_ROWS: i32 = 1;

/// Process a key event.
pub fn handle_key(state: &mut AppState, key: KeyEvent, now: Instant) {
    // Ctrl+c always quits, focused or not.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    if state.focused {
        handle_search_key(state, key, now);
        return;
    }

    let Some(action) = state.config.match_key(key) else {
        return;
    };
    let scale = state.scale();
    let page = scale.units((state.content_area().height as i32 - 2).max(1));
    match action {
        Action::ScrollUp => state.scroll_by(-scale.units(1), now),
        Action::ScrollDown => state.scroll_by(scale.units(1), now),
        Action::PageUp => state.scroll_by(-page, now),
        Action::PageDown => state.scroll_by(page, now),
        Action::ScrollTop => state.settle_to(0.0),
        Action::FocusSearch => state.set_focused(true, now),
        Action::Quit => state.should_quit = true,
    }
}

fn handle_search_key(state: &mut AppState, key: KeyEvent, now: Instant) {
    match key.code {
        KeyCode::Esc | KeyCode::Enter => state.set_focused(false, now),
        KeyCode::Backspace => state.pop_search_char(),
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            state.set_search_text(String::new())
        }
        KeyCode::Char(c)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            state.push_search_char(c)
        }
        _ => {}
    }
}

/// Header rectangles as currently on screen.
fn current_header_layout(state: &AppState, now: Instant) -> HeaderLayout {
    let frame = state.frame_geometry(now);
    header_layout(
        &frame.header,
        state.scale(),
        state.content_area(),
        frame.scroll.min_y(),
    )
}

/// Process a mouse event.
pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent, now: Instant) {
    let scale = state.scale();
    match mouse.kind {
        MouseEventKind::ScrollDown => state.scroll_by(scale.units(WHEEL_ROWS), now),
        MouseEventKind::ScrollUp => state.scroll_by(-scale.units(WHEEL_ROWS), now),
        MouseEventKind::Down(MouseButton::Left) => {
            let (col, row) = (mouse.column, mouse.row);
            let layout = current_header_layout(state, now);

            if point_in_rect(layout.microphone, col, row) {
                state.status_message = Some("Microphone pressed".into());
                state.dirty = true;
                return;
            }
            if point_in_rect(layout.search_bar, col, row) {
                state.set_focused(true, now);
                return;
            }
            if point_in_rect(layout.profile, col, row) {
                state.status_message = Some("Profile pressed".into());
                state.dirty = true;
                return;
            }
            if state.focused && !point_in_rect(layout.area, col, row) {
                state.set_focused(false, now);
            }
            if point_in_rect(state.content_area(), col, row) {
                state.settle = None;
                state.gesture.last_input = None;
                state.gesture.drag_row = Some(row);
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            let Some(prev) = state.gesture.drag_row else {
                return;
            };
            // Content follows the pointer: dragging up scrolls down.
            let delta = prev as i32 - mouse.row as i32;
            if delta != 0 {
                state.scroll_by(scale.units(delta), now);
                state.gesture.drag_row = Some(mouse.row);
            }
        }
        MouseEventKind::Up(MouseButton::Left) => {
            if state.gesture.drag_row.take().is_some() {
                state.end_gesture();
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::core::item::sample_items;
    use crossterm::event::KeyEventKind;
    use ratatui::layout::Rect;
    use std::time::Duration;

    fn state() -> (AppState, Instant) {
        let now = Instant::now();
        let mut s = AppState::new(sample_items(), AppConfig::default(), now);
        s.terminal_area = Rect::new(0, 0, 60, 24);
        (s, now)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn bindings_scroll_and_focus_when_unfocused() {
        let (mut s, now) = state();
        handle_key(&mut s, key(KeyCode::Char('j')), now);
        assert_eq!(s.scroll.raw_offset(), 15.0);
        assert!(s.search_text.is_empty());

        handle_key(&mut s, key(KeyCode::Char('/')), now);
        assert!(s.focused);
    }

    #[test]
    fn typing_edits_only_when_focused() {
        let (mut s, now) = state();
        s.set_focused(true, now);
        for c in "jq".chars() {
            handle_key(&mut s, key(KeyCode::Char(c)), now);
        }
        assert_eq!(s.search_text, "jq");
        assert_eq!(s.scroll.raw_offset(), 0.0);
        assert!(!s.should_quit);

        handle_key(&mut s, key(KeyCode::Backspace), now);
        assert_eq!(s.search_text, "j");

        handle_key(&mut s, key(KeyCode::Esc), now);
        assert!(!s.focused);
        assert_eq!(s.search_text, "j");
    }

    #[test]
    fn ctrl_u_clears_the_search_field() {
        let (mut s, now) = state();
        s.set_focused(true, now);
        for c in "dogs".chars() {
            handle_key(&mut s, key(KeyCode::Char(c)), now);
        }
        handle_key(&mut s, KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL), now);
        assert!(s.search_text.is_empty());
        assert!(s.focused);
    }

    #[test]
    fn ctrl_c_quits_even_when_focused() {
        let (mut s, now) = state();
        s.set_focused(true, now);
        let mut ev = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        ev.kind = KeyEventKind::Press;
        handle_key(&mut s, ev, now);
        assert!(s.should_quit);
        assert!(s.search_text.is_empty());
    }

    #[test]
    fn clicking_the_search_bar_focuses() {
        let (mut s, now) = state();
        handle_mouse(&mut s, mouse(MouseEventKind::Down(MouseButton::Left), 10, 7), now);
        assert!(s.focused);
    }

    #[test]
    fn header_buttons_report_through_status_line() {
        let (mut s, now) = state();
        handle_mouse(&mut s, mouse(MouseEventKind::Down(MouseButton::Left), 54, 7), now);
        assert!(!s.focused);
        assert_eq!(s.status_message.as_deref(), Some("Microphone pressed"));

        handle_mouse(&mut s, mouse(MouseEventKind::Down(MouseButton::Left), 53, 3), now);
        assert_eq!(s.status_message.as_deref(), Some("Profile pressed"));
    }

    #[test]
    fn clicking_outside_the_header_releases_focus() {
        let (mut s, now) = state();
        s.set_focused(true, now);
        let later = now + Duration::from_secs(1);
        // Collapsed search bar sits at rows 1..4.
        handle_mouse(&mut s, mouse(MouseEventKind::Down(MouseButton::Left), 10, 2), later);
        assert!(s.focused);
        handle_mouse(&mut s, mouse(MouseEventKind::Down(MouseButton::Left), 10, 20), later);
        assert!(!s.focused);
    }

    #[test]
    fn drag_tracks_pointer_and_snaps_on_release() {
        let (mut s, now) = state();
        handle_mouse(&mut s, mouse(MouseEventKind::Down(MouseButton::Left), 10, 15), now);
        handle_mouse(&mut s, mouse(MouseEventKind::Drag(MouseButton::Left), 10, 12), now);
        assert_eq!(s.scroll.raw_offset(), 45.0);
        assert_eq!(s.progress, 0.6);

        handle_mouse(&mut s, mouse(MouseEventKind::Up(MouseButton::Left), 10, 12), now);
        assert!(s.gesture.drag_row.is_none());
        assert_eq!(s.settle.map(|a| a.target()), Some(75.0));
    }

    #[test]
    fn wheel_scrolls_one_row_per_notch() {
        let (mut s, now) = state();
        handle_mouse(&mut s, mouse(MouseEventKind::ScrollDown, 10, 15), now);
        handle_mouse(&mut s, mouse(MouseEventKind::ScrollDown, 10, 15), now);
        assert_eq!(s.scroll.raw_offset(), 30.0);
        assert!(s.gesture.last_input.is_some());
    }
}
