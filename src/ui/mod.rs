//! UI / rendering layer — everything that touches Ratatui widgets.
//!
//! This layer takes the *core* geometry and turns it into cells on the
//! terminal.  No filesystem I/O happens here.

pub mod grid;
pub mod halfblock;
pub mod header;
pub mod layout;
pub mod smooth_scroll;
pub mod theme;
