//! Core logic – scroll progress, snapping, header geometry and the item source.
//!
//! Nothing in this module depends on any TUI or rendering crate.  Geometry
//! is expressed in abstract distance units; the UI layer converts to cells.

pub mod header;
pub mod item;
pub mod progress;
pub mod snap;
pub mod transition;
