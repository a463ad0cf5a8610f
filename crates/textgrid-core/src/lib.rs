#![forbid(unsafe_code)]

//! Terminal screen buffer engine: rows, run-length attributes, wide glyphs,
//! and reflow.
//!
//! This crate is the in-memory text storage of a terminal host: a
//! fixed-width cell grid with scrollback, run-length-encoded attributes,
//! double-width glyph handling, and a resize algorithm that either re-wraps
//! logical lines or truncates traditionally. The VT dispatcher and console
//! API layer drive it through [`ScreenBuffer`] and [`Console`]; parsing,
//! rendering, and codepage conversion live elsewhere.
//!
//! Invariants every mutation preserves:
//! - attribute run lengths sum exactly to the row width, with no two
//!   adjacent runs equal;
//! - a wide glyph's leading/trailing pair sits on one row and is never
//!   split by a write, fill, copy, or resize;
//! - a soft-wrapped row is marked wrap-forced so reflow can tell it from a
//!   hard line break.
//!
//! Callers serialize access externally (the console lock); nothing here
//! locks, blocks, or suspends.

mod attr_row;
mod bisect;
mod cell;
mod char_row;
mod console;
mod cursor;
mod error;
mod geometry;
mod glyph;
mod reflow;
mod row;
mod screen;
mod tab_stops;
mod text_buffer;
mod viewport;
mod write;

pub use attr_row::{AttrRow, AttrRun};
pub use bisect::{check_bisect, check_bisect_bytes, check_bisect_process, check_bisect_string};
pub use cell::{AttrFlags, Cell, CharInfo, Color, TextAttribute, WidthMarker};
pub use char_row::CharRow;
pub use console::Console;
pub use cursor::{Cursor, DEFAULT_CURSOR_SIZE};
pub use error::{Error, Result};
pub use geometry::{Position, Rect, Size};
pub use glyph::{CodepageInfo, WidthPolicy};
pub use row::Row;
pub use screen::{ScreenBuffer, ScreenBufferConfig};
pub use tab_stops::TabStops;
pub use text_buffer::TextBuffer;
pub use viewport::Viewport;
pub use write::FillElement;
