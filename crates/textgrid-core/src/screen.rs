//! Screen buffer: a text buffer plus its viewport, tab stops, and colors.
//!
//! This is the unit the console API layer and the VT dispatcher talk to.
//! All mutation happens under the caller's console lock; nothing here locks
//! or blocks internally.

use crate::cell::TextAttribute;
use crate::cursor::DEFAULT_CURSOR_SIZE;
use crate::error::Result;
use crate::geometry::{Position, Size};
use crate::glyph::WidthPolicy;
use crate::tab_stops::TabStops;
use crate::text_buffer::TextBuffer;
use crate::viewport::Viewport;

/// Construction parameters for a [`ScreenBuffer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenBufferConfig {
    /// Full buffer dimensions, scrollback included.
    pub buffer_size: Size,
    /// Visible window dimensions.
    pub window_size: Size,
    /// Default fill/draw attribute.
    pub default_attr: TextAttribute,
    /// Attribute used by popup surfaces; conventionally the inverted screen
    /// colors.
    pub popup_attr: TextAttribute,
    /// Glyph width measurement policy.
    pub width_policy: WidthPolicy,
    /// Cursor height as a percentage of the cell.
    pub cursor_size: u32,
}

impl Default for ScreenBufferConfig {
    fn default() -> Self {
        let default_attr = TextAttribute::default();
        Self {
            buffer_size: Size::new(80, 300),
            window_size: Size::new(80, 25),
            default_attr,
            popup_attr: default_attr.inverted(),
            width_policy: WidthPolicy::Standard,
            cursor_size: DEFAULT_CURSOR_SIZE,
        }
    }
}

/// One screen surface: buffer storage, viewport, tab stops, and colors.
#[derive(Debug, Clone)]
pub struct ScreenBuffer {
    buffer: TextBuffer,
    viewport: Viewport,
    tab_stops: TabStops,
    default_attr: TextAttribute,
    popup_attr: TextAttribute,
}

impl ScreenBuffer {
    /// Create a blank screen buffer from `config`.
    pub fn new(config: ScreenBufferConfig) -> Result<Self> {
        let mut buffer = TextBuffer::new(
            config.buffer_size,
            config.default_attr,
            config.width_policy,
        )?;
        buffer.cursor_mut().set_size(config.cursor_size);
        let viewport = Viewport::new(
            config.window_size.width,
            config.window_size.height,
            config.buffer_size,
        );
        Ok(Self {
            buffer,
            viewport,
            tab_stops: TabStops::new(),
            default_attr: config.default_attr,
            popup_attr: config.popup_attr,
        })
    }

    /// The backing text buffer.
    #[must_use]
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// Mutable access to the backing text buffer.
    pub fn buffer_mut(&mut self) -> &mut TextBuffer {
        &mut self.buffer
    }

    pub(crate) fn replace_buffer(&mut self, buffer: TextBuffer) {
        self.buffer = buffer;
    }

    /// The visible viewport.
    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Mutable viewport access.
    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    /// VT tab stops.
    #[must_use]
    pub fn tab_stops(&self) -> &TabStops {
        &self.tab_stops
    }

    /// Mutable tab-stop access.
    pub fn tab_stops_mut(&mut self) -> &mut TabStops {
        &mut self.tab_stops
    }

    /// The current default attribute.
    #[must_use]
    pub fn attributes(&self) -> TextAttribute {
        self.default_attr
    }

    /// The current popup attribute.
    #[must_use]
    pub fn popup_attributes(&self) -> TextAttribute {
        self.popup_attr
    }

    /// Change the default colors, rewriting every stored run that carried
    /// the old defaults (and the inverted variant used by popups).
    pub fn set_default_attributes(&mut self, new_attr: TextAttribute, new_popup: TextAttribute) {
        let old_attr = self.default_attr;
        let old_popup = self.popup_attr;
        for y in 0..self.buffer.height() {
            let attrs = self.buffer.row_mut(y).attrs_mut();
            attrs.replace_attrs(old_attr, new_attr);
            attrs.replace_attrs(old_popup, new_popup);
        }
        self.default_attr = new_attr;
        self.popup_attr = new_popup;
        self.buffer.set_fill_attr(new_attr);
    }

    /// Buffer dimensions.
    #[must_use]
    pub fn buffer_size(&self) -> Size {
        self.buffer.size()
    }

    /// The forward-tab target from `pos`.
    #[must_use]
    pub fn forward_tab(&self, pos: Position) -> Position {
        self.tab_stops.forward_tab(pos, self.buffer.size())
    }

    /// The reverse-tab target from `pos`.
    #[must_use]
    pub fn reverse_tab(&self, pos: Position) -> Position {
        self.tab_stops.reverse_tab(pos)
    }

    /// Reset the surface: blank rows, home cursor, no tab stops.
    pub fn reset(&mut self) {
        let attr = self.default_attr;
        for y in 0..self.buffer.height() {
            self.buffer.row_mut(y).reset(attr);
        }
        self.buffer.cursor_mut().set_position(Position::origin());
        self.tab_stops.clear();
    }
}
