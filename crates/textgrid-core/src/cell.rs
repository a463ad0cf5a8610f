//! Grid cell: one column of glyph storage plus its width marker.
//!
//! A wide (2-column) glyph occupies two consecutive cells on the same row:
//! a `Leading` cell followed by a `Trailing` cell carrying the same glyph.
//! The pair never spans a row boundary.

use bitflags::bitflags;

bitflags! {
    /// Rendition flags carried by a [`TextAttribute`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AttrFlags: u16 {
        const BOLD          = 1 << 0;
        const DIM           = 1 << 1;
        const ITALIC        = 1 << 2;
        const UNDERLINE     = 1 << 3;
        const BLINK         = 1 << 4;
        const INVERSE       = 1 << 5;
        const HIDDEN        = 1 << 6;
        const STRIKETHROUGH = 1 << 7;
    }
}

/// Color of a cell's foreground or background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// The screen buffer's configured default.
    #[default]
    Default,
    /// 256-color palette index (0-15 are the classic console colors).
    Indexed(u8),
    /// 24-bit true color.
    Rgb(u8, u8, u8),
}

/// Color and rendition data applied to a span of cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextAttribute {
    pub flags: AttrFlags,
    pub fg: Color,
    pub bg: Color,
}

impl TextAttribute {
    /// Create an attribute with the given colors and no flags.
    #[must_use]
    pub fn new(fg: Color, bg: Color) -> Self {
        Self {
            flags: AttrFlags::empty(),
            fg,
            bg,
        }
    }

    /// The same attribute with foreground and background swapped.
    ///
    /// Popup highlight colors are the swapped variant of the screen colors.
    #[must_use]
    pub fn inverted(self) -> Self {
        Self {
            flags: self.flags,
            fg: self.bg,
            bg: self.fg,
        }
    }
}

/// How a cell participates in glyph storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WidthMarker {
    /// A narrow glyph occupying this cell alone.
    #[default]
    Single,
    /// First column of a wide glyph; the next cell is `Trailing`.
    Leading,
    /// Second column of a wide glyph; the previous cell is `Leading`.
    Trailing,
}

/// One grid position: a glyph and its width marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub glyph: char,
    pub marker: WidthMarker,
}

impl Default for Cell {
    fn default() -> Self {
        Self::blank()
    }
}

impl Cell {
    /// A blank single-width space.
    #[must_use]
    pub fn blank() -> Self {
        Self {
            glyph: ' ',
            marker: WidthMarker::Single,
        }
    }

    /// A single-width cell holding `glyph`.
    #[must_use]
    pub fn single(glyph: char) -> Self {
        Self {
            glyph,
            marker: WidthMarker::Single,
        }
    }

    /// The leading half of a wide glyph.
    #[must_use]
    pub fn leading(glyph: char) -> Self {
        Self {
            glyph,
            marker: WidthMarker::Leading,
        }
    }

    /// The trailing half of a wide glyph.
    #[must_use]
    pub fn trailing(glyph: char) -> Self {
        Self {
            glyph,
            marker: WidthMarker::Trailing,
        }
    }

    /// Whether this is the leading half of a wide glyph.
    #[must_use]
    pub fn is_leading(&self) -> bool {
        self.marker == WidthMarker::Leading
    }

    /// Whether this is the trailing half of a wide glyph.
    #[must_use]
    pub fn is_trailing(&self) -> bool {
        self.marker == WidthMarker::Trailing
    }

    /// Whether this cell reads as blank for measurement purposes.
    #[must_use]
    pub fn is_space(&self) -> bool {
        self.glyph == ' ' && self.marker == WidthMarker::Single
    }
}

/// One cell of a rectangle-copy source: glyph, marker, and color data.
///
/// The rectangle-copy APIs move these instead of bare [`Cell`]s because each
/// source position carries its own attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharInfo {
    pub glyph: char,
    pub marker: WidthMarker,
    pub attr: TextAttribute,
}

impl CharInfo {
    /// A single-width source cell.
    #[must_use]
    pub fn new(glyph: char, attr: TextAttribute) -> Self {
        Self {
            glyph,
            marker: WidthMarker::Single,
            attr,
        }
    }

    /// A source cell with an explicit width marker.
    #[must_use]
    pub fn with_marker(glyph: char, marker: WidthMarker, attr: TextAttribute) -> Self {
        Self {
            glyph,
            marker,
            attr,
        }
    }
}
