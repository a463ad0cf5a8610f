//! A buffer row: glyph storage, attribute runs, and wrap state.

use crate::attr_row::AttrRow;
use crate::cell::TextAttribute;
use crate::char_row::CharRow;
use crate::error::Result;

/// One row of the text buffer.
///
/// `wrap_forced` marks a soft wrap: the content logically continues on the
/// next row with no hard line break. `double_byte_padded` marks that the
/// wrap happened because a wide glyph did not fit and the last cell is a
/// padding space rather than real content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    chars: CharRow,
    attrs: AttrRow,
    wrap_forced: bool,
    double_byte_padded: bool,
}

impl Row {
    /// Create a blank row of `width` cells carrying `attr`.
    #[must_use]
    pub fn new(width: u16, attr: TextAttribute) -> Self {
        Self {
            chars: CharRow::new(width),
            attrs: AttrRow::new(width, attr),
            wrap_forced: false,
            double_byte_padded: false,
        }
    }

    /// Glyph storage.
    #[must_use]
    pub fn chars(&self) -> &CharRow {
        &self.chars
    }

    /// Mutable glyph storage.
    pub fn chars_mut(&mut self) -> &mut CharRow {
        &mut self.chars
    }

    /// Attribute runs.
    #[must_use]
    pub fn attrs(&self) -> &AttrRow {
        &self.attrs
    }

    /// Mutable attribute runs.
    pub fn attrs_mut(&mut self) -> &mut AttrRow {
        &mut self.attrs
    }

    /// Whether this row soft-wraps into the next.
    #[must_use]
    pub fn was_wrap_forced(&self) -> bool {
        self.wrap_forced
    }

    /// Set or clear the soft-wrap flag. Clearing also clears the padding
    /// flag, which only has meaning on a wrapped row.
    pub fn set_wrap_forced(&mut self, wrapped: bool) {
        self.wrap_forced = wrapped;
        if !wrapped {
            self.double_byte_padded = false;
        }
    }

    /// Whether the last cell is wide-glyph wrap padding.
    #[must_use]
    pub fn was_double_byte_padded(&self) -> bool {
        self.double_byte_padded
    }

    /// Mark the last cell as wide-glyph wrap padding.
    pub fn set_double_byte_padded(&mut self, padded: bool) {
        self.double_byte_padded = padded;
    }

    /// Reset to a blank row carrying `attr`, clearing wrap state.
    pub fn reset(&mut self, attr: TextAttribute) {
        self.chars.reset();
        self.attrs = AttrRow::new(self.chars.width(), attr);
        self.wrap_forced = false;
        self.double_byte_padded = false;
    }

    /// Resize both planes to `new_width`.
    pub fn resize(&mut self, new_width: u16) -> Result<()> {
        self.chars.resize(new_width);
        self.attrs.resize(new_width)?;
        Ok(())
    }
}
