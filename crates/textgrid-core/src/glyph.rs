//! Glyph display-width classification.
//!
//! The buffer stores every glyph as either one `Single` cell or a
//! `Leading`/`Trailing` pair, so width classification collapses to 1 or 2.
//! Zero-width code points (combining marks, ZWJ) never reach cell storage;
//! the conversion layer ahead of this crate folds them into their base
//! character, so they classify as 1 here.

use unicode_width::UnicodeWidthChar;

/// Policy for measuring glyph display width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WidthPolicy {
    /// East-asian-width per the Unicode tables.
    #[default]
    Standard,
    /// Treat ambiguous-width characters as wide (CJK legacy environments).
    CjkAmbiguousWide,
}

impl WidthPolicy {
    /// Display width of `glyph` in columns: 1 or 2.
    #[must_use]
    pub fn glyph_width(self, glyph: char) -> u16 {
        let width = match self {
            Self::Standard => glyph.width(),
            Self::CjkAmbiguousWide => glyph.width_cjk(),
        };
        match width {
            Some(2) => 2,
            // Control characters report None; zero-width marks report 0.
            // Both occupy one storage cell if they get this far.
            _ => 1,
        }
    }

    /// Whether `glyph` occupies two columns.
    #[must_use]
    pub fn is_wide(self, glyph: char) -> bool {
        self.glyph_width(glyph) == 2
    }
}

/// Lead-byte table for a legacy double-byte codepage.
///
/// Mirrors the `CPINFO` lead-byte range list: pairs of inclusive bounds,
/// terminated implicitly by the end of the vector.
#[derive(Debug, Clone, Default)]
pub struct CodepageInfo {
    ranges: Vec<(u8, u8)>,
}

impl CodepageInfo {
    /// Build from inclusive `(low, high)` lead-byte ranges.
    #[must_use]
    pub fn new(ranges: Vec<(u8, u8)>) -> Self {
        Self { ranges }
    }

    /// Shift-JIS lead-byte ranges, the common test codepage.
    #[must_use]
    pub fn shift_jis() -> Self {
        Self::new(vec![(0x81, 0x9F), (0xE0, 0xFC)])
    }

    /// Whether `byte` starts a double-byte sequence in this codepage.
    #[must_use]
    pub fn is_lead_byte(&self, byte: u8) -> bool {
        self.ranges.iter().any(|&(lo, hi)| lo <= byte && byte <= hi)
    }
}
