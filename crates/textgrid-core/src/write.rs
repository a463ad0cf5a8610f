//! The write engine: stream writes, fills, and rectangle copies.
//!
//! Every operation here is width-aware: a wide glyph is stored as a
//! leading/trailing pair on one row, never split across a row edge, and any
//! existing pair a write lands on edge-first is reduced to spaces before the
//! new cells go in. Out-of-bounds targets are benign no-ops reporting zero
//! cells written; failures mid-way leave already-committed rows committed.

use tracing::trace;

use crate::attr_row::AttrRun;
use crate::cell::{Cell, CharInfo, TextAttribute};
use crate::error::{Error, Result};
use crate::geometry::{Position, Rect, Size};
use crate::screen::ScreenBuffer;

/// What a [`ScreenBuffer::fill`] writes.
///
/// The three glyph kinds share one code path (codepage conversion happens
/// before this subsystem, so each carries an already-converted `char`), but
/// the distinction is kept because attribute fills have different wrap-flag
/// and run behavior than glyph fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillElement {
    /// A character that arrived through the ANSI/codepage API.
    Ascii(char),
    /// A character that arrived as real Unicode.
    RealUnicode(char),
    /// A character that arrived as codepage-shaped Unicode.
    FalseUnicode(char),
    /// An attribute fill; glyphs are untouched.
    Attribute(TextAttribute),
}

impl ScreenBuffer {
    /// Write a stream of characters beginning at `origin`.
    ///
    /// Wide glyphs expand to leading/trailing pairs; one that would split at
    /// the row edge pads the final column with a space, marks the row
    /// double-byte padded, and restarts on the next row. Rows filled to the
    /// last column mid-write are marked wrap-forced; the final row's wrap
    /// flag is set to `line_wrapped`, which the caller knows from its own
    /// line accounting. Writing past the last row truncates the remainder.
    ///
    /// Returns the number of source characters stored. An out-of-bounds
    /// origin stores nothing and reports success.
    pub fn write_text(
        &mut self,
        text: &str,
        origin: Position,
        line_wrapped: bool,
    ) -> Result<usize> {
        let size = self.buffer_size();
        if text.is_empty() || !size.contains(origin) {
            return Ok(0);
        }
        let policy = self.buffer().width_policy();
        let attr = self.attributes();
        trace!(x = origin.x, y = origin.y, len = text.len(), "stream write");

        let mut source = text.chars().peekable();
        let mut pending: Option<char> = None;
        let mut staged: Vec<Cell> = Vec::new();
        let mut seg_start = origin.x;
        let mut y = origin.y;
        let mut written = 0usize;

        loop {
            // Stage one row's worth of cells.
            let mut padded = false;
            loop {
                let col = seg_start + staged.len() as u16;
                if col >= size.width {
                    break;
                }
                let Some(ch) = pending.take().or_else(|| source.next()) else {
                    break;
                };
                if policy.is_wide(ch) {
                    if col + 1 < size.width {
                        staged.push(Cell::leading(ch));
                        staged.push(Cell::trailing(ch));
                        written += 1;
                    } else {
                        // One column of room: pad it and carry the glyph over.
                        staged.push(Cell::blank());
                        padded = true;
                        pending = Some(ch);
                    }
                } else {
                    staged.push(Cell::single(ch));
                    written += 1;
                }
            }

            let len = staged.len() as u16;
            if len > 0 {
                self.cleanup_bisecting_edges(Position::new(seg_start, y), len, ' ');
                let row = self.buffer_mut().row_mut(y);
                row.chars_mut().overwrite(seg_start, &staged);
                row.attrs_mut().insert_runs(
                    &[AttrRun::new(attr, len)],
                    seg_start,
                    seg_start + len - 1,
                )?;
            }

            let more = pending.is_some() || source.peek().is_some();
            let row = self.buffer_mut().row_mut(y);
            if more {
                row.set_wrap_forced(true);
                if padded {
                    row.set_double_byte_padded(true);
                }
                y += 1;
                if y >= size.height {
                    // Off the bottom of the buffer: the remainder is abandoned.
                    break;
                }
                seg_start = 0;
                staged.clear();
            } else {
                row.set_wrap_forced(line_wrapped);
                break;
            }
        }
        Ok(written)
    }

    /// Fill `count` cells with a repeated element, wrapping row to row.
    ///
    /// Returns `(cells_written, columns_consumed)`. Glyph fills clear the
    /// wrap flag of every row they touch and leave attributes alone;
    /// attribute fills leave both glyphs and wrap flags alone. A fill
    /// running off the bottom of the buffer stops there. An out-of-bounds
    /// origin is a benign no-op reporting zero.
    pub fn fill(
        &mut self,
        element: FillElement,
        origin: Position,
        count: usize,
    ) -> Result<(usize, usize)> {
        let size = self.buffer_size();
        if count == 0 || !size.contains(origin) {
            return Ok((0, 0));
        }
        match element {
            FillElement::Ascii(glyph)
            | FillElement::RealUnicode(glyph)
            | FillElement::FalseUnicode(glyph) => self.fill_glyph(glyph, origin, count),
            FillElement::Attribute(attr) => self.fill_attribute(attr, origin, count),
        }
    }

    fn fill_glyph(&mut self, glyph: char, origin: Position, count: usize) -> Result<(usize, usize)> {
        let size = self.buffer_size();
        let wide = self.buffer().width_policy().is_wide(glyph);
        let mut remaining = count;
        let mut written = 0usize;
        let mut x = origin.x;
        let mut y = origin.y;

        loop {
            let columns_left = usize::from(size.width - x);
            let cells_this_row = remaining.min(columns_left) as u16;

            self.cleanup_bisecting_edges(Position::new(x, y), cells_this_row, '\0');

            let mut staged = Vec::with_capacity(usize::from(cells_this_row));
            if wide {
                let mut placed = 0u16;
                while placed < cells_this_row {
                    if placed + 1 < cells_this_row {
                        staged.push(Cell::leading(glyph));
                        staged.push(Cell::trailing(glyph));
                        placed += 2;
                    } else {
                        // An odd cell cannot hold half a glyph.
                        staged.push(Cell::blank());
                        placed += 1;
                    }
                }
            } else {
                staged.resize(usize::from(cells_this_row), Cell::single(glyph));
            }

            let row = self.buffer_mut().row_mut(y);
            row.chars_mut().overwrite(x, &staged);
            row.set_wrap_forced(false);

            written += usize::from(cells_this_row);
            remaining -= usize::from(cells_this_row);
            if remaining == 0 {
                break;
            }
            x = 0;
            y += 1;
            if y >= size.height {
                break;
            }
        }
        Ok((written, written))
    }

    fn fill_attribute(
        &mut self,
        attr: TextAttribute,
        origin: Position,
        count: usize,
    ) -> Result<(usize, usize)> {
        let size = self.buffer_size();
        let mut remaining = count;
        let mut written = 0usize;
        let mut x = origin.x;
        let mut y = origin.y;

        loop {
            let columns_left = usize::from(size.width - x);
            let len = remaining.min(columns_left) as u16;
            self.buffer_mut().row_mut(y).attrs_mut().insert_runs(
                &[AttrRun::new(attr, len)],
                x,
                x + len - 1,
            )?;
            written += usize::from(len);
            remaining -= usize::from(len);
            if remaining == 0 {
                break;
            }
            x = 0;
            y += 1;
            if y >= size.height {
                break;
            }
        }
        Ok((written, written))
    }

    /// Fill a rectangle with one glyph and attribute.
    ///
    /// A wide glyph fills the rectangle in pairs; an odd final column gets a
    /// NUL cell (fills null out the orphan where stream writes space-fill
    /// it). Wrap flags are cleared on every row. A rectangle outside the
    /// buffer is a benign no-op.
    pub fn fill_rectangle(&mut self, glyph: char, attr: TextAttribute, rect: Rect) -> Result<()> {
        let size = self.buffer_size();
        if !rect.fits_in(size) {
            return Ok(());
        }
        let wide = self.buffer().width_policy().is_wide(glyph);
        let x_size = rect.width();

        let mut staged = Vec::with_capacity(usize::from(x_size));
        if wide {
            let mut placed = 0u16;
            while placed < x_size {
                if placed + 1 < x_size {
                    staged.push(Cell::leading(glyph));
                    staged.push(Cell::trailing(glyph));
                    placed += 2;
                } else {
                    staged.push(Cell::single('\0'));
                    placed += 1;
                }
            }
        } else {
            staged.resize(usize::from(x_size), Cell::single(glyph));
        }

        for y in rect.top..=rect.bottom {
            self.cleanup_bisecting_edges(Position::new(rect.left, y), x_size, '\0');
            let row = self.buffer_mut().row_mut(y);
            row.chars_mut().overwrite(rect.left, &staged);
            row.attrs_mut()
                .insert_runs(&[AttrRun::new(attr, x_size)], rect.left, rect.right)?;
            row.set_wrap_forced(false);
        }
        Ok(())
    }

    /// Copy a rectangle of source cells into the buffer at `dest`.
    ///
    /// `source` is a row-major `source_size` grid; `src_rect` selects the
    /// part to copy. Attribute runs are rebuilt per destination row by
    /// coalescing equal consecutive source attributes. When `attrs` is
    /// given, it is a full `source_size` attribute plane applied over the
    /// same region after the cells. A destination outside the buffer is
    /// clipped; a fully out-of-bounds destination writes nothing.
    pub fn write_rect(
        &mut self,
        source: &[CharInfo],
        source_size: Size,
        src_rect: Rect,
        dest: Position,
        attrs: Option<&[TextAttribute]>,
    ) -> Result<()> {
        let size = self.buffer_size();
        let source_area = usize::from(source_size.width) * usize::from(source_size.height);
        if source.len() != source_area {
            return Err(Error::InvalidParameter(
                "source slice does not match its dimensions",
            ));
        }
        if !src_rect.fits_in(source_size) {
            return Err(Error::InvalidParameter(
                "source rectangle outside the source grid",
            ));
        }
        if let Some(plane) = attrs
            && plane.len() != source_area
        {
            return Err(Error::InvalidParameter(
                "attribute plane does not match the source dimensions",
            ));
        }
        if !size.contains(dest) {
            return Ok(());
        }
        let x_size = src_rect.width().min(size.width - dest.x);
        let y_size = src_rect.height().min(size.height - dest.y);
        trace!(x = dest.x, y = dest.y, w = x_size, h = y_size, "rect write");

        let mut staged: Vec<Cell> = Vec::with_capacity(usize::from(x_size));
        let mut runs: Vec<AttrRun> = Vec::new();
        for i in 0..y_size {
            let y = dest.y + i;
            let src_base = usize::from(src_rect.top + i) * usize::from(source_size.width)
                + usize::from(src_rect.left);
            let src_end = src_base + usize::from(x_size);
            if src_end > source.len() {
                return Err(Error::BufferOverflow);
            }

            self.cleanup_bisecting_edges(Position::new(dest.x, y), x_size, ' ');

            staged.clear();
            runs.clear();
            for info in &source[src_base..src_end] {
                staged.push(Cell {
                    glyph: info.glyph,
                    marker: info.marker,
                });
                match runs.last_mut() {
                    Some(run) if run.attr == info.attr => run.length += 1,
                    _ => runs.push(AttrRun::new(info.attr, 1)),
                }
            }
            // A leading half about to land on the clipped right edge (or the
            // buffer's bottom-right corner) would be split; space it out in
            // the transcription, source untouched.
            if let Some(last) = staged.last_mut()
                && last.is_leading()
            {
                *last = Cell::blank();
            }

            let row = self.buffer_mut().row_mut(y);
            row.chars_mut().overwrite(dest.x, &staged);
            row.attrs_mut()
                .insert_runs(&runs, dest.x, dest.x + x_size - 1)?;
            row.set_wrap_forced(false);
        }

        if let Some(plane) = attrs {
            for i in 0..y_size {
                let y = dest.y + i;
                let src_base = usize::from(src_rect.top + i) * usize::from(source_size.width)
                    + usize::from(src_rect.left);
                let row = self.buffer_mut().row_mut(y);
                let mut unpacked = row.attrs().unpack();
                let dest_base = usize::from(dest.x);
                unpacked[dest_base..dest_base + usize::from(x_size)]
                    .copy_from_slice(&plane[src_base..src_base + usize::from(x_size)]);
                row.attrs_mut().pack_from(&unpacked)?;
            }
        }
        Ok(())
    }

    /// Reduce any wide-glyph pair the span `[target.x, target.x + len)` on
    /// row `target.y` would cut through.
    ///
    /// A span starting on a trailing half erases the leading half before it
    /// (defensively reaching to the previous row's last column when the span
    /// starts at column 0). A span ending against a trailing half replaces
    /// that orphan with `orphan` (fills pass NUL, stream writes a space).
    fn cleanup_bisecting_edges(&mut self, target: Position, len: u16, orphan: char) {
        if len == 0 {
            return;
        }
        let size = self.buffer_size();
        let buffer = self.buffer_mut();

        // Start edge.
        let starts_on_trailing = buffer
            .row(target.y)
            .chars()
            .cell(target.x)
            .is_some_and(Cell::is_trailing);
        if starts_on_trailing {
            if target.x == 0 {
                // A pair can never legally span rows; clear the previous
                // row's edge anyway in case the buffer arrived corrupted.
                let prev_y = if target.y == 0 {
                    size.height - 1
                } else {
                    target.y - 1
                };
                buffer.row_mut(prev_y).chars_mut().clear_cell(size.width - 1);
            } else {
                buffer.row_mut(target.y).chars_mut().clear_cell(target.x - 1);
            }
        }

        // End edge.
        let end = target.x + len;
        if end < size.width {
            let ends_on_trailing = buffer
                .row(target.y)
                .chars()
                .cell(end)
                .is_some_and(Cell::is_trailing);
            if ends_on_trailing
                && let Some(cell) = buffer.row_mut(target.y).chars_mut().cell_mut(end)
            {
                *cell = Cell::single(orphan);
            }
        } else if target.y + 1 < size.height {
            let next_starts_trailing = buffer
                .row(target.y + 1)
                .chars()
                .cell(0)
                .is_some_and(Cell::is_trailing);
            if next_starts_trailing {
                buffer.row_mut(target.y + 1).chars_mut().clear_cell(0);
            }
        }
    }
}
