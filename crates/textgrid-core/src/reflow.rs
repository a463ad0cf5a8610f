//! Buffer resize: traditional truncate/pad or full reflow.
//!
//! The reflow path rebuilds a new buffer by replaying every stored character
//! through the same width-aware insertion the write engine uses, which
//! re-wraps logical lines at the new width and re-derives the wrap flags.
//! The old buffer stays active until the new one is complete, so a failure
//! mid-walk leaves the screen untouched.

use tracing::debug;

use crate::error::{Error, Result};
use crate::geometry::{Position, Size};
use crate::screen::ScreenBuffer;
use crate::text_buffer::TextBuffer;

impl ScreenBuffer {
    /// Resize the buffer to `new_size`.
    ///
    /// With `reflow` unset this is the traditional resize: rows keep their
    /// contents up to the new width, new space is blank, nothing re-wraps,
    /// and the cursor is clamped into the new bounds. With `reflow` set,
    /// logical lines are re-wrapped and the cursor follows its character.
    pub fn resize(&mut self, new_size: Size, reflow: bool) -> Result<()> {
        if new_size.width == 0 || new_size.height == 0 {
            return Err(Error::InvalidParameter("buffer size must be non-zero"));
        }
        if reflow {
            self.resize_with_reflow(new_size)
        } else {
            let attr = self.attributes();
            self.buffer_mut().resize_traditional(new_size, attr)?;
            self.buffer_mut()
                .cursor_mut()
                .clamp_to(new_size.width, new_size.height);
            self.viewport_mut().clamp_to(new_size);
            Ok(())
        }
    }

    fn resize_with_reflow(&mut self, new_size: Size) -> Result<()> {
        let old_size = self.buffer_size();
        debug!(
            old_width = old_size.width,
            old_height = old_size.height,
            new_width = new_size.width,
            new_height = new_size.height,
            "reflow resize"
        );

        let mut new_buffer =
            TextBuffer::new(new_size, self.buffer().fill_attr(), self.buffer().width_policy())?;

        // The cursor keeps its height relative to the viewport across the swap.
        let cursor_height_before = i32::from(self.buffer().cursor().position().y)
            - i32::from(self.viewport().top());

        // Intermediate cursor placements in either buffer must not be drawn.
        self.buffer_mut().cursor_mut().start_defer_drawing();
        new_buffer.cursor_mut().start_defer_drawing();

        let result = self.reflow_into(&mut new_buffer);

        // Both defer flags are released on every path out of here.
        self.buffer_mut().cursor_mut().end_defer_drawing();
        match result {
            Ok(()) => {
                new_buffer.copy_properties(self.buffer());
                let cursor_height_after =
                    i32::from(new_buffer.cursor().position().y) - i32::from(self.viewport().top());
                new_buffer.cursor_mut().end_defer_drawing();
                self.replace_buffer(new_buffer);
                self.viewport_mut().clamp_to(new_size);
                self.viewport_mut()
                    .shift_vertical(cursor_height_after - cursor_height_before, new_size);
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    /// Walk the old buffer top to bottom and replay its content into
    /// `new_buffer`, tracking where the cursor lands.
    fn reflow_into(&self, new_buffer: &mut TextBuffer) -> Result<()> {
        let old_cursor_pos = self.buffer().cursor().position();
        let old_last_char = self.buffer().last_non_space_position();
        let old_rows_total = old_last_char.y + 1;
        let old_cols_total = self.buffer().width();

        let mut found_cursor = false;
        let mut new_cursor_pos = Position::origin();

        for old_y in 0..old_rows_total {
            let row = self.buffer().row(old_y);
            let wrap_forced = row.was_wrap_forced();

            // The copy boundary is the measured text end, except a wrapped
            // row keeps its trailing spaces (they are real content under a
            // soft wrap), minus the padding cell a wide glyph forced in.
            let mut right = row.chars().measure_right();
            if wrap_forced {
                right = old_cols_total;
                if row.was_double_byte_padded() {
                    right -= 1;
                }
            }

            for old_x in 0..right {
                if old_x == old_cursor_pos.x && old_y == old_cursor_pos.y {
                    new_cursor_pos = new_buffer.cursor().position();
                    found_cursor = true;
                }
                let row = self.buffer().row(old_y);
                let cell = *row
                    .chars()
                    .cell(old_x)
                    .expect("column below the measured right boundary");
                let attr = row.attrs().attr_at(old_x);
                new_buffer.insert_character(cell.glyph, cell.marker, attr)?;
            }

            if right < old_cols_total && !wrap_forced {
                // The old row ended in a hard break. A cursor sitting one
                // past the text is captured here, at the equivalent point in
                // the new write stream.
                if right == old_cursor_pos.x && old_y == old_cursor_pos.y {
                    new_cursor_pos = new_buffer.cursor().position();
                    found_cursor = true;
                }
                if old_y < old_rows_total - 1 {
                    new_buffer.newline_cursor();
                } else {
                    // Final line: leave the cursor where printing finished,
                    // unless the content exactly filled the new row and
                    // soft-wrapped, which would silently swallow the hard
                    // break. One extra newline preserves it for future
                    // reflows.
                    let pos = new_buffer.cursor().position();
                    if pos.x == 0 && pos.y > 0 && new_buffer.row(pos.y - 1).was_wrap_forced() {
                        new_buffer.newline_cursor();
                    }
                }
            }
        }

        if found_cursor {
            new_buffer.cursor_mut().set_position(new_cursor_pos);
        } else {
            // The old cursor sat beyond the measured content. Replay the
            // row/column delta between the old text end and the old cursor
            // onto the new text end.
            let mut newlines = i32::from(old_cursor_pos.y) - i32::from(old_last_char.y);
            let increments = i32::from(old_cursor_pos.x) - i32::from(old_last_char.x);
            let new_last_char = new_buffer.last_non_space_position();

            if new_buffer.row(new_last_char.y).was_wrap_forced() {
                // The new final row wrapped: the cursor is already on the
                // next line, so one fewer newline is needed.
                newlines = (newlines - 1).max(0);
            } else if self.buffer().row(old_last_char.y).was_wrap_forced() {
                // The old final row wrapped but the new one does not: the
                // old column delta spans one extra line.
                newlines = (newlines - 1).max(0);
            }

            for _ in 0..newlines {
                new_buffer.newline_cursor();
            }
            for _ in 0..(increments - 1).max(0) {
                new_buffer.increment_cursor();
            }
        }
        Ok(())
    }
}
