//! Run-length-encoded attribute storage for one row.
//!
//! A row's colors are stored as maximal runs of equal attributes. Every
//! mutation must leave the run lengths summing exactly to the row width with
//! no two adjacent runs equal; `insert_runs` is the single primitive that
//! splices new color data into the encoding while preserving both.

use smallvec::SmallVec;

use crate::cell::TextAttribute;
use crate::error::{Error, Result};

/// A span of contiguous columns sharing one attribute. `length` is never 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttrRun {
    pub attr: TextAttribute,
    pub length: u16,
}

impl AttrRun {
    /// Create a run of `length` columns of `attr`.
    #[must_use]
    pub fn new(attr: TextAttribute, length: u16) -> Self {
        Self { attr, length }
    }
}

/// Run-length-encoded attribute sequence covering one row exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrRow {
    runs: SmallVec<[AttrRun; 4]>,
    width: u16,
}

/// Append a run, merging into the previous one when the attributes match.
fn push_merged(runs: &mut Vec<AttrRun>, attr: TextAttribute, length: u16) {
    if length == 0 {
        return;
    }
    if let Some(last) = runs.last_mut()
        && last.attr == attr
    {
        last.length += length;
    } else {
        runs.push(AttrRun::new(attr, length));
    }
}

impl AttrRow {
    /// Create a row of `width` columns all carrying `attr`.
    #[must_use]
    pub fn new(width: u16, attr: TextAttribute) -> Self {
        Self {
            runs: SmallVec::from_elem(AttrRun::new(attr, width), 1),
            width,
        }
    }

    /// Row width this encoding covers.
    #[must_use]
    pub fn width(&self) -> u16 {
        self.width
    }

    /// The stored runs, in column order.
    #[must_use]
    pub fn runs(&self) -> &[AttrRun] {
        &self.runs
    }

    /// Sum of all run lengths. Equals `width()` unless a mutation broke the
    /// coverage invariant.
    #[must_use]
    pub fn total_length(&self) -> u32 {
        self.runs.iter().map(|r| u32::from(r.length)).sum()
    }

    /// Find the run covering `col`.
    ///
    /// Returns the attribute and how many columns, counting from `col`
    /// itself, the run still covers. With runs `{BLUE, 5}` a lookup at
    /// column 3 returns `(BLUE, 2)`.
    #[must_use]
    pub fn find_attr_at(&self, col: u16) -> (TextAttribute, u16) {
        debug_assert!(col < self.width, "attribute lookup past row width");
        let mut covered = 0u32;
        for run in &self.runs {
            covered += u32::from(run.length);
            if covered > u32::from(col) {
                return (run.attr, (covered - u32::from(col)) as u16);
            }
        }
        // Unreachable while the coverage invariant holds; fall back to the
        // final run rather than panicking on a corrupted row.
        let last = self.runs.last().expect("attr row always has one run");
        (last.attr, 1)
    }

    /// The attribute at `col`.
    #[must_use]
    pub fn attr_at(&self, col: u16) -> TextAttribute {
        self.find_attr_at(col).0
    }

    /// Splice `insert` over columns `[start, end_inclusive]`.
    ///
    /// Runs overlapping the span are split around it and any neighbors that
    /// end up equal are merged. On failure the row is left unmodified.
    pub fn insert_runs(&mut self, insert: &[AttrRun], start: u16, end_inclusive: u16) -> Result<()> {
        if start > end_inclusive || end_inclusive >= self.width {
            return Err(Error::InvalidParameter("attribute run span out of range"));
        }
        let span = u32::from(end_inclusive) - u32::from(start) + 1;
        let insert_length: u32 = insert.iter().map(|r| u32::from(r.length)).sum();
        if insert_length != span {
            return Err(Error::InvalidParameter(
                "inserted runs do not cover the target span",
            ));
        }

        // Fast paths for the overwhelmingly common one-run cases.
        if let [existing] = self.runs.as_slice()
            && let [incoming] = insert
        {
            if existing.attr == incoming.attr {
                return Ok(());
            }
            if start == 0 && end_inclusive == self.width - 1 {
                self.runs[0] = AttrRun::new(incoming.attr, self.width);
                return Ok(());
            }
        }

        let start = u32::from(start);
        let end = u32::from(end_inclusive);

        // Worst case: every existing run survives on one side of the splice
        // plus the inserted runs themselves.
        let mut rebuilt: Vec<AttrRun> = Vec::new();
        rebuilt
            .try_reserve(self.runs.len() * 2 + insert.len())
            .map_err(|_| Error::OutOfMemory)?;

        // Coverage before the splice, trimming the run it lands inside.
        let mut covered = 0u32;
        for run in &self.runs {
            if covered >= start {
                break;
            }
            let take = u32::from(run.length).min(start - covered);
            push_merged(&mut rebuilt, run.attr, take as u16);
            covered += u32::from(run.length);
        }

        for run in insert {
            push_merged(&mut rebuilt, run.attr, run.length);
        }

        // Coverage after the splice, trimming the run it ends inside.
        let mut covered = 0u32;
        for run in &self.runs {
            let run_end = covered + u32::from(run.length);
            if run_end > end + 1 {
                let keep_from = covered.max(end + 1);
                push_merged(&mut rebuilt, run.attr, (run_end - keep_from) as u16);
            }
            covered = run_end;
        }

        debug_assert_eq!(
            rebuilt.iter().map(|r| u32::from(r.length)).sum::<u32>(),
            u32::from(self.width),
        );
        self.runs = SmallVec::from_vec(rebuilt);
        Ok(())
    }

    /// Apply `attr` from `start` through the end of the row.
    pub fn set_attr_to_end(&mut self, start: u16, attr: TextAttribute) -> Result<()> {
        let length = self.width - start;
        self.insert_runs(&[AttrRun::new(attr, length)], start, self.width - 1)
    }

    /// Replace every run whose attribute equals `old` with `new`.
    ///
    /// Used when the default colors change, and with the inverted variant
    /// for popup highlights.
    pub fn replace_attrs(&mut self, old: TextAttribute, new: TextAttribute) {
        for run in &mut self.runs {
            if run.attr == old {
                run.attr = new;
            }
        }
        self.coalesce();
    }

    /// Change the covered width.
    ///
    /// Growing extends the final run over the new columns; shrinking cuts the
    /// encoding off at the run covering the new last column.
    pub fn resize(&mut self, new_width: u16) -> Result<()> {
        if new_width == 0 {
            return Err(Error::InvalidParameter("attribute row width must be > 0"));
        }
        if new_width > self.width {
            let last = self.runs.last_mut().expect("attr row always has one run");
            last.length += new_width - self.width;
        } else if new_width < self.width {
            let (_, remaining) = self.find_attr_at(new_width - 1);
            let mut covered = 0u32;
            let mut keep = 0usize;
            for (i, run) in self.runs.iter().enumerate() {
                covered += u32::from(run.length);
                if covered > u32::from(new_width - 1) {
                    keep = i;
                    break;
                }
            }
            // Trim the covering run so its tail ends exactly at the new width.
            self.runs[keep].length -= remaining - 1;
            self.runs.truncate(keep + 1);
        }
        self.width = new_width;
        Ok(())
    }

    /// Expand into one attribute per column.
    #[must_use]
    pub fn unpack(&self) -> Vec<TextAttribute> {
        let mut attrs = Vec::with_capacity(usize::from(self.width));
        for run in &self.runs {
            for _ in 0..run.length {
                attrs.push(run.attr);
            }
        }
        attrs
    }

    /// Rebuild the encoding from one attribute per column.
    pub fn pack_from(&mut self, attrs: &[TextAttribute]) -> Result<()> {
        if attrs.len() != usize::from(self.width) {
            return Err(Error::InvalidParameter(
                "attribute slice does not match row width",
            ));
        }
        let mut rebuilt: Vec<AttrRun> = Vec::new();
        rebuilt.try_reserve(self.runs.len()).map_err(|_| Error::OutOfMemory)?;
        for &attr in attrs {
            push_merged(&mut rebuilt, attr, 1);
        }
        self.runs = SmallVec::from_vec(rebuilt);
        Ok(())
    }

    fn coalesce(&mut self) {
        let mut i = 1;
        while i < self.runs.len() {
            if self.runs[i].attr == self.runs[i - 1].attr {
                self.runs[i - 1].length += self.runs[i].length;
                self.runs.remove(i);
            } else {
                i += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Color;

    fn attr(n: u8) -> TextAttribute {
        TextAttribute::new(Color::Indexed(n), Color::Default)
    }

    fn run(n: u8, len: u16) -> AttrRun {
        AttrRun::new(attr(n), len)
    }

    fn lengths(row: &AttrRow) -> Vec<u16> {
        row.runs().iter().map(|r| r.length).collect()
    }

    #[test]
    fn insert_splits_single_run() {
        // {7,80} + insert 15 over [10,20] => {7,10},{15,11},{7,59}
        let mut row = AttrRow::new(80, attr(7));
        row.insert_runs(&[run(15, 11)], 10, 20).unwrap();
        assert_eq!(row.runs(), &[run(7, 10), run(15, 11), run(7, 59)]);
        assert_eq!(row.total_length(), 80);
    }

    #[test]
    fn insert_same_attr_is_noop() {
        let mut row = AttrRow::new(40, attr(7));
        row.insert_runs(&[run(7, 5)], 3, 7).unwrap();
        assert_eq!(row.runs().len(), 1);
        assert_eq!(row.total_length(), 40);
    }

    #[test]
    fn insert_full_width_replaces() {
        let mut row = AttrRow::new(40, attr(7));
        row.insert_runs(&[run(2, 40)], 0, 39).unwrap();
        assert_eq!(row.runs(), &[run(2, 40)]);
    }

    #[test]
    fn insert_merges_with_left_neighbor() {
        // R3 G5 B2, insert G2 at [2,3]: the G piece joins the existing G run.
        let mut row = AttrRow::new(10, attr(1));
        row.insert_runs(&[run(2, 5)], 3, 7).unwrap();
        row.insert_runs(&[run(3, 2)], 8, 9).unwrap();
        assert_eq!(row.runs(), &[run(1, 3), run(2, 5), run(3, 2)]);

        row.insert_runs(&[run(2, 2)], 2, 3).unwrap();
        assert_eq!(row.runs(), &[run(1, 2), run(2, 6), run(3, 2)]);
        assert_eq!(row.total_length(), 10);
    }

    #[test]
    fn insert_merges_with_right_neighbor() {
        // R3 G5 B2, insert B5 over [3,7]: result R3 B7.
        let mut row = AttrRow::new(10, attr(1));
        row.insert_runs(&[run(2, 5)], 3, 7).unwrap();
        row.insert_runs(&[run(3, 2)], 8, 9).unwrap();

        row.insert_runs(&[run(3, 5)], 3, 7).unwrap();
        assert_eq!(row.runs(), &[run(1, 3), run(3, 7)]);
    }

    #[test]
    fn insert_recovers_skipped_tail_piece() {
        // R3 G5 B2 X5, insert Y2 at [7,8]: must keep the B1 remainder.
        let mut row = AttrRow::new(15, attr(1));
        row.insert_runs(&[run(2, 5)], 3, 7).unwrap();
        row.insert_runs(&[run(3, 2)], 8, 9).unwrap();
        row.insert_runs(&[run(4, 5)], 10, 14).unwrap();

        row.insert_runs(&[run(5, 2)], 7, 8).unwrap();
        assert_eq!(
            row.runs(),
            &[run(1, 3), run(2, 4), run(5, 2), run(3, 1), run(4, 5)]
        );
        assert_eq!(row.total_length(), 15);
    }

    #[test]
    fn insert_multiple_runs_at_once() {
        let mut row = AttrRow::new(10, attr(0));
        row.insert_runs(&[run(1, 1), run(2, 1)], 5, 6).unwrap();
        assert_eq!(
            row.runs(),
            &[run(0, 5), run(1, 1), run(2, 1), run(0, 3)]
        );
    }

    #[test]
    fn insert_rejects_bad_span() {
        let mut row = AttrRow::new(10, attr(0));
        assert_eq!(
            row.insert_runs(&[run(1, 1)], 5, 4),
            Err(Error::InvalidParameter("attribute run span out of range"))
        );
        assert_eq!(
            row.insert_runs(&[run(1, 1)], 9, 10),
            Err(Error::InvalidParameter("attribute run span out of range"))
        );
        // Row untouched after failures.
        assert_eq!(row.runs(), &[run(0, 10)]);
    }

    #[test]
    fn insert_rejects_mismatched_coverage() {
        let mut row = AttrRow::new(10, attr(0));
        assert!(row.insert_runs(&[run(1, 3)], 5, 6).is_err());
        assert_eq!(row.runs(), &[run(0, 10)]);
    }

    #[test]
    fn find_attr_reports_remaining_coverage() {
        let mut row = AttrRow::new(10, attr(1));
        row.insert_runs(&[run(2, 5)], 3, 7).unwrap();
        let (found, remaining) = row.find_attr_at(4);
        assert_eq!(found, attr(2));
        assert_eq!(remaining, 4);
        let (found, remaining) = row.find_attr_at(0);
        assert_eq!(found, attr(1));
        assert_eq!(remaining, 3);
    }

    #[test]
    fn set_attr_to_end_covers_tail() {
        let mut row = AttrRow::new(10, attr(1));
        row.set_attr_to_end(6, attr(2)).unwrap();
        assert_eq!(row.runs(), &[run(1, 6), run(2, 4)]);
    }

    #[test]
    fn replace_attrs_merges_resulting_neighbors() {
        let mut row = AttrRow::new(10, attr(1));
        row.insert_runs(&[run(2, 4)], 3, 6).unwrap();
        row.replace_attrs(attr(2), attr(1));
        assert_eq!(row.runs(), &[run(1, 10)]);
    }

    #[test]
    fn resize_grow_extends_last_run() {
        let mut row = AttrRow::new(5, attr(1));
        row.insert_runs(&[run(2, 2)], 3, 4).unwrap();
        row.resize(8).unwrap();
        assert_eq!(row.runs(), &[run(1, 3), run(2, 5)]);
        assert_eq!(row.total_length(), 8);
    }

    #[test]
    fn resize_shrink_truncates_runs() {
        let mut row = AttrRow::new(10, attr(1));
        row.insert_runs(&[run(2, 4)], 3, 6).unwrap();
        row.resize(5).unwrap();
        assert_eq!(row.runs(), &[run(1, 3), run(2, 2)]);
        assert_eq!(row.total_length(), 5);
    }

    #[test]
    fn unpack_pack_restores_runs() {
        let mut row = AttrRow::new(8, attr(1));
        row.insert_runs(&[run(2, 3)], 2, 4).unwrap();
        let mut attrs = row.unpack();
        assert_eq!(attrs.len(), 8);
        attrs[7] = attr(3);
        row.pack_from(&attrs).unwrap();
        assert_eq!(row.runs(), &[run(1, 2), run(2, 3), run(1, 2), run(3, 1)]);
    }
}
