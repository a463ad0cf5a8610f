//! VT tab stops: a sparse ordered set of columns.

use std::collections::BTreeSet;

use crate::geometry::{Position, Size};

/// Ordered set of tab-stop columns in `[0, bufferWidth)`.
///
/// Created empty; cleared entirely on buffer reset. Duplicate adds are
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabStops {
    stops: BTreeSet<u16>,
}

impl TabStops {
    /// An empty tab-stop set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a tab stop at `column`.
    pub fn add(&mut self, column: u16) {
        self.stops.insert(column);
    }

    /// Clear the tab stop at `column`, if set.
    pub fn clear_at(&mut self, column: u16) {
        self.stops.remove(&column);
    }

    /// Clear every tab stop.
    pub fn clear(&mut self) {
        self.stops.clear();
    }

    /// Whether any tab stops are set.
    #[must_use]
    pub fn any_set(&self) -> bool {
        !self.stops.is_empty()
    }

    /// The position a forward tab moves to from `pos`.
    ///
    /// The smallest stop past the current column, else the last column; a
    /// tab already at the last column wraps to column 0 of the next row
    /// (clamped to the bottom of the buffer).
    #[must_use]
    pub fn forward_tab(&self, pos: Position, size: Size) -> Position {
        let last_column = size.width - 1;
        if pos.x == last_column {
            return Position::new(0, (pos.y + 1).min(size.height - 1));
        }
        let next = self
            .stops
            .range(pos.x + 1..)
            .next()
            .copied()
            .unwrap_or(last_column);
        Position::new(next.min(last_column), pos.y)
    }

    /// The position a reverse tab moves to from `pos`: the largest stop
    /// before the current column, else column 0.
    #[must_use]
    pub fn reverse_tab(&self, pos: Position) -> Position {
        let prev = self.stops.range(..pos.x).next_back().copied().unwrap_or(0);
        Position::new(prev, pos.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size() -> Size {
        Size::new(80, 25)
    }

    #[test]
    fn add_is_ordered_and_dedups() {
        let mut tabs = TabStops::new();
        tabs.add(16);
        tabs.add(8);
        tabs.add(16);
        assert!(tabs.any_set());
        assert_eq!(tabs.forward_tab(Position::new(0, 0), size()).x, 8);
        assert_eq!(tabs.forward_tab(Position::new(8, 0), size()).x, 16);
    }

    #[test]
    fn forward_tab_without_stops_goes_to_last_column() {
        let tabs = TabStops::new();
        assert_eq!(tabs.forward_tab(Position::new(10, 3), size()), Position::new(79, 3));
    }

    #[test]
    fn forward_tab_at_last_column_wraps_to_next_row() {
        let tabs = TabStops::new();
        assert_eq!(tabs.forward_tab(Position::new(79, 3), size()), Position::new(0, 4));
        // At the bottom row it stays on the bottom row.
        assert_eq!(
            tabs.forward_tab(Position::new(79, 24), size()),
            Position::new(0, 24)
        );
    }

    #[test]
    fn reverse_tab_finds_previous_stop() {
        let mut tabs = TabStops::new();
        tabs.add(8);
        tabs.add(16);
        assert_eq!(tabs.reverse_tab(Position::new(20, 2)), Position::new(16, 2));
        assert_eq!(tabs.reverse_tab(Position::new(16, 2)), Position::new(8, 2));
        assert_eq!(tabs.reverse_tab(Position::new(8, 2)), Position::new(0, 2));
        assert_eq!(tabs.reverse_tab(Position::new(0, 2)), Position::new(0, 2));
    }

    #[test]
    fn clear_at_removes_single_stop() {
        let mut tabs = TabStops::new();
        tabs.add(8);
        tabs.add(16);
        tabs.clear_at(8);
        assert_eq!(tabs.forward_tab(Position::new(0, 0), size()).x, 16);
        tabs.clear();
        assert!(!tabs.any_set());
    }
}
