//! The circuit board: a fixed-size grid of characters.

use filament_core::{Coord, Signal};

/// A rectangular board of symbol characters.
///
/// Dimensions are fixed for the lifetime of a run. All accessors are
/// edge-tolerant: [`get`](Grid::get) returns blank for out-of-range
/// coordinates and [`set`](Grid::set) ignores out-of-range writes, so
/// callers can walk off the edge freely.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<char>,
}

impl Grid {
    /// Create a blank grid of the given dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![' '; (width as usize) * (height as usize)],
        }
    }

    /// Grid width in cells.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in cells.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether `c` addresses a cell on this grid.
    pub fn in_bounds(&self, c: Coord) -> bool {
        c.x >= 0 && c.y >= 0 && (c.x as u32) < self.width && (c.y as u32) < self.height
    }

    fn index(&self, c: Coord) -> Option<usize> {
        if self.in_bounds(c) {
            Some((c.y as usize) * (self.width as usize) + c.x as usize)
        } else {
            None
        }
    }

    /// The character at `c`, or blank when `c` is off the grid.
    pub fn get(&self, c: Coord) -> char {
        match self.index(c) {
            Some(i) => self.cells[i],
            None => ' ',
        }
    }

    /// The character at `c` read as a signal.
    pub fn signal_at(&self, c: Coord) -> Signal {
        Signal::from_char(self.get(c))
    }

    /// Whether the cell at `c` holds no live data (off-grid counts).
    pub fn is_blank_at(&self, c: Coord) -> bool {
        self.signal_at(c).is_blank()
    }

    /// Write `ch` at `c`. Out-of-range writes are silently dropped.
    pub fn set(&mut self, c: Coord, ch: char) {
        if let Some(i) = self.index(c) {
            self.cells[i] = ch;
        }
    }

    /// Blank the cell at `c`.
    pub fn clear(&mut self, c: Coord) {
        self.set(c, ' ');
    }

    /// Scan rightward from `x` on row `y` for a comment delimiter.
    ///
    /// Returns the column of the next `_`, or the grid width when the
    /// row has none. The root scan uses this to jump over comment spans.
    pub fn find_comment_end(&self, x: i32, y: i32) -> i32 {
        let mut x = x;
        while (x as u32) < self.width && x >= 0 {
            if self.get(Coord::new(x, y)) == '_' {
                break;
            }
            x += 1;
        }
        x
    }

    /// The text of the next `_..._` comment span on row `y` at or after
    /// column `x`. Empty when the row has no comment.
    pub fn comment_text(&self, x: i32, y: i32) -> String {
        let open = self.find_comment_end(x, y);
        if open as u32 >= self.width {
            return String::new();
        }
        let mut text = String::new();
        let mut col = open + 1;
        while (col as u32) < self.width {
            let ch = self.get(Coord::new(col, y));
            if ch == '_' {
                break;
            }
            text.push(ch);
            col += 1;
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_reads_are_blank() {
        let g = Grid::new(4, 3);
        assert_eq!(g.get(Coord::new(-1, 0)), ' ');
        assert_eq!(g.get(Coord::new(0, -5)), ' ');
        assert_eq!(g.get(Coord::new(4, 0)), ' ');
        assert_eq!(g.get(Coord::new(0, 3)), ' ');
    }

    #[test]
    fn out_of_range_writes_are_dropped() {
        let mut g = Grid::new(4, 3);
        g.set(Coord::new(-1, 0), 'x');
        g.set(Coord::new(9, 9), 'x');
        assert!(g.cells.iter().all(|&c| c == ' '));
    }

    #[test]
    fn set_then_get_round_trips() {
        let mut g = Grid::new(4, 3);
        let c = Coord::new(2, 1);
        g.set(c, '*');
        assert_eq!(g.get(c), '*');
        g.clear(c);
        assert_eq!(g.get(c), ' ');
    }

    #[test]
    fn comment_text_extracts_the_span() {
        let mut g = Grid::new(16, 1);
        for (i, ch) in "E  _boom here_".chars().enumerate() {
            g.set(Coord::new(i as i32, 0), ch);
        }
        assert_eq!(g.comment_text(1, 0), "boom here");
        assert_eq!(g.find_comment_end(1, 0), 3);
    }

    #[test]
    fn rows_without_comments_yield_empty_text() {
        let g = Grid::new(8, 2);
        assert_eq!(g.comment_text(0, 0), "");
        assert_eq!(g.find_comment_end(0, 1), 8);
    }
}
