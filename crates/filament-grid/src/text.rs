//! The circuit text format.
//!
//! A circuit file is a rectangular block of symbol characters, one row
//! per line. Rows shorter than the widest line read as blank-padded.
//! On save, trailing all-blank rows and columns are trimmed so that
//! hand-edited files stay small.

use std::error::Error;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use filament_core::{Coord, Signal};
use tracing::debug;

use crate::grid::Grid;

/// Errors from circuit file I/O.
#[derive(Debug)]
pub enum GridError {
    /// Reading or writing a circuit file failed.
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
        }
    }
}

impl Error for GridError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
        }
    }
}

/// Parse circuit text into a grid sized exactly to its content.
pub fn parse(text: &str) -> Grid {
    parse_sized(text, 0, 0)
}

/// Parse circuit text into a grid at least `min_width × min_height`.
///
/// Hosts use this to open a small file onto a terminal-sized board so
/// the editor has room to grow the circuit.
pub fn parse_sized(text: &str, min_width: u32, min_height: u32) -> Grid {
    let mut width = 0u32;
    let mut height = 0u32;
    for line in text.lines() {
        width = width.max(line.chars().count() as u32);
        height += 1;
    }
    let mut grid = Grid::new(width.max(min_width), height.max(min_height));
    for (y, line) in text.lines().enumerate() {
        for (x, ch) in line.chars().enumerate() {
            grid.set(Coord::new(x as i32, y as i32), ch);
        }
    }
    grid
}

/// Serialize a grid, trimming trailing all-blank rows and columns.
pub fn to_text(grid: &Grid) -> String {
    let mut used_width = 0u32;
    let mut used_height = 0u32;
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            if !Signal::from_char(grid.get(Coord::new(x as i32, y as i32))).is_blank() {
                used_width = used_width.max(x + 1);
                used_height = used_height.max(y + 1);
            }
        }
    }

    let mut out = String::new();
    for y in 0..used_height {
        for x in 0..used_width {
            let ch = grid.get(Coord::new(x as i32, y as i32));
            out.push(if ch == '\0' { ' ' } else { ch });
        }
        // Trim the row's own trailing blanks.
        while out.ends_with(' ') {
            out.pop();
        }
        out.push('\n');
    }
    out
}

/// Load a circuit file, sized exactly to its content.
pub fn load(path: &Path) -> Result<Grid, GridError> {
    let text = fs::read_to_string(path).map_err(|source| GridError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let grid = parse(&text);
    debug!(
        path = %path.display(),
        width = grid.width(),
        height = grid.height(),
        "loaded circuit"
    );
    Ok(grid)
}

/// Save a grid to a circuit file in trimmed form.
pub fn save(path: &Path, grid: &Grid) -> Result<(), GridError> {
    let text = to_text(grid);
    fs::write(path, &text).map_err(|source| GridError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "saved circuit");
    Ok(())
}
