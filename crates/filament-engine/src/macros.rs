//! Macro sub-grids: loading, caching, and stamping.
//!
//! A macro invocation is an `M` cell followed by the macro's name; the
//! named sub-grid is loaded from `<name>.<extension>` in the configured
//! macro directory and stamped into the host grid below the marker row.
//! Loads are cached for the life of the engine — but only successes, so
//! a missing file is retried every tick and picks up the fix as soon as
//! the file appears.

use std::path::PathBuf;

use filament_core::{Coord, Signal};
use filament_grid::{text, Grid, GridError};
use indexmap::IndexMap;
use tracing::debug;

/// Loads and caches named macro sub-grids.
#[derive(Debug)]
pub struct MacroCache {
    dir: PathBuf,
    extension: String,
    loaded: IndexMap<String, Grid>,
}

impl MacroCache {
    /// Create a cache reading `<dir>/<name>.<extension>` files.
    pub fn new(dir: PathBuf, extension: String) -> Self {
        Self {
            dir,
            extension,
            loaded: IndexMap::new(),
        }
    }

    /// The sub-grid for `name`, loading it on first use.
    ///
    /// Failures are not cached: the next fetch retries the file.
    pub fn fetch(&mut self, name: &str) -> Result<&Grid, GridError> {
        if !self.loaded.contains_key(name) {
            let path = self.dir.join(format!("{name}.{}", self.extension));
            let grid = text::load(&path)?;
            debug!(name, path = %path.display(), "macro loaded");
            self.loaded.insert(name.to_string(), grid);
        }
        // Just inserted or already present.
        Ok(&self.loaded[name])
    }

    /// Number of distinct macros loaded so far.
    pub fn len(&self) -> usize {
        self.loaded.len()
    }

    /// Whether no macro has been loaded yet.
    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty()
    }
}

/// Stamp `sub` into `host` with its top-left cell at `anchor`.
///
/// Blank sub-grid cells are skipped, so a macro only overwrites where it
/// has something to say and host content shows through everywhere else.
/// Destinations outside the host are dropped by the grid's tolerant
/// writes.
pub fn stamp(host: &mut Grid, anchor: Coord, sub: &Grid) {
    for y in 0..sub.height() {
        for x in 0..sub.width() {
            let ch = sub.get(Coord::new(x as i32, y as i32));
            if Signal::from_char(ch).is_blank() {
                continue;
            }
            host.set(anchor.offset(x as i32, y as i32), ch);
        }
    }
}
