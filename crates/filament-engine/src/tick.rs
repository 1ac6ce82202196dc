//! The tick orchestrator: one full re-evaluation of the grid.
//!
//! Each tick runs a fixed sequence — expand macros, reset latch
//! indicators, scan for roots, then propagate in passes until every
//! multi-input element has settled or the pass budget is spent. The
//! engine owns everything that persists across ticks (tick counter,
//! RNG, macro cache); the grid is borrowed per call so that a shared
//! board can live behind whatever lock the host chooses.

use std::collections::HashMap;
use std::time::Instant;

use filament_core::{Coord, Diagnostic, ElementKind, Halt, Signal};
use filament_grid::{Grid, MarkGrid};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use smallvec::SmallVec;
use tracing::warn;

use crate::config::{ConfigError, WorldConfig};
use crate::macros::{stamp, MacroCache};
use crate::metrics::TickMetrics;
use crate::propagate::PassContext;
use crate::sync::Synchronizer;

/// Result of one [`TickEngine::execute_tick`] call.
#[derive(Clone, Debug)]
pub struct TickOutcome {
    /// Non-fatal conditions observed this tick, in the order seen.
    pub diagnostics: Vec<Diagnostic>,
    /// Set when an exit cell fired; the tick stopped at that point.
    pub halt: Option<Halt>,
    /// Activity counters for this tick.
    pub metrics: TickMetrics,
}

/// Synchronous, single-threaded circuit evaluator.
///
/// Call [`execute_tick`](Self::execute_tick) on a cadence of your
/// choosing; [`RealtimeWorld`](crate::RealtimeWorld) does exactly that
/// from a background thread.
pub struct TickEngine {
    config: WorldConfig,
    tick: u64,
    rng: ChaCha8Rng,
    sync: Synchronizer,
    macros: MacroCache,
    marks: Option<MarkGrid>,
}

impl TickEngine {
    /// Construct an engine from a validated configuration.
    pub fn new(config: WorldConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        let sync = Synchronizer::new(config.max_attempts);
        let macros = MacroCache::new(config.macro_dir.clone(), config.macro_extension.clone());
        Ok(Self {
            config,
            tick: 0,
            rng,
            sync,
            macros,
            marks: None,
        })
    }

    /// The number of completed ticks.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Evaluate one tick of the circuit in `grid`.
    pub fn execute_tick(&mut self, grid: &mut Grid) -> TickOutcome {
        let started = Instant::now();
        let mut metrics = TickMetrics::default();
        let mut diagnostics = Vec::new();
        let mut halt = None;

        // 1. Advance the tick counter; clocks derive from the new value.
        self.tick += 1;
        metrics.tick = self.tick;

        // 2. Expand macro invocations into the grid.
        metrics.macros_expanded = self.expand_macros(grid, &mut diagnostics);

        // 3. Reset latch indicators and collect the root set, skipping
        //    comment spans so their text is never read as elements.
        let roots = scan_roots(grid);
        metrics.roots = roots.len();

        // 4. Propagate from every root, re-running passes while gates
        //    and relays are still waiting for inputs.
        self.sync.reset();
        let mut random_draws: HashMap<Coord, Signal> = HashMap::new();
        let mut marks = self.take_marks(grid);
        let mut cells_visited = 0u64;
        for _pass in 0..self.config.max_passes {
            metrics.passes += 1;
            marks.begin_pass();
            let mut ctx = PassContext {
                grid: &mut *grid,
                marks: &mut marks,
                sync: &mut self.sync,
                rng: &mut self.rng,
                random_draws: &mut random_draws,
                tick: self.tick,
                diagnostics: &mut diagnostics,
                halt: &mut halt,
                cells_visited: &mut cells_visited,
            };
            for &root in &roots {
                ctx.propagate(None, root, Signal::BLANK);
            }
            if halt.is_some() || self.sync.unresolved() == 0 {
                break;
            }
        }

        // 5. Settle anything still waiting: elements whose inputs will
        //    never arrive fire with their documented defaults.
        metrics.starved_elements = self.sync.unresolved();
        if halt.is_none() && self.sync.unresolved() > 0 {
            let emissions = self.sync.drain_unresolved();
            marks.begin_pass();
            let mut ctx = PassContext {
                grid: &mut *grid,
                marks: &mut marks,
                sync: &mut self.sync,
                rng: &mut self.rng,
                random_draws: &mut random_draws,
                tick: self.tick,
                diagnostics: &mut diagnostics,
                halt: &mut halt,
                cells_visited: &mut cells_visited,
            };
            for (at, emission) in emissions {
                ctx.propagate(Some(at), at.step(emission.travel), emission.value);
            }
        }

        self.marks = Some(marks);
        metrics.cells_visited = cells_visited;
        metrics.duration = started.elapsed();
        TickOutcome {
            diagnostics,
            halt,
            metrics,
        }
    }

    /// Scan for `M` markers and stamp their sub-grids into place.
    fn expand_macros(&mut self, grid: &mut Grid, diagnostics: &mut Vec<Diagnostic>) -> u32 {
        let mut expanded = 0u32;
        for y in 0..grid.height() as i32 {
            let mut x = 0i32;
            while (x as u32) < grid.width() {
                if grid.get(Coord::new(x, y)) != 'M' {
                    x += 1;
                    continue;
                }
                // The name is the run of non-blank characters after the marker.
                let mut name = String::new();
                let mut nx = x + 1;
                while !grid.is_blank_at(Coord::new(nx, y)) {
                    name.push(grid.get(Coord::new(nx, y)));
                    nx += 1;
                }
                if name.is_empty() {
                    x += 1;
                    continue;
                }
                let at = Coord::new(x, y);
                match self.macros.fetch(&name) {
                    Ok(sub) => {
                        // The sub-grid lands below the marker row.
                        stamp(grid, Coord::new(x, y + 1), sub);
                        expanded += 1;
                    }
                    Err(err) => {
                        let diagnostic = Diagnostic::MacroLoadFailed {
                            at,
                            name: name.clone(),
                            reason: err.to_string(),
                        };
                        warn!(%at, %name, %err, "macro load failed");
                        diagnostics.push(diagnostic);
                    }
                }
                x = nx;
            }
        }
        expanded
    }

    /// Marks sized to the grid, reused across ticks while the grid's
    /// dimensions stay put.
    fn take_marks(&mut self, grid: &Grid) -> MarkGrid {
        match self.marks.take() {
            Some(marks) if marks.width() == grid.width() && marks.height() == grid.height() => {
                marks
            }
            _ => MarkGrid::new(grid.width(), grid.height()),
        }
    }
}

/// Reset latch indicator cells and collect source coordinates, jumping
/// over `_..._` comment spans.
fn scan_roots(grid: &mut Grid) -> SmallVec<[Coord; 8]> {
    let mut roots = SmallVec::new();
    for y in 0..grid.height() as i32 {
        let mut x = 0i32;
        while (x as u32) < grid.width() {
            let at = Coord::new(x, y);
            match ElementKind::classify(grid.get(at)) {
                ElementKind::CommentMark => {
                    x = grid.find_comment_end(x + 1, y) + 1;
                    continue;
                }
                ElementKind::LatchUp => grid.clear(at.offset(0, -1)),
                ElementKind::LatchDown => grid.clear(at.offset(0, 1)),
                kind if kind.is_root() => roots.push(at),
                _ => {}
            }
            x += 1;
        }
    }
    roots
}
