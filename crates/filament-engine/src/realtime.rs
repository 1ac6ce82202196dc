//! The realtime world: a shared grid re-evaluated on a fixed cadence.
//!
//! Three parties touch a live circuit — the tick thread, a renderer,
//! and an editor applying keystrokes. All three serialize on one coarse
//! lock held for the duration of a full tick, render, or edit; a tick
//! touches an unpredictable subset of the grid, so finer-grained
//! locking would buy nothing and complicate the traversal.
//!
//! The tick thread owns the [`TickEngine`] exclusively (moved in via
//! `thread::spawn`); diagnostics stream out over an unbounded channel.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crossbeam_channel::{Receiver, Sender};
use filament_core::{Diagnostic, Halt};
use filament_grid::Grid;
use tracing::debug;

use crate::config::{ConfigError, HaltBehavior, WorldConfig};
use crate::tick::TickEngine;

/// Stack for the tick thread. Propagation recurses once per wire cell,
/// so the bound is the longest connected run on the board; 16 MiB
/// leaves room for grids far larger than any terminal.
const TICK_STACK_BYTES: usize = 16 * 1024 * 1024;

/// A circuit world evaluated on a background thread.
///
/// Construction spawns the tick thread; [`shutdown`](Self::shutdown)
/// (or drop) stops and joins it. Collaborators get the grid via
/// [`grid`](Self::grid) and lock it for as long as one render or edit
/// takes.
pub struct RealtimeWorld {
    grid: Arc<Mutex<Grid>>,
    halted: Arc<Mutex<Option<Halt>>>,
    shutdown_flag: Arc<AtomicBool>,
    diag_rx: Receiver<Diagnostic>,
    tick_thread: Option<JoinHandle<()>>,
}

impl RealtimeWorld {
    /// Spawn a world around `grid`.
    pub fn new(grid: Grid, config: WorldConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let engine = TickEngine::new(config.clone())?;
        let grid = Arc::new(Mutex::new(grid));
        let halted = Arc::new(Mutex::new(None));
        let shutdown_flag = Arc::new(AtomicBool::new(false));
        let (diag_tx, diag_rx) = crossbeam_channel::unbounded();

        let thread_state = TickThread {
            engine,
            grid: Arc::clone(&grid),
            halted: Arc::clone(&halted),
            shutdown_flag: Arc::clone(&shutdown_flag),
            diag_tx,
            config,
        };
        let tick_thread = thread::Builder::new()
            .name("filament-tick".to_string())
            .stack_size(TICK_STACK_BYTES)
            .spawn(move || thread_state.run())
            .map_err(|err| ConfigError::ThreadSpawnFailed {
                reason: err.to_string(),
            })?;

        Ok(Self {
            grid,
            halted,
            shutdown_flag,
            diag_rx,
            tick_thread: Some(tick_thread),
        })
    }

    /// The shared grid handle. Lock it to render or edit; the tick
    /// thread takes the same lock for each full evaluation.
    pub fn grid(&self) -> Arc<Mutex<Grid>> {
        Arc::clone(&self.grid)
    }

    /// The diagnostic stream: short circuits, macro failures, alerts,
    /// and halts, in the order the engine saw them.
    pub fn diagnostics(&self) -> &Receiver<Diagnostic> {
        &self.diag_rx
    }

    /// The halt recorded under [`HaltBehavior::Signal`], if any.
    pub fn halt(&self) -> Option<Halt> {
        lock_unpoisoned(&self.halted).clone()
    }

    /// Whether the tick thread is still evaluating.
    pub fn is_running(&self) -> bool {
        self.tick_thread
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Stop the tick thread and join it. Idempotent.
    pub fn shutdown(&mut self) {
        self.shutdown_flag.store(true, Ordering::Release);
        if let Some(handle) = self.tick_thread.take() {
            // A panicked tick thread has nothing left to clean up.
            let _ = handle.join();
        }
    }
}

impl Drop for RealtimeWorld {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// State moved onto the tick thread.
struct TickThread {
    engine: TickEngine,
    grid: Arc<Mutex<Grid>>,
    halted: Arc<Mutex<Option<Halt>>>,
    shutdown_flag: Arc<AtomicBool>,
    diag_tx: Sender<Diagnostic>,
    config: WorldConfig,
}

impl TickThread {
    fn run(mut self) {
        loop {
            if self.shutdown_flag.load(Ordering::Acquire) {
                break;
            }
            let tick_start = Instant::now();

            // Hold the lock for the whole evaluation; the renderer and
            // editor wait their turn between ticks.
            let outcome = {
                let mut grid = lock_unpoisoned(&self.grid);
                self.engine.execute_tick(&mut grid)
            };

            for diagnostic in outcome.diagnostics {
                // Best effort: nobody has to listen.
                let _ = self.diag_tx.send(diagnostic);
            }

            if let Some(halt) = outcome.halt {
                match self.config.halt_behavior {
                    HaltBehavior::ExitProcess => {
                        eprintln!("{halt}");
                        std::process::exit(halt.status() as i32);
                    }
                    HaltBehavior::Signal => {
                        debug!(%halt, "tick thread stopping on halt");
                        *lock_unpoisoned(&self.halted) = Some(halt);
                        break;
                    }
                }
            }

            // Sleep off the rest of the tick budget.
            let elapsed = tick_start.elapsed();
            if let Some(remaining) = self.config.tick_interval.checked_sub(elapsed) {
                thread::sleep(remaining);
            }
        }
    }
}

/// Lock a mutex, riding over poisoning: a panicked renderer must not
/// take the whole world down with it.
fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
