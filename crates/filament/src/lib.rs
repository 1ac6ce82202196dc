//! Filament: a live interpreter for a grid-drawn circuit language.
//!
//! A circuit is a 2-D grid of characters. Sources (`*`, `R`, `C`) emit
//! base-36 signals; wires (`-`, `|`, `@`), diodes (`>`, `<`) and
//! bridges (`/`, `\`) carry them; gates (`=`, `.`, `+`, `#`, `^`),
//! relays (`S`, `Z`), latches (`L`, `J`), alerts (`?`) and exits (`E`)
//! act on them. The engine re-evaluates the whole grid on a fixed
//! cadence.
//!
//! # Quick start
//!
//! ```rust
//! use filament::prelude::*;
//!
//! // A constant 1 on a wire into a latch; the latch shows its value
//! // in the cell above itself.
//! let mut grid = filament::grid::text::parse("\n1*-L-");
//!
//! let mut engine = TickEngine::new(WorldConfig::default()).unwrap();
//! let outcome = engine.execute_tick(&mut grid);
//! assert!(outcome.halt.is_none());
//! assert_eq!(grid.get(Coord::new(3, 0)), '1');
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `filament-core` | Coordinates, signals, element classification, diagnostics |
//! | [`grid`] | `filament-grid` | Grid storage, visit marks, the circuit text format |
//! | [`engine`] | `filament-engine` | Synchronizer, tick engine, macro cache, realtime world |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core vocabulary (`filament-core`).
///
/// Coordinates and directions, base-36 [`types::Signal`] values, the
/// closed [`types::ElementKind`] classification, and diagnostics.
pub use filament_core as types;

/// Grid storage and text format (`filament-grid`).
///
/// [`grid::Grid`] with edge-tolerant accessors, [`grid::MarkGrid`]
/// visit marks, and the [`grid::text`] circuit file format.
pub use filament_grid as grid;

/// The evaluation engine (`filament-engine`).
///
/// [`engine::TickEngine`] for synchronous stepping,
/// [`engine::RealtimeWorld`] for the background tick loop, plus the
/// [`engine::Synchronizer`] and [`engine::MacroCache`].
pub use filament_engine as engine;

/// Common imports for typical usage.
///
/// ```rust
/// use filament::prelude::*;
/// ```
pub mod prelude {
    // Core vocabulary
    pub use filament_core::{
        Coord, Diagnostic, Direction, ElementKind, GateOp, Halt, RelayKind, Signal, StyleClass,
    };

    // Grid and text format
    pub use filament_grid::{Grid, GridError, MarkGrid};

    // Engine
    pub use filament_engine::{
        ConfigError, HaltBehavior, MacroCache, RealtimeWorld, TickEngine, TickMetrics,
        TickOutcome, WorldConfig,
    };
}
