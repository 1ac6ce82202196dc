//! Evaluation engine for the Filament circuit interpreter.
//!
//! The engine re-evaluates a whole grid each tick: macros are expanded,
//! latch indicators reset, source cells located, and signals propagated
//! recursively through the wiring. Elements that need several
//! simultaneous inputs (gates, relays) are coordinated by the
//! [`Synchronizer`] across a bounded number of passes.
//!
//! [`TickEngine`] is the synchronous, callable form — one
//! [`execute_tick`](TickEngine::execute_tick) call evaluates one tick.
//! [`RealtimeWorld`] wraps it in a background thread that shares the
//! grid with an editor and renderer behind a single coarse lock.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod config;
mod macros;
mod metrics;
mod propagate;
mod realtime;
mod sync;
mod tick;

pub use config::{ConfigError, HaltBehavior, WorldConfig};
pub use macros::{stamp, MacroCache};
pub use metrics::TickMetrics;
pub use realtime::RealtimeWorld;
pub use sync::{Emission, Synchronizer};
pub use tick::{TickEngine, TickOutcome};
