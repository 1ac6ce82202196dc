//! Diagnostic events surfaced by the evaluation engine.
//!
//! None of these abort a tick. They are delivered out-of-band (the
//! realtime world forwards them over a channel) so that a status line or
//! log can show them without the engine knowing who is listening.

use crate::coord::Coord;
use crate::signal::Signal;
use std::fmt;

/// A request to terminate the process, raised by an `E` cell.
///
/// The engine itself never exits; it records the first halt seen in a
/// tick and stops traversing. Whoever drives the engine decides what to
/// do with it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Halt {
    /// The exit cell that fired.
    pub at: Coord,
    /// The signal that arrived there.
    pub signal: Signal,
    /// Comment text found to the right of the exit cell, if any.
    pub message: String,
}

impl Halt {
    /// The process exit status this halt requests: the signal's base-36
    /// value. Signals without a numeric reading report status 1.
    pub fn status(&self) -> u32 {
        self.signal.value().unwrap_or(1)
    }
}

impl fmt::Display for Halt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "exit at {} with {} (status {})",
            self.at,
            self.signal,
            self.status()
        )?;
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        Ok(())
    }
}

/// A non-fatal condition observed during evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    /// A constant source was re-entered with a value that disagrees
    /// with its own literal.
    ShortCircuit {
        /// The source cell.
        at: Coord,
        /// The source's literal value.
        expected: Signal,
        /// The conflicting incoming value.
        got: Signal,
    },
    /// A macro's sub-grid file could not be loaded. The invocation site
    /// is left unexpanded and retried next tick.
    MacroLoadFailed {
        /// The macro marker cell.
        at: Coord,
        /// The macro name as written on the grid.
        name: String,
        /// Why the load failed.
        reason: String,
    },
    /// An alert cell received a non-zero signal.
    Alert {
        /// The alert cell.
        at: Coord,
        /// The signal that tripped it.
        signal: Signal,
    },
    /// An exit cell fired. Carries the full halt request for listeners
    /// that only watch the diagnostic stream.
    Halted(Halt),
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShortCircuit { at, expected, got } => {
                write!(f, "short circuit at {at}: {expected} != {got}")
            }
            Self::MacroLoadFailed { at, name, reason } => {
                write!(f, "macro '{name}' at {at} failed to load: {reason}")
            }
            Self::Alert { at, signal } => write!(f, "alert at {at}: {signal}"),
            Self::Halted(halt) => write!(f, "{halt}"),
        }
    }
}
