//! Core types for the Filament circuit interpreter.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by the grid storage and evaluation engine:
//! coordinates and directions, base-36 signal values, the closed element
//! classification, and the diagnostic event type.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod coord;
mod diag;
mod element;
mod signal;

pub use coord::{Coord, Direction};
pub use diag::{Diagnostic, Halt};
pub use element::{ElementKind, GateOp, RelayKind, StyleClass};
pub use signal::Signal;
