//! Grid storage and the circuit text format.
//!
//! A [`Grid`] is a fixed `width × height` board of characters with
//! edge-tolerant accessors: reads outside the board return blank, writes
//! outside it are ignored. This tolerance is a contract the evaluation
//! engine relies on — traversal recurses toward the edges without bounds
//! guards at every call site.
//!
//! [`MarkGrid`] provides the per-pass visited marks, and [`text`] the
//! persisted form (one row of characters per line).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod grid;
mod marks;
pub mod text;

pub use grid::Grid;
pub use marks::MarkGrid;
pub use text::GridError;
