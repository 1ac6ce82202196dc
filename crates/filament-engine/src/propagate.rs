//! Recursive signal propagation.
//!
//! One [`PassContext::propagate`] call walks outward from a cell,
//! dispatching on the element stored there and recursing into its
//! neighbours. Cycle safety comes from a single invariant: a cell is
//! marked visited *before* any recursion into its neighbours, and a
//! marked cell is never re-entered within the pass, so a wiring loop
//! terminates after at most one traversal of the loop.

use std::collections::HashMap;

use filament_core::{Coord, Diagnostic, Direction, ElementKind, Halt, Signal};
use filament_grid::{Grid, MarkGrid};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use tracing::warn;

use crate::sync::Synchronizer;

/// Default clock divisor exponent: the tick counter is divided by
/// `2^4 = 16` when no exponent parameter is written.
const DEFAULT_CLOCK_SHIFT: u32 = 4;

/// Mutable state threaded through one propagation pass.
///
/// All fields borrow from the tick orchestrator; the context itself is
/// rebuilt per pass (with fresh marks) while the synchronizer, random
/// draws and diagnostics accumulate across the whole tick.
pub(crate) struct PassContext<'a> {
    pub grid: &'a mut Grid,
    pub marks: &'a mut MarkGrid,
    pub sync: &'a mut Synchronizer,
    pub rng: &'a mut ChaCha8Rng,
    /// One draw per random-source cell per tick, whatever the pass count.
    pub random_draws: &'a mut HashMap<Coord, Signal>,
    pub tick: u64,
    pub diagnostics: &'a mut Vec<Diagnostic>,
    pub halt: &'a mut Option<Halt>,
    pub cells_visited: &'a mut u64,
}

impl PassContext<'_> {
    /// Propagate `value` into the cell at `at`.
    ///
    /// `from` is the cell the signal came from, or `None` for the root
    /// invocations the orchestrator makes directly on source cells.
    pub fn propagate(&mut self, from: Option<Coord>, at: Coord, value: Signal) {
        // An exit cell has already fired: unwind without touching
        // anything further this tick.
        if self.halt.is_some() {
            return;
        }
        if !self.grid.in_bounds(at) {
            return;
        }
        match ElementKind::classify(self.grid.get(at)) {
            ElementKind::ConstantSource => self.constant_source(at, value),
            ElementKind::RandomSource => self.random_source(at),
            ElementKind::ClockSource => self.clock_source(at),
            ElementKind::WireHorizontal => {
                self.conduct(at, value, &[Direction::Left, Direction::Right])
            }
            ElementKind::WireVertical => {
                self.conduct(at, value, &[Direction::Up, Direction::Down])
            }
            ElementKind::BridgeStart => self.bridge_start(at, value),
            ElementKind::BridgeEnd => self.bridge_end(at, value),
            ElementKind::Junction => self.conduct(at, value, &Direction::ALL),
            ElementKind::Buffer => self.buffer(from, at, value),
            ElementKind::DiodeRight => self.diode(at, value, Direction::Right),
            ElementKind::DiodeLeft => self.diode(at, value, Direction::Left),
            ElementKind::Inverter => self.conduct(at, value.invert(), &Direction::ALL),
            ElementKind::LatchUp => self.latch(at, value, Direction::Up),
            ElementKind::LatchDown => self.latch(at, value, Direction::Down),
            ElementKind::Exit => self.exit(at, value),
            ElementKind::Alert => self.alert(at, value),
            ElementKind::Gate(op) => {
                let Some(travel) = arrival(from, at) else {
                    return;
                };
                if let Some(emission) = self.sync.gate_arrival(at, op, travel, value) {
                    *self.cells_visited += 1;
                    self.propagate(Some(at), at.step(emission.travel), emission.value);
                }
            }
            ElementKind::Relay(kind) => {
                let Some(travel) = arrival(from, at) else {
                    return;
                };
                if let Some(emission) = self.sync.relay_arrival(at, kind, travel, value) {
                    *self.cells_visited += 1;
                    self.propagate(Some(at), at.step(emission.travel), emission.value);
                }
            }
            // Data cells are parameters and literals, read by their
            // neighbours; signals stop on them, as on anything inert.
            ElementKind::Data(_)
            | ElementKind::MacroMark
            | ElementKind::CommentMark
            | ElementKind::Inert => {}
        }
    }

    /// Mark `at` and fan `value` out in each of `dirs`. The shared
    /// behavior of wires, junctions and inverters.
    fn conduct(&mut self, at: Coord, value: Signal, dirs: &[Direction]) {
        if self.marks.marked(at) {
            return;
        }
        self.marks.mark(at);
        *self.cells_visited += 1;
        for &dir in dirs {
            self.propagate(Some(at), at.step(dir), value);
        }
    }

    fn constant_source(&mut self, at: Coord, value: Signal) {
        let literal_cell = at.step(Direction::Left);
        let literal = self.grid.signal_at(literal_cell);
        // A wire driving this source with a foreign value is a short
        // circuit, whether it gets here before or after the source's
        // own broadcast. Root invocations carry blank and never flag.
        if !value.is_blank() && value != literal {
            let diagnostic = Diagnostic::ShortCircuit {
                at,
                expected: literal,
                got: value,
            };
            warn!(%at, %literal, %value, "short circuit");
            self.diagnostics.push(diagnostic);
        }
        if self.marks.marked(at) || self.marks.marked(literal_cell) {
            return;
        }
        self.marks.mark(at);
        self.marks.mark(literal_cell);
        *self.cells_visited += 1;
        // Broadcast away from the literal: up, right, down.
        for dir in [Direction::Up, Direction::Right, Direction::Down] {
            self.propagate(Some(at), at.step(dir), literal);
        }
    }

    fn random_source(&mut self, at: Coord) {
        let param_cell = at.step(Direction::Left);
        if self.marks.marked(at) || self.marks.marked(param_cell) {
            return;
        }
        self.marks.mark(at);
        self.marks.mark(param_cell);
        *self.cells_visited += 1;
        let draw = match self.random_draws.get(&at) {
            Some(&draw) => draw,
            None => {
                let max = self
                    .grid
                    .signal_at(param_cell)
                    .value()
                    .filter(|&max| max > 0)
                    .unwrap_or(1);
                let draw = Signal::from_value(self.rng.random_range(0..max));
                self.random_draws.insert(at, draw);
                draw
            }
        };
        for dir in [Direction::Up, Direction::Right, Direction::Down] {
            self.propagate(Some(at), at.step(dir), draw);
        }
    }

    fn clock_source(&mut self, at: Coord) {
        let mut modulus = 2u64;
        let mut shift = DEFAULT_CLOCK_SHIFT;
        let modulus_cell = at.step(Direction::Left);
        if let Some(m) = self.grid.signal_at(modulus_cell).value() {
            self.marks.mark(modulus_cell);
            // A written zero means the full base-36 range.
            modulus = if m == 0 { 36 } else { u64::from(m) };
            let shift_cell = modulus_cell.step(Direction::Left);
            if let Some(s) = self.grid.signal_at(shift_cell).value() {
                self.marks.mark(shift_cell);
                shift = s;
            }
        }
        if self.marks.marked(at) {
            return;
        }
        self.marks.mark(at);
        *self.cells_visited += 1;
        let clock = (self.tick >> shift) % modulus;
        let value = Signal::from_value(clock as u32);
        for dir in Direction::ALL {
            self.propagate(Some(at), at.step(dir), value);
        }
    }

    fn bridge_start(&mut self, at: Coord, value: Signal) {
        // Scan the row rightward for the matching `\`.
        let mut x = at.x + 1;
        let partner = loop {
            if x as u32 >= self.grid.width() {
                break None;
            }
            if self.grid.get(Coord::new(x, at.y)) == '\\' {
                break Some(Coord::new(x, at.y));
            }
            x += 1;
        };
        // No partner on the row: inert this tick.
        let Some(partner) = partner else { return };
        if self.marks.marked(at) || self.marks.marked(partner) {
            return;
        }
        self.marks.mark(at);
        self.marks.mark(partner);
        *self.cells_visited += 1;
        self.propagate(Some(at), partner.step(Direction::Right), value);
        self.propagate(Some(at), at.step(Direction::Left), value);
    }

    fn bridge_end(&mut self, at: Coord, value: Signal) {
        // Scan the row leftward for the matching `/`.
        let mut x = at.x - 1;
        let partner = loop {
            if x < 0 {
                break None;
            }
            if self.grid.get(Coord::new(x, at.y)) == '/' {
                break Some(Coord::new(x, at.y));
            }
            x -= 1;
        };
        let Some(partner) = partner else { return };
        if self.marks.marked(at) || self.marks.marked(partner) {
            return;
        }
        self.marks.mark(at);
        self.marks.mark(partner);
        *self.cells_visited += 1;
        self.propagate(Some(at), partner.step(Direction::Left), value);
        self.propagate(Some(at), at.step(Direction::Left), value);
    }

    fn buffer(&mut self, from: Option<Coord>, at: Coord, value: Signal) {
        // Input side is the left neighbour only.
        if arrival(from, at) != Some(Direction::Right) {
            return;
        }
        if self.marks.marked(at) {
            return;
        }
        self.marks.mark(at);
        *self.cells_visited += 1;
        self.propagate(Some(at), at.step(Direction::Right), value.to_binary());
    }

    fn diode(&mut self, at: Coord, value: Signal, out: Direction) {
        if self.marks.marked(at) {
            return;
        }
        self.marks.mark(at);
        *self.cells_visited += 1;
        // Diodes block dead signals as well as reverse flow.
        if value.is_zero() {
            return;
        }
        self.propagate(Some(at), at.step(out), value);
    }

    fn latch(&mut self, at: Coord, value: Signal, display: Direction) {
        if self.marks.marked(at) {
            return;
        }
        let display_cell = at.step(display);
        self.marks.mark(at);
        self.marks.mark(display_cell);
        *self.cells_visited += 1;
        self.grid.set(display_cell, value.char());
        self.propagate(Some(at), at.step(Direction::Left), value);
        self.propagate(Some(at), at.step(Direction::Right), value);
    }

    fn exit(&mut self, at: Coord, value: Signal) {
        if self.marks.marked(at) {
            return;
        }
        self.marks.mark(at);
        *self.cells_visited += 1;
        if value.is_zero() {
            return;
        }
        let message = self.grid.comment_text(at.x + 1, at.y);
        let halt = Halt {
            at,
            signal: value,
            message,
        };
        warn!(%at, %value, status = halt.status(), "exit cell fired");
        self.diagnostics.push(Diagnostic::Halted(halt.clone()));
        *self.halt = Some(halt);
    }

    fn alert(&mut self, at: Coord, value: Signal) {
        if self.marks.marked(at) {
            return;
        }
        self.marks.mark(at);
        *self.cells_visited += 1;
        if value.is_zero() {
            return;
        }
        warn!(%at, %value, "alert");
        self.diagnostics.push(Diagnostic::Alert { at, signal: value });
    }
}

/// The direction a signal was traveling when it stepped from `from`
/// into `at`. `None` for root invocations and non-adjacent calls.
fn arrival(from: Option<Coord>, at: Coord) -> Option<Direction> {
    Direction::of_step(from?, at)
}
