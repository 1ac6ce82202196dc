//! The multi-input synchronizer for gates and relays.
//!
//! A two-input gate or a relay cannot fire on its first visit: its
//! inputs may arrive from different root traversals, possibly in
//! different passes of the same tick. The synchronizer holds each such
//! element's partial inputs in an explicit scratch record keyed by
//! coordinate — never in grid cells, so rendering sees only what the
//! circuit author drew — and decides, per arrival, whether the element
//! fires now, keeps waiting, or relaxes to its default output.
//!
//! The protocol tolerates inputs in any order and is idempotent against
//! redundant re-delivery within a tick: a register records the latest
//! value for its direction, and an element that has fired swallows all
//! further arrivals until the next tick.

use filament_core::{Coord, Direction, GateOp, RelayKind, Signal};
use indexmap::{IndexMap, IndexSet};

/// An output produced by a fired element: the value and the direction
/// it travels from the element's cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Emission {
    /// Direction of travel away from the element.
    pub travel: Direction,
    /// The emitted signal.
    pub value: Signal,
}

/// Partial inputs of one waiting element.
#[derive(Clone, Debug)]
enum Scratch {
    Gate {
        op: GateOp,
        top: Option<Signal>,
        bottom: Option<Signal>,
    },
    Relay {
        kind: RelayKind,
        /// Derived switch state, cached from the control arrival.
        engaged: Option<bool>,
        left: Option<Signal>,
        right: Option<Signal>,
    },
}

#[derive(Clone, Debug)]
struct PendingCell {
    attempts: u32,
    scratch: Scratch,
}

/// Coordinates multi-input elements across the passes of one tick.
///
/// Entries exist only for elements that have received at least one
/// input and not yet fired; [`reset`](Synchronizer::reset) clears all
/// state between ticks.
#[derive(Debug)]
pub struct Synchronizer {
    max_attempts: u32,
    pending: IndexMap<Coord, PendingCell>,
    fired: IndexSet<Coord>,
}

impl Synchronizer {
    /// Create a synchronizer that relaxes elements to their default
    /// output after `max_attempts` incomplete visits.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            pending: IndexMap::new(),
            fired: IndexSet::new(),
        }
    }

    /// Number of elements still waiting for inputs.
    pub fn unresolved(&self) -> usize {
        self.pending.len()
    }

    /// Forget all per-tick state. Called by the orchestrator at the
    /// start of every tick.
    pub fn reset(&mut self) {
        self.pending.clear();
        self.fired.clear();
    }

    /// Record a signal arriving at a gate.
    ///
    /// `travel` is the direction the signal was moving when it entered
    /// the gate's cell: `Down` lands in the top register, `Up` in the
    /// bottom one; arrivals from other directions are ignored entirely.
    /// Returns the gate's output when this arrival makes it fire.
    pub fn gate_arrival(
        &mut self,
        at: Coord,
        op: GateOp,
        travel: Direction,
        value: Signal,
    ) -> Option<Emission> {
        if self.fired.contains(&at) {
            return None;
        }
        // Only vertical arrivals are gate inputs; side arrivals must
        // not even register the element as pending.
        if !matches!(travel, Direction::Down | Direction::Up) {
            return None;
        }
        let cell = self.pending.entry(at).or_insert_with(|| PendingCell {
            attempts: 0,
            scratch: Scratch::Gate {
                op,
                top: None,
                bottom: None,
            },
        });
        let Scratch::Gate { top, bottom, .. } = &mut cell.scratch else {
            return None;
        };
        if travel == Direction::Down {
            *top = Some(value);
        } else {
            *bottom = Some(value);
        }
        if top.is_some() && bottom.is_some() {
            return self.fire(at);
        }
        cell.attempts += 1;
        if cell.attempts >= self.max_attempts {
            return self.fire(at);
        }
        None
    }

    /// Record a signal arriving at a relay.
    ///
    /// Control arrivals (from above for normally-open, below for
    /// normally-closed) cache the derived switch state; side arrivals
    /// land in the left/right registers. Returns the routed output when
    /// this arrival completes the relay.
    pub fn relay_arrival(
        &mut self,
        at: Coord,
        kind: RelayKind,
        travel: Direction,
        value: Signal,
    ) -> Option<Emission> {
        if self.fired.contains(&at) {
            return None;
        }
        let control_travel = kind.control_travel();
        let accepted =
            travel == control_travel || travel == Direction::Right || travel == Direction::Left;
        if !accepted {
            return None;
        }
        let cell = self.pending.entry(at).or_insert_with(|| PendingCell {
            attempts: 0,
            scratch: Scratch::Relay {
                kind,
                engaged: None,
                left: None,
                right: None,
            },
        });
        let Scratch::Relay {
            engaged,
            left,
            right,
            ..
        } = &mut cell.scratch
        else {
            return None;
        };
        if travel == control_travel {
            *engaged = Some(kind.engaged(value));
        } else if travel == Direction::Right {
            *left = Some(value);
        } else {
            *right = Some(value);
        }
        if engaged.is_some() && (left.is_some() || right.is_some()) {
            return self.fire(at);
        }
        cell.attempts += 1;
        if cell.attempts >= self.max_attempts {
            return self.fire(at);
        }
        None
    }

    /// Fire the element at `at` with whatever inputs it has, removing
    /// it from the pending set for the rest of the tick.
    fn fire(&mut self, at: Coord) -> Option<Emission> {
        let cell = self.pending.swap_remove(&at)?;
        self.fired.insert(at);
        match cell.scratch {
            Scratch::Gate { op, top, bottom } => {
                let top = top.unwrap_or(Signal::BLANK);
                let bottom = bottom.unwrap_or(Signal::BLANK);
                let value = if op.apply(top, bottom) {
                    Signal::ONE
                } else {
                    Signal::ZERO
                };
                Some(Emission {
                    travel: Direction::Right,
                    value,
                })
            }
            Scratch::Relay {
                kind,
                engaged,
                left,
                right,
            } => {
                // A relay that never saw its control relaxes to the
                // switch state a blank control would give it.
                let engaged = engaged.unwrap_or_else(|| kind.engaged(Signal::BLANK));
                if !engaged {
                    return None;
                }
                if let Some(value) = left {
                    Some(Emission {
                        travel: Direction::Right,
                        value,
                    })
                } else {
                    right.map(|value| Emission {
                        travel: Direction::Left,
                        value,
                    })
                }
            }
        }
    }

    /// Fire every still-waiting element with its defaults.
    ///
    /// The orchestrator calls this once after the pass budget is spent
    /// so that elements whose missing inputs will never arrive (for
    /// example, fed by a gate that already fired in an earlier pass)
    /// still settle to a defined state this tick.
    pub fn drain_unresolved(&mut self) -> Vec<(Coord, Emission)> {
        let waiting: Vec<Coord> = self.pending.keys().copied().collect();
        let mut emissions = Vec::new();
        for at in waiting {
            if let Some(emission) = self.fire(at) {
                emissions.push((at, emission));
            }
        }
        emissions
    }
}
