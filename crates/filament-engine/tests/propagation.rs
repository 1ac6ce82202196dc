//! End-to-end propagation behavior over small circuits.
//!
//! Circuits are drawn as string literals; results are observed through
//! latch display cells, which the engine writes in place.

use filament_core::{Coord, Diagnostic};
use filament_engine::{TickEngine, TickOutcome, WorldConfig};
use filament_grid::{text, Grid};

fn engine() -> TickEngine {
    TickEngine::new(WorldConfig::default()).unwrap()
}

fn run_tick(circuit: &str) -> (Grid, TickOutcome) {
    let mut grid = text::parse(circuit);
    let outcome = engine().execute_tick(&mut grid);
    (grid, outcome)
}

#[test]
fn constant_source_drives_a_latch() {
    let (grid, outcome) = run_tick("\n5*-L-");
    assert_eq!(grid.get(Coord::new(3, 0)), '5');
    assert!(outcome.diagnostics.is_empty());
    assert_eq!(outcome.metrics.roots, 1);
}

#[test]
fn acyclic_circuit_resolves_in_one_pass() {
    let (_, outcome) = run_tick("\n5*->N-L");
    assert_eq!(outcome.metrics.passes, 1);
}

#[test]
fn wire_loop_terminates_in_one_traversal() {
    let circuit = "\
1*-@-@
   | |
   @-@
";
    let (_, outcome) = run_tick(circuit);
    assert_eq!(outcome.metrics.passes, 1);
    // Source, three wires, four junctions, two verticals: each cell
    // processed exactly once despite the closed loop.
    assert_eq!(outcome.metrics.cells_visited, 10);
}

#[test]
fn vertical_wire_carries_signals_both_ways() {
    // The junction fans the signal up and down into two latches.
    let circuit = "
  L
  |
5*@
  |
  J

";
    let (grid, _) = run_tick(circuit);
    assert_eq!(grid.get(Coord::new(2, 0)), '5', "upward branch");
    assert_eq!(grid.get(Coord::new(2, 6)), '5', "downward branch");
}

#[test]
fn latch_indicator_resets_when_the_source_goes_away() {
    let mut grid = text::parse("\n5*-L-");
    let mut engine = engine();
    engine.execute_tick(&mut grid);
    assert_eq!(grid.get(Coord::new(3, 0)), '5');

    // Erase the source; the stale display must not linger.
    grid.set(Coord::new(1, 1), ' ');
    engine.execute_tick(&mut grid);
    assert_eq!(grid.get(Coord::new(3, 0)), ' ');
}

#[test]
fn diode_forwards_live_signals_only() {
    let (grid, _) = run_tick("\n5*>L");
    assert_eq!(grid.get(Coord::new(3, 0)), '5');

    let (grid, _) = run_tick("\n0*>L");
    assert_eq!(grid.get(Coord::new(3, 0)), ' ', "zero is blocked");
}

#[test]
fn left_diode_forwards_leftward() {
    // The signal climbs out of the source, runs left along the top
    // row, and drops through the diode into the latch.
    let circuit = "
 L<--
   5*
";
    let (grid, _) = run_tick(circuit);
    assert_eq!(grid.get(Coord::new(1, 0)), '5');
}

#[test]
fn inverter_complements_the_signal() {
    let (grid, _) = run_tick("\n0*NL");
    assert_eq!(grid.get(Coord::new(3, 0)), '1');

    let (grid, _) = run_tick("\n7*NL");
    assert_eq!(grid.get(Coord::new(3, 0)), '0');
}

#[test]
fn buffer_normalizes_and_only_listens_left() {
    let (grid, _) = run_tick("\n5*~L");
    assert_eq!(grid.get(Coord::new(3, 0)), '1', "non-zero reads as 1");

    // Fed from above, the buffer stays silent.
    let circuit = "1*@
  ~L
";
    let (grid, _) = run_tick(circuit);
    assert_eq!(grid.get(Coord::new(3, 0)), ' ');
}

#[test]
fn bridge_crosses_without_connecting() {
    let circuit = "
  9*
1*/|\\-L
   J

";
    let (grid, _) = run_tick(circuit);
    // Horizontal signal hops the span into its latch.
    assert_eq!(grid.get(Coord::new(6, 1)), '1');
    // Vertical signal runs straight through the span into its own latch.
    assert_eq!(grid.get(Coord::new(3, 4)), '9');
}

#[test]
fn bridge_without_a_partner_is_inert() {
    let (grid, _) = run_tick("\n1*/-L");
    assert_eq!(grid.get(Coord::new(4, 0)), ' ');
}

#[test]
fn alert_fires_on_non_zero_signals() {
    let (_, outcome) = run_tick("5*-?");
    assert!(outcome
        .diagnostics
        .iter()
        .any(|d| matches!(d, Diagnostic::Alert { signal, .. } if signal.value() == Some(5))));

    let (_, outcome) = run_tick("0*-?");
    assert!(outcome.diagnostics.is_empty());
}

#[test]
fn conflicting_sources_raise_a_short_circuit() {
    let circuit = "\
7*-@
   |
5*-@
";
    let (_, outcome) = run_tick(circuit);
    assert!(
        outcome
            .diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::ShortCircuit { .. })),
        "got: {:?}",
        outcome.diagnostics
    );
}

#[test]
fn agreeing_sources_are_quiet() {
    let circuit = "\
5*-@
   |
5*-@
";
    let (_, outcome) = run_tick(circuit);
    assert!(
        !outcome
            .diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::ShortCircuit { .. })),
        "got: {:?}",
        outcome.diagnostics
    );
}

#[test]
fn exit_cell_halts_with_the_signal_status() {
    let (_, outcome) = run_tick("5*-E _all done_");
    let halt = outcome.halt.expect("exit must fire on 5");
    assert_eq!(halt.status(), 5);
    assert_eq!(halt.message, "all done");
}

#[test]
fn exit_cell_ignores_zero() {
    let (_, outcome) = run_tick("0*-E");
    assert!(outcome.halt.is_none());
}

#[test]
fn comment_text_is_not_circuitry() {
    // Sources written inside a comment span never run.
    let (grid, outcome) = run_tick("\n_5*-L_ 1*-L-");
    assert_eq!(outcome.metrics.roots, 1);
    assert_eq!(grid.get(Coord::new(10, 0)), '1');
}
