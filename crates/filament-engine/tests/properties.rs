//! Property coverage: arbitrary boards terminate, wire-only boards
//! settle in one pass with no cell visited twice.

use filament_engine::{TickEngine, WorldConfig};
use filament_grid::text;
use proptest::prelude::*;

/// Rows drawn from the full element alphabet except exits (which would
/// end the run) and macro markers (which would hit the filesystem).
fn arbitrary_rows() -> impl Strategy<Value = Vec<String>> {
    let row = proptest::collection::vec(
        proptest::char::ranges(vec!['-'..='-', '|'..='|', '@'..='@', '*'..='*', '/'..='/',
            '\\'..='\\', '<'..='<', '>'..='>', '~'..='~', 'N'..='N', 'L'..='L', 'J'..='J',
            'S'..='S', 'Z'..='Z', '.'..='.', '+'..='+', '#'..='#', '^'..='^', '='..='=',
            'C'..='C', 'R'..='R', '?'..='?', '_'..='_', ' '..=' ', '0'..='9', 'a'..='f'].into()),
        0..24,
    )
    .prop_map(|chars| chars.into_iter().collect::<String>());
    proptest::collection::vec(row, 0..12)
}

/// Rows of nothing but passive wiring and sources: no multi-input
/// elements, so everything must settle in a single pass.
fn wiring_rows() -> impl Strategy<Value = Vec<String>> {
    let row = proptest::collection::vec(
        proptest::char::ranges(vec!['-'..='-', '|'..='|', '@'..='@', '*'..='*', ' '..=' ',
            '0'..='9'].into()),
        0..24,
    )
    .prop_map(|chars| chars.into_iter().collect::<String>());
    proptest::collection::vec(row, 0..12)
}

proptest! {
    #[test]
    fn any_board_evaluates_within_the_pass_budget(rows in arbitrary_rows()) {
        let mut grid = text::parse(&rows.join("\n"));
        let mut engine = TickEngine::new(WorldConfig::default()).unwrap();
        let outcome = engine.execute_tick(&mut grid);
        prop_assert!(outcome.metrics.passes <= WorldConfig::default().max_passes);
        // A second tick over the (possibly latch-mutated) board is
        // just as safe.
        engine.execute_tick(&mut grid);
    }

    #[test]
    fn wiring_boards_settle_in_one_pass(rows in wiring_rows()) {
        let mut grid = text::parse(&rows.join("\n"));
        let cells = (grid.width() as u64) * (grid.height() as u64);
        let mut engine = TickEngine::new(WorldConfig::default()).unwrap();
        let outcome = engine.execute_tick(&mut grid);
        prop_assert_eq!(outcome.metrics.passes, 1);
        // Mark-before-recurse: no cell is processed twice in the pass.
        prop_assert!(outcome.metrics.cells_visited <= cells);
    }

}
