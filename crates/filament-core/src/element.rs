//! Classification of grid characters into circuit elements.
//!
//! The evaluation engine never branches on raw characters; every cell is
//! decoded into an [`ElementKind`] exactly once per visit and dispatched
//! exhaustively. Characters with no circuit meaning classify as
//! [`ElementKind::Inert`] so there is no silently-reachable default case.

use crate::signal::Signal;
use crate::Direction;

/// The boolean function of a two-input logic gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GateOp {
    /// `=` — true when both inputs carry the same signal.
    Equal,
    /// `.` — true when both inputs are non-zero.
    And,
    /// `+` — true when either input is non-zero.
    Or,
    /// `#` — true when exactly one input is non-zero.
    Xor,
    /// `^` — false only when both inputs are non-zero.
    Nand,
}

impl GateOp {
    /// Apply the gate function to its two inputs.
    ///
    /// `Equal` compares the signals as written (two blanks compare
    /// equal); the truth-valued gates read each input through
    /// [`Signal::is_zero`].
    pub fn apply(self, top: Signal, bottom: Signal) -> bool {
        match self {
            GateOp::Equal => top == bottom || (top.is_blank() && bottom.is_blank()),
            GateOp::And => !top.is_zero() && !bottom.is_zero(),
            GateOp::Or => !top.is_zero() || !bottom.is_zero(),
            GateOp::Xor => top.is_zero() != bottom.is_zero(),
            GateOp::Nand => !(!top.is_zero() && !bottom.is_zero()),
        }
    }
}

/// Relay switching behavior.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RelayKind {
    /// `S` — conducts while the control signal is non-zero.
    /// Control arrives from the cell above.
    NormallyOpen,
    /// `Z` — conducts while the control signal is zero.
    /// Control arrives from the cell below.
    NormallyClosed,
}

impl RelayKind {
    /// Whether the switch is closed for the given control signal.
    pub fn engaged(self, control: Signal) -> bool {
        match self {
            RelayKind::NormallyOpen => !control.is_zero(),
            RelayKind::NormallyClosed => control.is_zero(),
        }
    }

    /// The direction a control signal travels when it enters the relay:
    /// `Down` for a normally-open relay (control wired above), `Up` for
    /// a normally-closed one (control wired below).
    pub const fn control_travel(self) -> Direction {
        match self {
            RelayKind::NormallyOpen => Direction::Down,
            RelayKind::NormallyClosed => Direction::Up,
        }
    }
}

/// The circuit role a single grid character plays.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementKind {
    /// `*` — constant source; reads its literal from the cell to its left.
    ConstantSource,
    /// `R` — random source; optional maximum in the cell to its left.
    RandomSource,
    /// `C` — clock source; optional modulus and divisor exponent to its left.
    ClockSource,
    /// `-` — horizontal wire.
    WireHorizontal,
    /// `|` — vertical wire.
    WireVertical,
    /// `/` — left end of a crossing bridge; pairs with `\` to its right.
    BridgeStart,
    /// `\` — right end of a crossing bridge; pairs with `/` to its left.
    BridgeEnd,
    /// `@` — junction; connects all four neighbours.
    Junction,
    /// `~` — binary buffer; left input, normalized right output.
    Buffer,
    /// `>` — rightward diode.
    DiodeRight,
    /// `<` — leftward diode.
    DiodeLeft,
    /// `N` — inverter.
    Inverter,
    /// `L` — latch displaying its value in the cell above.
    LatchUp,
    /// `J` — latch displaying its value in the cell below.
    LatchDown,
    /// `E` — halts the process with the signal value as exit status.
    Exit,
    /// `?` — raises an alert on any non-zero signal.
    Alert,
    /// Two-input logic gate.
    Gate(GateOp),
    /// Relay switch.
    Relay(RelayKind),
    /// `M` — macro invocation marker.
    MacroMark,
    /// `_` — comment span delimiter.
    CommentMark,
    /// A base-36 digit with the given magnitude; inert as a propagation
    /// target, read as a literal or parameter by adjacent elements.
    Data(u32),
    /// Anything else, including blank; signals stop here.
    Inert,
}

impl ElementKind {
    /// Decode the circuit role of a grid character.
    pub fn classify(c: char) -> ElementKind {
        match c {
            '*' => ElementKind::ConstantSource,
            'R' => ElementKind::RandomSource,
            'C' => ElementKind::ClockSource,
            '-' => ElementKind::WireHorizontal,
            '|' => ElementKind::WireVertical,
            '/' => ElementKind::BridgeStart,
            '\\' => ElementKind::BridgeEnd,
            '@' => ElementKind::Junction,
            '~' => ElementKind::Buffer,
            '>' => ElementKind::DiodeRight,
            '<' => ElementKind::DiodeLeft,
            'N' => ElementKind::Inverter,
            'L' => ElementKind::LatchUp,
            'J' => ElementKind::LatchDown,
            'E' => ElementKind::Exit,
            '?' => ElementKind::Alert,
            '=' => ElementKind::Gate(GateOp::Equal),
            '.' => ElementKind::Gate(GateOp::And),
            '+' => ElementKind::Gate(GateOp::Or),
            '#' => ElementKind::Gate(GateOp::Xor),
            '^' => ElementKind::Gate(GateOp::Nand),
            'S' => ElementKind::Relay(RelayKind::NormallyOpen),
            'Z' => ElementKind::Relay(RelayKind::NormallyClosed),
            'M' => ElementKind::MacroMark,
            '_' => ElementKind::CommentMark,
            _ => match Signal::from_char(c).value() {
                Some(v) => ElementKind::Data(v),
                None => ElementKind::Inert,
            },
        }
    }

    /// Whether this element originates signals (scanned into the root
    /// set each tick).
    pub fn is_root(self) -> bool {
        matches!(
            self,
            ElementKind::ConstantSource | ElementKind::RandomSource | ElementKind::ClockSource
        )
    }
}

/// Display style bucket for a grid character.
///
/// The engine does not render anything; this classification exists so an
/// external renderer can color cells without re-deriving element
/// identities.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StyleClass {
    /// Signal origins: `*`, `R`, `C`.
    Source,
    /// Plain wiring: `-`, `|`, `/`, `\`, `@`.
    Wiring,
    /// Logic gates: `=`, `.`, `+`, `#`, `^`.
    Logic,
    /// Inverters and relays: `N`, `S`, `Z`.
    Switching,
    /// Latches: `L`, `J`.
    Latch,
    /// Macro markers: `M`.
    Macro,
    /// Comment delimiters: `_`.
    Comment,
    /// Alert cells: `?`.
    Alert,
    /// Exit cells: `E`.
    Exit,
    /// The `'0'` digit.
    DigitZero,
    /// Non-zero decimal digits.
    Digit,
    /// Base-36 letter digits.
    Letter,
    /// Everything else.
    Plain,
}

impl StyleClass {
    /// The style bucket for a grid character.
    pub fn of(c: char) -> StyleClass {
        match ElementKind::classify(c) {
            ElementKind::ConstantSource | ElementKind::RandomSource | ElementKind::ClockSource => {
                StyleClass::Source
            }
            ElementKind::WireHorizontal
            | ElementKind::WireVertical
            | ElementKind::BridgeStart
            | ElementKind::BridgeEnd
            | ElementKind::Junction => StyleClass::Wiring,
            ElementKind::Gate(_) => StyleClass::Logic,
            ElementKind::Inverter | ElementKind::Relay(_) => StyleClass::Switching,
            ElementKind::LatchUp | ElementKind::LatchDown => StyleClass::Latch,
            ElementKind::MacroMark => StyleClass::Macro,
            ElementKind::CommentMark => StyleClass::Comment,
            ElementKind::Alert => StyleClass::Alert,
            ElementKind::Exit => StyleClass::Exit,
            ElementKind::Data(0) => StyleClass::DigitZero,
            ElementKind::Data(v) if v < 10 => StyleClass::Digit,
            ElementKind::Data(_) => StyleClass::Letter,
            ElementKind::Buffer | ElementKind::DiodeRight | ElementKind::DiodeLeft => {
                StyleClass::Plain
            }
            ElementKind::Inert => StyleClass::Plain,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_element_symbol_classifies() {
        let cases = [
            ('*', ElementKind::ConstantSource),
            ('R', ElementKind::RandomSource),
            ('C', ElementKind::ClockSource),
            ('-', ElementKind::WireHorizontal),
            ('|', ElementKind::WireVertical),
            ('/', ElementKind::BridgeStart),
            ('\\', ElementKind::BridgeEnd),
            ('@', ElementKind::Junction),
            ('~', ElementKind::Buffer),
            ('>', ElementKind::DiodeRight),
            ('<', ElementKind::DiodeLeft),
            ('N', ElementKind::Inverter),
            ('L', ElementKind::LatchUp),
            ('J', ElementKind::LatchDown),
            ('E', ElementKind::Exit),
            ('?', ElementKind::Alert),
            ('=', ElementKind::Gate(GateOp::Equal)),
            ('.', ElementKind::Gate(GateOp::And)),
            ('+', ElementKind::Gate(GateOp::Or)),
            ('#', ElementKind::Gate(GateOp::Xor)),
            ('^', ElementKind::Gate(GateOp::Nand)),
            ('S', ElementKind::Relay(RelayKind::NormallyOpen)),
            ('Z', ElementKind::Relay(RelayKind::NormallyClosed)),
            ('M', ElementKind::MacroMark),
            ('_', ElementKind::CommentMark),
        ];
        for (c, kind) in cases {
            assert_eq!(ElementKind::classify(c), kind, "char {c:?}");
        }
    }

    #[test]
    fn digits_classify_as_data() {
        assert_eq!(ElementKind::classify('0'), ElementKind::Data(0));
        assert_eq!(ElementKind::classify('7'), ElementKind::Data(7));
        assert_eq!(ElementKind::classify('z'), ElementKind::Data(35));
    }

    #[test]
    fn unknown_characters_are_inert() {
        for c in [' ', '\0', 'A', 'Q', '%', '"'] {
            assert_eq!(ElementKind::classify(c), ElementKind::Inert, "char {c:?}");
        }
    }

    #[test]
    fn roots_are_exactly_the_sources() {
        for c in ['*', 'R', 'C'] {
            assert!(ElementKind::classify(c).is_root());
        }
        for c in ['-', 'E', 'S', '=', '5'] {
            assert!(!ElementKind::classify(c).is_root());
        }
    }

    #[test]
    fn gate_truth_tables() {
        let one = Signal::ONE;
        let zero = Signal::ZERO;
        assert!(GateOp::And.apply(one, one));
        assert!(!GateOp::And.apply(one, zero));
        assert!(GateOp::Or.apply(one, zero));
        assert!(!GateOp::Or.apply(zero, zero));
        assert!(GateOp::Xor.apply(one, zero));
        assert!(!GateOp::Xor.apply(one, one));
        assert!(GateOp::Nand.apply(one, zero));
        assert!(!GateOp::Nand.apply(one, one));
    }

    #[test]
    fn equal_gate_compares_written_signals() {
        let five = Signal::from_char('5');
        assert!(GateOp::Equal.apply(five, Signal::from_char('5')));
        assert!(!GateOp::Equal.apply(five, Signal::from_char('6')));
        // Blank storage may be a space or NUL; both read as the same blank.
        assert!(GateOp::Equal.apply(Signal::BLANK, Signal::from_char('\0')));
    }

    #[test]
    fn relay_engagement() {
        assert!(RelayKind::NormallyOpen.engaged(Signal::ONE));
        assert!(!RelayKind::NormallyOpen.engaged(Signal::ZERO));
        assert!(!RelayKind::NormallyOpen.engaged(Signal::BLANK));
        assert!(RelayKind::NormallyClosed.engaged(Signal::ZERO));
        assert!(RelayKind::NormallyClosed.engaged(Signal::BLANK));
        assert!(!RelayKind::NormallyClosed.engaged(Signal::from_char('3')));
    }

    #[test]
    fn style_buckets_cover_the_symbol_set() {
        assert_eq!(StyleClass::of('*'), StyleClass::Source);
        assert_eq!(StyleClass::of('|'), StyleClass::Wiring);
        assert_eq!(StyleClass::of('#'), StyleClass::Logic);
        assert_eq!(StyleClass::of('S'), StyleClass::Switching);
        assert_eq!(StyleClass::of('L'), StyleClass::Latch);
        assert_eq!(StyleClass::of('_'), StyleClass::Comment);
        assert_eq!(StyleClass::of('0'), StyleClass::DigitZero);
        assert_eq!(StyleClass::of('4'), StyleClass::Digit);
        assert_eq!(StyleClass::of('k'), StyleClass::Letter);
        assert_eq!(StyleClass::of(' '), StyleClass::Plain);
    }
}
