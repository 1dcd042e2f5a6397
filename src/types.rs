//! This module defines the core data structures and types used throughout the simulator,
//! including the tape alphabet, head directions, states, transitions, programs, execution
//! outcomes, and error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// The blank symbol written on the tape, both in input tapes and when the tape grows.
pub const BLANK: char = '_';
/// The head position every machine starts at.
pub const INITIAL_HEAD: usize = 1;
/// The state every machine starts in.
pub const INITIAL_STATE: State = State(0);
/// The maximum allowed size for a bytecode program in bytes.
pub const MAX_PROGRAM_SIZE: usize = 65536; // 64KB

/// The closed set of symbols a transition can read or write.
///
/// Every symbol has a display glyph (the character stored on the tape) and a run length,
/// the number of `0` characters that encode it in a bytecode field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TapeSymbol {
    /// A unary digit, `0`.
    Number,
    /// The bytecode field separator, `1`.
    Split,
    /// A digit of the first operand that has been consumed, `X`.
    ReplaceZero,
    /// A digit of the second operand that has been consumed, `Y`.
    ReplaceOne,
    /// An empty cell, `_`.
    Blank,
    /// The operator between both operands, `C`.
    Calculation,
}

impl TapeSymbol {
    /// All symbols, ordered by run length.
    pub const ALL: [TapeSymbol; 6] = [
        TapeSymbol::Number,
        TapeSymbol::Split,
        TapeSymbol::Blank,
        TapeSymbol::Calculation,
        TapeSymbol::ReplaceOne,
        TapeSymbol::ReplaceZero,
    ];

    /// Returns the character this symbol is stored as on the tape.
    pub fn glyph(self) -> char {
        match self {
            TapeSymbol::Number => '0',
            TapeSymbol::Split => '1',
            TapeSymbol::ReplaceZero => 'X',
            TapeSymbol::ReplaceOne => 'Y',
            TapeSymbol::Blank => BLANK,
            TapeSymbol::Calculation => 'C',
        }
    }

    /// Returns the symbol stored as `glyph`, if any.
    pub fn from_glyph(glyph: char) -> Option<Self> {
        Self::ALL.into_iter().find(|symbol| symbol.glyph() == glyph)
    }

    /// Returns the number of `0`s that encode this symbol in a bytecode field.
    pub fn run_length(self) -> usize {
        match self {
            TapeSymbol::Number => 1,
            TapeSymbol::Split => 2,
            TapeSymbol::Blank => 3,
            TapeSymbol::Calculation => 4,
            TapeSymbol::ReplaceOne => 5,
            TapeSymbol::ReplaceZero => 6,
        }
    }

    /// Returns the symbol encoded by a field of `length` characters.
    pub fn from_run_length(length: usize) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|symbol| symbol.run_length() == length)
    }
}

impl fmt::Display for TapeSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

/// Represents the possible directions the head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Move the head one position to the right.
    Right,
}

impl Direction {
    pub fn glyph(self) -> char {
        match self {
            Direction::Left => 'L',
            Direction::Right => 'R',
        }
    }

    /// Returns the number of `0`s the encoder writes for this direction.
    pub fn run_length(self) -> usize {
        match self {
            Direction::Left => 1,
            Direction::Right => 2,
        }
    }

    /// A field of exactly one character is `Left`; every other length is `Right`.
    pub fn from_run_length(length: usize) -> Self {
        if length == 1 {
            Direction::Left
        } else {
            Direction::Right
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

/// A machine state, written `q0`, `q1`, ...
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct State(pub u32);

impl State {
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl FromStr for State {
    type Err = TuringMachineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix('q')
            .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|digits| digits.parse().ok())
            .map(State)
            .ok_or_else(|| TuringMachineError::InvalidState(s.to_string()))
    }
}

impl From<State> for String {
    fn from(state: State) -> Self {
        state.to_string()
    }
}

impl TryFrom<String> for State {
    type Error = TuringMachineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Represents a single transition rule.
///
/// When the machine is in state `from` and reads `read`, it writes `write`, moves the head
/// in `direction` and continues in state `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub from: State,
    pub read: TapeSymbol,
    pub to: State,
    pub write: TapeSymbol,
    pub direction: Direction,
}

impl Transition {
    pub fn new(
        from: State,
        read: TapeSymbol,
        to: State,
        write: TapeSymbol,
        direction: Direction,
    ) -> Self {
        Self {
            from,
            read,
            to,
            write,
            direction,
        }
    }

    /// Checks whether this transition applies in `state` when the head reads `symbol`.
    pub fn matches(&self, state: State, symbol: char) -> bool {
        self.from == state && self.read.glyph() == symbol
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({} ; {}) = ({} ; {} ; {})",
            self.from, self.read, self.to, self.write, self.direction
        )
    }
}

/// A decoded program: the ordered transition table of a machine.
///
/// Several transitions may share the same `(from, read)` key. Lookup always returns the
/// first one in program order, so the later ones can never fire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub transitions: Vec<Transition>,
}

impl Program {
    pub fn new(transitions: Vec<Transition>) -> Self {
        Self { transitions }
    }

    /// Returns the first transition that applies in `state` when the head reads `symbol`.
    pub fn lookup(&self, state: State, symbol: char) -> Option<&Transition> {
        self.transitions.iter().find(|t| t.matches(state, symbol))
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}

/// Represents the outcome of a single step or a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The machine applied a transition and may continue.
    Continue,
    /// The machine stopped.
    Halt(Halt),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Halt {
    /// No transition matches the current state and symbol.
    Ok,
    /// The caller's step budget ran out before the machine halted.
    StepLimit(usize),
}

/// A snapshot of a machine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    pub state: State,
    pub head: usize,
    pub tape: String,
    pub step_count: usize,
}

/// Errors raised while decoding bytecode. Decoding stops at the first one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("Program text is empty")]
    Empty,
    #[error("Transition {index} has {found} fields, expected 5")]
    FieldCount { index: usize, found: usize },
    #[error("Transition {index} has an empty state field")]
    EmptyState { index: usize },
    #[error("Transition {index}: run length {length} does not encode a tape symbol")]
    UnknownSymbol { index: usize, length: usize },
}

/// Represents various errors that can occur while loading or running a program.
#[derive(Debug, Error)]
pub enum TuringMachineError {
    /// A state name that is not of the form `qN`.
    #[error("Invalid state: {0}")]
    InvalidState(String),
    /// The bytecode could not be decoded.
    #[error("Program decoding error: {0}")]
    DecodeError(#[from] DecodeError),
    /// The program or its input violates a loading constraint.
    #[error("Program validation error: {0}")]
    ValidationError(String),
    /// The program file could not be read.
    #[error("File error: {}: {source}", path.display())]
    FileError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
