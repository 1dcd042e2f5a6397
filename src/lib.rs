//! This crate provides the core logic for a single-tape Turing machine that runs programs
//! written in a run-length bytecode, together with a built-in unary multiplication program.
//! It includes modules for decoding and encoding bytecode, loading and analyzing programs,
//! simulating their execution, and reading the result off the final tape.

pub mod analyzer;
pub mod encoder;
pub mod loader;
pub mod machine;
pub mod output;
pub mod programs;
pub mod types;

/// Re-exports the `analyze` function and `Finding` enum from the analyzer module.
pub use analyzer::{analyze, Finding};
/// Re-exports the bytecode functions from the encoder module.
pub use encoder::{decode, encode};
/// Re-exports the `ProgramLoader` struct from the loader module.
pub use loader::ProgramLoader;
/// Re-exports the machine and its tracing hooks from the machine module.
pub use machine::{StepEvent, TraceSink, TuringMachine};
/// Re-exports the result extractor from the output module.
pub use output::extract_result;
/// Re-exports the core types from the types module.
pub use types::{
    Configuration, DecodeError, Direction, Halt, Program, State, Step, TapeSymbol, Transition,
    TuringMachineError, MAX_PROGRAM_SIZE,
};
