//! Built-in programs and the tapes they expect.

use crate::loader::ProgramLoader;
use crate::types::{Program, TapeSymbol, TuringMachineError};

/// Bytecode of the unary multiplication machine.
///
/// For every digit of the first operand it marks the digit with `X`, then copies the second
/// operand one digit at a time (marking with `Y`) onto the growing block right of it, and
/// finally restores the `Y`s. It halts in `q0` on the `C` once the first operand is used up.
pub const MULTIPLICATION: &str = include_str!("../programs/multiplication.tm");

/// Decodes the built-in multiplication program.
pub fn multiplication() -> Result<Program, TuringMachineError> {
    ProgramLoader::load_program_from_string(MULTIPLICATION)
}

/// Builds the initial tape for `a x b`: a blank, `a` zeros, `C`, `b` zeros and a blank.
pub fn multiplication_tape(a: usize, b: usize) -> String {
    let zero = TapeSymbol::Number.glyph();
    let blank = TapeSymbol::Blank.glyph();

    let mut tape = String::with_capacity(a + b + 3);
    tape.push(blank);
    tape.extend(std::iter::repeat(zero).take(a));
    tape.push(TapeSymbol::Calculation.glyph());
    tape.extend(std::iter::repeat(zero).take(b));
    tape.push(blank);
    tape
}
