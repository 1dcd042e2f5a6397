//! This module converts programs to and from the run-length bytecode format.
//!
//! The bytecode is built from two characters only. A field is a run of `0`s whose length is
//! its value, fields are separated by a single `1` and transitions by `11`:
//!
//! ```text
//! 1                       header, ignored
//! 0 1 0 1 00 1 000000 1 00 11
//! ^   ^   ^    ^        ^
//! |   |   |    |        direction: 1 = L, otherwise R
//! |   |   |    write symbol (run length)
//! |   |   next state: qN is N + 1 zeros
//! |   read symbol (run length)
//! current state
//! ```
//!
//! Line breaks may appear anywhere inside a transition and are ignored.

use crate::types::{DecodeError, Direction, Program, State, TapeSymbol, Transition};
use tracing::warn;

const MARK: char = '0';
const FIELD_SEPARATOR: char = '1';
const TRANSITION_SEPARATOR: &str = "11";
const HEADER: char = '1';

/// Encodes a program into bytecode.
///
/// The header sits on its own line, followed by one transition per line.
///
/// # Arguments
///
/// * `program` - The Program to encode.
///
/// # Returns
///
/// * `String` - The bytecode text. Decoding it yields `program` again.
pub fn encode(program: &Program) -> String {
    let mut out = String::new();
    out.push(HEADER);
    out.push('\n');

    for transition in &program.transitions {
        out.push_str(&encode_transition(transition));
        out.push_str(TRANSITION_SEPARATOR);
        out.push('\n');
    }

    out
}

fn encode_transition(transition: &Transition) -> String {
    [
        state_run_length(transition.from),
        transition.read.run_length(),
        state_run_length(transition.to),
        transition.write.run_length(),
        transition.direction.run_length(),
    ]
    .iter()
    .map(|&length| MARK.to_string().repeat(length))
    .collect::<Vec<_>>()
    .join(&FIELD_SEPARATOR.to_string())
}

fn state_run_length(state: State) -> usize {
    state.index() as usize + 1
}

/// Decodes bytecode into a program.
///
/// The first character is a header and is skipped. The remainder is split on `11`; the
/// chunk after the last separator is not a transition and is dropped. Every other chunk
/// must hold exactly five fields.
///
/// # Arguments
///
/// * `bytecode` - The raw program text.
///
/// # Returns
///
/// * `Ok(Program)` with the transitions in source order.
/// * `Err(DecodeError)` for the first malformed transition; nothing is returned partially.
pub fn decode(bytecode: &str) -> Result<Program, DecodeError> {
    let mut chars = bytecode.chars();
    if chars.next().is_none() {
        return Err(DecodeError::Empty);
    }

    let mut chunks: Vec<&str> = chars.as_str().split(TRANSITION_SEPARATOR).collect();
    if let Some(rest) = chunks.pop() {
        if !strip_line_breaks(rest).is_empty() {
            warn!(rest = rest.trim(), "ignoring bytecode after the last transition");
        }
    }

    let transitions = chunks
        .into_iter()
        .enumerate()
        .map(|(index, chunk)| decode_transition(index, &strip_line_breaks(chunk)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Program::new(transitions))
}

fn strip_line_breaks(chunk: &str) -> String {
    chunk.chars().filter(|c| !matches!(c, '\n' | '\r')).collect()
}

fn decode_transition(index: usize, chunk: &str) -> Result<Transition, DecodeError> {
    let lengths: Vec<usize> = chunk
        .split(FIELD_SEPARATOR)
        .map(|field| field.chars().count())
        .collect();

    let [from, read, to, write, direction] = lengths[..] else {
        return Err(DecodeError::FieldCount {
            index,
            found: lengths.len(),
        });
    };

    Ok(Transition {
        from: decode_state(index, from)?,
        read: decode_symbol(index, read)?,
        to: decode_state(index, to)?,
        write: decode_symbol(index, write)?,
        direction: Direction::from_run_length(direction),
    })
}

fn decode_state(index: usize, length: usize) -> Result<State, DecodeError> {
    length
        .checked_sub(1)
        .and_then(|n| u32::try_from(n).ok())
        .map(State)
        .ok_or(DecodeError::EmptyState { index })
}

fn decode_symbol(index: usize, length: usize) -> Result<TapeSymbol, DecodeError> {
    TapeSymbol::from_run_length(length).ok_or(DecodeError::UnknownSymbol { index, length })
}
