//! This module defines the `TuringMachine` struct, which simulates a single-tape, single-head
//! deterministic Turing machine. It owns the tape, the head position, the current state and the
//! step counter, and applies the transitions of a decoded `Program` until none matches.

use crate::output::extract_result;
use crate::types::{
    Configuration, Direction, Halt, Program, State, Step, Transition, BLANK, INITIAL_HEAD,
    INITIAL_STATE,
};
use tracing::{debug, trace};

/// What a trace sink sees after every applied transition.
#[derive(Debug, Clone, Copy)]
pub struct StepEvent<'a> {
    /// Number of transitions applied so far, including this one.
    pub step: usize,
    pub transition: &'a Transition,
    pub tape: &'a [char],
    pub head: usize,
    /// The state the machine moved into.
    pub state: State,
}

/// Receives a `StepEvent` after every applied transition.
///
/// Sinks are called in-line and cannot influence execution.
pub trait TraceSink {
    fn on_step(&mut self, event: &StepEvent<'_>);
}

impl<F> TraceSink for F
where
    F: FnMut(&StepEvent<'_>),
{
    fn on_step(&mut self, event: &StepEvent<'_>) {
        self(event)
    }
}

/// A sink that ignores every event.
struct Silent;

impl TraceSink for Silent {
    fn on_step(&mut self, _event: &StepEvent<'_>) {}
}

/// Represents a single-tape Turing machine.
///
/// The machine starts in `q0` with the head at index 1. It halts as soon as no transition
/// matches the current state and the symbol under the head; there is no accepting state.
#[derive(Debug, Clone)]
pub struct TuringMachine {
    state: State,
    tape: Vec<char>,
    head: usize,
    program: Program,
    initial_tape: Vec<char>,
    step_count: usize,
}

impl TuringMachine {
    /// Creates a new `TuringMachine` that will run `program` on `tape`.
    ///
    /// A tape too short to hold the initial head position is padded with blanks.
    ///
    /// # Arguments
    ///
    /// * `program` - The decoded transition table.
    /// * `tape` - The initial tape content.
    pub fn new(program: Program, tape: &str) -> Self {
        let mut initial_tape: Vec<char> = tape.chars().collect();
        if initial_tape.len() <= INITIAL_HEAD {
            initial_tape.resize(INITIAL_HEAD + 1, BLANK);
        }

        Self {
            state: INITIAL_STATE,
            tape: initial_tape.clone(),
            head: INITIAL_HEAD,
            program,
            initial_tape,
            step_count: 0,
        }
    }

    /// Executes a single step.
    ///
    /// # Returns
    ///
    /// * `Step::Continue` if a transition was applied.
    /// * `Step::Halt(Halt::Ok)` if no transition matches; the configuration is left untouched.
    pub fn step(&mut self) -> Step {
        self.step_with(&mut Silent)
    }

    /// Executes a single step and reports it to `sink` if a transition was applied.
    pub fn step_with<S>(&mut self, sink: &mut S) -> Step
    where
        S: TraceSink + ?Sized,
    {
        let Some(&transition) = self.program.lookup(self.state, self.tape[self.head]) else {
            return Step::Halt(Halt::Ok);
        };

        self.step_count += 1;
        self.tape[self.head] = transition.write.glyph();
        self.move_head(transition.direction);
        self.state = transition.to;

        trace!(
            step = self.step_count,
            transition = %transition,
            head = self.head,
            "applied transition"
        );

        sink.on_step(&StepEvent {
            step: self.step_count,
            transition: &transition,
            tape: &self.tape,
            head: self.head,
            state: self.state,
        });

        Step::Continue
    }

    /// Moves the head one cell and grows the tape so the head stays on it.
    ///
    /// Moving left from cell 0 prepends a blank; the head then points at that blank, which is
    /// the cell it logically moved to.
    fn move_head(&mut self, direction: Direction) {
        match direction {
            Direction::Left => {
                if self.head == 0 {
                    self.tape.insert(0, BLANK);
                } else {
                    self.head -= 1;
                }
            }
            Direction::Right => {
                self.head += 1;
                if self.head >= self.tape.len() {
                    self.tape.push(BLANK);
                }
            }
        }
    }

    /// Runs the machine until no transition matches.
    ///
    /// There is no step limit: a program that never halts keeps this call running forever.
    /// Use `run_for` or `run_with` with a limit when the program is not trusted.
    pub fn run(&mut self) -> Step {
        loop {
            if let halt @ Step::Halt(_) = self.step() {
                debug!(steps = self.step_count, state = %self.state, "machine halted");
                return halt;
            }
        }
    }

    /// Runs the machine for at most `limit` transitions.
    pub fn run_for(&mut self, limit: usize) -> Step {
        self.run_with(&mut Silent, Some(limit))
    }

    /// Runs the machine, reporting every applied transition to `sink`.
    ///
    /// With `limit` set, at most that many transitions are applied by this call. If the
    /// machine could still continue afterwards the result is `Halt::StepLimit`.
    pub fn run_with<S>(&mut self, sink: &mut S, limit: Option<usize>) -> Step
    where
        S: TraceSink + ?Sized,
    {
        let mut applied = 0;
        loop {
            if let Some(limit) = limit.filter(|&limit| applied >= limit) {
                if self.is_halted() {
                    break;
                }
                debug!(limit, steps = self.step_count, "step limit reached");
                return Step::Halt(Halt::StepLimit(limit));
            }

            if let Step::Halt(_) = self.step_with(sink) {
                break;
            }
            applied += 1;
        }

        debug!(steps = self.step_count, state = %self.state, "machine halted");
        Step::Halt(Halt::Ok)
    }

    /// Returns the current state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Returns the current head position.
    pub fn head(&self) -> usize {
        self.head
    }

    /// Returns the tape.
    pub fn tape(&self) -> &[char] {
        &self.tape
    }

    pub fn tape_string(&self) -> String {
        self.tape.iter().collect()
    }

    /// Returns the symbol under the head.
    pub fn symbol(&self) -> char {
        self.tape[self.head]
    }

    /// Returns the transition the next step would apply, if any.
    pub fn transition(&self) -> Option<&Transition> {
        self.program.lookup(self.state, self.symbol())
    }

    /// Checks if the machine has halted, i.e. no transition matches.
    pub fn is_halted(&self) -> bool {
        self.transition().is_none()
    }

    /// Returns the total number of transitions applied.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Resets the machine to its initial configuration.
    pub fn reset(&mut self) {
        self.state = INITIAL_STATE;
        self.tape = self.initial_tape.clone();
        self.head = INITIAL_HEAD;
        self.step_count = 0;
    }

    /// Returns a snapshot of the current configuration.
    pub fn configuration(&self) -> Configuration {
        Configuration {
            state: self.state,
            head: self.head,
            tape: self.tape_string(),
            step_count: self.step_count,
        }
    }

    /// Returns the number encoded on the current tape.
    pub fn result(&self) -> usize {
        extract_result(&self.tape_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Direction::*, TapeSymbol, TapeSymbol::*};

    fn t(
        from: u32,
        read: TapeSymbol,
        to: u32,
        write: TapeSymbol,
        direction: Direction,
    ) -> Transition {
        Transition::new(State(from), read, State(to), write, direction)
    }

    /// Marks `0`s alternately with `X` and `Y` while moving right; stops on anything else.
    fn create_marking_program() -> Program {
        Program::new(vec![
            t(0, Number, 1, ReplaceZero, Right),
            t(1, Number, 0, ReplaceOne, Right),
        ])
    }

    #[test]
    fn test_machine_creation() {
        let machine = TuringMachine::new(create_marking_program(), "_00_00_");

        assert_eq!(machine.state(), State(0));
        assert_eq!(machine.head(), 1);
        assert_eq!(machine.tape_string(), "_00_00_");
        assert_eq!(machine.step_count(), 0);
        assert_eq!(machine.symbol(), '0');
    }

    #[test]
    fn test_single_step() {
        let mut machine = TuringMachine::new(create_marking_program(), "_00_00_");

        assert_eq!(machine.step(), Step::Continue);
        assert_eq!(machine.state(), State(1));
        assert_eq!(machine.tape_string(), "_X0_00_");
        assert_eq!(machine.head(), 2);
        assert_eq!(machine.step_count(), 1);
    }

    #[test]
    fn test_marking_fixture_halts_after_two_steps() {
        let mut machine = TuringMachine::new(create_marking_program(), "_00_00_");

        assert_eq!(machine.run(), Step::Halt(Halt::Ok));
        assert_eq!(machine.step_count(), 2);
        assert_eq!(machine.tape_string(), "_XY_00_");
        assert_eq!(machine.head(), 3);
        assert_eq!(machine.state(), State(0));
        assert_eq!(machine.result(), 2);
    }

    #[test]
    fn test_halt_leaves_configuration_untouched() {
        let mut machine = TuringMachine::new(create_marking_program(), "_C_");

        assert!(machine.is_halted());
        assert_eq!(machine.step(), Step::Halt(Halt::Ok));
        assert_eq!(machine.step_count(), 0);
        assert_eq!(machine.tape_string(), "_C_");
        assert_eq!(machine.head(), 1);
    }

    #[test]
    fn test_tape_grows_to_the_right() {
        let program = Program::new(vec![t(0, Number, 0, Number, Right)]);
        let mut machine = TuringMachine::new(program, "_00");

        machine.run();

        assert_eq!(machine.tape_string(), "_00_");
        assert_eq!(machine.head(), 3);
        assert_eq!(machine.step_count(), 2);
    }

    #[test]
    fn test_tape_grows_to_the_left() {
        let program = Program::new(vec![
            t(0, Number, 1, ReplaceOne, Left),
            t(1, Blank, 2, ReplaceZero, Left),
        ]);
        let mut machine = TuringMachine::new(program, "_0_");

        machine.run();

        assert_eq!(machine.tape_string(), "_XY_");
        assert_eq!(machine.head(), 0);
        assert_eq!(machine.state(), State(2));
        assert_eq!(machine.step_count(), 2);
    }

    #[test]
    fn test_short_tape_is_padded() {
        let machine = TuringMachine::new(create_marking_program(), "");
        assert_eq!(machine.tape_string(), "__");
        assert_eq!(machine.head(), 1);
    }

    #[test]
    fn test_first_transition_wins() {
        let program = Program::new(vec![
            t(0, Number, 1, ReplaceZero, Right),
            t(0, Number, 2, ReplaceOne, Left),
        ]);
        let mut machine = TuringMachine::new(program, "_0_");

        machine.run();

        assert_eq!(machine.tape_string(), "_X_");
        assert_eq!(machine.head(), 2);
        assert_eq!(machine.state(), State(1));
        assert_eq!(machine.step_count(), 1);
    }

    #[test]
    fn test_unknown_tape_character_halts() {
        let mut machine = TuringMachine::new(create_marking_program(), "_Z0_");
        assert_eq!(machine.run(), Step::Halt(Halt::Ok));
        assert_eq!(machine.step_count(), 0);
    }

    #[test]
    fn test_trace_sink_sees_every_step() {
        let mut machine = TuringMachine::new(create_marking_program(), "_00_00_");
        let mut events = Vec::new();

        let result = machine.run_with(
            &mut |event: &StepEvent<'_>| {
                events.push((
                    event.step,
                    *event.transition,
                    event.tape.iter().collect::<String>(),
                    event.head,
                    event.state,
                ));
            },
            None,
        );

        assert_eq!(result, Step::Halt(Halt::Ok));
        assert_eq!(
            events,
            vec![
                (
                    1,
                    t(0, Number, 1, ReplaceZero, Right),
                    "_X0_00_".to_string(),
                    2,
                    State(1)
                ),
                (
                    2,
                    t(1, Number, 0, ReplaceOne, Right),
                    "_XY_00_".to_string(),
                    3,
                    State(0)
                ),
            ]
        );
    }

    #[test]
    fn test_step_limit_stops_endless_program() {
        // Bounces between two cells forever.
        let program = Program::new(vec![
            t(0, Number, 1, Number, Right),
            t(1, Number, 0, Number, Left),
        ]);
        let mut machine = TuringMachine::new(program, "_00_");

        let result = machine.run_for(1000);

        assert_eq!(result, Step::Halt(Halt::StepLimit(1000)));
        assert_eq!(machine.step_count(), 1000);
        assert!(!machine.is_halted());
    }

    #[test]
    fn test_step_limit_not_reported_when_machine_halts() {
        let mut machine = TuringMachine::new(create_marking_program(), "_00_00_");

        let result = machine.run_with(&mut Silent, Some(2));

        assert_eq!(result, Step::Halt(Halt::Ok));
        assert_eq!(machine.step_count(), 2);
    }

    #[test]
    fn test_reset() {
        let mut machine = TuringMachine::new(create_marking_program(), "_00_00_");

        machine.run();
        machine.reset();

        assert_eq!(machine.state(), State(0));
        assert_eq!(machine.tape_string(), "_00_00_");
        assert_eq!(machine.head(), 1);
        assert_eq!(machine.step_count(), 0);
    }

    #[test]
    fn test_configuration_snapshot() {
        let mut machine = TuringMachine::new(create_marking_program(), "_00_00_");
        machine.run();

        let configuration = machine.configuration();
        assert_eq!(
            serde_json::to_value(&configuration).unwrap(),
            serde_json::json!({
                "state": "q0",
                "head": 3,
                "tape": "_XY_00_",
                "step_count": 2
            })
        );
    }
}
