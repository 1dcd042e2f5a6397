//! This module provides functions for inspecting decoded programs for transitions and states
//! that can never take part in a run. Findings are informational: every decoded program is
//! runnable, and the loader only logs what is found here.

use crate::types::{Program, State, INITIAL_STATE};
use std::collections::{BTreeSet, HashMap, VecDeque};
use std::fmt;

/// Represents an observation about a program that does not prevent it from running.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Finding {
    /// The transition at `index` has the same state and read symbol as the one at
    /// `shadowed_by`, which comes first and therefore always wins.
    ShadowedTransition { index: usize, shadowed_by: usize },
    /// No transition leaves the initial state, so the machine halts before its first step.
    MissingStartState,
    /// States with outgoing transitions that no run starting in the initial state can enter.
    UnreachableStates(Vec<State>),
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::ShadowedTransition { index, shadowed_by } => write!(
                f,
                "Transition {} is never applied, transition {} matches first",
                index, shadowed_by
            ),
            Finding::MissingStartState => {
                write!(f, "No transition leaves the initial state {}", INITIAL_STATE)
            }
            Finding::UnreachableStates(states) => {
                let names: Vec<String> = states.iter().map(State::to_string).collect();
                write!(f, "Unreachable states detected: {}", names.join(", "))
            }
        }
    }
}

/// Analyzes a decoded `Program`.
///
/// # Arguments
///
/// * `program` - A reference to the `Program` to be analyzed.
///
/// # Returns
///
/// * Every finding, in the order the checks run. An empty program has none.
pub fn analyze(program: &Program) -> Vec<Finding> {
    if program.is_empty() {
        return Vec::new();
    }

    let mut findings = check_shadowed_transitions(program);
    findings.extend(check_start_state(program));
    findings.extend(check_unreachable_states(program));
    findings
}

/// Reports every transition whose `(from, read)` key was already taken by an earlier one.
fn check_shadowed_transitions(program: &Program) -> Vec<Finding> {
    let mut first_seen = HashMap::new();

    program
        .transitions
        .iter()
        .enumerate()
        .filter_map(|(index, transition)| {
            let key = (transition.from, transition.read);
            match first_seen.get(&key) {
                Some(&shadowed_by) => Some(Finding::ShadowedTransition { index, shadowed_by }),
                None => {
                    first_seen.insert(key, index);
                    None
                }
            }
        })
        .collect()
}

fn check_start_state(program: &Program) -> Option<Finding> {
    (!program.transitions.iter().any(|t| t.from == INITIAL_STATE))
        .then_some(Finding::MissingStartState)
}

/// Walks the transition graph from the initial state and reports source states never visited.
fn check_unreachable_states(program: &Program) -> Option<Finding> {
    let mut reachable = BTreeSet::from([INITIAL_STATE]);
    let mut queue = VecDeque::from([INITIAL_STATE]);

    while let Some(state) = queue.pop_front() {
        for transition in program.transitions.iter().filter(|t| t.from == state) {
            if reachable.insert(transition.to) {
                queue.push_back(transition.to);
            }
        }
    }

    let unreachable: Vec<State> = program
        .transitions
        .iter()
        .map(|t| t.from)
        .filter(|state| !reachable.contains(state))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    (!unreachable.is_empty()).then_some(Finding::UnreachableStates(unreachable))
}
