//! Subset-closure simulation of the automaton with per-path capture state.
//!
//! Each live path is an execution context. A step closes the context bag
//! over zero-width transitions, then advances every context across the
//! transitions that accept the next input byte, cloning at branch points so
//! capture history stays path-local. Contexts are deduplicated by state id
//! within a closure, which bounds the bag by the arena size and keeps the
//! classic quantifier pile-ups linear instead of exponential.

use std::collections::HashMap;

use crate::nfa::{CaptureTag, Matcher, Nfa, StateId};
use crate::sparse_set::SparseSet;
use crate::Span;

/// Per-path snapshot: automaton state, input position, the stack of opened
/// captures and the groups completed so far.
#[derive(Debug, Clone)]
struct ExecutionContext {
    state: StateId,
    pos: usize,
    active: Vec<(usize, usize)>,
    completed: HashMap<usize, Span>,
}

impl ExecutionContext {
    fn new(state: StateId, pos: usize) -> Self {
        Self {
            state,
            pos,
            active: Vec::new(),
            completed: HashMap::new(),
        }
    }

    /// Records group boundaries crossed by a capture transition. An end tag
    /// closes the most recently opened entry for its group, so iterations
    /// of a quantified group overwrite earlier ones.
    fn apply_tags(&mut self, tags: &[CaptureTag]) {
        for tag in tags {
            if tag.is_start {
                self.active.push((tag.group, self.pos));
            } else if let Some(idx) = self
                .active
                .iter()
                .rposition(|&(group, _)| group == tag.group)
            {
                let (group, start) = self.active.remove(idx);
                self.completed.insert(
                    group,
                    Span {
                        start,
                        end: self.pos,
                    },
                );
            }
        }
    }
}

/// A successful run: where the match ended and the completed group spans,
/// keyed by group id with 0 holding the entire match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acceptance {
    pub end: usize,
    pub groups: HashMap<usize, Span>,
}

/// Runs the automaton against `input` from `scan_start`.
///
/// The first accepting context of a closure is remembered, but the run keeps
/// stepping while any context survives and prefers a later, longer accept:
/// loop transitions are listed before their exits, so the surviving paths
/// are the ones still extending the match, which realizes the greedy
/// outcome.
pub fn run(nfa: &Nfa, input: &[u8], scan_start: usize, end_anchored: bool) -> Option<Acceptance> {
    let mut visited = SparseSet::new(nfa.len());
    let mut contexts = vec![ExecutionContext::new(nfa.start, scan_start)];
    epsilon_closure(nfa, &mut contexts, &mut visited);

    let mut best = accepting(nfa, &contexts, input, end_anchored).cloned();

    // Consuming steps are bounded by the remaining input; the slack covers
    // zero-width backreference hops, which never revisit a state without
    // the closure deduplicating them.
    let mut rounds = input.len().saturating_sub(scan_start) + nfa.len() + 1;

    while rounds > 0 {
        rounds -= 1;

        contexts = delta(nfa, &contexts, input);
        if contexts.is_empty() {
            break;
        }
        epsilon_closure(nfa, &mut contexts, &mut visited);

        if let Some(context) = accepting(nfa, &contexts, input, end_anchored) {
            if best
                .as_ref()
                .map(|current| context.pos > current.pos)
                .unwrap_or(true)
            {
                best = Some(context.clone());
            }
        }
    }

    best.map(|context| {
        let mut groups = context.completed;
        groups.insert(
            0,
            Span {
                start: scan_start,
                end: context.pos,
            },
        );
        Acceptance {
            end: context.pos,
            groups,
        }
    })
}

fn accepting<'a>(
    nfa: &Nfa,
    contexts: &'a [ExecutionContext],
    input: &[u8],
    end_anchored: bool,
) -> Option<&'a ExecutionContext> {
    contexts
        .iter()
        .find(|context| nfa.state(context.state).accept && (!end_anchored || context.pos == input.len()))
}

/// The delta step: follows every consuming transition that accepts the byte
/// at the context's position, and every backreference whose completed text
/// prefixes the remaining input. Contexts clone on every branch taken.
fn delta(nfa: &Nfa, contexts: &[ExecutionContext], input: &[u8]) -> Vec<ExecutionContext> {
    let mut next = Vec::new();

    for context in contexts {
        for transition in &nfa.state(context.state).transitions {
            match &transition.matcher {
                Matcher::Backref(group) => {
                    let text = match context.completed.get(group) {
                        Some(span) => &input[span.start..span.end],
                        // Not completed yet; the transition cannot fire.
                        None => continue,
                    };

                    let end = context.pos + text.len();
                    if end <= input.len() && &input[context.pos..end] == text {
                        let mut fork = context.clone();
                        fork.state = transition.target;
                        fork.pos = end;
                        next.push(fork);
                    }
                }
                matcher if !matcher.is_epsilon() && matcher.matches(input, context.pos) => {
                    let mut fork = context.clone();
                    fork.state = transition.target;
                    fork.pos += 1;
                    next.push(fork);
                }
                _ => (),
            }
        }
    }

    next
}

/// Replaces the bag with its closure over zero-width transitions, applying
/// capture tags along the way. Deduplication is by state id only, keeping
/// the first context that reaches each state; capture differences between
/// paths into the same state are resolved in favor of the earlier path.
fn epsilon_closure(nfa: &Nfa, contexts: &mut Vec<ExecutionContext>, visited: &mut SparseSet) {
    visited.clear();

    let mut stack = std::mem::take(contexts);
    stack.reverse();

    while let Some(context) = stack.pop() {
        if !visited.insert(context.state.as_usize()) {
            continue;
        }

        for transition in &nfa.state(context.state).transitions {
            if transition.matcher.is_epsilon() && !visited.contains(transition.target.as_usize()) {
                let mut fork = context.clone();
                fork.state = transition.target;
                if let Matcher::CaptureEpsilon(tags) = &transition.matcher {
                    fork.apply_tags(tags);
                }
                stack.push(fork);
            }
        }

        contexts.push(context);
    }
}
