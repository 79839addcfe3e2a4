//! Arena representation of the automaton and the Thompson fragment builder.
//!
//! Kleene loops make the state graph cyclic, so states are addressed by
//! stable arena indices rather than owned references; the whole arena is
//! owned by the automaton built from one pattern, and the id counter lives
//! on the builder so nothing leaks across parses.

/// Stable handle to a state in the automaton arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateId(usize);

impl StateId {
    #[inline]
    pub(crate) fn as_usize(self) -> usize {
        self.0
    }
}

/// Marker carried by a capture transition: record the current input position
/// as the group's start or end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureTag {
    pub group: usize,
    pub is_start: bool,
}

impl CaptureTag {
    pub const fn start(group: usize) -> Self {
        Self {
            group,
            is_start: true,
        }
    }

    pub const fn end(group: usize) -> Self {
        Self {
            group,
            is_start: false,
        }
    }
}

/// Transition label. The epsilon variants are zero-width and followed during
/// closure; the rest consume input during the delta step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matcher {
    /// One byte equal to the value.
    Literal(u8),
    /// One byte by raw-set membership, inverted when negated.
    Class { bytes: Vec<u8>, negated: bool },
    /// Any one byte other than a newline.
    Dot,
    /// Zero-width, unconditional.
    Epsilon,
    /// Zero-width; applies its capture tags to the crossing context.
    CaptureEpsilon(Vec<CaptureTag>),
    /// The bytes most recently completed by the referenced group. Cannot
    /// fire until the group has completed, which only the simulator knows.
    Backref(usize),
}

impl Matcher {
    /// Zero-width transitions are followed during closure, not delta.
    pub fn is_epsilon(&self) -> bool {
        matches!(self, Matcher::Epsilon | Matcher::CaptureEpsilon(_))
    }

    /// Whether the matcher accepts the byte at `pos`. Backreferences depend
    /// on per-context capture state and always answer `false` here.
    pub fn matches(&self, input: &[u8], pos: usize) -> bool {
        match self {
            Matcher::Literal(value) => input.get(pos) == Some(value),
            Matcher::Class { bytes, negated } => input
                .get(pos)
                .map(|byte| bytes.contains(byte) != *negated)
                .unwrap_or(false),
            Matcher::Dot => input.get(pos).map(|byte| *byte != b'\n').unwrap_or(false),
            Matcher::Epsilon | Matcher::CaptureEpsilon(_) => true,
            Matcher::Backref(_) => false,
        }
    }
}

/// A labeled edge to another state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub matcher: Matcher,
    pub target: StateId,
}

#[derive(Debug, Default)]
pub struct State {
    pub accept: bool,
    // Ordered: the simulator explores transitions in insertion order, which
    // is what places Kleene loop entries ahead of their exits.
    pub transitions: Vec<Transition>,
}

/// A sub-automaton with a single entry and a single accept state. Fragment
/// composition clears the inner accept flags, so a finished automaton holds
/// exactly one accepting state.
#[derive(Debug, Clone, Copy)]
pub struct Fragment {
    pub start: StateId,
    pub accept: StateId,
}

/// The compiled automaton: the state arena plus its entry and accept
/// handles. Immutable once built.
#[derive(Debug)]
pub struct Nfa {
    states: Vec<State>,
    pub start: StateId,
}

impl Nfa {
    pub fn state(&self, id: StateId) -> &State {
        &self.states[id.as_usize()]
    }

    /// Returns the number of states in the arena.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

/// Composes Thompson fragments in a builder-scoped arena.
#[derive(Debug, Default)]
pub struct Builder {
    states: Vec<State>,
}

impl Builder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push_state(&mut self) -> StateId {
        let id = StateId(self.states.len());
        self.states.push(State::default());
        id
    }

    fn push_accept_state(&mut self) -> StateId {
        let id = self.push_state();
        self.states[id.as_usize()].accept = true;
        id
    }

    fn add_transition(&mut self, from: StateId, to: StateId, matcher: Matcher) {
        self.states[from.as_usize()]
            .transitions
            .push(Transition { matcher, target: to });
    }

    fn clear_accept(&mut self, id: StateId) {
        self.states[id.as_usize()].accept = false;
    }

    /// q0 --matcher--> q1
    fn single(&mut self, matcher: Matcher) -> Fragment {
        let q0 = self.push_state();
        let q1 = self.push_accept_state();
        self.add_transition(q0, q1, matcher);
        Fragment {
            start: q0,
            accept: q1,
        }
    }

    pub fn literal(&mut self, value: u8) -> Fragment {
        self.single(Matcher::Literal(value))
    }

    pub fn class(&mut self, bytes: Vec<u8>, negated: bool) -> Fragment {
        self.single(Matcher::Class { bytes, negated })
    }

    pub fn dot(&mut self) -> Fragment {
        self.single(Matcher::Dot)
    }

    pub fn backref(&mut self, group: usize) -> Fragment {
        self.single(Matcher::Backref(group))
    }

    /// `AB`: a.accept --eps--> b.start; a.accept stops accepting.
    pub fn concatenate(&mut self, a: Fragment, b: Fragment) -> Fragment {
        self.add_transition(a.accept, b.start, Matcher::Epsilon);
        self.clear_accept(a.accept);
        Fragment {
            start: a.start,
            accept: b.accept,
        }
    }

    /// `A|B`: a fresh start forks into both branches, which rejoin at a
    /// fresh accept.
    pub fn alternate(&mut self, a: Fragment, b: Fragment) -> Fragment {
        let q0 = self.push_state();
        let q1 = self.push_accept_state();

        self.add_transition(q0, a.start, Matcher::Epsilon);
        self.add_transition(q0, b.start, Matcher::Epsilon);
        self.add_transition(a.accept, q1, Matcher::Epsilon);
        self.add_transition(b.accept, q1, Matcher::Epsilon);

        self.clear_accept(a.accept);
        self.clear_accept(b.accept);
        Fragment {
            start: q0,
            accept: q1,
        }
    }

    /// `A*`: loop before exit, plus a skip edge for zero iterations.
    pub fn kleene_star(&mut self, a: Fragment) -> Fragment {
        let q0 = self.push_state();
        let q3 = self.push_accept_state();

        self.add_transition(q0, a.start, Matcher::Epsilon);
        self.add_transition(q0, q3, Matcher::Epsilon);
        self.add_transition(a.accept, a.start, Matcher::Epsilon);
        self.add_transition(a.accept, q3, Matcher::Epsilon);

        self.clear_accept(a.accept);
        Fragment {
            start: q0,
            accept: q3,
        }
    }

    /// `A+`: as star, without the skip edge.
    pub fn kleene_plus(&mut self, a: Fragment) -> Fragment {
        let q0 = self.push_state();
        let q3 = self.push_accept_state();

        self.add_transition(q0, a.start, Matcher::Epsilon);
        self.add_transition(a.accept, a.start, Matcher::Epsilon);
        self.add_transition(a.accept, q3, Matcher::Epsilon);

        self.clear_accept(a.accept);
        Fragment {
            start: q0,
            accept: q3,
        }
    }

    /// `A?`: the skip edge alone.
    pub fn optional(&mut self, a: Fragment) -> Fragment {
        let q0 = self.push_state();
        let q3 = self.push_accept_state();

        self.add_transition(q0, q3, Matcher::Epsilon);
        self.add_transition(q0, a.start, Matcher::Epsilon);
        self.add_transition(a.accept, q3, Matcher::Epsilon);

        self.clear_accept(a.accept);
        Fragment {
            start: q0,
            accept: q3,
        }
    }

    /// `(A)`: tagged epsilon transitions record the group's boundaries on
    /// any context crossing them.
    pub fn capture(&mut self, a: Fragment, group: usize) -> Fragment {
        let q0 = self.push_state();
        let q1 = self.push_accept_state();

        self.add_transition(
            q0,
            a.start,
            Matcher::CaptureEpsilon(vec![CaptureTag::start(group)]),
        );
        self.add_transition(
            a.accept,
            q1,
            Matcher::CaptureEpsilon(vec![CaptureTag::end(group)]),
        );

        self.clear_accept(a.accept);
        Fragment {
            start: q0,
            accept: q1,
        }
    }

    /// Seals the arena around the fragment's entry state.
    pub fn finish(self, fragment: Fragment) -> Nfa {
        Nfa {
            states: self.states,
            start: fragment.start,
        }
    }
}
