//! Provides the matching engines behind bgrep: the same pattern surface
//! language evaluated either by endpoint enumeration over the AST or by a
//! Thompson automaton simulated with subset closure.
//!
//! # Example
//!
//! ```rust
//! use bgrep_engine::{find, Engine};
//!
//! let result = find("(cat|dog)s?", b"dogs", Engine::Automaton)
//!     .expect("failed to parse")
//!     .expect("no match");
//!
//! assert_eq!(vec!["dogs".to_string(), "dog".to_string()], result.captures);
//! ```
//!
//! Both engines agree on the scenarios the tool cares about; the automaton
//! engine is the default because stacked quantifiers cost it linear rather
//! than polynomial time.

pub mod nfa;
pub mod simulator;
pub mod thompson;
pub mod tree;

mod sparse_set;

pub use bgrep_syntax::{parse, ParseError};

/// Which evaluator runs the pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Engine {
    /// Endpoint enumeration over the AST.
    Tree,
    /// Thompson construction simulated by subset closure.
    #[default]
    Automaton,
}

/// A byte span into the searched input, end-exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// A successful match. `captures[0]` is the entire match; `captures[i]` is
/// the latest text of group `i`, or empty if the group did not participate.
/// The vector length always equals the pattern's group count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub start: usize,
    pub end: usize,
    pub captures: Vec<String>,
}

/// Returns whether the pattern matches anywhere in the input.
pub fn is_match(pattern: &str, input: &[u8], engine: Engine) -> Result<bool, ParseError> {
    find(pattern, input, engine).map(|found| found.is_some())
}

/// Scans the input for the pattern and returns the first match.
///
/// Candidate start positions are every offset up to and including the input
/// length, or offset zero alone when the pattern is start-anchored; the
/// first accepting run wins.
pub fn find(pattern: &str, input: &[u8], engine: Engine) -> Result<Option<Match>, ParseError> {
    match engine {
        Engine::Tree => find_tree(pattern, input),
        Engine::Automaton => find_automaton(pattern, input),
    }
}

fn find_tree(pattern: &str, input: &[u8]) -> Result<Option<Match>, ParseError> {
    let parsed = bgrep_syntax::parse(pattern)?;
    let init = vec![None; parsed.group_count];

    // Anchors stay embedded as nodes; restricting the candidates when the
    // pattern leads with one just skips starts that cannot succeed.
    let last_start = if pattern.starts_with('^') {
        0
    } else {
        input.len()
    };

    for start in 0..=last_start {
        let endpoints = tree::match_all(&parsed.root, input, start, &init);
        if let Some(endpoint) = endpoints.into_iter().next() {
            return Ok(Some(materialize(
                input,
                start,
                endpoint.end,
                parsed.group_count,
                |group| endpoint.captures.get(group).copied().flatten(),
            )));
        }
    }

    Ok(None)
}

fn find_automaton(pattern: &str, input: &[u8]) -> Result<Option<Match>, ParseError> {
    // Endpoint anchors become a start-candidate restriction and an
    // end-of-input requirement rather than automaton states.
    let start_anchored = pattern.starts_with('^');
    let end_anchored = ends_with_anchor(pattern);

    let mut stripped = pattern.strip_prefix('^').unwrap_or(pattern);
    if end_anchored {
        stripped = &stripped[..stripped.len() - 1];
    }

    let parsed = bgrep_syntax::parse(stripped)?;
    let automaton = thompson::compile(&parsed);

    let last_start = if start_anchored { 0 } else { input.len() };
    for start in 0..=last_start {
        if let Some(acceptance) = simulator::run(&automaton, input, start, end_anchored) {
            return Ok(Some(materialize(
                input,
                start,
                acceptance.end,
                parsed.group_count,
                |group| acceptance.groups.get(&group).copied(),
            )));
        }
    }

    Ok(None)
}

/// A trailing `$` is an anchor only when it is not itself escaped.
fn ends_with_anchor(pattern: &str) -> bool {
    let bytes = pattern.as_bytes();
    match bytes.split_last() {
        Some((b'$', rest)) => {
            let backslashes = rest.iter().rev().take_while(|&&byte| byte == b'\\').count();
            backslashes % 2 == 0
        }
        _ => false,
    }
}

/// Resolves capture spans to owned strings, with slot 0 carrying the entire
/// match and non-participating groups the empty string.
fn materialize(
    input: &[u8],
    start: usize,
    end: usize,
    group_count: usize,
    group_span: impl Fn(usize) -> Option<Span>,
) -> Match {
    let captures = (0..group_count)
        .map(|group| {
            let span = if group == 0 {
                Some(Span { start, end })
            } else {
                group_span(group)
            };

            span.map(|span| String::from_utf8_lossy(&input[span.start..span.end]).into_owned())
                .unwrap_or_default()
        })
        .collect();

    Match {
        start,
        end,
        captures,
    }
}
