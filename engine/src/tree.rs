//! Endpoint-set evaluation of the AST.
//!
//! Every node yields the set of `(end, captures)` pairs reachable by
//! matching it from a starting position, in the order a backtracking
//! matcher would try them. Exploring all endpoints at once sidesteps
//! backtracking's exponential blowups: sequences compose endpoint sets and
//! keep them distinct, so a pile-up like `a*a*a*a*b` stays polynomial.

use bgrep_syntax::ast::Node;

use crate::Span;

/// One way a node can match: the exclusive end offset and the capture
/// vector along that path. Slot 0 is reserved for the entire match and
/// filled by the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub end: usize,
    pub captures: Vec<Option<Span>>,
}

impl Endpoint {
    fn new(end: usize, captures: &[Option<Span>]) -> Self {
        Self {
            end,
            captures: captures.to_vec(),
        }
    }
}

/// Enumerates every match of `node` starting at `pos`, threading the
/// capture vector through each path. Non-matches are the empty set; the
/// evaluator never fails.
pub fn match_all(node: &Node, input: &[u8], pos: usize, captures: &[Option<Span>]) -> Vec<Endpoint> {
    match node {
        Node::Literal(value) => {
            if input.get(pos) == Some(value) {
                vec![Endpoint::new(pos + 1, captures)]
            } else {
                Vec::new()
            }
        }
        Node::Class { bytes, negated } => match input.get(pos) {
            Some(byte) if bytes.contains(byte) != *negated => {
                vec![Endpoint::new(pos + 1, captures)]
            }
            _ => Vec::new(),
        },
        Node::Dot => match input.get(pos) {
            Some(byte) if *byte != b'\n' => vec![Endpoint::new(pos + 1, captures)],
            _ => Vec::new(),
        },
        Node::StartAnchor => {
            if pos == 0 {
                vec![Endpoint::new(pos, captures)]
            } else {
                Vec::new()
            }
        }
        Node::EndAnchor => {
            if pos == input.len() {
                vec![Endpoint::new(pos, captures)]
            } else {
                Vec::new()
            }
        }
        Node::Sequence(children) => match_sequence(children, input, pos, captures),
        Node::Alternation(children) => children
            .iter()
            .flat_map(|child| match_all(child, input, pos, captures))
            .collect(),
        Node::Quantifier {
            child,
            min,
            max,
            greedy,
        } => match_quantifier(child, *min, *max, *greedy, input, pos, captures),
        Node::Capture { child, group } => {
            let mut endpoints = match_all(child, input, pos, captures);
            for endpoint in endpoints.iter_mut() {
                endpoint.captures[*group] = Some(Span {
                    start: pos,
                    end: endpoint.end,
                });
            }
            endpoints
        }
        Node::Backref(group) => {
            let slot = match captures.get(*group) {
                Some(slot) => *slot,
                // A reference past the allocated groups can never match.
                None => return Vec::new(),
            };
            // A group that has not participated matches the empty string.
            let text = slot.map_or(&[][..], |span| &input[span.start..span.end]);

            let end = pos + text.len();
            if end <= input.len() && &input[pos..end] == text {
                vec![Endpoint::new(end, captures)]
            } else {
                Vec::new()
            }
        }
    }
}

/// Folds the children left to right: each endpoint of a child seeds the
/// enumeration of the next. The composed set keeps only distinct
/// `(end, captures)` pairs, in first-reached order; collapsing duplicate
/// paths here is what bounds the fold for stacked quantifiers.
fn match_sequence(
    children: &[Node],
    input: &[u8],
    pos: usize,
    captures: &[Option<Span>],
) -> Vec<Endpoint> {
    let mut current = vec![Endpoint::new(pos, captures)];

    for child in children {
        let mut next: Vec<Endpoint> = Vec::new();
        for endpoint in &current {
            for continuation in match_all(child, input, endpoint.end, &endpoint.captures) {
                if !next.contains(&continuation) {
                    next.push(continuation);
                }
            }
        }

        if next.is_empty() {
            return Vec::new();
        }
        current = next;
    }

    current
}

fn match_quantifier(
    child: &Node,
    min: usize,
    max: Option<usize>,
    greedy: bool,
    input: &[u8],
    pos: usize,
    captures: &[Option<Span>],
) -> Vec<Endpoint> {
    // Iteration counts beyond the remaining bytes cannot reach new
    // endpoints; the cap keeps zero-width children from repeating forever.
    let cap = min + input.len().saturating_sub(pos) + 1;
    let upper = max.map_or(cap, |max| max.min(cap));

    let mut all = Vec::new();
    for count in min..=upper {
        let exact = match_exactly(child, input, pos, captures, count);
        if exact.is_empty() {
            // The smallest unreachable count ends the scan.
            break;
        }
        all.extend(exact);
    }

    // Greedy quantifiers offer longer matches first; non-greedy ones are
    // already shortest-first.
    if greedy {
        all.reverse();
    }
    all
}

/// Endpoints reachable by exactly `count` successive matches of the child.
fn match_exactly(
    child: &Node,
    input: &[u8],
    pos: usize,
    captures: &[Option<Span>],
    count: usize,
) -> Vec<Endpoint> {
    if count == 0 {
        let mut captures = captures.to_vec();
        // A capture group repeated zero times still participates, as empty.
        if let Node::Capture { group, .. } = child {
            captures[*group] = Some(Span {
                start: pos,
                end: pos,
            });
        }
        return vec![Endpoint { end: pos, captures }];
    }

    let mut current = vec![Endpoint::new(pos, captures)];
    for _ in 0..count {
        let mut next = Vec::new();
        for endpoint in &current {
            next.extend(match_all(child, input, endpoint.end, &endpoint.captures));
        }

        if next.is_empty() {
            return Vec::new();
        }
        current = next;
    }

    current
}
