use std::fmt::{self, Display, Write};

/// A parsed pattern: the root node plus the number of capture slots the
/// evaluators must allocate. Slot 0 is reserved for the entire match, so
/// `group_count` is always at least 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    pub root: Node,
    pub group_count: usize,
}

/// A single node of the pattern AST.
///
/// The set of variants is closed so that both evaluators can enumerate every
/// case exhaustively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Matches one input byte equal to the value.
    Literal(u8),
    /// Matches one input byte by membership in the set, inverted when
    /// negated. The set holds the raw bytes read from the class; `a-z` is
    /// the three bytes `a`, `-`, `z`.
    Class { bytes: Vec<u8>, negated: bool },
    /// Matches any one byte other than a newline.
    Dot,
    /// Zero-width match at offset zero.
    StartAnchor,
    /// Zero-width match at the end of the input.
    EndAnchor,
    /// Concatenation of the children, in order.
    Sequence(Vec<Node>),
    /// Left-biased union of the children.
    Alternation(Vec<Node>),
    /// Repeats the child between `min` and `max` times, where `None` is
    /// unbounded. The greedy flag orders the tree engine's endpoints; the
    /// automaton engine records it but explores in transition order.
    Quantifier {
        child: Box<Node>,
        min: usize,
        max: Option<usize>,
        greedy: bool,
    },
    /// Tags the child's match with a capture group number.
    Capture { child: Box<Node>, group: usize },
    /// Matches the bytes most recently captured by the referenced group.
    Backref(usize),
}

/// Bytes that must be backslash-escaped to read as literals.
const METACHARACTERS: &[u8] = b"\\^$.[]()|*+?";

impl Display for Node {
    /// Re-emits the node in source syntax. Parsing the output of a pattern's
    /// root node yields an equivalent tree, up to removal of redundant
    /// grouping.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Literal(value) => {
                if METACHARACTERS.contains(value) {
                    f.write_char('\\')?;
                }
                f.write_char(char::from(*value))
            }
            Node::Class { bytes, negated } => {
                f.write_char('[')?;
                if *negated {
                    f.write_char('^')?;
                }
                for byte in bytes {
                    f.write_char(char::from(*byte))?;
                }
                f.write_char(']')
            }
            Node::Dot => f.write_char('.'),
            Node::StartAnchor => f.write_char('^'),
            Node::EndAnchor => f.write_char('$'),
            Node::Sequence(children) => {
                for child in children {
                    Display::fmt(child, f)?;
                }
                Ok(())
            }
            Node::Alternation(children) => {
                for (idx, child) in children.iter().enumerate() {
                    if idx > 0 {
                        f.write_char('|')?;
                    }
                    Display::fmt(child, f)?;
                }
                Ok(())
            }
            Node::Quantifier {
                child,
                min,
                max,
                greedy,
            } => {
                Display::fmt(child, f)?;
                match (min, max) {
                    (0, None) => f.write_char('*')?,
                    (1, None) => f.write_char('+')?,
                    (0, Some(1)) => f.write_char('?')?,
                    // Only reachable for hand-built trees; the parser emits
                    // the three symbolic forms above.
                    (min, None) => write!(f, "{{{},}}", min)?,
                    (min, Some(max)) => write!(f, "{{{},{}}}", min, max)?,
                }
                if !greedy {
                    f.write_char('?')?;
                }
                Ok(())
            }
            Node::Capture { child, .. } => {
                f.write_char('(')?;
                Display::fmt(child, f)?;
                f.write_char(')')
            }
            Node::Backref(group) => write!(f, "\\{}", group),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_reemit_source_syntax() {
        let input_output = vec![
            (
                Node::Sequence(vec![
                    Node::StartAnchor,
                    Node::Literal(b'a'),
                    Node::Quantifier {
                        child: Box::new(Node::Literal(b'b')),
                        min: 0,
                        max: None,
                        greedy: true,
                    },
                    Node::EndAnchor,
                ]),
                "^ab*$",
            ),
            (
                Node::Capture {
                    child: Box::new(Node::Alternation(vec![
                        Node::Literal(b'x'),
                        Node::Class {
                            bytes: b"0-9".to_vec(),
                            negated: true,
                        },
                    ])),
                    group: 1,
                },
                "(x|[^0-9])",
            ),
            (
                Node::Sequence(vec![
                    Node::Quantifier {
                        child: Box::new(Node::Dot),
                        min: 1,
                        max: None,
                        greedy: false,
                    },
                    Node::Backref(2),
                ]),
                ".+?\\2",
            ),
            (Node::Literal(b'*'), "\\*"),
        ];

        for (test_id, (node, expected)) in input_output.into_iter().enumerate() {
            assert_eq!((test_id, expected.to_string()), (test_id, node.to_string()))
        }
    }
}
