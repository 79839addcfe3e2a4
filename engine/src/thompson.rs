//! Lowers the parsed AST onto the Thompson fragment builder.

use bgrep_syntax::ast::{Node, Pattern};

use crate::nfa::{Builder, Fragment, Nfa};

/// Compiles a pattern's AST into a runnable automaton.
pub fn compile(pattern: &Pattern) -> Nfa {
    let mut builder = Builder::new();
    let fragment = lower(&mut builder, &pattern.root);
    builder.finish(fragment)
}

fn lower(builder: &mut Builder, node: &Node) -> Fragment {
    match node {
        Node::Literal(value) => builder.literal(*value),
        Node::Class { bytes, negated } => builder.class(bytes.clone(), *negated),
        Node::Dot => builder.dot(),
        // The driver strips anchors at the pattern endpoints before this
        // engine sees them; an interior anchor matches its own byte.
        Node::StartAnchor => builder.literal(b'^'),
        Node::EndAnchor => builder.literal(b'$'),
        Node::Sequence(children) => {
            let mut fragment = lower(builder, &children[0]);
            for child in &children[1..] {
                let next = lower(builder, child);
                fragment = builder.concatenate(fragment, next);
            }
            fragment
        }
        Node::Alternation(children) => {
            let mut fragment = lower(builder, &children[0]);
            for child in &children[1..] {
                let next = lower(builder, child);
                fragment = builder.alternate(fragment, next);
            }
            fragment
        }
        // Laziness is a traversal-order concern the simulator does not
        // model; only the bounds matter here.
        Node::Quantifier {
            child, min, max, ..
        } => {
            let fragment = lower(builder, child);
            match (min, max) {
                (0, None) => builder.kleene_star(fragment),
                (1, None) => builder.kleene_plus(fragment),
                (0, Some(1)) => builder.optional(fragment),
                // The parser only emits the three bounds above.
                _ => unreachable!("unsupported quantifier bounds"),
            }
        }
        Node::Capture { child, group } => {
            let fragment = lower(builder, child);
            builder.capture(fragment, *group)
        }
        Node::Backref(group) => builder.backref(*group),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bgrep_syntax::parse;

    fn state_count(pattern: &str) -> usize {
        compile(&parse(pattern).unwrap()).len()
    }

    #[test]
    fn should_add_states_per_construction_rule() {
        let input_output = vec![
            // One two-state fragment per consuming matcher.
            ("a", 2),
            ("[abc]", 2),
            (".", 2),
            ("\\1", 2),
            // Concatenation adds no states.
            ("ab", 4),
            // Alternation, quantifiers and groups wrap with two states.
            ("a|b", 6),
            ("a*", 4),
            ("a+", 4),
            ("a?", 4),
            ("(a)", 4),
        ];

        for (test_id, (pattern, expected)) in input_output.into_iter().enumerate() {
            assert_eq!((test_id, expected), (test_id, state_count(pattern)))
        }
    }

    #[test]
    fn should_lower_interior_anchors_to_literal_bytes() {
        let nfa = compile(&parse("a^b").unwrap());

        // Three consuming fragments joined by concatenation.
        assert_eq!(6, nfa.len());
    }
}
