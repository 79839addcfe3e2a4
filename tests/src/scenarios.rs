use bgrep_engine::{find, is_match, Engine, Match};

const ENGINES: [Engine; 2] = [Engine::Tree, Engine::Automaton];

fn captures_of(pattern: &str, input: &str, engine: Engine) -> Option<Vec<String>> {
    find(pattern, input.as_bytes(), engine)
        .expect("failed to parse")
        .map(|found| found.captures)
}

#[test]
fn should_match_end_to_end_scenarios_with_captures() {
    let input_output: Vec<(&str, &str, Vec<&str>)> = vec![
        (
            r"(\w+)@(\w+\.\w+)",
            "john@example.com",
            vec!["john@example.com", "john", "example.com"],
        ),
        ("^abc$", "abc", vec!["abc"]),
        ("a*a*a*a*b", "aaaaaab", vec!["aaaaaab"]),
        ("(cat|dog)s?", "dogs", vec!["dogs", "dog"]),
        (r"([abc]+)-\1", "abc-abc", vec!["abc-abc", "abc"]),
        // Classes keep their raw bytes: `0-9` is membership of `0`, `-` and
        // `9`, so the negation admits the digits 1 through 8 as well.
        ("[^0-9]+", "abc123", vec!["abc123"]),
        ("a(b|c)*d", "abcbcd", vec!["abcbcd", "c"]),
    ];

    for engine in ENGINES {
        for (test_id, (pattern, input, expected)) in input_output.iter().enumerate() {
            let expected: Vec<String> = expected.iter().map(|s| s.to_string()).collect();
            let res = captures_of(pattern, input, engine);
            assert_eq!((engine, test_id, Some(expected)), (engine, test_id, res))
        }
    }
}

#[test]
fn should_reject_non_matching_scenarios() {
    let input_output = vec![
        ("^abc$", "abcd"),
        ("^abc$", "zabc"),
        ("cat", "dog food"),
        (r"(\d+)-\1", "12-34"),
    ];

    for engine in ENGINES {
        for (test_id, (pattern, input)) in input_output.iter().enumerate() {
            let res = is_match(pattern, input.as_bytes(), engine).expect("failed to parse");
            assert_eq!((engine, test_id, false), (engine, test_id, res))
        }
    }
}

#[test]
fn should_agree_across_engines() {
    // Greedy-only patterns; laziness is honored by the tree engine alone
    // and would diverge here.
    let cases = vec![
        ("a+b+", "xxaaabbby"),
        (r"\s\w+", "one two"),
        ("(a(b(c)))", "abc"),
        ("x([0-9]*)y", "x09-9y"),
        ("((a)|(b))+", "ab"),
        ("colou?r", "my color"),
        ("wx|yz", "aayz"),
        (".+", "a\nb"),
    ];

    for (test_id, (pattern, input)) in cases.into_iter().enumerate() {
        let tree = find(pattern, input.as_bytes(), Engine::Tree).expect("failed to parse");
        let automaton = find(pattern, input.as_bytes(), Engine::Automaton).expect("failed to parse");
        assert_eq!((test_id, &tree), (test_id, &automaton))
    }
}

// Every reported match start must reproduce captures[0] as a slice of the
// input at that offset.
#[test]
fn should_report_spans_consistent_with_capture_zero() {
    let cases = vec![
        ("b+", "aabba"),
        (r"\d\d", "abc42xy"),
        ("(l+)o", "hello"),
    ];

    for engine in ENGINES {
        for (test_id, (pattern, input)) in cases.iter().enumerate() {
            let Match {
                start,
                end,
                captures,
            } = find(pattern, input.as_bytes(), engine)
                .expect("failed to parse")
                .expect("no match");

            assert_eq!((engine, test_id, &input[start..end]), (
                engine,
                test_id,
                captures[0].as_str()
            ))
        }
    }
}

#[test]
fn should_match_start_anchored_patterns_only_at_offset_zero() {
    for engine in ENGINES {
        assert!(is_match("^ab", b"abc", engine).unwrap());
        assert!(!is_match("^bc", b"abc", engine).unwrap());
        // Unanchored, the same pattern matches away from the start.
        assert!(is_match("bc", b"abc", engine).unwrap());
    }
}

#[test]
fn should_keep_capture_spans_inside_the_match() {
    for engine in ENGINES {
        let found = find(r"(\w+)@(\w+\.\w+)", b"mail john@example.com today", engine)
            .unwrap()
            .unwrap();

        for group in &found.captures[1..] {
            assert!(group.len() <= found.end - found.start);
            assert!(found.captures[0].contains(group.as_str()));
        }
    }
}

#[test]
fn should_yield_empty_strings_for_zero_iteration_groups() {
    for engine in ENGINES {
        let res = captures_of("a(x)?b", "ab", engine);
        assert_eq!(
            (engine, Some(vec!["ab".to_string(), String::new()])),
            (engine, res)
        );

        // The non-participating branch of an alternation stays empty too.
        let res = captures_of("(a)|(b)", "b", engine);
        assert_eq!(
            (
                engine,
                Some(vec!["b".to_string(), String::new(), "b".to_string()])
            ),
            (engine, res)
        );
    }
}

// Re-emitting a parsed pattern and parsing it again must not change what it
// matches.
#[test]
fn should_preserve_matching_through_reemission() {
    let patterns = vec!["(cat|dog)s?", "a(b|c)*d", "[^0-9]+", "^ab+c?$"];
    let input = "dogs abcbcd";

    for (test_id, pattern) in patterns.into_iter().enumerate() {
        let reemitted = bgrep_syntax::parse(pattern)
            .expect("failed to parse")
            .root
            .to_string();

        for engine in ENGINES {
            let original = find(pattern, input.as_bytes(), engine).unwrap();
            let roundtripped = find(&reemitted, input.as_bytes(), engine).unwrap();
            assert_eq!((test_id, engine, original), (test_id, engine, roundtripped))
        }
    }
}

// The classic backtracking blow-up: stacked stars over a long run of `a`s
// with no terminating byte. Endpoint deduplication (tree) and state-set
// closure (automaton) both keep this polynomial; a backtracker would take
// longer than the test harness allows.
#[test]
fn should_reject_quantifier_pileups_in_polynomial_time() {
    let input = "a".repeat(50);

    for engine in ENGINES {
        assert!(!is_match("a*a*a*a*a*b", input.as_bytes(), engine).unwrap());
    }
}

#[test]
fn should_match_quantifier_pileups_at_full_length() {
    let input = format!("{}b", "a".repeat(50));

    for engine in ENGINES {
        let found = find("a*a*a*a*a*b", input.as_bytes(), engine)
            .unwrap()
            .unwrap();
        assert_eq!((engine, input.as_str()), (engine, found.captures[0].as_str()))
    }
}
