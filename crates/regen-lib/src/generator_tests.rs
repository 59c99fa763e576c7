use std::collections::BTreeSet;

use regen_syntax::{Flags, ParseErrorKind};

use crate::test_utils::{assert_generates_matches, matcher, seeded};
use crate::{Config, Error, Generator, GeneratorBuilder, UnsupportedPolicy};

const TRIALS: usize = 1000;

#[test]
fn generated_strings_match() {
    let patterns = [
        "a",
        "aaaa",
        "a+",
        "a?",
        "a*",
        "a|b|c",
        r"\w",
        r"\d",
        ".*",
        "abc*def?",
        "[abcdef][^abcdef]",
        r"(abc)   \1",
        r"(\w+)   \w",
        "^hello$",
        r"\w+@\w+\.\w{1,2}(\.\w{1,2})?",
        r"(\w+)\s\1",
        r"\d{3}-\d{2,4}",
        "(a|bc){2,3}",
        r"((a)|b)+\2",
        r"(a\1b){2}",
        r"(?:(x)|y(z\2)){2}",
        r"[^\d\s]{2}",
        r"\x41B\t",
        "(?:ab){0}c",
        "x{2,}y{0,3}",
    ];
    for pattern in patterns {
        assert_generates_matches(pattern, Flags::default(), TRIALS);
    }
}

#[test]
fn generated_strings_match_ignoring_case() {
    let flags = Flags::new().ignore_case(true);
    for pattern in ["a", "[a-c]x", "[^a]", r"(\w+)-\1", "hello|world"] {
        assert_generates_matches(pattern, flags, TRIALS);
    }
}

#[test]
fn dot_all_reaches_line_terminators() {
    let flags = Flags::new().dot_all(true);
    let samples = assert_generates_matches("a.c", flags, 5000);
    assert!(samples.iter().any(|s| s == "a\nc"));

    let samples = assert_generates_matches("a.c", Flags::default(), 5000);
    assert!(samples.iter().all(|s| !s.contains(['\n', '\r'])));
}

#[test]
fn quantifier_bounds_are_respected_and_covered() {
    let samples = assert_generates_matches("a{2,5}", Flags::default(), TRIALS);
    let lengths: BTreeSet<usize> = samples.iter().map(String::len).collect();
    assert_eq!(lengths, (2..=5).collect::<BTreeSet<_>>());

    let samples = assert_generates_matches("[xyz]*", Flags::default(), TRIALS);
    let lengths: BTreeSet<usize> = samples.iter().map(String::len).collect();
    assert_eq!(lengths, (0..=20).collect::<BTreeSet<_>>());
}

#[test]
fn case_insensitive_literal_takes_both_cases() {
    let samples = assert_generates_matches("a", Flags::new().ignore_case(true), TRIALS);
    let seen: BTreeSet<&str> = samples.iter().map(String::as_str).collect();
    assert_eq!(seen, BTreeSet::from(["a", "A"]));
}

#[test]
fn backreference_matches_group_text() {
    let generator = Generator::new(r"(\w+)\s\1").unwrap();
    let re = matcher(r"(\w+)\s\1", Flags::default());
    let mut rng = seeded(21);
    for _ in 0..TRIALS {
        let sample = generator.build_with(&mut rng).unwrap();
        let found = re.find(&sample).unwrap();
        let group = &sample[found.group(1).unwrap()];
        let rest = &sample[group.len()..];
        let space = rest.chars().next().unwrap();
        assert_eq!(&rest[space.len_utf8()..], group);
    }
}

#[test]
fn fixed_length_patterns_keep_their_shape() {
    let first = Generator::new("[a-z]{6}").unwrap();
    let second = Generator::new("[a-z]{6}").unwrap();
    let mut seen = BTreeSet::new();
    for _ in 0..100 {
        let a = first.build().unwrap();
        let b = second.build().unwrap();
        assert_eq!(a.len(), 6);
        assert_eq!(b.len(), 6);
        seen.insert(a);
        seen.insert(b);
    }
    assert!(seen.len() > 1);
}

#[test]
fn concrete_scenarios() {
    let generator = Generator::new("aaaa").unwrap();
    for _ in 0..100 {
        assert_eq!(generator.build().unwrap(), "aaaa");
    }

    let samples = assert_generates_matches("a|b|c", Flags::default(), TRIALS);
    let seen: BTreeSet<&str> = samples.iter().map(String::as_str).collect();
    assert_eq!(seen, BTreeSet::from(["a", "b", "c"]));

    for sample in assert_generates_matches("[abcdef][^abcdef]", Flags::default(), TRIALS) {
        let chars: Vec<char> = sample.chars().collect();
        assert_eq!(chars.len(), 2);
        assert!(('a'..='f').contains(&chars[0]));
        assert!(!('a'..='f').contains(&chars[1]));
        assert!(u32::from(chars[1]) <= 100);
    }

    for sample in assert_generates_matches("abc*def?", Flags::default(), TRIALS) {
        let rest = sample.strip_prefix("ab").unwrap();
        let rest = rest.trim_start_matches('c');
        assert!(rest == "de" || rest == "def", "{sample:?}");
    }
}

#[test]
fn seeded_generation_is_deterministic() {
    let generator = Generator::new(r"[a-z]{3,8}(\d+)-\1").unwrap();
    let first: Vec<String> = generator
        .samples(seeded(99))
        .take(20)
        .collect::<Result<_, _>>()
        .unwrap();
    let second: Vec<String> = generator
        .samples(seeded(99))
        .take(20)
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(first, second);
}

#[test]
fn unsatisfiable_exclusion_is_an_error_and_not_fatal() {
    let generator = Generator::new(r"[^\x00-\x64]").unwrap();
    assert_eq!(
        generator.build(),
        Err(Error::UnsatisfiableExclusion {
            attempts: 1000,
            max_value: 100
        })
    );

    let generator = Generator::new(r"[^\x00-\x64]?").unwrap();
    let results: Vec<_> = generator.samples(seeded(3)).take(100).collect();
    assert!(results.iter().any(|r| r.is_err()));
    assert!(results.iter().any(|r| r.as_deref() == Ok("")));
}

#[test]
fn wider_code_point_ceiling_satisfies_exclusion() {
    let generator = Generator::builder(r"[^\x00-\x64]")
        .config(Config::new().max_code_point(0x7f))
        .build()
        .unwrap();
    let c = generator.build().unwrap().chars().next().unwrap();
    assert!((0x65..=0x7f).contains(&u32::from(c)));
}

#[test]
fn unsupported_constructs_degrade() {
    let generator = Generator::new(r"(?=h).i").unwrap();
    assert!(!generator.is_fully_supported());
    assert_eq!(generator.unsupported()[0].kind, "Lookahead");
    assert_eq!(generator.build().unwrap().chars().count(), 2);

    let generator = Generator::builder(r"\bx")
        .config(Config::new().unsupported(UnsupportedPolicy::KindName))
        .build()
        .unwrap();
    assert_eq!(generator.build().unwrap(), "WordBoundaryx");
}

#[test]
fn parse_errors_surface_at_construction() {
    let err = Generator::new("(ab").unwrap_err();
    let Error::Parse(parse) = err else {
        panic!("expected a parse error");
    };
    assert_eq!(parse.kind, ParseErrorKind::UnclosedGroup);
    assert_eq!(parse.span.range(), 0..1);
}

#[test]
fn recursion_limit_comes_from_config() {
    let err = Generator::builder("(((a)))")
        .config(Config::new().recursion_limit(2))
        .build()
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Parse(ref e) if e.kind == ParseErrorKind::RecursionLimitExceeded
    ));
    assert!(Generator::new("(((a)))").is_ok());
}

#[test]
fn literal_form() {
    let generator = Generator::from_literal("/[a-c]{3}/i").unwrap();
    assert!(generator.flags().ignore_case);
    assert_eq!(generator.pattern().source, "[a-c]{3}");
    let re = matcher("[a-c]{3}", generator.flags());
    for sample in generator.samples(seeded(4)).take(200) {
        assert!(re.find(&sample.unwrap()).is_some());
    }

    assert!(matches!(
        Generator::from_literal("/a/q"),
        Err(Error::Parse(ref e)) if e.kind == ParseErrorKind::InvalidFlag('q')
    ));
}

#[test]
fn literal_form_takes_a_config() {
    let generator = GeneratorBuilder::from_literal("/x*/s")
        .config(Config::new().infinity_bound(3))
        .build()
        .unwrap();
    assert!(generator.flags().dot_all);
    assert_eq!(generator.config().infinity_bound, 3);
    let lengths: BTreeSet<usize> = generator
        .samples(seeded(8))
        .take(500)
        .map(|sample| sample.unwrap().len())
        .collect();
    assert_eq!(lengths, BTreeSet::from([0, 1, 2, 3]));

    let err = GeneratorBuilder::from_literal("/(((a)))/")
        .config(Config::new().recursion_limit(2))
        .build()
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Parse(ref e) if e.kind == ParseErrorKind::RecursionLimitExceeded
    ));
}

#[test]
fn introspection() {
    let config = Config::new().infinity_bound(4);
    let generator = Generator::builder(r"(a)(?:b)(c)\2")
        .flags("gi".parse().unwrap())
        .config(config.clone())
        .build()
        .unwrap();
    assert_eq!(generator.group_count(), 2);
    assert_eq!(generator.config(), &config);
    assert_eq!(generator.flags().to_string(), "gi");
    assert!(generator.is_fully_supported());

    let generator = Generator::try_from("x+").unwrap();
    insta::assert_snapshot!(format!("{generator:?}"), @r#"Generator { pattern: "x+", flags: Flags { has_indices: false, global: false, ignore_case: false, multiline: false, dot_all: false, unicode: false, unicode_sets: false, sticky: false }, config: Config { infinity_bound: 20, max_code_point: 100, unsupported: Empty, recursion_limit: 256 }, unsupported: [], .. }"#);
}

#[test]
fn generator_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Generator>();

    let generator = Generator::new(r"(\d{2})[a-f]+\1").unwrap();
    std::thread::scope(|scope| {
        for seed in 0..4 {
            let generator = &generator;
            scope.spawn(move || {
                let re = matcher(r"(\d{2})[a-f]+\1", Flags::default());
                for sample in generator.samples(seeded(seed)).take(200) {
                    assert!(re.find(&sample.unwrap()).is_some());
                }
            });
        }
    });
}
