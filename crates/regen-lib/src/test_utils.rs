use rand::SeedableRng;
use rand::rngs::StdRng;
use regen_syntax::Flags;

use crate::Generator;

pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Backtracking matcher for `pattern` anchored at both ends, independent of
/// the generation engine.
pub fn matcher(pattern: &str, flags: Flags) -> regress::Regex {
    let letters: String = flags
        .to_string()
        .chars()
        .filter(|c| matches!(c, 'i' | 'm' | 's'))
        .collect();
    regress::Regex::with_flags(&format!("^(?:{pattern})$"), letters.as_str())
        .unwrap_or_else(|err| panic!("matcher rejected {pattern:?}: {err}"))
}

/// Builds `trials` strings from `pattern` and asserts that each one matches.
pub fn assert_generates_matches(pattern: &str, flags: Flags, trials: usize) -> Vec<String> {
    let generator = Generator::with_flags(pattern, flags).unwrap();
    assert!(generator.is_fully_supported(), "{pattern:?} is not fully supported");
    let re = matcher(pattern, flags);
    let mut rng = seeded(0x5eed);
    (0..trials)
        .map(|_| {
            let sample = generator.build_with(&mut rng).unwrap();
            assert!(
                re.find(&sample).is_some(),
                "{sample:?} does not match /{pattern}/{flags}"
            );
            sample
        })
        .collect()
}
