//! Tunable limits of the generation engine.

use serde::{Deserialize, Serialize};

/// Upper bound substituted for `*`, `+` and `{n,}`.
pub const DEFAULT_INFINITY_BOUND: u32 = 20;

/// Largest code point a complemented set may produce.
pub const DEFAULT_MAX_CODE_POINT: u32 = 100;

/// What an unsupported construct (lookaround, `\b`, named groups, `\p{..}`)
/// generates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnsupportedPolicy {
    /// Nothing.
    #[default]
    Empty,
    /// The bare kind name, e.g. `Lookahead`. Makes degraded spots visible.
    KindName,
}

/// Engine configuration.
///
/// Missing fields take their defaults when deserializing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub infinity_bound: u32,
    pub max_code_point: u32,
    pub unsupported: UnsupportedPolicy,
    /// Deepest group nesting the parser accepts.
    pub recursion_limit: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            infinity_bound: DEFAULT_INFINITY_BOUND,
            max_code_point: DEFAULT_MAX_CODE_POINT,
            unsupported: UnsupportedPolicy::default(),
            recursion_limit: regen_syntax::DEFAULT_RECURSION_LIMIT,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn infinity_bound(mut self, bound: u32) -> Self {
        self.infinity_bound = bound;
        self
    }

    /// Clamped to `char::MAX`.
    pub fn max_code_point(mut self, max: u32) -> Self {
        self.max_code_point = max.min(u32::from(char::MAX));
        self
    }

    pub fn unsupported(mut self, policy: UnsupportedPolicy) -> Self {
        self.unsupported = policy;
        self
    }

    pub fn recursion_limit(mut self, limit: u32) -> Self {
        self.recursion_limit = limit;
        self
    }

    /// `max_code_point`, clamped for configs that bypassed the setter.
    pub(crate) fn code_point_ceiling(&self) -> u32 {
        self.max_code_point.min(u32::from(char::MAX))
    }
}
