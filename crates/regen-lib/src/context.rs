//! Per-call state of one generation pass.

use std::collections::HashMap;

use rand::RngCore;

/// State threaded through every producer during one `build` call.
///
/// Holds the text captured by each group so far and the random source of
/// this call. A context is never reused across calls.
pub struct BuildContext<'r> {
    groups: HashMap<u32, String>,
    rng: &'r mut dyn RngCore,
}

impl<'r> BuildContext<'r> {
    pub fn new(rng: &'r mut dyn RngCore) -> Self {
        Self {
            groups: HashMap::new(),
            rng,
        }
    }

    pub fn rng(&mut self) -> &mut dyn RngCore {
        &mut *self.rng
    }

    /// Text captured by group `index`, if it ran in this pass.
    pub fn group(&self, index: u32) -> Option<&str> {
        self.groups.get(&index).map(String::as_str)
    }

    pub fn set_group(&mut self, index: u32, text: String) {
        self.groups.insert(index, text);
    }

    /// Forgets the captures of `indices`.
    pub fn clear_groups(&mut self, indices: &[u32]) {
        for index in indices {
            self.groups.remove(index);
        }
    }
}
