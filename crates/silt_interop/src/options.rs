//! Configuration for the marshaling layer.

use silt_abi::TextVariant;

use crate::strings::StringCache;

/// Options for a marshaling context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteropOptions {
    /// Text encoding used for every engine call. Defaults to the
    /// process-wide variant selected by platform capability.
    pub text: TextVariant,
    /// Maximum number of strings retained by the reuse cache.
    pub cache_capacity: usize,
}

impl Default for InteropOptions {
    fn default() -> Self {
        InteropOptions {
            text: TextVariant::active(),
            cache_capacity: 1024,
        }
    }
}

impl InteropOptions {
    /// Builds a string cache sized per these options.
    #[must_use]
    pub fn string_cache(&self) -> StringCache {
        StringCache::with_capacity(self.cache_capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_the_process_variant() {
        let options = InteropOptions::default();
        assert_eq!(options.text, TextVariant::active());
        assert_eq!(options.cache_capacity, 1024);
    }
}
