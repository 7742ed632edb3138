//! String decode/reuse cache.
//!
//! Decoding engine character buffers allocates a fresh `String` each
//! time; metadata calls decode the same table and column names over and
//! over. The cache opportunistically hands back a previously produced
//! equal instance instead, purely as an allocation optimization.
//!
//! Reuse is best-effort and never required for correctness. The cache is
//! an explicit, instance-local object; it never registers strings in any
//! process-global intern table, and nothing guarantees an unrelated
//! caller sees the same instance.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::RwLock;

use silt_abi::TextVariant;

/// Bounded cache of decoded strings.
#[derive(Debug)]
pub struct StringCache {
    capacity: usize,
    entries: RwLock<HashSet<Arc<str>>>,
}

impl Default for StringCache {
    fn default() -> Self {
        Self::with_capacity(1024)
    }
}

impl StringCache {
    /// Creates a cache with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cache retaining at most `capacity` strings.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        StringCache {
            capacity,
            entries: RwLock::new(HashSet::new()),
        }
    }

    /// Decodes exactly the requested byte range of an engine character
    /// buffer.
    ///
    /// A null/empty buffer with zero length decodes to `""`, never to an
    /// absent value.
    #[must_use]
    pub fn decode(
        &self,
        buffer: &[u8],
        offset: usize,
        length: usize,
        variant: TextVariant,
    ) -> String {
        if buffer.is_empty() || length == 0 {
            return String::new();
        }
        silt_abi::decode(&buffer[offset..offset + length], variant)
    }

    /// Decodes like [`decode`](Self::decode), then runs the result
    /// through [`try_reuse`](Self::try_reuse).
    #[must_use]
    pub fn decode_shared(
        &self,
        buffer: &[u8],
        offset: usize,
        length: usize,
        variant: TextVariant,
    ) -> Arc<str> {
        self.try_reuse(&self.decode(buffer, offset, length, variant))
    }

    /// Returns a previously produced instance equal to `s` when one is
    /// cached; otherwise produces (and best-effort retains) a new one.
    #[must_use]
    pub fn try_reuse(&self, s: &str) -> Arc<str> {
        if let Some(existing) = self.entries.read().get(s) {
            return Arc::clone(existing);
        }
        let fresh: Arc<str> = Arc::from(s);
        let mut entries = self.entries.write();
        if let Some(existing) = entries.get(s) {
            return Arc::clone(existing);
        }
        if entries.len() < self.capacity {
            entries.insert(Arc::clone(&fresh));
        }
        fresh
    }

    /// Number of retained strings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// True when nothing is retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
