//! Local sequence counters.
//!
//! The daemon context owns one sequencer with three independent,
//! monotonically non-decreasing counters, one per update category. The
//! dispatcher only reads them when publishing; advancing a counter is the
//! owner's job.

use lsr_types::UpdateCategory;
use std::sync::atomic::{AtomicU64, Ordering};

/// Source of the local per-category sequence numbers.
pub trait Sequencer: Send + Sync {
    /// Returns the current sequence number for `category`.
    fn seq_no(&self, category: UpdateCategory) -> u64;

    /// Advances the counter for `category` and returns the new value.
    fn increment(&self, category: UpdateCategory) -> u64;
}

/// In-memory sequencer.
#[derive(Debug, Default)]
pub struct InMemorySequencer {
    routing: AtomicU64,
    key: AtomicU64,
    identity: AtomicU64,
}

impl InMemorySequencer {
    pub fn new() -> Self {
        Self::default()
    }

    fn counter(&self, category: UpdateCategory) -> &AtomicU64 {
        match category {
            UpdateCategory::Routing => &self.routing,
            UpdateCategory::Key => &self.key,
            UpdateCategory::Identity => &self.identity,
        }
    }
}

impl Sequencer for InMemorySequencer {
    fn seq_no(&self, category: UpdateCategory) -> u64 {
        self.counter(category).load(Ordering::SeqCst)
    }

    fn increment(&self, category: UpdateCategory) -> u64 {
        self.counter(category).fetch_add(1, Ordering::SeqCst) + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_counters_independent() {
        let seq = InMemorySequencer::new();
        assert_eq!(seq.seq_no(UpdateCategory::Routing), 0);

        assert_eq!(seq.increment(UpdateCategory::Routing), 1);
        assert_eq!(seq.increment(UpdateCategory::Routing), 2);

        assert_eq!(seq.seq_no(UpdateCategory::Key), 0);
        assert_eq!(seq.seq_no(UpdateCategory::Identity), 0);

        assert_eq!(seq.increment(UpdateCategory::Identity), 1);
        assert_eq!(seq.seq_no(UpdateCategory::Routing), 2);
    }
}
