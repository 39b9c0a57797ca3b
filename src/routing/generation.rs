use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Monotonic counter bumped whenever a new search supersedes the previous one.
///
/// Clones share the same counter, so a spawned route search can hold a
/// [`SearchToken`] and notice when it has gone stale.
#[derive(Debug, Clone, Default)]
pub struct SearchGeneration {
    counter: Arc<AtomicU64>,
}

/// Snapshot of a [`SearchGeneration`] taken when a search starts.
#[derive(Debug, Clone)]
pub struct SearchToken {
    generation: u64,
    counter: Arc<AtomicU64>,
}

impl SearchGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> u64 {
        self.counter.load(Ordering::Acquire)
    }

    /// Invalidates every outstanding token and returns one for the new generation.
    pub fn advance(&self) -> SearchToken {
        let generation = self.counter.fetch_add(1, Ordering::AcqRel) + 1;
        SearchToken {
            generation,
            counter: Arc::clone(&self.counter),
        }
    }

    /// Token for the current generation, without invalidating anything.
    pub fn token(&self) -> SearchToken {
        SearchToken {
            generation: self.current(),
            counter: Arc::clone(&self.counter),
        }
    }
}

impl SearchToken {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self) -> bool {
        self.counter.load(Ordering::Acquire) == self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advancing_invalidates_older_tokens() {
        let generation = SearchGeneration::new();
        let first = generation.advance();
        assert!(first.is_current());

        let second = generation.advance();
        assert!(!first.is_current());
        assert!(second.is_current());
        assert!(second.generation() > first.generation());
    }

    #[test]
    fn token_does_not_advance() {
        let generation = SearchGeneration::new();
        let before = generation.current();
        let token = generation.token();
        assert_eq!(generation.current(), before);
        assert!(token.is_current());
    }

    #[test]
    fn clones_share_the_counter() {
        let generation = SearchGeneration::new();
        let token = generation.token();
        generation.clone().advance();
        assert!(!token.is_current());
    }
}
