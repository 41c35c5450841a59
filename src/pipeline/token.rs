//! Unique-token allocation for one conversion run.
//!
//! A token is a 10-digit zero-padded decimal string. It carries no meaning;
//! it only has to (a) be unlikely to occur in real document text, (b) survive
//! a generic markup converter verbatim, and (c) be findable by exact-substring
//! replacement. Plain digits satisfy all three — every markup converter
//! leaves a bare number alone.
//!
//! The allocator is owned by a single extraction run. There is no process-wide
//! RNG state: collision checking happens against the explicit set of tokens
//! issued by *this* allocator, across all five categories, so uniqueness holds
//! for the whole run regardless of category.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use tracing::{debug, trace};

/// Size of the token space: tokens are drawn from `0..10^10` and formatted
/// zero-padded to 10 digits.
const TOKEN_SPACE: u64 = 10_000_000_000;

/// Per-run token allocator.
///
/// Collisions are resolved internally by re-drawing; they are never surfaced
/// to callers. With a 10^10 space and documents carrying at most a few
/// thousand spans, a collision is rare — but the re-draw loop is exercised by
/// tests regardless.
#[derive(Debug)]
pub struct TokenAllocator {
    rng: StdRng,
    issued: HashSet<String>,
}

impl TokenAllocator {
    /// Entropy-seeded allocator for production runs.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            issued: HashSet::new(),
        }
    }

    /// Deterministic allocator: the same seed yields the same token sequence.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            issued: HashSet::new(),
        }
    }

    /// Draw the next unique token, re-drawing on collision with any token
    /// already issued in this run.
    pub fn next_token(&mut self) -> String {
        loop {
            let candidate = format!("{:010}", self.rng.gen_range(0..TOKEN_SPACE));
            if self.issued.insert(candidate.clone()) {
                trace!(token = %candidate, "issued token");
                return candidate;
            }
            debug!(token = %candidate, "token collision, re-drawing");
        }
    }

    /// Mark a token as already taken without issuing it.
    ///
    /// Returns `false` if it was already reserved. Used by tests to force the
    /// collision path; kept crate-public so integration layers can reserve
    /// known-hostile values if a document is found to contain one.
    pub fn reserve(&mut self, token: impl Into<String>) -> bool {
        self.issued.insert(token.into())
    }

    /// Number of tokens issued or reserved so far.
    pub fn issued_count(&self) -> usize {
        self.issued.len()
    }
}

impl Default for TokenAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_ten_decimal_digits() {
        let mut alloc = TokenAllocator::with_seed(7);
        for _ in 0..100 {
            let t = alloc.next_token();
            assert_eq!(t.len(), 10, "token not fixed-width: {t}");
            assert!(t.bytes().all(|b| b.is_ascii_digit()), "non-digit in {t}");
        }
    }

    #[test]
    fn tokens_are_pairwise_distinct() {
        let mut alloc = TokenAllocator::with_seed(7);
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            assert!(seen.insert(alloc.next_token()), "duplicate token issued");
        }
        assert_eq!(alloc.issued_count(), 10_000);
    }

    #[test]
    fn seeded_allocators_repeat_their_sequence() {
        let a: Vec<String> = {
            let mut alloc = TokenAllocator::with_seed(99);
            (0..5).map(|_| alloc.next_token()).collect()
        };
        let b: Vec<String> = {
            let mut alloc = TokenAllocator::with_seed(99);
            (0..5).map(|_| alloc.next_token()).collect()
        };
        assert_eq!(a, b);
    }

    #[test]
    fn collision_triggers_redraw() {
        // Learn what a seeded allocator draws first, then reserve exactly
        // that value in a fresh allocator with the same seed. The first draw
        // now collides and the allocator must return a different token.
        let first = TokenAllocator::with_seed(1234).next_token();

        let mut alloc = TokenAllocator::with_seed(1234);
        assert!(alloc.reserve(first.clone()));
        let redrawn = alloc.next_token();
        assert_ne!(redrawn, first, "collision was not re-drawn");
        assert_eq!(redrawn.len(), 10);
    }

    #[test]
    fn reserve_reports_duplicates() {
        let mut alloc = TokenAllocator::with_seed(0);
        assert!(alloc.reserve("0000000001"));
        assert!(!alloc.reserve("0000000001"));
    }
}
