//! Greedy token-budget allocation
//!
//! Candidates are offered in priority order. Each one that fits under the
//! remaining budget is taken; one that does not is recorded as excluded and
//! the scan moves on, so a later, smaller file can still fit.

use crate::select::error::SelectError;
use globset::{Glob, GlobSet, GlobSetBuilder};

/// Outcome of one allocation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation<T> {
    pub included: Vec<(T, usize)>,
    pub excluded: Vec<(T, usize)>,
    /// Sum of included token costs
    pub token_count: usize,
    /// Sum of every offered token cost, budget or not
    pub total_tokens: usize,
    /// Budget in effect, 0 when unlimited
    pub max_tokens: usize,
}

/// Running state of an allocation, fed one candidate at a time
#[derive(Debug)]
pub struct Budget<T> {
    max_tokens: usize,
    running_total: usize,
    total_tokens: usize,
    included: Vec<(T, usize)>,
    excluded: Vec<(T, usize)>,
}

impl<T> Budget<T> {
    pub fn new(max_tokens: usize) -> Self {
        Self {
            max_tokens,
            running_total: 0,
            total_tokens: 0,
            included: Vec::new(),
            excluded: Vec::new(),
        }
    }

    pub fn is_unlimited(&self) -> bool {
        self.max_tokens == 0
    }

    pub fn running_total(&self) -> usize {
        self.running_total
    }

    /// Take `item` if it fits, returning whether it was included
    pub fn offer(&mut self, item: T, tokens: usize) -> bool {
        self.total_tokens = self.total_tokens.saturating_add(tokens);

        let fits = self.is_unlimited()
            || self
                .running_total
                .checked_add(tokens)
                .is_some_and(|total| total <= self.max_tokens);
        if fits {
            self.running_total += tokens;
            self.included.push((item, tokens));
        } else {
            self.excluded.push((item, tokens));
        }
        fits
    }

    pub fn finish(self) -> Allocation<T> {
        Allocation {
            included: self.included,
            excluded: self.excluded,
            token_count: self.running_total,
            total_tokens: self.total_tokens,
            max_tokens: self.max_tokens,
        }
    }
}

/// Single sequential greedy pass over prioritized candidates
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenBudgetAllocator {
    max_tokens: usize,
}

impl TokenBudgetAllocator {
    /// `max_tokens` of 0 means unlimited
    pub fn new(max_tokens: usize) -> Self {
        Self { max_tokens }
    }

    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    pub fn allocate<T, I>(&self, candidates: I) -> Allocation<T>
    where
        I: IntoIterator<Item = (T, usize)>,
    {
        let mut budget = Budget::new(self.max_tokens);
        for (item, tokens) in candidates {
            budget.offer(item, tokens);
        }
        budget.finish()
    }
}

/// Recognizes entry-point files by basename glob
#[derive(Debug, Clone)]
pub struct EntryPointMatcher {
    globs: GlobSet,
}

impl EntryPointMatcher {
    pub fn new<I, S>(patterns: I) -> Result<Self, SelectError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let glob = Glob::new(pattern).map_err(|e| SelectError::invalid_pattern(pattern, e))?;
            builder.add(glob);
        }
        let globs = builder
            .build()
            .map_err(|e| SelectError::invalid_pattern("entry point patterns", e))?;
        Ok(Self { globs })
    }

    pub fn is_entry_point(&self, file_name: &str) -> bool {
        self.globs.is_match(file_name)
    }

    /// Move entry points to the front, keeping relative order on both sides
    pub fn prioritize<T>(&self, items: Vec<T>, file_name: impl Fn(&T) -> &str) -> Vec<T> {
        let (mut front, back): (Vec<T>, Vec<T>) = items
            .into_iter()
            .partition(|item| self.is_entry_point(file_name(item)));
        front.extend(back);
        front
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::select::candidate::basename;

    #[test]
    fn test_greedy_continues_past_misses() {
        let allocation = TokenBudgetAllocator::new(130).allocate([("a", 80), ("b", 50), ("c", 40)]);
        let included: Vec<&str> = allocation.included.iter().map(|(name, _)| *name).collect();
        assert_eq!(included, vec!["a", "b"]);
        assert_eq!(allocation.excluded, vec![("c", 40)]);
        assert_eq!(allocation.token_count, 130);
        assert_eq!(allocation.total_tokens, 170);
    }

    #[test]
    fn test_smaller_file_fits_after_skip() {
        let allocation = TokenBudgetAllocator::new(100).allocate([("a", 60), ("b", 50), ("c", 40)]);
        let included: Vec<&str> = allocation.included.iter().map(|(name, _)| *name).collect();
        assert_eq!(included, vec!["a", "c"]);
        assert_eq!(allocation.excluded, vec![("b", 50)]);
        assert_eq!(allocation.token_count, 100);
    }

    #[test]
    fn test_zero_budget_is_unlimited() {
        let allocation = TokenBudgetAllocator::new(0).allocate([("a", 1_000_000), ("b", 5)]);
        assert_eq!(allocation.included.len(), 2);
        assert!(allocation.excluded.is_empty());
        assert_eq!(allocation.token_count, allocation.total_tokens);
    }

    #[test]
    fn test_everything_over_budget() {
        let allocation = TokenBudgetAllocator::new(10).allocate([("a", 20), ("b", 11)]);
        assert!(allocation.included.is_empty());
        assert_eq!(allocation.excluded.len(), 2);
        assert_eq!(allocation.token_count, 0);
        assert_eq!(allocation.total_tokens, 31);
    }

    #[test]
    fn test_budget_offer() {
        let mut budget = Budget::new(10);
        assert!(budget.offer("a", 10));
        assert!(!budget.offer("b", 1));
        assert!(budget.offer("c", 0));
        assert_eq!(budget.running_total(), 10);
    }

    #[test]
    fn test_entry_points_move_to_front_stably() {
        let matcher = EntryPointMatcher::new(["main.*", "README*"]).unwrap();
        let files = vec!["src/a.rs", "src/main.rs", "docs/guide.md", "README.md"];
        let ordered = matcher.prioritize(files, |path| basename(path));
        assert_eq!(ordered, vec!["src/main.rs", "README.md", "src/a.rs", "docs/guide.md"]);
    }

    #[test]
    fn test_invalid_entry_point_glob() {
        assert!(matches!(
            EntryPointMatcher::new(["main.[rs"]),
            Err(SelectError::InvalidPattern { .. })
        ));
    }
}
