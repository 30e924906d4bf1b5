//! Token counting
//!
//! Token costs come from outside the selection logic. Anything that maps text
//! to a count can serve, including a closure; the bundled counter is a
//! characters-per-token estimate.

/// Maps text to a model token count
pub trait TokenCounter: Send + Sync {
    fn count(&self, text: &str) -> usize;
}

impl<F> TokenCounter for F
where
    F: Fn(&str) -> usize + Send + Sync,
{
    fn count(&self, text: &str) -> usize {
        self(text)
    }
}

pub const DEFAULT_CHARS_PER_TOKEN: usize = 4;

/// Estimates tokens as characters divided by a fixed ratio, rounded up
#[derive(Debug, Clone, Copy)]
pub struct ApproximateTokenCounter {
    chars_per_token: usize,
}

impl Default for ApproximateTokenCounter {
    fn default() -> Self {
        Self::new(DEFAULT_CHARS_PER_TOKEN)
    }
}

impl ApproximateTokenCounter {
    pub fn new(chars_per_token: usize) -> Self {
        Self {
            chars_per_token: chars_per_token.max(1),
        }
    }
}

impl TokenCounter for ApproximateTokenCounter {
    fn count(&self, text: &str) -> usize {
        text.chars().count().div_ceil(self.chars_per_token)
    }
}
