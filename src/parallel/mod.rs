//! Bounded parallel execution
//!
//! This module only knows about CPU resources and execution strategy. Callers
//! decide whether a workload is worth parallelizing and hand over a worker
//! count; results always come back in input order.
//!
//! ```rust
//! use repoctx::parallel::ExecutionStrategy;
//!
//! let workers = ExecutionStrategy::calculate_optimal_workers(0, 75);
//! let strategy = ExecutionStrategy::auto(100, 16, workers);
//! let doubled = strategy.map_ordered((0..100).collect(), |n: u32| n * 2).unwrap();
//! assert_eq!(doubled[99], 198);
//! ```

use crate::select::SelectError;
use rayon::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStrategy {
    Sequential,
    Parallel { workers: usize },
}

impl ExecutionStrategy {
    /// Worker count from available cores, a percentage of them, and a cap
    ///
    /// `max_threads` of 0 means no cap. Always at least one worker.
    pub fn calculate_optimal_workers(max_threads: usize, thread_percentage: u8) -> usize {
        let cpu_cores = num_cpus::get();
        let percentage = thread_percentage.clamp(1, 100) as usize;
        let by_percentage = std::cmp::max(1, (cpu_cores * percentage) / 100);

        if max_threads > 0 {
            std::cmp::min(max_threads, by_percentage)
        } else {
            by_percentage
        }
    }

    /// Parallel once the workload reaches `min_items_for_parallel`
    ///
    /// A single worker is never worth a pool.
    pub fn auto(work_items_count: usize, min_items_for_parallel: usize, workers: usize) -> Self {
        if work_items_count >= min_items_for_parallel && workers > 1 {
            ExecutionStrategy::Parallel { workers }
        } else {
            ExecutionStrategy::Sequential
        }
    }

    pub fn workers(&self) -> usize {
        match self {
            ExecutionStrategy::Sequential => 1,
            ExecutionStrategy::Parallel { workers } => *workers,
        }
    }

    /// Apply `f` to every item, returning results in input order
    pub fn map_ordered<T, R, F>(&self, items: Vec<T>, f: F) -> Result<Vec<R>, SelectError>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> R + Send + Sync,
    {
        match self {
            ExecutionStrategy::Sequential => Ok(items.into_iter().map(f).collect()),
            ExecutionStrategy::Parallel { workers } => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(*workers)
                    .thread_name(|index| format!("repoctx-worker-{index}"))
                    .build()
                    .map_err(|e| SelectError::ThreadPool(e.to_string()))?;
                tracing::debug!("Classifying {} items on {} workers", items.len(), workers);
                Ok(pool.install(|| items.into_par_iter().map(f).collect()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_threshold() {
        assert_eq!(ExecutionStrategy::auto(10, 16, 8), ExecutionStrategy::Sequential);
        assert_eq!(ExecutionStrategy::auto(16, 16, 8), ExecutionStrategy::Parallel { workers: 8 });
        assert_eq!(ExecutionStrategy::auto(100, 16, 1), ExecutionStrategy::Sequential);
    }

    #[test]
    fn test_optimal_workers_respects_cap() {
        assert_eq!(ExecutionStrategy::calculate_optimal_workers(1, 100), 1);
        assert!(ExecutionStrategy::calculate_optimal_workers(0, 1) >= 1);
        assert!(ExecutionStrategy::calculate_optimal_workers(0, 100) <= num_cpus::get());
    }

    #[test]
    fn test_parallel_preserves_order() {
        let items: Vec<usize> = (0..500).collect();
        let strategy = ExecutionStrategy::Parallel { workers: 4 };
        let results = strategy.map_ordered(items, |n| n * 3).unwrap();
        assert_eq!(results, (0..500).map(|n| n * 3).collect::<Vec<_>>());
    }

    #[test]
    fn test_sequential_matches_parallel() {
        let input: Vec<String> = (0..64).map(|n| format!("file-{n}")).collect();
        let sequential = ExecutionStrategy::Sequential
            .map_ordered(input.clone(), |s| s.len())
            .unwrap();
        let parallel = ExecutionStrategy::Parallel { workers: 3 }
            .map_ordered(input, |s| s.len())
            .unwrap();
        assert_eq!(sequential, parallel);
    }
}
