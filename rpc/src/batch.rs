//! Fixed-size concurrent fan-out with a pause between batches
//!
//! The proxy has no admission control, so bulk work (imports, migrations) is issued
//! in batches: each batch runs concurrently, then the next one starts after a fixed
//! delay. Failures never stop the remaining batches.

use std::future::Future;
use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, warn};

use crate::constants::{DEFAULT_BATCH_DELAY_MS, DEFAULT_BATCH_SIZE};
use crate::error::Result;

/// Batch size and inter-batch delay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    /// Calls issued concurrently; 0 is treated as 1
    pub size:  usize,
    /// Pause after each batch except the last
    pub delay: Duration,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            size:  DEFAULT_BATCH_SIZE,
            delay: Duration::from_millis(DEFAULT_BATCH_DELAY_MS),
        }
    }
}

/// Run `f` over `items` in concurrent batches
///
/// Results come back in input order, one per item.
pub async fn run_batched<I, T, F, Fut>(items: I, options: BatchOptions, mut f: F) -> Vec<Result<T>>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let items: Vec<I::Item> = items.into_iter().collect();
    let size = options.size.max(1);
    let total_batches = items.len().div_ceil(size);

    let mut results = Vec::with_capacity(items.len());
    let mut pending = items.into_iter().peekable();
    let mut batch_number = 0;

    while pending.peek().is_some() {
        batch_number += 1;
        let batch: Vec<Fut> = pending.by_ref().take(size).map(&mut f).collect();
        debug!("Batch {batch_number}/{total_batches}: {} calls", batch.len());

        results.extend(join_all(batch).await);

        if pending.peek().is_some() && !options.delay.is_zero() {
            tokio::time::sleep(options.delay).await;
        }
    }

    let failures = results.iter().filter(|r| r.is_err()).count();
    if failures > 0 {
        warn!("{failures} of {} batched calls failed", results.len());
    }
    results
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Instant;

    use error_stack::Report;

    use super::*;
    use crate::error::Error;

    #[tokio::test]
    async fn test_results_keep_input_order_and_failures() {
        let options = BatchOptions {
            size:  2,
            delay: Duration::ZERO,
        };
        let results = run_batched(1..=5, options, |n| async move {
            // Later items finish first within a batch
            tokio::time::sleep(Duration::from_millis(10 * (5 - n))).await;
            if n == 3 {
                Err(Report::new(Error::Transport("boom".to_string())))
            } else {
                Ok(n * 10)
            }
        })
        .await;

        assert_eq!(results.len(), 5);
        assert_eq!(*results[0].as_ref().unwrap(), 10);
        assert!(results[2].is_err());
        assert_eq!(*results[4].as_ref().unwrap(), 50);
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded_by_batch_size() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let options = BatchOptions {
            size:  3,
            delay: Duration::ZERO,
        };

        let results = run_batched(0..10, options, |_| {
            let in_flight = Arc::clone(&in_flight);
            let peak = Arc::clone(&peak);
            async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                Ok(())
            }
        })
        .await;

        assert_eq!(results.len(), 10);
        assert_eq!(peak.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_delay_between_batches_only() {
        let options = BatchOptions {
            size:  2,
            delay: Duration::from_millis(30),
        };
        let started = Instant::now();
        let results = run_batched(0..6, options, |n| async move { Ok(n) }).await;

        // Three batches, two pauses
        assert!(started.elapsed() >= Duration::from_millis(60));
        assert_eq!(results.len(), 6);
    }

    #[tokio::test]
    async fn test_zero_size_and_empty_input() {
        let options = BatchOptions {
            size:  0,
            delay: Duration::ZERO,
        };
        let results = run_batched(vec!["a", "b"], options, |s| async move { Ok(s.len()) }).await;
        assert_eq!(results.len(), 2);

        let results =
            run_batched(Vec::<u8>::new(), BatchOptions::default(), |n| async move { Ok(n) }).await;
        assert!(results.is_empty());
    }
}
