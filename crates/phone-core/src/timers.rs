//! Cancellable scheduled tasks
//!
//! Every timer the controller owns is a [`ScheduledTask`]. Dropping or
//! cancelling the handle aborts the underlying tokio task, so a timer can never
//! outlive the state it was scheduled against.

use std::future::Future;
use std::time::{Duration, Instant};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::trace;

/// Handle to a spawned timer task
#[derive(Debug)]
pub struct ScheduledTask {
    name: &'static str,
    handle: JoinHandle<()>,
    scheduled_at: Instant,
}

impl ScheduledTask {
    /// Run `fut` once after `delay`
    pub fn once<F>(runtime: &Handle, name: &'static str, delay: Duration, fut: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            fut.await;
        });
        trace!("Scheduled one-shot timer {} in {:?}", name, delay);
        Self {
            name,
            handle,
            scheduled_at: Instant::now(),
        }
    }

    /// Call `tick` every `period`, starting one period from now, until it
    /// returns `false`. The tick counter passed in starts at 1.
    pub fn repeating<T>(runtime: &Handle, name: &'static str, period: Duration, mut tick: T) -> Self
    where
        T: FnMut(u64) -> bool + Send + 'static,
    {
        let handle = runtime.spawn(async move {
            let start = tokio::time::Instant::now() + period;
            let mut interval = tokio::time::interval_at(start, period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            let mut count = 0u64;
            loop {
                interval.tick().await;
                count += 1;
                if !tick(count) {
                    break;
                }
            }
        });
        trace!("Scheduled repeating timer {} every {:?}", name, period);
        Self {
            name,
            handle,
            scheduled_at: Instant::now(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn cancel(&self) {
        if !self.handle.is_finished() {
            trace!("Cancelling timer {} after {:?}", self.name, self.scheduled_at.elapsed());
        }
        self.handle.abort();
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_once_fires_after_delay() {
        let fired = Arc::new(AtomicU64::new(0));
        let f = fired.clone();
        let task = ScheduledTask::once(&Handle::current(), "t", Duration::from_secs(3), async move {
            f.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(2999)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(task.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_firing() {
        let fired = Arc::new(AtomicU64::new(0));
        let f = fired.clone();
        let task = ScheduledTask::once(&Handle::current(), "t", Duration::from_secs(1), async move {
            f.fetch_add(1, Ordering::SeqCst);
        });
        task.cancel();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_prevents_firing() {
        let fired = Arc::new(AtomicU64::new(0));
        let f = fired.clone();
        let task = ScheduledTask::once(&Handle::current(), "t", Duration::from_secs(1), async move {
            f.fetch_add(1, Ordering::SeqCst);
        });
        drop(task);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeating_counts_ticks_until_stopped() {
        let last = Arc::new(AtomicU64::new(0));
        let l = last.clone();
        let task = ScheduledTask::repeating(&Handle::current(), "tick", Duration::from_secs(1), move |n| {
            l.store(n, Ordering::SeqCst);
            n < 3
        });

        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(last.load(Ordering::SeqCst), 2);
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(last.load(Ordering::SeqCst), 3);
        assert!(task.is_finished());
    }
}
