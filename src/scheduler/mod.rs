//! Periodic scheduling for the activities that drive the engine

use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

/// Owns a set of periodic background tasks.
///
/// Each task ticks on its own interval, independent of the others; the update
/// and redraw cadences are deliberately not synchronized. All tasks are
/// cancelled together by [`shutdown`](Scheduler::shutdown), and dropping the
/// scheduler cancels whatever is still running, so the owner releases its
/// timing resources on every exit path.
pub struct Scheduler {
    handles: Vec<JoinHandle<()>>,
}

impl Scheduler {
    /// Create an empty scheduler
    pub fn new() -> Self {
        Scheduler {
            handles: Vec::new(),
        }
    }

    /// Spawn a task that runs `task` once per `period`.
    ///
    /// Must be called from within a tokio runtime. `task` has to finish well
    /// inside the period; there is no overrun handling beyond delaying the
    /// next tick.
    pub fn spawn_periodic<F>(&mut self, period: Duration, mut task: F)
    where
        F: FnMut() + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                task();
            }
        });
        self.handles.push(handle);
    }

    /// Number of tasks currently scheduled
    pub fn task_count(&self) -> usize {
        self.handles.len()
    }

    /// Cancel every scheduled task
    pub fn shutdown(&mut self) {
        for handle in self.handles.drain(..) {
            handle.abort();
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn periodic_task_runs_repeatedly() {
        let counter = Arc::new(AtomicUsize::new(0));
        let task_counter = Arc::clone(&counter);

        let mut scheduler = Scheduler::new();
        scheduler.spawn_periodic(Duration::from_millis(5), move || {
            task_counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(scheduler.task_count(), 1);

        time::sleep(Duration::from_millis(100)).await;
        assert!(counter.load(Ordering::SeqCst) >= 2);
    }

    #[tokio::test]
    async fn shutdown_stops_all_tasks() {
        let counter = Arc::new(AtomicUsize::new(0));

        let mut scheduler = Scheduler::new();
        for _ in 0..2 {
            let task_counter = Arc::clone(&counter);
            scheduler.spawn_periodic(Duration::from_millis(5), move || {
                task_counter.fetch_add(1, Ordering::SeqCst);
            });
        }

        time::sleep(Duration::from_millis(50)).await;
        scheduler.shutdown();
        assert_eq!(scheduler.task_count(), 0);

        // Let any in-flight tick drain, then verify the count stays put.
        time::sleep(Duration::from_millis(20)).await;
        let settled = counter.load(Ordering::SeqCst);
        time::sleep(Duration::from_millis(50)).await;
        assert_eq!(counter.load(Ordering::SeqCst), settled);
    }

    #[tokio::test]
    async fn drop_cancels_outstanding_tasks() {
        let counter = Arc::new(AtomicUsize::new(0));
        {
            let task_counter = Arc::clone(&counter);
            let mut scheduler = Scheduler::new();
            scheduler.spawn_periodic(Duration::from_millis(5), move || {
                task_counter.fetch_add(1, Ordering::SeqCst);
            });
            time::sleep(Duration::from_millis(30)).await;
        }

        time::sleep(Duration::from_millis(20)).await;
        let settled = counter.load(Ordering::SeqCst);
        time::sleep(Duration::from_millis(50)).await;
        assert_eq!(counter.load(Ordering::SeqCst), settled);
    }
}
