//! Counter of enqueued targets whose pipeline has not finished yet

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Debug, Default)]
pub struct PendingWork {
    count: AtomicUsize,
    idle: Notify,
}

impl PendingWork {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register one unit of work; it is released when the guard drops.
    pub fn add(self: &Arc<Self>) -> PendingGuard {
        self.count.fetch_add(1, Ordering::AcqRel);
        PendingGuard {
            pending: Arc::clone(self),
        }
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }

    fn done(&self) {
        if self.count.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.idle.notify_waiters();
        }
    }

    /// Resolve once every registered unit has been released.
    pub async fn wait_idle(&self) {
        loop {
            // registered before the check so a concurrent `done` is not missed
            let notified = self.idle.notified();
            if self.count() == 0 {
                return;
            }
            notified.await;
        }
    }
}

#[derive(Debug)]
#[must_use = "dropping the guard immediately marks the work as done"]
pub struct PendingGuard {
    pending: Arc<PendingWork>,
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.pending.done();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_idle_when_empty() {
        let pending = PendingWork::new();
        pending.wait_idle().await;
        assert_eq!(pending.count(), 0);
    }

    #[tokio::test]
    async fn test_waits_for_all_guards() {
        let pending = PendingWork::new();
        let guards: Vec<_> = (0..3).map(|_| pending.add()).collect();
        assert_eq!(pending.count(), 3);

        let waiter = tokio::spawn({
            let pending = Arc::clone(&pending);
            async move { pending.wait_idle().await }
        });

        for guard in guards {
            tokio::time::sleep(Duration::from_millis(5)).await;
            assert!(!waiter.is_finished());
            drop(guard);
        }

        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("wait_idle should resolve")
            .unwrap();
        assert_eq!(pending.count(), 0);
    }
}
