use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

/// Counts queued events and in-flight effect jobs of one loop.
///
/// Every queued event and every submitted job holds an [`ActivityGuard`];
/// the loop is settled when the count drops to zero.
#[derive(Clone, Default)]
pub(crate) struct Activity {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    pending: AtomicUsize,
    idle: Notify,
}

impl Activity {
    pub(crate) fn enter(&self) -> ActivityGuard {
        self.inner.pending.fetch_add(1, Ordering::SeqCst);
        ActivityGuard {
            activity: self.clone(),
        }
    }

    pub(crate) fn pending(&self) -> usize {
        self.inner.pending.load(Ordering::SeqCst)
    }

    pub(crate) async fn settled(&self) {
        loop {
            let notified = self.inner.idle.notified();
            if self.pending() == 0 {
                return;
            }
            notified.await;
        }
    }
}

pub(crate) struct ActivityGuard {
    activity: Activity,
}

impl Drop for ActivityGuard {
    fn drop(&mut self) {
        if self.activity.inner.pending.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.activity.inner.idle.notify_waiters();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn settles_when_last_guard_drops() {
        let activity = Activity::default();
        let a = activity.enter();
        let b = activity.enter();
        assert_eq!(activity.pending(), 2);

        let waiter = tokio::spawn({
            let activity = activity.clone();
            async move { activity.settled().await }
        });
        drop(a);
        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());
        drop(b);
        waiter.await.expect("waiter");
        assert_eq!(activity.pending(), 0);
    }
}
