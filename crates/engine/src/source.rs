//! External event sources merged into a running loop.

use std::sync::Arc;

use futures::stream::{self, BoxStream, StreamExt};
use tokio::sync::{mpsc, Mutex};
use tracing::debug;

/// A stream of events that is merged into a loop's input queue.
///
/// `subscribe` is called once per loop start; the returned stream is dropped
/// when the loop stops.
pub trait EventSource<E>: Send + Sync + 'static {
    fn subscribe(&self) -> BoxStream<'static, E>;
}

/// Buffers injected events until a loop subscribes.
///
/// Events injected while no loop is running are kept and delivered on the
/// next start. A restarted loop resumes where the previous one stopped.
pub struct Deferred<E> {
    tx: mpsc::UnboundedSender<E>,
    rx: Arc<Mutex<mpsc::UnboundedReceiver<E>>>,
}

impl<E: Send + 'static> Default for Deferred<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Send + 'static> Deferred<E> {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx: Arc::new(Mutex::new(rx)),
        }
    }

    pub fn injector(&self) -> Injector<E> {
        Injector {
            tx: self.tx.clone(),
        }
    }

    pub fn inject(&self, event: E) {
        self.injector().send(event)
    }
}

impl<E: Send + 'static> EventSource<E> for Deferred<E> {
    fn subscribe(&self) -> BoxStream<'static, E> {
        stream::unfold(self.rx.clone(), |rx| async move {
            let next = rx.lock().await.recv().await;
            next.map(|event| (event, rx))
        })
        .boxed()
    }
}

/// Cloneable handle that pushes events into a [`Deferred`] source.
pub struct Injector<E> {
    tx: mpsc::UnboundedSender<E>,
}

impl<E> Clone for Injector<E> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<E> Injector<E> {
    pub fn send(&self, event: E) {
        if self.tx.send(event).is_err() {
            debug!("deferred event source dropped; event discarded");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn buffers_until_subscribed() {
        let source = Deferred::new();
        source.inject(1u32);
        source.injector().send(2);

        let mut events = source.subscribe();
        assert_eq!(events.next().await, Some(1));
        assert_eq!(events.next().await, Some(2));
    }

    #[tokio::test]
    async fn resubscribe_continues_after_drop() {
        let source = Deferred::new();
        source.inject("a");
        source.inject("b");
        {
            let mut first = source.subscribe();
            assert_eq!(first.next().await, Some("a"));
        }
        let mut second = source.subscribe();
        assert_eq!(second.next().await, Some("b"));
    }
}
