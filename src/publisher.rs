//! Bridges snapshot producers to display consumers.
//!
//! Consumers either pull one snapshot with [`SnapshotPublisher::request`] or
//! register a callback with [`SnapshotPublisher::subscribe`]. Every produced
//! snapshot gets a sequence number so a consumer fed from both paths can keep
//! the newest one.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::thread::{self, ThreadId};
use std::time::Duration;

use crate::system::collector::MetricsSource;
use crate::system::example::example_snapshot;
use crate::system::snapshot::SystemSnapshot;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Origin {
    /// Produced by a live metrics source.
    Collector,
    /// The fixed example data.
    Example,
}

#[derive(Clone, Debug)]
pub struct SnapshotUpdate {
    pub sequence: u64,
    pub origin: Origin,
    pub snapshot: Arc<SystemSnapshot>,
}

type Callback = Box<dyn FnMut(&SnapshotUpdate) + Send>;

struct Subscriber {
    id: u64,
    active: AtomicBool,
    callback: Mutex<Callback>,
}

struct Inner {
    source: Mutex<Box<dyn MetricsSource>>,
    // Held for the whole of sequence assignment + delivery so subscribers
    // see updates in production order.
    delivery: Mutex<()>,
    delivering_on: Mutex<Option<ThreadId>>,
    next_sequence: AtomicU64,
    next_subscriber: AtomicU64,
    latest: Mutex<Option<SnapshotUpdate>>,
    subscribers: Mutex<Vec<Arc<Subscriber>>>,
}

#[derive(Clone)]
pub struct SnapshotPublisher {
    inner: Arc<Inner>,
}

fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SnapshotPublisher {
    pub fn new(source: impl MetricsSource + 'static) -> Self {
        SnapshotPublisher {
            inner: Arc::new(Inner {
                source: Mutex::new(Box::new(source)),
                delivery: Mutex::new(()),
                delivering_on: Mutex::new(None),
                next_sequence: AtomicU64::new(1),
                next_subscriber: AtomicU64::new(1),
                latest: Mutex::new(None),
                subscribers: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Pull one snapshot.
    ///
    /// Samples the source once. If that fails, falls back to the most recent
    /// update, or to the example snapshot when nothing was ever produced.
    /// The result is not broadcast to subscribers.
    pub fn request(&self) -> SnapshotUpdate {
        let sampled = lock(&self.inner.source).sample();
        match sampled {
            Ok(snapshot) => {
                let update = self.stamp(snapshot);
                self.remember(&update);
                update
            }
            Err(err) => {
                tracing::warn!(error = %err, "pull request could not sample, using fallback");
                if let Some(latest) = self.latest() {
                    return latest;
                }
                SnapshotUpdate {
                    sequence: 0,
                    origin: Origin::Example,
                    snapshot: Arc::new(example_snapshot()),
                }
            }
        }
    }

    /// Sample the source and deliver the result to every subscriber.
    /// Returns `None` when the source failed; the failure is logged.
    pub fn sample_and_publish(&self) -> Option<SnapshotUpdate> {
        let sampled = lock(&self.inner.source).sample();
        match sampled {
            Ok(snapshot) => Some(self.publish(snapshot)),
            Err(err) => {
                tracing::warn!(error = %err, "skipping push update");
                None
            }
        }
    }

    /// Deliver a snapshot produced elsewhere to every subscriber.
    pub fn publish(&self, snapshot: SystemSnapshot) -> SnapshotUpdate {
        let _delivery = lock(&self.inner.delivery);
        let update = self.stamp(snapshot);
        self.remember(&update);

        let subscribers: Vec<Arc<Subscriber>> = lock(&self.inner.subscribers).clone();
        *lock(&self.inner.delivering_on) = Some(thread::current().id());
        for subscriber in &subscribers {
            let mut callback = lock(&subscriber.callback);
            if subscriber.active.load(Ordering::Acquire) {
                (*callback)(&update);
            }
        }
        *lock(&self.inner.delivering_on) = None;

        tracing::trace!(
            sequence = update.sequence,
            subscribers = subscribers.len(),
            "published snapshot"
        );
        update
    }

    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: FnMut(&SnapshotUpdate) + Send + 'static,
    {
        let subscriber = Arc::new(Subscriber {
            id: self.inner.next_subscriber.fetch_add(1, Ordering::Relaxed),
            active: AtomicBool::new(true),
            callback: Mutex::new(Box::new(callback)),
        });
        lock(&self.inner.subscribers).push(Arc::clone(&subscriber));
        tracing::debug!(subscriber = subscriber.id, "subscribed");

        Subscription {
            publisher: Arc::downgrade(&self.inner),
            subscriber,
        }
    }

    pub fn latest(&self) -> Option<SnapshotUpdate> {
        lock(&self.inner.latest).clone()
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.inner.subscribers).len()
    }

    fn stamp(&self, snapshot: SystemSnapshot) -> SnapshotUpdate {
        SnapshotUpdate {
            sequence: self.inner.next_sequence.fetch_add(1, Ordering::AcqRel),
            origin: Origin::Collector,
            snapshot: Arc::new(snapshot),
        }
    }

    fn remember(&self, update: &SnapshotUpdate) {
        let mut latest = lock(&self.inner.latest);
        let newer = latest
            .as_ref()
            .is_none_or(|current| current.sequence < update.sequence);
        if newer {
            *latest = Some(update.clone());
        }
    }
}

/// Handle returned by [`SnapshotPublisher::subscribe`].
///
/// Dropping it unsubscribes.
pub struct Subscription {
    publisher: Weak<Inner>,
    subscriber: Arc<Subscriber>,
}

impl Subscription {
    /// Stop delivery. Safe to call repeatedly and from inside the callback.
    ///
    /// When this returns, no new callback invocation will start and any
    /// invocation running on another thread has finished.
    pub fn unsubscribe(&self) {
        let was_active = self.subscriber.active.swap(false, Ordering::AcqRel);

        if let Some(inner) = self.publisher.upgrade() {
            lock(&inner.subscribers).retain(|s| s.id != self.subscriber.id);

            let in_callback = *lock(&inner.delivering_on) == Some(thread::current().id());
            if !in_callback {
                // Wait out an invocation in flight on another thread.
                drop(lock(&self.subscriber.callback));
            }
        }

        if was_active {
            tracing::debug!(subscriber = self.subscriber.id, "unsubscribed");
        }
    }

    pub fn is_active(&self) -> bool {
        self.subscriber.active.load(Ordering::Acquire)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

/// Publish one sample per `interval` until the returned task is aborted.
pub fn spawn_sampler(
    publisher: SnapshotPublisher,
    interval: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            publisher.sample_and_publish();
        }
    })
}
