// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Disposable handle of a push subscription.

use crate::observer::Observer;
use core::cell::RefCell;
use parking_lot::ReentrantMutex;
use sluice_core::{CancellationToken, StreamItem};
use std::sync::Arc;

/// Shared slot holding the observer of one subscription.
///
/// The reentrant lock serializes callbacks with `unsubscribe()` across
/// threads while still letting an observer unsubscribe from inside its own
/// callback.
pub(crate) struct ObserverSlot<O> {
    observer: ReentrantMutex<RefCell<Option<O>>>,
}

impl<O> ObserverSlot<O> {
    pub(crate) fn new(observer: O) -> Self {
        Self {
            observer: ReentrantMutex::new(RefCell::new(Some(observer))),
        }
    }

    /// Delivers one stream event. `None` means the stream ended.
    ///
    /// Returns `false` once the subscription is over: cancelled, observer
    /// released, or a terminal event was just delivered.
    pub(crate) fn deliver<T>(&self, cancel: &CancellationToken, event: Option<StreamItem<T>>) -> bool
    where
        O: Observer<T>,
    {
        let guard = self.observer.lock();
        if cancel.is_cancelled() {
            return false;
        }
        let Ok(mut slot) = guard.try_borrow_mut() else {
            return false;
        };
        let Some(observer) = slot.as_mut() else {
            return false;
        };

        match event {
            Some(StreamItem::Value(value)) => {
                observer.on_next(value);
                true
            }
            Some(StreamItem::Error(error)) => {
                observer.on_error(error);
                slot.take();
                false
            }
            None => {
                observer.on_complete();
                slot.take();
                false
            }
        }
    }
}

/// Type-erased access to an [`ObserverSlot`].
pub(crate) trait Release: Send + Sync {
    /// Drops the observer unless it is currently running a callback on this thread.
    fn release(&self);
}

impl<O: Send> Release for ObserverSlot<O> {
    fn release(&self) {
        let guard = self.observer.lock();
        // Borrowed means we are inside one of the observer's own callbacks;
        // the driving task releases it once the callback returns.
        let released = guard.try_borrow_mut().map(|mut slot| slot.take());
        drop(guard);
        drop(released);
    }
}

/// Handle to a running push subscription.
///
/// Returned by [`subscribe_observer`](crate::SubscribeObserverExt::subscribe_observer).
/// Dropping the handle unsubscribes.
///
/// # Guarantees
///
/// - [`unsubscribe`](Self::unsubscribe) is idempotent
/// - once `unsubscribe` returns, the observer receives no further callbacks
/// - the subscribed stream is dropped by the driving task right after, which
///   releases everything it owns; [`closed`](Self::closed) resolves afterwards
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    cancel: CancellationToken,
    finished: CancellationToken,
    slot: Arc<dyn Release>,
}

impl Subscription {
    pub(crate) fn new(
        cancel: CancellationToken,
        finished: CancellationToken,
        slot: Arc<dyn Release>,
    ) -> Self {
        Self {
            cancel,
            finished,
            slot,
        }
    }

    /// Stops delivery and releases the observer.
    pub fn unsubscribe(&self) {
        if self.cancel.cancel() && !self.finished.is_cancelled() {
            debug!("sluice: subscription cancelled");
        }
        self.slot.release();
    }

    /// Returns `true` after a terminal event was delivered or after `unsubscribe`.
    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled() || self.finished.is_cancelled()
    }

    /// Resolves once the driving task is done and the stream has been dropped.
    pub async fn closed(&self) {
        self.finished.cancelled().await;
    }
}

impl core::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Subscription")
            .field("cancelled", &self.cancel.is_cancelled())
            .field("finished", &self.finished.is_cancelled())
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
