// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::observer::Observer;
use crate::subscription::{ObserverSlot, Release, Subscription};
use futures::{Stream, StreamExt};
use sluice_core::{CancellationToken, StreamItem};
use std::sync::Arc;

/// Extension trait delivering a stream's items to an [`Observer`].
pub trait SubscribeObserverExt<T>: Stream<Item = StreamItem<T>> + Sized {
    /// Spawns a task on the tokio runtime that polls the stream and feeds the observer.
    ///
    /// # Behavior
    ///
    /// - `StreamItem::Value` → [`Observer::on_next`]
    /// - `StreamItem::Error` → [`Observer::on_error`], then the subscription ends
    /// - end of stream → [`Observer::on_complete`], then the subscription ends
    /// - at most one terminal callback is ever delivered
    ///
    /// The stream is dropped when the subscription ends, including after
    /// [`Subscription::unsubscribe`].
    ///
    /// # Panics
    ///
    /// Panics when called outside of a tokio runtime.
    ///
    /// # Examples
    ///
    /// ```
    /// use sluice_core::{SluiceError, StreamItem};
    /// use sluice_exec::{observer_fn, SubscribeObserverExt};
    /// use futures::stream;
    /// use std::sync::{Arc, Mutex};
    ///
    /// # #[tokio::main]
    /// # async fn main() {
    /// let seen = Arc::new(Mutex::new(Vec::new()));
    /// let sink = Arc::clone(&seen);
    ///
    /// let subscription = stream::iter(vec![StreamItem::Value(1), StreamItem::Value(2)])
    ///     .subscribe_observer(observer_fn(
    ///         move |value: i32| sink.lock().unwrap().push(value),
    ///         |_error: SluiceError| {},
    ///         || {},
    ///     ));
    ///
    /// subscription.closed().await;
    /// assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    /// # }
    /// ```
    fn subscribe_observer<O>(self, observer: O) -> Subscription
    where
        O: Observer<T> + Send + 'static;
}

impl<S, T> SubscribeObserverExt<T> for S
where
    S: Stream<Item = StreamItem<T>> + Send + 'static,
    T: Send + 'static,
{
    fn subscribe_observer<O>(self, observer: O) -> Subscription
    where
        O: Observer<T> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let finished = CancellationToken::new();
        let slot = Arc::new(ObserverSlot::new(observer));

        tokio::spawn(drive(
            self,
            Arc::clone(&slot),
            cancel.clone(),
            finished.clone(),
        ));

        Subscription::new(cancel, finished, slot)
    }
}

async fn drive<S, T, O>(
    stream: S,
    slot: Arc<ObserverSlot<O>>,
    cancel: CancellationToken,
    finished: CancellationToken,
) where
    S: Stream<Item = StreamItem<T>>,
    O: Observer<T> + Send,
{
    let mut stream = Box::pin(stream);

    loop {
        let event = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            event = stream.next() => event,
        };

        if !slot.deliver(&cancel, event) {
            break;
        }
    }

    drop(stream);
    slot.release();
    finished.cancel();
}
