// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Controllable inner streams for projection-based operators.

use crate::tracking::{LiveCounter, TrackedStream};
use parking_lot::Mutex;
use sluice_core::{SluiceError, StreamItem};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

/// Inner stream handed out by [`InnerProbe::project`].
pub type ProbeStream<R> = TrackedStream<UnboundedReceiverStream<StreamItem<R>>>;

/// Factory of inner streams, one channel per projected key.
///
/// The test keeps the probe and drives every inner stream through
/// [`send`](Self::send), [`fail`](Self::fail) and [`complete`](Self::complete).
/// Items sent before the key is projected are buffered and delivered once the
/// operator subscribes to that inner stream.
///
/// # Example
///
/// ```rust
/// use sluice_test_utils::InnerProbe;
/// use futures::StreamExt;
///
/// # async fn example() {
/// let probe = InnerProbe::<i32, String>::new();
/// let mut project = probe.project();
///
/// let mut inner = project(1);
/// probe.send(1, "one".to_string());
/// probe.complete(1);
///
/// assert_eq!(inner.next().await.unwrap().unwrap(), "one");
/// assert!(inner.next().await.is_none());
/// assert_eq!(probe.projected(), vec![1]);
/// # }
/// ```
pub struct InnerProbe<K, R> {
    shared: Arc<Mutex<Shared<K, R>>>,
    counter: LiveCounter,
}

struct Shared<K, R> {
    channels: HashMap<K, Channel<R>>,
    projected: Vec<K>,
}

struct Channel<R> {
    tx: Option<mpsc::UnboundedSender<StreamItem<R>>>,
    rx: Option<mpsc::UnboundedReceiver<StreamItem<R>>>,
}

impl<R> Channel<R> {
    fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx: Some(tx),
            rx: Some(rx),
        }
    }
}

impl<K, R> Clone for InnerProbe<K, R> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            counter: self.counter.clone(),
        }
    }
}

impl<K, R> Default for InnerProbe<K, R> {
    fn default() -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared {
                channels: HashMap::new(),
                projected: Vec::new(),
            })),
            counter: LiveCounter::new(),
        }
    }
}

impl<K, R> InnerProbe<K, R>
where
    K: Eq + Hash + Clone + Send + 'static,
    R: Send + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a projection closure handing out the inner stream for each key.
    pub fn project(&self) -> impl FnMut(K) -> ProbeStream<R> + Send + 'static {
        let probe = self.clone();
        move |key| probe.open(key)
    }

    fn open(&self, key: K) -> ProbeStream<R> {
        let mut shared = self.shared.lock();
        shared.projected.push(key.clone());

        let channel = shared.channels.entry(key).or_insert_with(Channel::new);
        let rx = match channel.rx.take() {
            Some(rx) => rx,
            None => {
                let (tx, rx) = mpsc::unbounded_channel();
                channel.tx = Some(tx);
                rx
            }
        };

        self.counter.track(UnboundedReceiverStream::new(rx))
    }

    /// Emits `value` on the inner stream of `key`.
    ///
    /// Returns `false` when that inner stream was already dropped or completed.
    pub fn send(&self, key: K, value: R) -> bool {
        self.push(key, StreamItem::Value(value))
    }

    /// Emits `error` on the inner stream of `key`.
    pub fn fail(&self, key: K, error: SluiceError) -> bool {
        self.push(key, StreamItem::Error(error))
    }

    /// Completes the inner stream of `key`.
    pub fn complete(&self, key: K) {
        let mut shared = self.shared.lock();
        shared.channels.entry(key).or_insert_with(Channel::new).tx = None;
    }

    fn push(&self, key: K, item: StreamItem<R>) -> bool {
        let mut shared = self.shared.lock();
        let channel = shared.channels.entry(key).or_insert_with(Channel::new);
        channel.tx.as_ref().is_some_and(|tx| tx.send(item).is_ok())
    }

    /// Keys in projection order.
    pub fn projected(&self) -> Vec<K> {
        self.shared.lock().projected.clone()
    }

    /// Inner streams currently alive.
    pub fn live(&self) -> usize {
        self.counter.live()
    }

    /// Inner streams created so far.
    pub fn created(&self) -> usize {
        self.counter.created()
    }
}
