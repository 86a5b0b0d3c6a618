// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Resource tracking for streams handed to an operator.

use futures::Stream;
use pin_project::{pin_project, pinned_drop};
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

/// Counts how many tracked streams are currently alive.
///
/// Clones share the same count.
#[derive(Debug, Clone, Default)]
pub struct LiveCounter {
    live: Arc<AtomicUsize>,
    created: Arc<AtomicUsize>,
}

impl LiveCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps `stream` so that it counts as alive until dropped.
    pub fn track<S>(&self, stream: S) -> TrackedStream<S> {
        self.live.fetch_add(1, Ordering::SeqCst);
        self.created.fetch_add(1, Ordering::SeqCst);
        TrackedStream {
            inner: stream,
            counter: self.clone(),
        }
    }

    /// Streams created and not yet dropped.
    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    /// Streams created so far, dropped or not.
    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

/// A stream that decrements its [`LiveCounter`] when dropped.
#[pin_project(PinnedDrop)]
pub struct TrackedStream<S> {
    #[pin]
    inner: S,
    counter: LiveCounter,
}

impl<S: Stream> Stream for TrackedStream<S> {
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.project().inner.poll_next(cx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

#[pinned_drop]
impl<S> PinnedDrop for TrackedStream<S> {
    fn drop(self: Pin<&mut Self>) {
        self.counter.live.fetch_sub(1, Ordering::SeqCst);
    }
}
