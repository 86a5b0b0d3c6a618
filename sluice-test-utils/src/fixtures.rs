// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Timed stream fixtures, meant for tests running with `tokio::time::pause()`.

use futures::stream::{self, Stream};
use sluice_core::StreamItem;
use std::time::Duration;
use tokio::time::sleep;

/// Emits `1, 2, 3, ...` forever, one value every `period`, starting after the first period.
pub fn ticks(period: Duration) -> impl Stream<Item = StreamItem<u64>> + Send + Unpin {
    Box::pin(stream::unfold(1_u64, move |n| async move {
        sleep(period).await;
        Some((StreamItem::Value(n), n + 1))
    }))
}

/// Emits `value` once after `delay`, then completes.
pub fn delayed_value<T: Send + 'static>(
    value: T,
    delay: Duration,
) -> impl Stream<Item = StreamItem<T>> + Send + Unpin {
    Box::pin(stream::once(async move {
        sleep(delay).await;
        StreamItem::Value(value)
    }))
}
