// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::stream::StreamExt;
use futures::Stream;
use sluice_core::StreamItem;
use std::time::Duration;
use tokio::time::{sleep, timeout};

/// Waits up to `timeout_ms` for the next item and returns it.
///
/// # Panics
///
/// Panics if the stream ends or nothing arrives in time.
pub async fn unwrap_stream<S, T>(stream: &mut S, timeout_ms: u64) -> StreamItem<T>
where
    S: Stream<Item = StreamItem<T>> + Unpin,
{
    match timeout(Duration::from_millis(timeout_ms), stream.next()).await {
        Ok(Some(item)) => item,
        Ok(None) => panic!("Expected an item, but the stream ended"),
        Err(_) => panic!("Expected an item within {timeout_ms}ms, but none arrived"),
    }
}

/// Like [`unwrap_stream`], but also requires the item to be a value.
///
/// # Panics
///
/// Panics if the stream ends, times out, or yields an error.
pub async fn unwrap_value<S, T>(stream: &mut S, timeout_ms: u64) -> T
where
    S: Stream<Item = StreamItem<T>> + Unpin,
{
    match unwrap_stream(stream, timeout_ms).await {
        StreamItem::Value(value) => value,
        StreamItem::Error(error) => panic!("Expected a value, got error: {error}"),
    }
}

/// Asserts that the stream stays silent for `timeout_ms`.
///
/// An item that is already available is always detected, even with a zero timeout.
pub async fn assert_no_element_emitted<S, T>(stream: &mut S, timeout_ms: u64)
where
    S: Stream<Item = T> + Unpin,
{
    tokio::select! {
        biased;
        state = stream.next() => {
            match state {
                Some(_) => panic!("Unexpected element emitted, expected no output."),
                None => panic!("Unexpected end of stream, expected no output."),
            }
        }
        () = sleep(Duration::from_millis(timeout_ms)) => {
        }
    }
}

/// Asserts that the stream ends within `timeout_ms` without yielding anything else.
pub async fn assert_stream_ended<S, T>(stream: &mut S, timeout_ms: u64)
where
    S: Stream<Item = T> + Unpin,
{
    match timeout(Duration::from_millis(timeout_ms), stream.next()).await {
        Ok(None) => {}
        Ok(Some(_)) => panic!("Expected end of stream, got another element"),
        Err(_) => panic!("Expected end of stream within {timeout_ms}ms, stream is still open"),
    }
}
