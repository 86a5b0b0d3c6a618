// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities and fixtures for the sluice workspace.
//!
//! Designed for development and testing only, not for production code.
//!
//! # Architecture
//!
//! - **Sources** are driven imperatively through [`test_channel`] and
//!   [`test_channel_with_errors`]; the test keeps the sender and hands the stream
//!   to the operator under test.
//! - **Inner streams** come from an [`InnerProbe`]: one controllable channel per
//!   projected event, so a test decides exactly when an inner emits, fails or
//!   completes.
//! - **Resource tracking** goes through [`LiveCounter`] and [`TrackedStream`],
//!   which make "was the inner stream released?" an assertion instead of a guess.
//! - **Timed fixtures** ([`fixtures::ticks`], [`fixtures::delayed_value`]) build
//!   time-based scenarios for tests running on tokio's paused clock.
//!
//! # Examples
//!
//! ```rust
//! use sluice_test_utils::{test_channel, helpers::unwrap_stream};
//!
//! # async fn example() {
//! let (tx, mut stream) = test_channel();
//! tx.send(42).unwrap();
//!
//! assert_eq!(unwrap_stream(&mut stream, 100).await.unwrap(), 42);
//! # }
//! ```

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]

pub mod fixtures;
pub mod helpers;
pub mod probe;
pub mod tracking;

use futures::{Stream, StreamExt};
use sluice_core::StreamItem;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

pub use helpers::{assert_no_element_emitted, assert_stream_ended, unwrap_stream, unwrap_value};
pub use probe::InnerProbe;
pub use tracking::{LiveCounter, TrackedStream};

/// Creates a test channel that automatically wraps values in `StreamItem::Value`.
///
/// # Example
///
/// ```rust
/// use sluice_test_utils::test_channel;
/// use futures::StreamExt;
///
/// # async fn example() {
/// let (tx, mut stream) = test_channel();
///
/// tx.send(7).unwrap();
///
/// let item = stream.next().await.unwrap().unwrap(); // Option -> StreamItem -> Value
/// assert_eq!(item, 7);
/// # }
/// ```
pub fn test_channel<T: Send + 'static>() -> (
    mpsc::UnboundedSender<T>,
    impl Stream<Item = StreamItem<T>> + Send + Unpin,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let stream = UnboundedReceiverStream::new(rx).map(StreamItem::Value);
    (tx, stream)
}

/// Creates a test channel that accepts `StreamItem<T>` for testing error propagation.
///
/// # Example
///
/// ```rust
/// use sluice_test_utils::test_channel_with_errors;
/// use sluice_core::{SluiceError, StreamItem};
/// use futures::StreamExt;
///
/// # async fn example() {
/// let (tx, mut stream) = test_channel_with_errors::<i32>();
///
/// tx.send(StreamItem::Value(42)).unwrap();
/// tx.send(StreamItem::Error(SluiceError::stream_error("test error"))).unwrap();
///
/// assert!(stream.next().await.unwrap().is_value());
/// assert!(stream.next().await.unwrap().is_error());
/// # }
/// ```
pub fn test_channel_with_errors<T: Send + 'static>() -> (
    mpsc::UnboundedSender<StreamItem<T>>,
    impl Stream<Item = StreamItem<T>> + Send + Unpin,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let stream = UnboundedReceiverStream::new(rx);
    (tx, stream)
}
