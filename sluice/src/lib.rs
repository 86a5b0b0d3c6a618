// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! # Sluice
//!
//! Conditional exhaust-map for async Rust streams.
//!
//! ## Overview
//!
//! Every source event is projected into an inner stream. At most one inner
//! stream runs at a time; while it runs, a decision function sees the new
//! event, the last accepted event and the last inner output, and chooses
//! between ignoring the event (exhaust) and replacing the running inner
//! stream (switch).
//!
//! Errors travel in-band as [`StreamItem::Error`] and are terminal.
//!
//! ## Crates
//!
//! - `sluice-core`: [`StreamItem`], [`SluiceError`], [`CancellationToken`]
//! - `sluice-stream`: the [`ExhaustMapWhenExt`] operators and [`ExhaustConfig`]
//! - `sluice-exec`: push-style [`Observer`]s and disposable [`Subscription`]s
//!
//! ## Quick Start
//!
//! ```rust
//! use sluice_rx::prelude::*;
//! use futures::{stream, StreamExt};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let source = stream::iter(vec![StreamItem::Value(1), StreamItem::Value(2)]);
//!
//! // Each event maps to a one-shot inner stream; events above 1 may replace
//! // whatever inner stream is still running.
//! let outputs: Vec<_> = source
//!     .exhaust_map_when(
//!         |event: i32| stream::iter(vec![StreamItem::Value(event * 100)]),
//!         |current: &i32, _, _| *current > 1,
//!     )
//!     .collect()
//!     .await;
//!
//! assert_eq!(outputs, vec![StreamItem::Value(100), StreamItem::Value(200)]);
//! # }
//! ```

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]

pub use sluice_core::{CancellationToken, IntoStream, Result, SluiceError, StreamItem};
pub use sluice_exec::{observer_fn, FnObserver, Observer, Subscription};
#[cfg(feature = "runtime-tokio")]
pub use sluice_exec::SubscribeObserverExt;
pub use sluice_stream::{
    CompletionPolicy, ExhaustConfig, ExhaustMapWhen, ExhaustMapWhenExt, FallibleProjection,
    InfallibleProjection, Projection, Verdict,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use sluice_core::{SluiceError, StreamItem};
    pub use sluice_exec::{observer_fn, Observer, Subscription};
    #[cfg(feature = "runtime-tokio")]
    pub use sluice_exec::SubscribeObserverExt;
    pub use sluice_stream::{CompletionPolicy, ExhaustConfig, ExhaustMapWhenExt};
}
