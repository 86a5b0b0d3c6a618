// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Push-style consumption of sluice streams.
//!
//! [`subscribe_observer`](SubscribeObserverExt::subscribe_observer) drives a stream of
//! [`StreamItem`](sluice_core::StreamItem)s on a background task and delivers each item
//! to an [`Observer`]. The returned [`Subscription`] is the disposer: unsubscribing (or
//! dropping it) stops delivery and releases the stream together with every resource the
//! stream owns, such as the source and inner streams of an exhaust-map operator.

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]

#[macro_use]
mod logging;

pub mod observer;
#[cfg(feature = "runtime-tokio")]
pub mod subscribe_observer;
pub mod subscription;

pub use observer::{observer_fn, FnObserver, Observer};
#[cfg(feature = "runtime-tokio")]
pub use subscribe_observer::SubscribeObserverExt;
pub use subscription::Subscription;
