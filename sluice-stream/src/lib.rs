// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Conditional exhaust-map operator for async streams.
//!
//! Maps every source event to an inner stream, keeping at most one inner
//! stream alive at a time. While an inner stream runs, a caller-supplied
//! decision function chooses between ignoring a new event (exhaust) and
//! cancelling the running inner stream in favor of a new one (switch).
//!
//! # Operators
//!
//! - **[`exhaust_map_when`](ExhaustMapWhenExt::exhaust_map_when)**: decision-gated exhaust/switch
//! - **[`exhaust_map_when_with`](ExhaustMapWhenExt::exhaust_map_when_with)**: same, with an [`ExhaustConfig`]
//! - **[`try_exhaust_map_when`](ExhaustMapWhenExt::try_exhaust_map_when)**: fallible projection
//! - **[`exhaust_map`](ExhaustMapWhenExt::exhaust_map)**: ignore events while busy
//! - **[`switch_map`](ExhaustMapWhenExt::switch_map)**: always replace the running inner stream
//!
//! # Error Semantics
//!
//! Every error is terminal. A source error, an inner error or a failed
//! projection is forwarded once as [`StreamItem::Error`](sluice_core::StreamItem::Error)
//! and the stream then ends, releasing the source and the inner stream.

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]

#[macro_use]
mod logging;

pub mod exhaust_map_when;
pub mod prelude;

pub use exhaust_map_when::{
    CompletionPolicy, ExhaustConfig, ExhaustMapWhen, ExhaustMapWhenExt, FallibleProjection,
    InfallibleProjection, Projection, Verdict,
};
