// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Exhaust-map with a decision function.
//!
//! The [`exhaust_map_when`](ExhaustMapWhenExt::exhaust_map_when) operator maps each source
//! event to an inner stream and forwards the inner stream's values. At most one inner
//! stream runs at a time.
//!
//! # Behavior
//!
//! For every source event `e`:
//!
//! - If no inner stream is running, `project(e)` is started immediately
//! - If an inner stream is running, `decide(e, previous, last_output)` is evaluated:
//!   - `false`: the event is dropped, the running inner stream is untouched
//!   - `true`: the running inner stream is dropped (cancelled) and `project(e)` starts
//! - `previous` is the last *accepted* event, not the last event seen
//! - `last_output` is the latest value of the running inner stream, `None` until it emits
//! - When an inner stream completes on its own the operator keeps running; with the default
//!   [`CompletionPolicy::Resume`] the next event always starts a new inner stream
//!
//! Inner values are forwarded unchanged and in order. Rejected events are never buffered.
//!
//! # Termination
//!
//! - Source completion ends the output immediately; a running inner stream is dropped
//!   without forwarding anything else
//! - A source error, an inner error or a failed projection is forwarded once and ends
//!   the output, releasing the source and the inner stream
//! - Dropping the returned stream releases the source and the running inner stream
//!
//! # Arguments
//!
//! * `project` - Builds a fresh inner stream for an accepted event
//! * `decide` - `(current, previous_accepted, last_inner_output) -> bool`; `true` replaces
//!   the running inner stream
//!
//! # Examples
//!
//! ```rust
//! use sluice_stream::ExhaustMapWhenExt;
//! use sluice_core::StreamItem;
//! use futures::{stream, StreamExt};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let source = stream::iter(vec![1, 2, 3]).map(StreamItem::Value);
//!
//! let outputs: Vec<i32> = source
//!     .exhaust_map_when(
//!         |event: i32| stream::iter(vec![StreamItem::Value(event * 10)]),
//!         |current: &i32, _previous: Option<&i32>, _output: Option<&i32>| *current > 1,
//!     )
//!     .filter_map(|item| async move { item.ok() })
//!     .collect()
//!     .await;
//!
//! assert_eq!(outputs, vec![10, 20, 30]);
//! # }
//! ```
//!
//! # Use Cases
//!
//! - Ignoring repeated "refresh" clicks while a request is in flight, unless the new
//!   click targets a different resource
//! - Restarting a long computation only when the input changed enough
//!
//! # See Also
//!
//! - [`exhaust_map`](ExhaustMapWhenExt::exhaust_map) - never replaces a running inner stream
//! - [`switch_map`](ExhaustMapWhenExt::switch_map) - always replaces a running inner stream

mod config;
mod implementation;
mod projection;
mod state;

pub use config::{CompletionPolicy, ExhaustConfig};
pub use implementation::ExhaustMapWhen;
pub use projection::{FallibleProjection, InfallibleProjection, Projection};

use futures::Stream;
use sluice_core::{IntoStream, Result, StreamItem};

/// Decision function type used by [`exhaust_map`](ExhaustMapWhenExt::exhaust_map) and
/// [`switch_map`](ExhaustMapWhenExt::switch_map).
pub type Verdict<T, R> = fn(&T, Option<&T>, Option<&R>) -> bool;

fn never_replace<T, R>(_: &T, _: Option<&T>, _: Option<&R>) -> bool {
    false
}

fn always_replace<T, R>(_: &T, _: Option<&T>, _: Option<&R>) -> bool {
    true
}

/// Extension trait providing the conditional exhaust-map operators.
pub trait ExhaustMapWhenExt<T>: Stream<Item = StreamItem<T>> + Sized {
    /// Maps events to inner streams, letting `decide` replace a running inner stream.
    ///
    /// See the [module-level documentation](crate::exhaust_map_when) for the full contract.
    fn exhaust_map_when<R, I, F, P>(
        self,
        project: F,
        decide: P,
    ) -> ExhaustMapWhen<Self, InfallibleProjection<F>, P, T>
    where
        F: FnMut(T) -> I,
        I: IntoStream<Item = StreamItem<R>>,
        P: FnMut(&T, Option<&T>, Option<&R>) -> bool;

    /// Same as [`exhaust_map_when`](Self::exhaust_map_when) with an explicit configuration.
    fn exhaust_map_when_with<R, I, F, P>(
        self,
        project: F,
        decide: P,
        config: ExhaustConfig,
    ) -> ExhaustMapWhen<Self, InfallibleProjection<F>, P, T>
    where
        F: FnMut(T) -> I,
        I: IntoStream<Item = StreamItem<R>>,
        P: FnMut(&T, Option<&T>, Option<&R>) -> bool;

    /// Like [`exhaust_map_when`](Self::exhaust_map_when), with a projection that can fail.
    ///
    /// # Errors
    ///
    /// When `project` returns `Err`, the error is emitted as `StreamItem::Error` and the
    /// stream ends. The event that failed to project is not recorded as accepted.
    fn try_exhaust_map_when<R, I, F, P>(
        self,
        project: F,
        decide: P,
    ) -> ExhaustMapWhen<Self, FallibleProjection<F>, P, T>
    where
        F: FnMut(T) -> Result<I>,
        I: IntoStream<Item = StreamItem<R>>,
        P: FnMut(&T, Option<&T>, Option<&R>) -> bool;

    /// Classic exhaust semantics: events arriving while an inner stream runs are ignored.
    fn exhaust_map<R, I, F>(
        self,
        project: F,
    ) -> ExhaustMapWhen<Self, InfallibleProjection<F>, Verdict<T, R>, T>
    where
        F: FnMut(T) -> I,
        I: IntoStream<Item = StreamItem<R>>;

    /// Switch semantics: every event cancels the running inner stream and starts a new one.
    ///
    /// Unlike a classic switch-map, the output ends as soon as the source ends.
    fn switch_map<R, I, F>(
        self,
        project: F,
    ) -> ExhaustMapWhen<Self, InfallibleProjection<F>, Verdict<T, R>, T>
    where
        F: FnMut(T) -> I,
        I: IntoStream<Item = StreamItem<R>>;
}

impl<S, T> ExhaustMapWhenExt<T> for S
where
    S: Stream<Item = StreamItem<T>>,
{
    fn exhaust_map_when<R, I, F, P>(
        self,
        project: F,
        decide: P,
    ) -> ExhaustMapWhen<Self, InfallibleProjection<F>, P, T>
    where
        F: FnMut(T) -> I,
        I: IntoStream<Item = StreamItem<R>>,
        P: FnMut(&T, Option<&T>, Option<&R>) -> bool,
    {
        self.exhaust_map_when_with(project, decide, ExhaustConfig::default())
    }

    fn exhaust_map_when_with<R, I, F, P>(
        self,
        project: F,
        decide: P,
        config: ExhaustConfig,
    ) -> ExhaustMapWhen<Self, InfallibleProjection<F>, P, T>
    where
        F: FnMut(T) -> I,
        I: IntoStream<Item = StreamItem<R>>,
        P: FnMut(&T, Option<&T>, Option<&R>) -> bool,
    {
        ExhaustMapWhen::new(self, InfallibleProjection(project), decide, config)
    }

    fn try_exhaust_map_when<R, I, F, P>(
        self,
        project: F,
        decide: P,
    ) -> ExhaustMapWhen<Self, FallibleProjection<F>, P, T>
    where
        F: FnMut(T) -> Result<I>,
        I: IntoStream<Item = StreamItem<R>>,
        P: FnMut(&T, Option<&T>, Option<&R>) -> bool,
    {
        ExhaustMapWhen::new(
            self,
            FallibleProjection(project),
            decide,
            ExhaustConfig::default(),
        )
    }

    fn exhaust_map<R, I, F>(
        self,
        project: F,
    ) -> ExhaustMapWhen<Self, InfallibleProjection<F>, Verdict<T, R>, T>
    where
        F: FnMut(T) -> I,
        I: IntoStream<Item = StreamItem<R>>,
    {
        self.exhaust_map_when(project, never_replace::<T, R> as Verdict<T, R>)
    }

    fn switch_map<R, I, F>(
        self,
        project: F,
    ) -> ExhaustMapWhen<Self, InfallibleProjection<F>, Verdict<T, R>, T>
    where
        F: FnMut(T) -> I,
        I: IntoStream<Item = StreamItem<R>>,
    {
        self.exhaust_map_when(project, always_replace::<T, R> as Verdict<T, R>)
    }
}
