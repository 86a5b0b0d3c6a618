// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use super::config::ExhaustConfig;
use super::projection::Projection;
use super::state::{Admission, ExhaustState};
use core::pin::Pin;
use core::task::{Context, Poll};
use futures::stream::FusedStream;
use futures::Stream;
use pin_project::pin_project;
use sluice_core::{SluiceError, StreamItem};

/// Stream returned by the [`ExhaustMapWhenExt`](super::ExhaustMapWhenExt) operators.
///
/// Owns the source stream and at most one inner stream. Dropping it releases
/// both.
#[pin_project]
#[must_use = "streams do nothing unless polled"]
pub struct ExhaustMapWhen<S, Pr, P, T>
where
    Pr: Projection<T>,
{
    #[pin]
    source: Option<S>,
    #[pin]
    inner: Option<Pr::Inner>,
    projection: Pr,
    decide: P,
    state: ExhaustState<T, Pr::Output>,
    config: ExhaustConfig,
}

impl<S, Pr, P, T> ExhaustMapWhen<S, Pr, P, T>
where
    Pr: Projection<T>,
{
    pub(crate) const fn new(source: S, projection: Pr, decide: P, config: ExhaustConfig) -> Self {
        Self {
            source: Some(source),
            inner: None,
            projection,
            decide,
            state: ExhaustState::new(),
            config,
        }
    }

    /// Returns `true` while an inner stream is running.
    pub fn has_active_inner(&self) -> bool {
        self.inner.is_some()
    }

    /// Returns `true` if the most recent inner stream completed on its own.
    pub const fn inner_completed(&self) -> bool {
        self.state.inner_completed()
    }

    /// The most recent source event that started an inner stream.
    pub const fn last_accepted(&self) -> Option<&T> {
        self.state.last_accepted()
    }

    /// Number of source events seen so far, accepted or not.
    pub const fn events_seen(&self) -> u64 {
        self.state.events_seen()
    }

    /// Returns the configuration the operator was built with.
    pub const fn config(&self) -> ExhaustConfig {
        self.config
    }
}

impl<S, Pr, P, T> Stream for ExhaustMapWhen<S, Pr, P, T>
where
    S: Stream<Item = StreamItem<T>>,
    Pr: Projection<T>,
    Pr::Output: Clone,
    T: Clone,
    P: FnMut(&T, Option<&T>, Option<&Pr::Output>) -> bool,
{
    type Item = StreamItem<Pr::Output>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        loop {
            if this.source.is_none() {
                return Poll::Ready(None);
            }

            // 1. Drain the running inner stream first, so a finished inner is
            // released before the next source event is judged
            if let Some(inner) = this.inner.as_mut().as_pin_mut() {
                match inner.poll_next(cx) {
                    Poll::Ready(Some(StreamItem::Value(output))) => {
                        this.state.record_output(&output);
                        return Poll::Ready(Some(StreamItem::Value(output)));
                    }
                    Poll::Ready(Some(StreamItem::Error(error))) => {
                        return terminate(this.source, this.inner, error);
                    }
                    Poll::Ready(None) => {
                        this.inner.set(None);
                        this.state.complete_inner();
                    }
                    Poll::Pending => {}
                }
            }

            let Some(source) = this.source.as_mut().as_pin_mut() else {
                return Poll::Ready(None);
            };

            // 2. Pull the next source event
            match source.poll_next(cx) {
                Poll::Ready(Some(StreamItem::Value(event))) => {
                    this.state.observe_event();
                    let admission = this.state.admit(
                        &event,
                        this.inner.is_some(),
                        this.config.completion_policy(),
                        &mut *this.decide,
                    );

                    match admission {
                        Admission::Drop => {
                            debug!(
                                "exhaust_map_when: event #{} exhausted, inner stream still running",
                                this.state.events_seen()
                            );
                        }
                        Admission::Start | Admission::Replace => {
                            if admission == Admission::Replace {
                                debug!(
                                    "exhaust_map_when: inner stream cancelled by event #{}",
                                    this.state.events_seen()
                                );
                            }
                            // The replaced inner is dropped before its successor exists
                            this.inner.set(None);

                            match this.projection.project(event.clone()) {
                                Ok(inner) => {
                                    this.inner.set(Some(inner));
                                    this.state.accept(event);
                                }
                                Err(error) => {
                                    warn!(
                                        "exhaust_map_when: projection failed for event #{}: {}",
                                        this.state.events_seen(),
                                        error
                                    );
                                    return terminate(this.source, this.inner, error);
                                }
                            }
                        }
                    }
                }
                Poll::Ready(Some(StreamItem::Error(error))) => {
                    return terminate(this.source, this.inner, error);
                }
                Poll::Ready(None) => {
                    this.inner.set(None);
                    this.source.set(None);
                    return Poll::Ready(None);
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

impl<S, Pr, P, T> FusedStream for ExhaustMapWhen<S, Pr, P, T>
where
    S: Stream<Item = StreamItem<T>>,
    Pr: Projection<T>,
    Pr::Output: Clone,
    T: Clone,
    P: FnMut(&T, Option<&T>, Option<&Pr::Output>) -> bool,
{
    fn is_terminated(&self) -> bool {
        self.source.is_none()
    }
}

/// Releases the inner stream and the source, then emits the terminal error.
fn terminate<S, I, R>(
    mut source: Pin<&mut Option<S>>,
    mut inner: Pin<&mut Option<I>>,
    error: SluiceError,
) -> Poll<Option<StreamItem<R>>> {
    inner.set(None);
    source.set(None);
    Poll::Ready(Some(StreamItem::Error(error)))
}
