// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::Stream;
use sluice_core::{IntoStream, Result, StreamItem};

/// Builds the inner stream for an accepted source event.
///
/// Implemented by [`InfallibleProjection`] and [`FallibleProjection`], which
/// wrap the closures handed to the operator methods.
pub trait Projection<T> {
    /// Value type produced by the inner streams.
    type Output;
    /// Inner stream type.
    type Inner: Stream<Item = StreamItem<Self::Output>>;

    /// Creates a fresh inner stream for `event`.
    ///
    /// # Errors
    ///
    /// Returns an error when no inner stream can be built for the event.
    fn project(&mut self, event: T) -> Result<Self::Inner>;
}

/// Projection from a closure that always produces an inner stream.
#[derive(Debug, Clone)]
pub struct InfallibleProjection<F>(pub(crate) F);

impl<T, F, I, R> Projection<T> for InfallibleProjection<F>
where
    F: FnMut(T) -> I,
    I: IntoStream<Item = StreamItem<R>>,
{
    type Output = R;
    type Inner = I::Stream;

    fn project(&mut self, event: T) -> Result<Self::Inner> {
        Ok((self.0)(event).into_stream())
    }
}

/// Projection from a closure that may fail to produce an inner stream.
#[derive(Debug, Clone)]
pub struct FallibleProjection<F>(pub(crate) F);

impl<T, F, I, R> Projection<T> for FallibleProjection<F>
where
    F: FnMut(T) -> Result<I>,
    I: IntoStream<Item = StreamItem<R>>,
{
    type Output = R;
    type Inner = I::Stream;

    fn project(&mut self, event: T) -> Result<Self::Inner> {
        (self.0)(event).map(IntoStream::into_stream)
    }
}
