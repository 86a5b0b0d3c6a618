// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use sluice_core::SluiceError;

/// Receives the items of a subscribed stream.
///
/// `on_error` and `on_complete` are terminal: after either one the observer is
/// dropped and receives nothing else.
pub trait Observer<T> {
    /// Called for every value, in emission order.
    fn on_next(&mut self, value: T);

    /// Called once if the stream fails.
    fn on_error(&mut self, error: SluiceError) {
        error!("sluice: unhandled stream error: {}", error);
    }

    /// Called once when the stream ends without error.
    fn on_complete(&mut self) {}
}

/// [`Observer`] assembled from three closures, see [`observer_fn`].
#[derive(Debug, Clone)]
pub struct FnObserver<N, E, C> {
    on_next: N,
    on_error: E,
    on_complete: C,
}

/// Builds an [`Observer`] from `on_next`, `on_error` and `on_complete` closures.
///
/// ```
/// use sluice_core::SluiceError;
/// use sluice_exec::{observer_fn, Observer};
///
/// let mut seen = Vec::new();
/// {
///     let mut observer = observer_fn(
///         |value: i32| seen.push(value),
///         |_error: SluiceError| {},
///         || {},
///     );
///     observer.on_next(1);
///     observer.on_next(2);
/// }
/// assert_eq!(seen, vec![1, 2]);
/// ```
pub const fn observer_fn<T, N, E, C>(on_next: N, on_error: E, on_complete: C) -> FnObserver<N, E, C>
where
    N: FnMut(T),
    E: FnMut(SluiceError),
    C: FnMut(),
{
    FnObserver {
        on_next,
        on_error,
        on_complete,
    }
}

impl<T, N, E, C> Observer<T> for FnObserver<N, E, C>
where
    N: FnMut(T),
    E: FnMut(SluiceError),
    C: FnMut(),
{
    fn on_next(&mut self, value: T) {
        (self.on_next)(value);
    }

    fn on_error(&mut self, error: SluiceError) {
        (self.on_error)(error);
    }

    fn on_complete(&mut self) {
        (self.on_complete)();
    }
}
