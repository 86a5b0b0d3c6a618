// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

/// How a naturally completed inner stream affects the next source event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompletionPolicy {
    /// The next event after a natural completion always starts a new inner
    /// stream, without consulting the decision function.
    #[default]
    Resume,
    /// The decision function keeps gating events after a natural completion.
    /// A `false` verdict drops the event even though nothing is running.
    Gate,
}

/// Configuration for [`exhaust_map_when_with`](super::ExhaustMapWhenExt::exhaust_map_when_with).
///
/// ```
/// use sluice_stream::{CompletionPolicy, ExhaustConfig};
///
/// let config = ExhaustConfig::new().with_completion_policy(CompletionPolicy::Gate);
/// assert_eq!(config.completion_policy(), CompletionPolicy::Gate);
/// assert_eq!(ExhaustConfig::default().completion_policy(), CompletionPolicy::Resume);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExhaustConfig {
    completion_policy: CompletionPolicy,
}

impl ExhaustConfig {
    /// Creates the default configuration ([`CompletionPolicy::Resume`]).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            completion_policy: CompletionPolicy::Resume,
        }
    }

    /// Sets the completion policy.
    #[must_use]
    pub const fn with_completion_policy(mut self, policy: CompletionPolicy) -> Self {
        self.completion_policy = policy;
        self
    }

    /// Returns the configured completion policy.
    #[must_use]
    pub const fn completion_policy(&self) -> CompletionPolicy {
        self.completion_policy
    }
}
