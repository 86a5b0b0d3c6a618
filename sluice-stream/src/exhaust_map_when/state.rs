// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use super::config::CompletionPolicy;

/// Verdict for one source event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Admission {
    /// Nothing is running: start an inner stream for the event.
    Start,
    /// Cancel the running inner stream and start one for the event.
    Replace,
    /// Ignore the event.
    Drop,
}

/// Per-subscription bookkeeping of the operator.
///
/// The running inner stream itself is owned by the operator stream; this
/// struct holds everything the decision function gets to see.
#[derive(Debug)]
pub(crate) struct ExhaustState<T, R> {
    last_accepted: Option<T>,
    last_output: Option<R>,
    inner_completed: bool,
    events_seen: u64,
}

impl<T, R> ExhaustState<T, R> {
    pub(crate) const fn new() -> Self {
        Self {
            last_accepted: None,
            last_output: None,
            inner_completed: false,
            events_seen: 0,
        }
    }

    pub(crate) fn observe_event(&mut self) {
        self.events_seen += 1;
    }

    /// Decides what to do with `event`.
    ///
    /// `decide` is only consulted once an event has been accepted; with
    /// [`CompletionPolicy::Resume`] it is also skipped after the inner stream
    /// completed on its own.
    pub(crate) fn admit<P>(
        &self,
        event: &T,
        inner_running: bool,
        policy: CompletionPolicy,
        decide: &mut P,
    ) -> Admission
    where
        P: FnMut(&T, Option<&T>, Option<&R>) -> bool,
    {
        if !inner_running {
            if self.last_accepted.is_none() {
                return Admission::Start;
            }
            debug_assert!(self.inner_completed, "idle operator without a completed inner");
            if policy == CompletionPolicy::Resume {
                return Admission::Start;
            }
        }

        if !decide(event, self.last_accepted.as_ref(), self.last_output.as_ref()) {
            Admission::Drop
        } else if inner_running {
            Admission::Replace
        } else {
            Admission::Start
        }
    }

    /// Records that an inner stream was started for `event`.
    pub(crate) fn accept(&mut self, event: T) {
        self.last_accepted = Some(event);
        self.last_output = None;
        self.inner_completed = false;
    }

    pub(crate) fn record_output(&mut self, output: &R)
    where
        R: Clone,
    {
        self.last_output = Some(output.clone());
    }

    pub(crate) fn complete_inner(&mut self) {
        self.inner_completed = true;
    }

    pub(crate) const fn last_accepted(&self) -> Option<&T> {
        self.last_accepted.as_ref()
    }

    pub(crate) const fn inner_completed(&self) -> bool {
        self.inner_completed
    }

    pub(crate) const fn events_seen(&self) -> u64 {
        self.events_seen
    }
}
