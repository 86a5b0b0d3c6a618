// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Prelude module re-exporting the operator trait and its configuration.
//!
//! ```
//! use sluice_stream::prelude::*;
//!
//! let config = ExhaustConfig::new().with_completion_policy(CompletionPolicy::Gate);
//! assert_eq!(config.completion_policy(), CompletionPolicy::Gate);
//! ```

pub use crate::exhaust_map_when::{CompletionPolicy, ExhaustConfig, ExhaustMapWhenExt};
pub use sluice_core::{SluiceError, StreamItem};
