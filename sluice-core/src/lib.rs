// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Core types shared by the sluice crates.
//!
//! - [`StreamItem`]: the in-band value/error envelope every operator emits
//! - [`SluiceError`]: the root error type carried by [`StreamItem::Error`]
//! - [`IntoStream`]: accepts anything stream-like where a stream is expected
//! - [`CancellationToken`]: runtime-agnostic cooperative cancellation

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
pub mod cancellation_token;
pub mod error;
pub mod into_stream;
pub mod stream_item;

pub use self::cancellation_token::{CancellationToken, Cancelled};
pub use self::error::{IntoSluiceError, Result, ResultExt, SluiceError};
pub use self::into_stream::IntoStream;
pub use self::stream_item::StreamItem;
