// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Ticking source, slow inner streams and a modulo decision function.
//!
//! Events arrive every 100ms, each inner stream echoes its event after 250ms.
//! While an inner stream runs, only multiples of 4 may replace it.
//!
//! Run with `cargo run -p sluice-rx --example exhaust_demo`.

use futures::StreamExt;
use sluice_rx::prelude::*;
use sluice_test_utils::fixtures::{delayed_value, ticks};
use std::time::Duration;

const TICK: Duration = Duration::from_millis(100);
const INNER_DELAY: Duration = Duration::from_millis(250);

#[tokio::main]
async fn main() {
    let source = ticks(TICK).map(|item| item.map(|tick| tick - 1));

    let operator = source.exhaust_map_when(
        |event: u64| {
            println!("start inner for {event}");
            delayed_value(event, INNER_DELAY)
        },
        |event: &u64, previous: Option<&u64>, last_output: Option<&u64>| {
            let replace = event % 4 == 0;
            println!(
                "event {event} while busy (previous {previous:?}, last output {last_output:?}): {}",
                if replace { "cancelled" } else { "exhausted" }
            );
            replace
        },
    );

    let subscription = operator.subscribe_observer(observer_fn(
        |value: u64| println!("output {value}"),
        |error: SluiceError| eprintln!("error {error}"),
        || println!("complete"),
    ));

    tokio::time::sleep(TICK * 20).await;
    subscription.unsubscribe();
    subscription.closed().await;
    println!("unsubscribed");
}
