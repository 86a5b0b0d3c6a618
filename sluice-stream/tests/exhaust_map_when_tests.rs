// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::stream::FusedStream;
use futures::StreamExt;
use sluice_stream::prelude::*;
use sluice_test_utils::fixtures::{delayed_value, ticks};
use sluice_test_utils::{
    assert_no_element_emitted, assert_stream_ended, test_channel, unwrap_stream, unwrap_value,
    InnerProbe,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Call<R = String> = (u32, Option<u32>, Option<R>);

fn recording_decide<R: Clone>(
    calls: &Arc<Mutex<Vec<Call<R>>>>,
    verdict: fn(u32) -> bool,
) -> impl FnMut(&u32, Option<&u32>, Option<&R>) -> bool {
    let calls = Arc::clone(calls);
    move |current: &u32, previous: Option<&u32>, last_output: Option<&R>| {
        calls
            .lock()
            .unwrap()
            .push((*current, previous.copied(), last_output.cloned()));
        verdict(*current)
    }
}

#[tokio::test]
async fn test_first_event_starts_inner_without_decide() -> anyhow::Result<()> {
    // Arrange
    let (tx, source) = test_channel::<u32>();
    let probe = InnerProbe::<u32, String>::new();
    let calls = Arc::new(Mutex::new(Vec::new()));
    let mut result = source.exhaust_map_when(probe.project(), recording_decide(&calls, |_| false));

    // Act
    tx.send(1)?;
    assert_no_element_emitted(&mut result, 10).await;

    // Assert
    assert_eq!(probe.projected(), vec![1]);
    assert_eq!(probe.live(), 1);
    assert!(calls.lock().unwrap().is_empty());
    assert_eq!(result.last_accepted(), Some(&1));
    assert!(result.has_active_inner());

    Ok(())
}

#[tokio::test]
async fn test_event_dropped_while_inner_running() -> anyhow::Result<()> {
    // Arrange
    let (tx, source) = test_channel::<u32>();
    let probe = InnerProbe::<u32, String>::new();
    let mut result = source.exhaust_map_when(probe.project(), |_: &u32, _, _| false);

    tx.send(1)?;
    assert_no_element_emitted(&mut result, 10).await;
    probe.send(1, "first".to_string());
    assert_eq!(unwrap_value(&mut result, 100).await, "first");

    // Act
    tx.send(2)?;
    assert_no_element_emitted(&mut result, 10).await;

    // Assert - no new inner, the running one keeps emitting
    assert_eq!(probe.projected(), vec![1]);
    assert!(probe.send(1, "second".to_string()));
    assert_eq!(unwrap_value(&mut result, 100).await, "second");
    assert_eq!(result.last_accepted(), Some(&1));

    Ok(())
}

#[tokio::test]
async fn test_event_replaces_running_inner() -> anyhow::Result<()> {
    // Arrange
    let (tx, source) = test_channel::<u32>();
    let probe = InnerProbe::<u32, String>::new();
    let mut result = source.exhaust_map_when(probe.project(), |_: &u32, _, _| true);

    tx.send(1)?;
    assert_no_element_emitted(&mut result, 10).await;
    probe.send(1, "from 1".to_string());
    assert_eq!(unwrap_value(&mut result, 100).await, "from 1");

    // Act
    tx.send(2)?;
    assert_no_element_emitted(&mut result, 10).await;

    // Assert - the replaced inner is gone and cannot emit anymore
    assert_eq!(probe.projected(), vec![1, 2]);
    assert_eq!(probe.live(), 1);
    assert!(!probe.send(1, "stale".to_string()));

    probe.send(2, "from 2".to_string());
    assert_eq!(unwrap_value(&mut result, 100).await, "from 2");
    assert_eq!(result.last_accepted(), Some(&2));

    Ok(())
}

#[tokio::test]
async fn test_at_most_one_live_inner() -> anyhow::Result<()> {
    // Arrange
    let (tx, source) = test_channel::<u32>();
    let probe = InnerProbe::<u32, u32>::new();
    let mut result = source.switch_map(probe.project());

    // Act & Assert
    for event in 1..=10 {
        tx.send(event)?;
        assert_no_element_emitted(&mut result, 5).await;
        assert_eq!(probe.live(), 1);
    }

    assert_eq!(probe.created(), 10);

    Ok(())
}

#[tokio::test]
async fn test_resume_after_natural_completion_ignores_decide() -> anyhow::Result<()> {
    // Arrange
    let (tx, source) = test_channel::<u32>();
    let probe = InnerProbe::<u32, String>::new();
    let calls = Arc::new(Mutex::new(Vec::new()));
    let mut result = source.exhaust_map_when(probe.project(), recording_decide(&calls, |_| false));

    tx.send(1)?;
    assert_no_element_emitted(&mut result, 10).await;
    probe.send(1, "done".to_string());
    probe.complete(1);
    assert_eq!(unwrap_value(&mut result, 100).await, "done");
    assert_no_element_emitted(&mut result, 10).await;
    assert!(result.inner_completed());
    assert!(!result.has_active_inner());

    // Act
    tx.send(2)?;
    assert_no_element_emitted(&mut result, 10).await;

    // Assert
    assert_eq!(probe.projected(), vec![1, 2]);
    assert!(calls.lock().unwrap().is_empty());
    assert!(!result.inner_completed());

    probe.send(2, "again".to_string());
    assert_eq!(unwrap_value(&mut result, 100).await, "again");

    Ok(())
}

#[tokio::test]
async fn test_gate_policy_consults_decide_after_completion() -> anyhow::Result<()> {
    // Arrange
    let (tx, source) = test_channel::<u32>();
    let probe = InnerProbe::<u32, String>::new();
    let calls = Arc::new(Mutex::new(Vec::new()));
    let config = ExhaustConfig::new().with_completion_policy(CompletionPolicy::Gate);
    let mut result = source.exhaust_map_when_with(
        probe.project(),
        recording_decide(&calls, |event| event % 2 == 0),
        config,
    );

    tx.send(1)?;
    assert_no_element_emitted(&mut result, 10).await;
    probe.send(1, "one".to_string());
    probe.complete(1);
    assert_eq!(unwrap_value(&mut result, 100).await, "one");
    assert_no_element_emitted(&mut result, 10).await;

    // Act
    tx.send(3)?;
    tx.send(4)?;
    assert_no_element_emitted(&mut result, 10).await;

    // Assert - 3 is refused even though nothing is running, 4 starts
    assert_eq!(probe.projected(), vec![1, 4]);
    assert_eq!(
        *calls.lock().unwrap(),
        vec![
            (3, Some(1), Some("one".to_string())),
            (4, Some(1), Some("one".to_string())),
        ]
    );
    assert_eq!(result.config().completion_policy(), CompletionPolicy::Gate);

    Ok(())
}

#[tokio::test]
async fn test_decide_receives_last_accepted_event_and_last_output() -> anyhow::Result<()> {
    // Arrange
    let (tx, source) = test_channel::<u32>();
    let probe = InnerProbe::<u32, String>::new();
    let calls = Arc::new(Mutex::new(Vec::new()));
    let mut result = source.exhaust_map_when(probe.project(), recording_decide(&calls, |event| event == 3));

    tx.send(1)?;
    assert_no_element_emitted(&mut result, 10).await;

    // Act
    tx.send(2)?;
    assert_no_element_emitted(&mut result, 10).await;
    probe.send(1, "x".to_string());
    assert_eq!(unwrap_value(&mut result, 100).await, "x");
    tx.send(3)?;
    assert_no_element_emitted(&mut result, 10).await;
    tx.send(4)?;
    assert_no_element_emitted(&mut result, 10).await;

    // Assert - previous is the last accepted event, output resets on replacement
    assert_eq!(
        *calls.lock().unwrap(),
        vec![
            (2, Some(1), None),
            (3, Some(1), Some("x".to_string())),
            (4, Some(3), None),
        ]
    );
    assert_eq!(probe.projected(), vec![1, 3]);

    Ok(())
}

#[tokio::test]
async fn test_inner_outputs_forwarded_in_order() -> anyhow::Result<()> {
    // Arrange
    let (tx, source) = test_channel::<u32>();
    let probe = InnerProbe::<u32, String>::new();
    let mut result = source.exhaust_map(probe.project());

    tx.send(1)?;

    // Act
    for word in ["alpha", "beta", "gamma"] {
        probe.send(1, word.to_string());
    }

    // Assert
    assert_eq!(unwrap_value(&mut result, 100).await, "alpha");
    assert_eq!(unwrap_value(&mut result, 100).await, "beta");
    assert_eq!(unwrap_value(&mut result, 100).await, "gamma");
    assert_no_element_emitted(&mut result, 10).await;

    Ok(())
}

#[tokio::test]
async fn test_source_completion_ends_stream_and_releases_inner() -> anyhow::Result<()> {
    // Arrange
    let (tx, source) = test_channel::<u32>();
    let probe = InnerProbe::<u32, String>::new();
    let mut result = source.exhaust_map(probe.project());

    tx.send(1)?;
    assert_no_element_emitted(&mut result, 10).await;

    // Act
    probe.send(1, "never delivered".to_string());
    drop(tx);

    // Assert
    assert_stream_ended(&mut result, 100).await;
    assert_eq!(probe.live(), 0);
    assert!(result.is_terminated());
    assert!(result.next().await.is_none());

    Ok(())
}

#[tokio::test]
async fn test_drop_releases_source_and_inner() -> anyhow::Result<()> {
    // Arrange
    let (tx, source) = test_channel::<u32>();
    let probe = InnerProbe::<u32, String>::new();
    let mut result = source.switch_map(probe.project());

    tx.send(1)?;
    assert_no_element_emitted(&mut result, 10).await;
    assert_eq!(probe.live(), 1);

    // Act
    drop(result);

    // Assert
    assert_eq!(probe.live(), 0);
    assert!(tx.is_closed());
    assert!(!probe.send(1, "late".to_string()));

    Ok(())
}

#[tokio::test]
async fn test_exhaust_map_ignores_events_while_busy() -> anyhow::Result<()> {
    // Arrange
    let (tx, source) = test_channel::<u32>();
    let probe = InnerProbe::<u32, u32>::new();
    let mut result = source.exhaust_map(probe.project());

    // Act
    tx.send(1)?;
    tx.send(2)?;
    tx.send(3)?;
    assert_no_element_emitted(&mut result, 10).await;
    probe.send(1, 10);
    probe.complete(1);
    assert_eq!(unwrap_value(&mut result, 100).await, 10);
    assert_no_element_emitted(&mut result, 10).await;
    tx.send(4)?;
    probe.send(4, 40);

    // Assert
    assert_eq!(unwrap_value(&mut result, 100).await, 40);
    assert_eq!(probe.projected(), vec![1, 4]);

    Ok(())
}

#[tokio::test]
async fn test_synchronous_inner_is_drained_before_next_event() -> anyhow::Result<()> {
    // Arrange
    let (tx, source) = test_channel::<u32>();
    let mut result = source.switch_map(|event: u32| {
        futures::stream::iter(vec![StreamItem::Value(event * 10), StreamItem::Value(event * 10 + 1)])
    });

    // Act
    tx.send(1)?;
    tx.send(2)?;

    // Assert - ready inner values leave before the next event is pulled
    assert_eq!(unwrap_value(&mut result, 100).await, 10);
    assert_eq!(unwrap_value(&mut result, 100).await, 11);
    assert_eq!(unwrap_value(&mut result, 100).await, 20);
    assert_eq!(unwrap_value(&mut result, 100).await, 21);
    assert_no_element_emitted(&mut result, 10).await;

    Ok(())
}

#[tokio::test]
async fn test_completed_inner_does_not_block_queued_event() -> anyhow::Result<()> {
    // Arrange
    let (tx, source) = test_channel::<u32>();
    let probe = InnerProbe::<u32, u32>::new();
    let calls = Arc::new(Mutex::new(Vec::new()));
    let mut result = source.exhaust_map_when(probe.project(), recording_decide(&calls, |_| false));

    tx.send(1)?;
    assert_no_element_emitted(&mut result, 10).await;

    // Act - the inner ends and the next event is queued before the operator is polled again
    probe.send(1, 10);
    probe.complete(1);
    tx.send(2)?;

    // Assert
    assert_eq!(unwrap_stream(&mut result, 100).await, StreamItem::Value(10));
    assert_no_element_emitted(&mut result, 10).await;
    assert_eq!(probe.projected(), vec![1, 2]);
    assert!(calls.lock().unwrap().is_empty());
    assert_eq!(result.last_accepted(), Some(&2));
    assert_eq!(result.events_seen(), 2);

    Ok(())
}

#[tokio::test]
async fn test_exhaust_map_restarts_after_each_synchronous_inner() -> anyhow::Result<()> {
    // Arrange
    let source = futures::stream::iter(vec![1, 2, 3]).map(StreamItem::Value);

    // Act
    let outputs: Vec<_> = source
        .exhaust_map(|event: u32| futures::stream::iter(vec![StreamItem::Value(event)]))
        .collect()
        .await;

    // Assert - every inner completes before the next event arrives
    assert_eq!(
        outputs,
        vec![StreamItem::Value(1), StreamItem::Value(2), StreamItem::Value(3)]
    );

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_ticks_with_delayed_inner_emit_first_and_fifth() -> anyhow::Result<()> {
    // Arrange - events 0, 1, 2, ... one per second; each inner emits after 3.5 seconds
    let source = ticks(Duration::from_millis(1000)).map(|item| item.map(|tick| tick - 1));
    let mut result = source.exhaust_map_when(
        |event: u64| delayed_value(event, Duration::from_millis(3500)),
        |event: &u64, _, _| event % 4 == 0,
    );

    // Act & Assert - 1, 2 and 3 arrive while the inner of 0 runs; it completes before 4
    assert_eq!(unwrap_value(&mut result, 5000).await, 0);
    assert_eq!(unwrap_value(&mut result, 5000).await, 4);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_rapid_events_with_switching_deliver_only_latest() -> anyhow::Result<()> {
    // Arrange
    let (tx, source) = test_channel::<u32>();
    let mut result = source.exhaust_map_when(
        |event: u32| delayed_value(event, Duration::from_millis(2000)),
        |_: &u32, _, _| true,
    );

    // Act
    tx.send(0)?;
    tx.send(1)?;

    // Assert
    assert_eq!(unwrap_value(&mut result, 3000).await, 1);
    assert_no_element_emitted(&mut result, 5000).await;

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_ticks_with_inner_lasting_two_ticks() -> anyhow::Result<()> {
    // Arrange - events 0, 1, 2, ... one per second; each inner emits after 2 seconds
    let source = ticks(Duration::from_millis(1000)).map(|item| item.map(|tick| tick - 1));
    let decided = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&decided);
    let mut result = source.exhaust_map_when(
        |event: u64| delayed_value(event, Duration::from_millis(2000)),
        move |event: &u64, _, _| {
            recorded.lock().unwrap().push(*event);
            event % 4 == 0
        },
    );

    // Act & Assert - each inner ends at the instant the second event after it
    // arrives; the finished inner is released first, so that event starts anew
    assert_eq!(unwrap_value(&mut result, 5000).await, 0);
    assert_eq!(unwrap_value(&mut result, 5000).await, 2);
    assert_eq!(unwrap_value(&mut result, 5000).await, 4);
    assert_eq!(*decided.lock().unwrap(), vec![1, 3, 5]);

    Ok(())
}
