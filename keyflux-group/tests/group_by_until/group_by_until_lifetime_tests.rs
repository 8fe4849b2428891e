// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use keyflux_core::sources::Never;
use keyflux_core::{Disposable, DisposableRef, Observable, ObservableExt, ObserverRef};
use keyflux_group::GroupByUntilExt;
use keyflux_test_utils::{CountingDisposable, GroupRecorder, RecordingObserver, TestSource};
use std::sync::Arc;

type Pair = (&'static str, i32);

/// Source that never emits and hands out one shared subscription.
struct Silent {
    subscription: Arc<CountingDisposable>,
}

impl Observable<Pair> for Silent {
    fn subscribe(&self, _observer: ObserverRef<Pair>) -> DisposableRef {
        self.subscription.clone()
    }
}

#[test]
fn test_group_by_until_dispose_without_group_subscriptions_releases_source() {
    // Arrange
    let source = TestSource::<Pair>::new();
    let recorder = Arc::new(GroupRecorder::<&str, i32>::without_subscribing());
    let subscription = source
        .clone()
        .group_by_until(|(k, _)| *k, |(_, v)| v, |_| Never::<()>::new())
        .subscribe(recorder.clone());
    source.next(("a", 1));
    assert!(source.is_subscribed());

    // Act
    subscription.dispose();

    // Assert
    assert!(subscription.is_disposed());
    assert!(!source.is_subscribed());
    assert_eq!(source.dispose_count(), 1);
}

#[test]
fn test_group_by_until_group_subscriptions_keep_the_source_alive() {
    // Arrange
    let source = TestSource::<Pair>::new();
    let recorder = Arc::new(GroupRecorder::<&str, i32>::new());
    let subscription = source
        .clone()
        .group_by_until(|(k, _)| *k, |(_, v)| v, |_| Never::<()>::new())
        .subscribe(recorder.clone());
    source.next(("a", 1));
    source.next(("b", 2));

    // Act
    subscription.dispose();
    source.next(("a", 3));
    source.next(("c", 4));

    // Assert: groups still flow, the downstream observer is detached
    assert!(source.is_subscribed());
    assert_eq!(recorder.group(0).values(), vec![1, 3]);
    assert_eq!(recorder.keys(), vec!["a", "b"]);

    recorder.dispose_group(0);
    assert!(source.is_subscribed());

    recorder.dispose_group(1);
    assert!(!source.is_subscribed());
    assert_eq!(source.dispose_count(), 1);
}

#[test]
fn test_group_by_until_detached_downstream_sees_no_terminal() {
    // Arrange
    let source = TestSource::<Pair>::new();
    let recorder = Arc::new(GroupRecorder::<&str, i32>::new());
    let subscription = source
        .clone()
        .group_by_until(|(k, _)| *k, |(_, v)| v, |_| Never::<()>::new())
        .subscribe(recorder.clone());
    source.next(("a", 1));

    // Act
    subscription.dispose();
    source.complete();

    // Assert: the group still terminates, the downstream observer does not
    assert!(recorder.group(0).is_completed());
    assert_eq!(recorder.terminal_count(), 0);
}

#[test]
fn test_group_by_until_primary_dispose_is_idempotent() {
    // Arrange
    let source = TestSource::<Pair>::new();
    let recorder = Arc::new(GroupRecorder::<&str, i32>::without_subscribing());
    let subscription = source
        .clone()
        .group_by_until(|(k, _)| *k, |(_, v)| v, |_| Never::<()>::new())
        .subscribe(recorder.clone());

    // Act
    subscription.dispose();
    subscription.dispose();

    // Assert
    assert_eq!(source.dispose_count(), 1);
}

#[test]
fn test_group_by_until_source_subscription_is_disposed_exactly_once() {
    // Arrange
    let counted = Arc::new(CountingDisposable::new());
    let source = Silent {
        subscription: counted.clone(),
    };
    let subscription = source
        .group_by_until(|(k, _)| *k, |(_, v)| v, |_| Never::<()>::new())
        .subscribe(Arc::new(GroupRecorder::<&str, i32>::new()));

    // Act
    subscription.dispose();
    subscription.dispose();

    // Assert
    assert_eq!(counted.dispose_count(), 1);
}

#[test]
fn test_group_by_until_last_of_many_group_subscriptions_releases_the_source() {
    // Arrange
    let source = TestSource::<Pair>::new();
    let recorder = Arc::new(GroupRecorder::<&str, i32>::without_subscribing());
    let subscription = source
        .clone()
        .group_by_until(|(k, _)| *k, |(_, v)| v, |_| Never::<()>::new())
        .subscribe(recorder.clone());
    source.next(("a", 1));

    let group = recorder.handle(0);
    let observers: Vec<_> = (0..3).map(|_| Arc::new(RecordingObserver::<i32>::new())).collect();
    let mut group_subscriptions: Vec<_> = observers
        .iter()
        .map(|observer| group.subscribe(observer.clone()))
        .collect();
    assert_eq!(group.subscriber_count(), 3);

    // Act
    subscription.dispose();
    source.next(("a", 2));
    while group_subscriptions.len() > 1 {
        group_subscriptions.pop();
        assert!(source.is_subscribed());
    }
    group_subscriptions.pop();

    // Assert
    assert!(!source.is_subscribed());
    assert!(observers.iter().all(|observer| observer.values() == vec![2]));
}

#[test]
fn test_group_by_until_subscribing_after_teardown_holds_nothing() {
    // Arrange
    let source = TestSource::<Pair>::new();
    let recorder = Arc::new(GroupRecorder::<&str, i32>::without_subscribing());
    let subscription = source
        .clone()
        .group_by_until(|(k, _)| *k, |(_, v)| v, |_| Never::<()>::new())
        .subscribe(recorder.clone());
    source.next(("a", 1));
    subscription.dispose();
    assert!(!source.is_subscribed());

    // Act
    let observer = Arc::new(RecordingObserver::<i32>::new());
    let late = recorder.handle(0).subscribe(observer.clone());
    source.next(("a", 2));

    // Assert
    assert!(late.is_disposed());
    assert!(observer.values().is_empty());
}

#[test]
fn test_group_by_until_closing_a_group_releases_its_duration_subscription() {
    // Arrange
    let source = TestSource::<Pair>::new();
    let durations = TestSource::<()>::new();
    let recorder = Arc::new(GroupRecorder::<&str, i32>::new());
    let windows = durations.clone();
    let _subscription = source
        .clone()
        .group_by_until(|(k, _)| *k, |(_, v)| v, move |_| windows.clone())
        .subscribe(recorder.clone());
    source.next(("a", 1));
    source.next(("b", 2));
    assert_eq!(durations.subscribe_count(), 2);

    // Act
    durations.next(());

    // Assert
    assert_eq!(durations.dispose_count(), 2);
    assert!(!durations.is_subscribed());
    assert!(recorder.group(0).is_completed());
    assert!(recorder.group(1).is_completed());
    assert!(source.is_subscribed());
}

#[test]
fn test_group_by_until_teardown_releases_open_duration_subscriptions() {
    // Arrange
    let source = TestSource::<Pair>::new();
    let durations = TestSource::<()>::new();
    let recorder = Arc::new(GroupRecorder::<&str, i32>::without_subscribing());
    let windows = durations.clone();
    let _subscription = source
        .clone()
        .group_by_until(|(k, _)| *k, |(_, v)| v, move |_| windows.clone())
        .subscribe(recorder.clone());
    source.next(("a", 1));
    source.next(("b", 2));

    // Act
    source.complete();

    // Assert
    assert!(recorder.is_completed());
    assert_eq!(durations.dispose_count(), 2);
    assert_eq!(source.dispose_count(), 1);
}

#[test]
fn test_group_by_until_each_subscription_groups_independently() {
    // Arrange
    let source = TestSource::<Pair>::new();
    let grouped = source
        .clone()
        .group_by_until(|(k, _)| *k, |(_, v)| v, |_| Never::<()>::new());
    let first = Arc::new(GroupRecorder::<&str, i32>::new());
    let second = Arc::new(GroupRecorder::<&str, i32>::new());
    let _first_subscription = grouped.subscribe(first.clone());
    source.next(("a", 1));
    let _second_subscription = grouped.subscribe(second.clone());

    // Act
    source.next(("a", 2));

    // Assert
    assert_eq!(source.subscribe_count(), 2);
    assert_eq!(first.group(0).values(), vec![1, 2]);
    assert_eq!(second.group(0).values(), vec![2]);
    assert!(!first.handle(0).same_group(&second.handle(0)));
}

#[test]
fn test_group_by_until_handles_report_subscribers() {
    // Arrange
    let source = TestSource::<Pair>::new();
    let recorder = Arc::new(GroupRecorder::<&str, i32>::new());
    let _subscription = source
        .clone()
        .group_by_until(|(k, _)| *k, |(_, v)| v, |_| Never::<()>::new())
        .subscribe(recorder.clone());
    source.next(("a", 1));
    let handle = recorder.handle(0);

    // Act
    let extra = handle.subscribe_fn(|_| {});

    // Assert
    assert_eq!(handle.subscriber_count(), 2);
    extra.dispose();
    assert_eq!(handle.subscriber_count(), 1);
    assert_eq!(format!("{handle:?}"), "GroupHandle { key: \"a\", owned: true }");
}
