// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use keyflux_core::sources::{Never, Throw};
use keyflux_core::{FluxionError, Observable, Result};
use keyflux_group::{GroupByUntilExt, GroupHandle};
use keyflux_test_utils::selectors::{
    failing_element_selector, failing_key_selector, panicking_selector, selector_error,
};
use keyflux_test_utils::test_data::{animal_dog, person_alice, plant_rose, DataVariant, TestData};
use keyflux_test_utils::{Closers, EventLog, GroupRecorder, TestSource};
use std::sync::Arc;

type Pair = (&'static str, i32);

#[test]
fn test_group_by_until_source_error_fails_groups_then_downstream() {
    // Arrange
    let source = TestSource::<TestData>::new();
    let log = EventLog::new();
    let recorder = Arc::new(GroupRecorder::<DataVariant, TestData>::with_log(log.clone()));
    let _subscription = source
        .clone()
        .group_by_until(TestData::variant, |data| data, |_| Never::<()>::new())
        .subscribe(recorder.clone());
    source.next(person_alice());
    source.next(animal_dog());

    // Act
    source.error(FluxionError::stream_error("upstream broke"));

    // Assert
    let entries = log.entries();
    let mut group_errors = entries[4..6].to_vec();
    group_errors.sort();
    assert_eq!(group_errors, ["Animal#1:error", "Person#0:error"]);
    assert_eq!(entries[6..], ["groups:error"]);

    let error = recorder.error().expect("downstream error");
    assert!(error.to_string().contains("upstream broke"));
    assert!(recorder.group(0).error().is_some());
    assert!(recorder.group(1).error().is_some());
}

#[test]
fn test_group_by_until_closed_groups_miss_the_fatal_error() {
    // Arrange
    let source = TestSource::<Pair>::new();
    let closers = Closers::new();
    let recorder = Arc::new(GroupRecorder::<&str, i32>::new());
    let _subscription = source
        .clone()
        .group_by_until(|(k, _)| *k, |(_, v)| v, closers.duration::<i32>())
        .subscribe(recorder.clone());
    source.next(("a", 1));
    source.next(("b", 2));
    closers.close(&"a");

    // Act
    source.error(FluxionError::stream_error("late"));

    // Assert
    assert!(recorder.group(0).is_completed());
    assert_eq!(recorder.group(0).terminal_count(), 1);
    assert!(recorder.group(1).error().is_some());
    assert_eq!(recorder.terminal_count(), 1);
}

#[test]
fn test_group_by_until_key_selector_error_is_fatal() {
    // Arrange
    let source = TestSource::<Pair>::new();
    let recorder = Arc::new(GroupRecorder::<&str, i32>::new());
    let _subscription = source
        .clone()
        .try_group_by_until(
            failing_key_selector(|(_, v): &Pair| *v < 0, |(k, _): &Pair| *k, "bad key"),
            |(_, v)| Ok(v),
            |_| Ok(Never::<()>::new()),
        )
        .subscribe(recorder.clone());
    source.next(("a", 1));

    // Act
    source.next(("b", -1));
    source.next(("c", 3));

    // Assert
    assert_eq!(recorder.keys(), vec!["a"]);
    let error = recorder.error().expect("downstream error");
    assert!(matches!(error, FluxionError::StreamProcessingError { .. }));
    assert!(error.to_string().contains("bad key"));
    assert!(recorder.group(0).error().is_some());
    assert_eq!(recorder.terminal_count(), 1);
}

#[test]
fn test_group_by_until_key_selector_panic_becomes_callback_panic() {
    // Arrange
    let source = TestSource::<Pair>::new();
    let recorder = Arc::new(GroupRecorder::<&str, i32>::new());
    let _subscription = source
        .clone()
        .group_by_until(
            panicking_selector(|(_, v): &Pair| *v == 2, |(k, _): &Pair| *k, "key exploded"),
            |(_, v)| v,
            |_| Never::<()>::new(),
        )
        .subscribe(recorder.clone());
    source.next(("a", 1));

    // Act
    source.next(("a", 2));

    // Assert
    let error = recorder.error().expect("downstream error");
    assert!(matches!(error, FluxionError::CallbackPanic { .. }));
    assert!(error.to_string().contains("key selector"));
    assert!(error.to_string().contains("key exploded"));
    assert_eq!(recorder.group(0).values(), vec![1]);
    assert!(recorder.group(0).error().is_some());
}

#[test]
fn test_group_by_until_element_selector_error_reaches_the_new_group() {
    // Arrange
    let source = TestSource::<Pair>::new();
    let recorder = Arc::new(GroupRecorder::<&str, i32>::new());
    let _subscription = source
        .clone()
        .try_group_by_until(
            |(k, _)| Ok(*k),
            failing_element_selector(|(k, _): &Pair| *k == "b", |(_, v): Pair| v, "bad element"),
            |_| Ok(Never::<()>::new()),
        )
        .subscribe(recorder.clone());
    source.next(("a", 1));

    // Act
    source.next(("b", 2));

    // Assert
    assert_eq!(recorder.keys(), vec!["a", "b"]);
    assert!(recorder.group(1).values().is_empty());
    assert!(recorder.group(0).error().is_some());
    assert!(recorder.group(1).error().is_some());
    assert!(recorder
        .error()
        .is_some_and(|e| e.to_string().contains("bad element")));
}

#[test]
fn test_group_by_until_element_selector_panic_is_fatal() {
    // Arrange
    let source = TestSource::<Pair>::new();
    let recorder = Arc::new(GroupRecorder::<&str, i32>::new());
    let element = panicking_selector(|(_, v): &Pair| *v == 2, |(_, v): &Pair| *v, "boom");
    let _subscription = source
        .clone()
        .group_by_until(|(k, _)| *k, move |pair| element(&pair), |_| Never::<()>::new())
        .subscribe(recorder.clone());

    // Act
    source.next(("a", 1));
    source.next(("a", 2));

    // Assert
    assert_eq!(recorder.group(0).values(), vec![1]);
    assert!(matches!(
        recorder.error(),
        Some(FluxionError::CallbackPanic { .. })
    ));
}

#[test]
fn test_group_by_until_duration_selector_error_after_group_is_emitted() {
    // Arrange
    let source = TestSource::<Pair>::new();
    let recorder = Arc::new(GroupRecorder::<&str, i32>::new());
    let _subscription = source
        .clone()
        .try_group_by_until(
            |(k, _)| Ok(*k),
            |(_, v)| Ok(v),
            |group: &GroupHandle<&'static str, i32>| -> Result<Never<()>> {
                if *group.key() == "b" {
                    Err(selector_error("no duration for b"))
                } else {
                    Ok(Never::new())
                }
            },
        )
        .subscribe(recorder.clone());
    source.next(("a", 1));

    // Act
    source.next(("b", 2));

    // Assert
    assert_eq!(recorder.keys(), vec!["a", "b"]);
    assert!(recorder.group(1).values().is_empty());
    assert!(recorder.group(0).error().is_some());
    assert!(recorder.group(1).error().is_some());
    assert!(recorder
        .error()
        .is_some_and(|e| e.to_string().contains("no duration for b")));
}

#[test]
fn test_group_by_until_duration_error_is_fatal() {
    // Arrange
    let source = TestSource::<Pair>::new();
    let closers = Closers::new();
    let recorder = Arc::new(GroupRecorder::<&str, i32>::new());
    let _subscription = source
        .clone()
        .group_by_until(|(k, _)| *k, |(_, v)| v, closers.duration::<i32>())
        .subscribe(recorder.clone());
    source.next(("a", 1));
    source.next(("b", 2));

    // Act
    closers.fail(&"a", FluxionError::stream_error("duration broke"));
    source.next(("b", 3));

    // Assert
    assert!(recorder.group(0).error().is_some());
    assert!(!recorder.group(0).is_completed());
    assert!(recorder.group(1).error().is_some());
    assert_eq!(recorder.group(1).values(), vec![2]);
    assert!(recorder
        .error()
        .is_some_and(|e| e.to_string().contains("duration broke")));
}

#[test]
fn test_group_by_until_synchronous_duration_error_fails_the_first_group() {
    // Arrange
    let source = TestSource::<TestData>::new();
    let recorder = Arc::new(GroupRecorder::<DataVariant, TestData>::new());
    let _subscription = source
        .clone()
        .group_by_until(
            TestData::variant,
            |data| data,
            |_| Throw::<()>::new(FluxionError::stream_error("no window")),
        )
        .subscribe(recorder.clone());

    // Act
    source.next(plant_rose());
    source.next(animal_dog());

    // Assert
    assert_eq!(recorder.keys(), vec![DataVariant::Plant]);
    assert!(recorder.group(0).values().is_empty());
    assert!(recorder.group(0).error().is_some());
    assert_eq!(recorder.terminal_count(), 1);
}

#[test]
fn test_group_by_until_values_after_a_fatal_error_are_ignored() {
    // Arrange
    let source = TestSource::<Pair>::new();
    let closers = Closers::new();
    let recorder = Arc::new(GroupRecorder::<&str, i32>::new());
    let _subscription = source
        .clone()
        .group_by_until(|(k, _)| *k, |(_, v)| v, closers.duration::<i32>())
        .subscribe(recorder.clone());
    source.next(("a", 1));
    closers.fail(&"a", FluxionError::stream_error("first"));

    // Act
    source.next(("a", 2));
    source.next(("z", 3));
    source.complete();

    // Assert
    assert_eq!(recorder.keys(), vec!["a"]);
    assert_eq!(recorder.group(0).values(), vec![1]);
    assert_eq!(recorder.group(0).terminal_count(), 1);
    assert_eq!(recorder.terminal_count(), 1);
    assert!(!recorder.is_completed());
}
