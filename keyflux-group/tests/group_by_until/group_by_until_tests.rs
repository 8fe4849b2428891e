// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use keyflux_core::sources::{Empty, FromIter, Never};
use keyflux_core::{Observable, ObservableExt};
use keyflux_group::{GroupByUntilExt, GroupHandle};
use keyflux_test_utils::test_data::{
    animal_dog, person_alice, person_bob, plant_rose, DataVariant, TestData,
};
use keyflux_test_utils::{Closers, EventLog, GroupRecorder, TestSource};
use parking_lot::Mutex;
use std::sync::Arc;

type Pair = (&'static str, i32);

#[test]
fn test_group_by_until_routes_values_to_their_groups() {
    // Arrange
    let source = TestSource::<Pair>::new();
    let recorder = Arc::new(GroupRecorder::<&str, i32>::new());
    let _subscription = source
        .clone()
        .group_by_until(|(k, _)| *k, |(_, v)| v, |_| Never::<()>::new())
        .subscribe(recorder.clone());

    // Act
    source.next(("a", 1));
    source.next(("b", 2));
    source.next(("a", 3));
    source.next(("b", 4));
    source.next(("a", 5));

    // Assert
    assert_eq!(recorder.keys(), vec!["a", "b"]);
    assert_eq!(recorder.group(0).values(), vec![1, 3, 5]);
    assert_eq!(recorder.group(1).values(), vec![2, 4]);
    assert_eq!(recorder.terminal_count(), 0);
    assert!(!recorder.handle(0).is_closed());
}

#[test]
fn test_group_by_until_completes_groups_before_downstream() {
    // Arrange
    let source = TestSource::<TestData>::new();
    let log = EventLog::new();
    let recorder = Arc::new(GroupRecorder::<DataVariant, TestData>::with_log(log.clone()));
    let _subscription = source
        .clone()
        .group_by_until(TestData::variant, |data| data, |_| Never::<()>::new())
        .subscribe(recorder.clone());

    // Act
    source.next(person_alice());
    source.next(animal_dog());
    source.next(person_bob());
    source.complete();

    // Assert
    let entries = log.entries();
    assert_eq!(
        entries[..5],
        ["open:Person", "Person#0:next", "open:Animal", "Animal#1:next", "Person#0:next"]
    );
    let mut group_completions = entries[5..7].to_vec();
    group_completions.sort();
    assert_eq!(group_completions, ["Animal#1:completed", "Person#0:completed"]);
    assert_eq!(entries[7..], ["groups:completed"]);

    assert_eq!(recorder.group(0).values(), vec![person_alice(), person_bob()]);
    assert_eq!(recorder.terminal_count(), 1);
}

#[test]
fn test_group_by_until_reopens_key_after_duration_fires() {
    // Arrange
    let source = TestSource::<Pair>::new();
    let closers = Closers::new();
    let recorder = Arc::new(GroupRecorder::<&str, i32>::new());
    let _subscription = source
        .clone()
        .group_by_until(|(k, _)| *k, |(_, v)| v, closers.duration::<i32>())
        .subscribe(recorder.clone());

    // Act
    source.next(("a", 1));
    closers.close(&"a");
    source.next(("a", 2));

    // Assert
    assert_eq!(recorder.keys(), vec!["a", "a"]);
    assert_eq!(recorder.group(0).values(), vec![1]);
    assert!(recorder.group(0).is_completed());
    assert_eq!(recorder.group(1).values(), vec![2]);
    assert_eq!(recorder.group(1).terminal_count(), 0);
    assert!(!recorder.handle(0).same_group(&recorder.handle(1)));
    assert_eq!(closers.requested(), 2);
}

#[test]
fn test_group_by_until_duration_completion_closes_group() {
    // Arrange
    let source = TestSource::<Pair>::new();
    let closers = Closers::new();
    let recorder = Arc::new(GroupRecorder::<&str, i32>::new());
    let _subscription = source
        .clone()
        .group_by_until(|(k, _)| *k, |(_, v)| v, closers.duration::<i32>())
        .subscribe(recorder.clone());

    // Act
    source.next(("a", 1));
    source.next(("b", 2));
    closers.complete(&"a");
    source.next(("b", 3));

    // Assert
    assert!(recorder.group(0).is_completed());
    assert!(recorder.handle(0).is_closed());
    assert_eq!(recorder.group(1).values(), vec![2, 3]);
    assert!(!recorder.handle(1).is_closed());
    assert!(recorder.error().is_none());
}

#[test]
fn test_group_by_until_repeated_closing_signals_complete_once() {
    // Arrange
    let source = TestSource::<Pair>::new();
    let closers = Closers::new();
    let recorder = Arc::new(GroupRecorder::<&str, i32>::new());
    let _subscription = source
        .clone()
        .group_by_until(|(k, _)| *k, |(_, v)| v, closers.duration::<i32>())
        .subscribe(recorder.clone());
    source.next(("a", 1));

    // Act
    closers.close(&"a");
    closers.close(&"a");
    closers.complete(&"a");
    source.complete();

    // Assert
    assert_eq!(recorder.group(0).terminal_count(), 1);
    assert!(recorder.group(0).is_completed());
    assert!(recorder.is_completed());
}

#[test]
fn test_group_by_until_synchronous_duration_drops_the_opening_value() {
    // Arrange
    let source = TestSource::<Pair>::new();
    let recorder = Arc::new(GroupRecorder::<&str, i32>::new());
    let _subscription = source
        .clone()
        .group_by_until(|(k, _)| *k, |(_, v)| v, |_| Empty::<()>::new())
        .subscribe(recorder.clone());

    // Act
    source.next(("a", 1));
    source.next(("a", 2));

    // Assert
    assert_eq!(recorder.keys(), vec!["a", "a"]);
    for index in 0..2 {
        assert!(recorder.group(index).values().is_empty());
        assert!(recorder.group(index).is_completed());
    }
    assert_eq!(recorder.terminal_count(), 0);
}

#[test]
fn test_group_by_until_duration_can_observe_its_own_group() {
    // Arrange: each group closes on its first element
    let source = TestSource::<Pair>::new();
    let recorder = Arc::new(GroupRecorder::<&str, i32>::new());
    let _subscription = source
        .clone()
        .group_by_until(
            |(k, _)| *k,
            |(_, v)| v,
            |group: &GroupHandle<&'static str, i32>| group.clone(),
        )
        .subscribe(recorder.clone());

    // Act
    source.next(("a", 1));
    source.next(("a", 2));
    source.next(("b", 3));

    // Assert
    assert_eq!(recorder.keys(), vec!["a", "a", "b"]);
    assert_eq!(recorder.group(0).values(), vec![1]);
    assert_eq!(recorder.group(1).values(), vec![2]);
    assert_eq!(recorder.group(2).values(), vec![3]);
    assert!((0..3).all(|index| recorder.group(index).is_completed()));
}

#[test]
fn test_group_by_until_cold_source_runs_inside_subscribe() {
    // Arrange
    let source = FromIter::new(vec![("a", 1), ("b", 2), ("a", 3)]);
    let recorder = Arc::new(GroupRecorder::<&str, i32>::new());

    // Act
    let _subscription = source
        .group_by_until(|(k, _)| *k, |(_, v)| v, |_| Never::<()>::new())
        .subscribe(recorder.clone());

    // Assert
    assert_eq!(recorder.keys(), vec!["a", "b"]);
    assert_eq!(recorder.group(0).values(), vec![1, 3]);
    assert_eq!(recorder.group(1).values(), vec![2]);
    assert!(recorder.group(0).is_completed());
    assert!(recorder.group(1).is_completed());
    assert!(recorder.is_completed());
}

#[test]
fn test_group_by_until_downstream_may_drive_the_source_reentrantly() {
    // Arrange
    let source = TestSource::<Pair>::new();
    let feeder = source.clone();
    let keys = Arc::new(Mutex::new(Vec::new()));
    let seen = keys.clone();
    let _subscription = source
        .clone()
        .group_by_until(|(k, _)| *k, |(_, v)| v, |_| Never::<()>::new())
        .subscribe_fn(move |group| {
            seen.lock().push(*group.key());
            if *group.key() == "a" {
                feeder.next(("b", 0));
            }
        });

    // Act
    source.next(("a", 1));
    source.next(("b", 2));

    // Assert
    assert_eq!(*keys.lock(), vec!["a", "b"]);
}

#[test]
fn test_group_by_keeps_groups_open_until_completion() {
    // Arrange
    let source = TestSource::<TestData>::new();
    let recorder = Arc::new(GroupRecorder::<DataVariant, String>::new());
    let _subscription = source
        .clone()
        .group_by(TestData::variant, |data| data.name().to_string())
        .subscribe(recorder.clone());

    // Act
    source.next(person_alice());
    source.next(animal_dog());
    source.next(person_bob());
    source.next(plant_rose());

    // Assert
    assert_eq!(
        recorder.keys(),
        vec![DataVariant::Person, DataVariant::Animal, DataVariant::Plant]
    );
    assert_eq!(recorder.group(0).values(), vec!["Alice", "Bob"]);
    assert_eq!(recorder.group(2).values(), vec!["Rose"]);
    assert_eq!(recorder.terminal_count(), 0);

    source.complete();
    assert!((0..3).all(|index| recorder.group(index).is_completed()));
    assert!(recorder.is_completed());
}
