// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities and fixtures for the keyflux workspace.
//!
//! Intended for development and testing only.
//!
//! # Key Types
//!
//! - [`RecordingObserver`] records every notification; [`GroupRecorder`]
//!   records the groups of a grouping operator and subscribes to each of them.
//! - [`EventLog`] orders events across several recorders.
//! - [`TestSource`] is a hot source driven by the test that counts
//!   subscriptions and disposals; [`CountingDisposable`] counts `dispose` calls.
//! - [`Closers`] drives per-group duration streams by key.
//! - [`selectors`] fail or panic on chosen inputs.
//! - [`CaseInsensitive`] compares string keys ignoring ASCII case.
//!
//! ## TestData
//!
//! ```rust
//! use keyflux_test_utils::test_data::{person_alice, animal_dog, DataVariant, TestData};
//!
//! let alice = person_alice();
//! assert_eq!(alice.variant(), DataVariant::Person);
//! assert_eq!(animal_dog().name(), "Dog");
//!
//! match alice {
//!     TestData::Person(p) => assert_eq!(p.name, "Alice"),
//!     _ => panic!("Expected person"),
//! }
//! ```
//!
//! ## Recording
//!
//! ```rust
//! use keyflux_core::{Observable, Observer, Subject};
//! use keyflux_test_utils::RecordingObserver;
//! use std::sync::Arc;
//!
//! let subject = Subject::<i32>::new();
//! let recorder = Arc::new(RecordingObserver::<i32>::new());
//! let _subscription = subject.subscribe(recorder.clone());
//!
//! subject.on_next(1);
//! subject.on_completed();
//!
//! assert_eq!(recorder.values(), vec![1]);
//! assert!(recorder.is_completed());
//! ```

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
pub mod animal;
pub mod closers;
pub mod comparer;
pub mod counting;
pub mod helpers;
pub mod person;
pub mod plant;
pub mod recording;
pub mod selectors;
pub mod test_data;
pub mod test_source;

pub use closers::Closers;
pub use comparer::CaseInsensitive;
pub use counting::CountingDisposable;
pub use helpers::{assert_no_element_emitted, expect_end, expect_error, expect_value};
pub use recording::{EventLog, GroupRecorder, RecordingObserver};
pub use test_data::{DataVariant, TestData};
pub use test_source::TestSource;
