// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Duration-bounded grouping for keyflux push streams.
//!
//! See [`GroupByUntilExt`] for the operator and [`GroupHandle`] for the
//! emitted groups.

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
mod comparer;
mod dispatcher;
mod downstream;
mod duration_watcher;
pub mod group_by_until;
mod group_handle;
mod logging;
mod registry;
mod selector;

pub use self::comparer::{KeyComparer, NaturalEq};
pub use self::group_by_until::{GroupByUntil, GroupByUntilExt};
pub use self::group_handle::GroupHandle;
pub use self::registry::KeyedRegistry;
