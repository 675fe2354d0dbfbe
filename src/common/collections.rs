//! Hash collections used throughout the crate.
//!
//! Hashed maps use the Fx hasher; ordered maps are std's `BTreeMap`.

pub use std::collections::{BTreeMap, BTreeSet, VecDeque};

pub type HashMap<K, V> = rustc_hash::FxHashMap<K, V>;
pub type HashSet<T> = rustc_hash::FxHashSet<T>;
