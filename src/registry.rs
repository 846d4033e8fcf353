use crate::Serial;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// A keyed store of live objects that an allocator probes for collisions.
///
/// Lookups must be synchronous and free of side effects.
pub trait Registry {
    type Object;

    /// Returns the object currently bound to `serial`, if any.
    fn lookup(&self, serial: Serial) -> Option<&Self::Object>;

    /// Returns true if `serial` is already taken.
    fn contains(&self, serial: Serial) -> bool {
        self.lookup(serial).is_some()
    }
}

impl<T, S: BuildHasher> Registry for HashMap<Serial, T, S> {
    type Object = T;

    fn lookup(&self, serial: Serial) -> Option<&T> {
        self.get(&serial)
    }
}

impl<T> Registry for BTreeMap<Serial, T> {
    type Object = T;

    fn lookup(&self, serial: Serial) -> Option<&T> {
        self.get(&serial)
    }
}
