//! Queue entry: sequence id + erased thunk.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sequence number of a submitted entry, unique per queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryId(u64);

impl EntryId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entry-{}", self.0)
    }
}

pub(crate) type Thunk<E> = Box<dyn FnOnce() -> Result<(), E>>;

/// One unit of deferred work.
///
/// When a callback was supplied it is already fused into `thunk`, so the
/// callback runs right after the work and before the next entry.
pub(crate) struct Entry<E> {
    pub(crate) id: EntryId,
    pub(crate) has_callback: bool,
    pub(crate) thunk: Thunk<E>,
}

impl<E> Entry<E> {
    pub(crate) fn new(id: EntryId, has_callback: bool, thunk: Thunk<E>) -> Self {
        Self {
            id,
            has_callback,
            thunk,
        }
    }

    pub(crate) fn execute(self) -> Result<(), E> {
        (self.thunk)()
    }
}

impl<E> fmt::Debug for Entry<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("id", &self.id)
            .field("has_callback", &self.has_callback)
            .finish_non_exhaustive()
    }
}
