use crate::event::EventId;
use serde::{Deserialize, Serialize};
use std::collections::{btree_set, BTreeSet};

/// Which way a toggle went
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggled {
    /// The event is now saved
    Saved,

    /// The event is no longer saved
    Removed,
}

/// The user's bookmarked events. Serializes as a JSON array of IDs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SavedSet(BTreeSet<EventId>);

impl SavedSet {
    /// An empty set
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Read a set back from storage. Missing or unreadable data is not an
    /// error: we start over with an empty set.
    pub fn load(data: Option<&[u8]>) -> Self {
        let Some(data) = data else {
            return Self::new();
        };

        match serde_json::from_slice(data) {
            Ok(set) => set,
            Err(err) => {
                tracing::warn!(?err, "saved events were unreadable, starting empty");
                Self::new()
            }
        }
    }

    /// Flip whether `id` is saved.
    pub fn toggle(&mut self, id: EventId) -> Toggled {
        if self.0.remove(&id) {
            Toggled::Removed
        } else {
            self.0.insert(id);
            Toggled::Saved
        }
    }

    /// Returns true if the event is saved.
    pub fn contains(&self, id: EventId) -> bool {
        self.0.contains(&id)
    }

    /// An iterator over saved IDs, in ascending order.
    pub fn iter(&self) -> btree_set::Iter<'_, EventId> {
        self.0.iter()
    }

    /// Returns the number of saved events.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if nothing is saved.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<EventId> for SavedSet {
    fn from_iter<I: IntoIterator<Item = EventId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a SavedSet {
    type IntoIter = btree_set::Iter<'a, EventId>;
    type Item = &'a EventId;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
