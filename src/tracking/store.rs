// src/tracking/store.rs

use super::track::TrackedObject;
use std::collections::HashMap;

/// Sole owner of the id-to-track mapping. Only the store creates, replaces,
/// or deletes records; every other component works on snapshots or on a
/// record it is about to commit back. Iteration order of the underlying map
/// is unspecified and nothing may depend on it.
#[derive(Debug, Default)]
pub struct TrackStore {
    tracks: HashMap<u64, TrackedObject>,
    next_id: u64,
}

impl TrackStore {
    pub fn new() -> Self {
        Self {
            tracks: HashMap::new(),
            next_id: 1,
        }
    }

    /// Hand out the next track id. Ids are never reused, even after the
    /// record they named is long gone.
    pub fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn get(&self, id: u64) -> Option<&TrackedObject> {
        self.tracks.get(&id)
    }

    pub fn upsert(&mut self, record: TrackedObject) {
        self.tracks.insert(record.id, record);
    }

    pub fn remove(&mut self, id: u64) -> Option<TrackedObject> {
        self.tracks.remove(&id)
    }

    /// Cloned view of every record, safe to iterate while the store mutates.
    pub fn snapshot(&self) -> Vec<TrackedObject> {
        self.tracks.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Drop all records. The id counter keeps counting.
    pub fn clear(&mut self) {
        self.tracks.clear();
    }
}
