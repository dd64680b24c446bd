// src/tracking/associator.rs
//
// Greedy IoU association of one frame's detections against a store snapshot.
// Deliberately not a global-optimal assignment: candidate pairs above the
// threshold are sorted best-IoU-first and claimed greedily, each track and
// each detection at most once per frame. Ties break on lower track id, then
// lower detection index, so the outcome never depends on map iteration
// order. Known limitation: crossing objects can swap identities where a
// Hungarian-style solver would keep them apart.

use super::track::TrackedObject;
use crate::geometry::iou;
use crate::types::Detection;
use std::cmp::Ordering;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq)]
pub struct TrackMatch {
    pub track_id: u64,
    /// Index into the frame's detection slice.
    pub detection: usize,
    pub iou: f32,
}

#[derive(Debug, Clone, Default)]
pub struct Association {
    pub matched: Vec<TrackMatch>,
    /// Detection indices that claimed no track, in input order.
    pub unmatched: Vec<usize>,
}

pub fn associate(
    detections: &[&Detection],
    tracks: &[TrackedObject],
    min_iou: f32,
) -> Association {
    let mut pairs: Vec<(u64, usize, f32)> = Vec::new();
    for track in tracks {
        for (di, det) in detections.iter().enumerate() {
            let score = iou(&track.bbox, &det.bbox);
            if score > min_iou {
                pairs.push((track.id, di, score));
            }
        }
    }

    pairs.sort_by(|a, b| {
        b.2.partial_cmp(&a.2)
            .unwrap_or(Ordering::Equal)
            .then(a.0.cmp(&b.0))
            .then(a.1.cmp(&b.1))
    });

    let mut claimed_tracks: HashSet<u64> = HashSet::new();
    let mut claimed_dets = vec![false; detections.len()];
    let mut matched = Vec::new();

    for (track_id, di, score) in pairs {
        if claimed_tracks.contains(&track_id) || claimed_dets[di] {
            continue;
        }
        claimed_tracks.insert(track_id);
        claimed_dets[di] = true;
        matched.push(TrackMatch {
            track_id,
            detection: di,
            iou: score,
        });
    }

    let unmatched = claimed_dets
        .iter()
        .enumerate()
        .filter(|(_, claimed)| !**claimed)
        .map(|(di, _)| di)
        .collect();

    Association { matched, unmatched }
}
