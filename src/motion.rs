// src/motion.rs
//
// Periodic per-track displacement sampling for the renderer. Every fifth
// matched frame the displacement from the sampling anchor is measured; only
// movements larger than the configured floor produce an arrow. Purely a
// visualization aid: nothing here feeds back into tracking or alerts.

use crate::config::MotionConfig;
use crate::events::SceneEvent;
use crate::tracking::TrackedObject;

pub struct MotionVectorBuilder {
    sample_frames: u32,
    min_displacement: f32,
}

impl MotionVectorBuilder {
    pub fn new(config: &MotionConfig) -> Self {
        Self {
            sample_frames: config.sample_frames,
            min_displacement: config.min_displacement_px,
        }
    }

    /// Advance the sampler for one matched frame. The anchor re-bases and
    /// the counter resets on every sample, vector or not.
    pub fn advance(&self, prev: &TrackedObject, next: &mut TrackedObject) -> Option<SceneEvent> {
        next.arrow_frames = prev.arrow_frames + 1;
        let anchor = prev.arrow_anchor.unwrap_or(prev.centroid);
        next.arrow_anchor = Some(anchor);

        if next.arrow_frames < self.sample_frames {
            return None;
        }

        next.arrow_frames = 0;
        next.arrow_anchor = Some(next.centroid);

        let displacement = anchor.vector_to(next.centroid);
        if displacement.magnitude() > self.min_displacement {
            next.pending_vector = Some((anchor, next.centroid));
            Some(SceneEvent::MotionVector {
                track_id: next.id,
                start: anchor,
                end: next.centroid,
            })
        } else {
            next.pending_vector = None;
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::geometry::{Point, Rect};
    use crate::types::Detection;
    use std::time::Instant;

    fn builder() -> MotionVectorBuilder {
        MotionVectorBuilder::new(&Config::default().motion)
    }

    fn det(x: f32, y: f32) -> Detection {
        Detection::new(Rect::new(x, y, 100.0, 100.0), "car", 0.8)
    }

    fn run_frames(step_y: f32, frames: u32) -> (TrackedObject, Vec<SceneEvent>) {
        let builder = builder();
        let now = Instant::now();
        let mut track = TrackedObject::new(1, &det(300.0, 100.0), now);
        let mut events = Vec::new();

        for i in 1..=frames {
            let d = det(300.0, 100.0 + step_y * i as f32);
            let mut next = track.advanced(&d, now);
            if let Some(event) = builder.advance(&track, &mut next) {
                events.push(event);
            }
            track = next;
        }
        (track, events)
    }

    #[test]
    fn fast_track_emits_a_vector_on_the_fifth_frame() {
        // 15 px per frame: 75 px over the 5-frame window.
        let (track, events) = run_frames(15.0, 5);

        assert_eq!(events.len(), 1);
        let expected_start = Point::new(350.0, 150.0);
        let expected_end = Point::new(350.0, 225.0);
        assert_eq!(
            events[0],
            SceneEvent::MotionVector {
                track_id: 1,
                start: expected_start,
                end: expected_end,
            }
        );
        assert_eq!(track.pending_vector, Some((expected_start, expected_end)));
        // Counter and anchor reset for the next window.
        assert_eq!(track.arrow_frames, 0);
        assert_eq!(track.arrow_anchor, Some(expected_end));
    }

    #[test]
    fn slow_track_resets_the_anchor_without_a_vector() {
        // 8 px per frame: 40 px over the window, under the 50 px floor.
        let (track, events) = run_frames(8.0, 5);

        assert!(events.is_empty());
        assert!(track.pending_vector.is_none());
        assert_eq!(track.arrow_frames, 0);
        // Anchor still re-bases to the current centroid.
        assert_eq!(track.arrow_anchor, Some(Point::new(350.0, 190.0)));
    }

    #[test]
    fn no_sample_before_the_window_closes() {
        let (track, events) = run_frames(15.0, 4);
        assert!(events.is_empty());
        assert_eq!(track.arrow_frames, 4);
        // Anchor was pinned to the pre-update centroid on the first frame.
        assert_eq!(track.arrow_anchor, Some(Point::new(350.0, 150.0)));
    }

    #[test]
    fn windows_keep_rolling() {
        // Two full windows of fast movement produce two vectors.
        let (_, events) = run_frames(15.0, 10);
        assert_eq!(events.len(), 2);
    }
}
