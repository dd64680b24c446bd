// src/summary.rs
//
// On-demand scene summary for the voice assistant. A stateless query over a
// track store snapshot, composed from four facts: how many objects are in
// view, how fast they are moving on average, where they sit across the
// viewport, and whether a pedestrian light is showing. Rate-limited so a
// chatty user cannot flood the speech channel; requests inside the window
// are silently dropped.

use crate::config::{SummaryConfig, ViewportConfig};
use crate::tracking::TrackedObject;
use crate::types::ObjectClass;
use std::time::{Duration, Instant};
use tracing::debug;

pub const NO_OBJECTS_MESSAGE: &str = "No objects currently detected.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlowLevel {
    Congested,
    Moderate,
    Smooth,
}

impl FlowLevel {
    fn phrase(self) -> &'static str {
        match self {
            Self::Congested => "traffic is heavy and congested",
            Self::Moderate => "traffic is moving at a moderate pace",
            Self::Smooth => "traffic is flowing smoothly",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    Left,
    Center,
    Right,
}

pub struct SummaryAggregator {
    min_interval: Duration,
    congested_below: f32,
    moderate_below: f32,
    viewport_width: f32,
    last_emitted: Option<Instant>,
}

impl SummaryAggregator {
    pub fn new(config: &SummaryConfig, viewport: &ViewportConfig) -> Self {
        Self {
            min_interval: config.min_interval(),
            congested_below: config.congested_below_px,
            moderate_below: config.moderate_below_px,
            viewport_width: viewport.width,
            last_emitted: None,
        }
    }

    /// Compose a summary, or None when the request lands inside the
    /// rate-limit window. Any emitted message, including the fixed
    /// empty-scene one, re-arms the window.
    pub fn query(&mut self, tracks: &[TrackedObject], now: Instant) -> Option<String> {
        if let Some(last) = self.last_emitted {
            if now.duration_since(last) < self.min_interval {
                debug!("summary request suppressed by rate limit");
                return None;
            }
        }
        self.last_emitted = Some(now);

        if tracks.is_empty() {
            return Some(NO_OBJECTS_MESSAGE.to_string());
        }

        let total = tracks.len();
        let flow = self.classify_flow(tracks);
        let region_phrase = self.region_phrase(tracks);
        let signal_phrase = signal_phrase(tracks);

        let mut text = format!(
            "{} object{} in view; {}; {}.",
            total,
            if total == 1 { "" } else { "s" },
            flow.phrase(),
            region_phrase,
        );
        if let Some(signal) = signal_phrase {
            text.push(' ');
            text.push_str(signal);
        }
        Some(text)
    }

    fn classify_flow(&self, tracks: &[TrackedObject]) -> FlowLevel {
        let avg = tracks.iter().map(|t| t.displacement()).sum::<f32>() / tracks.len() as f32;
        if avg < self.congested_below {
            FlowLevel::Congested
        } else if avg < self.moderate_below {
            FlowLevel::Moderate
        } else {
            FlowLevel::Smooth
        }
    }

    fn region_phrase(&self, tracks: &[TrackedObject]) -> &'static str {
        let mut left = 0usize;
        let mut center = 0usize;
        let mut right = 0usize;
        for track in tracks {
            match self.region_of(track) {
                Region::Left => left += 1,
                Region::Center => center += 1,
                Region::Right => right += 1,
            }
        }

        let total = tracks.len();
        // Strict majority: more than the other two buckets combined.
        if 2 * left > total {
            "most objects are on the left"
        } else if 2 * center > total {
            "most objects are in the center"
        } else if 2 * right > total {
            "most objects are on the right"
        } else {
            "objects are evenly distributed"
        }
    }

    fn region_of(&self, track: &TrackedObject) -> Region {
        let ratio = track.centroid.x / self.viewport_width;
        if ratio < 0.33 {
            Region::Left
        } else if ratio < 0.66 {
            Region::Center
        } else {
            Region::Right
        }
    }
}

/// A red light anywhere in view takes priority over a green one.
fn signal_phrase(tracks: &[TrackedObject]) -> Option<&'static str> {
    let mut green_seen = false;
    for track in tracks {
        match track.class {
            ObjectClass::RedLight => {
                return Some("The pedestrian light is red, please wait.");
            }
            ObjectClass::GreenLight => green_seen = true,
            ObjectClass::Other(_) => {}
        }
    }
    if green_seen {
        Some("The pedestrian light is green, you may proceed.")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::geometry::{Point, Rect};
    use crate::types::Detection;

    fn aggregator() -> SummaryAggregator {
        let config = Config::default();
        SummaryAggregator::new(&config.summary, &config.viewport)
    }

    /// Track at `x` with a fabricated per-frame displacement.
    fn moving_track(id: u64, x: f32, displacement: f32, label: &str) -> TrackedObject {
        let det = Detection::new(Rect::new(x - 20.0, 300.0, 40.0, 40.0), label, 0.9);
        let mut track = TrackedObject::new(id, &det, Instant::now());
        track.prev_centroid = Point::new(track.centroid.x, track.centroid.y - displacement);
        track
    }

    #[test]
    fn empty_scene_yields_the_fixed_message() {
        let mut agg = aggregator();
        assert_eq!(
            agg.query(&[], Instant::now()).as_deref(),
            Some(NO_OBJECTS_MESSAGE)
        );
    }

    #[test]
    fn requests_inside_the_window_are_dropped() {
        let mut agg = aggregator();
        let t0 = Instant::now();

        assert!(agg.query(&[], t0).is_some());
        assert!(agg.query(&[], t0 + Duration::from_secs(2)).is_none());
        assert!(agg.query(&[], t0 + Duration::from_secs(5)).is_some());
    }

    #[test]
    fn slow_average_reads_as_congested() {
        let mut agg = aggregator();
        let tracks = vec![
            moving_track(1, 100.0, 2.0, "car"),
            moving_track(2, 200.0, 4.0, "car"),
        ];
        let text = agg.query(&tracks, Instant::now()).unwrap();
        assert!(text.contains("heavy and congested"), "got: {text}");
    }

    #[test]
    fn flow_boundaries() {
        let agg = aggregator();
        assert_eq!(
            agg.classify_flow(&[moving_track(1, 100.0, 4.9, "car")]),
            FlowLevel::Congested
        );
        assert_eq!(
            agg.classify_flow(&[moving_track(1, 100.0, 5.0, "car")]),
            FlowLevel::Moderate
        );
        assert_eq!(
            agg.classify_flow(&[moving_track(1, 100.0, 15.0, "car")]),
            FlowLevel::Smooth
        );
    }

    #[test]
    fn strict_majority_picks_a_side() {
        let mut agg = aggregator();
        // Viewport is 1280 wide: left band ends at ~422, right starts at ~845.
        let tracks = vec![
            moving_track(1, 100.0, 20.0, "car"),
            moving_track(2, 200.0, 20.0, "car"),
            moving_track(3, 300.0, 20.0, "car"),
            moving_track(4, 900.0, 20.0, "car"),
        ];
        let text = agg.query(&tracks, Instant::now()).unwrap();
        assert!(text.contains("most objects are on the left"), "got: {text}");
    }

    #[test]
    fn no_majority_reads_as_evenly_distributed() {
        let mut agg = aggregator();
        let tracks = vec![
            moving_track(1, 100.0, 20.0, "car"),
            moving_track(2, 600.0, 20.0, "car"),
            moving_track(3, 900.0, 20.0, "car"),
        ];
        let text = agg.query(&tracks, Instant::now()).unwrap();
        assert!(text.contains("evenly distributed"), "got: {text}");
    }

    #[test]
    fn red_light_outranks_green() {
        let mut agg = aggregator();
        let tracks = vec![
            moving_track(1, 100.0, 1.0, "green light"),
            moving_track(2, 600.0, 1.0, "red light"),
        ];
        let text = agg.query(&tracks, Instant::now()).unwrap();
        assert!(text.contains("red, please wait"), "got: {text}");
    }

    #[test]
    fn green_light_invites_crossing() {
        let mut agg = aggregator();
        let tracks = vec![
            moving_track(1, 100.0, 1.0, "car"),
            moving_track(2, 600.0, 1.0, "green light"),
        ];
        let text = agg.query(&tracks, Instant::now()).unwrap();
        assert!(text.contains("green, you may proceed"), "got: {text}");
    }

    #[test]
    fn plain_scene_has_no_signal_phrase() {
        let mut agg = aggregator();
        let tracks = vec![moving_track(1, 100.0, 1.0, "car")];
        let text = agg.query(&tracks, Instant::now()).unwrap();
        assert!(!text.contains("pedestrian light"), "got: {text}");
        assert!(text.starts_with("1 object in view"), "got: {text}");
    }
}
