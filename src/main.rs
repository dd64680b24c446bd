// src/main.rs
//
// Demo driver. Stubs the external collaborators (vision feed, voice
// recognizer, speech, renderer) with a synthetic street scene: a car
// closing in on the viewer and a pedestrian light that flips from red to
// green. Real deployments replace this binary and feed SceneService from
// the actual pipeline.

use anyhow::Result;
use streetsense::{Config, Detection, Rect, SceneEvent, SceneService, SignalColor};
use tokio::time::{sleep, Duration};
use tracing::info;

/// Voice-recognizer side of the trigger contract: a transcript asks for the
/// traffic situation when it contains both keywords.
fn wants_traffic_summary(transcript: &str) -> bool {
    let lowered = transcript.to_lowercase();
    lowered.contains("traffic") && lowered.contains("situation")
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "streetsense=info".into()),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };
    info!("🚦 street scene tracker starting");

    let (service, mut events) = SceneService::new(config)?;

    // Speech and renderer stubs.
    let consumer = {
        let service = service.clone();
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                match event {
                    SceneEvent::ApproachAlert { track_id, label } => {
                        info!("🔊 caution, a {} is approaching (track {})", label, track_id);
                    }
                    SceneEvent::SignalAlert { color } => match color {
                        SignalColor::Red => info!("🔊 the light is red, please wait"),
                        SignalColor::Green => info!("🔊 the light is green, you may cross"),
                    },
                    SceneEvent::TrafficSummary { text } => {
                        info!("🔊 {}", text);
                    }
                    SceneEvent::MotionVector { track_id, start, end } => {
                        info!(
                            "🎨 arrow for track {}: ({:.0},{:.0}) -> ({:.0},{:.0})",
                            track_id, start.x, start.y, end.x, end.y
                        );
                        service.vector_consumed(track_id).await;
                    }
                }
            }
        })
    };

    // Synthetic 30 fps feed, ~8 seconds of scene time.
    for frame in 0u32..240 {
        let t = frame as f32;
        let mut detections = Vec::new();

        // A car drifting toward the viewer: grows and descends steadily.
        if frame < 180 {
            let size = 90.0 + t * 1.2;
            detections.push(Detection::new(
                Rect::new(640.0 - size * 0.5, 200.0 + t * 2.0, size, size),
                "car",
                0.85,
            ));
        }
        // The pedestrian light across the street flips green mid-run.
        let light = if frame < 150 { "red light" } else { "green light" };
        detections.push(Detection::new(
            Rect::new(980.0, 120.0, 40.0, 90.0),
            light,
            0.9,
        ));

        service.process_frame(detections).await;

        // Two voice requests; the second lands inside the rate limit.
        if frame == 60 || frame == 90 {
            let transcript = "hey, how is the traffic situation?";
            if wants_traffic_summary(transcript) {
                service.request_summary().await;
            }
        }

        sleep(Duration::from_millis(33)).await;
    }

    let metrics = service.metrics_summary().await;
    info!(
        "done: {} frames, {} tracks created, {} expired, {} approach / {} signal alerts",
        metrics.frames,
        metrics.tracks_created,
        metrics.tracks_expired,
        metrics.approach_alerts,
        metrics.signal_alerts
    );

    // The consumer holds its own service handle for acknowledgements, so the
    // channel stays open; give it a moment to drain, then stop it.
    sleep(Duration::from_millis(200)).await;
    consumer.abort();
    let _ = consumer.await;
    Ok(())
}
