// src/config.rs

use crate::error::Error;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub viewport: ViewportConfig,
    pub tracking: TrackingConfig,
    pub alerts: AlertConfig,
    pub motion: MotionConfig,
    pub summary: SummaryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Minimum IoU for a detection to match an existing track (strict >)
    pub match_iou: f32,
    /// Seconds a track survives without a matching detection
    pub expiry_seconds: f32,
    /// Detections below this confidence are dropped before association
    pub min_confidence: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Cosine similarity against the approach reference direction must
    /// exceed this for a frame to count toward an approach alert
    pub approach_min_cosine: f32,
    /// Consecutive qualifying frames before an approach alert fires
    pub approach_confirm_frames: u32,
    /// Per-track cooldown between approach alerts
    pub approach_cooldown_seconds: f32,
    /// Re-announce a held signal color after this many consecutive frames
    pub signal_repeat_frames: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Displacement sampling cadence in matched frames
    pub sample_frames: u32,
    /// Minimum sampled displacement before a vector is worth drawing
    pub min_displacement_px: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Summaries requested inside this window are silently dropped
    pub min_interval_seconds: f32,
    /// Average per-frame movement below this reads as congested traffic
    pub congested_below_px: f32,
    /// Below this, moderate; at or above, smooth
    pub moderate_below_px: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            viewport: ViewportConfig::default(),
            tracking: TrackingConfig::default(),
            alerts: AlertConfig::default(),
            motion: MotionConfig::default(),
            summary: SummaryConfig::default(),
        }
    }
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            match_iou: 0.5,
            expiry_seconds: 3.0,
            min_confidence: 0.0, // accept everything the detector emits
        }
    }
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            approach_min_cosine: 0.9,
            approach_confirm_frames: 3,
            approach_cooldown_seconds: 3.0,
            signal_repeat_frames: 100, // a few seconds at typical frame rates
        }
    }
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            sample_frames: 5,
            min_displacement_px: 50.0,
        }
    }
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            min_interval_seconds: 5.0,
            congested_below_px: 5.0,
            moderate_below_px: 15.0,
        }
    }
}

impl TrackingConfig {
    pub fn expiry(&self) -> Duration {
        Duration::from_secs_f32(self.expiry_seconds)
    }
}

impl AlertConfig {
    pub fn approach_cooldown(&self) -> Duration {
        Duration::from_secs_f32(self.approach_cooldown_seconds)
    }
}

impl SummaryConfig {
    pub fn min_interval(&self) -> Duration {
        Duration::from_secs_f32(self.min_interval_seconds)
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {path}"))?;
        let config: Config = serde_yaml::from_str(&contents).context("failed to parse config")?;
        Ok(config)
    }

    pub fn validate(&self) -> std::result::Result<(), Error> {
        fn positive(field: &'static str, value: f32) -> std::result::Result<(), Error> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(Error::InvalidConfig {
                    field,
                    reason: format!("must be a positive number, got {value}"),
                })
            }
        }

        positive("viewport.width", self.viewport.width)?;
        positive("viewport.height", self.viewport.height)?;
        positive("tracking.expiry_seconds", self.tracking.expiry_seconds)?;
        positive("motion.min_displacement_px", self.motion.min_displacement_px)?;
        positive("summary.min_interval_seconds", self.summary.min_interval_seconds)?;
        positive("summary.congested_below_px", self.summary.congested_below_px)?;

        if !(self.tracking.match_iou > 0.0 && self.tracking.match_iou < 1.0) {
            return Err(Error::InvalidConfig {
                field: "tracking.match_iou",
                reason: format!("must be within (0, 1), got {}", self.tracking.match_iou),
            });
        }
        if self.alerts.approach_confirm_frames == 0 {
            return Err(Error::InvalidConfig {
                field: "alerts.approach_confirm_frames",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.alerts.signal_repeat_frames == 0 {
            return Err(Error::InvalidConfig {
                field: "alerts.signal_repeat_frames",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.motion.sample_frames == 0 {
            return Err(Error::InvalidConfig {
                field: "motion.sample_frames",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.summary.moderate_below_px <= self.summary.congested_below_px {
            return Err(Error::InvalidConfig {
                field: "summary.moderate_below_px",
                reason: "must exceed congested_below_px".to_string(),
            });
        }
        Ok(())
    }
}
