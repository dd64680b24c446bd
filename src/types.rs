// src/types.rs

use crate::geometry::Rect;
use serde::{Deserialize, Serialize};

/// One detector output box. Ephemeral input: consumed during a single update
/// cycle and discarded, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detection {
    pub bbox: Rect,
    pub label: String,
    pub confidence: f32,
}

impl Detection {
    pub fn new(bbox: Rect, label: impl Into<String>, confidence: f32) -> Self {
        Self {
            bbox,
            label: label.into(),
            confidence,
        }
    }

    /// Malformed detections (missing label, degenerate box, garbage score)
    /// are skipped individually; they never abort a frame update.
    pub fn is_well_formed(&self) -> bool {
        !self.label.trim().is_empty() && !self.bbox.is_degenerate() && self.confidence.is_finite()
    }
}

/// Pedestrian signal color carried by signal alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalColor {
    Red,
    Green,
}

impl SignalColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Green => "green",
        }
    }
}

/// Recognized object classes, derived exactly once at the detection boundary.
/// Alert logic switches on this variant and never re-inspects label strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectClass {
    RedLight,
    GreenLight,
    Other(String),
}

impl ObjectClass {
    /// Detector labels are free-form ("red light", "Red Pedestrian Light");
    /// anything naming a red or green light maps to the closed variants.
    pub fn from_label(label: &str) -> Self {
        let lowered = label.to_ascii_lowercase();
        if lowered.contains("light") {
            if lowered.contains("red") {
                return Self::RedLight;
            }
            if lowered.contains("green") {
                return Self::GreenLight;
            }
        }
        Self::Other(label.to_string())
    }

    pub fn is_signal(&self) -> bool {
        matches!(self, Self::RedLight | Self::GreenLight)
    }

    pub fn signal_color(&self) -> Option<SignalColor> {
        match self {
            Self::RedLight => Some(SignalColor::Red),
            Self::GreenLight => Some(SignalColor::Green),
            Self::Other(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;

    #[test]
    fn label_classification() {
        assert_eq!(ObjectClass::from_label("red light"), ObjectClass::RedLight);
        assert_eq!(
            ObjectClass::from_label("Red Pedestrian Light"),
            ObjectClass::RedLight
        );
        assert_eq!(
            ObjectClass::from_label("GREEN LIGHT"),
            ObjectClass::GreenLight
        );
        assert_eq!(
            ObjectClass::from_label("car"),
            ObjectClass::Other("car".to_string())
        );
        // "red" alone is not a signal
        assert_eq!(
            ObjectClass::from_label("red car"),
            ObjectClass::Other("red car".to_string())
        );
    }

    #[test]
    fn signal_color_mapping() {
        assert_eq!(ObjectClass::RedLight.signal_color(), Some(SignalColor::Red));
        assert_eq!(
            ObjectClass::GreenLight.signal_color(),
            Some(SignalColor::Green)
        );
        assert_eq!(ObjectClass::Other("bus".to_string()).signal_color(), None);
    }

    #[test]
    fn malformed_detections_are_rejected() {
        let good = Detection::new(Rect::new(0.0, 0.0, 10.0, 10.0), "car", 0.9);
        assert!(good.is_well_formed());

        let no_label = Detection::new(Rect::new(0.0, 0.0, 10.0, 10.0), "  ", 0.9);
        assert!(!no_label.is_well_formed());

        let flat_box = Detection::new(Rect::new(0.0, 0.0, 10.0, 0.0), "car", 0.9);
        assert!(!flat_box.is_well_formed());

        let nan_conf = Detection::new(Rect::new(0.0, 0.0, 10.0, 10.0), "car", f32::NAN);
        assert!(!nan_conf.is_well_formed());
    }
}
