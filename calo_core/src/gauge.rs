//! Two-segment overflow bar geometry.
//!
//! Up to 100% the bar has a single segment. Past 100% the visual value is
//! capped at 200% and the bar is split into a normal and an overflow segment
//! in proportion to the capped value, so at 200% both halves are equal.

use serde::{Deserialize, Serialize};

/// Progress beyond which the bar stops growing the overflow segment
pub const VISUAL_CAP: f64 = 200.0;

/// Fractions of the bar occupied by each segment
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct GaugeSegments {
    pub normal: f64,
    pub overflow: f64,
}

impl GaugeSegments {
    /// Extents of both segments along a bar of `bar_width` units
    pub fn split_width(&self, bar_width: f64) -> (f64, f64) {
        if bar_width <= 0.0 {
            return (0.0, 0.0);
        }
        (self.normal * bar_width, self.overflow * bar_width)
    }
}

/// Progress value prepared for rendering
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverflowGauge {
    progress: f64,
}

impl OverflowGauge {
    /// Negative and NaN progress clamp to 0
    pub fn new(progress: f64) -> Self {
        let progress = if progress.is_nan() { 0.0 } else { progress.max(0.0) };
        Self { progress }
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Whether the uncapped progress exceeds 100%
    pub fn is_overflow(&self) -> bool {
        self.progress > 100.0
    }

    pub fn segments(&self) -> GaugeSegments {
        if !self.is_overflow() {
            return GaugeSegments {
                normal: self.progress / 100.0,
                overflow: 0.0,
            };
        }

        let capped = self.progress.min(VISUAL_CAP);
        GaugeSegments {
            normal: 100.0 / capped,
            overflow: (capped - 100.0) / capped,
        }
    }
}
