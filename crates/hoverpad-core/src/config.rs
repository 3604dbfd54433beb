use crate::geometry::DEFAULT_ROI_RATIO;
use crate::pipeline::{RoiStyle, DEFAULT_ROI_COLOR, DEFAULT_ROI_THICKNESS};
use crate::types::{Anchor, Size};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Pad configuration. Every field has a default, so a partial TOML table
/// deserializes into a complete config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PadConfig {
    /// Size frames are resized to before the ROI is taken.
    pub size: Size,
    /// ROI size as a fraction of `size`.
    pub ratio: f64,
    /// Capture device index (`/dev/video{N}` on Linux).
    pub device_id: u32,
    pub anchor: Anchor,
    /// Ask the classifier for a diagnostic image.
    pub verbose: bool,
    /// Preview window title.
    pub title: String,
    pub roi_color: [u8; 3],
    pub roi_thickness: u32,
    /// Key poll timeout per iteration, in milliseconds.
    pub poll_timeout_ms: u64,
    /// Optional cap on loop iterations per second.
    pub max_fps: Option<u32>,
}

impl Default for PadConfig {
    fn default() -> Self {
        Self {
            size: Size::default(),
            ratio: DEFAULT_ROI_RATIO,
            device_id: 0,
            anchor: Anchor::default(),
            verbose: false,
            title: "HoverPad".to_string(),
            roi_color: DEFAULT_ROI_COLOR,
            roi_thickness: DEFAULT_ROI_THICKNESS,
            poll_timeout_ms: 10,
            max_fps: None,
        }
    }
}

impl PadConfig {
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.poll_timeout_ms)
    }

    /// Minimum duration of one iteration, if a frame-rate cap is set.
    pub fn frame_interval(&self) -> Option<Duration> {
        self.max_fps
            .filter(|&fps| fps > 0)
            .map(|fps| Duration::from_secs(1) / fps)
    }

    pub fn roi_style(&self) -> RoiStyle {
        RoiStyle {
            color: self.roi_color,
            thickness: self.roi_thickness,
        }
    }
}
