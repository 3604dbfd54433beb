//! hoverpad-core — Live region-of-interest overlay for gesture input.
//!
//! Computes a region of interest on each camera frame, hands the crop to a
//! classifier on a background thread and publishes the latest event and
//! image for other threads to poll.

pub mod classifier;
pub mod config;
pub mod device;
pub mod geometry;
pub mod pad;
pub mod pipeline;
pub mod publisher;
pub mod types;

pub use classifier::{Classification, Classifier, ClassifierError, NoopClassifier, Verbosity};
pub use config::PadConfig;
pub use device::{CaptureDevice, CaptureError, Key, PreviewError, PreviewSurface};
pub use geometry::{compute_roi, crop, GeometryError};
pub use pad::{HoverPad, PadError, PadReader, PadState};
pub use publisher::{Snapshot, StatePublisher};
pub use types::{Anchor, Event, Frame, Region, Size};
