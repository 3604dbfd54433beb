//! hoverpad-hw — Hardware adapters for HoverPad.
//!
//! Provides a V4L2 camera implementing `CaptureDevice` and a minifb
//! preview window implementing `PreviewSurface`.

pub mod camera;
pub mod frame;
pub mod window;

pub use camera::{Camera, CameraError, DeviceInfo, PixelFormat};
pub use window::PreviewWindow;
