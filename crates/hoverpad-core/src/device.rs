//! Frame sources and preview sinks used by the capture loop.

use crate::types::Frame;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("capture device disconnected: {0}")]
    Disconnected(String),
    #[error("frame read failed: {0}")]
    ReadFailed(String),
}

/// Source of raw camera frames. `read` may block until a frame is ready.
pub trait CaptureDevice: Send {
    fn read(&mut self) -> Result<Frame, CaptureError>;
}

#[derive(Error, Debug)]
pub enum PreviewError {
    #[error("failed to open preview: {0}")]
    Open(String),
    #[error("failed to present frame: {0}")]
    Present(String),
}

/// Key reported by a preview surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Char(char),
    Other,
}

impl Key {
    /// Escape, `q` or `Q`.
    pub fn is_quit(&self) -> bool {
        matches!(self, Key::Escape | Key::Char('q') | Key::Char('Q'))
    }
}

/// On-screen preview of the annotated frame.
///
/// A surface is opened and used on the capture loop thread only.
pub trait PreviewSurface {
    fn show(&mut self, title: &str, frame: &Frame) -> Result<(), PreviewError>;

    /// Wait up to `timeout` for a key press.
    fn poll_key(&mut self, timeout: Duration) -> Option<Key>;

    fn destroy(&mut self, title: &str);
}

/// Opens the preview surface on the thread that will drive it.
pub type SurfaceOpener =
    Box<dyn FnOnce() -> Result<Box<dyn PreviewSurface>, PreviewError> + Send>;
