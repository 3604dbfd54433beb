//! Preview window backed by `minifb`.

use hoverpad_core::{Frame, Key, PreviewError, PreviewSurface, Size};
use minifb::{KeyRepeat, Window, WindowOptions};
use std::time::Duration;

/// A native window that shows the annotated frame.
///
/// `minifb` windows belong to the thread that created them, so open this
/// inside the surface opener handed to `HoverPad::new`.
pub struct PreviewWindow {
    window: Option<Window>,
    title: String,
    buffer: Vec<u32>,
}

impl PreviewWindow {
    pub fn open(title: &str, size: Size) -> Result<Self, PreviewError> {
        let window = Window::new(
            title,
            size.width as usize,
            size.height as usize,
            WindowOptions::default(),
        )
        .map_err(|e| PreviewError::Open(e.to_string()))?;
        tracing::debug!(title, %size, "preview window opened");
        Ok(Self {
            window: Some(window),
            title: title.to_string(),
            buffer: Vec::new(),
        })
    }
}

impl PreviewSurface for PreviewWindow {
    fn show(&mut self, title: &str, frame: &Frame) -> Result<(), PreviewError> {
        let window = self
            .window
            .as_mut()
            .ok_or_else(|| PreviewError::Present("window already destroyed".into()))?;

        if title != self.title {
            window.set_title(title);
            self.title = title.to_string();
        }

        pack_rgb(frame, &mut self.buffer);
        let (width, height) = frame.dimensions();
        window
            .update_with_buffer(&self.buffer, width as usize, height as usize)
            .map_err(|e| PreviewError::Present(e.to_string()))
    }

    fn poll_key(&mut self, timeout: Duration) -> Option<Key> {
        let window = self.window.as_mut()?;
        std::thread::sleep(timeout);
        window.update();

        // Closing the window counts as a request to quit.
        if !window.is_open() {
            return Some(Key::Escape);
        }

        let shifted = window.is_key_down(minifb::Key::LeftShift)
            || window.is_key_down(minifb::Key::RightShift);
        window
            .get_keys_pressed(KeyRepeat::No)
            .into_iter()
            .map(|key| map_key(key, shifted))
            .next()
    }

    fn destroy(&mut self, title: &str) {
        if self.window.take().is_some() {
            tracing::debug!(title, "preview window closed");
        }
    }
}

fn map_key(key: minifb::Key, shifted: bool) -> Key {
    match key {
        minifb::Key::Escape => Key::Escape,
        minifb::Key::Q if shifted => Key::Char('Q'),
        minifb::Key::Q => Key::Char('q'),
        _ => Key::Other,
    }
}

/// Pack RGB pixels as `0x00RRGGBB`, the layout minifb expects.
fn pack_rgb(frame: &Frame, out: &mut Vec<u32>) {
    out.clear();
    out.extend(
        frame
            .pixels()
            .map(|p| (p[0] as u32) << 16 | (p[1] as u32) << 8 | p[2] as u32),
    );
}
