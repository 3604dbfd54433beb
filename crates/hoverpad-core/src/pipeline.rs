//! Per-frame transform: mirror, resize, annotate and crop.

use crate::geometry::{self, GeometryError};
use crate::types::{Frame, Region, Size};
use image::imageops::{self, FilterType};
use image::Rgb;

/// Outline colour of the region of interest on the preview.
pub const DEFAULT_ROI_COLOR: [u8; 3] = [74, 20, 140];
/// Outline thickness in pixels.
pub const DEFAULT_ROI_THICKNESS: u32 = 2;

/// How the region outline is drawn on the preview frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoiStyle {
    pub color: [u8; 3],
    pub thickness: u32,
}

impl Default for RoiStyle {
    fn default() -> Self {
        Self {
            color: DEFAULT_ROI_COLOR,
            thickness: DEFAULT_ROI_THICKNESS,
        }
    }
}

/// Output of one pipeline pass.
pub struct FrameOutput {
    /// Resized, mirrored frame with the region outline drawn on it.
    pub preview: Frame,
    /// Un-annotated region of interest, fed to the classifier.
    pub crop: Frame,
}

/// Transforms raw camera frames into a preview and a classifier input.
#[derive(Debug, Clone)]
pub struct FramePipeline {
    size: Size,
    region: Region,
    style: RoiStyle,
}

impl FramePipeline {
    /// Build a pipeline; `region` must fit inside `size`.
    pub fn new(size: Size, region: Region, style: RoiStyle) -> Result<Self, GeometryError> {
        if !region.fits_within(size.width, size.height) {
            return Err(GeometryError::RegionOutOfBounds {
                region,
                width: size.width,
                height: size.height,
            });
        }
        Ok(Self {
            size,
            region,
            style,
        })
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn region(&self) -> Region {
        self.region
    }

    /// Run one raw frame through the pipeline.
    pub fn process(&self, raw: &Frame) -> Result<FrameOutput, GeometryError> {
        // Mirror so on-screen motion follows the user's hand.
        let mirrored = imageops::flip_horizontal(raw);
        let resized = resize_exact(mirrored, self.size);

        // Crop before annotating: the classifier must never see the outline.
        let crop = geometry::crop(&resized, self.region)?;

        let mut preview = resized;
        draw_outline(&mut preview, self.region, self.style);

        Ok(FrameOutput { preview, crop })
    }
}

/// Resize to exactly `size` with bilinear sampling; no-op when already there.
pub fn resize_exact(frame: Frame, size: Size) -> Frame {
    if frame.dimensions() == (size.width, size.height) {
        return frame;
    }
    imageops::resize(&frame, size.width, size.height, FilterType::Triangle)
}

/// Draw the outline of `region` onto `frame`, stroking inward from its edge.
pub fn draw_outline(frame: &mut Frame, region: Region, style: RoiStyle) {
    let (fw, fh) = frame.dimensions();
    if region.width == 0 || region.height == 0 || fw == 0 || fh == 0 {
        return;
    }
    let color = Rgb(style.color);

    let left = region.x.min(fw - 1);
    let top = region.y.min(fh - 1);
    let right = region.x.saturating_add(region.width - 1).min(fw - 1);
    let bottom = region.y.saturating_add(region.height - 1).min(fh - 1);

    for inset in 0..style.thickness {
        let (l, t) = (left + inset, top + inset);
        let (Some(r), Some(b)) = (right.checked_sub(inset), bottom.checked_sub(inset)) else {
            break;
        };
        if l > r || t > b {
            break;
        }
        for x in l..=r {
            frame.put_pixel(x, t, color);
            frame.put_pixel(x, b, color);
        }
        for y in t..=b {
            frame.put_pixel(l, y, color);
            frame.put_pixel(r, y, color);
        }
    }
}
