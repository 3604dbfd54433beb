//! Region-of-interest geometry: placement inside a frame and cropping.

use crate::types::{Anchor, Frame, Region, Size};
use image::imageops;
use thiserror::Error;

/// Fraction of each frame dimension covered by the region of interest.
pub const DEFAULT_ROI_RATIO: f64 = 0.42;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("invalid anchor {0:?} (expected one of tl, tr, bl, br)")]
    InvalidAnchor(String),
    #[error("invalid ROI ratio {0} (must be in (0, 1])")]
    InvalidRatio(f64),
    #[error("region {region:?} does not fit in a {width}x{height} frame")]
    RegionOutOfBounds {
        region: Region,
        width: u32,
        height: u32,
    },
}

/// Compute the region of interest for a frame of `size`.
///
/// Width and height are `size * ratio` rounded to the nearest pixel; the
/// rectangle is placed flush against the two edges named by `anchor`.
pub fn compute_roi(size: Size, ratio: f64, anchor: Anchor) -> Result<Region, GeometryError> {
    if !ratio.is_finite() || ratio <= 0.0 || ratio > 1.0 {
        return Err(GeometryError::InvalidRatio(ratio));
    }

    let width = scale(size.width, ratio);
    let height = scale(size.height, ratio);

    let right = size.width.saturating_sub(width);
    let bottom = size.height.saturating_sub(height);
    let (x, y) = match anchor {
        Anchor::TopLeft => (0, 0),
        Anchor::TopRight => (right, 0),
        Anchor::BottomLeft => (0, bottom),
        Anchor::BottomRight => (right, bottom),
    };

    let region = Region::new(x, y, width, height);
    if !region.fits_within(size.width, size.height) {
        return Err(GeometryError::RegionOutOfBounds {
            region,
            width: size.width,
            height: size.height,
        });
    }
    Ok(region)
}

/// Copy `region` out of `frame`.
///
/// The region must lie entirely inside the frame; nothing is clipped.
pub fn crop(frame: &Frame, region: Region) -> Result<Frame, GeometryError> {
    let (width, height) = frame.dimensions();
    if !region.fits_within(width, height) {
        return Err(GeometryError::RegionOutOfBounds {
            region,
            width,
            height,
        });
    }
    Ok(imageops::crop_imm(frame, region.x, region.y, region.width, region.height).to_image())
}

fn scale(extent: u32, ratio: f64) -> u32 {
    // f64::round rounds half away from zero
    (extent as f64 * ratio).round() as u32
}
