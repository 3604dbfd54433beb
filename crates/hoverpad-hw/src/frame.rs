//! Raw camera buffer conversion — YUYV, RGB24 and MJPEG to RGB frames.

use hoverpad_core::Frame;

#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("invalid buffer length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("MJPEG decode failed: {0}")]
    Decode(#[from] image::ImageError),
}

/// Convert packed YUYV (4:2:2) to an RGB frame.
///
/// YUYV packs two pixels per 4 bytes: [Y0, U, Y1, V]; both pixels share
/// the chroma pair. Uses the BT.601 studio-range integer transform.
pub fn yuyv_to_rgb(yuyv: &[u8], width: u32, height: u32) -> Result<Frame, FrameError> {
    let pixels = (width * height) as usize;
    let expected = pixels * 2;
    if yuyv.len() < expected {
        return Err(FrameError::InvalidLength {
            expected,
            actual: yuyv.len(),
        });
    }

    let mut rgb = Vec::with_capacity(pixels * 3);
    for chunk in yuyv[..expected].chunks_exact(4) {
        let (y0, u, y1, v) = (chunk[0], chunk[1], chunk[2], chunk[3]);
        rgb.extend_from_slice(&yuv_to_rgb(y0, u, v));
        rgb.extend_from_slice(&yuv_to_rgb(y1, u, v));
    }
    into_frame(rgb, width, height)
}

/// Wrap a packed RGB24 buffer, ignoring trailing padding.
pub fn rgb24_to_frame(buf: &[u8], width: u32, height: u32) -> Result<Frame, FrameError> {
    let expected = (width * height * 3) as usize;
    if buf.len() < expected {
        return Err(FrameError::InvalidLength {
            expected,
            actual: buf.len(),
        });
    }
    into_frame(buf[..expected].to_vec(), width, height)
}

/// Decode one MJPEG frame.
pub fn mjpeg_to_frame(buf: &[u8]) -> Result<Frame, FrameError> {
    let decoded = image::load_from_memory_with_format(buf, image::ImageFormat::Jpeg)?;
    Ok(decoded.to_rgb8())
}

fn into_frame(data: Vec<u8>, width: u32, height: u32) -> Result<Frame, FrameError> {
    let actual = data.len();
    Frame::from_raw(width, height, data).ok_or(FrameError::InvalidLength {
        expected: (width * height * 3) as usize,
        actual,
    })
}

fn yuv_to_rgb(y: u8, u: u8, v: u8) -> [u8; 3] {
    let c = y as i32 - 16;
    let d = u as i32 - 128;
    let e = v as i32 - 128;
    let r = (298 * c + 409 * e + 128) >> 8;
    let g = (298 * c - 100 * d - 208 * e + 128) >> 8;
    let b = (298 * c + 516 * d + 128) >> 8;
    [clamp_u8(r), clamp_u8(g), clamp_u8(b)]
}

fn clamp_u8(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_yuyv_black_and_white() {
        // 2x1 image: black then white, neutral chroma
        let yuyv = vec![16, 128, 235, 128];
        let frame = yuyv_to_rgb(&yuyv, 2, 1).unwrap();
        assert_eq!(frame.get_pixel(0, 0), &Rgb([0, 0, 0]));
        assert_eq!(frame.get_pixel(1, 0), &Rgb([255, 255, 255]));
    }

    #[test]
    fn test_yuyv_red_dominant() {
        // Strong V pushes red up and green down
        let yuyv = vec![82, 90, 82, 240];
        let frame = yuyv_to_rgb(&yuyv, 2, 1).unwrap();
        let px = frame.get_pixel(0, 0);
        assert!(px[0] > 200, "{px:?}");
        assert!(px[1] < 40, "{px:?}");
    }

    #[test]
    fn test_yuyv_4x2_dimensions() {
        let yuyv = vec![128u8; 16];
        let frame = yuyv_to_rgb(&yuyv, 4, 2).unwrap();
        assert_eq!(frame.dimensions(), (4, 2));
    }

    #[test]
    fn test_yuyv_invalid_length() {
        let yuyv = vec![100, 128]; // too short for 2x1
        assert!(matches!(
            yuyv_to_rgb(&yuyv, 2, 1),
            Err(FrameError::InvalidLength {
                expected: 4,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_rgb24_ignores_padding() {
        let mut buf: Vec<u8> = (0..12).collect();
        buf.extend([0xAA; 4]);
        let frame = rgb24_to_frame(&buf, 2, 2).unwrap();
        assert_eq!(frame.get_pixel(1, 1), &Rgb([9, 10, 11]));
    }

    #[test]
    fn test_rgb24_too_short() {
        assert!(rgb24_to_frame(&[0; 5], 2, 1).is_err());
    }

    #[test]
    fn test_mjpeg_garbage_is_error() {
        assert!(matches!(
            mjpeg_to_frame(b"not a jpeg"),
            Err(FrameError::Decode(_))
        ));
    }
}
