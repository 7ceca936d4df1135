//! Per-image metric extraction
//!
//! Brightness is the mean 8-bit luma value of an image; contrast is the
//! population standard deviation of the same values. Both are measured after
//! reducing the image to single-channel grayscale, so channel weighting
//! follows the standard luma conversion.

use std::path::Path;

/// Brightness and contrast measured from one image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageMetrics {
    /// Mean luma value (0-255)
    pub brightness: f64,

    /// Population standard deviation of luma values
    pub contrast: f64,
}

/// Decode an image and measure its brightness and contrast.
///
/// Any I/O or decode failure is returned as an error carrying the offending
/// path; callers treat that as "skip this image". No retries are attempted.
pub fn extract_metrics<P: AsRef<Path>>(path: P) -> Result<ImageMetrics, String> {
    let path = path.as_ref();
    let img = image::open(path)
        .map_err(|e| format!("Failed to open image {}: {}", path.display(), e))?;

    let luma = img.to_luma8();
    if luma.as_raw().is_empty() {
        return Err(format!("Image {} contains no pixels", path.display()));
    }

    let (brightness, contrast) = luma_statistics(luma.as_raw());
    Ok(ImageMetrics {
        brightness,
        contrast,
    })
}

/// Mean and population standard deviation of a raw luma buffer.
///
/// Uses exact integer sums, so results do not drift with buffer size.
/// Returns (0.0, 0.0) for an empty buffer.
pub fn luma_statistics(pixels: &[u8]) -> (f64, f64) {
    if pixels.is_empty() {
        return (0.0, 0.0);
    }

    let mut sum: u64 = 0;
    let mut sum_sq: u64 = 0;
    for &p in pixels {
        sum += p as u64;
        sum_sq += (p as u64) * (p as u64);
    }

    let n = pixels.len() as f64;
    let mean = sum as f64 / n;
    // Population variance (divide by N); clamp against rounding in the
    // mean*mean term
    let variance = (sum_sq as f64 / n - mean * mean).max(0.0);

    (mean, variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage};
    use std::fs;
    use tempfile::tempdir;

    fn save_gray<F>(dir: &Path, name: &str, width: u32, height: u32, f: F) -> std::path::PathBuf
    where
        F: Fn(u32, u32) -> u8,
    {
        let img = GrayImage::from_fn(width, height, |x, y| Luma([f(x, y)]));
        let path = dir.join(name);
        img.save(&path).expect("failed to save test image");
        path
    }

    // ========================================================================
    // luma_statistics Tests
    // ========================================================================

    #[test]
    fn test_luma_statistics_uniform_buffer() {
        let (mean, std_dev) = luma_statistics(&[128; 1000]);

        assert_eq!(mean, 128.0);
        assert_eq!(std_dev, 0.0);
    }

    #[test]
    fn test_luma_statistics_two_point_distribution() {
        // Half 0, half 255: mean 127.5, population std dev 127.5
        let mut pixels = vec![0u8; 500];
        pixels.extend(vec![255u8; 500]);

        let (mean, std_dev) = luma_statistics(&pixels);

        assert!((mean - 127.5).abs() < 1e-9, "mean was {}", mean);
        assert!((std_dev - 127.5).abs() < 1e-9, "std dev was {}", std_dev);
    }

    #[test]
    fn test_luma_statistics_known_values() {
        // [10, 20, 30]: mean 20, variance (100+0+100)/3
        let (mean, std_dev) = luma_statistics(&[10, 20, 30]);

        assert!((mean - 20.0).abs() < 1e-9);
        assert!((std_dev - (200.0_f64 / 3.0).sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_luma_statistics_empty_buffer() {
        assert_eq!(luma_statistics(&[]), (0.0, 0.0));
    }

    #[test]
    fn test_luma_statistics_bounds() {
        let pixels: Vec<u8> = (0u8..=255).collect();

        let (mean, std_dev) = luma_statistics(&pixels);

        assert!(mean >= 0.0 && mean <= 255.0);
        assert!(std_dev >= 0.0);
    }

    // ========================================================================
    // extract_metrics Tests
    // ========================================================================

    #[test]
    fn test_extract_uniform_gray_png() {
        let dir = tempdir().unwrap();
        let path = save_gray(dir.path(), "uniform.png", 32, 32, |_, _| 200);

        let metrics = extract_metrics(&path).expect("uniform image should decode");

        assert!(
            (metrics.brightness - 200.0).abs() < 1e-9,
            "brightness was {}",
            metrics.brightness
        );
        assert!(
            metrics.contrast.abs() < 1e-9,
            "uniform image should have zero contrast, got {}",
            metrics.contrast
        );
    }

    #[test]
    fn test_extract_checkerboard_png() {
        let dir = tempdir().unwrap();
        let path = save_gray(dir.path(), "checker.png", 16, 16, |x, y| {
            if (x + y) % 2 == 0 {
                0
            } else {
                255
            }
        });

        let metrics = extract_metrics(&path).expect("checkerboard should decode");

        assert!((metrics.brightness - 127.5).abs() < 1e-9);
        assert!((metrics.contrast - 127.5).abs() < 1e-9);
    }

    #[test]
    fn test_extract_rgb_gray_pixels_map_to_same_luma() {
        // A gray RGB pixel maps to its own value under any standard luma
        // weighting
        let dir = tempdir().unwrap();
        let img = RgbImage::from_fn(16, 16, |_, _| Rgb([90, 90, 90]));
        let path = dir.path().join("gray_rgb.png");
        img.save(&path).unwrap();

        let metrics = extract_metrics(&path).expect("RGB image should decode");

        assert!(
            (metrics.brightness - 90.0).abs() < 1.0,
            "gray RGB should keep its value, got {}",
            metrics.brightness
        );
        assert!(metrics.contrast.abs() < 1.0);
    }

    #[test]
    fn test_extract_metrics_in_valid_range() {
        let dir = tempdir().unwrap();
        let path = save_gray(dir.path(), "gradient.png", 64, 64, |x, y| {
            ((x * 4 + y) % 256) as u8
        });

        let metrics = extract_metrics(&path).unwrap();

        assert!(metrics.brightness >= 0.0 && metrics.brightness <= 255.0);
        assert!(metrics.contrast >= 0.0);
    }

    #[test]
    fn test_extract_missing_file() {
        let result = extract_metrics("no_such_image.png");

        assert!(result.is_err());
        assert!(
            result.as_ref().unwrap_err().contains("no_such_image.png"),
            "error should carry the path: {:?}",
            result
        );
    }

    #[test]
    fn test_extract_corrupt_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("corrupt.jpg");
        fs::write(&path, b"this is not an image").unwrap();

        let result = extract_metrics(&path);

        assert!(result.is_err(), "garbage bytes should fail to decode");
        assert!(result.unwrap_err().contains("corrupt.jpg"));
    }
}
