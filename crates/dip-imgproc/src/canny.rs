use std::f32::consts::{FRAC_PI_4, PI};

use dip_image::{Image, ImageError};

use crate::parallel;

/// Offset added to the horizontal gradient so the angle is defined on flat regions.
const GRADIENT_EPSILON: f32 = 1e-6;

/// Value written to edge pixels.
pub const EDGE: u8 = 255;

/// Gradient magnitude thresholds of the edge detector.
///
/// Only `high` gates the edge decision; `low` is validated so the pair can be
/// shared with hysteresis based detectors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CannyThresholds {
    /// Lower gradient magnitude threshold.
    pub low: f32,
    /// Gradient magnitude an edge pixel must exceed.
    pub high: f32,
}

impl Default for CannyThresholds {
    fn default() -> Self {
        Self {
            low: 0.1,
            high: 0.3,
        }
    }
}

impl CannyThresholds {
    /// Check that both thresholds are finite and `low <= high`.
    pub fn validate(&self) -> Result<(), ImageError> {
        if !(self.low.is_finite() && self.high.is_finite() && self.low <= self.high) {
            return Err(ImageError::InvalidThresholds(self.low, self.high));
        }
        Ok(())
    }
}

/// Centred-difference gradient at `(x, y)` with neighbour indices clamped to the image.
fn gradient_at(data: &[f32], rows: usize, cols: usize, x: usize, y: usize) -> (f32, f32) {
    let (xm, xp) = (x.saturating_sub(1), (x + 1).min(cols - 1));
    let (ym, yp) = (y.saturating_sub(1), (y + 1).min(rows - 1));
    let gx = (data[y * cols + xp] - data[y * cols + xm]) / 2.0;
    let gy = (data[yp * cols + x] - data[ym * cols + x]) / 2.0;
    (gx, gy)
}

/// Compute the gradient magnitude of every pixel.
///
/// Border pixels replicate their nearest neighbour, so the magnitude of a
/// straight edge runs on up to the image border.
fn gradient_magnitude(src: &Image<f32, 1>) -> Result<Image<f32, 1>, ImageError> {
    let (rows, cols) = (src.rows(), src.cols());
    let data = src.as_slice();

    let mut magnitude = Image::<f32, 1>::from_size_val(src.size(), 0.0)?;

    parallel::par_for_each_row(&mut magnitude, |y, row| {
        for (x, out) in row.iter_mut().enumerate() {
            let (gx, gy) = gradient_at(data, rows, cols, x, y);
            *out = (gx * gx + gy * gy).sqrt();
        }
    });

    Ok(magnitude)
}

/// Interpolate between `a` and `b`, returning `a` exactly when both are equal.
fn lerp(a: f32, b: f32, alpha: f32) -> f32 {
    a + alpha * (b - a)
}

/// Detect edges with non-maximum suppression and a high threshold.
///
/// For every interior pixel the centred-difference gradient `(gx, gy)` is
/// computed and its direction `atan2(gy, gx + eps)` folded into `[0, pi)`.
/// The direction selects one of four 45 degree sectors, and the gradient
/// magnitude on both sides of the pixel along that direction is
/// interpolated from the two closest neighbours with the weight
/// `alpha = tan` of the angle inside the sector.
///
/// A pixel is an edge when its magnitude `m` satisfies
/// `m > e_plus && m >= e_minus && m > high`. The trailing `>=` keeps exactly
/// one pixel of a two pixel wide plateau, the first one past the step, so a
/// sharp step produces a single edge line in any orientation.
///
/// # Arguments
///
/// * `src` - The input grayscale image with shape (H, W, 1).
/// * `dst` - The binary edge map with shape (H, W, 1), [`EDGE`] on edges and 0 elsewhere.
/// * `thresholds` - The magnitude thresholds.
///
/// # Errors
///
/// Returns [`ImageError::InvalidThresholds`] if the thresholds are not finite
/// or `low > high`.
///
/// # Example
///
/// ```
/// use dip_image::Image;
/// use dip_imgproc::canny::{double_threshold, CannyThresholds};
///
/// let src =
///     Image::<f32, 1>::from_fn([6, 4].into(), |_, c| [if c < 3 { 0.0 } else { 1.0 }]).unwrap();
/// let mut edges = Image::<u8, 1>::from_size_val(src.size(), 0).unwrap();
///
/// double_threshold(&src, &mut edges, &CannyThresholds::default()).unwrap();
///
/// assert_eq!(edges.get_pixel(3, 1, 0).unwrap(), 255);
/// assert_eq!(edges.get_pixel(2, 1, 0).unwrap(), 0);
/// ```
pub fn double_threshold(
    src: &Image<f32, 1>,
    dst: &mut Image<u8, 1>,
    thresholds: &CannyThresholds,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    thresholds.validate()?;

    let (rows, cols) = (src.rows(), src.cols());
    let data = src.as_slice();
    let magnitude = gradient_magnitude(src)?;
    let mag = magnitude.as_slice();
    let high = thresholds.high;

    parallel::par_for_each_row(dst, |y, dst_row| {
        dst_row.fill(0);

        if y == 0 || y + 1 >= rows || cols < 3 {
            return;
        }

        let e = |r: usize, c: usize| mag[r * cols + c];

        for x in 1..cols - 1 {
            let (gx, gy) = gradient_at(data, rows, cols, x, y);

            let mut theta = gy.atan2(gx + GRADIENT_EPSILON);
            if theta < 0.0 {
                theta += PI;
            }
            if theta >= PI {
                theta -= PI;
            }

            let sector = ((theta / FRAC_PI_4) as usize).min(3);

            let (e_plus, e_minus) = match sector {
                0 => {
                    let alpha = theta.tan();
                    (
                        lerp(e(y, x + 1), e(y + 1, x + 1), alpha),
                        lerp(e(y, x - 1), e(y - 1, x - 1), alpha),
                    )
                }
                1 => {
                    let alpha = theta.cos() / theta.sin();
                    (
                        lerp(e(y + 1, x), e(y + 1, x + 1), alpha),
                        lerp(e(y - 1, x), e(y - 1, x - 1), alpha),
                    )
                }
                2 => {
                    let alpha = (theta.cos() / theta.sin()).abs();
                    (
                        lerp(e(y + 1, x), e(y + 1, x - 1), alpha),
                        lerp(e(y - 1, x), e(y - 1, x + 1), alpha),
                    )
                }
                _ => {
                    let alpha = (PI - theta).tan();
                    (
                        lerp(e(y, x - 1), e(y + 1, x - 1), alpha),
                        lerp(e(y, x + 1), e(y - 1, x + 1), alpha),
                    )
                }
            };

            let m = e(y, x);
            if m > e_plus && m >= e_minus && m > high {
                dst_row[x] = EDGE;
            }
        }
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dip_image::ImageSize;

    #[test]
    fn test_gradient_magnitude() -> Result<(), ImageError> {
        let src = Image::<f32, 1>::from_fn([4, 3].into(), |r, c| [(2 * r + c) as f32])?;
        let magnitude = gradient_magnitude(&src)?;

        // gx = 1, gy = 2
        approx::assert_relative_eq!(magnitude.get_pixel(1, 1, 0)?, 5f32.sqrt());
        approx::assert_relative_eq!(magnitude.get_pixel(2, 1, 0)?, 5f32.sqrt());

        // clamped neighbours halve the difference across the border
        approx::assert_relative_eq!(magnitude.get_pixel(0, 1, 0)?, 4.25f32.sqrt());
        approx::assert_relative_eq!(magnitude.get_pixel(1, 0, 0)?, 2f32.sqrt());
        approx::assert_relative_eq!(magnitude.get_pixel(3, 2, 0)?, 1.25f32.sqrt());
        Ok(())
    }

    #[test]
    fn test_double_threshold_step() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 10,
            height: 6,
        };
        let src = Image::<f32, 1>::from_fn(size, |_, c| [if c < 5 { 0.0 } else { 1.0 }])?;
        let mut dst = Image::<u8, 1>::from_size_val(size, 7)?;

        double_threshold(&src, &mut dst, &CannyThresholds::default())?;

        for y in 0..size.height {
            for x in 0..size.width {
                let expected = if x == 5 && y > 0 && y < size.height - 1 {
                    EDGE
                } else {
                    0
                };
                assert_eq!(dst.get_pixel(x, y, 0)?, expected);
            }
        }

        Ok(())
    }

    #[test]
    fn test_double_threshold_horizontal_step() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 8,
            height: 16,
        };
        let thresholds = CannyThresholds {
            low: 0.1,
            high: 0.2,
        };

        for (top, bottom) in [(0.0, 1.0), (1.0, 0.0), (0.2, 0.9), (0.9, 0.2), (0.0, 0.7)] {
            let src =
                Image::<f32, 1>::from_fn(size, |r, _| [if r < 9 { top } else { bottom }])?;
            let mut dst = Image::<u8, 1>::from_size_val(size, 7)?;

            double_threshold(&src, &mut dst, &thresholds)?;

            for y in 0..size.height {
                for x in 0..size.width {
                    let expected = if y == 9 && x > 0 && x < size.width - 1 {
                        EDGE
                    } else {
                        0
                    };
                    assert_eq!(dst.get_pixel(x, y, 0)?, expected, "({x}, {y}) {top}->{bottom}");
                }
            }
        }

        Ok(())
    }

    #[test]
    fn test_double_threshold_high_gate() -> Result<(), ImageError> {
        let src = Image::<f32, 1>::from_fn([8, 5].into(), |_, c| [if c < 4 { 0.0 } else { 0.4 }])?;
        let mut dst = Image::<u8, 1>::from_size_val(src.size(), 0)?;

        // step magnitude is 0.2
        let thresholds = CannyThresholds {
            low: 0.1,
            high: 0.25,
        };
        double_threshold(&src, &mut dst, &thresholds)?;
        assert!(dst.as_slice().iter().all(|&v| v == 0));

        let thresholds = CannyThresholds {
            low: 0.1,
            high: 0.15,
        };
        double_threshold(&src, &mut dst, &thresholds)?;
        assert_eq!(dst.get_pixel(4, 2, 0)?, EDGE);

        Ok(())
    }

    #[test]
    fn test_double_threshold_invalid_thresholds() -> Result<(), ImageError> {
        let src = Image::<f32, 1>::from_size_val([3, 3].into(), 0.0)?;
        let mut dst = Image::<u8, 1>::from_size_val(src.size(), 0)?;

        let thresholds = CannyThresholds {
            low: 0.5,
            high: 0.2,
        };
        assert_eq!(
            double_threshold(&src, &mut dst, &thresholds),
            Err(ImageError::InvalidThresholds(0.5, 0.2))
        );
        Ok(())
    }
}
