use dip_image::{Image, ImageError};

use super::{convolve, kernels};
use crate::parallel;

/// Responses of the laplacian with an absolute value below this are neutral.
pub const LAPLACIAN_EPSILON: f32 = 1e-3;

/// Marker colours used by [`laplacian_classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignColors {
    /// Colour for responses close to zero.
    pub neutral: [u8; 3],
    /// Colour for positive responses.
    pub positive: [u8; 3],
    /// Colour for negative responses.
    pub negative: [u8; 3],
}

impl Default for SignColors {
    fn default() -> Self {
        Self {
            neutral: [0, 0, 0],
            positive: [255, 255, 255],
            negative: [128, 128, 128],
        }
    }
}

/// Compute the sobel gradient magnitude.
///
/// The image is convolved with the 3x3 horizontal and vertical sobel masks
/// and combined as `sqrt(gx^2 + gy^2)`. Since the convolution copies the
/// border through, border pixels hold `sqrt(2) * |src|`.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, 1).
/// * `dst` - The destination image with shape (H, W, 1).
///
/// PRECONDITION: `src` and `dst` must have the same shape.
pub fn sobel_magnitude(src: &Image<f32, 1>, dst: &mut Image<f32, 1>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let (mask_x, mask_y) = kernels::sobel_masks3();

    let mut gx = Image::<f32, 1>::from_size_val(src.size(), 0.0)?;
    convolve(src, &mut gx, &mask_x)?;

    let mut gy = Image::<f32, 1>::from_size_val(src.size(), 0.0)?;
    convolve(src, &mut gy, &mask_y)?;

    dst.as_slice_mut()
        .iter_mut()
        .zip(gx.as_slice().iter())
        .zip(gy.as_slice().iter())
        .for_each(|((dst, &gx), &gy)| {
            *dst = (gx * gx + gy * gy).sqrt();
        });

    Ok(())
}

/// Apply the laplacian and classify the sign of every response.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, 1).
/// * `magnitude` - Receives the raw laplacian response, shape (H, W, 1).
/// * `signs` - Receives the sign visualization, shape (H, W, 3).
/// * `colors` - The marker colours for neutral, positive and negative responses.
///
/// PRECONDITION: all images must have the same size.
pub fn laplacian_classify(
    src: &Image<f32, 1>,
    magnitude: &mut Image<f32, 1>,
    signs: &mut Image<u8, 3>,
    colors: &SignColors,
) -> Result<(), ImageError> {
    if src.size() != signs.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            signs.cols(),
            signs.rows(),
        ));
    }

    convolve(src, magnitude, &kernels::laplacian_mask3())?;

    parallel::par_iter_rows(magnitude, signs, |response, color| {
        let v = response[0];
        let marker = if v.abs() < LAPLACIAN_EPSILON {
            colors.neutral
        } else if v > 0.0 {
            colors.positive
        } else {
            colors.negative
        };
        color.copy_from_slice(&marker);
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dip_image::ImageSize;

    #[test]
    fn test_sobel_magnitude() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 4,
            height: 3,
        };

        // horizontal ramp, gx = 8 in the interior
        let img = Image::<f32, 1>::from_fn(size, |_, c| [c as f32])?;
        let mut dst = Image::<f32, 1>::from_size_val(size, 0.0)?;

        sobel_magnitude(&img, &mut dst)?;

        assert_eq!(dst.get_pixel(1, 1, 0)?, 8.0);
        assert_eq!(dst.get_pixel(2, 1, 0)?, 8.0);
        // border copied through both convolutions
        approx::assert_relative_eq!(dst.get_pixel(3, 0, 0)?, 3.0 * 2f32.sqrt(), epsilon = 1e-5);
        assert_eq!(dst.get_pixel(0, 2, 0)?, 0.0);

        Ok(())
    }

    #[test]
    fn test_laplacian_classify() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 5,
            height: 3,
        };

        #[rustfmt::skip]
        let img = Image::<f32, 1>::new(
            size,
            vec![
                0.0, 0.0, 0.0, 0.0, 0.0,
                0.0, 1.0, 0.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 0.0,
            ],
        )?;

        let mut magnitude = Image::<f32, 1>::from_size_val(size, 0.0)?;
        let mut signs = Image::<u8, 3>::from_size_val(size, 7)?;
        let colors = SignColors::default();

        laplacian_classify(&img, &mut magnitude, &mut signs, &colors)?;

        assert_eq!(magnitude.get_pixel(1, 1, 0)?, -4.0);
        assert_eq!(magnitude.get_pixel(2, 1, 0)?, 1.0);
        assert_eq!(magnitude.get_pixel(3, 1, 0)?, 0.0);

        let pixel = |x: usize, y: usize| -> Result<[u8; 3], ImageError> {
            Ok([
                signs.get_pixel(x, y, 0)?,
                signs.get_pixel(x, y, 1)?,
                signs.get_pixel(x, y, 2)?,
            ])
        };
        assert_eq!(pixel(1, 1)?, colors.negative);
        assert_eq!(pixel(2, 1)?, colors.positive);
        assert_eq!(pixel(3, 1)?, colors.neutral);
        assert_eq!(pixel(0, 0)?, colors.neutral);

        Ok(())
    }
}
