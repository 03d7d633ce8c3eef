use dip_image::{Image, ImageDtype, ImageError};

use crate::{interpolation::bilinear_sample, parallel};

/// Correct radial lens distortion of an image.
///
/// Coordinates are normalized around the image centre `(cx, cy) = (cols / 2, rows / 2)`
/// by `R = sqrt(cx^2 + cy^2)`. For every destination pixel with normalized
/// radius `r`, the source pixel is looked up at
///
/// src = centre + (dst - centre) / (1 + k1 * r^2 + k2 * r^6)
///
/// and sampled bilinearly. Destination pixels whose source falls outside
/// the image are set to zero.
///
/// # Arguments
///
/// * `src` - The distorted image with shape (H, W, C).
/// * `dst` - The corrected image with shape (H, W, C).
/// * `k1` - The second order radial coefficient.
/// * `k2` - The sixth order radial coefficient.
///
/// # Example
///
/// ```
/// use dip_image::Image;
/// use dip_imgproc::undistort::undistort;
///
/// let src = Image::<u8, 3>::from_fn([6, 4].into(), |r, c| [r as u8, c as u8, 9]).unwrap();
/// let mut dst = Image::<u8, 3>::from_size_val(src.size(), 0).unwrap();
///
/// undistort(&src, &mut dst, 0.0, 0.0).unwrap();
/// assert_eq!(dst, src);
/// ```
pub fn undistort<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    k1: f64,
    k2: f64,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let (rows, cols) = (src.rows() as f64, src.cols() as f64);
    let (cx, cy) = (cols / 2.0, rows / 2.0);
    let radius = (cx * cx + cy * cy).sqrt();

    parallel::par_for_each_row(dst, |y, dst_row| {
        let dy = y as f64 - cy;
        for (x, dst_pixel) in dst_row.chunks_exact_mut(C).enumerate() {
            let dx = x as f64 - cx;

            let (xn, yn) = (dx / radius, dy / radius);
            let r2 = xn * xn + yn * yn;
            let theta = 1.0 / (1.0 + k1 * r2 + k2 * r2 * r2 * r2);

            let (sx, sy) = (cx + dx * theta, cy + dy * theta);

            if sx >= 0.0 && sx < cols && sy >= 0.0 && sy < rows {
                let sample = bilinear_sample(src, sy, sx);
                for (out, val) in dst_pixel.iter_mut().zip(sample) {
                    *out = T::from_f64(val);
                }
            } else {
                dst_pixel.fill(T::default());
            }
        }
    });

    Ok(())
}
