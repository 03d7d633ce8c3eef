use dip_image::{Image, ImageError};

use crate::{interpolation::nearest_sample, parallel};

/// Pivots with a smaller magnitude than this are treated as zero.
const PIVOT_EPSILON: f64 = 1e-12;

/// Solve the linear system `a * x = b` with gaussian elimination and partial pivoting.
///
/// Returns `None` if the system is singular.
fn solve_8x8(a: &mut [f64; 64], b: &mut [f64; 8]) -> Option<[f64; 8]> {
    for i in 0..8 {
        // pivot
        let mut piv = i;
        let mut max_val = a[i * 8 + i].abs();
        for r in (i + 1)..8 {
            let v = a[r * 8 + i].abs();
            if v > max_val {
                max_val = v;
                piv = r;
            }
        }
        if max_val < PIVOT_EPSILON {
            return None;
        }
        if piv != i {
            for c in i..8 {
                a.swap(i * 8 + c, piv * 8 + c);
            }
            b.swap(i, piv);
        }

        let diag = a[i * 8 + i];
        for c in i..8 {
            a[i * 8 + c] /= diag;
        }
        b[i] /= diag;

        // eliminate below
        for r in (i + 1)..8 {
            let factor = a[r * 8 + i];
            if factor == 0.0 {
                continue;
            }
            for c in i..8 {
                a[r * 8 + c] -= factor * a[i * 8 + c];
            }
            b[r] -= factor * b[i];
        }
    }

    // back substitution
    for i in (0..8).rev() {
        for r in 0..i {
            let factor = a[r * 8 + i];
            if factor != 0.0 {
                a[r * 8 + i] = 0.0;
                b[r] -= factor * b[i];
            }
        }
    }

    Some(*b)
}

/// Compute the homography that maps four points onto four other points.
///
/// The first entry of the matrix is fixed to 1 and the remaining eight are
/// solved from the two equations every correspondence `(x, y) -> (u, v)`
/// contributes:
///
/// h1*y + h2 - h6*u*x - h7*u*y - h8*u = -x
/// h3*x + h4*y + h5 - h6*v*x - h7*v*y - h8*v = 0
///
/// # Arguments
///
/// * `from` - The four `(x, y)` points in the source plane.
/// * `to` - The four `(x, y)` points they map to.
///
/// # Returns
///
/// The 3x3 homography in row-major order.
///
/// # Errors
///
/// Returns [`ImageError::SingularHomography`] if the points are degenerate,
/// e.g. three of them are collinear, or the mapping requires a zero first entry.
pub fn get_perspective_transform(
    from: &[[f64; 2]; 4],
    to: &[[f64; 2]; 4],
) -> Result<[f64; 9], ImageError> {
    let mut a = [0.0; 64];
    let mut b = [0.0; 8];

    for (k, (&[x, y], &[u, v])) in from.iter().zip(to.iter()).enumerate() {
        let r0 = 2 * k;
        let r1 = 2 * k + 1;

        a[r0 * 8..(r0 + 1) * 8].copy_from_slice(&[y, 1.0, 0.0, 0.0, 0.0, -u * x, -u * y, -u]);
        b[r0] = -x;

        a[r1 * 8..(r1 + 1) * 8].copy_from_slice(&[0.0, 0.0, x, y, 1.0, -v * x, -v * y, -v]);
        b[r1] = 0.0;
    }

    let h = solve_8x8(&mut a, &mut b).ok_or(ImageError::SingularHomography)?;

    log::debug!("perspective transform: {:?}", h);

    Ok([1.0, h[0], h[1], h[2], h[3], h[4], h[5], h[6], h[7]])
}

/// Apply a homography to a single point.
///
/// # Arguments
///
/// * `x` - The x coordinate of the point.
/// * `y` - The y coordinate of the point.
/// * `m` - The 3x3 homography in row-major order.
///
/// # Returns
///
/// The transformed point after the division by the homogeneous weight.
pub fn transform_point(x: f64, y: f64, m: &[f64; 9]) -> (f64, f64) {
    let w = m[6] * x + m[7] * y + m[8];
    let u = (m[0] * x + m[1] * y + m[2]) / w;
    let v = (m[3] * x + m[4] * y + m[5]) / w;
    (u, v)
}

/// Resample an image through a homography with nearest-pixel lookup.
///
/// * `src` - The input image with shape (height, width, channels).
/// * `dst` - The output image with shape (new_height, new_width, channels).
/// * `m` - The 3x3 homography mapping `dst` pixel coordinates to `src` coordinates.
///
/// Destination pixels whose source lies outside `src` are left unmodified.
pub fn warp_perspective_matrix<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    m: &[f64; 9],
) where
    T: Copy + Default + Send + Sync,
{
    parallel::par_for_each_row(dst, |y, dst_row| {
        for (x, dst_pixel) in dst_row.chunks_exact_mut(C).enumerate() {
            let (u, v) = transform_point(x as f64, y as f64, m);
            if let Some(pixel) = nearest_sample(src, u, v) {
                dst_pixel.copy_from_slice(&pixel);
            }
        }
    });
}

/// Warp an image so that four source points land on four destination points.
///
/// The homography mapping `to` onto `from` is estimated with
/// [`get_perspective_transform`], then every destination pixel copies the
/// nearest source pixel. Destination pixels that map outside `src` keep their
/// previous value, which allows pasting a warped image onto an existing canvas.
///
/// * `src` - The input image with shape (height, width, channels).
/// * `dst` - The canvas image with shape (new_height, new_width, channels).
/// * `from` - Four `(x, y)` points in `src`.
/// * `to` - The four `(x, y)` points in `dst` they should land on.
///
/// # Errors
///
/// Returns [`ImageError::SingularHomography`] if the correspondences are degenerate.
///
/// # Example
///
/// ```
/// use dip_image::Image;
/// use dip_imgproc::warp::warp_perspective;
///
/// let src = Image::<u8, 3>::from_size_val([4, 4].into(), 255).unwrap();
/// let mut canvas = Image::<u8, 3>::from_size_val([8, 8].into(), 0).unwrap();
///
/// let from = [[0.0, 0.0], [3.0, 0.0], [3.0, 3.0], [0.0, 3.0]];
/// let to = [[2.0, 2.0], [5.0, 2.0], [5.0, 5.0], [2.0, 5.0]];
///
/// warp_perspective(&src, &mut canvas, &from, &to).unwrap();
///
/// assert_eq!(canvas.get_pixel(3, 3, 0).unwrap(), 255);
/// assert_eq!(canvas.get_pixel(7, 7, 0).unwrap(), 0);
/// ```
pub fn warp_perspective<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    from: &[[f64; 2]; 4],
    to: &[[f64; 2]; 4],
) -> Result<(), ImageError>
where
    T: Copy + Default + Send + Sync,
{
    let m = get_perspective_transform(to, from)?;
    warp_perspective_matrix(src, dst, &m);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dip_image::ImageSize;

    #[test]
    fn test_perspective_transform_identity() -> Result<(), ImageError> {
        let points = [[0.0, 0.0], [9.0, 0.0], [9.0, 5.0], [0.0, 5.0]];
        let m = get_perspective_transform(&points, &points)?;

        let expected = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];
        for (a, b) in m.iter().zip(expected.iter()) {
            approx::assert_abs_diff_eq!(a, b, epsilon = 1e-12);
        }
        Ok(())
    }

    #[test]
    fn test_perspective_transform_recovers_matrix() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let m_expected = [
            1.0,   0.2,   3.0,
            0.1,   1.5,  -2.0,
            0.001, 0.002, 1.0,
        ];

        let from = [[0.0, 0.0], [20.0, 0.0], [20.0, 10.0], [0.0, 10.0]];
        let mut to = [[0.0; 2]; 4];
        for (dst, &[x, y]) in to.iter_mut().zip(from.iter()) {
            let (u, v) = transform_point(x, y, &m_expected);
            *dst = [u, v];
        }

        let m = get_perspective_transform(&from, &to)?;
        for (a, b) in m.iter().zip(m_expected.iter()) {
            approx::assert_abs_diff_eq!(a, b, epsilon = 1e-9);
        }

        Ok(())
    }

    #[test]
    fn test_perspective_transform_singular() {
        let points = [[1.0, 1.0]; 4];
        assert_eq!(
            get_perspective_transform(&points, &points),
            Err(ImageError::SingularHomography)
        );
    }

    #[test]
    fn test_transform_point() {
        let m = [2.0, 0.0, 1.0, 0.0, 2.0, -1.0, 0.0, 0.0, 2.0];
        assert_eq!(transform_point(3.0, 4.0, &m), (3.5, 3.5));
    }

    #[test]
    fn test_warp_perspective_translation() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 4,
            height: 2,
        };
        let src = Image::<u8, 1>::from_fn(size, |r, c| [(r * 4 + c) as u8])?;
        let mut dst = Image::<u8, 1>::from_size_val(size, 99)?;

        let from = [[0.0, 0.0], [3.0, 0.0], [3.0, 3.0], [0.0, 3.0]];
        let to = [[1.0, 0.0], [4.0, 0.0], [4.0, 3.0], [1.0, 3.0]];

        warp_perspective(&src, &mut dst, &from, &to)?;

        #[rustfmt::skip]
        assert_eq!(
            dst.as_slice(),
            &[
                99, 0, 1, 2,
                99, 4, 5, 6,
            ]
        );

        Ok(())
    }
}
