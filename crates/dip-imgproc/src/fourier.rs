//! Discrete Fourier transform and frequency domain filtering.
//!
//! The transforms are the direct O(H²W²) sums, scaled by `1 / sqrt(H * W)`
//! in both directions so that a forward transform followed by an inverse
//! one returns the original image. A spectrum is an `Image<f64, 2>` with the
//! real part in channel 0 and the imaginary part in channel 1, indexed like
//! the spatial image with the zero frequency at `(0, 0)`.
//!
//! Masks and displayed spectra use the centred layout, where frequency bin
//! `(r, c)` sits at `((r + H / 2) % H, (c + W / 2) % W)`. This puts the zero
//! frequency at `(H / 2, W / 2)` and keeps `k` and `-k` at the same distance
//! from it for odd sizes too.
//!
//! # Example
//!
//! ```
//! use dip_image::Image;
//! use dip_imgproc::fourier::{circular_mask, apply_frequency_mask, dft, idft, FrequencyFilter};
//!
//! let image = Image::<f64, 1>::from_fn([8, 8].into(), |r, c| [((r + c) % 3) as f64]).unwrap();
//!
//! let mut spectrum = Image::<f64, 2>::from_size_val(image.size(), 0.0).unwrap();
//! dft(&image, &mut spectrum).unwrap();
//!
//! let mask = circular_mask(image.size(), 2.0, FrequencyFilter::LowPass).unwrap();
//! apply_frequency_mask(&mut spectrum, &mask).unwrap();
//!
//! let mut smoothed = Image::<f64, 1>::from_size_val(image.size(), 0.0).unwrap();
//! idft(&spectrum, &mut smoothed).unwrap();
//! ```

use std::f64::consts::PI;

use dip_image::{Image, ImageError, ImageSize};

use crate::parallel;

/// Mask entries below this value remove the matching frequency.
pub const MASK_THRESHOLD: f64 = 0.5;

/// The kind of frequency mask built by [`circular_mask`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrequencyFilter {
    /// Keep the frequencies inside the radius.
    LowPass,
    /// Keep the frequencies outside the radius.
    HighPass,
}

/// Position of frequency index `i` in the centred layout of an axis of length `n`.
fn centred(i: usize, n: usize) -> usize {
    (i + n / 2) % n
}

/// Frequency index shown at position `p` of the centred layout, the inverse of [`centred`].
fn uncentred(p: usize, n: usize) -> usize {
    (p + n - n / 2) % n
}

fn check_same_size(a: ImageSize, b: ImageSize) -> Result<(), ImageError> {
    if a != b {
        return Err(ImageError::InvalidImageSize(
            a.width, a.height, b.width, b.height,
        ));
    }
    Ok(())
}

/// Compute the forward discrete Fourier transform of a gray image.
///
/// F(r, c) = 1 / sqrt(H W) * sum_{m, n} f(m, n) * exp(-i 2 pi (m r / H + n c / W))
///
/// # Arguments
///
/// * `src` - The spatial image with shape (H, W, 1).
/// * `dst` - The spectrum with shape (H, W, 2).
///
/// PRECONDITION: `src` and `dst` must have the same size.
pub fn dft(src: &Image<f64, 1>, dst: &mut Image<f64, 2>) -> Result<(), ImageError> {
    check_same_size(src.size(), dst.size())?;

    let (rows, cols) = (src.rows(), src.cols());
    if rows == 0 || cols == 0 {
        return Ok(());
    }

    log::debug!("forward dft of a {}x{} image", cols, rows);

    let norm = 1.0 / ((rows * cols) as f64).sqrt();
    let src_data = src.as_slice();

    parallel::par_for_each_row(dst, |r, dst_row| {
        for (c, bin) in dst_row.chunks_exact_mut(2).enumerate() {
            let (mut re, mut im) = (0.0, 0.0);
            for m in 0..rows {
                let row_phase = (m * r) as f64 / rows as f64;
                for n in 0..cols {
                    let phi = 2.0 * PI * (row_phase + (n * c) as f64 / cols as f64);
                    let f = src_data[m * cols + n];
                    re += f * phi.cos();
                    im -= f * phi.sin();
                }
            }
            bin[0] = re * norm;
            bin[1] = im * norm;
        }
    });

    Ok(())
}

/// Compute the inverse discrete Fourier transform of a spectrum.
///
/// f(m, n) = 1 / sqrt(H W) * sum_{r, c} Re(r, c) cos(phi) - Im(r, c) sin(phi)
///
/// with `phi = 2 pi (m r / H + n c / W)`; only the real part is kept.
///
/// # Arguments
///
/// * `src` - The spectrum with shape (H, W, 2).
/// * `dst` - The reconstructed image with shape (H, W, 1).
///
/// PRECONDITION: `src` and `dst` must have the same size.
pub fn idft(src: &Image<f64, 2>, dst: &mut Image<f64, 1>) -> Result<(), ImageError> {
    check_same_size(src.size(), dst.size())?;

    let (rows, cols) = (src.rows(), src.cols());
    if rows == 0 || cols == 0 {
        return Ok(());
    }

    log::debug!("inverse dft of a {}x{} spectrum", cols, rows);

    let norm = 1.0 / ((rows * cols) as f64).sqrt();
    let src_data = src.as_slice();

    parallel::par_for_each_row(dst, |m, dst_row| {
        for (n, pixel) in dst_row.iter_mut().enumerate() {
            let mut acc = 0.0;
            for r in 0..rows {
                let row_phase = (m * r) as f64 / rows as f64;
                for c in 0..cols {
                    let phi = 2.0 * PI * (row_phase + (n * c) as f64 / cols as f64);
                    let idx = (r * cols + c) * 2;
                    acc += src_data[idx] * phi.cos() - src_data[idx + 1] * phi.sin();
                }
            }
            *pixel = acc * norm;
        }
    });

    Ok(())
}

/// Swap the quadrants of an image in place.
///
/// The top-left quadrant is exchanged with the bottom-right one and the
/// top-right with the bottom-left, which moves the zero frequency of a
/// spectrum to `(rows / 2, cols / 2)`. With an odd size the last row or
/// column is left where it is, so applying the swap twice always restores
/// the original layout.
///
/// For even sizes this is the centred layout used by [`apply_frequency_mask`]
/// and the spectrum views. For odd sizes it is not, since the trailing row or
/// column stays in place instead of wrapping around.
pub fn swap_quadrants<T: Copy, const C: usize>(image: &mut Image<T, C>) {
    let (half_rows, half_cols) = (image.rows() / 2, image.cols() / 2);
    let cols = image.cols();
    let data = image.as_slice_mut();

    let mut swap_pixels = |(r1, c1): (usize, usize), (r2, c2): (usize, usize)| {
        let (a, b) = ((r1 * cols + c1) * C, (r2 * cols + c2) * C);
        for ch in 0..C {
            data.swap(a + ch, b + ch);
        }
    };

    for r in 0..half_rows {
        for c in 0..half_cols {
            swap_pixels((r, c), (r + half_rows, c + half_cols));
            swap_pixels((r, c + half_cols), (r + half_rows, c));
        }
    }
}

/// Suppress frequencies of a spectrum with a centred mask.
///
/// Every bin whose mask value in the centred layout is below
/// [`MASK_THRESHOLD`] is set to zero. For even sizes this is the same as
/// swapping the quadrants, zeroing and swapping back. A mask that is
/// symmetric around `(rows / 2, cols / 2)`, like the ones built by
/// [`circular_mask`], keeps the spectrum of a real image conjugate-symmetric
/// for any size.
///
/// # Arguments
///
/// * `spectrum` - The spectrum with shape (H, W, 2), modified in place.
/// * `mask` - The centred mask with shape (H, W, 1).
pub fn apply_frequency_mask(
    spectrum: &mut Image<f64, 2>,
    mask: &Image<f64, 1>,
) -> Result<(), ImageError> {
    check_same_size(spectrum.size(), mask.size())?;

    let (rows, cols) = (spectrum.rows(), spectrum.cols());
    let mask_data = mask.as_slice();

    parallel::par_for_each_row(spectrum, |r, row| {
        let mask_row = &mask_data[centred(r, rows) * cols..][..cols];
        for (c, bin) in row.chunks_exact_mut(2).enumerate() {
            if mask_row[centred(c, cols)] < MASK_THRESHOLD {
                bin.fill(0.0);
            }
        }
    });

    Ok(())
}

/// Build a centred circular mask for [`apply_frequency_mask`].
///
/// # Arguments
///
/// * `size` - The size of the spectrum.
/// * `radius` - The radius of the circle in pixels, around `(rows / 2, cols / 2)`.
/// * `filter` - Whether the inside (low pass) or the outside (high pass) is kept.
///
/// # Returns
///
/// A mask with `1.0` on kept frequencies and `0.0` elsewhere.
pub fn circular_mask(
    size: ImageSize,
    radius: f64,
    filter: FrequencyFilter,
) -> Result<Image<f64, 1>, ImageError> {
    let (cy, cx) = ((size.height / 2) as f64, (size.width / 2) as f64);
    let radius_sq = radius * radius;

    Image::from_fn(size, |r, c| {
        let (dy, dx) = (r as f64 - cy, c as f64 - cx);
        let inside = dy * dy + dx * dx <= radius_sq;
        let keep = match filter {
            FrequencyFilter::LowPass => inside,
            FrequencyFilter::HighPass => !inside,
        };
        [if keep { 1.0 } else { 0.0 }]
    })
}

/// Write `f(re, im)` of every bin into `dst` in the centred layout.
fn centred_view(
    spectrum: &Image<f64, 2>,
    dst: &mut Image<f64, 1>,
    f: impl Fn(f64, f64) -> f64 + Send + Sync,
) -> Result<(), ImageError> {
    check_same_size(spectrum.size(), dst.size())?;

    let (rows, cols) = (spectrum.rows(), spectrum.cols());
    let bins = spectrum.as_slice();

    parallel::par_for_each_row(dst, |r, dst_row| {
        let src_row = uncentred(r, rows) * cols;
        for (c, out) in dst_row.iter_mut().enumerate() {
            let idx = (src_row + uncentred(c, cols)) * 2;
            *out = f(bins[idx], bins[idx + 1]);
        }
    });

    Ok(())
}

/// Compute a displayable power spectrum.
///
/// Writes `ln(1 + Re^2 + Im^2)` with the zero frequency moved to the centre
/// and the values scaled to `[0, 1]`.
pub fn power_spectrum(spectrum: &Image<f64, 2>, dst: &mut Image<f64, 1>) -> Result<(), ImageError> {
    centred_view(spectrum, dst, |re, im| (1.0 + re * re + im * im).ln())?;

    let max = dst.as_slice().iter().copied().fold(0.0, f64::max);
    if max > 0.0 {
        dst.as_slice_mut().iter_mut().for_each(|v| *v /= max);
    }

    Ok(())
}

/// Compute the phase of every frequency, `atan2(Im, Re)`, with the zero
/// frequency moved to the centre.
pub fn phase_spectrum(spectrum: &Image<f64, 2>, dst: &mut Image<f64, 1>) -> Result<(), ImageError> {
    centred_view(spectrum, dst, |re, im| im.atan2(re))
}
