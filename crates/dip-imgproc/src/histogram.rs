use dip_image::{Image, ImageError};
use rayon::prelude::*;

use crate::parallel;

/// Number of intensity levels of an 8-bit image.
pub const NUM_BINS: usize = 256;

/// Pixel counts per 8-bit intensity level.
pub type Histogram = [usize; NUM_BINS];

/// Compute the pixel intensity histogram of an image.
///
/// NOTE: this is limited to 8-bit 1-channel images.
///
/// # Arguments
///
/// * `src` - The input image to compute the histogram.
///
/// # Returns
///
/// The number of pixels for each of the 256 intensity levels.
///
/// # Example
///
/// ```
/// use dip_image::{Image, ImageSize};
/// use dip_imgproc::histogram::compute_histogram;
///
/// let image = Image::<u8, 1>::new(
///   ImageSize {
///     width: 3,
///     height: 3,
///   },
///   vec![0, 2, 4, 128, 130, 132, 254, 255, 255],
/// ).unwrap();
///
/// let histogram = compute_histogram(&image);
/// assert_eq!(histogram[255], 2);
/// assert_eq!(histogram.iter().sum::<usize>(), 9);
/// ```
pub fn compute_histogram(src: &Image<u8, 1>) -> Histogram {
    src.as_slice()
        .par_chunks(4096)
        .fold(
            || [0usize; NUM_BINS],
            |mut local, chunk| {
                for &px in chunk {
                    local[px as usize] += 1;
                }
                local
            },
        )
        .reduce(
            || [0usize; NUM_BINS],
            |mut a, b| {
                for (acc, val) in a.iter_mut().zip(b.iter()) {
                    *acc += val;
                }
                a
            },
        )
}

/// Equalize the histogram of an image.
///
/// The cumulative distribution `cdf` of `hist` is mapped linearly onto
/// `[0, 255]`:
///
/// lut(v) = round((cdf(v) - cdf_min) / (total - cdf_min) * 255)
///
/// where `cdf_min` is the smallest non-zero cumulative count and `total` is
/// the number of pixels. Every pixel is then remapped through the lookup
/// table.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `dst` - The output image with the same size as `src`.
/// * `hist` - The histogram of `src`, see [`compute_histogram`].
///
/// # Errors
///
/// Returns [`ImageError::HistogramSizeMismatch`] if the histogram does not
/// count every pixel of `src` exactly once, and
/// [`ImageError::DegenerateHistogram`] if all pixels share one value.
///
/// # Example
///
/// ```
/// use dip_image::Image;
/// use dip_imgproc::histogram::{compute_histogram, equalize_histogram};
///
/// let image = Image::<u8, 1>::new([4, 1].into(), vec![100, 100, 101, 102]).unwrap();
/// let hist = compute_histogram(&image);
///
/// let mut equalized = Image::<u8, 1>::from_size_val(image.size(), 0).unwrap();
/// equalize_histogram(&image, &mut equalized, &hist).unwrap();
///
/// assert_eq!(equalized.as_slice(), &[0, 0, 128, 255]);
/// ```
pub fn equalize_histogram(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
    hist: &Histogram,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let num_pixels = src.rows() * src.cols();
    let counted = hist.iter().sum::<usize>();
    if counted != num_pixels {
        return Err(ImageError::HistogramSizeMismatch(counted, num_pixels));
    }

    let mut cdf = [0usize; NUM_BINS];
    let mut running = 0;
    for (acc, &count) in cdf.iter_mut().zip(hist.iter()) {
        running += count;
        *acc = running;
    }

    // first populated bucket, then the smallest cumulative count after it
    let first = cdf.iter().position(|&c| c != 0).unwrap_or(NUM_BINS - 1);
    let cdf_min = cdf[first..].iter().copied().min().unwrap_or(0);

    let total = cdf[NUM_BINS - 1];
    if total == cdf_min {
        return Err(ImageError::DegenerateHistogram(total));
    }

    let denom = (total - cdf_min) as f64;
    let mut lut = [0u8; NUM_BINS];
    for (out, &c) in lut.iter_mut().zip(cdf.iter()) {
        let level = (c as f64 - cdf_min as f64) / denom * 255.0;
        *out = level.round().clamp(0.0, 255.0) as u8;
    }

    log::debug!("histogram equalization: cdf_min {cdf_min}, total {total}");

    parallel::par_iter_rows_val(src, dst, |&src_val, dst_val| {
        *dst_val = lut[src_val as usize];
    });

    Ok(())
}
