use dip_image::{Image, ImageDtype, ImageError};

use super::Mask;
use crate::parallel;

/// Convolve an image with a square mask.
///
/// For every pixel at least `border = dim / 2` pixels away from the image
/// edges the output is
///
/// dst(y, x) = sum_{i,j} src(y + i, x + j) * mask(i + border, j + border) / scale
///
/// with `i, j` in `[-border, border]`. The outer `border` pixels are copied
/// from `src` unchanged. Each channel is filtered independently and the sum
/// is accumulated in `f64`.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `mask` - The convolution mask.
///
/// PRECONDITION: `src` and `dst` must have the same shape.
///
/// # Example
///
/// ```
/// use dip_image::Image;
/// use dip_imgproc::filter::{convolve, kernels};
///
/// let src = Image::<f32, 1>::from_fn([3, 3].into(), |r, c| [(r * 3 + c) as f32]).unwrap();
/// let mut dst = Image::<f32, 1>::from_size_val(src.size(), 0.0).unwrap();
///
/// convolve(&src, &mut dst, &kernels::box_blur_mask3()).unwrap();
///
/// assert_eq!(dst.get_pixel(1, 1, 0).unwrap(), 4.0);
/// assert_eq!(dst.get_pixel(0, 0, 0).unwrap(), 0.0);
/// ```
pub fn convolve<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    mask: &Mask,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let border = mask.border();
    let (rows, cols) = (src.rows(), src.cols());
    let src_data = src.as_slice();

    parallel::par_for_each_row(dst, |y, dst_row| {
        dst_row.copy_from_slice(&src_data[y * cols * C..(y + 1) * cols * C]);

        if y < border || y + border >= rows || cols <= 2 * border {
            return;
        }

        for x in border..cols - border {
            let mut sum = [0.0f64; C];
            for i in 0..mask.dim() {
                let row_offset = (y + i - border) * cols;
                for j in 0..mask.dim() {
                    let weight = mask.weight(i, j);
                    let base = (row_offset + x + j - border) * C;
                    for (ch, acc) in sum.iter_mut().enumerate() {
                        *acc += src_data[base + ch].into() * weight;
                    }
                }
            }

            for (ch, acc) in sum.iter().enumerate() {
                dst_row[x * C + ch] = T::from_f64(acc / mask.scale());
            }
        }
    });

    Ok(())
}
