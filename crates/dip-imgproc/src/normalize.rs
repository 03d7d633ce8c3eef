use dip_image::{Image, ImageDtype, ImageError};

use crate::parallel;

/// Find the minimum and maximum values in an image.
///
/// # Arguments
///
/// * `image` - The input image of shape (height, width, channels).
///
/// # Returns
///
/// A tuple containing the minimum and maximum values over all samples.
///
/// # Errors
///
/// If the image has no samples, an error is returned.
///
/// # Example
///
/// ```
/// use dip_image::{Image, ImageSize};
/// use dip_imgproc::normalize::find_min_max;
///
/// let image = Image::<u8, 3>::new(
///     ImageSize {
///         width: 2,
///         height: 2,
///     },
///     vec![0u8, 1, 0, 1, 2, 3, 0, 1, 0, 1, 2, 3],
/// )
/// .unwrap();
///
/// let (min, max) = find_min_max(&image).unwrap();
/// assert_eq!(min, 0);
/// assert_eq!(max, 3);
/// ```
pub fn find_min_max<T, const C: usize>(image: &Image<T, C>) -> Result<(T, T), ImageError>
where
    T: Copy + PartialOrd,
{
    let first_element = match image.as_slice().first() {
        Some(x) => x,
        None => return Err(ImageError::ImageDataNotInitialized),
    };

    let mut min = first_element;
    let mut max = first_element;

    for x in image.as_slice().iter() {
        if x < min {
            min = x;
        }
        if x > max {
            max = x;
        }
    }

    Ok((*min, *max))
}

/// Linearly remap the gray range of an image.
///
/// Every sample is transformed as
///
/// new = (old - old_min) * (new_max - new_min) / (old_max - old_min) + new_min
///
/// where `old_min` and `old_max` are the actual extremes of `src`. The
/// arithmetic is done in `f64` and written back with [`ImageDtype::from_f64`].
///
/// # Arguments
///
/// * `src` - The input image of shape (height, width, channels).
/// * `dst` - The output image of shape (height, width, channels).
/// * `new_min` - The value the darkest sample is mapped to.
/// * `new_max` - The value the brightest sample is mapped to.
///
/// # Errors
///
/// Returns [`ImageError::DegenerateRange`] if every sample has the same value.
///
/// # Example
///
/// ```
/// use dip_image::Image;
/// use dip_imgproc::normalize::remap_range;
///
/// let image = Image::<u8, 1>::new([4, 1].into(), vec![50, 100, 150, 200]).unwrap();
/// let mut stretched = Image::<u8, 1>::from_size_val(image.size(), 0).unwrap();
///
/// remap_range(&image, &mut stretched, 0.0, 255.0).unwrap();
///
/// assert_eq!(stretched.as_slice(), &[0, 85, 170, 255]);
/// ```
pub fn remap_range<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    new_min: f64,
    new_max: f64,
) -> Result<(), ImageError>
where
    T: ImageDtype + PartialOrd,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let (min_val, max_val) = find_min_max(src)?;
    let (old_min, old_max): (f64, f64) = (min_val.into(), max_val.into());

    if old_max == old_min {
        return Err(ImageError::DegenerateRange(old_min));
    }

    let factor = (new_max - new_min) / (old_max - old_min);

    parallel::par_iter_rows_val(src, dst, |&src_val, dst_val| {
        let old: f64 = src_val.into();
        *dst_val = T::from_f64((old - old_min) * factor + new_min);
    });

    Ok(())
}
