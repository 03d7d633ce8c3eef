use dip_image::Image;

/// Kernel for nearest neighbor interpolation
///
/// # Arguments
///
/// * `image` - The input image container.
/// * `u` - The column coordinate of the sample.
/// * `v` - The row coordinate of the sample.
///
/// # Returns
///
/// The samples of the closest pixel, or `None` when it lies outside the image.
pub fn nearest_sample<T: Copy + Default, const C: usize>(
    image: &Image<T, C>,
    u: f64,
    v: f64,
) -> Option<[T; C]> {
    let iu = u.round();
    let iv = v.round();

    if !(iu >= 0.0 && iu < image.cols() as f64 && iv >= 0.0 && iv < image.rows() as f64) {
        return None;
    }

    let base = (iv as usize * image.cols() + iu as usize) * C;
    let mut pixel = [T::default(); C];
    pixel.copy_from_slice(&image.as_slice()[base..base + C]);

    Some(pixel)
}
