use dip_image::{Image, ImageDtype};

/// Kernel for bilinear interpolation
///
/// The four integer neighbours `(floor(x), floor(y))`, `(floor(x), ceil(y))`,
/// `(ceil(x), floor(y))` and `(ceil(x), ceil(y))` are weighted by
/// `(1-fx)(1-fy)`, `(1-fx)fy`, `fx(1-fy)` and `fx*fy`. A neighbour outside
/// `[0, rows) x [0, cols)` is skipped, so samples near the border are
/// attenuated rather than clamped.
///
/// # Arguments
///
/// * `image` - The input image container.
/// * `x` - The row coordinate of the sample.
/// * `y` - The column coordinate of the sample.
///
/// # Returns
///
/// The interpolated value of every channel, in `f64`.
///
/// # Example
///
/// ```
/// use dip_image::Image;
/// use dip_imgproc::interpolation::bilinear_sample;
///
/// let image = Image::<f32, 1>::new([2, 2].into(), vec![0.0, 1.0, 2.0, 3.0]).unwrap();
///
/// assert_eq!(bilinear_sample(&image, 0.5, 0.5), [1.5]);
/// assert_eq!(bilinear_sample(&image, 1.0, 0.0), [2.0]);
/// ```
pub fn bilinear_sample<T: ImageDtype, const C: usize>(
    image: &Image<T, C>,
    x: f64,
    y: f64,
) -> [f64; C] {
    let (rows, cols) = (image.rows() as f64, image.cols() as f64);

    let (x0, x1) = (x.floor(), x.ceil());
    let (y0, y1) = (y.floor(), y.ceil());

    let fx = x - x0;
    let fy = y - y0;

    let neighbours = [
        (x0, y0, (1.0 - fx) * (1.0 - fy)),
        (x0, y1, (1.0 - fx) * fy),
        (x1, y0, fx * (1.0 - fy)),
        (x1, y1, fx * fy),
    ];

    let data = image.as_slice();
    let mut pixel = [0.0; C];

    for (px, py, weight) in neighbours {
        if px >= 0.0 && px < rows && py >= 0.0 && py < cols {
            let base = (px as usize * image.cols() + py as usize) * C;
            for (k, acc) in pixel.iter_mut().enumerate() {
                *acc += weight * data[base + k].into();
            }
        }
    }

    pixel
}
