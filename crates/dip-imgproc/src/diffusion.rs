use dip_image::{Image, ImageError};

use crate::parallel;

/// Parameters of the anisotropic diffusion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiffusionParams {
    /// Number of diffusion steps.
    pub iterations: usize,
    /// Edge sensitivity of the conduction coefficient, must be positive.
    pub sigma: f64,
    /// Integration rate of every step.
    pub rate: f64,
}

impl Default for DiffusionParams {
    fn default() -> Self {
        Self {
            iterations: 100,
            sigma: 0.015,
            rate: 0.1,
        }
    }
}

impl DiffusionParams {
    fn validate(&self) -> Result<(), ImageError> {
        if !(self.sigma.is_finite() && self.sigma > 0.0) {
            return Err(ImageError::InvalidDiffusionParams(format!(
                "sigma must be positive and finite, got {}",
                self.sigma
            )));
        }
        if !self.rate.is_finite() {
            return Err(ImageError::InvalidDiffusionParams(format!(
                "rate must be finite, got {}",
                self.rate
            )));
        }
        Ok(())
    }
}

/// Smooth an image with Perona-Malik anisotropic diffusion.
///
/// At every step each interior pixel `p` exchanges intensity with its four
/// neighbours `n` weighted by the conduction `c = exp(-(n - p)^2 / sigma^2)`:
///
/// p' = p * (1 - rate * sum(c)) + rate * sum(c * n)
///
/// All pixels of a step read the previous step's values. Border pixels are
/// never modified, so a step only changes images of at least 3x3 pixels.
///
/// # Arguments
///
/// * `src` - The input image with values typically in `[0, 1]`.
/// * `dst` - The smoothed image with the same size as `src`.
/// * `params` - The diffusion parameters.
///
/// # Errors
///
/// Returns [`ImageError::InvalidDiffusionParams`] if `sigma` is not positive.
pub fn anisotropic_diffusion(
    src: &Image<f64, 1>,
    dst: &mut Image<f64, 1>,
    params: &DiffusionParams,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    params.validate()?;

    dst.as_slice_mut().copy_from_slice(src.as_slice());

    let (rows, cols) = (src.rows(), src.cols());
    if rows < 3 || cols < 3 {
        return Ok(());
    }

    let sigma2 = params.sigma * params.sigma;
    let rate = params.rate;
    let mut prev = src.clone();

    for iteration in 0..params.iterations {
        let prev_data = prev.as_slice();

        parallel::par_for_each_row(dst, |y, dst_row| {
            if y == 0 || y == rows - 1 {
                return;
            }

            for x in 1..cols - 1 {
                let p = prev_data[y * cols + x];
                let neighbors = [
                    prev_data[(y - 1) * cols + x],
                    prev_data[(y + 1) * cols + x],
                    prev_data[y * cols + x + 1],
                    prev_data[y * cols + x - 1],
                ];

                let mut sum_c = 0.0;
                let mut sum_cn = 0.0;
                for n in neighbors {
                    let diff = n - p;
                    let c = (-(diff * diff) / sigma2).exp();
                    sum_c += c;
                    sum_cn += c * n;
                }

                dst_row[x] = p * (1.0 - rate * sum_c) + rate * sum_cn;
            }
        });

        prev.as_slice_mut().copy_from_slice(dst.as_slice());

        log::trace!("anisotropic diffusion: iteration {}/{}", iteration + 1, params.iterations);
    }

    log::debug!(
        "anisotropic diffusion: {} iterations, sigma {}, rate {}",
        params.iterations,
        params.sigma,
        params.rate
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dip_image::ImageSize;

    #[test]
    fn test_diffusion_constant_image() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 6,
            height: 5,
        };
        let src = Image::<f64, 1>::from_size_val(size, 0.6)?;
        let mut dst = Image::<f64, 1>::from_size_val(size, 0.0)?;

        anisotropic_diffusion(&src, &mut dst, &DiffusionParams::default())?;

        for (a, b) in dst.as_slice().iter().zip(src.as_slice()) {
            approx::assert_abs_diff_eq!(a, b, epsilon = 1e-12);
        }

        Ok(())
    }

    #[test]
    fn test_diffusion_single_step() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let src = Image::<f64, 1>::new(
            [3, 3].into(),
            vec![
                0.0, 0.0, 0.0,
                0.0, 1.0, 0.0,
                0.0, 0.0, 0.0,
            ],
        )?;
        let mut dst = Image::<f64, 1>::from_size_val(src.size(), 0.0)?;

        let params = DiffusionParams {
            iterations: 1,
            sigma: 1.0,
            rate: 0.1,
        };
        anisotropic_diffusion(&src, &mut dst, &params)?;

        // four neighbours at distance 1 with c = exp(-1)
        let c = (-1.0f64).exp();
        approx::assert_abs_diff_eq!(dst.get_pixel(1, 1, 0)?, 1.0 - 0.4 * c, epsilon = 1e-12);
        assert_eq!(dst.get_pixel(0, 1, 0)?, 0.0);
        assert_eq!(dst.get_pixel(2, 2, 0)?, 0.0);

        Ok(())
    }

    #[test]
    fn test_diffusion_preserves_strong_edges() -> Result<(), ImageError> {
        let src = Image::<f64, 1>::from_fn([8, 6].into(), |_, c| [if c < 4 { 0.0 } else { 1.0 }])?;
        let mut dst = Image::<f64, 1>::from_size_val(src.size(), 0.0)?;

        // sigma far below the step height blocks conduction across the edge
        let params = DiffusionParams {
            iterations: 20,
            ..Default::default()
        };
        anisotropic_diffusion(&src, &mut dst, &params)?;

        for (a, b) in dst.as_slice().iter().zip(src.as_slice()) {
            approx::assert_abs_diff_eq!(a, b, epsilon = 1e-9);
        }

        Ok(())
    }

    #[test]
    fn test_diffusion_invalid_sigma() -> Result<(), ImageError> {
        let src = Image::<f64, 1>::from_size_val([3, 3].into(), 0.0)?;
        let mut dst = src.clone();
        let params = DiffusionParams {
            sigma: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            anisotropic_diffusion(&src, &mut dst, &params),
            Err(ImageError::InvalidDiffusionParams(_))
        ));
        Ok(())
    }
}
