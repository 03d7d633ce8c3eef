use dip_image::{Image, ImageError};

use crate::parallel;

/// Apply gamma correction to an 8-bit image.
///
/// Every sample is mapped through
///
/// dst(x,y,c) = round(255 * (src(x,y,c) / 255) ^ (1 / gamma))
///
/// The mapping is tabulated once for the 256 possible values and applied
/// as a lookup.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `dst` - The output image with the same size as `src`.
/// * `gamma` - The gamma value, must be positive and finite.
///
/// # Errors
///
/// Returns [`ImageError::InvalidGamma`] if `gamma` is not positive and finite.
///
/// # Example
///
/// ```
/// use dip_image::Image;
/// use dip_imgproc::enhance::gamma_correction;
///
/// let image = Image::<u8, 1>::new([3, 1].into(), vec![0, 64, 255]).unwrap();
/// let mut brighter = Image::<u8, 1>::from_size_val(image.size(), 0).unwrap();
///
/// gamma_correction(&image, &mut brighter, 2.0).unwrap();
///
/// assert_eq!(brighter.as_slice(), &[0, 128, 255]);
/// ```
pub fn gamma_correction<const C: usize>(
    src: &Image<u8, C>,
    dst: &mut Image<u8, C>,
    gamma: f64,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    if !(gamma.is_finite() && gamma > 0.0) {
        return Err(ImageError::InvalidGamma(gamma));
    }

    let inv_gamma = 1.0 / gamma;
    let mut lut = [0u8; 256];
    for (v, out) in lut.iter_mut().enumerate() {
        let normalized = v as f64 / 255.0;
        *out = (255.0 * normalized.powf(inv_gamma)).round().clamp(0.0, 255.0) as u8;
    }

    parallel::par_iter_rows_val(src, dst, |&src_val, dst_val| {
        *dst_val = lut[src_val as usize];
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use dip_image::{Image, ImageError, ImageSize};

    #[test]
    fn test_gamma_correction_darkens() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::new(
            ImageSize {
                width: 2,
                height: 1,
            },
            vec![0, 128, 255, 64, 192, 32],
        )?;
        let mut dst = Image::<u8, 3>::from_size_val(image.size(), 0)?;

        super::gamma_correction(&image, &mut dst, 0.5)?;

        // 255 * (v / 255)^2
        assert_eq!(dst.as_slice(), &[0, 64, 255, 16, 145, 4]);

        Ok(())
    }

    #[test]
    fn test_gamma_correction_invalid() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::from_size_val([2, 2].into(), 10)?;
        let mut dst = Image::<u8, 1>::from_size_val(image.size(), 0)?;

        assert_eq!(
            super::gamma_correction(&image, &mut dst, 0.0),
            Err(ImageError::InvalidGamma(0.0))
        );
        assert_eq!(
            super::gamma_correction(&image, &mut dst, -1.5),
            Err(ImageError::InvalidGamma(-1.5))
        );
        assert!(super::gamma_correction(&image, &mut dst, f64::NAN).is_err());

        Ok(())
    }
}
