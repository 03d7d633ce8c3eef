use dip_image::{Image, ImageError, ImageSize};
use dip_imgproc::fourier::{
    apply_frequency_mask, circular_mask, dft, idft, swap_quadrants, FrequencyFilter,
};
use rand::Rng;

fn random_image<const C: usize>(size: ImageSize) -> Result<Image<f64, C>, ImageError> {
    let mut rng = rand::rng();
    let data = (0..size.width * size.height * C)
        .map(|_| rng.random::<f64>())
        .collect();
    Image::new(size, data)
}

#[test]
fn test_dft_idft_round_trip() -> Result<(), ImageError> {
    let size = ImageSize {
        width: 8,
        height: 8,
    };
    let image = random_image::<1>(size)?;

    let mut spectrum = Image::<f64, 2>::from_size_val(size, 0.0)?;
    dft(&image, &mut spectrum)?;

    let mut reconstructed = Image::<f64, 1>::from_size_val(size, 0.0)?;
    idft(&spectrum, &mut reconstructed)?;

    for (a, b) in reconstructed.as_slice().iter().zip(image.as_slice()) {
        approx::assert_abs_diff_eq!(a, b, epsilon = 1e-9);
    }

    Ok(())
}

#[test]
fn test_dft_idft_round_trip_rectangular() -> Result<(), ImageError> {
    let size = ImageSize {
        width: 7,
        height: 4,
    };
    let image = random_image::<1>(size)?;

    let mut spectrum = Image::<f64, 2>::from_size_val(size, 0.0)?;
    dft(&image, &mut spectrum)?;

    let mut reconstructed = Image::<f64, 1>::from_size_val(size, 0.0)?;
    idft(&spectrum, &mut reconstructed)?;

    for (a, b) in reconstructed.as_slice().iter().zip(image.as_slice()) {
        approx::assert_abs_diff_eq!(a, b, epsilon = 1e-9);
    }

    Ok(())
}

#[test]
fn test_swap_quadrants_involution() -> Result<(), ImageError> {
    for (width, height) in [(8, 6), (5, 7), (1, 1), (4, 3)] {
        let image = random_image::<2>(ImageSize { width, height })?;

        let mut swapped = image.clone();
        swap_quadrants(&mut swapped);
        swap_quadrants(&mut swapped);

        assert_eq!(swapped, image);
    }

    Ok(())
}

#[test]
fn test_low_and_high_pass_split_the_spectrum() -> Result<(), ImageError> {
    let size = ImageSize {
        width: 8,
        height: 8,
    };
    let image = random_image::<1>(size)?;

    let mut spectrum = Image::<f64, 2>::from_size_val(size, 0.0)?;
    dft(&image, &mut spectrum)?;

    let mut low = spectrum.clone();
    apply_frequency_mask(&mut low, &circular_mask(size, 2.0, FrequencyFilter::LowPass)?)?;

    let mut high = spectrum.clone();
    apply_frequency_mask(&mut high, &circular_mask(size, 2.0, FrequencyFilter::HighPass)?)?;

    // complementary masks partition every frequency bin
    for ((l, h), s) in low
        .as_slice()
        .iter()
        .zip(high.as_slice())
        .zip(spectrum.as_slice())
    {
        approx::assert_abs_diff_eq!(l + h, *s, epsilon = 1e-12);
    }

    let mut low_image = Image::<f64, 1>::from_size_val(size, 0.0)?;
    idft(&low, &mut low_image)?;
    let mut high_image = Image::<f64, 1>::from_size_val(size, 0.0)?;
    idft(&high, &mut high_image)?;

    for ((l, h), s) in low_image
        .as_slice()
        .iter()
        .zip(high_image.as_slice())
        .zip(image.as_slice())
    {
        approx::assert_abs_diff_eq!(l + h, *s, epsilon = 1e-9);
    }

    Ok(())
}

#[test]
fn test_odd_size_low_pass_is_conjugate_symmetric() -> Result<(), ImageError> {
    for (width, height) in [(7, 5), (5, 5), (6, 3)] {
        let size = ImageSize { width, height };
        let image = random_image::<1>(size)?;

        let mut spectrum = Image::<f64, 2>::from_size_val(size, 0.0)?;
        dft(&image, &mut spectrum)?;
        apply_frequency_mask(&mut spectrum, &circular_mask(size, 2.0, FrequencyFilter::LowPass)?)?;

        // a real image keeps F(-k) == conj(F(k)) after symmetric masking
        for r in 0..height {
            for c in 0..width {
                let (rm, cm) = ((height - r) % height, (width - c) % width);
                approx::assert_abs_diff_eq!(
                    spectrum.get_pixel(c, r, 0)?,
                    spectrum.get_pixel(cm, rm, 0)?,
                    epsilon = 1e-9
                );
                approx::assert_abs_diff_eq!(
                    spectrum.get_pixel(c, r, 1)?,
                    -spectrum.get_pixel(cm, rm, 1)?,
                    epsilon = 1e-9
                );
            }
        }
    }

    Ok(())
}
