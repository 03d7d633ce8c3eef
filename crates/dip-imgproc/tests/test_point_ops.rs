use dip_image::{Image, ImageError, ImageSize};
use dip_imgproc::{
    diffusion::{anisotropic_diffusion, DiffusionParams},
    enhance::gamma_correction,
    histogram::{compute_histogram, equalize_histogram},
    normalize::{find_min_max, remap_range},
};
use rand::Rng;

fn random_u8_image(size: ImageSize) -> Result<Image<u8, 1>, ImageError> {
    let mut rng = rand::rng();
    let data = (0..size.width * size.height)
        .map(|_| rng.random_range(30..=220u8))
        .collect();
    Image::new(size, data)
}

#[test]
fn test_gamma_one_is_identity() -> Result<(), ImageError> {
    let image = Image::<u8, 1>::from_fn([16, 16].into(), |r, c| [(r * 16 + c) as u8])?;
    let mut dst = Image::<u8, 1>::from_size_val(image.size(), 0)?;

    gamma_correction(&image, &mut dst, 1.0)?;

    assert_eq!(dst, image);
    Ok(())
}

#[test]
fn test_remap_range_spans_full_range() -> Result<(), ImageError> {
    let size = ImageSize {
        width: 13,
        height: 9,
    };
    let mut image = random_u8_image(size)?;
    // make sure the range is not degenerate
    image.set_pixel(0, 0, 0, 10)?;
    image.set_pixel(1, 0, 0, 240)?;

    let mut dst = Image::<u8, 1>::from_size_val(size, 0)?;
    remap_range(&image, &mut dst, 0.0, 255.0)?;

    assert_eq!(find_min_max(&dst)?, (0, 255));
    Ok(())
}

#[test]
fn test_histogram_counts_every_pixel() -> Result<(), ImageError> {
    let size = ImageSize {
        width: 31,
        height: 17,
    };
    let mut image = random_u8_image(size)?;
    image.set_pixel(0, 0, 0, 30)?;
    image.set_pixel(1, 0, 0, 220)?;

    let hist = compute_histogram(&image);
    assert_eq!(hist.iter().sum::<usize>(), size.width * size.height);

    let mut equalized = Image::<u8, 1>::from_size_val(size, 0)?;
    equalize_histogram(&image, &mut equalized, &hist)?;

    let hist_eq = compute_histogram(&equalized);
    assert_eq!(hist_eq.iter().sum::<usize>(), size.width * size.height);
    assert_eq!(find_min_max(&equalized)?, (0, 255));

    Ok(())
}

#[test]
fn test_diffusion_constant_is_fixed_point() -> Result<(), ImageError> {
    let size = ImageSize {
        width: 9,
        height: 7,
    };
    let image = Image::<f64, 1>::from_size_val(size, 0.25)?;
    let mut dst = Image::<f64, 1>::from_size_val(size, 0.0)?;

    for iterations in [0, 1, 5, 100] {
        let params = DiffusionParams {
            iterations,
            ..Default::default()
        };
        anisotropic_diffusion(&image, &mut dst, &params)?;

        for v in dst.as_slice() {
            approx::assert_abs_diff_eq!(*v, 0.25, epsilon = 1e-12);
        }
    }

    Ok(())
}
