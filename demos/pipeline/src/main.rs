use argh::FromArgs;

use dip::{
    image::{Image, ImageSize},
    imgproc::{
        canny::{double_threshold, CannyThresholds, EDGE},
        color::gray_from_rgb_u8,
        diffusion::{anisotropic_diffusion, DiffusionParams},
        enhance::gamma_correction,
        filter::{convolve, kernels, laplacian_classify, sobel_magnitude, SignColors},
        fourier::{
            apply_frequency_mask, circular_mask, dft, idft, phase_spectrum, power_spectrum,
            FrequencyFilter,
        },
        histogram::{compute_histogram, equalize_histogram},
        normalize::{find_min_max, remap_range},
        undistort::undistort,
        warp::warp_perspective,
    },
};

#[derive(FromArgs)]
/// Run every image processing kernel on a synthetic image and log the results
struct Args {
    /// side length of the square test image
    #[argh(option, default = "64")]
    size: usize,

    /// gamma value for the gamma correction
    #[argh(option, default = "2.2")]
    gamma: f64,

    /// second order radial distortion coefficient
    #[argh(option, default = "0.3")]
    k1: f64,

    /// sixth order radial distortion coefficient
    #[argh(option, default = "0.05")]
    k2: f64,

    /// low gradient threshold of the edge detector
    #[argh(option, default = "0.1")]
    low: f32,

    /// high gradient threshold of the edge detector
    #[argh(option, default = "0.3")]
    high: f32,

    /// radius of the low pass frequency mask
    #[argh(option, default = "8.0")]
    radius: f64,

    /// number of anisotropic diffusion iterations
    #[argh(option, default = "100")]
    iterations: usize,
}

/// A dim horizontal ramp with a bright square in the middle.
fn synthetic_gray(size: ImageSize) -> Result<Image<u8, 1>, Box<dyn std::error::Error>> {
    let (w, h) = (size.width, size.height);
    let img = Image::from_fn(size, |r, c| {
        let inside = r >= h / 4 && r < 3 * h / 4 && c >= w / 4 && c < 3 * w / 4;
        let ramp = 40 + (c * 80) / w.max(1);
        [if inside { 200 } else { ramp as u8 }]
    })?;
    Ok(img)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Args = argh::from_env();

    let size = ImageSize {
        width: args.size,
        height: args.size,
    };

    let rgb = Image::<u8, 3>::from_fn(size, |r, c| {
        [(r * 255 / args.size.max(1)) as u8, (c * 255 / args.size.max(1)) as u8, 128]
    })?;
    let mut gray = Image::<u8, 1>::from_size_val(size, 0)?;
    gray_from_rgb_u8(&rgb, &mut gray)?;
    log::info!("gray from rgb: range {:?}", find_min_max(&gray)?);

    let img = synthetic_gray(size)?;

    // point operations
    let mut stretched = Image::<u8, 1>::from_size_val(size, 0)?;
    remap_range(&img, &mut stretched, 0.0, 255.0)?;
    log::info!(
        "remap range: {:?} -> {:?}",
        find_min_max(&img)?,
        find_min_max(&stretched)?
    );

    let mut corrected = Image::<u8, 1>::from_size_val(size, 0)?;
    gamma_correction(&img, &mut corrected, args.gamma)?;
    log::info!("gamma {}: range {:?}", args.gamma, find_min_max(&corrected)?);

    let hist = compute_histogram(&img);
    let mut equalized = Image::<u8, 1>::from_size_val(size, 0)?;
    equalize_histogram(&img, &mut equalized, &hist)?;
    log::info!(
        "histogram equalization: {} levels used before, {} after",
        hist.iter().filter(|&&n| n > 0).count(),
        compute_histogram(&equalized)
            .iter()
            .filter(|&&n| n > 0)
            .count()
    );

    // spatial filters and edges
    let img_f32 = img.cast_and_scale::<f32>(1.0 / 255.0)?;

    let mut blurred = Image::<f32, 1>::from_size_val(size, 0.0)?;
    convolve(&img_f32, &mut blurred, &kernels::gaussian_mask3())?;

    let mut sobel = Image::<f32, 1>::from_size_val(size, 0.0)?;
    sobel_magnitude(&blurred, &mut sobel)?;
    log::info!("sobel magnitude: range {:?}", find_min_max(&sobel)?);

    let mut laplacian = Image::<f32, 1>::from_size_val(size, 0.0)?;
    let mut signs = Image::<u8, 3>::from_size_val(size, 0)?;
    let colors = SignColors::default();
    laplacian_classify(&img_f32, &mut laplacian, &mut signs, &colors)?;
    let positive = signs
        .as_slice()
        .chunks_exact(3)
        .filter(|px| *px == colors.positive)
        .count();
    log::info!("laplacian: {positive} positive responses");

    let thresholds = CannyThresholds {
        low: args.low,
        high: args.high,
    };
    let mut edges = Image::<u8, 1>::from_size_val(size, 0)?;
    double_threshold(&img_f32, &mut edges, &thresholds)?;
    log::info!(
        "double threshold {:?}: {} edge pixels",
        thresholds,
        edges.as_slice().iter().filter(|&&v| v == EDGE).count()
    );

    // frequency domain
    let img_f64 = img_f32.cast::<f64>()?;
    let mut spectrum = Image::<f64, 2>::from_size_val(size, 0.0)?;
    dft(&img_f64, &mut spectrum)?;

    let mut power = Image::<f64, 1>::from_size_val(size, 0.0)?;
    power_spectrum(&spectrum, &mut power)?;
    log::info!("power spectrum: range {:?}", find_min_max(&power)?);
    let mut phase = Image::<f64, 1>::from_size_val(size, 0.0)?;
    phase_spectrum(&spectrum, &mut phase)?;
    log::info!("phase spectrum: range {:?}", find_min_max(&phase)?);

    let mask = circular_mask(size, args.radius, FrequencyFilter::LowPass)?;
    apply_frequency_mask(&mut spectrum, &mask)?;

    let mut low_pass = Image::<f64, 1>::from_size_val(size, 0.0)?;
    idft(&spectrum, &mut low_pass)?;
    log::info!(
        "low pass radius {}: range {:?}",
        args.radius,
        find_min_max(&low_pass)?
    );

    let mut smoothed = Image::<f64, 1>::from_size_val(size, 0.0)?;
    let params = DiffusionParams {
        iterations: args.iterations,
        ..Default::default()
    };
    anisotropic_diffusion(&img_f64, &mut smoothed, &params)?;
    log::info!("anisotropic diffusion {:?}: range {:?}", params, find_min_max(&smoothed)?);

    // geometry
    let mut undistorted = Image::<u8, 3>::from_size_val(size, 0)?;
    undistort(&rgb, &mut undistorted, args.k1, args.k2)?;
    log::info!("undistort k1 {} k2 {}: done", args.k1, args.k2);

    let last = (args.size.max(1) - 1) as f64;
    let from = [[0.0, 0.0], [last, 0.0], [last, last], [0.0, last]];
    let to = [
        [last * 0.2, last * 0.1],
        [last * 0.9, last * 0.2],
        [last * 0.8, last * 0.9],
        [last * 0.1, last * 0.8],
    ];
    let mut canvas = Image::<u8, 3>::from_size_val(size, 0)?;
    warp_perspective(&rgb, &mut canvas, &from, &to)?;
    let covered = canvas
        .as_slice()
        .chunks_exact(3)
        .filter(|px| px.iter().any(|&v| v != 0))
        .count();
    log::info!("perspective warp: {covered} pixels covered");

    Ok(())
}
