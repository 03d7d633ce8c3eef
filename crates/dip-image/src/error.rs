/// An error type for the image processing kernels.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when channel and shape are not valid.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when the image size is not valid.
    #[error("Invalid image size ({0}, {1}) mismatch ({2}, {3})")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when the image data is empty.
    #[error("Image data is not initialized")]
    ImageDataNotInitialized,

    /// Error when the pixel index is out of bounds.
    #[error("Pixel index ({0}, {1}) out of bounds ({2}, {3})")]
    PixelIndexOutOfBounds(usize, usize, usize, usize),

    /// Error when the channel index is out of bounds.
    #[error("Channel index {0} is out of bounds {1}")]
    ChannelIndexOutOfBounds(usize, usize),

    /// Error when a pixel value cannot be represented in the target type.
    #[error("Failed to cast pixel value to {0}")]
    CastError(String),

    /// Error when a convolution mask is malformed.
    #[error("Invalid convolution mask: {0}")]
    InvalidMask(String),

    /// Error when all samples share the same value and cannot be rescaled.
    #[error("Cannot remap a constant image (min == max == {0})")]
    DegenerateRange(f64),

    /// Error when the gamma value is not a positive finite number.
    #[error("Gamma must be positive and finite, got {0}")]
    InvalidGamma(f64),

    /// Error when the histogram lookup table cannot be built.
    #[error("Cannot equalize histogram: total pixels ({0}) equals the minimum cdf value")]
    DegenerateHistogram(usize),

    /// Error when the histogram does not account for every pixel of the image.
    #[error("Histogram counts ({0}) do not match the number of pixels ({1})")]
    HistogramSizeMismatch(usize, usize),

    /// Error when the diffusion parameters are not usable.
    #[error("Invalid diffusion parameters: {0}")]
    InvalidDiffusionParams(String),

    /// Error when the homography linear system has no unique solution.
    #[error("The point correspondences produce a singular homography system")]
    SingularHomography,

    /// Error when the edge detection thresholds are not usable.
    #[error("Invalid thresholds: low ({0}) must not exceed high ({1})")]
    InvalidThresholds(f32, f32),
}
