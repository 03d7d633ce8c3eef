#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// double threshold edge detection with non-maximum suppression.
pub mod canny;

/// color transformations module.
pub mod color;

/// anisotropic diffusion smoothing.
pub mod diffusion;

/// image enhancement module.
pub mod enhance;

/// image filtering module.
pub mod filter;

/// discrete fourier transform and frequency domain filtering.
pub mod fourier;

/// compute image histogram module.
pub mod histogram;

/// utilities for interpolation.
pub mod interpolation;

/// operations to normalize images.
pub mod normalize;

/// module containing parallization utilities.
pub mod parallel;

/// radial lens distortion correction.
pub mod undistort;

/// image geometric transformations module.
pub mod warp;
