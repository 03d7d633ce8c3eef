//! Pixel interpolation methods for image transformations.
//!
//! # Interpolation Modes
//!
//! - **Nearest**: rounds to the closest pixel, used by the perspective warp
//! - **Bilinear**: weighted sum of the four surrounding pixels, used by undistortion
//!
//! Both samplers address the image as `(row, col)` and never clamp: neighbours
//! that fall outside the image simply do not contribute.

mod bilinear;
mod nearest;

pub use bilinear::bilinear_sample;
pub use nearest::nearest_sample;
