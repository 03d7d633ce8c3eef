//! Geometric image transformations using perspective warps.
//!
//! This module provides functions for applying homographies to images:
//!
//! - Homography estimation from four point correspondences
//! - Single point transformation
//! - Nearest-pixel perspective resampling
//!
//! # Examples
//!
//! Estimating the homography that maps a unit square onto a shifted one:
//!
//! ```
//! use dip_imgproc::warp::{get_perspective_transform, transform_point};
//!
//! let from = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
//! let to = [[2.0, 3.0], [3.0, 3.0], [3.0, 4.0], [2.0, 4.0]];
//!
//! let m = get_perspective_transform(&from, &to).unwrap();
//! let (x, y) = transform_point(0.5, 0.5, &m);
//! assert!((x - 2.5).abs() < 1e-9 && (y - 3.5).abs() < 1e-9);
//! ```

mod perspective;

pub use perspective::{
    get_perspective_transform, transform_point, warp_perspective, warp_perspective_matrix,
};
