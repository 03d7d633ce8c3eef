//! Filter operations
//!
//! This module provides the square-mask spatial convolution and the edge
//! operators built on top of it.

/// Filter kernels
pub mod kernels;
pub use kernels::Mask;

/// Spatial convolution
mod convolution;
pub use convolution::*;

/// Filter operations
mod ops;
pub use ops::*;
