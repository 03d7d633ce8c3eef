//! Classroom digital image processing kernels.
//!
//! Re-exports the image container ([`image`]) and the processing kernels
//! ([`imgproc`]) under a single crate.

#[doc(inline)]
pub use dip_image as image;

#[doc(inline)]
pub use dip_imgproc as imgproc;
