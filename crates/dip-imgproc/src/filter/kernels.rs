use dip_image::ImageError;

/// A square convolution mask with an odd dimension and a normalization divisor.
///
/// Weights are stored row-major; `weight(i, j)` is row `i`, column `j` of the
/// mask, with the anchor at `(dim / 2, dim / 2)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Mask {
    dim: usize,
    weights: Vec<f64>,
    scale: f64,
}

impl Mask {
    /// Create a new mask.
    ///
    /// # Arguments
    ///
    /// * `dim` - The side length of the mask, must be odd.
    /// * `weights` - `dim * dim` weights in row-major order.
    /// * `scale` - The divisor applied to every weighted sum, must be non-zero.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidMask`] if the dimension is even, the number
    /// of weights does not match or the scale is zero or not finite.
    pub fn new(dim: usize, weights: Vec<f64>, scale: f64) -> Result<Self, ImageError> {
        if dim % 2 == 0 {
            return Err(ImageError::InvalidMask(format!(
                "dimension must be odd, got {dim}"
            )));
        }

        if weights.len() != dim * dim {
            return Err(ImageError::InvalidMask(format!(
                "expected {} weights, got {}",
                dim * dim,
                weights.len()
            )));
        }

        if scale == 0.0 || !scale.is_finite() {
            return Err(ImageError::InvalidMask(format!(
                "scale must be finite and non-zero, got {scale}"
            )));
        }

        Ok(Self {
            dim,
            weights,
            scale,
        })
    }

    /// Create a mask from a fixed size array of rows.
    ///
    /// # Example
    ///
    /// ```
    /// use dip_imgproc::filter::Mask;
    ///
    /// let ones = [[1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, 1.0]];
    /// let mask = Mask::from_rows(ones, 9.0).unwrap();
    /// assert_eq!(mask.dim(), 3);
    /// assert_eq!(mask.border(), 1);
    /// ```
    pub fn from_rows<const N: usize>(rows: [[f64; N]; N], scale: f64) -> Result<Self, ImageError> {
        Self::new(N, rows.iter().flatten().copied().collect(), scale)
    }

    /// The side length of the mask.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// The number of pixels on each side that the mask cannot be centred on.
    pub fn border(&self) -> usize {
        self.dim / 2
    }

    /// The normalization divisor.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// The weight at row `i`, column `j` of the mask.
    pub fn weight(&self, i: usize, j: usize) -> f64 {
        self.weights[i * self.dim + j]
    }

    /// The weights in row-major order.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }
}

/// The 3x3 identity mask.
pub fn identity_mask3() -> Mask {
    Mask {
        dim: 3,
        weights: vec![0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0],
        scale: 1.0,
    }
}

/// The 3x3 box blur mask, all ones normalized by 9.
pub fn box_blur_mask3() -> Mask {
    Mask {
        dim: 3,
        weights: vec![1.0; 9],
        scale: 9.0,
    }
}

/// The 3x3 gaussian mask, outer product of `[1, 2, 1]` normalized by 16.
pub fn gaussian_mask3() -> Mask {
    Mask {
        dim: 3,
        weights: vec![1.0, 2.0, 1.0, 2.0, 4.0, 2.0, 1.0, 2.0, 1.0],
        scale: 16.0,
    }
}

/// The 3x3 sobel masks for the horizontal and vertical derivatives.
///
/// # Returns
///
/// A tuple `(mask_x, mask_y)`; `mask_x` responds to intensity increasing to
/// the right and `mask_y` to intensity increasing downwards.
#[rustfmt::skip]
pub fn sobel_masks3() -> (Mask, Mask) {
    let mask_x = Mask {
        dim: 3,
        weights: vec![
            -1.0, 0.0, 1.0,
            -2.0, 0.0, 2.0,
            -1.0, 0.0, 1.0,
        ],
        scale: 1.0,
    };
    let mask_y = Mask {
        dim: 3,
        weights: vec![
            -1.0, -2.0, -1.0,
             0.0,  0.0,  0.0,
             1.0,  2.0,  1.0,
        ],
        scale: 1.0,
    };
    (mask_x, mask_y)
}

/// The 4-neighbour 3x3 laplacian mask.
#[rustfmt::skip]
pub fn laplacian_mask3() -> Mask {
    Mask {
        dim: 3,
        weights: vec![
            0.0,  1.0, 0.0,
            1.0, -4.0, 1.0,
            0.0,  1.0, 0.0,
        ],
        scale: 1.0,
    }
}
