//! Gaussian kernel generation for field smoothing.
//!
//! A 2D Gaussian is the outer product of two 1D profiles. The kernel stores
//! only the profiles; the 2D weights are computed on demand, so a separable
//! pass never pays for the full grid.

use crate::schema::MAX_KERNEL_RADIUS;

/// Normalized 1D Gaussian profile of odd length `2 * radius + 1`.
///
/// The radius is `truncate * sigma` rounded to the nearest cell, capped at
/// [`MAX_KERNEL_RADIUS`]. A zero sigma gives the unit impulse `[1.0]`.
pub fn gaussian_profile(sigma: f32, truncate: f32) -> Vec<f32> {
    if sigma <= 0.0 {
        return vec![1.0];
    }

    let radius = ((truncate * sigma + 0.5) as usize).min(MAX_KERNEL_RADIUS);
    let inv_two_sigma_sq = 1.0 / (2.0 * sigma * sigma);

    let mut profile: Vec<f32> = (0..=2 * radius)
        .map(|i| {
            let d = i as f32 - radius as f32;
            (-d * d * inv_two_sigma_sq).exp()
        })
        .collect();

    let sum: f32 = profile.iter().sum();
    let inv_sum = 1.0 / sum;
    for v in &mut profile {
        *v *= inv_sum;
    }

    profile
}

/// Precomputed separable Gaussian kernel ready for convolution.
#[derive(Debug, Clone)]
pub struct GaussianKernel {
    /// Kernel width (columns), odd.
    pub width: usize,
    /// Kernel height (rows), odd.
    pub height: usize,
    /// 1D profile along X.
    pub profile_x: Vec<f32>,
    /// 1D profile along Y.
    pub profile_y: Vec<f32>,
}

impl GaussianKernel {
    /// Generate an anisotropic Gaussian kernel.
    ///
    /// # Arguments
    /// * `sigma_x` - Standard deviation along columns
    /// * `sigma_y` - Standard deviation along rows
    /// * `truncate` - Kernel radius in standard deviations
    pub fn new(sigma_x: f32, sigma_y: f32, truncate: f32) -> Self {
        let profile_x = gaussian_profile(sigma_x, truncate);
        let profile_y = gaussian_profile(sigma_y, truncate);

        Self {
            width: profile_x.len(),
            height: profile_y.len(),
            profile_x,
            profile_y,
        }
    }

    /// Isotropic kernel.
    pub fn isotropic(sigma: f32, truncate: f32) -> Self {
        Self::new(sigma, sigma, truncate)
    }

    /// Get kernel value at (x, y) position.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.profile_y[y] * self.profile_x[x]
    }

    /// Materialize the full 2D kernel, row-major.
    pub fn to_dense(&self) -> Vec<f32> {
        let mut data = Vec::with_capacity(self.width * self.height);
        for &wy in &self.profile_y {
            data.extend(self.profile_x.iter().map(|&wx| wy * wx));
        }
        data
    }

    /// Horizontal radius in cells.
    #[inline]
    pub fn radius_x(&self) -> usize {
        self.width / 2
    }

    /// Vertical radius in cells.
    #[inline]
    pub fn radius_y(&self) -> usize {
        self.height / 2
    }

    /// Embed the kernel at the top-left corner of a zeroed
    /// `target_width x target_height` buffer for FFT convolution.
    pub fn pad_to_size(&self, target_width: usize, target_height: usize) -> Vec<f32> {
        assert!(target_width >= self.width && target_height >= self.height);
        let mut padded = vec![0.0f32; target_width * target_height];

        for (ky, &wy) in self.profile_y.iter().enumerate() {
            let dst = &mut padded[ky * target_width..ky * target_width + self.width];
            for (d, &wx) in dst.iter_mut().zip(&self.profile_x) {
                *d = wy * wx;
            }
        }

        padded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_length() {
        // scipy's radius rule: int(truncate * sigma + 0.5)
        assert_eq!(gaussian_profile(7.0, 4.0).len(), 57);
        assert_eq!(gaussian_profile(1.0, 4.0).len(), 9);
        assert_eq!(gaussian_profile(0.0, 4.0), vec![1.0]);
    }

    #[test]
    fn test_profile_radius_is_capped() {
        let max_len = 2 * MAX_KERNEL_RADIUS + 1;
        assert_eq!(gaussian_profile(1e30, 4.0).len(), max_len);
        assert_eq!(gaussian_profile(10_000.0, 4.0).len(), max_len);
        assert_eq!(gaussian_profile(f32::MAX, f32::MAX).len(), max_len);
    }

    #[test]
    fn test_wide_kernel_stays_one_dimensional() {
        // At the cap a dense kernel would hold over a million weights; only
        // the two profiles are stored.
        let kernel = GaussianKernel::isotropic(128.0, 4.0);
        assert_eq!(kernel.width, 1025);
        assert_eq!(kernel.height, 1025);
        assert_eq!(kernel.profile_x.len(), 1025);
        assert_eq!(kernel.profile_y.len(), 1025);

        let center = kernel.radius_x();
        let peak = kernel.profile_x[center] * kernel.profile_y[center];
        assert_eq!(kernel.get(center, center), peak);
    }

    #[test]
    fn test_dense_matches_get() {
        let kernel = GaussianKernel::new(1.5, 0.8, 3.0);
        let dense = kernel.to_dense();
        assert_eq!(dense.len(), kernel.width * kernel.height);
        for y in 0..kernel.height {
            for x in 0..kernel.width {
                assert_eq!(dense[y * kernel.width + x], kernel.get(x, y));
            }
        }
    }

    #[test]
    fn test_kernel_normalization() {
        let kernel = GaussianKernel::new(3.0, 1.5, 4.0);
        let sum: f32 = kernel.to_dense().iter().sum();

        // Should sum to approximately 1
        assert!((sum - 1.0).abs() < 1e-5, "Kernel sum: {}", sum);
        assert_eq!(kernel.width, 25);
        assert_eq!(kernel.height, 13);
    }

    #[test]
    fn test_kernel_symmetry() {
        let kernel = GaussianKernel::isotropic(2.0, 4.0);

        // Check radial symmetry
        let center = kernel.width / 2;
        for d in 1..center {
            let v1 = kernel.get(center + d, center);
            let v2 = kernel.get(center - d, center);
            let v3 = kernel.get(center, center + d);
            let v4 = kernel.get(center, center - d);

            assert!((v1 - v2).abs() < 1e-6);
            assert!((v1 - v3).abs() < 1e-6);
            assert!((v1 - v4).abs() < 1e-6);
        }
        assert!(kernel.get(center, center) > kernel.get(center + 1, center));
    }

    #[test]
    fn test_pad_to_size() {
        let kernel = GaussianKernel::isotropic(1.0, 1.0);
        let padded = kernel.pad_to_size(8, 6);

        assert_eq!(padded.len(), 48);
        assert_eq!(padded[0], kernel.get(0, 0));
        assert_eq!(padded[2 * 8 + 2], kernel.get(2, 2));
        assert_eq!(padded[3 * 8 + 3], 0.0);
    }
}
