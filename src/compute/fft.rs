//! FFT-based 2D convolution with zero padding.
//!
//! Uses rustfft for O(N log N) convolution instead of O(N * K^2) direct
//! convolution. The grid and kernel are embedded in a buffer large enough
//! that the circular convolution computed by the FFT equals the linear one.

use std::sync::Arc;

use num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use super::{Field, GaussianKernel};

/// FFT convolution engine with cached plans.
#[derive(Clone)]
pub struct FftConvolver {
    width: usize,
    height: usize,
    // Cached FFT plans (expensive to create, reuse across convolutions)
    fft_row: Arc<dyn Fft<f32>>,
    fft_col: Arc<dyn Fft<f32>>,
    ifft_row: Arc<dyn Fft<f32>>,
    ifft_col: Arc<dyn Fft<f32>>,
}

impl FftConvolver {
    /// Create a new FFT convolver for the given buffer dimensions.
    pub fn new(width: usize, height: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft_row = planner.plan_fft_forward(width);
        let fft_col = planner.plan_fft_forward(height);
        let ifft_row = planner.plan_fft_inverse(width);
        let ifft_col = planner.plan_fft_inverse(height);

        Self {
            width,
            height,
            fft_row,
            fft_col,
            ifft_row,
            ifft_col,
        }
    }

    /// Perform 2D FFT on real-valued input.
    /// Returns complex frequency-domain representation.
    pub fn fft2d(&self, input: &[f32]) -> Vec<Complex<f32>> {
        assert_eq!(input.len(), self.width * self.height);

        let mut data: Vec<Complex<f32>> = input.iter().map(|&x| Complex::new(x, 0.0)).collect();

        // Row-wise FFT
        for row in data.chunks_exact_mut(self.width) {
            self.fft_row.process(row);
        }

        // Column-wise FFT
        let mut col_buffer = vec![Complex::new(0.0, 0.0); self.height];
        for x in 0..self.width {
            for y in 0..self.height {
                col_buffer[y] = data[y * self.width + x];
            }

            self.fft_col.process(&mut col_buffer);

            for y in 0..self.height {
                data[y * self.width + x] = col_buffer[y];
            }
        }

        data
    }

    /// Perform inverse 2D FFT, returning real values.
    pub fn ifft2d(&self, input: &mut [Complex<f32>]) -> Vec<f32> {
        assert_eq!(input.len(), self.width * self.height);

        // Column-wise IFFT
        let mut col_buffer = vec![Complex::new(0.0, 0.0); self.height];
        for x in 0..self.width {
            for y in 0..self.height {
                col_buffer[y] = input[y * self.width + x];
            }

            self.ifft_col.process(&mut col_buffer);

            for y in 0..self.height {
                input[y * self.width + x] = col_buffer[y];
            }
        }

        // Row-wise IFFT
        for row in input.chunks_exact_mut(self.width) {
            self.ifft_row.process(row);
        }

        // Normalize and extract real part
        let scale = 1.0 / (self.width * self.height) as f32;
        input.iter().map(|c| c.re * scale).collect()
    }
}

/// Zero-padded convolution of fields of one fixed size with one kernel.
///
/// Holds the FFT plans and the kernel spectrum, so repeated convolutions only
/// transform the input.
#[derive(Clone)]
pub struct CachedConvolver {
    input_width: usize,
    input_height: usize,
    padded_width: usize,
    radius_x: usize,
    radius_y: usize,
    convolver: FftConvolver,
    kernel_freq: Vec<Complex<f32>>,
}

impl CachedConvolver {
    /// Plan convolutions of `width x height` fields with `kernel`.
    pub fn new(kernel: &GaussianKernel, width: usize, height: usize) -> Self {
        let padded_width = width + kernel.width - 1;
        let padded_height = height + kernel.height - 1;

        let convolver = FftConvolver::new(padded_width, padded_height);
        let kernel_freq = convolver.fft2d(&kernel.pad_to_size(padded_width, padded_height));

        Self {
            input_width: width,
            input_height: height,
            padded_width,
            radius_x: kernel.radius_x(),
            radius_y: kernel.radius_y(),
            convolver,
            kernel_freq,
        }
    }

    /// Whether `input` has the size this convolver was planned for.
    #[inline]
    pub fn fits(&self, input: &Field) -> bool {
        input.width == self.input_width && input.height == self.input_height
    }

    /// Convolve `input`, returning a field of the same size.
    pub fn convolve(&self, input: &Field) -> Field {
        assert!(self.fits(input), "field size does not match the planned size");
        let padded_width = self.padded_width;

        let mut padded_input = vec![0.0f32; padded_width * self.convolver.height];
        for y in 0..input.height {
            padded_input[y * padded_width..y * padded_width + input.width]
                .copy_from_slice(input.row(y));
        }

        let mut freq = self.convolver.fft2d(&padded_input);
        for (a, b) in freq.iter_mut().zip(&self.kernel_freq) {
            *a *= *b;
        }
        let full = self.convolver.ifft2d(&mut freq);

        // Output (y, x) sits at (y + ry, x + rx) of the full linear convolution.
        let (rx, ry) = (self.radius_x, self.radius_y);
        let mut output = Field::zeros(input.width, input.height);
        for y in 0..input.height {
            let start = (y + ry) * padded_width + rx;
            output.data[y * input.width..(y + 1) * input.width]
                .copy_from_slice(&full[start..start + input.width]);
        }

        output
    }
}

/// Zero-padded 2D convolution via FFT, returning a field the size of `input`.
///
/// Plans from scratch on every call; hold a [`CachedConvolver`] to reuse them.
pub fn convolve_fft(input: &Field, kernel: &GaussianKernel) -> Field {
    CachedConvolver::new(kernel, input.width, input.height).convolve(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::convolve_direct;

    #[test]
    fn test_fft_roundtrip() {
        let convolver = FftConvolver::new(8, 8);

        let input: Vec<f32> = (0..64).map(|i| i as f32 / 64.0).collect();
        let mut freq = convolver.fft2d(&input);
        let output = convolver.ifft2d(&mut freq);

        for (a, b) in input.iter().zip(output.iter()) {
            assert!((a - b).abs() < 1e-5, "Roundtrip mismatch: {} vs {}", a, b);
        }
    }

    #[test]
    fn test_fft_matches_direct() {
        let kernel = GaussianKernel::new(2.5, 1.5, 4.0);
        let (width, height) = (30, 21);

        let data: Vec<f32> = (0..width * height)
            .map(|i| if (i * 7) % 11 < 4 { 1.0 } else { 0.0 })
            .collect();
        let input = Field::from_vec(width, height, data);

        let direct = convolve_direct(&input, &kernel);
        let fft = convolve_fft(&input, &kernel);

        for i in 0..input.len() {
            assert!(
                (direct.data[i] - fft.data[i]).abs() < 1e-4,
                "Mismatch at {}: {} vs {}",
                i,
                direct.data[i],
                fft.data[i]
            );
        }
    }

    #[test]
    fn test_fft_edge_leaks() {
        let kernel = GaussianKernel::isotropic(1.0, 4.0);
        let mut input = Field::zeros(12, 12);
        input.set(0, 0, 1.0);

        let output = convolve_fft(&input, &kernel);

        // Nothing wraps to the far corner, and mass leaks past the edge.
        assert!(output.get(11, 11).abs() < 1e-5);
        let total: f32 = output.data.iter().sum();
        assert!(total < 0.75, "Corner impulse should lose mass: {}", total);
    }

    #[test]
    fn test_cached_convolver_reuse() {
        let kernel = GaussianKernel::new(1.5, 2.0, 4.0);
        let cached = CachedConvolver::new(&kernel, 20, 14);

        let mut first = Field::zeros(20, 14);
        first.set(7, 10, 1.0);
        let mut second = Field::zeros(20, 14);
        second.set(0, 0, 1.0);
        second.set(13, 19, 0.5);

        // The same planner and spectrum serve several inputs.
        for input in [&first, &second, &first] {
            let expected = convolve_direct(input, &kernel);
            let output = cached.convolve(input);
            for i in 0..input.len() {
                assert!((expected.data[i] - output.data[i]).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_cached_convolver_fits() {
        let kernel = GaussianKernel::isotropic(1.0, 4.0);
        let cached = CachedConvolver::new(&kernel, 10, 6);

        assert!(cached.fits(&Field::zeros(10, 6)));
        assert!(!cached.fits(&Field::zeros(6, 10)));
    }
}
