//! Gaussian smoothing of the binary land field into a continuous elevation
//! field.

use std::cell::OnceCell;

use crate::schema::{SmoothingBackend, SmoothingConfig};

use super::{
    CachedConvolver, Field, GaussianKernel, convolve_direct, convolve_fft, convolve_separable,
};

/// Gaussian diffusion pass with a precomputed kernel.
///
/// The FFT backend plans for the size of the first field it smooths and
/// reuses those plans for every later field of that size.
#[derive(Clone)]
pub struct FieldSmoother {
    kernel: GaussianKernel,
    backend: SmoothingBackend,
    fft: OnceCell<CachedConvolver>,
}

impl FieldSmoother {
    /// Build the kernel described by `config`.
    pub fn new(config: &SmoothingConfig) -> Self {
        Self {
            kernel: GaussianKernel::new(config.sigma_x, config.sigma_y, config.truncate),
            backend: config.backend,
            fft: OnceCell::new(),
        }
    }

    /// Precomputed kernel.
    pub fn kernel(&self) -> &GaussianKernel {
        &self.kernel
    }

    /// Convolve `input` with the Gaussian (zero padding outside the grid) and
    /// clip the result to [0, 1].
    pub fn smooth(&self, input: &Field) -> Field {
        let mut output = match self.backend {
            SmoothingBackend::Separable => convolve_separable(input, &self.kernel),
            SmoothingBackend::Direct => convolve_direct(input, &self.kernel),
            SmoothingBackend::Fft => {
                let cached = self
                    .fft
                    .get_or_init(|| CachedConvolver::new(&self.kernel, input.width, input.height));
                if cached.fits(input) {
                    cached.convolve(input)
                } else {
                    convolve_fft(input, &self.kernel)
                }
            }
        };
        output.clamp_unit();
        output
    }
}
