//! Spatial-domain convolution with zero padding.
//!
//! Cells outside the grid contribute nothing, so mass near the border leaks
//! out of the field instead of wrapping to the opposite edge.
//!
//! # Complexity
//!
//! `convolve_direct` is O(N * Kw * Kh). `convolve_separable` exploits the
//! Gaussian's separability and runs in O(N * (Kw + Kh)).

use super::{Field, GaussianKernel};

/// Perform direct 2D convolution with zero padding.
pub fn convolve_direct(input: &Field, kernel: &GaussianKernel) -> Field {
    let mut output = Field::zeros(input.width, input.height);
    convolve_direct_into(input, kernel, &mut output.data);
    output
}

/// Perform direct convolution into pre-allocated buffer.
pub fn convolve_direct_into(input: &Field, kernel: &GaussianKernel, output: &mut [f32]) {
    let (width, height) = (input.width, input.height);
    let rx = kernel.radius_x() as isize;
    let ry = kernel.radius_y() as isize;

    for y in 0..height {
        for x in 0..width {
            let mut sum = 0.0f32;

            for ky in 0..kernel.height {
                let sy = y as isize + ky as isize - ry;
                if sy < 0 || sy >= height as isize {
                    continue;
                }
                let input_row = input.row(sy as usize);
                let wy = kernel.profile_y[ky];

                for (kx, &wx) in kernel.profile_x.iter().enumerate() {
                    let sx = x as isize + kx as isize - rx;
                    if sx < 0 || sx >= width as isize {
                        continue;
                    }
                    sum += input_row[sx as usize] * wy * wx;
                }
            }

            output[y * width + x] = sum;
        }
    }
}

/// 1D zero-padded convolution of `len` samples read with `stride`.
fn convolve_line(
    input: &[f32],
    output: &mut [f32],
    start: usize,
    stride: usize,
    len: usize,
    profile: &[f32],
) {
    let radius = (profile.len() / 2) as isize;

    for i in 0..len {
        let mut sum = 0.0f32;
        for (k, &w) in profile.iter().enumerate() {
            let s = i as isize + k as isize - radius;
            if s < 0 || s >= len as isize {
                continue;
            }
            sum += input[start + s as usize * stride] * w;
        }
        output[start + i * stride] = sum;
    }
}

/// Separable convolution: a row pass with the X profile, then a column pass
/// with the Y profile.
pub fn convolve_separable(input: &Field, kernel: &GaussianKernel) -> Field {
    let (width, height) = (input.width, input.height);
    let mut rows_done = vec![0.0f32; input.len()];
    let mut output = Field::zeros(width, height);

    for y in 0..height {
        convolve_line(
            &input.data,
            &mut rows_done,
            y * width,
            1,
            width,
            &kernel.profile_x,
        );
    }
    for x in 0..width {
        convolve_line(
            &rows_done,
            &mut output.data,
            x,
            width,
            height,
            &kernel.profile_y,
        );
    }

    output
}
