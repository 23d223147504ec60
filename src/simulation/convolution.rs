//! Activity field computation.
//!
//! `U[y][x] = sum(w * field[(y + dy) mod H][(x + dx) mod W])` over all kernel
//! entries. Two interchangeable strategies produce the same U: a direct sum
//! over the sparse kernel, and a product of 2-D FFTs against the kernel
//! embedded in a full-size grid.

use std::sync::Arc;

use rayon::prelude::*;
use rustfft::num_complex::Complex;
use rustfft::num_traits::Zero;
use rustfft::{Fft, FftPlanner};

use crate::config::{ConvolutionStrategy, MAX_SPECTRAL_CELLS, SPECTRAL_CROSSOVER};
use crate::error::{EngineError, Result};
use crate::simulation::{Field, Kernel, KernelEntry};

/// A convolution engine bound to one kernel and one grid size
pub trait Convolution: Send {
    /// `Direct` or `Spectral`
    fn strategy(&self) -> ConvolutionStrategy;

    /// Write the activity of every cell of `field` into `activity` (row-major)
    fn convolve(&mut self, field: &Field, activity: &mut [f64]);
}

/// Build the engine for `strategy`, resolving `Auto` from kernel and grid size
pub fn select(
    strategy: ConvolutionStrategy,
    kernel: &Kernel,
    width: usize,
    height: usize,
) -> Result<Box<dyn Convolution>> {
    let resolved = match strategy {
        ConvolutionStrategy::Auto => auto_strategy(kernel, width, height),
        forced => forced,
    };

    let engine: Box<dyn Convolution> = match resolved {
        ConvolutionStrategy::Spectral => Box::new(SpectralConvolver::new(kernel, width, height)?),
        _ => Box::new(DirectConvolver::new(kernel, width, height)),
    };

    log::info!(
        "Convolution strategy: {:?} (requested {:?}, {} kernel entries, {}x{} grid)",
        engine.strategy(),
        strategy,
        kernel.len(),
        width,
        height
    );
    Ok(engine)
}

fn auto_strategy(kernel: &Kernel, width: usize, height: usize) -> ConvolutionStrategy {
    let cells = match spectral_cells(width, height) {
        Some(cells) => cells,
        None => return ConvolutionStrategy::Direct,
    };
    if kernel.is_empty() {
        return ConvolutionStrategy::Direct;
    }
    let transform_cost = SPECTRAL_CROSSOVER * (cells as f64).log2();
    if kernel.len() as f64 > transform_cost {
        ConvolutionStrategy::Spectral
    } else {
        ConvolutionStrategy::Direct
    }
}

/// Cell count if the transform backend accepts this grid
fn spectral_cells(width: usize, height: usize) -> Option<usize> {
    width
        .checked_mul(height)
        .filter(|&cells| cells > 0 && cells <= MAX_SPECTRAL_CELLS)
}

// ============================================
// Direct spatial convolution
// ============================================

/// O(W * H * |kernel|) sum, one row of output per task
pub struct DirectConvolver {
    entries: Vec<KernelEntry>,
    width: usize,
    height: usize,
}

impl DirectConvolver {
    pub fn new(kernel: &Kernel, width: usize, height: usize) -> Self {
        Self {
            entries: kernel.entries().to_vec(),
            width,
            height,
        }
    }
}

impl Convolution for DirectConvolver {
    fn strategy(&self) -> ConvolutionStrategy {
        ConvolutionStrategy::Direct
    }

    fn convolve(&mut self, field: &Field, activity: &mut [f64]) {
        let width = self.width;
        let height = self.height as isize;
        let cells = field.cells();
        let entries = &self.entries;

        activity
            .par_chunks_mut(width)
            .enumerate()
            .for_each_init(
                || Vec::with_capacity(entries.len()),
                |source_rows: &mut Vec<usize>, (y, row)| {
                    // Row start of each entry's source row for this output row
                    source_rows.clear();
                    source_rows.extend(
                        entries
                            .iter()
                            .map(|e| (y as isize + e.dy).rem_euclid(height) as usize * width),
                    );

                    for (x, out) in row.iter_mut().enumerate() {
                        let mut sum = 0.0;
                        for (e, &base) in entries.iter().zip(source_rows.iter()) {
                            let nx = (x as isize + e.dx).rem_euclid(width as isize) as usize;
                            sum += e.weight * cells[base + nx];
                        }
                        *out = sum;
                    }
                },
            );
    }
}

// ============================================
// Frequency-domain convolution
// ============================================

/// Cyclic convolution through 2-D FFTs.
///
/// The kernel spectrum is computed once from the full-grid embedding and kept
/// in column-major (transposed) order, which is the order the forward
/// transform leaves its output in.
pub struct SpectralConvolver {
    width: usize,
    height: usize,
    row_forward: Arc<dyn Fft<f64>>,
    row_inverse: Arc<dyn Fft<f64>>,
    col_forward: Arc<dyn Fft<f64>>,
    col_inverse: Arc<dyn Fft<f64>>,
    kernel_spectrum: Vec<Complex<f64>>,
    /// Row-major work buffer
    work: Vec<Complex<f64>>,
    /// Column-major work buffer
    transposed: Vec<Complex<f64>>,
}

impl SpectralConvolver {
    pub fn new(kernel: &Kernel, width: usize, height: usize) -> Result<Self> {
        let cells = spectral_cells(width, height)
            .ok_or(EngineError::UnsupportedGridSize { width, height })?;

        let mut planner = FftPlanner::<f64>::new();
        let mut convolver = Self {
            width,
            height,
            row_forward: planner.plan_fft_forward(width),
            row_inverse: planner.plan_fft_inverse(width),
            col_forward: planner.plan_fft_forward(height),
            col_inverse: planner.plan_fft_inverse(height),
            kernel_spectrum: vec![Complex::zero(); cells],
            work: vec![Complex::zero(); cells],
            transposed: vec![Complex::zero(); cells],
        };

        let dense = kernel.to_dense(width, height);
        for (slot, &w) in convolver.work.iter_mut().zip(&dense) {
            *slot = Complex::new(w, 0.0);
        }
        convolver.forward();
        convolver.kernel_spectrum.copy_from_slice(&convolver.transposed);

        log::debug!("Kernel spectrum cached for {}x{} grid", width, height);
        Ok(convolver)
    }

    /// `work` (row-major, spatial) -> `transposed` (column-major, spectral)
    fn forward(&mut self) {
        transform_lines(self.row_forward.as_ref(), &mut self.work, self.width);
        transpose(&self.work, &mut self.transposed, self.width, self.height);
        transform_lines(self.col_forward.as_ref(), &mut self.transposed, self.height);
    }

    /// `transposed` (column-major, spectral) -> `work` (row-major, spatial, unscaled)
    fn inverse(&mut self) {
        transform_lines(self.col_inverse.as_ref(), &mut self.transposed, self.height);
        transpose(&self.transposed, &mut self.work, self.height, self.width);
        transform_lines(self.row_inverse.as_ref(), &mut self.work, self.width);
    }
}

impl Convolution for SpectralConvolver {
    fn strategy(&self) -> ConvolutionStrategy {
        ConvolutionStrategy::Spectral
    }

    fn convolve(&mut self, field: &Field, activity: &mut [f64]) {
        for (slot, &v) in self.work.iter_mut().zip(field.cells()) {
            *slot = Complex::new(v, 0.0);
        }

        self.forward();
        self.transposed
            .par_iter_mut()
            .zip(self.kernel_spectrum.par_iter())
            .for_each(|(a, k)| *a *= *k);
        self.inverse();

        // rustfft leaves transforms unnormalized
        let scale = 1.0 / (self.width * self.height) as f64;
        activity
            .par_iter_mut()
            .zip(self.work.par_iter())
            .for_each(|(out, c)| *out = c.re * scale);
    }
}

/// Run `fft` over every consecutive line of length `len` in `data`
fn transform_lines(fft: &dyn Fft<f64>, data: &mut [Complex<f64>], len: usize) {
    let scratch_len = fft.get_inplace_scratch_len();
    data.par_chunks_mut(len).for_each_init(
        || vec![Complex::zero(); scratch_len],
        |scratch, line| fft.process_with_scratch(line, scratch),
    );
}

/// `src` is `rows` lines of `cols` values; `dst` receives `cols` lines of `rows` values
fn transpose(src: &[Complex<f64>], dst: &mut [Complex<f64>], cols: usize, rows: usize) {
    dst.par_chunks_mut(rows).enumerate().for_each(|(c, line)| {
        for (r, slot) in line.iter_mut().enumerate() {
            *slot = src[r * cols + c];
        }
    });
}
