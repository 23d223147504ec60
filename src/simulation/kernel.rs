//! Radial interaction kernels.
//!
//! A kernel is a sparse list of integer offsets within radius R, each with a
//! weight taken from a radial profile and normalized so the weights sum to 1.

use crate::config::{validate_radius, KernelShape};
use crate::error::Result;

/// One neighbor offset and its weight
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KernelEntry {
    pub dx: isize,
    pub dy: isize,
    pub weight: f64,
}

/// Normalized sparse kernel
#[derive(Clone, Debug, PartialEq)]
pub struct Kernel {
    entries: Vec<KernelEntry>,
    radius: f64,
    shape: KernelShape,
}

impl Kernel {
    /// Build a kernel covering every integer offset with |(dx, dy)| <= radius.
    ///
    /// Offsets whose weight underflows to zero are dropped. If nothing is left
    /// the kernel is empty and convolves every field to zero.
    pub fn build(radius: f64, shape: KernelShape) -> Result<Self> {
        validate_radius(radius)?;
        shape.validate()?;

        let reach = radius.ceil() as isize;
        let mut entries = Vec::new();
        let mut sum = 0.0;

        for dy in -reach..=reach {
            for dx in -reach..=reach {
                let dist = (dx as f64).hypot(dy as f64);
                if dist > radius {
                    continue;
                }
                let weight = profile(shape, dist, radius);
                if weight > 0.0 {
                    entries.push(KernelEntry { dx, dy, weight });
                    sum += weight;
                }
            }
        }

        if sum > 0.0 && sum.is_finite() {
            for entry in &mut entries {
                entry.weight /= sum;
            }
        } else {
            entries.clear();
        }

        log::debug!(
            "Built {:?} kernel: radius {}, {} entries",
            shape,
            radius,
            entries.len()
        );

        Ok(Self {
            entries,
            radius,
            shape,
        })
    }

    /// Ring-shaped Gaussian shell peaking at half the radius
    pub fn ring(radius: f64, shell_sigma: f64) -> Result<Self> {
        Self::build(radius, KernelShape::Ring { shell_sigma })
    }

    pub fn entries(&self) -> &[KernelEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn shape(&self) -> KernelShape {
        self.shape
    }

    pub fn total_weight(&self) -> f64 {
        self.entries.iter().map(|e| e.weight).sum()
    }

    /// Embed the kernel in a full width x height grid for cyclic convolution.
    ///
    /// Weight for offset (dx, dy) lands at (-dx mod width, -dy mod height), so
    /// that the cyclic product reproduces sum(w * field[y + dy][x + dx]).
    /// Offsets that alias onto the same cell on small grids accumulate.
    pub fn to_dense(&self, width: usize, height: usize) -> Vec<f64> {
        let mut dense = vec![0.0; width * height];
        for entry in &self.entries {
            let x = (-entry.dx).rem_euclid(width as isize) as usize;
            let y = (-entry.dy).rem_euclid(height as isize) as usize;
            dense[y * width + x] += entry.weight;
        }
        dense
    }
}

fn profile(shape: KernelShape, dist: f64, radius: f64) -> f64 {
    match shape {
        KernelShape::Ring { shell_sigma } => {
            let t = (dist / radius - 0.5) / shell_sigma;
            (-0.5 * t * t).exp()
        }
        KernelShape::Disc { sigma } => (-dist * dist / (2.0 * sigma * sigma)).exp(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;

    #[test]
    fn test_ring_normalized() {
        let kernel = Kernel::ring(6.0, 0.15).unwrap();
        assert!((kernel.total_weight() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_ring_peaks_at_half_radius() {
        let kernel = Kernel::ring(8.0, 0.15).unwrap();
        let weight_at = |dx: isize, dy: isize| {
            kernel
                .entries()
                .iter()
                .find(|e| e.dx == dx && e.dy == dy)
                .map(|e| e.weight)
                .unwrap_or(0.0)
        };
        assert!(weight_at(4, 0) > weight_at(0, 0));
        assert!(weight_at(4, 0) > weight_at(8, 0));
        assert!((weight_at(4, 0) - weight_at(0, -4)).abs() < 1e-15);
    }

    #[test]
    fn test_entries_within_radius() {
        let kernel = Kernel::ring(3.5, 0.2).unwrap();
        for e in kernel.entries() {
            assert!((e.dx as f64).hypot(e.dy as f64) <= 3.5);
        }
        assert!(kernel.entries().iter().any(|e| e.dx == 3 && e.dy == 1));
    }

    #[test]
    fn test_disc_normalized_and_centered() {
        let kernel = Kernel::build(5.0, KernelShape::Disc { sigma: 2.0 }).unwrap();
        assert!((kernel.total_weight() - 1.0).abs() < 1e-12);
        let center = kernel.entries().iter().find(|e| e.dx == 0 && e.dy == 0).unwrap();
        assert!(kernel.entries().iter().all(|e| e.weight <= center.weight));
    }

    #[test]
    fn test_invalid_radius() {
        assert!(matches!(
            Kernel::ring(0.0, 0.15),
            Err(EngineError::InvalidParameter(_))
        ));
        assert!(Kernel::ring(-1.0, 0.15).is_err());
        assert!(Kernel::ring(3.0, 0.0).is_err());
    }

    #[test]
    fn test_oversized_radius_rejected_before_enumeration() {
        assert!(matches!(
            Kernel::ring(1e7, 0.15),
            Err(EngineError::InvalidParameter(_))
        ));
        assert!(Kernel::ring(crate::config::MAX_KERNEL_RADIUS, 0.15).is_ok());
    }

    #[test]
    fn test_sub_cell_radius_keeps_center() {
        let kernel = Kernel::ring(0.5, 0.15).unwrap();
        assert_eq!(kernel.len(), 1);
        assert!((kernel.entries()[0].weight - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_underflowing_profile_yields_empty_kernel() {
        let kernel = Kernel::ring(0.5, 0.001).unwrap();
        assert!(kernel.is_empty());
        assert_eq!(kernel.total_weight(), 0.0);
    }

    #[test]
    fn test_dense_embedding_uses_negated_wrapped_offsets() {
        let kernel = Kernel::ring(2.0, 0.3).unwrap();
        let dense = kernel.to_dense(8, 8);
        assert!((dense.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        for e in kernel.entries() {
            let x = (-e.dx).rem_euclid(8) as usize;
            let y = (-e.dy).rem_euclid(8) as usize;
            assert!((dense[y * 8 + x] - e.weight).abs() < 1e-15);
        }
    }

    #[test]
    fn test_dense_embedding_accumulates_aliased_offsets() {
        // Radius 3 on a 4x4 torus: offsets 2 and -2 hit the same column
        let kernel = Kernel::ring(3.0, 0.3).unwrap();
        let dense = kernel.to_dense(4, 4);
        assert!((dense.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }
}
