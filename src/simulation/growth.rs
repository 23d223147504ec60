//! Growth response and per-cell integration.

use crate::config::GrowthParams;

/// Gaussian-bump growth response in [-1, 1].
///
/// Peaks at 1 when `u == mu` and tends to -1 far from `mu`. A non-positive
/// `sigma` disables growth entirely.
#[inline]
pub fn growth(u: f64, mu: f64, sigma: f64) -> f64 {
    if sigma <= 0.0 {
        return 0.0;
    }
    // Scale before squaring: 2 * sigma^2 underflows for tiny sigma
    let t = (u - mu) / sigma;
    2.0 * (-0.5 * t * t).exp() - 1.0
}

/// One integration step for a single cell, clamped to [0, 1]
#[inline]
pub fn integrate(value: f64, u: f64, params: &GrowthParams) -> f64 {
    (value + params.dt * growth(u, params.mu, params.sigma)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peak_at_mu() {
        for sigma in [1e-6, 0.06, 0.5, 3.0] {
            assert_eq!(growth(0.3, 0.3, sigma), 1.0);
        }
    }

    #[test]
    fn test_far_from_mu_tends_to_minus_one() {
        assert!((growth(10.0, 0.3, 0.06) + 1.0).abs() < 1e-12);
        assert!(growth(0.5, 0.3, 0.06) < 0.0);
    }

    #[test]
    fn test_degenerate_sigma() {
        assert_eq!(growth(0.3, 0.3, 0.0), 0.0);
        assert_eq!(growth(0.9, 0.3, -0.5), 0.0);
    }

    #[test]
    fn test_narrowing_sigma_limit() {
        // Off-peak the response saturates at its floor; at the peak it stays 1
        let mut last = growth(0.31, 0.3, 0.1);
        for sigma in [0.05, 0.01, 0.005, 0.001, 1e-170, 1e-300] {
            let g = growth(0.31, 0.3, sigma);
            assert!(g <= last);
            last = g;
            assert_eq!(growth(0.3, 0.3, sigma), 1.0);
        }
        assert!((last + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_vanishing_sigma_stays_finite() {
        for sigma in [1e-170, 1e-300, f64::MIN_POSITIVE] {
            assert_eq!(growth(0.0, 0.0, sigma), 1.0);
            assert_eq!(growth(0.3, 0.0, sigma), -1.0);
        }
        let params = GrowthParams::new(0.0, 1e-170, 0.1);
        assert_eq!(integrate(0.0, 0.0, &params), 0.1);
    }

    #[test]
    fn test_range_bounded() {
        for i in 0..=100 {
            let u = i as f64 / 100.0;
            let g = growth(u, 0.3, 0.06);
            assert!((-1.0..=1.0).contains(&g));
        }
    }

    #[test]
    fn test_integrate_clamps() {
        let params = GrowthParams::new(0.3, 0.06, 0.5);
        assert_eq!(integrate(0.9, 0.3, &params), 1.0);
        assert_eq!(integrate(0.1, 5.0, &params), 0.0);
        let inert = GrowthParams::new(0.3, 0.0, 0.5);
        assert_eq!(integrate(0.42, 0.3, &inert), 0.42);
    }
}
