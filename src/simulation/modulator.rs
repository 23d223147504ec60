//! Chaotic drift of the growth parameters.
//!
//! A Lorenz system is stepped once per tick with its own Euler step, and the
//! growth parameters are nudged by bounded functions of its state. Nothing
//! here draws randomness after construction: the sequence is fixed by the
//! initial condition.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::{
    GrowthParams, COLOR_BIAS_SCALE, LORENZ_B, LORENZ_DT, LORENZ_ORIGIN, LORENZ_RHO,
    LORENZ_SEED_JITTER, LORENZ_SIGMA, MU_GAIN, MU_RANGE, MU_SCALE, SIGMA_GAIN, SIGMA_RANGE,
};

/// Lorenz attractor integrated with explicit Euler
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LorenzDriver {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub sigma: f64,
    pub rho: f64,
    pub b: f64,
    pub dt: f64,
}

impl LorenzDriver {
    /// Canonical coefficients from the given initial condition
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            sigma: LORENZ_SIGMA,
            rho: LORENZ_RHO,
            b: LORENZ_B,
            dt: LORENZ_DT,
        }
    }

    /// Canonical initial condition jittered by a seeded ChaCha stream
    pub fn from_seed(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let (x0, y0, z0) = LORENZ_ORIGIN;
        let mut jitter = || rng.gen_range(-LORENZ_SEED_JITTER..LORENZ_SEED_JITTER);
        Self::new(x0 + jitter(), y0 + jitter(), z0 + jitter())
    }

    pub fn step(&mut self) {
        let dx = self.sigma * (self.y - self.x);
        let dy = self.x * (self.rho - self.z) - self.y;
        let dz = self.x * self.y - self.b * self.z;
        self.x += dx * self.dt;
        self.y += dy * self.dt;
        self.z += dz * self.dt;
    }
}

impl Default for LorenzDriver {
    fn default() -> Self {
        let (x, y, z) = LORENZ_ORIGIN;
        Self::new(x, y, z)
    }
}

/// Owns the growth parameters while active
#[derive(Clone, Debug)]
pub struct ParameterModulator {
    driver: LorenzDriver,
    params: GrowthParams,
    color_bias: f64,
}

impl ParameterModulator {
    /// Start drifting from `params`
    pub fn new(driver: LorenzDriver, params: GrowthParams) -> Self {
        Self {
            driver,
            params,
            color_bias: 0.0,
        }
    }

    pub fn from_seed(seed: u64, params: GrowthParams) -> Self {
        Self::new(LorenzDriver::from_seed(seed), params)
    }

    /// Step the driver once and recompute the parameters from its state
    pub fn advance(&mut self) -> GrowthParams {
        self.driver.step();
        let LorenzDriver { x, y, z, .. } = self.driver;

        self.params.mu = (self.params.mu + MU_GAIN * (x / MU_SCALE).tanh())
            .clamp(MU_RANGE.0, MU_RANGE.1);
        self.params.sigma =
            (self.params.sigma * (1.0 + SIGMA_GAIN * y)).clamp(SIGMA_RANGE.0, SIGMA_RANGE.1);
        self.color_bias = (z / COLOR_BIAS_SCALE).tanh();

        self.params
    }

    pub fn params(&self) -> GrowthParams {
        self.params
    }

    /// Renderer hint in (-1, 1) derived from the driver's z
    pub fn color_bias(&self) -> f64 {
        self.color_bias
    }

    pub fn driver(&self) -> &LorenzDriver {
        &self.driver
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_lorenz_step() {
        let mut driver = LorenzDriver::default();
        driver.step();
        // dx = 10 * (0 - 0.1), dy = 0.1 * 28, dz = 0
        assert!((driver.x - 0.09).abs() < 1e-15);
        assert!((driver.y - 0.028).abs() < 1e-15);
        assert_eq!(driver.z, 0.0);
    }

    #[test]
    fn test_driver_stays_on_attractor_scale() {
        let mut driver = LorenzDriver::default();
        for _ in 0..20_000 {
            driver.step();
        }
        assert!(driver.x.abs() < 30.0 && driver.y.abs() < 40.0);
        assert!(driver.z > -1.0 && driver.z < 60.0);
    }

    #[test]
    fn test_seeded_driver_reproducible() {
        assert_eq!(LorenzDriver::from_seed(9), LorenzDriver::from_seed(9));
        assert_ne!(LorenzDriver::from_seed(9), LorenzDriver::from_seed(10));
    }

    #[test]
    fn test_params_stay_clamped() {
        let mut modulator = ParameterModulator::from_seed(1, GrowthParams::new(0.3, 0.06, 0.08));
        for _ in 0..5_000 {
            let p = modulator.advance();
            assert!((MU_RANGE.0..=MU_RANGE.1).contains(&p.mu));
            assert!((SIGMA_RANGE.0..=SIGMA_RANGE.1).contains(&p.sigma));
            assert_eq!(p.dt, 0.08);
            assert!(modulator.color_bias().abs() < 1.0);
        }
    }

    #[test]
    fn test_first_advance_mapping() {
        let start = GrowthParams::new(0.3, 0.06, 0.08);
        let mut modulator = ParameterModulator::new(LorenzDriver::default(), start);
        let p = modulator.advance();
        let expected_mu = 0.3 + MU_GAIN * (0.09f64 / MU_SCALE).tanh();
        let expected_sigma = 0.06 * (1.0 + SIGMA_GAIN * 0.028);
        assert!((p.mu - expected_mu).abs() < 1e-15);
        assert!((p.sigma - expected_sigma).abs() < 1e-15);
        assert_eq!(modulator.color_bias(), 0.0);
    }
}
