use rand::Rng;

use crate::config::SeedConfig;
use crate::simulation::Field;

/// Seeds a field with a centered Gaussian blob plus sparse random cells
#[derive(Clone, Debug, Default)]
pub struct Initializer {
    config: SeedConfig,
}

impl Initializer {
    pub fn new(config: SeedConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SeedConfig {
        &self.config
    }

    /// Create a seeded field of the given size
    pub fn generate<R: Rng + ?Sized>(&self, width: usize, height: usize, rng: &mut R) -> Field {
        let mut field = Field::new(width, height);
        self.seed(&mut field, rng);
        field
    }

    /// Overwrite every cell of `field`.
    ///
    /// One perturbation draw is taken per cell in row-major order, so the same
    /// RNG state always yields the same field.
    pub fn seed<R: Rng + ?Sized>(&self, field: &mut Field, rng: &mut R) {
        let cfg = &self.config;
        let (cx, cy) = cfg
            .center
            .unwrap_or((field.width() / 2, field.height() / 2));
        let (lo, hi) = cfg.perturbation_range;
        let two_spread_sq = 2.0 * cfg.spread * cfg.spread;

        for y in 0..field.height() {
            for x in 0..field.width() {
                let dx = x as f64 - cx as f64;
                let dy = y as f64 - cy as f64;
                let dist_sq = dx * dx + dy * dy;

                let inside = cfg.cutoff.map_or(true, |cutoff| dist_sq < cutoff * cutoff);
                let mut value = if inside {
                    (cfg.amplitude * (-dist_sq / two_spread_sq).exp()).clamp(0.0, 1.0)
                } else {
                    0.0
                };

                if rng.gen::<f64>() < cfg.perturbation_fraction {
                    value = rng.gen_range(lo..hi);
                }

                field.set(x, y, value);
            }
        }
    }
}
