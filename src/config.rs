use crate::error::{EngineError, Result};

/// Default grid dimensions
pub const GRID_WIDTH: usize = 128;
pub const GRID_HEIGHT: usize = 128;

// ============================================
// Kernel
// ============================================

/// Kernel radius in cells
pub const KERNEL_RADIUS: f64 = 6.0;

/// Largest accepted kernel radius in cells
pub const MAX_KERNEL_RADIUS: f64 = 1024.0;

/// Width of the Gaussian shell, relative to the radius (peak sits at R/2)
pub const SHELL_SIGMA: f64 = 0.15;

// ============================================
// Growth function
// ============================================

/// Activity level of maximum growth
pub const GROWTH_MU: f64 = 0.3;

/// Response width of the growth bump
pub const GROWTH_SIGMA: f64 = 0.06;

/// Integration step applied to the field
pub const GROWTH_DT: f64 = 0.08;

// ============================================
// Initial seed
// ============================================

/// Peak value of the centered blob
pub const BLOB_AMPLITUDE: f64 = 0.9;

/// Gaussian spread of the blob in cells
pub const BLOB_SPREAD: f64 = 6.0;

/// Blob is truncated beyond this distance from its center
pub const BLOB_CUTOFF: f64 = 12.0;

/// Fraction of cells overwritten with random values
pub const PERTURBATION_FRACTION: f64 = 0.002;

/// Range of the random values written to perturbed cells
pub const PERTURBATION_MIN: f64 = 0.0;
pub const PERTURBATION_MAX: f64 = 1.0;

// ============================================
// Lorenz driver
// ============================================

pub const LORENZ_SIGMA: f64 = 10.0;
pub const LORENZ_RHO: f64 = 28.0;
pub const LORENZ_B: f64 = 8.0 / 3.0;

/// Euler step of the driver, independent of the field's dt
pub const LORENZ_DT: f64 = 0.01;

/// Canonical initial condition
pub const LORENZ_ORIGIN: (f64, f64, f64) = (0.1, 0.0, 0.0);

/// Half-width of the seeded jitter applied to the initial condition
pub const LORENZ_SEED_JITTER: f64 = 0.05;

/// mu drifts by MU_GAIN * tanh(x / MU_SCALE) per tick
pub const MU_GAIN: f64 = 0.002;
pub const MU_SCALE: f64 = 20.0;
pub const MU_RANGE: (f64, f64) = (0.01, 1.0);

/// sigma is scaled by (1 + SIGMA_GAIN * y) per tick
pub const SIGMA_GAIN: f64 = 0.001;
pub const SIGMA_RANGE: (f64, f64) = (0.001, 1.0);

/// color bias = tanh(z / COLOR_BIAS_SCALE)
pub const COLOR_BIAS_SCALE: f64 = 30.0;

// ============================================
// Convolution strategy
// ============================================

/// Auto picks the transform when |kernel| > CROSSOVER * log2(W*H)
pub const SPECTRAL_CROSSOVER: f64 = 4.0;

/// Largest grid the transform strategy accepts (cells)
pub const MAX_SPECTRAL_CELLS: usize = 1 << 24;

// ============================================
// Host loop
// ============================================

/// Tick cadence cap for the host loop (0 = uncapped)
pub const TARGET_TICK_RATE: f64 = 60.0;

/// Default number of ticks the host loop runs
pub const DEFAULT_TICKS: u64 = 600;

/// Radial profile of the interaction kernel
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum KernelShape {
    /// Gaussian shell peaking at half the radius; `shell_sigma` is relative to R
    Ring { shell_sigma: f64 },
    /// Plain Gaussian disc; `sigma` is in cells
    Disc { sigma: f64 },
}

impl KernelShape {
    pub fn ring(shell_sigma: f64) -> Self {
        Self::Ring { shell_sigma }
    }

    fn width(&self) -> f64 {
        match *self {
            Self::Ring { shell_sigma } => shell_sigma,
            Self::Disc { sigma } => sigma,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let w = self.width();
        if !w.is_finite() || w <= 0.0 {
            return Err(EngineError::invalid(format!(
                "kernel shape width must be positive, got {}",
                w
            )));
        }
        Ok(())
    }
}

impl Default for KernelShape {
    fn default() -> Self {
        Self::Ring {
            shell_sigma: SHELL_SIGMA,
        }
    }
}

/// Which convolution engine computes the activity field
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConvolutionStrategy {
    /// Choose from kernel size and grid size
    #[default]
    Auto,
    /// Direct spatial sum over kernel entries
    Direct,
    /// Frequency-domain product via FFT
    Spectral,
}

/// Growth function parameters
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GrowthParams {
    pub mu: f64,
    pub sigma: f64,
    pub dt: f64,
}

impl GrowthParams {
    pub fn new(mu: f64, sigma: f64, dt: f64) -> Self {
        Self { mu, sigma, dt }
    }

    /// sigma <= 0 is accepted: it switches growth off.
    pub fn validate(&self) -> Result<()> {
        if !self.mu.is_finite() || !self.sigma.is_finite() {
            return Err(EngineError::invalid(format!(
                "growth mu/sigma must be finite, got mu={} sigma={}",
                self.mu, self.sigma
            )));
        }
        if !self.dt.is_finite() || self.dt < 0.0 {
            return Err(EngineError::invalid(format!(
                "growth dt must be finite and non-negative, got {}",
                self.dt
            )));
        }
        Ok(())
    }
}

impl Default for GrowthParams {
    fn default() -> Self {
        Self::new(GROWTH_MU, GROWTH_SIGMA, GROWTH_DT)
    }
}

/// Centered blob plus sparse random perturbations
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeedConfig {
    pub amplitude: f64,
    pub spread: f64,
    /// Cells farther than this from the center stay zero; `None` keeps the full Gaussian
    pub cutoff: Option<f64>,
    /// Blob center; `None` uses (width / 2, height / 2)
    pub center: Option<(usize, usize)>,
    pub perturbation_fraction: f64,
    pub perturbation_range: (f64, f64),
}

impl SeedConfig {
    /// Blob only, no cutoff and no perturbations
    pub fn blob(amplitude: f64, spread: f64) -> Self {
        Self {
            amplitude,
            spread,
            cutoff: None,
            center: None,
            perturbation_fraction: 0.0,
            perturbation_range: (PERTURBATION_MIN, PERTURBATION_MAX),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.amplitude.is_finite() || !self.spread.is_finite() || self.spread <= 0.0 {
            return Err(EngineError::invalid(format!(
                "blob amplitude must be finite and spread positive, got amplitude={} spread={}",
                self.amplitude, self.spread
            )));
        }
        if let Some(cutoff) = self.cutoff {
            if !cutoff.is_finite() || cutoff <= 0.0 {
                return Err(EngineError::invalid(format!(
                    "blob cutoff must be positive, got {}",
                    cutoff
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.perturbation_fraction) {
            return Err(EngineError::invalid(format!(
                "perturbation fraction must lie in [0, 1], got {}",
                self.perturbation_fraction
            )));
        }
        let (lo, hi) = self.perturbation_range;
        if !(0.0..=1.0).contains(&lo) || !(0.0..=1.0).contains(&hi) || lo >= hi {
            return Err(EngineError::invalid(format!(
                "perturbation range must be an increasing interval inside [0, 1], got [{}, {})",
                lo, hi
            )));
        }
        Ok(())
    }
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            amplitude: BLOB_AMPLITUDE,
            spread: BLOB_SPREAD,
            cutoff: Some(BLOB_CUTOFF),
            center: None,
            perturbation_fraction: PERTURBATION_FRACTION,
            perturbation_range: (PERTURBATION_MIN, PERTURBATION_MAX),
        }
    }
}

/// Everything needed to construct an engine
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    pub width: usize,
    pub height: usize,
    pub kernel_radius: f64,
    pub kernel_shape: KernelShape,
    pub growth: GrowthParams,
    pub strategy: ConvolutionStrategy,
    pub seed_config: SeedConfig,
    pub seed: u64,
}

impl EngineConfig {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_kernel(mut self, radius: f64, shape: KernelShape) -> Self {
        self.kernel_radius = radius;
        self.kernel_shape = shape;
        self
    }

    pub fn with_growth(mut self, growth: GrowthParams) -> Self {
        self.growth = growth;
        self
    }

    pub fn with_strategy(mut self, strategy: ConvolutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_seed_config(mut self, seed_config: SeedConfig) -> Self {
        self.seed_config = seed_config;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Reject anything that would make a tick fail later
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(EngineError::invalid(format!(
                "grid dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width.checked_mul(self.height).is_none() {
            return Err(EngineError::invalid(format!(
                "grid {}x{} overflows the cell count",
                self.width, self.height
            )));
        }
        validate_radius(self.kernel_radius)?;
        self.kernel_shape.validate()?;
        self.growth.validate()?;
        self.seed_config.validate()?;
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: GRID_WIDTH,
            height: GRID_HEIGHT,
            kernel_radius: KERNEL_RADIUS,
            kernel_shape: KernelShape::default(),
            growth: GrowthParams::default(),
            strategy: ConvolutionStrategy::default(),
            seed_config: SeedConfig::default(),
            seed: 0,
        }
    }
}

pub(crate) fn validate_radius(radius: f64) -> Result<()> {
    if !radius.is_finite() || radius <= 0.0 {
        return Err(EngineError::invalid(format!(
            "kernel radius must be positive, got {}",
            radius
        )));
    }
    if radius > MAX_KERNEL_RADIUS {
        return Err(EngineError::invalid(format!(
            "kernel radius must not exceed {}, got {}",
            MAX_KERNEL_RADIUS, radius
        )));
    }
    Ok(())
}
