//! The simulation engine: owns both field buffers, the kernel, the active
//! convolution strategy and the growth parameters.
//!
//! Each tick runs modulator -> convolution -> growth/integration -> swap.
//! Configuration errors are raised by the constructor and the setters;
//! `step` has no failure mode.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::config::{ConvolutionStrategy, EngineConfig, GrowthParams, KernelShape};
use crate::error::{EngineError, Result};
use crate::simulation::convolution::{self, Convolution};
use crate::simulation::growth::integrate;
use crate::simulation::{Field, FieldBuffers, FieldView, Initializer, Kernel, ParameterModulator};

pub struct Engine {
    width: usize,
    height: usize,
    buffers: FieldBuffers,
    /// Activity scratch, reused every tick
    activity: Vec<f64>,
    kernel: Kernel,
    requested_strategy: ConvolutionStrategy,
    convolver: Box<dyn Convolution>,
    /// Parameters used by the next tick
    params: GrowthParams,
    /// Last externally supplied parameters
    base_params: GrowthParams,
    modulator: Option<ParameterModulator>,
    tick: u64,
}

impl Engine {
    /// Ring-kernel engine with default growth parameters and a seeded blob
    pub fn create(
        width: usize,
        height: usize,
        kernel_radius: f64,
        shell_sigma: f64,
        seed: u64,
    ) -> Result<Self> {
        let config = EngineConfig::new(width, height)
            .with_kernel(kernel_radius, KernelShape::ring(shell_sigma))
            .with_seed(seed);
        Self::new(config)
    }

    /// Build from a full configuration, seeding the field from `config.seed`
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let field = Initializer::new(config.seed_config).generate(config.width, config.height, &mut rng);
        Self::with_field(config, field)
    }

    /// Build from a configuration and an explicit initial field
    pub fn with_field(config: EngineConfig, field: Field) -> Result<Self> {
        config.validate()?;
        if field.width() != config.width || field.height() != config.height {
            return Err(EngineError::invalid(format!(
                "initial field is {}x{}, expected {}x{}",
                field.width(),
                field.height(),
                config.width,
                config.height
            )));
        }
        if field.cells().iter().any(|v| !(0.0..=1.0).contains(v)) {
            return Err(EngineError::invalid("initial field values must lie in [0, 1]"));
        }

        let kernel = Kernel::build(config.kernel_radius, config.kernel_shape)?;
        let convolver = convolution::select(config.strategy, &kernel, config.width, config.height)?;

        log::info!(
            "Engine created: {}x{} grid, kernel radius {} ({} entries), {:?}",
            config.width,
            config.height,
            config.kernel_radius,
            kernel.len(),
            config.growth
        );

        Ok(Self {
            width: config.width,
            height: config.height,
            buffers: FieldBuffers::new(field),
            activity: vec![0.0; config.width * config.height],
            kernel,
            requested_strategy: config.strategy,
            convolver,
            params: config.growth,
            base_params: config.growth,
            modulator: None,
            tick: 0,
        })
    }

    /// Advance exactly one generation
    pub fn step(&mut self) {
        if let Some(modulator) = self.modulator.as_mut() {
            self.params = modulator.advance();
        }

        let (current, next) = self.buffers.io_buffers();
        self.convolver.convolve(current, &mut self.activity);

        let width = self.width;
        let params = self.params;
        next.cells_mut()
            .par_chunks_mut(width)
            .zip(current.cells().par_chunks(width))
            .zip(self.activity.par_chunks(width))
            .for_each(|((next_row, current_row), activity_row)| {
                for ((out, &value), &u) in next_row.iter_mut().zip(current_row).zip(activity_row) {
                    *out = integrate(value, u, &params);
                }
            });

        self.buffers.swap();
        self.tick += 1;
        log::trace!("tick {} done ({:?})", self.tick, self.params);
    }

    /// Advance `n` generations
    pub fn steps(&mut self, n: u64) {
        for _ in 0..n {
            self.step();
        }
    }

    /// The last completed generation
    pub fn read_field(&self) -> FieldView<'_> {
        self.buffers.current().view()
    }

    /// Owned copy of the last completed generation
    pub fn snapshot(&self) -> Field {
        self.buffers.current().clone()
    }

    /// Replace the current generation without touching parameters or tick count
    pub fn load_field(&mut self, field: &Field) -> Result<()> {
        if field.width() != self.width || field.height() != self.height {
            return Err(EngineError::invalid(format!(
                "field is {}x{}, engine is {}x{}",
                field.width(),
                field.height(),
                self.width,
                self.height
            )));
        }
        if field.cells().iter().any(|v| !(0.0..=1.0).contains(v)) {
            return Err(EngineError::invalid("field values must lie in [0, 1]"));
        }
        self.buffers.load(field);
        Ok(())
    }

    /// Store new external parameters.
    ///
    /// They take effect immediately unless the modulator is active, in which
    /// case they are kept and restored when it is disabled.
    pub fn set_growth_params(&mut self, mu: f64, sigma: f64, dt: f64) -> Result<()> {
        let params = GrowthParams::new(mu, sigma, dt);
        params.validate()?;
        self.base_params = params;
        if self.modulator.is_some() {
            log::debug!("Modulator active, deferring {:?}", params);
        } else {
            self.params = params;
            log::debug!("Growth params set to {:?}", params);
        }
        Ok(())
    }

    /// Hand the growth parameters to a Lorenz-driven modulator, or take them back.
    ///
    /// Enabling always starts a fresh driver from `driver_seed` and the last
    /// external parameters.
    pub fn set_parameter_modulator_enabled(&mut self, enabled: bool, driver_seed: u64) {
        if enabled {
            self.modulator = Some(ParameterModulator::from_seed(driver_seed, self.base_params));
            self.params = self.base_params;
            log::debug!("Parameter modulator enabled (driver seed {})", driver_seed);
        } else if self.modulator.take().is_some() {
            self.params = self.base_params;
            log::debug!("Parameter modulator disabled, restored {:?}", self.params);
        }
    }

    /// Rebuild the kernel if radius or shape changed
    pub fn set_kernel(&mut self, radius: f64, shape: KernelShape) -> Result<()> {
        if radius == self.kernel.radius() && shape == self.kernel.shape() {
            return Ok(());
        }
        let kernel = Kernel::build(radius, shape)?;
        let convolver =
            convolution::select(self.requested_strategy, &kernel, self.width, self.height)?;
        log::debug!("Kernel rebuilt: radius {}, {:?}", radius, shape);
        self.kernel = kernel;
        self.convolver = convolver;
        Ok(())
    }

    /// Re-select the convolution engine
    pub fn set_strategy(&mut self, strategy: ConvolutionStrategy) -> Result<()> {
        self.convolver = convolution::select(strategy, &self.kernel, self.width, self.height)?;
        self.requested_strategy = strategy;
        Ok(())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Parameters the next tick starts from
    pub fn growth_params(&self) -> GrowthParams {
        self.params
    }

    pub fn is_modulated(&self) -> bool {
        self.modulator.is_some()
    }

    /// Renderer hint from the modulator; 0 when it is off
    pub fn color_bias(&self) -> f64 {
        self.modulator.as_ref().map_or(0.0, |m| m.color_bias())
    }

    /// The strategy actually in use (never `Auto`)
    pub fn strategy(&self) -> ConvolutionStrategy {
        self.convolver.strategy()
    }

    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    pub fn total_mass(&self) -> f64 {
        self.buffers.current().total_mass()
    }
}
