use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::config::{DEFAULT_TICKS, TARGET_TICK_RATE};
use crate::simulation::Engine;

/// How the host loop drives the engine
#[derive(Clone, Debug)]
pub struct RunSettings {
    pub ticks: u64,
    /// Ticks per second cap (0 = uncapped)
    pub tick_rate: f64,
    /// Raw native-endian f64 dump of the final field
    pub dump: Option<PathBuf>,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            ticks: DEFAULT_TICKS,
            tick_rate: TARGET_TICK_RATE,
            dump: None,
        }
    }
}

/// Headless host loop: owns the engine and decides tick cadence
pub struct App {
    engine: Engine,
    settings: RunSettings,
    tick_counter: TickCounter,
}

impl App {
    pub fn new(engine: Engine, settings: RunSettings) -> Self {
        Self {
            engine,
            settings,
            tick_counter: TickCounter::new(),
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Run the configured number of ticks, then write the dump if requested
    pub fn run(&mut self) -> std::io::Result<()> {
        log::info!(
            "Running {} ticks on {}x{} grid ({:?} convolution, modulator {})",
            self.settings.ticks,
            self.engine.width(),
            self.engine.height(),
            self.engine.strategy(),
            if self.engine.is_modulated() { "ON" } else { "OFF" }
        );

        let frame_time = if self.settings.tick_rate > 0.0 {
            Some(Duration::from_secs_f64(1.0 / self.settings.tick_rate))
        } else {
            None
        };

        for _ in 0..self.settings.ticks {
            let started = Instant::now();
            self.engine.step();

            if let Some(tps) = self.tick_counter.tick() {
                let params = self.engine.growth_params();
                log::info!(
                    "tick {} - {:.0} ticks/s - mass {:.2} - mu {:.3} sigma {:.3} dt {:.3}",
                    self.engine.tick_count(),
                    tps,
                    self.engine.total_mass(),
                    params.mu,
                    params.sigma,
                    params.dt
                );
            }

            if let Some(frame_time) = frame_time {
                let elapsed = started.elapsed();
                if elapsed < frame_time {
                    std::thread::sleep(frame_time - elapsed);
                }
            }
        }

        self.log_summary();

        if let Some(path) = &self.settings.dump {
            std::fs::write(path, self.engine.read_field().as_bytes())?;
            log::info!("Final field written to {}", path.display());
        }
        Ok(())
    }

    fn log_summary(&self) {
        let params = self.engine.growth_params();
        let field = self.engine.read_field();
        let peak = field.cells().iter().copied().fold(0.0, f64::max);
        log::info!("Finished after {} ticks", self.engine.tick_count());
        log::info!("  mass: {:.3}, peak: {:.3}", self.engine.total_mass(), peak);
        log::info!(
            "  mu: {:.4}, sigma: {:.4}, dt: {:.4}, color bias: {:.3}",
            params.mu,
            params.sigma,
            params.dt,
            self.engine.color_bias()
        );
    }
}

/// Simple tick-rate counter
struct TickCounter {
    last_update: Instant,
    tick_count: u32,
}

impl TickCounter {
    fn new() -> Self {
        Self {
            last_update: Instant::now(),
            tick_count: 0,
        }
    }

    /// Tick the counter, returns Some(ticks per second) every second
    fn tick(&mut self) -> Option<f64> {
        self.tick_count += 1;
        let elapsed = self.last_update.elapsed();

        if elapsed.as_secs_f64() >= 1.0 {
            let rate = self.tick_count as f64 / elapsed.as_secs_f64();
            self.tick_count = 0;
            self.last_update = Instant::now();
            Some(rate)
        } else {
            None
        }
    }
}
