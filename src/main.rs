use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use lenia_lorenz::app::{App, RunSettings};
use lenia_lorenz::config::{
    DEFAULT_TICKS, GRID_HEIGHT, GRID_WIDTH, KERNEL_RADIUS, SHELL_SIGMA, TARGET_TICK_RATE,
};
use lenia_lorenz::{ConvolutionStrategy, Engine, EngineConfig, KernelShape};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StrategyArg {
    Auto,
    Direct,
    Spectral,
}

impl From<StrategyArg> for ConvolutionStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Auto => ConvolutionStrategy::Auto,
            StrategyArg::Direct => ConvolutionStrategy::Direct,
            StrategyArg::Spectral => ConvolutionStrategy::Spectral,
        }
    }
}

/// Headless Lenia simulation with optional Lorenz-driven parameter drift
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    #[arg(long, default_value_t = GRID_WIDTH)]
    width: usize,

    #[arg(long, default_value_t = GRID_HEIGHT)]
    height: usize,

    /// Kernel radius in cells
    #[arg(long, default_value_t = KERNEL_RADIUS)]
    radius: f64,

    /// Ring shell width relative to the radius
    #[arg(long, default_value_t = SHELL_SIGMA)]
    shell_sigma: f64,

    /// Seed for the initial field
    #[arg(long, default_value_t = 0)]
    seed: u64,

    #[arg(long, default_value_t = DEFAULT_TICKS)]
    ticks: u64,

    /// Ticks per second cap (0 = uncapped)
    #[arg(long, default_value_t = TARGET_TICK_RATE)]
    tick_rate: f64,

    #[arg(long, value_enum, default_value_t = StrategyArg::Auto)]
    strategy: StrategyArg,

    /// Drive mu/sigma from a Lorenz attractor
    #[arg(long)]
    modulate: bool,

    /// Seed for the Lorenz initial condition
    #[arg(long, default_value_t = 0)]
    driver_seed: u64,

    /// Write the final field as raw f64 values
    #[arg(long)]
    dump: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let config = EngineConfig::new(args.width, args.height)
        .with_kernel(args.radius, KernelShape::ring(args.shell_sigma))
        .with_strategy(args.strategy.into())
        .with_seed(args.seed);

    let mut engine = Engine::new(config)?;
    if args.modulate {
        engine.set_parameter_modulator_enabled(true, args.driver_seed);
    }

    let settings = RunSettings {
        ticks: args.ticks,
        tick_rate: args.tick_rate,
        dump: args.dump,
    };

    App::new(engine, settings).run()?;
    Ok(())
}
