use lenia_lorenz::config::SeedConfig;
use lenia_lorenz::{ConvolutionStrategy, Engine, EngineConfig, GrowthParams, KernelShape};

const AMPLITUDE: f64 = 0.8;
const SPREAD: f64 = 6.0;
const RADIUS: f64 = 6.0;
const SHELL: f64 = 0.15;
const MU: f64 = 0.3;
const SIGMA: f64 = 0.06;
const DT: f64 = 0.08;

fn blob(x: f64, y: f64) -> f64 {
    let d2 = (x - 8.0).powi(2) + (y - 8.0).powi(2);
    AMPLITUDE * (-d2 / (2.0 * SPREAD * SPREAD)).exp()
}

fn scenario_config(strategy: ConvolutionStrategy) -> EngineConfig {
    EngineConfig::new(16, 16)
        .with_kernel(RADIUS, KernelShape::ring(SHELL))
        .with_growth(GrowthParams::new(MU, SIGMA, DT))
        .with_seed_config(SeedConfig::blob(AMPLITUDE, SPREAD))
        .with_strategy(strategy)
}

/// Activity and next value of cell (8, 8), straight from the formulas
fn expected_center() -> (f64, f64) {
    let mut weighted = 0.0;
    let mut total = 0.0;
    for dy in -6i32..=6 {
        for dx in -6i32..=6 {
            let d = ((dx * dx + dy * dy) as f64).sqrt();
            if d > RADIUS {
                continue;
            }
            let w = (-0.5 * ((d / RADIUS - 0.5) / SHELL).powi(2)).exp();
            weighted += w * blob(8.0 + dx as f64, 8.0 + dy as f64);
            total += w;
        }
    }
    let u = weighted / total;
    let g = 2.0 * (-(u - MU).powi(2) / (2.0 * SIGMA * SIGMA)).exp() - 1.0;
    let next = (blob(8.0, 8.0) + DT * g).clamp(0.0, 1.0);
    (u, next)
}

#[test]
fn test_center_cell_matches_formulas() {
    let (u, next) = expected_center();
    assert!(u > 0.0 && u < AMPLITUDE);

    for strategy in [ConvolutionStrategy::Direct, ConvolutionStrategy::Spectral] {
        let mut engine = Engine::new(scenario_config(strategy)).unwrap();
        assert!((engine.read_field().get(8, 8) - AMPLITUDE).abs() < 1e-12);

        engine.step();
        let got = engine.read_field().get(8, 8);
        assert!(
            (got - next).abs() < 1e-6,
            "{:?}: expected {}, got {}",
            strategy,
            next,
            got
        );
    }
}

#[test]
fn test_fixed_params_twins_stay_identical() {
    let config = EngineConfig::new(32, 24)
        .with_kernel(RADIUS, KernelShape::ring(SHELL))
        .with_seed(1234);
    let mut a = Engine::new(config.clone()).unwrap();
    let mut b = Engine::new(config).unwrap();
    assert_eq!(a.snapshot(), b.snapshot());

    for _ in 0..60 {
        a.step();
        b.step();
        assert_eq!(a.read_field().cells(), b.read_field().cells());
        assert_eq!(a.growth_params(), b.growth_params());
    }
}

#[test]
fn test_modulated_twins_stay_identical() {
    let config = EngineConfig::new(20, 20).with_seed(5);
    let mut a = Engine::new(config.clone()).unwrap();
    let mut b = Engine::new(config).unwrap();
    a.set_parameter_modulator_enabled(true, 77);
    b.set_parameter_modulator_enabled(true, 77);

    for _ in 0..40 {
        a.step();
        b.step();
        assert_eq!(a.growth_params(), b.growth_params());
        assert_eq!(a.color_bias(), b.color_bias());
        assert_eq!(a.read_field().cells(), b.read_field().cells());
    }
}

#[test]
fn test_empty_kernel_support_gives_zero_activity() {
    // Every cell sees U = 0, so with mu = 0 growth is +1 everywhere
    let config = EngineConfig::new(8, 8)
        .with_kernel(0.5, KernelShape::ring(0.001))
        .with_growth(GrowthParams::new(0.0, 0.1, 0.25))
        .with_seed_config(SeedConfig::blob(0.0, 1.0));
    let mut engine = Engine::new(config).unwrap();
    assert!(engine.kernel().is_empty());

    engine.step();
    assert!(engine.read_field().cells().iter().all(|&v| v == 0.25));
}
