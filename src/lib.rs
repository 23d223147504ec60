//! Continuous cellular automaton (Lenia-style) simulation engine.
//!
//! A real-valued toroidal field is advanced by convolving it with a
//! normalized radial kernel and feeding the resulting activity through a
//! Gaussian growth response. Convolution runs either as a direct sum or in
//! the frequency domain, and the growth parameters can be driven by a Lorenz
//! attractor for slow aperiodic drift.
//!
//! ```
//! use lenia_lorenz::Engine;
//!
//! let mut engine = Engine::create(64, 64, 6.0, 0.15, 42).unwrap();
//! engine.set_parameter_modulator_enabled(true, 7);
//! engine.step();
//! assert!(engine.read_field().cells().iter().all(|v| (0.0..=1.0).contains(v)));
//! ```

pub mod app;
pub mod config;
pub mod error;
pub mod simulation;

pub use config::{ConvolutionStrategy, EngineConfig, GrowthParams, KernelShape, SeedConfig};
pub use error::{EngineError, Result};
pub use simulation::{Engine, Field, FieldView};
