mod buffers;
pub mod convolution;
mod engine;
mod field;
pub mod growth;
mod kernel;
mod modulator;
mod seed;

pub use buffers::FieldBuffers;
pub use convolution::{Convolution, DirectConvolver, SpectralConvolver};
pub use engine::Engine;
pub use field::{Field, FieldView};
pub use growth::growth;
pub use kernel::{Kernel, KernelEntry};
pub use modulator::{LorenzDriver, ParameterModulator};
pub use seed::Initializer;
