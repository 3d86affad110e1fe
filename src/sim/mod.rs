//! Request composition, dispatch and scripted sessions.

pub mod composer;
/// Artificial per-endpoint latency.
pub mod latency;
pub mod path;
/// Scripted call sequences loaded from TOML.
pub mod session;
pub mod simulator;
/// Request and response descriptors.
pub mod types;

pub use simulator::{DateSource, SimError, Simulator, SimulatorOptions};
