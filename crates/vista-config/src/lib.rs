//! Configuration for the vista renderer.
//!
//! Settings persist to disk as `config.ron`; command-line flags override them
//! for a single run. Unknown or missing sections fall back to defaults so old
//! files keep loading.

mod cli;
mod config;
mod error;

pub use cli::{CliArgs, Mode};
pub use config::{Config, DebugConfig, DiscConfig, PlanetConfig, RenderConfig, VistaConfig};
pub use error::ConfigError;
