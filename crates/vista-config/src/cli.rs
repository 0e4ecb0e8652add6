//! Command-line argument parsing.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use vista_noise::Seed;

use crate::Config;

/// What to render.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Stars, nebulae and a sun composited on black.
    #[default]
    Vista,
    /// Equirectangular diffuse, normal, specular and cloud maps.
    Planet,
    /// A lit planet disc.
    Disc,
}

/// Vista renderer command-line arguments.
///
/// CLI values override settings loaded from `config.ron`. Seed and size
/// flags apply to the section selected by `--mode`.
#[derive(Parser, Debug, Default)]
#[command(name = "vista", about = "Procedural space vista and planet renderer")]
pub struct CliArgs {
    #[arg(long, value_enum, default_value_t = Mode::Vista)]
    pub mode: Mode,

    /// Seed text; numbers and words are both accepted.
    #[arg(long, conflicts_with = "random_seed")]
    pub seed: Option<String>,

    /// Pick a fresh seed for this run.
    #[arg(long)]
    pub random_seed: bool,

    /// Output width (the disc size in disc mode).
    #[arg(long)]
    pub width: Option<u32>,

    /// Output height (ignored in disc mode).
    #[arg(long)]
    pub height: Option<u32>,

    /// Milliseconds of work per driver slice.
    #[arg(long)]
    pub frame_budget_ms: Option<u64>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl CliArgs {
    /// The seed requested on the command line, if any.
    pub fn seed_override(&self) -> Option<Seed> {
        if self.random_seed {
            Some(Seed::random())
        } else {
            self.seed.as_deref().map(Seed::from)
        }
    }
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        let seed = args.seed_override();
        match args.mode {
            Mode::Vista => {
                if let Some(seed) = seed {
                    self.vista.seed = seed;
                }
                if let Some(w) = args.width {
                    self.vista.width = w;
                }
                if let Some(h) = args.height {
                    self.vista.height = h;
                }
            }
            Mode::Planet => {
                if let Some(seed) = seed {
                    self.planet.seed = seed;
                }
                if let Some(w) = args.width {
                    self.planet.width = w;
                }
                if let Some(h) = args.height {
                    self.planet.height = h;
                }
            }
            Mode::Disc => {
                if let Some(seed) = seed {
                    self.disc.seed = seed;
                }
                if let Some(size) = args.width {
                    self.disc.size = size;
                }
            }
        }
        if let Some(ms) = args.frame_budget_ms {
            self.render.frame_budget_ms = ms;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
