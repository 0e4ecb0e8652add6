//! The render job selected by `--mode`, and its encoded outputs.

use tracing::info;
use vista_config::{Config, ConfigError, Mode};
use vista_planet::{PlanetDiscGenerator, PlanetError, PlanetTextureGenerator, PlanetTextureParams};
use vista_raster::{GeneratorState, Incremental, Progress, RasterError, RasterSurface};
use vista_space::{SpaceError, VistaComposer};

use crate::platform::PlatformError;

/// Anything that can stop a render run.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error("vista: {0}")]
    Space(#[from] SpaceError),

    #[error("planet: {0}")]
    Planet(#[from] PlanetError),

    #[error("encoding: {0}")]
    Raster(#[from] RasterError),
}

/// One finished raster and its PNG encoding.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    /// Which map this is, e.g. `"vista"` or `"normal"`.
    pub name: &'static str,
    pub surface: RasterSurface,
    pub png: Vec<u8>,
}

/// A configured generator of any mode.
pub enum RenderJob {
    Vista(VistaComposer),
    Planet(Box<PlanetTextureGenerator>),
    Disc(PlanetDiscGenerator),
}

impl RenderJob {
    /// Build the job for `mode` from the matching config section.
    pub fn from_config(mode: Mode, config: &Config) -> Result<Self, AppError> {
        let policy = config.render.flush_policy();
        let job = match mode {
            Mode::Vista => {
                RenderJob::Vista(VistaComposer::new(config.vista.to_options(), policy)?)
            }
            Mode::Planet => {
                let params = PlanetTextureParams {
                    rows_per_flush: policy.rows_per_flush,
                    ..config.planet.params.clone()
                };
                RenderJob::Planet(Box::new(PlanetTextureGenerator::new(
                    &config.planet.seed,
                    config.planet.width,
                    config.planet.height,
                    params,
                )?))
            }
            Mode::Disc => RenderJob::Disc(PlanetDiscGenerator::new(
                &config.disc.seed,
                config.disc.size,
                policy,
            )?),
        };
        info!(?mode, "render job created");
        Ok(job)
    }

    /// Take the flushed rasters and encode each one to PNG.
    pub fn into_outputs(self) -> Result<Vec<RenderOutput>, AppError> {
        let surfaces = match self {
            RenderJob::Vista(composer) => vec![("vista", composer.into_canvas().into_front())],
            RenderJob::Planet(generator) => {
                let textures = generator.into_textures();
                vec![
                    ("diffuse", textures.diffuse),
                    ("normal", textures.normal),
                    ("specular", textures.specular),
                    ("cloud", textures.cloud),
                ]
            }
            RenderJob::Disc(disc) => vec![("disc", disc.into_canvas().into_front())],
        };
        surfaces
            .into_iter()
            .map(|(name, surface)| {
                let png = surface.encode_png()?;
                Ok(RenderOutput { name, surface, png })
            })
            .collect()
    }

    fn inner(&self) -> &dyn Incremental {
        match self {
            RenderJob::Vista(job) => job,
            RenderJob::Planet(job) => &**job,
            RenderJob::Disc(job) => job,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Incremental {
        match self {
            RenderJob::Vista(job) => job,
            RenderJob::Planet(job) => &mut **job,
            RenderJob::Disc(job) => job,
        }
    }
}

impl Incremental for RenderJob {
    fn advance(&mut self) -> Progress {
        self.inner_mut().advance()
    }

    fn state(&self) -> GeneratorState {
        self.inner().state()
    }

    fn status_label(&self) -> String {
        self.inner().status_label()
    }
}
