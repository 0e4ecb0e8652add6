//! The `vista` binary: render one job headlessly and report the encoded
//! output sizes.

use clap::Parser;
use tracing::{error, info};
use vista_app::{AppError, FrameDriver, PlatformDirs, RenderJob};
use vista_config::{CliArgs, Config};

fn run(args: &CliArgs) -> Result<(), AppError> {
    let mut dirs = PlatformDirs::resolve()?;
    if let Some(config_dir) = &args.config {
        dirs = dirs.with_config_dir(config_dir.clone());
    }
    dirs.create_dirs()?;

    let mut config = Config::load_or_create(&dirs.config_dir)?;
    config.apply_cli_overrides(args);
    vista_log::init_logging(
        Some(&dirs.log_dir),
        cfg!(debug_assertions),
        Some(&config),
    );
    info!(config = %dirs.config_dir.display(), logs = %dirs.log_dir.display(), "starting");

    let mut job = RenderJob::from_config(args.mode, &config)?;
    let mut driver = FrameDriver::from_millis(config.render.frame_budget_ms);
    driver.run_to_completion(&mut job);

    for output in job.into_outputs()? {
        let (width, height) = output.surface.dimensions();
        info!(
            name = output.name,
            width,
            height,
            bytes = output.png.len(),
            "encoded PNG"
        );
    }
    Ok(())
}

fn main() {
    let args = CliArgs::parse();
    if let Err(e) = run(&args) {
        // The subscriber may not be installed yet when setup fails.
        error!("{e}");
        eprintln!("vista: {e}");
        std::process::exit(1);
    }
}
