use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use pulseviz::{cli::Args, fs::validate_audio_file, logging, ui};

fn main() -> Result<()> {
    let args = Args::parse();

    // Keep the guard alive so buffered log lines are flushed on exit
    let _log_guard = logging::init(&args.log_config())?;

    let config = args.visualizer_config();
    if let Some(path) = &config.audio_path {
        match validate_audio_file(path) {
            Ok(mime) => info!("playing {} ({})", path.display(), mime),
            Err(e) => {
                error!("rejected {}: {}", path.display(), e);
                return Err(e).with_context(|| format!("Cannot play {}", path.display()));
            }
        }
    }

    ui::run(config)
}
