use std::path::PathBuf;

use clap::Parser;
use glsamples_core::config::SampleConfig;
use glsamples_core::sample::SampleKind;

#[derive(Parser, Debug)]
#[command(
    name = "glsamples-client",
    version,
    about = "Small OpenGL shader samples"
)]
pub struct Cli {
    /// Sample to run: `simple-vs2ps`, `bump-mapping` or `shadow-mapping`.
    #[arg(value_name = "SAMPLE")]
    pub sample: SampleKind,

    /// Configuration file (defaults to `<config dir>/glsamples/config.json`).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory holding one subdirectory of shaders and textures per sample.
    #[arg(long, value_name = "DIR")]
    pub assets: Option<PathBuf>,

    /// One of `error`, `warn`, `info`, `debug`, `trace`.
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,
}

impl Cli {
    /// Command-line values take precedence over the configuration file.
    pub fn apply_overrides(&self, config: &mut SampleConfig) {
        if let Some(assets) = &self.assets {
            config.asset_dir = assets.clone();
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
    }
}
