use forest_engine::{Game, LoopConfig};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::config::{self, ConfigError, ConfigSource, CONFIG_ENV_VAR};
use super::gameplay::{ForestGame, WorldError};

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) game: Box<dyn Game>,
}

#[derive(Debug, Error)]
pub(crate) enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to build initial world: {0}")]
    World(#[from] WorldError),
}

pub(crate) fn build_app() -> Result<AppWiring, StartupError> {
    init_tracing();
    info!(version = env!("CARGO_PKG_VERSION"), "startup");

    let (game_config, source) = config::load_config()?;
    match &source {
        ConfigSource::Defaults => info!(env_var = CONFIG_ENV_VAR, "config_defaults"),
        ConfigSource::File(path) => info!(path = %path.display(), "config_loaded"),
    }

    let game = ForestGame::from_config(&game_config)?;
    Ok(AppWiring {
        config: game_config.loop_config(),
        game: Box::new(game),
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
