use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use forest_engine::{LoopConfig, Rgba};
use serde::Deserialize;
use thiserror::Error;

use super::gameplay::{Bounds, Form, NpcBehavior, Vec2};

pub(crate) const CONFIG_ENV_VAR: &str = "SHAPESHIFTER_CONFIG";

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config {} at {location}: {source}", path.display())]
    Parse {
        path: PathBuf,
        location: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config value at {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GameConfig {
    pub(crate) window: WindowConfig,
    pub(crate) world: WorldConfig,
    pub(crate) palette: Palette,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct WindowConfig {
    pub(crate) title: String,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) target_tps: u32,
    pub(crate) max_render_fps: Option<u32>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Shapeshifter in the Forest".to_string(),
            width: 800,
            height: 600,
            target_tps: 60,
            max_render_fps: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct WorldConfig {
    pub(crate) player_spawn: Vec2,
    pub(crate) npc_spawn: Vec2,
    /// Pixels per tick.
    pub(crate) player_speed: f32,
    pub(crate) npc_behavior: NpcBehavior,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            player_spawn: Vec2::new(100.0, 500.0),
            npc_spawn: Vec2::new(300.0, 500.0),
            player_speed: 4.0,
            npc_behavior: NpcBehavior::Idle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Palette {
    pub(crate) background: Rgba,
    pub(crate) player: Rgba,
    pub(crate) player_alt: Rgba,
    pub(crate) npc: Rgba,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Rgba::rgb(0x3e, 0x5d, 0x3a),
            player: Rgba::WHITE,
            player_alt: Rgba::rgb(0xa8, 0xda, 0xdc),
            npc: Rgba::rgb(0xf4, 0xa2, 0x61),
        }
    }
}

impl GameConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let window = &self.window;
        if window.width == 0 {
            return Err(invalid("window.width", "must be greater than zero"));
        }
        if window.height == 0 {
            return Err(invalid("window.height", "must be greater than zero"));
        }
        if window.target_tps == 0 {
            return Err(invalid("window.target_tps", "must be greater than zero"));
        }

        let world = &self.world;
        check_speed("world.player_speed", world.player_speed)?;
        if let NpcBehavior::Follow { speed } = world.npc_behavior {
            check_speed("world.npc_behavior.speed", speed)?;
        }
        check_spawn("world.player_spawn", Form::PlayerBase, world.player_spawn, window)?;
        check_spawn("world.npc_spawn", Form::Npc, world.npc_spawn, window)?;
        Ok(())
    }

    pub(crate) fn loop_config(&self) -> LoopConfig {
        LoopConfig {
            window_title: self.window.title.clone(),
            canvas_width: self.window.width,
            canvas_height: self.window.height,
            target_tps: self.window.target_tps,
            max_render_fps: self.window.max_render_fps,
            ..LoopConfig::default()
        }
    }
}

/// Where the config came from, for the startup log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ConfigSource {
    Defaults,
    File(PathBuf),
}

pub(crate) fn load_config() -> Result<(GameConfig, ConfigSource), ConfigError> {
    match env::var_os(CONFIG_ENV_VAR) {
        Some(path) if !path.is_empty() => {
            let path = PathBuf::from(path);
            let config = load_config_from_path(&path)?;
            Ok((config, ConfigSource::File(path)))
        }
        _ => Ok((GameConfig::default(), ConfigSource::Defaults)),
    }
}

pub(crate) fn load_config_from_path(path: &Path) -> Result<GameConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&raw, path)
}

pub(crate) fn parse_config(raw: &str, origin: &Path) -> Result<GameConfig, ConfigError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    let config: GameConfig =
        serde_path_to_error::deserialize(&mut deserializer).map_err(|error| {
            let path = error.path().to_string();
            let location = if path.is_empty() || path == "." {
                "root".to_string()
            } else {
                path
            };
            ConfigError::Parse {
                path: origin.to_path_buf(),
                location,
                source: error.into_inner(),
            }
        })?;
    config.validate()?;
    Ok(config)
}

fn invalid(field: &'static str, message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        message: message.into(),
    }
}

fn check_speed(field: &'static str, speed: f32) -> Result<(), ConfigError> {
    if !speed.is_finite() || speed < 0.0 {
        return Err(invalid(
            field,
            format!("expected a finite non-negative number, got {speed}"),
        ));
    }
    Ok(())
}

/// A spawn must keep the whole shape on the canvas.
fn check_spawn(
    field: &'static str,
    form: Form,
    spawn: Vec2,
    window: &WindowConfig,
) -> Result<(), ConfigError> {
    let bounds = Bounds {
        width: window.width as f32,
        height: window.height as f32,
    };
    if !form.fits(spawn, bounds) {
        return Err(invalid(
            field,
            format!(
                "({}, {}) puts the {} shape outside the {}x{} canvas",
                spawn.x,
                spawn.y,
                form.label(),
                window.width,
                window.height
            ),
        ));
    }
    Ok(())
}
