use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default tuning values, in field pixels and milliseconds.
#[derive(Debug, Clone, Copy)]
pub struct Params;

impl Params {
    // Field
    pub const FIELD_WIDTH: f64 = 400.0;
    pub const FIELD_HEIGHT: f64 = 600.0;
    pub const GROUND_HEIGHT: f64 = 40.0;

    // Bird
    pub const BIRD_X: f64 = 40.0;
    pub const BIRD_HEIGHT: f64 = 60.0;
    pub const PLACEHOLDER_WIDTH: f64 = 34.0;
    pub const PLACEHOLDER_HEIGHT: f64 = 24.0;
    pub const GRAVITY: f64 = 0.35;
    pub const JUMP: f64 = -6.5;

    // Pipes
    pub const PIPE_WIDTH: f64 = 52.0;
    pub const PIPE_GAP: f64 = 110.0;
    pub const PIPE_SPEED: f64 = 2.0;
    pub const SPAWN_INTERVAL_MS: f64 = 1500.0;
    pub const MIN_TOP: f64 = 40.0;
    pub const GROUND_MARGIN: f64 = 80.0;

    // Time
    pub const TIME_SCALE: f64 = 0.06; // ms -> 60 Hz steps
    pub const FALLBACK_DELTA_MS: f64 = 16.0;
    pub const ASSET_TIMEOUT_MS: u64 = 3000;
}

/// Game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub field_width: f64,
    pub field_height: f64,
    pub ground_height: f64,
    pub bird_x: f64,
    pub bird_height: f64,
    pub placeholder_width: f64,
    pub placeholder_height: f64,
    pub gravity: f64,
    pub jump: f64,
    pub pipe_width: f64,
    pub pipe_gap: f64,
    pub pipe_speed: f64,
    pub spawn_interval_ms: f64,
    pub min_top: f64,
    pub ground_margin: f64,
    pub time_scale: f64,
    pub fallback_delta_ms: f64,
    pub asset_timeout_ms: u64,
    pub seed: Option<u64>,
    pub sprite_path: Option<PathBuf>,
    pub sound: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            field_width: Params::FIELD_WIDTH,
            field_height: Params::FIELD_HEIGHT,
            ground_height: Params::GROUND_HEIGHT,
            bird_x: Params::BIRD_X,
            bird_height: Params::BIRD_HEIGHT,
            placeholder_width: Params::PLACEHOLDER_WIDTH,
            placeholder_height: Params::PLACEHOLDER_HEIGHT,
            gravity: Params::GRAVITY,
            jump: Params::JUMP,
            pipe_width: Params::PIPE_WIDTH,
            pipe_gap: Params::PIPE_GAP,
            pipe_speed: Params::PIPE_SPEED,
            spawn_interval_ms: Params::SPAWN_INTERVAL_MS,
            min_top: Params::MIN_TOP,
            ground_margin: Params::GROUND_MARGIN,
            time_scale: Params::TIME_SCALE,
            fallback_delta_ms: Params::FALLBACK_DELTA_MS,
            asset_timeout_ms: Params::ASSET_TIMEOUT_MS,
            seed: None,
            sprite_path: None,
            sound: true,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Where the config is looked up when no `--config` flag is given.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("flappy-canvas").join("config.json"))
    }

    /// Load the config from `path`, or from [`Config::default_path`] if it
    /// exists, or fall back to defaults.
    ///
    /// An explicit path that cannot be read is an error; a missing default
    /// file is not.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(default) if default.exists() => Self::from_file(&default)?,
                _ => Self::default(),
            },
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Highest allowed top-segment height for a freshly spawned pipe.
    pub fn max_top(&self) -> f64 {
        self.field_height - self.pipe_gap - self.ground_margin
    }

    /// Y of the ground strip's top edge.
    pub fn ground_y(&self) -> f64 {
        self.field_height - self.ground_height
    }

    pub fn placeholder_aspect(&self) -> f64 {
        self.placeholder_width / self.placeholder_height
    }

    /// Reject values that would make the field unplayable or the math
    /// non-finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("field_width", self.field_width),
            ("field_height", self.field_height),
            ("bird_height", self.bird_height),
            ("placeholder_width", self.placeholder_width),
            ("placeholder_height", self.placeholder_height),
            ("pipe_width", self.pipe_width),
            ("pipe_gap", self.pipe_gap),
            ("pipe_speed", self.pipe_speed),
            ("spawn_interval_ms", self.spawn_interval_ms),
            ("time_scale", self.time_scale),
            ("fallback_delta_ms", self.fallback_delta_ms),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }

        let finite = [
            ("ground_height", self.ground_height),
            ("bird_x", self.bird_x),
            ("gravity", self.gravity),
            ("jump", self.jump),
            ("min_top", self.min_top),
            ("ground_margin", self.ground_margin),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::Invalid(format!("{} must be finite", name)));
            }
        }

        if self.ground_height < 0.0 || self.ground_height >= self.field_height {
            return Err(ConfigError::Invalid(format!(
                "ground_height {} does not fit a field {} tall",
                self.ground_height, self.field_height
            )));
        }
        if self.max_top() < self.min_top {
            return Err(ConfigError::Invalid(format!(
                "pipe_gap {} leaves no room for pipes between min_top {} and ground_margin {}",
                self.pipe_gap, self.min_top, self.ground_margin
            )));
        }
        if self.bird_height >= self.pipe_gap {
            return Err(ConfigError::Invalid(format!(
                "bird_height {} does not fit through pipe_gap {}",
                self.bird_height, self.pipe_gap
            )));
        }
        Ok(())
    }
}
