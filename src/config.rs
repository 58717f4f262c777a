//! Configuration
//!
//! Values come from, in order of precedence:
//! 1. Command-line flags
//! 2. The TOML file given by `--config`, or `car-media.toml` in the working directory
//! 3. Built-in defaults

use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Result;
use crate::screen::{PlayerScreenConfig, TapMode, VisibilityConfig};
use crate::session::ClockDeviceConfig;

pub const DEFAULT_CONFIG_FILE: &str = "car-media.toml";

#[derive(Parser, Debug, Default)]
#[command(name = "car-media")]
#[command(about = "Local audio and video player for the car")]
#[command(version)]
pub struct Cli {
    /// Folder to open in the browser on start
    pub folder: Option<PathBuf>,

    /// Configuration file
    #[arg(short, long, env = "CAR_MEDIA_CONFIG")]
    pub config: Option<PathBuf>,

    /// How taps on the player surface are interpreted
    #[arg(long, value_enum)]
    pub tap_mode: Option<TapMode>,

    /// Do not resume the last played track on start
    #[arg(long)]
    pub no_resume: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub library: LibraryConfig,
    pub state: StateConfig,
    pub logging: LoggingConfig,
    pub player: PlayerConfig,
    pub device: DeviceConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Storage roots shown at the top of the browser
    pub roots: Vec<PathBuf>,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        let mut roots = Vec::new();
        if let Some(home) = std::env::var_os("HOME") {
            roots.push(PathBuf::from(home));
        }
        roots.push(PathBuf::from("/media"));
        roots.push(PathBuf::from("/mnt"));
        Self { roots }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StateConfig {
    pub resume_file: PathBuf,
    pub resume_on_start: bool,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            resume_file: PathBuf::from(".cache/resume.json"),
            resume_on_start: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub dir: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(".logs"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub tap_mode: TapMode,
    pub auto_hide_ms: u64,
    pub double_tap_ms: u64,
    pub seek_step_ms: u64,
    pub progress_refresh_ms: u64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            tap_mode: TapMode::default(),
            auto_hide_ms: 3000,
            double_tap_ms: 300,
            seek_step_ms: 10_000,
            progress_refresh_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    pub audio_kbps: u64,
    pub video_kbps: u64,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        let clock = ClockDeviceConfig::default();
        Self {
            audio_kbps: clock.audio_kbps,
            video_kbps: clock.video_kbps,
        }
    }
}

impl AppConfig {
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Resolve the file to read, then apply flag overrides.
    ///
    /// An explicit `--config` must exist; the default file is optional.
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Self::from_file(default)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_cli(cli);
        Ok(config)
    }

    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(tap_mode) = cli.tap_mode {
            self.player.tap_mode = tap_mode;
        }
        if cli.no_resume {
            self.state.resume_on_start = false;
        }
    }

    pub fn player_screen(&self) -> PlayerScreenConfig {
        PlayerScreenConfig {
            visibility: VisibilityConfig {
                tap_mode: self.player.tap_mode,
                auto_hide: Duration::from_millis(self.player.auto_hide_ms),
                double_tap_window: Duration::from_millis(self.player.double_tap_ms),
            },
            seek_step_ms: self.player.seek_step_ms,
            progress_refresh: Duration::from_millis(self.player.progress_refresh_ms.max(1)),
        }
    }

    pub fn clock_device(&self) -> ClockDeviceConfig {
        ClockDeviceConfig {
            audio_kbps: self.device.audio_kbps,
            video_kbps: self.device.video_kbps,
        }
    }
}
