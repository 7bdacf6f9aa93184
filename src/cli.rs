use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::config::{self, Settings};
use crate::display::{GraphicsApi, MODE_CUSTOM};
use crate::logging::LogLevel;

/// Display surface test harness: opens the game window the way the client
/// does and presents frames until closed.
#[derive(Parser, Debug, Default)]
#[command(name = "glimp")]
#[command(version)]
#[command(about = "Open a game window and negotiate a rendering context", long_about = None)]
pub struct Cli {
    /// Settings file to load
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write archived settings back to the settings file on exit
    #[arg(long)]
    pub save: bool,

    /// Set any setting (can be specified multiple times)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,

    /// Video mode index (-2 desktop, -1 custom)
    #[arg(short, long, value_name = "N", allow_hyphen_values = true)]
    pub mode: Option<i32>,

    /// Custom resolution, implies mode -1 (e.g., 1920x1080)
    #[arg(short, long, value_name = "WIDTHxHEIGHT")]
    pub res: Option<String>,

    /// Enable fullscreen mode
    #[arg(short, long)]
    pub fullscreen: bool,

    /// Disable fullscreen mode
    #[arg(short, long, conflicts_with = "fullscreen")]
    pub windowed: bool,

    /// Borderless window
    #[arg(long)]
    pub noborder: bool,

    /// Center the window on the desktop
    #[arg(long)]
    pub center: bool,

    /// Swap interval (0 off, 1 vsync, -1 adaptive)
    #[arg(long, value_name = "N", allow_hyphen_values = true)]
    pub vsync: Option<i32>,

    /// Create a plain window without an OpenGL context
    #[arg(long = "nogl")]
    pub nogl: bool,

    /// Console log level (0 nothing .. 6 all)
    #[arg(short, long, value_name = "LEVEL")]
    pub log_level: Option<i32>,

    /// Frames to present before exiting (runs until closed when omitted)
    #[arg(long, value_name = "COUNT")]
    pub frames: Option<u64>,

    /// Print the video-mode table and exit
    #[arg(long)]
    pub list_modes: bool,
}

impl Cli {
    /// Apply command line overrides on top of loaded settings.
    pub fn merge_into_settings(&self, settings: &mut Settings) -> Result<()> {
        for assignment in &self.set {
            let (key, value) = Self::parse_assignment(assignment)?;
            settings
                .set(key, value)
                .with_context(|| format!("Cannot set {}", key))?;
        }

        if let Some(mode) = self.mode {
            settings.set(config::R_MODE, &mode.to_string())?;
        }

        if let Some(ref res) = self.res {
            let (width, height) = parse_resolution(res).context("Invalid resolution format")?;
            settings.set(config::R_MODE, &MODE_CUSTOM.to_string())?;
            settings.set(config::R_CUSTOM_WIDTH, &width.to_string())?;
            settings.set(config::R_CUSTOM_HEIGHT, &height.to_string())?;
        }

        if self.fullscreen {
            settings.set(config::R_FULLSCREEN, "1")?;
        }
        if self.windowed {
            settings.set(config::R_FULLSCREEN, "0")?;
        }
        if self.noborder {
            settings.set(config::R_NOBORDER, "1")?;
        }
        if self.center {
            settings.set(config::R_CENTER_WINDOW, "1")?;
        }
        if let Some(interval) = self.vsync {
            settings.set(config::R_SWAP_INTERVAL, &interval.to_string())?;
        }

        Ok(())
    }

    pub fn graphics_api(&self) -> GraphicsApi {
        if self.nogl {
            GraphicsApi::Plain
        } else {
            GraphicsApi::OpenGl
        }
    }

    pub fn log_level(&self) -> LogLevel {
        self.log_level.map_or(LogLevel::Info, LogLevel::from_i32)
    }

    fn parse_assignment(s: &str) -> Result<(&str, &str)> {
        let (key, value) = s
            .split_once('=')
            .with_context(|| format!("Expected KEY=VALUE, got '{}'", s))?;
        let key = key.trim();
        if key.is_empty() {
            anyhow::bail!("Setting name missing in '{}'", s);
        }
        Ok((key, value.trim()))
    }
}

/// Parse a resolution string like "1920x1080"
pub fn parse_resolution(s: &str) -> Result<(i32, i32)> {
    let parts: Vec<&str> = s.split('x').collect();
    if parts.len() != 2 {
        anyhow::bail!("Resolution must be in WIDTHxHEIGHT format");
    }

    let width: i32 = parts[0].parse().context("Invalid width value")?;
    let height: i32 = parts[1].parse().context("Invalid height value")?;

    if width <= 0 || height <= 0 {
        anyhow::bail!("Resolution values must be positive");
    }

    Ok((width, height))
}
