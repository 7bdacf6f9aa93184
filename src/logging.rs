//! Console logging through a `tracing` subscriber.
//!
//! Levels mirror the engine's console print levels: `User` is always shown,
//! `Debug` corresponds to developer-only prints.

use log::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Console verbosity levels.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Nothing = 0,
    User = 1,
    Error = 2,
    Warning = 3,
    Info = 4,
    Debug = 5,
    All = 6,
}

impl LogLevel {
    /// Create a LogLevel from an integer
    pub fn from_i32(level: i32) -> Self {
        match level {
            0 => LogLevel::Nothing,
            1 => LogLevel::User,
            2 => LogLevel::Error,
            3 => LogLevel::Warning,
            4 => LogLevel::Info,
            5 => LogLevel::Debug,
            6 => LogLevel::All,
            _ => LogLevel::Info,
        }
    }

    pub fn as_i32(&self) -> i32 {
        *self as i32
    }

    /// Filter directive for the subscriber.
    pub fn directive(self) -> &'static str {
        match self {
            LogLevel::Nothing => "off",
            LogLevel::User | LogLevel::Error => "error",
            LogLevel::Warning => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::All => "trace",
        }
    }

    /// Equivalent `log` filter.
    pub fn filter(self) -> LevelFilter {
        match self {
            LogLevel::Nothing => LevelFilter::Off,
            LogLevel::User | LogLevel::Error => LevelFilter::Error,
            LogLevel::Warning => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::All => LevelFilter::Trace,
        }
    }
}

/// Install the console subscriber.
///
/// `RUST_LOG` overrides `level` when set. Records from the `log` macros are
/// forwarded to the subscriber. A later call keeps the first subscriber and
/// only moves the `log` level cap.
pub fn init(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.directive()));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
    if let Err(e) = installed {
        tracing::debug!("console subscriber already installed: {}", e);
    }
    log::set_max_level(level.filter());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_from_i32() {
        assert_eq!(LogLevel::from_i32(0), LogLevel::Nothing);
        assert_eq!(LogLevel::from_i32(1), LogLevel::User);
        assert_eq!(LogLevel::from_i32(2), LogLevel::Error);
        assert_eq!(LogLevel::from_i32(3), LogLevel::Warning);
        assert_eq!(LogLevel::from_i32(4), LogLevel::Info);
        assert_eq!(LogLevel::from_i32(5), LogLevel::Debug);
        assert_eq!(LogLevel::from_i32(6), LogLevel::All);
    }

    #[test]
    fn test_log_level_invalid() {
        // Invalid values should default to Info
        assert_eq!(LogLevel::from_i32(100), LogLevel::Info);
        assert_eq!(LogLevel::from_i32(-1), LogLevel::Info);
    }

    #[test]
    fn test_log_level_filter() {
        assert_eq!(LogLevel::Nothing.filter(), LevelFilter::Off);
        assert_eq!(LogLevel::Warning.filter(), LevelFilter::Warn);
        assert_eq!(LogLevel::Debug.filter(), LevelFilter::Debug);
        assert_eq!(LogLevel::Info.as_i32(), 4);
    }

    #[test]
    fn test_directive_matches_filter() {
        for level in 0..=6 {
            let level = LogLevel::from_i32(level);
            assert_eq!(
                level.directive().parse::<LevelFilter>().unwrap(),
                level.filter()
            );
        }
    }

    #[test]
    fn test_init_twice() {
        init(LogLevel::Info);
        init(LogLevel::Debug);
        assert_eq!(log::max_level(), LevelFilter::Debug);
    }
}
