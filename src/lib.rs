// Display surface manager for the game client
// Window, context and video-mode negotiation plus rich-presence plumbing

pub mod cli;
pub mod commands;
pub mod config;
pub mod display;
pub mod input;
pub mod logging;
pub mod presence;

pub use cli::Cli;
pub use config::Settings;
pub use display::{DisplayConfiguration, DisplayError, DisplaySystem};
pub use logging::LogLevel;
