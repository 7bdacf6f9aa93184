//! Named console commands owned by the display system.

use std::collections::BTreeMap;

/// Commands the display system registers while it is up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DisplayCommand {
    /// Print the video-mode catalog and the detected resolutions.
    ModeList,
    /// Minimize the game window.
    Minimize,
}

impl DisplayCommand {
    pub const ALL: [Self; 2] = [Self::ModeList, Self::Minimize];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ModeList => "modelist",
            Self::Minimize => "minimize",
        }
    }
}

/// Name to command lookup used by the host's console.
#[derive(Debug, Default, Clone)]
pub struct CommandTable {
    commands: BTreeMap<String, DisplayCommand>,
}

impl CommandTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a command under its name. Re-registering replaces silently.
    pub fn register(&mut self, command: DisplayCommand) {
        self.commands.insert(command.name().to_string(), command);
    }

    /// Remove a name. Returns whether it was registered.
    pub fn remove(&mut self, name: &str) -> bool {
        self.commands.remove(name).is_some()
    }

    /// Look up a command name, case-insensitively like the console does.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<DisplayCommand> {
        self.commands
            .iter()
            .find(|(registered, _)| registered.eq_ignore_ascii_case(name.trim()))
            .map(|(_, &command)| command)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
