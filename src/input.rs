//! Input collaborator seen from the display system.

use crate::display::WindowHandle;

/// Receives the game window once it exists and is told when it goes away.
pub trait InputSink {
    /// Start taking input from `window`.
    fn attach(&mut self, window: WindowHandle);

    /// Stop taking input. Called before the window is destroyed.
    fn shutdown(&mut self);
}

/// Sink that only remembers which window it was given.
#[derive(Debug, Default)]
pub struct WindowTracker {
    window: Option<WindowHandle>,
}

impl WindowTracker {
    #[must_use]
    pub const fn new() -> Self {
        Self { window: None }
    }

    #[must_use]
    pub const fn window(&self) -> Option<WindowHandle> {
        self.window
    }
}

impl InputSink for WindowTracker {
    fn attach(&mut self, window: WindowHandle) {
        log::debug!("Input attached to window {}", window.0);
        self.window = Some(window);
    }

    fn shutdown(&mut self) {
        if let Some(window) = self.window.take() {
            log::debug!("Input detached from window {}", window.0);
        }
    }
}
