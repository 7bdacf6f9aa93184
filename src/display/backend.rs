//!
//! Platform capability interface for the display manager.
//!
//! The negotiator and orchestrator only talk to this trait. One
//! implementation exists per target windowing library (`display::sdl`);
//! tests drive the core through a scripted mock.
//!

use std::ffi::c_void;

use raw_window_handle::RawWindowHandle;

use crate::display::common::{
    GlAttributes, NativeMode, PlatformCaps, WindowHandle, WindowSpec,
};
use crate::display::gamma::GammaRamp;

/// Native windowing and context services.
///
/// Window and context values own their native resources and release them on
/// drop. Errors are the platform's message text; the core decides whether a
/// failure is retried, logged or surfaced.
pub trait VideoBackend {
    /// Owned native window.
    type Window;
    /// Owned native rendering context bound to a window.
    type Context;

    /// Whether the video subsystem is up.
    fn video_initialized(&self) -> bool;

    /// Bring up the video subsystem.
    fn init_video(&mut self) -> Result<(), String>;

    /// Shut the video subsystem down. Windows must already be gone.
    fn quit_video(&mut self);

    /// Name of the active video driver.
    fn current_driver(&self) -> Option<String>;

    fn num_displays(&self) -> Result<i32, String>;

    /// Desktop mode of a display.
    fn desktop_mode(&self, display: i32) -> Result<NativeMode, String>;

    /// Every mode the display reports. Entries that cannot be read are skipped.
    fn display_modes(&self, display: i32) -> Vec<NativeMode>;

    fn capabilities(&self) -> PlatformCaps;

    /// Framebuffer attributes used by the next window/context creation.
    fn set_gl_attributes(&mut self, attrs: &GlAttributes);

    fn create_window(&mut self, spec: &WindowSpec) -> Result<Self::Window, String>;

    fn window_handle(&self, window: &Self::Window) -> WindowHandle;

    /// OS window handle, `None` when the platform does not expose one.
    fn native_window_handle(&self, window: &Self::Window) -> Option<RawWindowHandle>;

    fn window_display_index(&self, window: &Self::Window) -> Result<i32, String>;

    fn window_position(&self, window: &Self::Window) -> (i32, i32);

    /// Mode the window currently uses on its display.
    fn window_display_mode(&self, window: &Self::Window) -> Result<NativeMode, String>;

    /// Mode to use when fullscreen; `None` asks for the platform default.
    fn set_window_display_mode(
        &mut self,
        window: &mut Self::Window,
        mode: Option<&NativeMode>,
    ) -> Result<(), String>;

    fn create_context(&mut self, window: &Self::Window) -> Result<Self::Context, String>;

    fn set_swap_interval(&mut self, interval: i32) -> Result<(), String>;

    fn swap_window(&mut self, window: &Self::Window);

    fn set_brightness(&mut self, window: &mut Self::Window, brightness: f32) -> Result<(), String>;

    fn set_gamma_ramp(&mut self, window: &mut Self::Window, ramp: &GammaRamp) -> Result<(), String>;

    fn minimize(&mut self, window: &mut Self::Window);

    /// Address of a GL entry point, null when unknown.
    fn gl_proc_address(&self, name: &str) -> *const c_void;
}
