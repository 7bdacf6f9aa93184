//!
//! Display system: owns the window and context and drives mode setting.
//!
//! Only one [`DisplaySystem`] can exist per process. It is created empty,
//! brought up by [`DisplaySystem::init`] (configured mode first, then the
//! fallback mode) and torn down by [`DisplaySystem::shutdown`] or on drop.
//!
//! # Thread Safety
//!
//! All methods must be called from the thread that created the system.
//!

use std::ffi::c_void;
use std::sync::atomic::{AtomicBool, Ordering};

use raw_window_handle::RawWindowHandle;

use crate::commands::{CommandTable, DisplayCommand};
use crate::config::{self, Settings};
use crate::display::backend::VideoBackend;
use crate::display::common::{
    DisplayConfiguration, DisplayError, DisplayResult, GraphicsApi, WindowHandle, WindowInfo,
    WindowPosition,
};
use crate::display::enumerate::detect_available_modes;
use crate::display::gamma::{build_gamma_ramp, GAMMA_RAMP_SIZE};
use crate::display::modes::{self, MODE_DESKTOP, MODE_FALLBACK};
use crate::display::negotiate::{negotiate, ContextRequest, Precision};
use crate::input::InputSink;

/// Set while a display system exists.
static DISPLAY_LIVE: AtomicBool = AtomicBool::new(false);

/// Default window title.
pub const WINDOW_TITLE: &str = "glimp";

const DEFAULT_ASPECT: f32 = 4.0 / 3.0;

/// The process-wide display surface.
pub struct DisplaySystem<B: VideoBackend> {
    backend: B,
    api: GraphicsApi,
    title: String,
    // field order matters for drop: context before window
    context: Option<B::Context>,
    window: Option<B::Window>,
    input: Option<Box<dyn InputSink>>,
    config: DisplayConfiguration,
    display_aspect: f32,
}

impl<B: VideoBackend> DisplaySystem<B> {
    /// Claim the display slot.
    ///
    /// Errors:
    /// - `AlreadyExists`: another display system is alive
    pub fn new(backend: B, api: GraphicsApi) -> DisplayResult<Self> {
        if DISPLAY_LIVE
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(DisplayError::AlreadyExists);
        }

        Ok(Self {
            backend,
            api,
            title: WINDOW_TITLE.to_string(),
            context: None,
            window: None,
            input: None,
            config: DisplayConfiguration::default(),
            display_aspect: DEFAULT_ASPECT,
        })
    }

    /// Use `title` for windows created from now on.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub const fn configuration(&self) -> &DisplayConfiguration {
        &self.config
    }

    #[must_use]
    pub const fn api(&self) -> GraphicsApi {
        self.api
    }

    #[must_use]
    pub const fn display_aspect(&self) -> f32 {
        self.display_aspect
    }

    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    #[must_use]
    pub fn has_window(&self) -> bool {
        self.window.is_some()
    }

    #[must_use]
    pub fn window_handle(&self) -> Option<WindowHandle> {
        self.window
            .as_ref()
            .map(|window| self.backend.window_handle(window))
    }

    /// OS handle of the current window, if the platform exposes one.
    #[must_use]
    pub fn native_window_handle(&self) -> Option<RawWindowHandle> {
        self.window
            .as_ref()
            .and_then(|window| self.backend.native_window_handle(window))
    }

    /// Drop the context, then the window. Returns where the window was.
    fn release_surface(&mut self) -> Option<(i32, i32)> {
        self.context = None;
        let window = self.window.take()?;
        let position = self.backend.window_position(&window);
        drop(window);
        Some(position)
    }

    /// Create a surface for `mode`, replacing any existing one.
    ///
    /// On success the gamma capability is probed again and an attached input
    /// sink is moved to the new window.
    ///
    /// Errors:
    /// - `InvalidMode`: `mode` is outside the catalog
    /// - `Unknown`: no attempt produced a surface, or the window's display
    ///   mode could not be read afterwards
    pub fn set_mode(
        &mut self,
        settings: &mut Settings,
        mode: i32,
        fullscreen: bool,
        noborder: bool,
    ) -> DisplayResult<()> {
        let s = settings.display();

        log::info!("Initializing display");
        self.config.reset();

        let display = self
            .window
            .as_ref()
            .and_then(|window| self.backend.window_display_index(window).ok())
            .unwrap_or(0);

        let desktop = match self.backend.desktop_mode(display) {
            Ok(desktop) if desktop.height > 0 => {
                self.display_aspect = desktop.width as f32 / desktop.height as f32;
                log::info!("Display aspect: {:.3}", self.display_aspect);
                (desktop.width, desktop.height)
            }
            _ => {
                self.display_aspect = DEFAULT_ASPECT;
                log::info!("Cannot determine display aspect, assuming 1.333");
                (0, 0)
            }
        };

        let (width, height) = if mode == MODE_DESKTOP {
            if desktop.1 > 0 {
                desktop
            } else {
                log::info!("Cannot determine display resolution, assuming 640x480");
                (640, 480)
            }
        } else {
            modes::resolve_mode(mode, s.custom_width, s.custom_height).map_err(|e| {
                log::info!("...setting mode {}: invalid mode", mode);
                e
            })?
        };
        log::info!("...setting mode {}: {} {}", mode, width, height);

        self.config.width = width;
        self.config.height = height;

        let mut position = WindowPosition::Undefined;
        if s.center_window && !fullscreen {
            position = WindowPosition::At(desktop.0 / 2 - width / 2, desktop.1 / 2 - height / 2);
        }

        if let Some((x, y)) = self.release_surface() {
            log::debug!("Existing window at {}x{} before being destroyed", x, y);
            position = WindowPosition::At(x, y);
        }

        self.config.is_fullscreen = fullscreen;

        let request = ContextRequest {
            api: self.api,
            title: self.title.clone(),
            width,
            height,
            position,
            fullscreen,
            borderless: noborder,
            precision: Precision::from_settings(s.color_bits, s.depth_bits, s.stencil_bits),
            samples: s.multisample,
            stereo: s.stereo,
            display_refresh: s.display_refresh,
            swap_interval: s.swap_interval,
        };

        let achieved = match negotiate(&mut self.backend, &request, &mut self.config) {
            Some(surface) => {
                self.window = Some(surface.window);
                self.context = surface.context;
                true
            }
            None => false,
        };

        let detected = match self.window.as_ref() {
            Some(window) => detect_available_modes(&self.backend, window, self.display_aspect),
            None => Err("no window".to_string()),
        };
        match detected {
            Ok(Some(list)) => settings.force_set(config::R_AVAILABLE_MODES, &list),
            Ok(None) => {}
            Err(_) => return Err(DisplayError::Unknown),
        }

        if !achieved {
            return Err(DisplayError::Unknown);
        }

        self.finish_mode_set(settings);
        Ok(())
    }

    /// Probe hardware gamma and hand the new window to input, if attached.
    fn finish_mode_set(&mut self, settings: &Settings) {
        let Some(window) = self.window.as_mut() else {
            return;
        };

        self.config.device_supports_gamma = settings.integer(config::R_IGNORE_HW_GAMMA) == 0
            && self.backend.set_brightness(window, 1.0).is_ok();

        let handle = self.backend.window_handle(window);
        if let Some(input) = self.input.as_mut() {
            input.attach(handle);
        }
    }

    /// Bring video up if needed and set a mode.
    ///
    /// Returns whether a surface was achieved.
    ///
    /// Errors:
    /// - `Fatal`: no video driver name or no displays
    pub fn start_driver_and_set_mode(
        &mut self,
        settings: &mut Settings,
        mode: i32,
        fullscreen: bool,
        noborder: bool,
    ) -> DisplayResult<bool> {
        if !self.backend.video_initialized() {
            if let Err(e) = self.backend.init_video() {
                log::info!("SDL_Init( SDL_INIT_VIDEO ) FAILED ({})", e);
                return Ok(false);
            }

            let driver = self.backend.current_driver().ok_or_else(|| {
                DisplayError::Fatal("No video driver initialized".to_string())
            })?;
            log::info!("SDL using driver \"{}\"", driver);
            settings.force_set(config::R_SDL_DRIVER, &driver);
        }

        match self.backend.num_displays() {
            Ok(count) if count > 0 => {}
            Ok(_) => {
                return Err(DisplayError::Fatal(
                    "SDL_GetNumVideoDisplays() reported no displays".to_string(),
                ))
            }
            Err(e) => {
                return Err(DisplayError::Fatal(format!(
                    "SDL_GetNumVideoDisplays() FAILED ({})",
                    e
                )))
            }
        }

        let mut fullscreen = fullscreen;
        if fullscreen && settings.boolean(config::IN_NOGRAB) {
            log::info!("Fullscreen not allowed with in_nograb 1");
            settings.force_set(config::R_FULLSCREEN, "0");
            settings.clear_modified(config::R_FULLSCREEN);
            fullscreen = false;
        }

        match self.set_mode(settings, mode, fullscreen, noborder) {
            Ok(()) => Ok(true),
            Err(DisplayError::InvalidFullscreen) => {
                log::warn!("...WARNING: fullscreen unavailable in this mode");
                Ok(false)
            }
            Err(DisplayError::InvalidMode) => {
                log::warn!("...WARNING: could not set the given mode ({})", mode);
                Ok(false)
            }
            Err(DisplayError::Unknown) => {
                log::error!("...ERROR: no display modes could be found.");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Configured mode, then the fallback mode windowed and bordered.
    fn bring_up(&mut self, settings: &mut Settings) -> DisplayResult<()> {
        let s = settings.display();
        let mut achieved =
            self.start_driver_and_set_mode(settings, s.mode, s.fullscreen, s.borderless)?;

        if !achieved && s.mode != MODE_FALLBACK {
            log::info!(
                "Setting r_mode {} failed, falling back on r_mode {}",
                s.mode,
                MODE_FALLBACK
            );
            achieved = self.start_driver_and_set_mode(settings, MODE_FALLBACK, false, false)?;
        }

        if achieved && self.window.is_some() {
            Ok(())
        } else {
            Err(DisplayError::Fatal(
                "could not load OpenGL subsystem".to_string(),
            ))
        }
    }

    /// Create the game window and hand it to `input`.
    ///
    /// Tries the configured mode, then the fallback mode windowed and
    /// bordered. Returns the surface kind with the window's handles.
    ///
    /// Errors:
    /// - `Fatal`: no surface could be created
    pub fn init(
        &mut self,
        settings: &mut Settings,
        commands: &mut CommandTable,
        mut input: Box<dyn InputSink>,
    ) -> DisplayResult<WindowInfo> {
        if let Some(mut previous) = self.input.take() {
            previous.shutdown();
        }

        for command in DisplayCommand::ALL {
            commands.register(command);
        }

        if let Err(e) = self.bring_up(settings) {
            Self::remove_commands(commands);
            return Err(e);
        }

        let handle = self.window_handle().ok_or(DisplayError::NotInitialized)?;
        input.attach(handle);
        self.input = Some(input);

        Ok(WindowInfo {
            api: self.api,
            handle,
            native: self.native_window_handle(),
        })
    }

    /// Show the frame just rendered.
    pub fn present(&mut self, settings: &mut Settings) -> DisplayResult<()> {
        let window = self.window.as_ref().ok_or(DisplayError::NotInitialized)?;

        if self.api == GraphicsApi::OpenGl {
            self.backend.swap_window(window);

            if settings.take_modified(config::R_SWAP_INTERVAL) {
                let interval = settings.integer(config::R_SWAP_INTERVAL);
                if let Err(e) = self.backend.set_swap_interval(interval) {
                    log::warn!("SDL_GL_SetSwapInterval failed: {}", e);
                }
            }
        }

        Ok(())
    }

    /// Upload a hardware gamma ramp built from three 8-bit tables.
    ///
    /// Does nothing when the device has no gamma support or hardware gamma
    /// is disabled.
    pub fn set_gamma(
        &mut self,
        settings: &Settings,
        red: &[u8; GAMMA_RAMP_SIZE],
        green: &[u8; GAMMA_RAMP_SIZE],
        blue: &[u8; GAMMA_RAMP_SIZE],
    ) -> DisplayResult<()> {
        if !self.config.device_supports_gamma || settings.integer(config::R_IGNORE_HW_GAMMA) > 0 {
            return Ok(());
        }

        let window = self.window.as_mut().ok_or(DisplayError::NotInitialized)?;
        let ramp = build_gamma_ramp(red, green, blue, self.backend.capabilities().gamma_clamp_low_half);
        self.backend
            .set_gamma_ramp(window, &ramp)
            .map_err(DisplayError::Platform)
    }

    /// Address of a GL entry point, null when unknown.
    #[must_use]
    pub fn gl_proc_address(&self, name: &str) -> *const c_void {
        self.backend.gl_proc_address(name)
    }

    pub fn minimize(&mut self) {
        if let Some(window) = self.window.as_mut() {
            self.backend.minimize(window);
        }
    }

    /// Catalog text plus the detected resolutions.
    #[must_use]
    pub fn mode_list_text(&self, settings: &Settings) -> String {
        let mut text = modes::mode_list();
        let available = settings.string(config::R_AVAILABLE_MODES).unwrap_or("");
        text.push_str("Available modes: '");
        text.push_str(available);
        text.push_str("'\n");
        text
    }

    /// Run a registered command. Returns the text to print.
    pub fn execute(&mut self, command: DisplayCommand, settings: &Settings) -> String {
        match command {
            DisplayCommand::ModeList => self.mode_list_text(settings),
            DisplayCommand::Minimize => {
                self.minimize();
                String::new()
            }
        }
    }

    fn remove_commands(commands: &mut CommandTable) {
        for command in DisplayCommand::ALL {
            commands.remove(command.name());
        }
    }

    fn teardown(&mut self) {
        if let Some(mut input) = self.input.take() {
            input.shutdown();
        }
        self.release_surface();
        if self.backend.video_initialized() {
            self.backend.quit_video();
        }
    }

    /// Release everything. Safe to call more than once.
    pub fn shutdown(&mut self, commands: &mut CommandTable) {
        Self::remove_commands(commands);
        self.teardown();
        self.config.reset();
    }
}

impl<B: VideoBackend> Drop for DisplaySystem<B> {
    fn drop(&mut self) {
        if self.window.is_some() || self.backend.video_initialized() {
            log::debug!("DisplaySystem dropping, cleaning up resources");
        }
        self.teardown();
        DISPLAY_LIVE.store(false, Ordering::Release);
    }
}
