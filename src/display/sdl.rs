//!
//! SDL2 implementation of [`VideoBackend`].
//!
//! Windows are `sdl2::video::Window` and contexts are `GLContext`; both
//! release their native objects on drop. The video subsystem is brought up
//! lazily by [`VideoBackend::init_video`] and torn down by dropping the
//! subsystem handle once no window holds a clone of it.
//!
//! # Thread Safety
//!
//! SDL2 must be used from the thread that initialized it. None of the types
//! here are `Send`.
//!

use std::ffi::c_void;
use std::ptr;

use raw_window_handle::{HasWindowHandle, RawWindowHandle};
use sdl2::{
    pixels::PixelFormatEnum,
    video::{DisplayMode, GLContext, SwapInterval, Window},
    EventPump, Sdl, VideoSubsystem,
};

use crate::display::backend::VideoBackend;
use crate::display::common::{
    GlAttributes, NativeMode, PixelFormat, PlatformCaps, WindowHandle, WindowPosition, WindowSpec,
};
use crate::display::gamma::GammaRamp;

const NOT_INITIALIZED: &str = "video subsystem not initialized";

/// SDL2 video backend.
pub struct SdlBackend {
    /// SDL2 context, kept across video restarts.
    sdl_context: Option<Sdl>,
    video_subsystem: Option<VideoSubsystem>,
}

impl SdlBackend {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            sdl_context: None,
            video_subsystem: None,
        }
    }

    fn video(&self) -> Result<&VideoSubsystem, String> {
        self.video_subsystem
            .as_ref()
            .ok_or_else(|| NOT_INITIALIZED.to_string())
    }

    /// Event pump for the host's main loop. Only one may exist at a time.
    pub fn event_pump(&self) -> Result<EventPump, String> {
        self.sdl_context
            .as_ref()
            .ok_or_else(|| NOT_INITIALIZED.to_string())?
            .event_pump()
    }
}

impl Default for SdlBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn pixel_format_from_sdl(format: PixelFormatEnum) -> PixelFormat {
    match format {
        PixelFormatEnum::RGB565 => PixelFormat::Rgb565,
        PixelFormatEnum::RGB24 => PixelFormat::Rgb24,
        other => PixelFormat::Other(other as u32),
    }
}

fn pixel_format_to_sdl(format: PixelFormat) -> PixelFormatEnum {
    match format {
        PixelFormat::Rgb565 => PixelFormatEnum::RGB565,
        PixelFormat::Rgb24 => PixelFormatEnum::RGB24,
        PixelFormat::Other(_) => PixelFormatEnum::Unknown,
    }
}

fn mode_from_sdl(mode: DisplayMode) -> NativeMode {
    NativeMode::new(
        mode.w,
        mode.h,
        mode.refresh_rate,
        pixel_format_from_sdl(mode.format),
    )
}

fn mode_to_sdl(mode: &NativeMode) -> DisplayMode {
    DisplayMode::new(
        pixel_format_to_sdl(mode.format),
        mode.width,
        mode.height,
        mode.refresh_rate,
    )
}

/// Negative intervals ask for adaptive vsync.
fn swap_interval(interval: i32) -> SwapInterval {
    match interval {
        0 => SwapInterval::Immediate,
        i if i < 0 => SwapInterval::LateSwapTearing,
        _ => SwapInterval::VSync,
    }
}

impl VideoBackend for SdlBackend {
    type Window = Window;
    type Context = GLContext;

    fn video_initialized(&self) -> bool {
        self.video_subsystem.is_some()
    }

    fn init_video(&mut self) -> Result<(), String> {
        let sdl_context = match self.sdl_context.take() {
            Some(sdl_context) => sdl_context,
            None => sdl2::init()?,
        };
        let video_subsystem = sdl_context.video();
        self.sdl_context = Some(sdl_context);
        self.video_subsystem = Some(video_subsystem?);
        Ok(())
    }

    fn quit_video(&mut self) {
        if self.video_subsystem.take().is_some() {
            log::debug!("SDL video subsystem released");
        }
    }

    fn current_driver(&self) -> Option<String> {
        let driver = self.video().ok()?.current_video_driver();
        if driver.is_empty() {
            None
        } else {
            Some(driver.to_string())
        }
    }

    fn num_displays(&self) -> Result<i32, String> {
        self.video()?.num_video_displays()
    }

    fn desktop_mode(&self, display: i32) -> Result<NativeMode, String> {
        self.video()?.desktop_display_mode(display).map(mode_from_sdl)
    }

    fn display_modes(&self, display: i32) -> Vec<NativeMode> {
        let Ok(video) = self.video() else {
            return Vec::new();
        };
        let count = match video.num_display_modes(display) {
            Ok(count) => count,
            Err(e) => {
                log::debug!("SDL_GetNumDisplayModes failed: {}", e);
                return Vec::new();
            }
        };

        (0..count)
            .filter_map(|index| match video.display_mode(display, index) {
                Ok(mode) => Some(mode_from_sdl(mode)),
                Err(e) => {
                    log::debug!("SDL_GetDisplayMode({}) failed: {}", index, e);
                    None
                }
            })
            .collect()
    }

    fn capabilities(&self) -> PlatformCaps {
        PlatformCaps {
            gamma_clamp_low_half: cfg!(target_os = "windows"),
        }
    }

    fn set_gl_attributes(&mut self, attrs: &GlAttributes) {
        let Ok(video) = self.video() else {
            return;
        };
        let gl_attr = video.gl_attr();
        gl_attr.set_red_size(attrs.red_bits);
        gl_attr.set_green_size(attrs.green_bits);
        gl_attr.set_blue_size(attrs.blue_bits);
        gl_attr.set_depth_size(attrs.depth_bits);
        gl_attr.set_stencil_size(attrs.stencil_bits);
        gl_attr.set_multisample_buffers(attrs.multisample_buffers);
        gl_attr.set_multisample_samples(attrs.multisample_samples);
        gl_attr.set_stereo(attrs.stereo);
        gl_attr.set_double_buffer(attrs.double_buffer);
        gl_attr.set_accelerated_visual(attrs.accelerated);
    }

    fn create_window(&mut self, spec: &WindowSpec) -> Result<Window, String> {
        let video = self.video()?;
        let mut builder = video.window(&spec.title, spec.width, spec.height);

        if let WindowPosition::At(x, y) = spec.position {
            builder.position(x, y);
        }
        if spec.opengl {
            builder.opengl();
        }
        if spec.fullscreen {
            builder.fullscreen();
        } else if spec.borderless {
            builder.borderless();
        }

        builder.build().map_err(|e| e.to_string())
    }

    fn window_handle(&self, window: &Window) -> WindowHandle {
        WindowHandle(u64::from(window.id()))
    }

    fn native_window_handle(&self, window: &Window) -> Option<RawWindowHandle> {
        match HasWindowHandle::window_handle(window) {
            Ok(handle) => Some(handle.as_raw()),
            Err(e) => {
                log::debug!("no native window handle: {}", e);
                None
            }
        }
    }

    fn window_display_index(&self, window: &Window) -> Result<i32, String> {
        window.display_index()
    }

    fn window_position(&self, window: &Window) -> (i32, i32) {
        window.position()
    }

    fn window_display_mode(&self, window: &Window) -> Result<NativeMode, String> {
        window.display_mode().map(mode_from_sdl)
    }

    fn set_window_display_mode(
        &mut self,
        window: &mut Window,
        mode: Option<&NativeMode>,
    ) -> Result<(), String> {
        window.set_display_mode(mode.map(mode_to_sdl))
    }

    fn create_context(&mut self, window: &Window) -> Result<GLContext, String> {
        window.gl_create_context()
    }

    fn set_swap_interval(&mut self, interval: i32) -> Result<(), String> {
        self.video()?.gl_set_swap_interval(swap_interval(interval))
    }

    fn swap_window(&mut self, window: &Window) {
        window.gl_swap_window();
    }

    fn set_brightness(&mut self, window: &mut Window, brightness: f32) -> Result<(), String> {
        window.set_brightness(f64::from(brightness))
    }

    fn set_gamma_ramp(&mut self, window: &mut Window, ramp: &GammaRamp) -> Result<(), String> {
        window.set_gamma_ramp(&ramp.red, &ramp.green, &ramp.blue)
    }

    fn minimize(&mut self, window: &mut Window) {
        window.minimize();
    }

    fn gl_proc_address(&self, name: &str) -> *const c_void {
        match self.video() {
            Ok(video) => video.gl_get_proc_address(name) as *const c_void,
            Err(_) => ptr::null(),
        }
    }
}
