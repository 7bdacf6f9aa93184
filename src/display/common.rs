//!
//! Shared types and errors for the display surface manager.
//!

use raw_window_handle::RawWindowHandle;

/// Outcome classes for display operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DisplayError {
    /// The mode index is outside the catalog and not a sentinel.
    #[error("invalid video mode")]
    InvalidMode,

    /// Fullscreen is not available in the requested mode.
    #[error("fullscreen unavailable in this mode")]
    InvalidFullscreen,

    /// No usable window/context could be produced.
    #[error("no display modes could be found")]
    Unknown,

    /// No display surface can ever be presented; the process must stop.
    #[error("fatal display error: {0}")]
    Fatal(String),

    /// A display system already exists in this process.
    #[error("display system already exists")]
    AlreadyExists,

    /// The operation needs a live window.
    #[error("display not initialized")]
    NotInitialized,

    /// A native call failed outside the negotiation ladder.
    #[error("platform error: {0}")]
    Platform(String),
}

/// Result type for display operations.
pub type DisplayResult<T> = Result<T, DisplayError>;

/// Which kind of surface the renderer wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GraphicsApi {
    /// A window with an OpenGL-family context.
    #[default]
    OpenGl,
    /// A plain window; the renderer creates its own device.
    Plain,
}

/// Pixel layout of a display mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Rgb565,
    Rgb24,
    /// Anything else, by the platform's raw format code.
    Other(u32),
}

impl PixelFormat {
    /// Explicit fullscreen format for a color depth, if one exists.
    #[must_use]
    pub const fn for_color_bits(bits: i32) -> Option<Self> {
        match bits {
            16 => Some(Self::Rgb565),
            24 => Some(Self::Rgb24),
            _ => None,
        }
    }
}

/// A display mode as reported to or requested from the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeMode {
    pub width: i32,
    pub height: i32,
    pub refresh_rate: i32,
    pub format: PixelFormat,
}

impl NativeMode {
    #[must_use]
    pub const fn new(width: i32, height: i32, refresh_rate: i32, format: PixelFormat) -> Self {
        Self {
            width,
            height,
            refresh_rate,
            format,
        }
    }
}

/// Opaque identifier of the native window, handed to collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(pub u64);

/// What the renderer receives once the display is up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowInfo {
    pub api: GraphicsApi,
    pub handle: WindowHandle,
    /// OS window handle, for renderers that create their own device.
    /// `None` when the platform does not expose one.
    pub native: Option<RawWindowHandle>,
}

/// Where the platform should place a new window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowPosition {
    /// Let the platform decide.
    #[default]
    Undefined,
    At(i32, i32),
}

/// Everything needed to create one window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowSpec {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub position: WindowPosition,
    pub opengl: bool,
    pub fullscreen: bool,
    pub borderless: bool,
}

/// Framebuffer attributes requested before window creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlAttributes {
    pub red_bits: u8,
    pub green_bits: u8,
    pub blue_bits: u8,
    pub depth_bits: u8,
    pub stencil_bits: u8,
    pub multisample_buffers: u8,
    pub multisample_samples: u8,
    pub stereo: bool,
    pub double_buffer: bool,
    pub accelerated: bool,
}

/// What the platform can and cannot do, queried instead of the OS name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlatformCaps {
    /// Gamma ramps must stay close to identity in the lower half.
    pub gamma_clamp_low_half: bool,
}

/// The achieved surface configuration, populated by a mode set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayConfiguration {
    pub width: i32,
    pub height: i32,
    pub color_bits: i32,
    pub depth_bits: i32,
    pub stencil_bits: i32,
    pub is_fullscreen: bool,
    pub stereo_enabled: bool,
    pub device_supports_gamma: bool,
    pub display_frequency: i32,
}

impl DisplayConfiguration {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
