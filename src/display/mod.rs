//! Display surface management.
//!
//! Negotiates a window and rendering context against the platform, falling
//! back through lower precisions and a fallback mode, and exposes the
//! runtime operations the renderer needs.

pub mod backend;
pub mod common;
pub mod enumerate;
pub mod gamma;
pub mod modes;
pub mod negotiate;
pub mod sdl;
pub mod system;

pub use backend::VideoBackend;
pub use common::{
    DisplayConfiguration, DisplayError, DisplayResult, GlAttributes, GraphicsApi, NativeMode,
    PixelFormat, PlatformCaps, WindowHandle, WindowInfo, WindowPosition, WindowSpec,
};
pub use gamma::{build_gamma_ramp, GammaRamp, GAMMA_RAMP_SIZE};
pub use modes::{resolve_mode, VideoMode, MODE_CUSTOM, MODE_DESKTOP, MODE_FALLBACK, VIDEO_MODES};
pub use sdl::SdlBackend;
pub use system::DisplaySystem;
