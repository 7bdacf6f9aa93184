//!
//! Window and context creation with precision degradation.
//!
//! Sixteen attempts are made. Every fourth attempt permanently lowers one
//! part of the baseline; the attempts in between each lower one part for
//! that attempt only. The first attempt that produces a window, an accepted
//! fullscreen mode (when fullscreen) and a context wins.
//!

use crate::display::backend::VideoBackend;
use crate::display::common::{
    DisplayConfiguration, GlAttributes, GraphicsApi, NativeMode, PixelFormat, WindowPosition,
    WindowSpec,
};

/// Upper bound on creation attempts for GL surfaces.
pub const MAX_ATTEMPTS: usize = 16;

/// Color, depth and stencil precision in bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Precision {
    pub color_bits: i32,
    pub depth_bits: i32,
    pub stencil_bits: i32,
}

impl Precision {
    #[must_use]
    pub const fn new(color_bits: i32, depth_bits: i32, stencil_bits: i32) -> Self {
        Self {
            color_bits,
            depth_bits,
            stencil_bits,
        }
    }

    /// Starting point from configured values.
    ///
    /// Color 0 or 32 and above means 24; depth 0 means 24; stencil is taken
    /// as given.
    #[must_use]
    pub const fn from_settings(color_bits: i32, depth_bits: i32, stencil_bits: i32) -> Self {
        let color_bits = if color_bits == 0 || color_bits >= 32 {
            24
        } else {
            color_bits
        };
        let depth_bits = if depth_bits == 0 { 24 } else { depth_bits };
        Self::new(color_bits, depth_bits, stencil_bits)
    }

    /// Bits per red/green/blue channel to request.
    #[must_use]
    pub const fn per_channel_color_bits(&self) -> u8 {
        if self.color_bits == 24 {
            8
        } else {
            4
        }
    }
}

/// 24 → 16 → 8, anything else unchanged.
const fn step_down(bits: i32) -> i32 {
    match bits {
        24 => 16,
        16 => 8,
        other => other,
    }
}

/// Iterator over the precision tried at each attempt.
#[derive(Debug, Clone)]
pub struct PrecisionLadder {
    baseline: Precision,
    attempt: usize,
}

impl PrecisionLadder {
    #[must_use]
    pub const fn new(baseline: Precision) -> Self {
        Self {
            baseline,
            attempt: 0,
        }
    }

    /// Current persistent baseline.
    #[must_use]
    pub const fn baseline(&self) -> Precision {
        self.baseline
    }

    fn lower_baseline(&mut self, bucket: usize) {
        let base = &mut self.baseline;
        match bucket {
            1 => {
                // depth and stencil both drop on this pass
                base.depth_bits = step_down(base.depth_bits);
                base.stencil_bits = step_down(base.stencil_bits);
            }
            2 => {
                if base.color_bits == 24 {
                    base.color_bits = 16;
                }
            }
            3 => base.stencil_bits = step_down(base.stencil_bits),
            _ => {}
        }
    }
}

impl Iterator for PrecisionLadder {
    type Item = Precision;

    fn next(&mut self) -> Option<Precision> {
        let i = self.attempt;
        if i >= MAX_ATTEMPTS {
            return None;
        }
        self.attempt += 1;

        if i % 4 == 0 && i > 0 {
            self.lower_baseline(i / 4);
        }

        let mut test = self.baseline;
        match i % 4 {
            3 => {
                if test.color_bits == 24 {
                    test.color_bits = 16;
                }
            }
            2 => test.depth_bits = step_down(test.depth_bits),
            1 => {
                test.stencil_bits = match test.stencil_bits {
                    24 => 16,
                    16 => 8,
                    _ => 0,
                }
            }
            _ => {}
        }

        Some(test)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = MAX_ATTEMPTS.saturating_sub(self.attempt);
        (left, Some(left))
    }
}

impl ExactSizeIterator for PrecisionLadder {}

/// Parameters of one negotiation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextRequest {
    pub api: GraphicsApi,
    pub title: String,
    pub width: i32,
    pub height: i32,
    pub position: WindowPosition,
    pub fullscreen: bool,
    pub borderless: bool,
    pub precision: Precision,
    pub samples: i32,
    pub stereo: bool,
    pub display_refresh: i32,
    pub swap_interval: i32,
}

impl ContextRequest {
    fn window_spec(&self) -> WindowSpec {
        WindowSpec {
            title: self.title.clone(),
            width: u32::try_from(self.width).unwrap_or(0),
            height: u32::try_from(self.height).unwrap_or(0),
            position: self.position,
            opengl: self.api == GraphicsApi::OpenGl,
            fullscreen: self.fullscreen,
            borderless: !self.fullscreen && self.borderless,
        }
    }

    fn gl_attributes(&self, test: &Precision) -> GlAttributes {
        let per_channel = test.per_channel_color_bits();
        GlAttributes {
            red_bits: per_channel,
            green_bits: per_channel,
            blue_bits: per_channel,
            depth_bits: attribute_bits(test.depth_bits),
            stencil_bits: attribute_bits(test.stencil_bits),
            multisample_buffers: u8::from(self.samples != 0),
            multisample_samples: attribute_bits(self.samples),
            stereo: self.stereo,
            double_buffer: true,
            accelerated: true,
        }
    }
}

fn attribute_bits(bits: i32) -> u8 {
    bits.clamp(0, i32::from(u8::MAX)) as u8
}

/// A window with the context created for it, if any.
pub struct NegotiatedSurface<B: VideoBackend> {
    pub window: B::Window,
    pub context: Option<B::Context>,
}

/// Create a window (and, for GL, a context) for `request`.
///
/// Achieved precision, stereo and refresh are written into `config`.
/// Returns `None` when every attempt failed. Windows from failed attempts
/// are released before the next attempt starts.
pub fn negotiate<B: VideoBackend>(
    backend: &mut B,
    request: &ContextRequest,
    config: &mut DisplayConfiguration,
) -> Option<NegotiatedSurface<B>> {
    let spec = request.window_spec();

    if request.api != GraphicsApi::OpenGl {
        return match backend.create_window(&spec) {
            Ok(mut window) => {
                if request.fullscreen {
                    if let Err(e) = backend.set_window_display_mode(&mut window, None) {
                        log::debug!("SDL_SetWindowDisplayMode failed: {}", e);
                    }
                }
                Some(NegotiatedSurface {
                    window,
                    context: None,
                })
            }
            Err(e) => {
                log::debug!("SDL_CreateWindow failed: {}", e);
                None
            }
        };
    }

    for test in PrecisionLadder::new(request.precision) {
        backend.set_gl_attributes(&request.gl_attributes(&test));
        config.stereo_enabled = request.stereo;

        let mut window = match backend.create_window(&spec) {
            Ok(window) => window,
            Err(e) => {
                log::debug!("SDL_CreateWindow failed: {}", e);
                continue;
            }
        };

        if request.fullscreen {
            let Some(format) = PixelFormat::for_color_bits(test.color_bits) else {
                log::debug!("testColorBits is {}, can't fullscreen", test.color_bits);
                continue;
            };

            config.display_frequency = request.display_refresh;
            let mode = NativeMode::new(
                request.width,
                request.height,
                request.display_refresh,
                format,
            );
            if let Err(e) = backend.set_window_display_mode(&mut window, Some(&mode)) {
                log::debug!("SDL_SetWindowDisplayMode failed: {}", e);
                continue;
            }
        }

        let context = match backend.create_context(&window) {
            Ok(context) => context,
            Err(e) => {
                log::info!("SDL_GL_CreateContext failed: {}", e);
                continue;
            }
        };

        if let Err(e) = backend.set_swap_interval(request.swap_interval) {
            log::debug!("SDL_GL_SetSwapInterval failed: {}", e);
        }

        config.color_bits = test.color_bits;
        config.depth_bits = test.depth_bits;
        config.stencil_bits = test.stencil_bits;

        log::info!(
            "Using {} color bits, {} depth, {} stencil display.",
            config.color_bits,
            config.depth_bits,
            config.stencil_bits
        );

        return Some(NegotiatedSurface {
            window,
            context: Some(context),
        });
    }

    None
}
