//! Scripted video backend shared by the integration tests.
//!
//! Every native object records its release into a shared event log so the
//! tests can check ordering.

#![allow(dead_code)]

use std::cell::RefCell;
use std::ffi::{c_ulong, c_void};
use std::ptr;
use std::rc::Rc;

use glimp::display::{
    GammaRamp, GlAttributes, NativeMode, PixelFormat, PlatformCaps, VideoBackend, WindowHandle,
    WindowPosition, WindowSpec,
};
use glimp::input::InputSink;
use raw_window_handle::{RawWindowHandle, XlibWindowHandle};

pub type EventLog = Rc<RefCell<Vec<String>>>;

pub struct MockWindow {
    pub id: u64,
    pub spec: WindowSpec,
    log: EventLog,
}

impl Drop for MockWindow {
    fn drop(&mut self) {
        self.log.borrow_mut().push(format!("drop window {}", self.id));
    }
}

pub struct MockContext {
    pub window: u64,
    log: EventLog,
}

impl Drop for MockContext {
    fn drop(&mut self) {
        self.log
            .borrow_mut()
            .push(format!("drop context {}", self.window));
    }
}

pub struct MockBackend {
    pub log: EventLog,

    // script
    pub init_fails: bool,
    pub driver: Option<String>,
    pub displays: Result<i32, String>,
    pub desktop: Result<NativeMode, String>,
    pub modes: Vec<NativeMode>,
    pub window_mode: Result<NativeMode, String>,
    /// This many window creations fail before any succeeds.
    pub window_failures: usize,
    /// This many context creations fail before any succeeds.
    pub context_failures: usize,
    pub reject_display_mode: bool,
    pub brightness_ok: bool,
    pub caps: PlatformCaps,
    pub placed_at: (i32, i32),
    /// Whether windows expose an OS handle.
    pub native_handles: bool,

    // observations
    pub video_up: bool,
    pub video_inits: usize,
    pub attributes: Vec<GlAttributes>,
    pub windows: Vec<WindowSpec>,
    pub display_mode_requests: Vec<Option<NativeMode>>,
    pub contexts_created: usize,
    pub swap_intervals: Vec<i32>,
    pub swaps: usize,
    pub gamma_ramps: Vec<GammaRamp>,
    pub minimized: usize,
    next_window: u64,
}

pub fn desktop_1080p() -> NativeMode {
    NativeMode::new(1920, 1080, 60, PixelFormat::Rgb24)
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            log: Rc::new(RefCell::new(Vec::new())),
            init_fails: false,
            driver: Some("mock".to_string()),
            displays: Ok(1),
            desktop: Ok(desktop_1080p()),
            modes: vec![
                NativeMode::new(1920, 1080, 60, PixelFormat::Rgb24),
                NativeMode::new(1920, 1080, 144, PixelFormat::Rgb24),
                NativeMode::new(1024, 768, 60, PixelFormat::Rgb24),
                NativeMode::new(1280, 720, 60, PixelFormat::Rgb24),
                NativeMode::new(800, 600, 60, PixelFormat::Rgb565),
            ],
            window_mode: Ok(desktop_1080p()),
            window_failures: 0,
            context_failures: 0,
            reject_display_mode: false,
            brightness_ok: true,
            caps: PlatformCaps::default(),
            placed_at: (64, 32),
            native_handles: true,
            video_up: false,
            video_inits: 0,
            attributes: Vec::new(),
            windows: Vec::new(),
            display_mode_requests: Vec::new(),
            contexts_created: 0,
            swap_intervals: Vec::new(),
            swaps: 0,
            gamma_ramps: Vec::new(),
            minimized: 0,
            next_window: 1,
        }
    }

    pub fn events(&self) -> Vec<String> {
        self.log.borrow().clone()
    }

    fn record(&self, event: impl Into<String>) {
        self.log.borrow_mut().push(event.into());
    }
}

impl VideoBackend for MockBackend {
    type Window = MockWindow;
    type Context = MockContext;

    fn video_initialized(&self) -> bool {
        self.video_up
    }

    fn init_video(&mut self) -> Result<(), String> {
        self.video_inits += 1;
        if self.init_fails {
            return Err("no video device".to_string());
        }
        self.video_up = true;
        Ok(())
    }

    fn quit_video(&mut self) {
        self.video_up = false;
        self.record("quit video");
    }

    fn current_driver(&self) -> Option<String> {
        self.driver.clone()
    }

    fn num_displays(&self) -> Result<i32, String> {
        self.displays.clone()
    }

    fn desktop_mode(&self, _display: i32) -> Result<NativeMode, String> {
        self.desktop.clone()
    }

    fn display_modes(&self, _display: i32) -> Vec<NativeMode> {
        self.modes.clone()
    }

    fn capabilities(&self) -> PlatformCaps {
        self.caps
    }

    fn set_gl_attributes(&mut self, attrs: &GlAttributes) {
        self.attributes.push(*attrs);
    }

    fn create_window(&mut self, spec: &WindowSpec) -> Result<MockWindow, String> {
        self.windows.push(spec.clone());
        if self.window_failures > 0 {
            self.window_failures -= 1;
            return Err("window refused".to_string());
        }
        let id = self.next_window;
        self.next_window += 1;
        self.record(format!("create window {}", id));
        Ok(MockWindow {
            id,
            spec: spec.clone(),
            log: Rc::clone(&self.log),
        })
    }

    fn window_handle(&self, window: &MockWindow) -> WindowHandle {
        WindowHandle(window.id)
    }

    fn native_window_handle(&self, window: &MockWindow) -> Option<RawWindowHandle> {
        self.native_handles
            .then(|| RawWindowHandle::Xlib(XlibWindowHandle::new(window.id as c_ulong)))
    }

    fn window_display_index(&self, _window: &MockWindow) -> Result<i32, String> {
        Ok(0)
    }

    fn window_position(&self, window: &MockWindow) -> (i32, i32) {
        match window.spec.position {
            WindowPosition::At(x, y) => (x, y),
            WindowPosition::Undefined => self.placed_at,
        }
    }

    fn window_display_mode(&self, _window: &MockWindow) -> Result<NativeMode, String> {
        self.window_mode.clone()
    }

    fn set_window_display_mode(
        &mut self,
        _window: &mut MockWindow,
        mode: Option<&NativeMode>,
    ) -> Result<(), String> {
        self.display_mode_requests.push(mode.copied());
        if self.reject_display_mode {
            Err("mode rejected".to_string())
        } else {
            Ok(())
        }
    }

    fn create_context(&mut self, window: &MockWindow) -> Result<MockContext, String> {
        if self.context_failures > 0 {
            self.context_failures -= 1;
            return Err("no matching visual".to_string());
        }
        self.contexts_created += 1;
        self.record(format!("create context {}", window.id));
        Ok(MockContext {
            window: window.id,
            log: Rc::clone(&self.log),
        })
    }

    fn set_swap_interval(&mut self, interval: i32) -> Result<(), String> {
        self.swap_intervals.push(interval);
        Ok(())
    }

    fn swap_window(&mut self, _window: &MockWindow) {
        self.swaps += 1;
    }

    fn set_brightness(&mut self, _window: &mut MockWindow, _brightness: f32) -> Result<(), String> {
        if self.brightness_ok {
            Ok(())
        } else {
            Err("no gamma".to_string())
        }
    }

    fn set_gamma_ramp(&mut self, _window: &mut MockWindow, ramp: &GammaRamp) -> Result<(), String> {
        self.gamma_ramps.push(ramp.clone());
        Ok(())
    }

    fn minimize(&mut self, _window: &mut MockWindow) {
        self.minimized += 1;
    }

    fn gl_proc_address(&self, name: &str) -> *const c_void {
        if name == "glClear" {
            0x1000 as *const c_void
        } else {
            ptr::null()
        }
    }
}

/// Input collaborator writing into the backend's event log.
pub struct RecordingInput {
    log: EventLog,
}

impl RecordingInput {
    pub fn boxed(backend: &MockBackend) -> Box<dyn InputSink> {
        Box::new(Self {
            log: Rc::clone(&backend.log),
        })
    }
}

impl InputSink for RecordingInput {
    fn attach(&mut self, window: WindowHandle) {
        self.log
            .borrow_mut()
            .push(format!("input attach {}", window.0));
    }

    fn shutdown(&mut self) {
        self.log.borrow_mut().push("input shutdown".to_string());
    }
}
