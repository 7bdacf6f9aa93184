//! Context negotiation against a scripted backend.

mod common;

use common::MockBackend;
use glimp::display::negotiate::{negotiate, ContextRequest, Precision, PrecisionLadder, MAX_ATTEMPTS};
use glimp::display::{DisplayConfiguration, GraphicsApi, NativeMode, PixelFormat, WindowPosition};
use rstest::rstest;

fn request() -> ContextRequest {
    ContextRequest {
        api: GraphicsApi::OpenGl,
        title: "test".to_string(),
        width: 800,
        height: 600,
        position: WindowPosition::Undefined,
        fullscreen: false,
        borderless: false,
        precision: Precision::from_settings(0, 0, 8),
        samples: 0,
        stereo: false,
        display_refresh: 0,
        swap_interval: 1,
    }
}

#[test]
fn test_first_attempt_succeeds() {
    let mut backend = MockBackend::new();
    let mut config = DisplayConfiguration::default();

    let surface = negotiate(&mut backend, &request(), &mut config).expect("surface");
    assert!(surface.context.is_some());
    assert_eq!((config.color_bits, config.depth_bits, config.stencil_bits), (24, 24, 8));
    assert_eq!(backend.windows.len(), 1);
    assert_eq!(backend.swap_intervals, vec![1]);

    let attrs = backend.attributes[0];
    assert_eq!((attrs.red_bits, attrs.green_bits, attrs.blue_bits), (8, 8, 8));
    assert_eq!(attrs.multisample_buffers, 0);
    assert!(attrs.double_buffer && attrs.accelerated);
}

#[test]
fn test_all_attempts_fail() {
    let mut backend = MockBackend::new();
    backend.context_failures = usize::MAX;
    let mut config = DisplayConfiguration::default();

    assert!(negotiate(&mut backend, &request(), &mut config).is_none());
    assert_eq!(backend.windows.len(), MAX_ATTEMPTS);
    assert_eq!(backend.contexts_created, 0);
    assert!(backend.swap_intervals.is_empty());
    assert_eq!((config.color_bits, config.depth_bits, config.stencil_bits), (0, 0, 0));

    // every failed window was released before the next one was created
    let events = backend.events();
    for id in 1..=MAX_ATTEMPTS {
        let created = events.iter().position(|e| *e == format!("create window {}", id));
        let dropped = events.iter().position(|e| *e == format!("drop window {}", id));
        assert!(created < dropped, "window {} not released", id);
        if let Some(next) = events.iter().position(|e| *e == format!("create window {}", id + 1)) {
            assert!(dropped < Some(next));
        }
    }
}

#[rstest]
#[case(1)]
#[case(3)]
#[case(5)]
#[case(8)]
#[case(15)]
fn test_success_on_attempt_reports_that_precision(#[case] attempt: usize) {
    let mut backend = MockBackend::new();
    backend.context_failures = attempt;
    let mut config = DisplayConfiguration::default();

    let surface = negotiate(&mut backend, &request(), &mut config);
    assert!(surface.is_some());

    let expected = PrecisionLadder::new(Precision::from_settings(0, 0, 8))
        .nth(attempt)
        .unwrap();
    assert_eq!(
        (config.color_bits, config.depth_bits, config.stencil_bits),
        (expected.color_bits, expected.depth_bits, expected.stencil_bits)
    );

    let attrs = backend.attributes[attempt];
    assert_eq!(i32::from(attrs.depth_bits), expected.depth_bits);
    assert_eq!(i32::from(attrs.stencil_bits), expected.stencil_bits);
    assert_eq!(attrs.red_bits, if expected.color_bits == 24 { 8 } else { 4 });
}

#[test]
fn test_window_failures_are_retried() {
    let mut backend = MockBackend::new();
    backend.window_failures = 2;
    let mut config = DisplayConfiguration::default();

    assert!(negotiate(&mut backend, &request(), &mut config).is_some());
    assert_eq!(backend.windows.len(), 3);
    assert_eq!(config.depth_bits, 16);
}

#[test]
fn test_multisample_and_stereo() {
    let mut backend = MockBackend::new();
    let mut config = DisplayConfiguration::default();
    let request = ContextRequest {
        samples: 4,
        stereo: true,
        ..request()
    };

    negotiate(&mut backend, &request, &mut config).expect("surface");
    assert_eq!(backend.attributes[0].multisample_buffers, 1);
    assert_eq!(backend.attributes[0].multisample_samples, 4);
    assert!(backend.attributes[0].stereo);
    assert!(config.stereo_enabled);
}

#[rstest]
#[case(24, PixelFormat::Rgb24)]
#[case(16, PixelFormat::Rgb565)]
fn test_fullscreen_requests_explicit_mode(#[case] color_bits: i32, #[case] format: PixelFormat) {
    let mut backend = MockBackend::new();
    let mut config = DisplayConfiguration::default();
    let request = ContextRequest {
        fullscreen: true,
        borderless: true,
        display_refresh: 75,
        precision: Precision::from_settings(color_bits, 24, 8),
        ..request()
    };

    negotiate(&mut backend, &request, &mut config).expect("surface");
    assert_eq!(
        backend.display_mode_requests,
        vec![Some(NativeMode::new(800, 600, 75, format))]
    );
    assert_eq!(config.display_frequency, 75);
    assert!(backend.windows[0].fullscreen);
    assert!(!backend.windows[0].borderless);
}

#[test]
fn test_fullscreen_without_matching_format_never_succeeds() {
    let mut backend = MockBackend::new();
    let mut config = DisplayConfiguration::default();
    let request = ContextRequest {
        fullscreen: true,
        precision: Precision::from_settings(15, 24, 8),
        ..request()
    };

    assert!(negotiate(&mut backend, &request, &mut config).is_none());
    assert!(backend.display_mode_requests.is_empty());
    assert_eq!(backend.contexts_created, 0);
}

#[test]
fn test_rejected_fullscreen_mode_moves_on() {
    let mut backend = MockBackend::new();
    backend.reject_display_mode = true;
    let mut config = DisplayConfiguration::default();
    let request = ContextRequest {
        fullscreen: true,
        ..request()
    };

    assert!(negotiate(&mut backend, &request, &mut config).is_none());
    assert_eq!(backend.display_mode_requests.len(), MAX_ATTEMPTS);
}

#[test]
fn test_plain_window_single_attempt() {
    let mut backend = MockBackend::new();
    let mut config = DisplayConfiguration::default();
    let request = ContextRequest {
        api: GraphicsApi::Plain,
        fullscreen: true,
        ..request()
    };

    let surface = negotiate(&mut backend, &request, &mut config).expect("window");
    assert!(surface.context.is_none());
    assert!(!backend.windows[0].opengl);
    assert_eq!(backend.display_mode_requests, vec![None]);
    assert!(backend.attributes.is_empty());

    // a rejected default mode is only logged
    let mut backend = MockBackend::new();
    backend.reject_display_mode = true;
    assert!(negotiate(&mut backend, &request, &mut config).is_some());

    let mut backend = MockBackend::new();
    backend.window_failures = 1;
    assert!(negotiate(&mut backend, &request, &mut config).is_none());
    assert_eq!(backend.windows.len(), 1);
}
