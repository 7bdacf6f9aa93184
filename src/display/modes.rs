//!
//! Fixed video-mode catalog and mode lookup.
//!

use std::fmt::Write as _;

use crate::display::common::{DisplayError, DisplayResult};

/// One catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoMode {
    pub description: &'static str,
    pub width: i32,
    pub height: i32,
}

/// Mode index meaning "use the custom width/height settings".
pub const MODE_CUSTOM: i32 = -1;

/// Mode index meaning "use the desktop resolution".
pub const MODE_DESKTOP: i32 = -2;

/// Mode retried when the configured one cannot be set.
pub const MODE_FALLBACK: i32 = 4;

pub const VIDEO_MODES: [VideoMode; 13] = [
    VideoMode { description: "Mode  0: 320x240", width: 320, height: 240 },
    VideoMode { description: "Mode  1: 400x300", width: 400, height: 300 },
    VideoMode { description: "Mode  2: 512x384", width: 512, height: 384 },
    VideoMode { description: "Mode  3: 640x480", width: 640, height: 480 },
    VideoMode { description: "Mode  4: 800x600", width: 800, height: 600 },
    VideoMode { description: "Mode  5: 960x720", width: 960, height: 720 },
    VideoMode { description: "Mode  6: 1024x768", width: 1024, height: 768 },
    VideoMode { description: "Mode  7: 1152x864", width: 1152, height: 864 },
    VideoMode { description: "Mode  8: 1280x1024", width: 1280, height: 1024 },
    VideoMode { description: "Mode  9: 1600x1200", width: 1600, height: 1200 },
    VideoMode { description: "Mode 10: 2048x1536", width: 2048, height: 1536 },
    VideoMode { description: "Mode 11: 856x480 (wide)", width: 856, height: 480 },
    VideoMode { description: "Mode 12: 2400x600(surround)", width: 2400, height: 600 },
];

/// Resolve a mode index to pixel dimensions.
///
/// `-1` echoes the custom size without checking it. The desktop sentinel
/// `-2` is not handled here and fails like any other out-of-range index.
pub fn resolve_mode(mode: i32, custom_width: i32, custom_height: i32) -> DisplayResult<(i32, i32)> {
    if mode < MODE_CUSTOM {
        return Err(DisplayError::InvalidMode);
    }
    if mode == MODE_CUSTOM {
        return Ok((custom_width, custom_height));
    }

    let vm = usize::try_from(mode)
        .ok()
        .and_then(|index| VIDEO_MODES.get(index))
        .ok_or(DisplayError::InvalidMode)?;
    Ok((vm.width, vm.height))
}

/// Text printed by the mode-list command, without the availability line.
pub fn mode_list() -> String {
    let mut out = String::from("\n");
    out.push_str("Mode -2: Use desktop resolution\n");
    out.push_str("Mode -1: Use r_customWidth and r_customHeight variables\n");
    for vm in &VIDEO_MODES {
        let _ = writeln!(out, "{}", vm.description);
    }
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_every_catalog_index_resolves() {
        for (index, vm) in VIDEO_MODES.iter().enumerate() {
            assert_eq!(
                resolve_mode(index as i32, 1, 1),
                Ok((vm.width, vm.height))
            );
            assert!(vm.width > 0 && vm.height > 0);
        }
    }

    #[rstest]
    #[case(-2)]
    #[case(-3)]
    #[case(i32::MIN)]
    #[case(13)]
    #[case(100)]
    fn test_out_of_range_is_invalid(#[case] mode: i32) {
        assert_eq!(resolve_mode(mode, 640, 480), Err(DisplayError::InvalidMode));
    }

    #[rstest]
    #[case(1600, 1024)]
    #[case(0, 0)]
    #[case(-5, 99999)]
    fn test_custom_echoes_verbatim(#[case] w: i32, #[case] h: i32) {
        assert_eq!(resolve_mode(MODE_CUSTOM, w, h), Ok((w, h)));
    }

    #[test]
    fn test_fallback_mode_is_800x600() {
        assert_eq!(resolve_mode(MODE_FALLBACK, 0, 0), Ok((800, 600)));
    }

    #[test]
    fn test_mode_list_text() {
        let text = mode_list();
        assert!(text.starts_with("\nMode -2: Use desktop resolution\n"));
        assert!(text.contains("Mode -1: Use r_customWidth and r_customHeight variables\n"));
        assert!(text.contains("Mode 12: 2400x600(surround)\n"));
        assert!(text.ends_with("\n\n"));
        // leading blank, two sentinels, the catalog, trailing blank
        assert_eq!(text.lines().count(), 1 + 2 + VIDEO_MODES.len() + 1);
    }
}
