//!
//! Detection of the resolutions the active display supports.
//!
//! The result is informational: a space-joined `WxH` list published in the
//! `r_availableModes` setting.
//!

use std::cmp::Ordering;

use crate::display::backend::VideoBackend;
use crate::display::common::{NativeMode, PixelFormat};

/// Two aspect ratios closer than this are considered equal.
pub const ASPECT_EPSILON: f32 = 0.001;

/// Maximum length of the published list, including the slot the legacy
/// fixed buffer kept for its terminator. Content never exceeds
/// `MODE_LIST_MAX - 1` bytes.
pub const MODE_LIST_MAX: usize = 1024;

/// What a display reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvailableModes {
    /// The display accepts arbitrary sizes.
    Any,
    /// Distinct sizes in first-seen order.
    Listed(Vec<(i32, i32)>),
}

/// Filter to the window's pixel format and drop repeated sizes.
///
/// Stops at the first zero-sized mode and reports [`AvailableModes::Any`].
pub fn collect_modes<I>(window_format: PixelFormat, modes: I) -> AvailableModes
where
    I: IntoIterator<Item = NativeMode>,
{
    let mut found: Vec<(i32, i32)> = Vec::new();

    for mode in modes {
        if mode.width == 0 || mode.height == 0 {
            return AvailableModes::Any;
        }
        if mode.format != window_format {
            continue;
        }
        // refresh-rate variants collapse into one entry
        if found.iter().any(|&(w, h)| w == mode.width && h == mode.height) {
            continue;
        }
        found.push((mode.width, mode.height));
    }

    AvailableModes::Listed(found)
}

/// Closer to the desktop aspect first, then smaller area first.
pub fn compare_modes(a: (i32, i32), b: (i32, i32), display_aspect: f32) -> Ordering {
    let aspect_a = a.0 as f32 / a.1 as f32;
    let aspect_b = b.0 as f32 / b.1 as f32;
    let diffs_diff = (aspect_a - display_aspect).abs() - (aspect_b - display_aspect).abs();

    if diffs_diff > ASPECT_EPSILON {
        Ordering::Greater
    } else if diffs_diff < -ASPECT_EPSILON {
        Ordering::Less
    } else {
        (i64::from(a.0) * i64::from(a.1)).cmp(&(i64::from(b.0) * i64::from(b.1)))
    }
}

/// Sort by [`compare_modes`].
///
/// The epsilon comparison is not transitive, so `slice::sort_by` cannot be
/// used; a stable insertion sort accepts any comparator.
pub fn sort_modes(modes: &mut [(i32, i32)], display_aspect: f32) {
    for i in 1..modes.len() {
        let mut j = i;
        while j > 0 && compare_modes(modes[j - 1], modes[j], display_aspect) == Ordering::Greater {
            modes.swap(j - 1, j);
            j -= 1;
        }
    }
}

/// Join sizes as `WxH` separated by spaces, keeping under [`MODE_LIST_MAX`].
///
/// An entry that does not fit is skipped and logged; later shorter entries
/// may still be added.
pub fn format_mode_list(modes: &[(i32, i32)]) -> String {
    let mut buf = String::new();

    for &(w, h) in modes {
        let entry = format!("{}x{} ", w, h);
        if entry.len() < MODE_LIST_MAX - buf.len() {
            buf.push_str(&entry);
        } else {
            log::info!("Skipping mode {}x{}, buffer too small", w, h);
        }
    }

    buf.pop();
    buf
}

/// Query the display under `window` and return the published list.
///
/// `Err` when the window's own display mode is unknown. `Ok(None)` when the
/// display takes any resolution or reports nothing usable.
pub fn detect_available_modes<B: VideoBackend>(
    backend: &B,
    window: &B::Window,
    display_aspect: f32,
) -> Result<Option<String>, String> {
    let window_mode = backend.window_display_mode(window).map_err(|e| {
        log::info!(
            "Couldn't get window display mode, no resolutions detected ({}).",
            e
        );
        e
    })?;

    let display = backend.window_display_index(window).unwrap_or(0);

    let mut modes = match collect_modes(window_mode.format, backend.display_modes(display)) {
        AvailableModes::Any => {
            log::info!("Display supports any resolution");
            return Ok(None);
        }
        AvailableModes::Listed(modes) => modes,
    };

    if modes.len() > 1 {
        sort_modes(&mut modes, display_aspect);
    }

    let list = format_mode_list(&modes);
    if list.is_empty() {
        return Ok(None);
    }

    log::info!("Available modes: '{}'", list);
    Ok(Some(list))
}
