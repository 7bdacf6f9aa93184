//! Console-variable style settings store.
//!
//! Settings are named string values with integer views, registered with a
//! default and a few flags. They load from and save to simple
//! `key = value` property files.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

pub const R_SDL_DRIVER: &str = "r_sdlDriver";
pub const R_FULLSCREEN: &str = "r_fullscreen";
pub const R_NOBORDER: &str = "r_noborder";
pub const R_CENTER_WINDOW: &str = "r_centerWindow";
pub const R_CUSTOM_WIDTH: &str = "r_customwidth";
pub const R_CUSTOM_HEIGHT: &str = "r_customheight";
pub const R_SWAP_INTERVAL: &str = "r_swapInterval";
pub const R_STEREO: &str = "r_stereo";
pub const R_MODE: &str = "r_mode";
pub const R_DISPLAY_REFRESH: &str = "r_displayRefresh";
pub const R_STENCIL_BITS: &str = "r_stencilbits";
pub const R_DEPTH_BITS: &str = "r_depthbits";
pub const R_COLOR_BITS: &str = "r_colorbits";
pub const R_IGNORE_HW_GAMMA: &str = "r_ignorehwgamma";
pub const R_EXT_MULTISAMPLE: &str = "r_ext_multisample";
pub const R_AVAILABLE_MODES: &str = "r_availableModes";
pub const IN_NOGRAB: &str = "in_nograb";
pub const CL_DISCORD_SHARE_PASSWORD: &str = "cl_discordSharePassword";

/// Storage behaviour of a setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SettingFlags {
    /// Written back by [`Settings::to_propfile`].
    pub archive: bool,
    /// Only takes effect on the next mode set.
    pub latch: bool,
    /// Cannot be changed from files or the command line.
    pub read_only: bool,
}

impl SettingFlags {
    pub const NONE: Self = Self { archive: false, latch: false, read_only: false };
    pub const ARCHIVE: Self = Self { archive: true, latch: false, read_only: false };
    pub const LATCH: Self = Self { archive: false, latch: true, read_only: false };
    pub const ARCHIVE_LATCH: Self = Self { archive: true, latch: true, read_only: false };
    pub const READ_ONLY: Self = Self { archive: false, latch: false, read_only: true };
}

#[derive(Debug, Clone)]
struct Setting {
    value: String,
    default: String,
    flags: SettingFlags,
    range: Option<(i32, i32)>,
    modified: bool,
}

struct Registration {
    name: &'static str,
    default: &'static str,
    flags: SettingFlags,
    range: Option<(i32, i32)>,
}

const REGISTRATIONS: &[Registration] = &[
    Registration { name: R_SDL_DRIVER, default: "", flags: SettingFlags::READ_ONLY, range: None },
    Registration { name: R_FULLSCREEN, default: "0", flags: SettingFlags::ARCHIVE_LATCH, range: None },
    Registration { name: R_NOBORDER, default: "0", flags: SettingFlags::ARCHIVE_LATCH, range: None },
    Registration { name: R_CENTER_WINDOW, default: "0", flags: SettingFlags::ARCHIVE_LATCH, range: None },
    Registration { name: R_CUSTOM_WIDTH, default: "1600", flags: SettingFlags::ARCHIVE_LATCH, range: None },
    Registration { name: R_CUSTOM_HEIGHT, default: "1024", flags: SettingFlags::ARCHIVE_LATCH, range: None },
    Registration { name: R_SWAP_INTERVAL, default: "0", flags: SettingFlags::ARCHIVE, range: None },
    Registration { name: R_STEREO, default: "0", flags: SettingFlags::ARCHIVE_LATCH, range: None },
    Registration { name: R_MODE, default: "4", flags: SettingFlags::ARCHIVE_LATCH, range: None },
    Registration { name: R_DISPLAY_REFRESH, default: "0", flags: SettingFlags::LATCH, range: Some((0, 240)) },
    Registration { name: R_STENCIL_BITS, default: "8", flags: SettingFlags::ARCHIVE_LATCH, range: None },
    Registration { name: R_DEPTH_BITS, default: "0", flags: SettingFlags::ARCHIVE_LATCH, range: None },
    Registration { name: R_COLOR_BITS, default: "0", flags: SettingFlags::ARCHIVE_LATCH, range: None },
    Registration { name: R_IGNORE_HW_GAMMA, default: "0", flags: SettingFlags::ARCHIVE_LATCH, range: None },
    Registration { name: R_EXT_MULTISAMPLE, default: "0", flags: SettingFlags::ARCHIVE_LATCH, range: None },
    Registration { name: R_AVAILABLE_MODES, default: "", flags: SettingFlags::READ_ONLY, range: None },
    Registration { name: IN_NOGRAB, default: "0", flags: SettingFlags::NONE, range: None },
    Registration { name: CL_DISCORD_SHARE_PASSWORD, default: "0", flags: SettingFlags::ARCHIVE, range: None },
];

/// Named settings with defaults, flags and change tracking.
#[derive(Debug, Clone)]
pub struct Settings {
    vars: BTreeMap<String, Setting>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

/// Integer view of a setting value: the leading signed digits, or 0.
///
/// `"2.9"` reads as 2 and `"12abc"` as 12. Out-of-range values saturate.
fn integer_value(value: &str) -> i32 {
    let value = value.trim_start();
    let (negative, digits) = match value.as_bytes().first() {
        Some(b'-') => (true, &value[1..]),
        Some(b'+') => (false, &value[1..]),
        _ => (false, value),
    };

    let magnitude = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, d| {
            (acc * 10 + i64::from(d - b'0')).min(i64::from(i32::MAX) + 1)
        });
    let signed = if negative { -magnitude } else { magnitude };
    signed.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

impl Settings {
    /// Create the store with every display and presence setting registered.
    pub fn new() -> Self {
        let vars = REGISTRATIONS
            .iter()
            .map(|r| {
                (
                    r.name.to_string(),
                    Setting {
                        value: r.default.to_string(),
                        default: r.default.to_string(),
                        flags: r.flags,
                        range: r.range,
                        modified: false,
                    },
                )
            })
            .collect();
        Self { vars }
    }

    /// Raw string value.
    pub fn string(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(|s| s.value.as_str())
    }

    /// Integer value, 0 when unset or not numeric.
    pub fn integer(&self, name: &str) -> i32 {
        self.string(name).map(integer_value).unwrap_or(0)
    }

    pub fn boolean(&self, name: &str) -> bool {
        self.integer(name) != 0
    }

    pub fn flags(&self, name: &str) -> Option<SettingFlags> {
        self.vars.get(name).map(|s| s.flags)
    }

    pub fn default_value(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(|s| s.default.as_str())
    }

    /// Set a value the way a user would. Read-only settings are refused.
    ///
    /// Unknown names are created as archived settings so that a saved file
    /// keeps entries this crate does not know about.
    pub fn set(&mut self, name: &str, value: &str) -> Result<()> {
        if let Some(setting) = self.vars.get(name) {
            if setting.flags.read_only {
                bail!("{} is read only", name);
            }
        }
        self.store(name, value);
        Ok(())
    }

    /// Set a value from inside the engine, bypassing the read-only flag.
    pub fn force_set(&mut self, name: &str, value: &str) {
        self.store(name, value);
    }

    fn store(&mut self, name: &str, value: &str) {
        let setting = self.vars.entry(name.to_string()).or_insert_with(|| Setting {
            value: String::new(),
            default: String::new(),
            flags: SettingFlags::ARCHIVE,
            range: None,
            modified: false,
        });

        let mut value = value.to_string();
        if let Some((min, max)) = setting.range {
            let as_int = integer_value(&value);
            let clamped = as_int.clamp(min, max);
            if clamped != as_int || value.trim() != as_int.to_string() {
                log::warn!(
                    "{} must be an integer between {} and {}, setting to {}",
                    name,
                    min,
                    max,
                    clamped
                );
            }
            value = clamped.to_string();
        }

        if setting.value != value {
            setting.value = value;
            setting.modified = true;
        }
    }

    /// Whether the value changed since the flag was last cleared.
    pub fn is_modified(&self, name: &str) -> bool {
        self.vars.get(name).map(|s| s.modified).unwrap_or(false)
    }

    /// Read and clear the modified flag.
    pub fn take_modified(&mut self, name: &str) -> bool {
        match self.vars.get_mut(name) {
            Some(setting) => std::mem::replace(&mut setting.modified, false),
            None => false,
        }
    }

    pub fn clear_modified(&mut self, name: &str) {
        if let Some(setting) = self.vars.get_mut(name) {
            setting.modified = false;
        }
    }

    /// Apply `key = value` lines. Read-only keys are skipped with a warning.
    pub fn load_str(&mut self, data: &str) {
        let mut entries = Vec::new();
        parse_propfile(data, &mut |key, value| {
            entries.push((key.to_string(), value.to_string()));
        });

        for (key, value) in entries {
            if let Err(err) = self.set(&key, &value) {
                log::warn!("Ignoring setting from file: {}", err);
            }
        }
    }

    /// Load a settings file on top of the defaults.
    pub fn load_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        let mut settings = Self::new();
        settings.load_str(&data);
        Ok(settings)
    }

    /// Render archived settings as a property file.
    pub fn to_propfile(&self) -> String {
        let mut out = String::new();
        for (name, setting) in &self.vars {
            if setting.flags.archive {
                let _ = writeln!(out, "{} = {}", name, setting.value);
            }
        }
        out
    }

    pub fn save_file(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_propfile())
            .with_context(|| format!("Failed to write settings file {}", path.display()))
    }

    /// Typed snapshot of everything the display core reads.
    pub fn display(&self) -> DisplaySettings {
        DisplaySettings {
            fullscreen: self.boolean(R_FULLSCREEN),
            borderless: self.boolean(R_NOBORDER),
            center_window: self.boolean(R_CENTER_WINDOW),
            custom_width: self.integer(R_CUSTOM_WIDTH),
            custom_height: self.integer(R_CUSTOM_HEIGHT),
            swap_interval: self.integer(R_SWAP_INTERVAL),
            stereo: self.boolean(R_STEREO),
            mode: self.integer(R_MODE),
            display_refresh: self.integer(R_DISPLAY_REFRESH),
            stencil_bits: self.integer(R_STENCIL_BITS),
            depth_bits: self.integer(R_DEPTH_BITS),
            color_bits: self.integer(R_COLOR_BITS),
            ignore_hw_gamma: self.integer(R_IGNORE_HW_GAMMA),
            multisample: self.integer(R_EXT_MULTISAMPLE),
            no_grab: self.boolean(IN_NOGRAB),
        }
    }
}

/// The display settings as plain values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplaySettings {
    pub fullscreen: bool,
    pub borderless: bool,
    pub center_window: bool,
    pub custom_width: i32,
    pub custom_height: i32,
    pub swap_interval: i32,
    pub stereo: bool,
    pub mode: i32,
    pub display_refresh: i32,
    pub stencil_bits: i32,
    pub depth_bits: i32,
    pub color_bits: i32,
    pub ignore_hw_gamma: i32,
    pub multisample: i32,
    pub no_grab: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Settings::new().display()
    }
}

/// Parse `key = value` text, invoking `handler` for each entry.
///
/// Preserves key case, treats `#` as a comment to end of line and trims
/// whitespace around keys and values. Lines without `=` are skipped.
pub fn parse_propfile(data: &str, handler: &mut dyn FnMut(&str, &str)) {
    const NL: u8 = b'\n';
    const HASH: u8 = b'#';
    const EQ: u8 = b'=';

    let bytes = data.as_bytes();
    let len = bytes.len();
    let mut i = 0;

    while i < len {
        while i < len && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= len {
            break;
        }

        if bytes[i] == HASH {
            while i < len && bytes[i] != NL {
                i += 1;
            }
            continue;
        }

        let key_start = i;
        while i < len && bytes[i] != EQ && bytes[i] != NL && bytes[i] != HASH {
            i += 1;
        }

        if i >= len || bytes[i] != EQ {
            log::warn!("Key without value: {}", data[key_start..i].trim());
            while i < len && bytes[i] != NL {
                i += 1;
            }
            continue;
        }

        let key = data[key_start..i].trim_end();
        i += 1;

        let value_start = i;
        while i < len && bytes[i] != HASH && bytes[i] != NL {
            i += 1;
        }
        let value = data[value_start..i].trim();

        while i < len && bytes[i] != NL {
            i += 1;
        }

        if !key.is_empty() {
            handler(key, value);
        }
    }
}
