//!
//! Hardware gamma ramp construction.
//!

/// Entries per channel.
pub const GAMMA_RAMP_SIZE: usize = 256;

/// Three 16-bit channel tables ready for the display driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GammaRamp {
    pub red: [u16; GAMMA_RAMP_SIZE],
    pub green: [u16; GAMMA_RAMP_SIZE],
    pub blue: [u16; GAMMA_RAMP_SIZE],
}

impl GammaRamp {
    /// Replicate each 8-bit value into both bytes of a 16-bit entry.
    #[must_use]
    pub fn from_tables(
        red: &[u8; GAMMA_RAMP_SIZE],
        green: &[u8; GAMMA_RAMP_SIZE],
        blue: &[u8; GAMMA_RAMP_SIZE],
    ) -> Self {
        Self {
            red: widen(red),
            green: widen(green),
            blue: widen(blue),
        }
    }

    fn channels_mut(&mut self) -> [&mut [u16; GAMMA_RAMP_SIZE]; 3] {
        [&mut self.red, &mut self.green, &mut self.blue]
    }

    /// Keep the lower half within what some drivers accept.
    ///
    /// Entry `i < 128` is capped at `(128 + i) << 8`, and entry 127 at
    /// `254 << 8`.
    pub fn clamp_low_half(&mut self) {
        for table in self.channels_mut() {
            for (i, entry) in table.iter_mut().take(128).enumerate() {
                *entry = (*entry).min(((128 + i) << 8) as u16);
            }
            table[127] = table[127].min(254 << 8);
        }
    }

    /// Raise every entry that is lower than its predecessor.
    pub fn make_monotonic(&mut self) {
        for table in self.channels_mut() {
            for i in 1..GAMMA_RAMP_SIZE {
                if table[i] < table[i - 1] {
                    table[i] = table[i - 1];
                }
            }
        }
    }
}

fn widen(table: &[u8; GAMMA_RAMP_SIZE]) -> [u16; GAMMA_RAMP_SIZE] {
    let mut out = [0u16; GAMMA_RAMP_SIZE];
    for (dst, &src) in out.iter_mut().zip(table.iter()) {
        *dst = (u16::from(src) << 8) | u16::from(src);
    }
    out
}

/// Build the ramp uploaded for three 8-bit tables.
#[must_use]
pub fn build_gamma_ramp(
    red: &[u8; GAMMA_RAMP_SIZE],
    green: &[u8; GAMMA_RAMP_SIZE],
    blue: &[u8; GAMMA_RAMP_SIZE],
    clamp_low_half: bool,
) -> GammaRamp {
    let mut ramp = GammaRamp::from_tables(red, green, blue);
    if clamp_low_half {
        log::debug!("performing gamma clamp.");
        ramp.clamp_low_half();
    }
    ramp.make_monotonic();
    ramp
}
