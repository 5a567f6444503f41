//! UI keycode → device keycode translation.
//!
//! The operator console reports keys in the Qt virtual-key numbering;
//! the device consumes Android keycodes. Translation applies an ordered
//! rule set: the digit and letter ranges are checked first so the
//! common case short-circuits without a table lookup, then a fixed
//! table covers the handful of non-alphanumeric keys the device
//! understands. Anything else has no device equivalent and maps to
//! `None` — callers send no command for those.

use tracing::debug;

// ── Operator-console key numbers ─────────────────────────────────

/// Key numbers delivered by the operator console (Qt virtual-key space).
pub mod ui_keys {
    pub const SPACE: u32 = 0x20;
    pub const TAB: u32 = 0x0100_0001;
    pub const BACKSPACE: u32 = 0x0100_0003;
    pub const ENTER: u32 = 0x0100_0004;
    pub const SHIFT_LEFT: u32 = 0x0100_0020;
    pub const CTRL_LEFT: u32 = 0x0100_0021;
}

// ── Device keycodes ──────────────────────────────────────────────

/// Android keycodes understood by the device.
pub mod device_keys {
    pub const HOME: u16 = 3;
    pub const BACK: u16 = 4;
    pub const DIGIT_0: u16 = 7;
    pub const VOLUME_UP: u16 = 24;
    pub const VOLUME_DOWN: u16 = 25;
    pub const A: u16 = 29;
    pub const SHIFT_LEFT: u16 = 59;
    pub const TAB: u16 = 61;
    pub const SPACE: u16 = 62;
    pub const ENTER: u16 = 66;
    pub const DEL: u16 = 67;
    pub const CTRL_LEFT: u16 = 113;
}

// ── Translation ──────────────────────────────────────────────────

/// Map a UI keycode to its device keycode, or `None` when the key has
/// no device equivalent.
///
/// Uppercase and lowercase letters collapse onto the same device range:
/// the device has a single "letter key" concept.
pub fn map_keycode(ui_code: u32) -> Option<u16> {
    // Range rules run before the fixed table.
    if (48..=57).contains(&ui_code) {
        return Some((ui_code - 48) as u16 + device_keys::DIGIT_0);
    }
    if (65..=90).contains(&ui_code) {
        return Some((ui_code - 65) as u16 + device_keys::A);
    }
    if (97..=122).contains(&ui_code) {
        return Some((ui_code - 97) as u16 + device_keys::A);
    }

    match ui_code {
        ui_keys::SPACE => Some(device_keys::SPACE),
        ui_keys::BACKSPACE => Some(device_keys::DEL),
        ui_keys::SHIFT_LEFT => Some(device_keys::SHIFT_LEFT),
        ui_keys::ENTER => Some(device_keys::ENTER),
        ui_keys::TAB => Some(device_keys::TAB),
        ui_keys::CTRL_LEFT => Some(device_keys::CTRL_LEFT),
        other => {
            debug!("no device mapping for ui keycode {other:#x}");
            None
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────
