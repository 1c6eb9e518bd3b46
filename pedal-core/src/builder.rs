//! Symbol to HID report mapping.

use pedal_proto::{KeyboardReport, USAGE_KEY_A};

/// Symbol meaning "no key pressed".
pub const NULL_SYMBOL: u8 = 0;

/// Symbol sent while the pedal is held.
pub const PEDAL_SYMBOL: u8 = b'x';

/// HID usage for a lowercase ASCII letter, 0 for anything else.
#[inline]
#[must_use]
pub const fn keycode_for(symbol: u8) -> u8 {
    match symbol {
        b'a'..=b'z' => USAGE_KEY_A + (symbol - b'a'),
        _ => 0,
    }
}

/// Build the report for `symbol`.
///
/// Only lowercase letters produce a key. [`NULL_SYMBOL`] and every other
/// byte yield an all-zero report, which releases whatever was pressed.
#[must_use]
pub const fn build(symbol: u8) -> KeyboardReport {
    KeyboardReport::single(keycode_for(symbol))
}
