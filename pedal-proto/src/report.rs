//! Boot-keyboard input report.

use zerocopy::{Immutable, IntoBytes, KnownLayout};

/// HID usage ID of the `a` key on the Keyboard/Keypad page (0x07).
/// The rest of the alphabet follows contiguously up to `z` (0x1D).
pub const USAGE_KEY_A: u8 = 0x04;

/// Fixed 8-byte keyboard input report.
///
/// Layout on the wire:
///
/// | Byte | Field |
/// |------|-------|
/// | 0    | modifier bitmap |
/// | 1    | reserved (always 0) |
/// | 2..8 | keycode array |
///
/// The pedal only ever uses `keycodes[0]`; every other byte stays zero.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, IntoBytes, Immutable, KnownLayout)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(C)]
pub struct KeyboardReport {
    pub modifier: u8,
    pub reserved: u8,
    pub keycodes: [u8; 6],
}

impl KeyboardReport {
    /// Size of the report in bytes.
    pub const SIZE: usize = 8;

    /// Report with no modifiers and no keys pressed.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            modifier: 0,
            reserved: 0,
            keycodes: [0; 6],
        }
    }

    /// Report with a single key pressed and no modifiers.
    #[must_use]
    pub const fn single(keycode: u8) -> Self {
        Self {
            modifier: 0,
            reserved: 0,
            keycodes: [keycode, 0, 0, 0, 0, 0],
        }
    }

    /// The keycode in the first slot, 0 when nothing is pressed.
    #[inline]
    #[must_use]
    pub const fn key(&self) -> u8 {
        self.keycodes[0]
    }

    /// Check if no key and no modifier is set.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::empty()
    }

    /// Borrow the report as its wire bytes.
    #[inline]
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        self.as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_is_eight_bytes() {
        assert_eq!(core::mem::size_of::<KeyboardReport>(), KeyboardReport::SIZE);
        assert_eq!(KeyboardReport::empty().bytes().len(), KeyboardReport::SIZE);
    }

    #[test]
    fn test_single_key_layout() {
        let report = KeyboardReport::single(0x1B);
        assert_eq!(report.bytes(), &[0, 0, 0x1B, 0, 0, 0, 0, 0]);
        assert_eq!(report.key(), 0x1B);
        assert!(!report.is_empty());
    }

    #[test]
    fn test_modifier_is_first_byte() {
        let report = KeyboardReport {
            modifier: 0x02,
            ..KeyboardReport::empty()
        };
        assert_eq!(report.bytes()[0], 0x02);
        assert_eq!(report.bytes()[1], 0);
    }

    #[test]
    fn test_default_is_empty() {
        assert!(KeyboardReport::default().is_empty());
    }
}
