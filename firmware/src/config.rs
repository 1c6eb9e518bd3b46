//! Board constants.
//!
//! The USB pins must match `USB_CFG_DMINUS_BIT` / `USB_CFG_DPLUS_BIT` in the
//! `usbconfig.h` V-USB was built with.

#[cfg(all(feature = "clock-16m5", feature = "clock-12m8"))]
compile_error!("Cannot enable both `clock-16m5` and `clock-12m8` - pick one CPU clock");

#[cfg(not(any(feature = "clock-16m5", feature = "clock-12m8")))]
compile_error!("Enable one of the `clock-16m5` or `clock-12m8` features");

/// Declared CPU clock, the calibration target is derived from it.
#[cfg(feature = "clock-12m8")]
pub const CPU_HZ: u32 = 12_800_000;
#[cfg(not(feature = "clock-12m8"))]
pub const CPU_HZ: u32 = 16_500_000;

/// PORTB bit of plate A (bridged = pedal down).
pub const PLATE_A_BIT: u8 = 4;
/// PORTB bit of plate B (bridged together with A = foot resting, ignored).
pub const PLATE_B_BIT: u8 = 3;

/// PORTB bit of USB D-. D+ sits on PB2 (INT0), which only V-USB touches.
pub const USB_DMINUS_BIT: u8 = 0;

/// WDTCR prescaler bits for a ~1 s timeout.
pub const WATCHDOG_1S: u8 = 0b0000_0110;
