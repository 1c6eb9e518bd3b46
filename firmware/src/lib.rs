//! Foot pedal USB keyboard for the ATtiny85.
//!
//! Hardware glue around [`pedal_core`]: V-USB bindings, the oscillator trim
//! register, the sense lines and the watchdog.

#![no_std]

pub use pedal_core::{
    force_reenumeration, ClockCalibrator, KeyState, KeyboardReport, PedalKeyboard, UsbTransport,
    Watchdog,
};

pub mod board;
pub mod config;
pub mod vusb;

pub use board::{delay_ms, HardwareWatchdog, SensePin};
pub use vusb::{OscillatorTrim, SoftUsb};

/// The pedal keyboard as wired on this board.
pub type Keyboard = PedalKeyboard<SoftUsb, SensePin, SensePin, OscillatorTrim>;
