//! Platform-agnostic logic for the foot pedal keyboard.
//!
//! The pedal is a two-plate contact sensor on a microcontroller without USB
//! hardware. A software USB transport does the bus work; this crate holds
//! everything specific to the device and keeps it testable on the host.
//!
//! # Overview
//!
//! - [`calibration`]: Oscillator trim search against USB frame timing ([`ClockCalibrator`])
//! - [`builder`]: Symbol to report mapping ([`build`])
//! - [`negotiator`]: HID class request handling ([`ReportNegotiator`])
//! - [`debounce`]: Plate sampling and dwell counter ([`InputDebouncer`])
//! - [`key_event`]: Press/release state machine ([`KeyEventStateMachine`])
//! - [`transport`]: Traits for the transport, its callbacks and the watchdog
//! - [`keyboard`]: The driver context owning all of the above ([`PedalKeyboard`])
//!
//! # Main loop
//!
//! ```text
//! loop {
//!     feed watchdog
//!     poll transport      -> on_reset / on_setup / on_write callbacks
//!     sample plates       -> pedal down?, dwell counter += 1
//!     advance state       -> Wait/Pressing edges reset the counter
//!     if endpoint free    -> send key-down ('x') or key-up report
//! }
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting and logging (for embedded targets)
//!
//! # No-std Support
//!
//! This crate is `#![no_std]` by default and uses no heap allocations.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

// Must come first so the logging macros are visible to the modules below.
#[macro_use]
mod fmt;

pub mod builder;
pub mod calibration;
pub mod debounce;
pub mod key_event;
pub mod keyboard;
pub mod negotiator;
pub mod transport;

#[cfg(test)]
mod testing;

pub use builder::{build, keycode_for, NULL_SYMBOL, PEDAL_SYMBOL};
pub use calibration::{target_frame_length, Calibration, ClockCalibrator, FrameClock};
pub use debounce::{DebounceCounter, InputDebouncer, DWELL_ITERATIONS};
pub use key_event::{KeyEventStateMachine, KeyState};
pub use keyboard::{force_reenumeration, HidInterface, PedalKeyboard};
pub use negotiator::ReportNegotiator;
pub use transport::{ControlHandler, SetupReply, UsbTransport, Watchdog};

pub use pedal_proto::{KeyboardReport, SetupRequest};
