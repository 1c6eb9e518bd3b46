//! Wire types for the foot pedal keyboard.
//!
//! This crate holds everything the host sees on the bus:
//!
//! - [`KeyboardReport`] - the 8-byte boot keyboard input report
//! - [`REPORT_DESCRIPTOR`] - the HID report descriptor, byte for byte
//! - [`SetupRequest`] / [`HidRequest`] - decoded control requests
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting (for embedded logging)
//!
//! # No-std Support
//!
//! This crate is `#![no_std]` by default and uses no heap allocations.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

pub mod descriptor;
pub mod report;
pub mod request;

pub use descriptor::{REPORT_DESCRIPTOR, REPORT_DESCRIPTOR_LEN};
pub use report::{KeyboardReport, USAGE_KEY_A};
pub use request::{
    HidRequest, SetupParseError, SetupRequest, REQUEST_TYPE_CLASS, REQUEST_TYPE_MASK,
};
