//! Bindings to the V-USB software USB driver.
//!
//! V-USB calls back into the application through fixed C symbols
//! (`usbFunctionSetup`, `usbFunctionWrite` and the reset hook). All of them
//! run synchronously inside `usbPoll()`, so [`SoftUsb::poll`] lends the
//! handler to a slot for exactly the duration of that call and the exported
//! trampolines forward to it.
//!
//! `usbconfig.h` must enable `USB_CFG_IMPLEMENT_FN_WRITE` and route the reset
//! hook to the exported function:
//!
//! ```c
//! #define USB_RESET_HOOK(resetStarts) if(!resetStarts){hadUsbReset();}
//! ```

#![allow(non_snake_case, non_upper_case_globals)]

use core::cell::Cell;
use core::ptr::{self, NonNull};

use avr_device::attiny85::CPU;
use pedal_core::{ControlHandler, FrameClock, SetupReply, SetupRequest, UsbTransport};
use pedal_proto::{REPORT_DESCRIPTOR, REPORT_DESCRIPTOR_LEN};

use crate::board;
use crate::config::USB_DMINUS_BIT;

/// `usbFunctionSetup` return value: data stage goes to `usbFunctionWrite`.
const USB_NO_MSG: u8 = 0xFF;
/// `usbFunctionWrite` return value: transfer complete.
const WRITE_DONE: u8 = 1;
/// Bit of the endpoint 1 `len` byte set while it holds a NAK, i.e. is free.
const TX_READY_FLAG: u8 = 0x10;
/// `USB_BUFSIZE` in `usbdrv.h`: 8 data bytes plus PID and CRC.
const USB_BUFSIZE: usize = 11;

mod ffi {
    use super::USB_BUFSIZE;

    /// `usbTxStatus_t`. `usbInterruptIsReady()` is a macro over its `len`.
    #[repr(C)]
    pub struct UsbTxStatus {
        pub len: u8,
        pub buffer: [u8; USB_BUFSIZE],
    }

    extern "C" {
        pub fn usbInit();
        pub fn usbPoll();
        pub fn usbSetInterrupt(data: *mut u8, len: u8);
        pub fn usbMeasureFrameLength() -> u16;

        pub static mut usbTxStatus1: UsbTxStatus;
        pub static mut usbMsgPtr: *const u8;
    }
}

const _: () = assert!(core::mem::offset_of!(ffi::UsbTxStatus, len) == 0);
const _: () = assert!(core::mem::size_of::<ffi::UsbTxStatus>() == 1 + USB_BUFSIZE);

/// HID report descriptor served by the driver from flash.
///
/// `USB_CFG_HID_REPORT_DESCRIPTOR_LENGTH` in `usbconfig.h` must equal
/// [`REPORT_DESCRIPTOR_LEN`].
#[no_mangle]
#[link_section = ".progmem.data"]
pub static usbDescriptorHidReport: [u8; REPORT_DESCRIPTOR_LEN] = REPORT_DESCRIPTOR;

struct HandlerSlot(Cell<Option<NonNull<dyn ControlHandler>>>);

// SAFETY: single core, and the slot is only touched from the main context:
// by `SoftUsb::poll` and by the callbacks `usbPoll` makes from inside it.
unsafe impl Sync for HandlerSlot {}

static HANDLER: HandlerSlot = HandlerSlot(Cell::new(None));

fn with_handler<R>(fallback: R, f: impl FnOnce(&mut dyn ControlHandler) -> R) -> R {
    match HANDLER.0.get() {
        // SAFETY: only set while `SoftUsb::poll` holds the unique borrow.
        Some(mut handler) => f(unsafe { handler.as_mut() }),
        None => fallback,
    }
}

/// Software USB transport backed by V-USB.
pub struct SoftUsb {
    _private: (),
}

impl SoftUsb {
    /// Initialise the driver. Interrupts must still be disabled.
    pub fn init() -> Self {
        unsafe { ffi::usbInit() };
        Self { _private: () }
    }
}

impl UsbTransport for SoftUsb {
    fn poll(&mut self, handler: &mut dyn ControlHandler) {
        let handler: NonNull<dyn ControlHandler + '_> = NonNull::from(handler);
        // SAFETY: the erased lifetime never escapes; the slot is cleared
        // before the borrow ends.
        let handler: NonNull<dyn ControlHandler + 'static> = unsafe { core::mem::transmute(handler) };

        HANDLER.0.set(Some(handler));
        unsafe { ffi::usbPoll() };
        HANDLER.0.set(None);
    }

    fn interrupt_ready(&self) -> bool {
        // Written from the USB interrupt.
        let tx_len = unsafe { ptr::read_volatile(ptr::addr_of!(ffi::usbTxStatus1.len)) };
        tx_len & TX_READY_FLAG != 0
    }

    fn send_interrupt(&mut self, data: &[u8]) {
        // V-USB copies the payload into its own buffer.
        unsafe { ffi::usbSetInterrupt(data.as_ptr().cast_mut(), data.len() as u8) };
    }

    fn disconnect(&mut self) {
        board::set_direction(USB_DMINUS_BIT, true);
    }

    fn connect(&mut self) {
        board::set_direction(USB_DMINUS_BIT, false);
    }
}

/// OSCCAL register plus V-USB's frame-length measurement.
pub struct OscillatorTrim {
    cpu: CPU,
}

impl OscillatorTrim {
    pub fn new(cpu: CPU) -> Self {
        Self { cpu }
    }
}

impl FrameClock for OscillatorTrim {
    fn set_trim(&mut self, trim: u8) {
        self.cpu.osccal.write(|w| unsafe { w.bits(trim) });
    }

    fn measure_frame_length(&mut self) -> u16 {
        avr_device::interrupt::free(|_| unsafe { ffi::usbMeasureFrameLength() })
    }
}

#[no_mangle]
pub extern "C" fn usbFunctionSetup(data: *mut u8) -> u8 {
    // SAFETY: V-USB passes its 8-byte SETUP buffer.
    let packet = unsafe { core::slice::from_raw_parts(data.cast_const(), SetupRequest::SIZE) };

    with_handler(0, |handler| match handler.on_setup_packet(packet) {
        SetupReply::Data(bytes) => {
            unsafe { ptr::addr_of_mut!(ffi::usbMsgPtr).write(bytes.as_ptr()) };
            bytes.len().min(USB_NO_MSG as usize - 1) as u8
        }
        SetupReply::ReceiveData => USB_NO_MSG,
        SetupReply::Empty => 0,
    })
}

#[no_mangle]
pub extern "C" fn usbFunctionWrite(data: *mut u8, len: u8) -> u8 {
    // SAFETY: V-USB passes a buffer of `len` received bytes.
    let payload = unsafe { core::slice::from_raw_parts(data.cast_const(), len as usize) };

    with_handler(WRITE_DONE, |handler| {
        if handler.on_write(payload) >= payload.len() {
            WRITE_DONE
        } else {
            USB_NO_MSG
        }
    })
}

#[no_mangle]
pub extern "C" fn hadUsbReset() {
    with_handler((), |handler| handler.on_reset());
}
