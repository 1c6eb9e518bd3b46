//! Host-side doubles for pins, transport, oscillator and watchdog.

extern crate std;

use core::cell::Cell;
use core::convert::Infallible;
use std::collections::VecDeque;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::digital::{ErrorKind, ErrorType, InputPin};
use pedal_proto::SetupRequest;

use crate::calibration::FrameClock;
use crate::transport::{ControlHandler, SetupReply, UsbTransport, Watchdog};

/// Input pin whose level is driven from the test through a shared cell.
pub struct MockPin {
    low: Rc<Cell<bool>>,
}

impl MockPin {
    /// Pin reading high (plate not bridged), plus its control handle.
    pub fn released() -> (Self, Rc<Cell<bool>>) {
        let low = Rc::new(Cell::new(false));
        (Self { low: low.clone() }, low)
    }

    /// Pin reading low (plate bridged), plus its control handle.
    pub fn pressed() -> (Self, Rc<Cell<bool>>) {
        let (pin, low) = Self::released();
        low.set(true);
        (pin, low)
    }
}

impl ErrorType for MockPin {
    type Error = Infallible;
}

impl InputPin for MockPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.low.get())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.low.get())
    }
}

/// Input pin that fails every read.
pub struct FaultyPin;

impl ErrorType for FaultyPin {
    type Error = ErrorKind;
}

impl InputPin for FaultyPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Err(ErrorKind::Other)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Err(ErrorKind::Other)
    }
}

/// Bus event queued for the next poll.
pub enum BusEvent {
    Reset,
    Setup(SetupRequest),
    /// SETUP packet delivered as raw bus bytes.
    Packet(Vec<u8>),
    Write(Vec<u8>),
}

/// Owned copy of a handler answer.
#[derive(Debug, PartialEq, Eq)]
pub enum Answer {
    Data(Vec<u8>),
    ReceiveData,
    Empty,
    Consumed(usize),
}

impl From<SetupReply<'_>> for Answer {
    fn from(reply: SetupReply<'_>) -> Self {
        match reply {
            SetupReply::Data(bytes) => Answer::Data(bytes.to_vec()),
            SetupReply::ReceiveData => Answer::ReceiveData,
            SetupReply::Empty => Answer::Empty,
        }
    }
}

/// Transport that replays queued bus events and records what it was given.
#[derive(Default)]
pub struct MockTransport {
    pub ready: bool,
    pub connected: bool,
    pub events: VecDeque<BusEvent>,
    pub answers: Vec<Answer>,
    pub sent: Vec<Vec<u8>>,
    pub log: Vec<&'static str>,
}

impl MockTransport {
    pub fn ready() -> Self {
        Self {
            ready: true,
            connected: true,
            ..Self::default()
        }
    }

    pub fn push(&mut self, event: BusEvent) {
        self.events.push_back(event);
    }
}

impl UsbTransport for MockTransport {
    fn poll(&mut self, handler: &mut dyn ControlHandler) {
        while let Some(event) = self.events.pop_front() {
            let answer = match event {
                BusEvent::Reset => {
                    handler.on_reset();
                    continue;
                }
                BusEvent::Setup(request) => Answer::from(handler.on_setup(&request)),
                BusEvent::Packet(raw) => Answer::from(handler.on_setup_packet(&raw)),
                BusEvent::Write(data) => Answer::Consumed(handler.on_write(&data)),
            };
            self.answers.push(answer);
        }
    }

    fn interrupt_ready(&self) -> bool {
        self.ready
    }

    fn send_interrupt(&mut self, data: &[u8]) {
        self.sent.push(data.to_vec());
    }

    fn disconnect(&mut self) {
        self.connected = false;
        self.log.push("disconnect");
    }

    fn connect(&mut self) {
        self.connected = true;
        self.log.push("connect");
    }
}

/// Oscillator whose frame length grows linearly with the trim value.
pub struct MockClock {
    pub trim: u8,
    pub measurements: usize,
}

impl MockClock {
    pub fn new() -> Self {
        Self {
            trim: 0,
            measurements: 0,
        }
    }
}

impl FrameClock for MockClock {
    fn set_trim(&mut self, trim: u8) {
        self.trim = trim;
    }

    fn measure_frame_length(&mut self) -> u16 {
        self.measurements += 1;
        1200 + 8 * self.trim as u16
    }
}

/// Watchdog that counts feeds.
#[derive(Default)]
pub struct MockWatchdog {
    pub feeds: usize,
}

impl Watchdog for MockWatchdog {
    fn feed(&mut self) {
        self.feeds += 1;
    }
}
