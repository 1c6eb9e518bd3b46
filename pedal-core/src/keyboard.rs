//! Driver context: everything the main loop owns, in one place.

use embedded_hal::digital::InputPin;
use pedal_proto::{KeyboardReport, SetupRequest};

use crate::builder;
use crate::calibration::{Calibration, ClockCalibrator, FrameClock};
use crate::debounce::{DebounceCounter, InputDebouncer};
use crate::key_event::{KeyEventStateMachine, KeyState};
use crate::negotiator::ReportNegotiator;
use crate::transport::{ControlHandler, SetupReply, UsbTransport, Watchdog};

/// Busy-wait ticks while detached during forced re-enumeration.
pub const REENUMERATION_TICKS: u16 = 250;
/// Length of one re-enumeration tick in milliseconds.
pub const REENUMERATION_TICK_MS: u16 = 2;

/// The part of the device the transport calls back into: the HID report
/// state plus the oscillator it recalibrates on bus reset.
pub struct HidInterface<C> {
    negotiator: ReportNegotiator,
    calibrator: ClockCalibrator,
    clock: C,
}

impl<C: FrameClock> HidInterface<C> {
    pub fn new(clock: C, calibrator: ClockCalibrator) -> Self {
        Self {
            negotiator: ReportNegotiator::new(),
            calibrator,
            clock,
        }
    }

    #[inline]
    #[must_use]
    pub fn negotiator(&self) -> &ReportNegotiator {
        &self.negotiator
    }

    /// Outcome of the last recalibration, if a bus reset happened yet.
    #[inline]
    #[must_use]
    pub fn calibration(&self) -> Option<Calibration> {
        self.calibrator.last()
    }
}

impl<C: FrameClock> ControlHandler for HidInterface<C> {
    fn on_reset(&mut self) {
        self.calibrator.calibrate(&mut self.clock);
    }

    fn on_setup(&mut self, request: &SetupRequest) -> SetupReply<'_> {
        self.negotiator.handle_setup(request)
    }

    fn on_write(&mut self, data: &[u8]) -> usize {
        self.negotiator.on_write_data(data)
    }
}

/// Single owner of the process-wide device state.
///
/// One [`step`](Self::step) is one main-loop iteration: service the
/// transport, sample the plates, advance the key state machine and, if the
/// interrupt endpoint is free, send the pending report.
pub struct PedalKeyboard<T, A, B, C> {
    transport: T,
    hid: HidInterface<C>,
    debouncer: InputDebouncer<A, B>,
    keys: KeyEventStateMachine,
}

impl<T, A, B, C> PedalKeyboard<T, A, B, C>
where
    T: UsbTransport,
    A: InputPin,
    B: InputPin,
    C: FrameClock,
{
    /// Assemble the device. Report, idle rate, key state and dwell counter
    /// all start at zero / [`KeyState::Wait`].
    pub fn new(transport: T, plate_a: A, plate_b: B, clock: C, calibrator: ClockCalibrator) -> Self {
        Self {
            transport,
            hid: HidInterface::new(clock, calibrator),
            debouncer: InputDebouncer::new(plate_a, plate_b),
            keys: KeyEventStateMachine::new(),
        }
    }

    /// Run one main-loop iteration.
    ///
    /// Returns the report handed to the transport, if one was sent.
    pub fn step(&mut self) -> Option<KeyboardReport> {
        self.transport.poll(&mut self.hid);

        let pedal_down = self.debouncer.sample();
        self.keys.advance(pedal_down, self.debouncer.counter_mut());

        if !self.transport.interrupt_ready() {
            return None;
        }

        let symbol = self.keys.take_report()?;
        let report = builder::build(symbol);
        self.hid.negotiator.stage(report);
        self.transport.send_interrupt(self.hid.negotiator.report_bytes());
        debug!("report sent: key={}", report.key());
        Some(report)
    }

    /// Main loop. Feeds the watchdog once per iteration; if an iteration
    /// ever hangs, the watchdog restarts the device.
    pub fn run<W: Watchdog>(&mut self, watchdog: &mut W) -> ! {
        info!("pedal keyboard running");
        loop {
            watchdog.feed();
            self.step();
        }
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> KeyState {
        self.keys.state()
    }

    #[inline]
    #[must_use]
    pub fn counter(&self) -> DebounceCounter {
        self.debouncer.counter()
    }

    #[inline]
    #[must_use]
    pub fn hid(&self) -> &HidInterface<C> {
        &self.hid
    }

    #[inline]
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    #[inline]
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}

/// Make the host forget and re-enumerate the device.
///
/// Detaches, waits `REENUMERATION_TICKS * REENUMERATION_TICK_MS`
/// milliseconds while keeping the watchdog fed, then reattaches. This is the
/// only blocking wait in the firmware and runs once at startup, before
/// interrupts are enabled.
pub fn force_reenumeration<T, W, D>(transport: &mut T, watchdog: &mut W, mut delay_ms: D)
where
    T: UsbTransport + ?Sized,
    W: Watchdog + ?Sized,
    D: FnMut(u16),
{
    transport.disconnect();
    for _ in 0..REENUMERATION_TICKS {
        watchdog.feed();
        delay_ms(REENUMERATION_TICK_MS);
    }
    transport.connect();
    debug!("re-enumeration forced");
}
