//! ATtiny85 bring-up: sense lines, watchdog, busy-wait.

use core::convert::Infallible;

use avr_device::attiny85::{CPU, PORTB, WDT};
use embedded_hal::digital::{ErrorType, InputPin};
use pedal_core::Watchdog;

use crate::config::{CPU_HZ, WATCHDOG_1S};

/// MCUSR watchdog reset flag.
const WDRF: u8 = 1 << 3;
/// WDTCR change enable.
const WDCE: u8 = 1 << 4;
/// WDTCR system reset enable.
const WDE: u8 = 1 << 3;

const CYCLES_PER_MS: u32 = CPU_HZ / 1000;

fn portb() -> &'static avr_device::attiny85::portb::RegisterBlock {
    // SAFETY: memory-mapped I/O, always valid. Callers only do single-byte
    // read-modify-writes from the main context.
    unsafe { &*PORTB::ptr() }
}

/// Set a PORTB line as output (`true`) or input (`false`).
pub(crate) fn set_direction(bit: u8, output: bool) {
    portb().ddrb.modify(|r, w| {
        let bits = if output {
            r.bits() | (1 << bit)
        } else {
            r.bits() & !(1 << bit)
        };
        unsafe { w.bits(bits) }
    });
}

/// One pedal plate on PORTB, read as an active-low input.
pub struct SensePin {
    mask: u8,
}

impl SensePin {
    /// Configure `bit` as an input with the internal pull-up enabled.
    pub fn pull_up(bit: u8) -> Self {
        set_direction(bit, false);
        portb()
            .portb
            .modify(|r, w| unsafe { w.bits(r.bits() | (1 << bit)) });
        Self { mask: 1 << bit }
    }
}

impl ErrorType for SensePin {
    type Error = Infallible;
}

impl InputPin for SensePin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(portb().pinb.read().bits() & self.mask != 0)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(portb().pinb.read().bits() & self.mask == 0)
    }
}

/// Hardware watchdog armed at ~1 s.
pub struct HardwareWatchdog {
    _wdt: WDT,
}

impl HardwareWatchdog {
    /// Clear a pending watchdog reset flag and arm the watchdog.
    ///
    /// After a watchdog reset the ATtiny85 keeps WDE forced on until WDRF
    /// is cleared, so this has to happen before the timeout is changed.
    pub fn enable(wdt: WDT, cpu: &CPU) -> Self {
        cpu.mcusr.modify(|r, w| unsafe { w.bits(r.bits() & !WDRF) });

        // Timed sequence: the second write must follow within 4 cycles.
        avr_device::interrupt::free(|_| {
            avr_device::asm::wdr();
            wdt.wdtcr.write(|w| unsafe { w.bits(WDCE | WDE) });
            wdt.wdtcr.write(|w| unsafe { w.bits(WDE | WATCHDOG_1S) });
        });

        Self { _wdt: wdt }
    }
}

impl Watchdog for HardwareWatchdog {
    #[inline]
    fn feed(&mut self) {
        avr_device::asm::wdr();
    }
}

/// Busy-wait delay in milliseconds.
///
/// Only used for the re-enumeration pause at startup.
pub fn delay_ms(ms: u16) {
    for _ in 0..ms {
        avr_device::asm::delay_cycles(CYCLES_PER_MS);
    }
}
