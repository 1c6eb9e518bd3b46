#![no_std]
#![no_main]

use avr_device::attiny85::Peripherals;
use panic_halt as _;
use pedal_firmware::config::{CPU_HZ, PLATE_A_BIT, PLATE_B_BIT};
use pedal_firmware::{
    delay_ms, force_reenumeration, ClockCalibrator, HardwareWatchdog, Keyboard, OscillatorTrim,
    PedalKeyboard, SensePin, SoftUsb,
};
use static_cell::StaticCell;

/// Driver context. Lives for the whole program and is only touched from main.
static KEYBOARD: StaticCell<Keyboard> = StaticCell::new();

#[avr_device::entry]
fn main() -> ! {
    // SAFETY: entry runs once, nothing else has taken the peripherals.
    let dp = unsafe { Peripherals::steal() };

    let mut watchdog = HardwareWatchdog::enable(dp.WDT, &dp.CPU);

    let plate_a = SensePin::pull_up(PLATE_A_BIT);
    let plate_b = SensePin::pull_up(PLATE_B_BIT);

    let keyboard = KEYBOARD.init(PedalKeyboard::new(
        SoftUsb::init(),
        plate_a,
        plate_b,
        OscillatorTrim::new(dp.CPU),
        ClockCalibrator::for_cpu_hz(CPU_HZ),
    ));

    // The host may still hold a stale session from before the reset.
    force_reenumeration(keyboard.transport_mut(), &mut watchdog, delay_ms);

    // SAFETY: everything V-USB's interrupt touches is initialised.
    unsafe { avr_device::interrupt::enable() };

    keyboard.run(&mut watchdog)
}
