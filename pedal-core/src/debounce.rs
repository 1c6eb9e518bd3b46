//! Pedal sense lines and the dwell counter.
//!
//! The pedal is two contact plates, each pulled up and shorted to ground by
//! the foot. Plate A alone means "pressed"; plate B bridged as well means
//! the foot is resting across both, which does not count.

use embedded_hal::digital::InputPin;

/// Consecutive iterations a level must persist before the state machine
/// acts on it. Also the counter's saturation point.
pub const DWELL_ITERATIONS: u8 = u8::MAX;

/// Saturating loop-iteration counter since the last consumed transition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DebounceCounter(u8);

impl DebounceCounter {
    #[must_use]
    pub const fn new() -> Self {
        Self(0)
    }

    #[inline]
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Count one iteration, sticking at [`DWELL_ITERATIONS`].
    #[inline]
    pub fn tick(&mut self) {
        self.0 = self.0.saturating_add(1);
    }

    #[inline]
    pub fn reset(&mut self) {
        self.0 = 0;
    }

    /// Check if the dwell time has fully elapsed.
    #[inline]
    #[must_use]
    pub const fn is_settled(self) -> bool {
        self.0 == DWELL_ITERATIONS
    }
}

/// Samples the two plates once per loop iteration.
///
/// Counts iterations but never resets the counter itself; that is left to
/// the consumer of the signal, on the transitions it acts on.
pub struct InputDebouncer<A, B> {
    plate_a: A,
    plate_b: B,
    counter: DebounceCounter,
}

impl<A: InputPin, B: InputPin> InputDebouncer<A, B> {
    /// Wrap two sense lines, already configured as pulled-up inputs.
    pub fn new(plate_a: A, plate_b: B) -> Self {
        Self {
            plate_a,
            plate_b,
            counter: DebounceCounter::new(),
        }
    }

    /// Read both plates and count the iteration.
    ///
    /// Returns `true` when plate A is bridged and plate B is not.
    pub fn sample(&mut self) -> bool {
        self.counter.tick();
        let a = is_active(&mut self.plate_a);
        let b = is_active(&mut self.plate_b);
        a && !b
    }

    #[inline]
    #[must_use]
    pub fn counter(&self) -> DebounceCounter {
        self.counter
    }

    #[inline]
    pub fn counter_mut(&mut self) -> &mut DebounceCounter {
        &mut self.counter
    }
}

/// A line is active when pulled low. Read errors count as inactive.
fn is_active<P: InputPin>(pin: &mut P) -> bool {
    matches!(pin.is_low(), Ok(true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FaultyPin, MockPin};

    #[test]
    fn test_counter_saturates() {
        let mut counter = DebounceCounter::new();
        for _ in 0..1000 {
            counter.tick();
            assert!(counter.get() <= DWELL_ITERATIONS);
        }
        assert_eq!(counter.get(), 255);
        assert!(counter.is_settled());
        counter.reset();
        assert_eq!(counter.get(), 0);
        assert!(!counter.is_settled());
    }

    #[test]
    fn test_truth_table() {
        let (a, a_ctl) = MockPin::released();
        let (b, b_ctl) = MockPin::released();
        let mut debouncer = InputDebouncer::new(a, b);

        // (A low, B low) -> pedal down?
        let cases = [
            (false, false, false),
            (true, false, true),
            (false, true, false),
            (true, true, false),
        ];
        for (a_low, b_low, expected) in cases {
            a_ctl.set(a_low);
            b_ctl.set(b_low);
            assert_eq!(debouncer.sample(), expected, "A={} B={}", a_low, b_low);
        }
    }

    #[test]
    fn test_sample_counts_iterations() {
        let (a, _a_ctl) = MockPin::released();
        let (b, _b_ctl) = MockPin::released();
        let mut debouncer = InputDebouncer::new(a, b);

        for n in 1..=10u8 {
            debouncer.sample();
            assert_eq!(debouncer.counter().get(), n);
        }
    }

    #[test]
    fn test_sample_never_resets_counter() {
        let (a, a_ctl) = MockPin::released();
        let (b, _b_ctl) = MockPin::released();
        let mut debouncer = InputDebouncer::new(a, b);

        for i in 0..600 {
            a_ctl.set(i % 3 == 0);
            debouncer.sample();
        }
        assert_eq!(debouncer.counter().get(), 255);
    }

    #[test]
    fn test_read_error_is_inactive() {
        let (b, _b_ctl) = MockPin::released();
        let mut debouncer = InputDebouncer::new(FaultyPin, b);
        assert!(!debouncer.sample());

        let (a, _a_ctl) = MockPin::pressed();
        let mut debouncer = InputDebouncer::new(a, FaultyPin);
        assert!(debouncer.sample());
    }
}
