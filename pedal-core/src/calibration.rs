//! Internal RC oscillator calibration against USB frame timing.
//!
//! Without a crystal the CPU clock drifts too far for the software USB
//! transport to keep bit timing. After every bus reset the host starts
//! sending start-of-frame packets exactly 1 ms apart; the transport can count
//! how many of its 7-cycle loop iterations fit between two of them. Tuning the
//! oscillator trim register until that count matches the nominal value for
//! the declared CPU frequency brings the clock back into tolerance.
//!
//! The trim register has two overlapping frequency ranges (values 0-127 and
//! 128-255). Each range is binary-searched separately and the closest trial
//! of both searches is committed.

/// Loop iterations per 1 ms frame at the 10.5 MHz reference clock.
const NOMINAL_FRAME_LOOPS: u64 = 1499;
/// Reference clock the nominal frame length was taken at.
const REFERENCE_CLOCK_HZ: u64 = 10_500_000;

/// Start value of each trim range.
const REGION_BASES: [u8; 2] = [0, 128];
/// First binary search step; halves down to 1.
const FIRST_STEP: u8 = 64;

/// Measurements taken per range.
pub const MEASUREMENTS_PER_REGION: u8 = 7;
/// Measurements taken per calibration run.
pub const MEASUREMENTS_PER_RUN: u8 = MEASUREMENTS_PER_REGION * REGION_BASES.len() as u8;

/// Expected frame length, in measurement loop iterations, for a CPU running
/// at `cpu_hz`. Rounded to the nearest integer.
#[must_use]
pub const fn target_frame_length(cpu_hz: u32) -> u16 {
    let loops = (NOMINAL_FRAME_LOOPS * cpu_hz as u64 + REFERENCE_CLOCK_HZ / 2) / REFERENCE_CLOCK_HZ;
    if loops > u16::MAX as u64 {
        u16::MAX
    } else {
        loops as u16
    }
}

/// Hardware primitives the calibration needs.
///
/// Implemented by the firmware on top of the oscillator trim register and the
/// transport's frame-length measurement routine.
pub trait FrameClock {
    /// Write a value to the oscillator trim register.
    fn set_trim(&mut self, trim: u8);

    /// Block until the next two frame markers and return the number of
    /// measurement loop iterations between them.
    fn measure_frame_length(&mut self) -> u16;
}

/// Outcome of one calibration run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Calibration {
    /// Trim value committed to the register.
    pub trim: u8,
    /// Frame length measured with that trim.
    pub frame_length: u16,
    /// Absolute distance from the target frame length.
    pub deviation: u16,
    /// Number of measurements taken.
    pub measurements: u8,
}

#[derive(Clone, Copy)]
struct Trial {
    trim: u8,
    frame_length: u16,
    deviation: u16,
}

/// Binary-search calibrator for the oscillator trim register.
#[derive(Debug)]
pub struct ClockCalibrator {
    target: u16,
    last: Option<Calibration>,
}

impl ClockCalibrator {
    /// Create a calibrator aiming at an explicit frame length.
    #[must_use]
    pub const fn new(target: u16) -> Self {
        Self { target, last: None }
    }

    /// Create a calibrator for a CPU declared to run at `cpu_hz`.
    #[must_use]
    pub const fn for_cpu_hz(cpu_hz: u32) -> Self {
        Self::new(target_frame_length(cpu_hz))
    }

    /// Target frame length in measurement loop iterations.
    #[inline]
    #[must_use]
    pub const fn target(&self) -> u16 {
        self.target
    }

    /// Result of the most recent run, if any.
    #[inline]
    #[must_use]
    pub const fn last(&self) -> Option<Calibration> {
        self.last
    }

    /// Search both trim ranges and commit the closest trial.
    ///
    /// Always takes [`MEASUREMENTS_PER_RUN`] measurements and always leaves
    /// the register holding one of the measured trial values. The first
    /// trial seeds the best-so-far unconditionally; later trials replace it
    /// only when strictly closer to the target.
    pub fn calibrate<C: FrameClock + ?Sized>(&mut self, clock: &mut C) -> Calibration {
        let mut best = Trial {
            trim: REGION_BASES[0],
            frame_length: 0,
            deviation: u16::MAX,
        };
        let mut seeded = false;
        let mut measurements = 0u8;

        for base in REGION_BASES {
            let mut trim = base;
            let mut frame_length = 0u16;
            let mut step = FIRST_STEP;

            while step > 0 {
                trim = if frame_length < self.target {
                    trim.wrapping_add(step) // clock too slow
                } else {
                    trim.wrapping_sub(step) // clock too fast
                };

                clock.set_trim(trim);
                frame_length = clock.measure_frame_length();
                measurements += 1;

                let deviation = frame_length.abs_diff(self.target);
                trace!("osc trial trim={} len={} dev={}", trim, frame_length, deviation);

                if !seeded || deviation < best.deviation {
                    best = Trial {
                        trim,
                        frame_length,
                        deviation,
                    };
                    seeded = true;
                }

                step >>= 1;
            }
        }

        clock.set_trim(best.trim);

        let calibration = Calibration {
            trim: best.trim,
            frame_length: best.frame_length,
            deviation: best.deviation,
            measurements,
        };
        info!(
            "oscillator calibrated: trim={} len={} target={}",
            calibration.trim,
            calibration.frame_length,
            self.target
        );
        self.last = Some(calibration);
        calibration
    }
}
