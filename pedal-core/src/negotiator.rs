//! HID class request handling for the keyboard interface.

use pedal_proto::{HidRequest, KeyboardReport, SetupRequest};

use crate::transport::SetupReply;

/// Only accepted SET_REPORT payload length: one byte of LED state.
const LED_REPORT_LEN: u16 = 1;

/// Owns the report buffer and idle rate the host can query.
///
/// The transport reads from the buffer for interrupt transfers and for
/// GET_REPORT, so both live here rather than in the state machine.
#[derive(Debug, Default)]
pub struct ReportNegotiator {
    report: KeyboardReport,
    idle_rate: u8,
}

impl ReportNegotiator {
    /// Zeroed report and idle rate.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            report: KeyboardReport::empty(),
            idle_rate: 0,
        }
    }

    /// Replace the report buffer with the next report to transmit.
    pub fn stage(&mut self, report: KeyboardReport) {
        self.report = report;
    }

    /// Current contents of the report buffer.
    #[inline]
    #[must_use]
    pub fn report(&self) -> &KeyboardReport {
        &self.report
    }

    /// Current report buffer as wire bytes.
    #[inline]
    #[must_use]
    pub fn report_bytes(&self) -> &[u8] {
        self.report.bytes()
    }

    /// Stored idle rate.
    #[inline]
    #[must_use]
    pub fn idle_rate(&self) -> u8 {
        self.idle_rate
    }

    /// GET_REPORT: always answers "no key pressed".
    ///
    /// Clears the modifier byte and the first keycode in the shared buffer
    /// before handing it out, independent of the key state machine.
    pub fn on_get_report(&mut self) -> &[u8] {
        self.report.modifier = 0;
        self.report.keycodes[0] = 0;
        self.report.bytes()
    }

    /// SET_REPORT: accept a 1-byte LED report, reject any other length.
    ///
    /// Returns the number of bytes the host may send in the data stage.
    pub fn on_set_report(&mut self, expected_len: u16) -> u16 {
        if expected_len == LED_REPORT_LEN {
            LED_REPORT_LEN
        } else {
            warn!("rejecting SET_REPORT of {} bytes", expected_len);
            0
        }
    }

    /// GET_IDLE: echo the stored idle rate.
    #[inline]
    #[must_use]
    pub fn on_get_idle(&self) -> u8 {
        self.idle_rate
    }

    /// SET_IDLE: store the rate verbatim.
    pub fn on_set_idle(&mut self, rate: u8) {
        self.idle_rate = rate;
    }

    /// SET_REPORT data stage. LED state is not modelled, so the payload is
    /// dropped and reported as fully consumed.
    pub fn on_write_data(&mut self, data: &[u8]) -> usize {
        trace!("led report dropped ({} bytes)", data.len());
        data.len()
    }

    /// Dispatch a SETUP packet addressed to the HID interface.
    ///
    /// Non-class requests and class requests other than GET/SET_REPORT and
    /// GET/SET_IDLE get an empty reply.
    pub fn handle_setup(&mut self, request: &SetupRequest) -> SetupReply<'_> {
        let Some(hid_request) = request.hid_request() else {
            if request.is_class() {
                debug!("unhandled class request {}", request.request);
            }
            return SetupReply::Empty;
        };

        match hid_request {
            HidRequest::GetReport => SetupReply::Data(self.on_get_report()),
            HidRequest::SetReport => match self.on_set_report(request.length) {
                0 => SetupReply::Empty,
                _ => SetupReply::ReceiveData,
            },
            HidRequest::GetIdle => SetupReply::Data(core::slice::from_ref(&self.idle_rate)),
            HidRequest::SetIdle => {
                self.on_set_idle(request.value_high());
                SetupReply::Empty
            }
            HidRequest::GetProtocol | HidRequest::SetProtocol => SetupReply::Empty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{build, PEDAL_SYMBOL};

    fn class_in(request: HidRequest, value: u16, length: u16) -> SetupRequest {
        SetupRequest {
            request_type: 0xA1,
            request: request as u8,
            value,
            index: 0,
            length,
        }
    }

    fn class_out(request: HidRequest, value: u16, length: u16) -> SetupRequest {
        SetupRequest {
            request_type: 0x21,
            ..class_in(request, value, length)
        }
    }

    #[test]
    fn test_starts_zeroed() {
        let negotiator = ReportNegotiator::new();
        assert!(negotiator.report().is_empty());
        assert_eq!(negotiator.idle_rate(), 0);
    }

    #[test]
    fn test_get_report_always_reports_no_key() {
        let mut negotiator = ReportNegotiator::new();
        negotiator.stage(build(PEDAL_SYMBOL));
        assert_eq!(negotiator.report().key(), 0x1B);

        let bytes = negotiator.on_get_report();
        assert_eq!(bytes, &[0u8; 8]);
        // The shared buffer itself is cleared.
        assert!(negotiator.report().is_empty());
    }

    #[test]
    fn test_get_report_clears_modifier() {
        let mut negotiator = ReportNegotiator::new();
        negotiator.stage(KeyboardReport {
            modifier: 0x02,
            ..KeyboardReport::single(0x04)
        });
        let bytes = negotiator.on_get_report();
        assert_eq!(bytes[0], 0);
        assert_eq!(bytes[2], 0);
    }

    #[test]
    fn test_set_report_length() {
        let mut negotiator = ReportNegotiator::new();
        assert_eq!(negotiator.on_set_report(1), 1);
        assert_eq!(negotiator.on_set_report(0), 0);
        assert_eq!(negotiator.on_set_report(2), 0);
        assert_eq!(negotiator.on_set_report(8), 0);
    }

    #[test]
    fn test_idle_roundtrip() {
        let mut negotiator = ReportNegotiator::new();
        negotiator.on_set_idle(0x7D);
        assert_eq!(negotiator.on_get_idle(), 0x7D);
    }

    #[test]
    fn test_write_data_consumes_everything() {
        let mut negotiator = ReportNegotiator::new();
        assert_eq!(negotiator.on_write_data(&[0x02]), 1);
        assert_eq!(negotiator.on_write_data(&[1, 2, 3]), 3);
        assert_eq!(negotiator.on_write_data(&[]), 0);
        assert!(negotiator.report().is_empty());
    }

    #[test]
    fn test_setup_get_report() {
        let mut negotiator = ReportNegotiator::new();
        negotiator.stage(build(b'a'));
        let reply = negotiator.handle_setup(&class_in(HidRequest::GetReport, 0x0100, 8));
        assert_eq!(reply, SetupReply::Data(&[0u8; 8]));
    }

    #[test]
    fn test_setup_set_report() {
        let mut negotiator = ReportNegotiator::new();
        let led = class_out(HidRequest::SetReport, 0x0200, 1);
        assert_eq!(negotiator.handle_setup(&led), SetupReply::ReceiveData);

        let oversized = class_out(HidRequest::SetReport, 0x0200, 2);
        assert_eq!(negotiator.handle_setup(&oversized), SetupReply::Empty);
    }

    #[test]
    fn test_setup_idle_uses_value_high_byte() {
        let mut negotiator = ReportNegotiator::new();
        let set = class_out(HidRequest::SetIdle, 0x7D00, 0);
        assert_eq!(negotiator.handle_setup(&set), SetupReply::Empty);
        assert_eq!(negotiator.idle_rate(), 0x7D);

        let get = class_in(HidRequest::GetIdle, 0, 1);
        assert_eq!(negotiator.handle_setup(&get), SetupReply::Data(&[0x7D]));
    }

    #[test]
    fn test_setup_protocol_requests_are_empty() {
        let mut negotiator = ReportNegotiator::new();
        let get = class_in(HidRequest::GetProtocol, 0, 1);
        assert_eq!(negotiator.handle_setup(&get), SetupReply::Empty);
        let set = class_out(HidRequest::SetProtocol, 1, 0);
        assert_eq!(negotiator.handle_setup(&set), SetupReply::Empty);
    }

    #[test]
    fn test_setup_non_class_is_empty() {
        let mut negotiator = ReportNegotiator::new();
        negotiator.stage(build(b'x'));
        // Standard request sharing the GET_REPORT code.
        let standard = SetupRequest {
            request_type: 0x80,
            ..class_in(HidRequest::GetReport, 0, 8)
        };
        assert_eq!(negotiator.handle_setup(&standard), SetupReply::Empty);
        // Buffer untouched.
        assert_eq!(negotiator.report().key(), 0x1B);
    }

    #[test]
    fn test_setup_unknown_class_code_is_empty() {
        let mut negotiator = ReportNegotiator::new();
        let request = SetupRequest {
            request_type: 0x21,
            request: 0x42,
            value: 0,
            index: 0,
            length: 0,
        };
        assert_eq!(negotiator.handle_setup(&request), SetupReply::Empty);
    }
}
