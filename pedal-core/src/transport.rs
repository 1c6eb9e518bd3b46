//! Seams to the external USB transport and the watchdog.

use pedal_proto::SetupRequest;

/// Answer to a SETUP packet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SetupReply<'a> {
    /// Send these bytes in the IN data stage. The slice must stay valid
    /// until the transfer completes, so it points into handler-owned state.
    Data(&'a [u8]),
    /// Accept an OUT data stage; the payload arrives via
    /// [`ControlHandler::on_write`].
    ReceiveData,
    /// Zero-length reply.
    Empty,
}

/// Callback surface the transport invokes while it is being polled.
///
/// The transport never keeps the handler beyond a single
/// [`UsbTransport::poll`] call, and never invokes two callbacks at once.
pub trait ControlHandler {
    /// The bus left reset; the oscillator must be recalibrated before the
    /// transport can talk to the host again.
    fn on_reset(&mut self);

    /// A SETUP packet arrived on the control endpoint.
    fn on_setup(&mut self, request: &SetupRequest) -> SetupReply<'_>;

    /// A SETUP packet arrived as raw bus bytes.
    ///
    /// Decodes it and forwards to [`on_setup`](Self::on_setup). A packet
    /// shorter than [`SetupRequest::SIZE`] gets an empty reply.
    fn on_setup_packet(&mut self, packet: &[u8]) -> SetupReply<'_> {
        match SetupRequest::parse(packet) {
            Ok(request) => self.on_setup(&request),
            Err(err) => {
                warn!("dropping SETUP packet: {}", err);
                SetupReply::Empty
            }
        }
    }

    /// OUT data stage following a [`SetupReply::ReceiveData`].
    ///
    /// Returns the number of bytes consumed.
    fn on_write(&mut self, data: &[u8]) -> usize;
}

/// Software USB transport.
///
/// Bit-level signaling, enumeration and retries all happen behind this
/// trait; the core only drives it from the main loop.
pub trait UsbTransport {
    /// Process pending bus events, invoking `handler` synchronously.
    fn poll(&mut self, handler: &mut dyn ControlHandler);

    /// Check if the interrupt IN endpoint can take another report.
    fn interrupt_ready(&self) -> bool;

    /// Queue a report on the interrupt IN endpoint.
    ///
    /// Only called after [`interrupt_ready`](Self::interrupt_ready) returned
    /// `true`. The transport copies the bytes.
    fn send_interrupt(&mut self, data: &[u8]);

    /// Drop off the bus so the host forgets the device.
    fn disconnect(&mut self);

    /// Reattach to the bus.
    fn connect(&mut self);
}

/// Hardware watchdog that restarts the device unless fed in time.
pub trait Watchdog {
    /// Restart the timeout window.
    fn feed(&mut self);
}
