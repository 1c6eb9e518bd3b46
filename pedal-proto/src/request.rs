//! USB SETUP packets and HID class request codes.

/// `bmRequestType` mask selecting the type bits (standard/class/vendor).
pub const REQUEST_TYPE_MASK: u8 = 0x60;
/// `bmRequestType` type bits for class-specific requests.
pub const REQUEST_TYPE_CLASS: u8 = 0x20;

/// HID class-specific `bRequest` codes (HID 1.11, section 7.2).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum HidRequest {
    GetReport = 0x01,
    GetIdle = 0x02,
    GetProtocol = 0x03,
    SetReport = 0x09,
    SetIdle = 0x0A,
    SetProtocol = 0x0B,
}

impl TryFrom<u8> for HidRequest {
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0x01 => Ok(Self::GetReport),
            0x02 => Ok(Self::GetIdle),
            0x03 => Ok(Self::GetProtocol),
            0x09 => Ok(Self::SetReport),
            0x0A => Ok(Self::SetIdle),
            0x0B => Ok(Self::SetProtocol),
            other => Err(other),
        }
    }
}

/// Error decoding a SETUP packet from a byte slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SetupParseError {
    /// Fewer than [`SetupRequest::SIZE`] bytes were supplied.
    Truncated,
}

/// Decoded 8-byte USB SETUP packet.
///
/// Multi-byte fields are little-endian on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SetupRequest {
    pub request_type: u8,
    pub request: u8,
    pub value: u16,
    pub index: u16,
    pub length: u16,
}

impl SetupRequest {
    /// Size of a SETUP packet in bytes.
    pub const SIZE: usize = 8;

    /// Decode a SETUP packet.
    #[must_use]
    pub const fn from_bytes(raw: &[u8; Self::SIZE]) -> Self {
        Self {
            request_type: raw[0],
            request: raw[1],
            value: u16::from_le_bytes([raw[2], raw[3]]),
            index: u16::from_le_bytes([raw[4], raw[5]]),
            length: u16::from_le_bytes([raw[6], raw[7]]),
        }
    }

    /// Decode a SETUP packet from the start of `data`.
    ///
    /// Trailing bytes are ignored.
    pub fn parse(data: &[u8]) -> Result<Self, SetupParseError> {
        let raw: &[u8; Self::SIZE] = data
            .get(..Self::SIZE)
            .and_then(|head| head.try_into().ok())
            .ok_or(SetupParseError::Truncated)?;
        Ok(Self::from_bytes(raw))
    }

    /// Check if this is a class-specific request.
    #[inline]
    #[must_use]
    pub const fn is_class(&self) -> bool {
        self.request_type & REQUEST_TYPE_MASK == REQUEST_TYPE_CLASS
    }

    /// The HID class request, if this is a class request with a known code.
    #[must_use]
    pub fn hid_request(&self) -> Option<HidRequest> {
        if !self.is_class() {
            return None;
        }
        HidRequest::try_from(self.request).ok()
    }

    /// High byte of `wValue` (report type for GET/SET_REPORT, duration for SET_IDLE).
    #[inline]
    #[must_use]
    pub const fn value_high(&self) -> u8 {
        (self.value >> 8) as u8
    }
}
