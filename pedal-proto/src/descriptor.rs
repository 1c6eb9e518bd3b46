//! HID report descriptor.

/// Length of [`REPORT_DESCRIPTOR`] in bytes.
///
/// The transport's configuration descriptor advertises this value as
/// `wDescriptorLength`, so it must stay in sync with the table.
pub const REPORT_DESCRIPTOR_LEN: usize = 63;

/// Boot-compatible keyboard report descriptor.
///
/// Describes an 8-byte input report (modifier bitmap, reserved byte, six
/// keycodes) and a 1-byte LED output report. Host HID parsers decode this
/// table byte for byte, so it must not be reordered.
pub const REPORT_DESCRIPTOR: [u8; REPORT_DESCRIPTOR_LEN] = [
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x06, // Usage (Keyboard)
    0xA1, 0x01, // Collection (Application)
    //
    // --- Modifier byte ---
    0x75, 0x01, //   Report Size (1)
    0x95, 0x08, //   Report Count (8)
    0x05, 0x07, //   Usage Page (Key Codes)
    0x19, 0xE0, //   Usage Minimum (224) - LeftControl
    0x29, 0xE7, //   Usage Maximum (231) - Right GUI
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x01, //   Logical Maximum (1)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    //
    // --- Reserved byte ---
    0x95, 0x01, //   Report Count (1)
    0x75, 0x08, //   Report Size (8)
    0x81, 0x03, //   Input (Constant, Variable, Absolute)
    //
    // --- LED output (5 bits) ---
    0x95, 0x05, //   Report Count (5)
    0x75, 0x01, //   Report Size (1)
    0x05, 0x08, //   Usage Page (LEDs)
    0x19, 0x01, //   Usage Minimum (Num Lock)
    0x29, 0x05, //   Usage Maximum (Kana)
    0x91, 0x02, //   Output (Data, Variable, Absolute)
    //
    // --- LED padding (3 bits) ---
    0x95, 0x01, //   Report Count (1)
    0x75, 0x03, //   Report Size (3)
    0x91, 0x03, //   Output (Constant, Variable, Absolute)
    //
    // --- Keycode array ---
    0x95, 0x06, //   Report Count (6)
    0x75, 0x08, //   Report Size (8)
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x65, //   Logical Maximum (101)
    0x05, 0x07, //   Usage Page (Key Codes)
    0x19, 0x00, //   Usage Minimum (0)
    0x29, 0x65, //   Usage Maximum (101) - Keyboard Application
    0x81, 0x00, //   Input (Data, Array, Absolute)
    //
    0xC0, // End Collection
];
