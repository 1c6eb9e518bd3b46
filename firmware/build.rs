//! Links the prebuilt V-USB driver (`libusbdrv.a`).
//!
//! V-USB is C and AVR assembly configured through `usbconfig.h`, so it is
//! built with avr-gcc outside of cargo. Point `VUSB_LIB_DIR` at the directory
//! holding the archive.

use std::env;

fn main() {
    println!("cargo:rerun-if-env-changed=VUSB_LIB_DIR");

    if env::var("CARGO_CFG_TARGET_ARCH").as_deref() != Ok("avr") {
        return;
    }

    match env::var("VUSB_LIB_DIR") {
        Ok(dir) => {
            println!("cargo:rustc-link-search=native={dir}");
            println!("cargo:rustc-link-lib=static=usbdrv");
        }
        Err(_) => {
            println!("cargo:warning=VUSB_LIB_DIR is not set; linking will fail without libusbdrv.a");
        }
    }
}
