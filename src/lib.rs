//! ESP32 system identity and restart support: factory MAC handling with
//! eFuse integrity checking, per-interface MAC derivation, and the no-OS
//! restart sequence. Hardware access goes through the traits in [`hal`] so
//! everything is testable against a mock register layer.
#![cfg_attr(not(test), no_std)]

#[macro_export]
macro_rules! mk_static {
    ($t:ty, $val:expr) => {{
        static STATIC_CELL: static_cell::StaticCell<$t> = static_cell::StaticCell::new();
        STATIC_CELL.init(($val))
    }};
}

pub mod efuse;
pub mod hal;
pub mod mac;
pub mod reset;
pub mod soc;

cfg_if::cfg_if! {
    if #[cfg(feature = "esp32")] {
        pub mod esp32;
        pub mod logging;
    }
}
