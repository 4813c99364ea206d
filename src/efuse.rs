//! Factory MAC recovery from eFuse BLK0, with CRC integrity checking.

use crc::{Crc, CRC_8_MAXIM_DOW};
use log::error;

use crate::{
    hal::{Abort, EfuseBlock0},
    mac::Mac,
};

// The eFuse MAC field is protected by CRC-8 with the 0x31 polynomial,
// reflected, zero init. Same parameters as the ROM `crc8_le` routine.
const CRC_ALGO: Crc<u8> = Crc::<u8>::new(&CRC_8_MAXIM_DOW);

/// A small span of factory addresses shipped with a CRC that does not match;
/// they are reserved for Espressif internal use and accepted unconditionally.
/// Do not widen: the bounds encode a real manufacturing exception.
pub const RESERVED_VENDOR_TAG: u32 = 0x18fe;
pub const RESERVED_VENDOR_LOW: u32 = 0x346a_85c7;
pub const RESERVED_VENDOR_HIGH: u32 = 0x346a_85f8;

pub(crate) fn crc8(bytes: &[u8]) -> u8 {
    CRC_ALGO.checksum(bytes)
}

fn reserved_vendor_exception(low: u32, high: u32) -> bool {
    (high & 0xffff) == RESERVED_VENDOR_TAG
        && (RESERVED_VENDOR_LOW..=RESERVED_VENDOR_HIGH).contains(&low)
}

/// Reads the factory MAC from eFuse BLK0 and verifies its CRC.
///
/// A CRC mismatch outside the reserved vendor window aborts the system:
/// corrupted identity storage is not a recoverable condition in the boot
/// path, and every network interface derives from this value.
pub fn factory_mac<H: EfuseBlock0 + Abort>(hal: &H) -> Mac {
    let (low, high) = hal.mac_words();

    let mac = Mac([
        (high >> 8) as u8,
        high as u8,
        (low >> 24) as u8,
        (low >> 16) as u8,
        (low >> 8) as u8,
        low as u8,
    ]);

    let stored = (high >> 16) as u8;
    let computed = crc8(&mac.0);

    if stored != computed && !reserved_vendor_exception(low, high) {
        error!("factory MAC CRC error: stored = 0x{stored:02x}, computed = 0x{computed:02x}");
        hal.abort();
    }

    mac
}
