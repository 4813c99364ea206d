//! Stable MAC addresses for the four logical network interfaces, derived
//! from a single factory-provisioned base address.

use core::fmt;

use log::{info, warn};

use crate::{
    efuse,
    hal::{Abort, EfuseBlock0},
};

pub const MAC_LEN: usize = 6;

const GROUP_BIT: u8 = 0x01;
const LOCALLY_ADMINISTERED_BIT: u8 = 0x02;
const DERIVE_ATTEMPTS: u8 = 64;

/// A 6-byte hardware address.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Mac(pub [u8; MAC_LEN]);

/// All-ones address, the Ethernet broadcast destination.
pub const ETH_BROADCAST: Mac = Mac([0xff; MAC_LEN]);

impl Mac {
    pub const fn is_zero(&self) -> bool {
        let mut i = 0;
        while i < MAC_LEN {
            if self.0[i] != 0 {
                return false;
            }
            i += 1;
        }
        true
    }

    /// The I/G bit: set for multicast/broadcast destinations, which can
    /// never be a device's own address.
    pub const fn is_group(&self) -> bool {
        self.0[0] & GROUP_BIT != 0
    }

    /// The U/L bit: set when the address was assigned by software rather
    /// than the manufacturer.
    pub const fn is_local(&self) -> bool {
        self.0[0] & LOCALLY_ADMINISTERED_BIT != 0
    }

    /// Copy of `self` with `n` added to the last byte, wrapping at 8 bits.
    fn with_last_byte_offset(mut self, n: u8) -> Mac {
        self.0[MAC_LEN - 1] = self.0[MAC_LEN - 1].wrapping_add(n);
        self
    }
}

impl From<[u8; MAC_LEN]> for Mac {
    fn from(bytes: [u8; MAC_LEN]) -> Self {
        Mac(bytes)
    }
}

impl fmt::Display for Mac {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

impl fmt::Debug for Mac {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mac({self})")
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    InvalidArgument,
    BaseMacNotSet,
}

/// Logical interface roles an address can be issued for.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacKind {
    WifiSta = 0,
    WifiSoftAp = 1,
    Bluetooth = 2,
    Ethernet = 3,
}

impl TryFrom<u32> for MacKind {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self, Error> {
        use MacKind::*;
        match value {
            0 => Ok(WifiSta),
            1 => Ok(WifiSoftAp),
            2 => Ok(Bluetooth),
            3 => Ok(Ethernet),
            _ => Err(Error::InvalidArgument),
        }
    }
}

/// How the per-interface addresses relate to the base address.
///
/// Resolved once when the store is built so both layouts are exercisable in
/// one binary; on real devices it mirrors how many universal addresses the
/// module was provisioned with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressPolicy {
    /// Four independently assigned universal addresses, base + 0..=3.
    #[default]
    FourUniversal,
    /// Two universal addresses; soft-AP and Ethernet are locally derived.
    TwoUniversal,
}

/// Process-wide holder of the base address override.
///
/// The override is written at most once, during early boot, before any
/// reader exists; on a multi-core target pin the store into a `'static`
/// (see `mk_static!`) and make sure that write happens-before the first
/// `read_mac`. An all-zero base means "unset, use the factory value".
pub struct MacStore {
    base: Mac,
    policy: AddressPolicy,
}

impl MacStore {
    pub const fn new(policy: AddressPolicy) -> Self {
        Self {
            base: Mac([0; MAC_LEN]),
            policy,
        }
    }

    pub fn policy(&self) -> AddressPolicy {
        self.policy
    }

    /// Installs a runtime base address in place of the factory one.
    pub fn set_base_mac(&mut self, mac: Mac) -> Result<(), Error> {
        if mac.is_zero() || mac.is_group() {
            warn!("rejecting base MAC {mac}: not a valid unicast address");
            return Err(Error::InvalidArgument);
        }

        self.base = mac;
        Ok(())
    }

    /// The runtime override, if one was installed. Callers fall back to
    /// [`efuse::factory_mac`] on `BaseMacNotSet`.
    pub fn base_mac(&self) -> Result<Mac, Error> {
        if self.base.is_zero() {
            info!("base MAC not set, reading the factory default from eFuse BLK0");
            return Err(Error::BaseMacNotSet);
        }

        Ok(self.base)
    }

    /// The address for one interface role. Recomputed on every call from the
    /// base address; byte-identical across calls for the same role.
    pub fn read_mac<H: EfuseBlock0 + Abort>(&self, hal: &H, kind: MacKind) -> Mac {
        let base = match self.base_mac() {
            Ok(mac) => mac,
            Err(_) => efuse::factory_mac(hal),
        };

        match kind {
            MacKind::WifiSta => base,
            MacKind::WifiSoftAp => match self.policy {
                AddressPolicy::FourUniversal => base.with_last_byte_offset(1),
                AddressPolicy::TwoUniversal => derive_local_mac(base),
            },
            MacKind::Bluetooth => match self.policy {
                AddressPolicy::FourUniversal => base.with_last_byte_offset(2),
                // The second universal address.
                AddressPolicy::TwoUniversal => base.with_last_byte_offset(1),
            },
            MacKind::Ethernet => match self.policy {
                AddressPolicy::FourUniversal => base.with_last_byte_offset(3),
                AddressPolicy::TwoUniversal => derive_local_mac(base.with_last_byte_offset(1)),
            },
        }
    }
}

/// Locally-administered variant of a universal address.
///
/// Sets the U/L bit and, if the result would still equal the source, XORs a
/// growing pattern into the first byte until it differs somewhere. Bounded
/// so a pathological source cannot loop forever; deterministic, no stored
/// state.
pub fn derive_local_mac(universal: Mac) -> Mac {
    let mut local = universal;

    for attempt in 0..DERIVE_ATTEMPTS {
        local.0[0] = (universal.0[0] | LOCALLY_ADMINISTERED_BIT) ^ (attempt << 2);

        if local != universal {
            break;
        }
    }

    local
}

#[cfg(test)]
mod tests;
