use super::*;
use crate::{
    efuse,
    hal::{Abort, EfuseBlock0},
};

/// eFuse words holding exactly the bytes and CRC handed in.
struct FakeEfuse {
    low: u32,
    high: u32,
}

impl FakeEfuse {
    fn new(mac: [u8; MAC_LEN], crc: u8) -> Self {
        let high = ((crc as u32) << 16) | ((mac[0] as u32) << 8) | mac[1] as u32;
        let low = ((mac[2] as u32) << 24)
            | ((mac[3] as u32) << 16)
            | ((mac[4] as u32) << 8)
            | mac[5] as u32;
        Self { low, high }
    }

    fn valid(mac: [u8; MAC_LEN]) -> Self {
        Self::new(mac, efuse::crc8(&mac))
    }

    fn corrupt(mac: [u8; MAC_LEN]) -> Self {
        Self::new(mac, efuse::crc8(&mac) ^ 0x55)
    }
}

impl EfuseBlock0 for FakeEfuse {
    fn mac_words(&self) -> (u32, u32) {
        (self.low, self.high)
    }
}

impl Abort for FakeEfuse {
    fn abort(&self) -> ! {
        panic!("system abort");
    }
}

const FACTORY: [u8; MAC_LEN] = [0x24, 0x0a, 0xc4, 0x00, 0x01, 0x10];

#[test]
fn factory_mac_unpacks_the_efuse_words() {
    let fused = FakeEfuse::valid(FACTORY);
    assert_eq!(efuse::factory_mac(&fused), Mac(FACTORY));
}

#[test]
#[should_panic(expected = "system abort")]
fn factory_mac_aborts_on_crc_mismatch() {
    efuse::factory_mac(&FakeEfuse::corrupt(FACTORY));
}

#[test]
fn reserved_vendor_window_is_accepted_without_valid_crc() {
    for last in [0xc7, 0xf8] {
        let mac = [0x18, 0xfe, 0x34, 0x6a, 0x85, last];
        assert_eq!(efuse::factory_mac(&FakeEfuse::corrupt(mac)), Mac(mac));
    }
}

#[test]
#[should_panic(expected = "system abort")]
fn just_below_the_reserved_window_still_aborts() {
    efuse::factory_mac(&FakeEfuse::corrupt([0x18, 0xfe, 0x34, 0x6a, 0x85, 0xc6]));
}

#[test]
#[should_panic(expected = "system abort")]
fn just_above_the_reserved_window_still_aborts() {
    efuse::factory_mac(&FakeEfuse::corrupt([0x18, 0xfe, 0x34, 0x6a, 0x85, 0xf9]));
}

#[test]
fn derived_mac_differs_and_is_locally_administered() {
    let inputs = [
        FACTORY,
        // First byte already carries the U/L bit.
        [0x02, 0x00, 0x00, 0x00, 0x00, 0x00],
        [0x00; MAC_LEN],
        [0xff; MAC_LEN],
    ];

    for bytes in inputs {
        let universal = Mac(bytes);
        let local = derive_local_mac(universal);

        assert_ne!(local, universal, "derived from {universal}");
        assert!(local.is_local(), "derived from {universal}");
        assert_eq!(local.0[1..], universal.0[1..]);
    }
}

#[test]
fn derivation_is_deterministic() {
    let universal = Mac(FACTORY);
    assert_eq!(derive_local_mac(universal), derive_local_mac(universal));
}

#[test]
fn read_mac_is_deterministic_per_role() {
    let fused = FakeEfuse::valid(FACTORY);

    for policy in [AddressPolicy::FourUniversal, AddressPolicy::TwoUniversal] {
        let store = MacStore::new(policy);
        for kind in [
            MacKind::WifiSta,
            MacKind::WifiSoftAp,
            MacKind::Bluetooth,
            MacKind::Ethernet,
        ] {
            assert_eq!(store.read_mac(&fused, kind), store.read_mac(&fused, kind));
        }
    }
}

#[test]
fn four_universal_addresses_offset_the_last_byte() {
    let fused = FakeEfuse::valid(FACTORY);
    let store = MacStore::new(AddressPolicy::FourUniversal);

    assert_eq!(store.read_mac(&fused, MacKind::WifiSta), Mac(FACTORY));
    assert_eq!(
        store.read_mac(&fused, MacKind::WifiSoftAp).0[5],
        FACTORY[5] + 1
    );
    assert_eq!(
        store.read_mac(&fused, MacKind::Bluetooth).0[5],
        FACTORY[5] + 2
    );
    assert_eq!(
        store.read_mac(&fused, MacKind::Ethernet).0[5],
        FACTORY[5] + 3
    );
}

#[test]
fn two_universal_addresses_derive_the_rest() {
    let fused = FakeEfuse::valid(FACTORY);
    let store = MacStore::new(AddressPolicy::TwoUniversal);

    assert_eq!(store.read_mac(&fused, MacKind::WifiSta), Mac(FACTORY));

    // Soft-AP: local variant of the base address.
    let soft_ap = store.read_mac(&fused, MacKind::WifiSoftAp);
    assert_eq!(soft_ap, Mac([0x26, 0x0a, 0xc4, 0x00, 0x01, 0x10]));

    // Bluetooth: the second universal address.
    let bluetooth = store.read_mac(&fused, MacKind::Bluetooth);
    assert_eq!(bluetooth, Mac([0x24, 0x0a, 0xc4, 0x00, 0x01, 0x11]));

    // Ethernet: local variant of the second universal address.
    let ethernet = store.read_mac(&fused, MacKind::Ethernet);
    assert_eq!(ethernet, Mac([0x26, 0x0a, 0xc4, 0x00, 0x01, 0x11]));
}

#[test]
fn last_byte_offsets_wrap_at_8_bits() {
    let fused = FakeEfuse::valid([0x24, 0x0a, 0xc4, 0x00, 0x01, 0xff]);
    let store = MacStore::new(AddressPolicy::FourUniversal);

    assert_eq!(store.read_mac(&fused, MacKind::WifiSoftAp).0[5], 0x00);
    assert_eq!(store.read_mac(&fused, MacKind::Bluetooth).0[5], 0x01);
    assert_eq!(store.read_mac(&fused, MacKind::Ethernet).0[5], 0x02);
}

#[test]
fn out_of_range_roles_are_rejected() {
    assert_eq!(MacKind::try_from(0), Ok(MacKind::WifiSta));
    assert_eq!(MacKind::try_from(3), Ok(MacKind::Ethernet));
    assert_eq!(MacKind::try_from(4), Err(Error::InvalidArgument));
    assert_eq!(MacKind::try_from(u32::MAX), Err(Error::InvalidArgument));
}

#[test]
fn base_mac_falls_back_until_overridden() {
    let fused = FakeEfuse::valid(FACTORY);
    let mut store = MacStore::new(AddressPolicy::FourUniversal);

    assert_eq!(store.base_mac(), Err(Error::BaseMacNotSet));
    assert_eq!(store.read_mac(&fused, MacKind::WifiSta), Mac(FACTORY));

    let along: Mac = [0x66, 0x55, 0x44, 0x33, 0x22, 0x11].into();
    store.set_base_mac(along).unwrap();

    assert_eq!(store.base_mac(), Ok(along));
    // The override wins over the fused value from here on.
    assert_eq!(store.read_mac(&fused, MacKind::WifiSta), along);
}

#[test]
fn unusable_base_overrides_are_rejected() {
    let mut store = MacStore::new(AddressPolicy::FourUniversal);

    assert_eq!(
        store.set_base_mac(Mac([0; MAC_LEN])),
        Err(Error::InvalidArgument)
    );
    assert_eq!(
        store.set_base_mac(Mac([0x01, 0x00, 0x5e, 0x00, 0x00, 0x01])),
        Err(Error::InvalidArgument)
    );
    assert_eq!(store.base_mac(), Err(Error::BaseMacNotSet));
}

#[test]
fn mac_formats_with_colons() {
    assert_eq!(format!("{}", Mac(FACTORY)), "24:0a:c4:00:01:10");
    assert_eq!(format!("{}", ETH_BROADCAST), "ff:ff:ff:ff:ff:ff");
}
