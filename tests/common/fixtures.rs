//! Fixture addresses and aliases.

use magic_address_types::Address;

pub const VITALIK_HEX: &str = "0xd8da6bf26964af9d7eed9e03e53415d37aa96045";
pub const ALICE_HEX: &str = "0x00000000000000000000000000000000000a11ce";
pub const BOB_HEX: &str = "0x0000000000000000000000000000000000000b0b";

pub const VITALIK_NAME: &str = "vitalik.eth";
pub const VITALIK_AVATAR: &str = "https://example.invalid/vitalik.png";

pub fn vitalik() -> Address {
    VITALIK_HEX.parse().expect("fixture address")
}

pub fn alice() -> Address {
    ALICE_HEX.parse().expect("fixture address")
}

pub fn bob() -> Address {
    BOB_HEX.parse().expect("fixture address")
}
