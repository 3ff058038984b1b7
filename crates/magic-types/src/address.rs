//! Canonical address type and normalization utilities.
//!
//! This module is the canonical source for address handling in the workspace.
//! Other crates should import from here rather than defining their own logic.
//!
//! Addresses are 20-byte values, but users paste them in different shapes:
//! - Checksummed: "0xAbC0000000000000000000000000000000000123"
//! - Lowercase: "0xabc0000000000000000000000000000000000123"
//! - Padded with whitespace when copied from elsewhere
//!
//! [`Address`] stores the raw bytes, so two textually different spellings of the
//! same address compare equal. Its `Display` form (`0x` + 40 lowercase hex
//! characters) is the normalized form used for dedup and comparisons.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Number of bytes in an address.
pub const ADDRESS_LENGTH: usize = 20;

/// Number of hex characters after the `0x` prefix.
pub const ADDRESS_HEX_LENGTH: usize = ADDRESS_LENGTH * 2;

/// A canonical 20-byte account address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address([u8; ADDRESS_LENGTH]);

impl Address {
    /// The all-zero address.
    pub const ZERO: Address = Address([0u8; ADDRESS_LENGTH]);

    pub const fn new(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    /// Full normalized form: `0x` followed by 40 lowercase hex characters.
    pub fn to_hex_literal(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Abbreviated form for list rows, e.g. `0xabc...123`.
    pub fn short(&self) -> String {
        shorten_address(&self.to_hex_literal())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Reasons a string is not a canonical address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressParseError {
    /// The `0x` prefix is missing.
    MissingPrefix,
    /// Wrong number of hex characters after the prefix.
    InvalidLength(usize),
    /// Non-hex characters after the prefix.
    InvalidHex,
}

impl fmt::Display for AddressParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressParseError::MissingPrefix => write!(f, "address must start with 0x"),
            AddressParseError::InvalidLength(len) => write!(
                f,
                "address must have {} hex characters, got {}",
                ADDRESS_HEX_LENGTH, len
            ),
            AddressParseError::InvalidHex => write!(f, "address contains non-hex characters"),
        }
    }
}

impl std::error::Error for AddressParseError {}

impl FromStr for Address {
    type Err = AddressParseError;

    /// Strict parse: `0x` (or `0X`) followed by exactly 40 hex digits, any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex_part = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or(AddressParseError::MissingPrefix)?;
        if hex_part.len() != ADDRESS_HEX_LENGTH {
            return Err(AddressParseError::InvalidLength(hex_part.len()));
        }
        let mut bytes = [0u8; ADDRESS_LENGTH];
        hex::decode_to_slice(hex_part, &mut bytes).map_err(|_| AddressParseError::InvalidHex)?;
        Ok(Address(bytes))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex_literal())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse_address(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid address: {s}")))
    }
}

/// Check whether `value` is already a canonical address, exactly as typed.
///
/// No trimming happens here: a value with stray whitespace is still being
/// edited and is not eligible for the zero-delay fast path.
///
/// # Examples
///
/// ```
/// use magic_address_types::address::is_address;
///
/// assert!(is_address("0x00000000000000000000000000000000000000aB"));
/// assert!(!is_address("vitalik.eth"));
/// assert!(!is_address("0x1234"));
/// ```
pub fn is_address(value: &str) -> bool {
    value.parse::<Address>().is_ok()
}

/// Parse an address supplied by an external source, tolerating surrounding whitespace.
///
/// # Examples
///
/// ```
/// use magic_address_types::address::parse_address;
///
/// let addr = parse_address("  0x00000000000000000000000000000000000000AB ").unwrap();
/// assert_eq!(addr.to_hex_literal(), "0x00000000000000000000000000000000000000ab");
/// assert!(parse_address("not-hex").is_none());
/// ```
pub fn parse_address(value: &str) -> Option<Address> {
    value.trim().parse().ok()
}

/// Abbreviate an address for display: first 5 characters, `...`, last 3.
///
/// Strings too short to abbreviate are returned unchanged.
///
/// # Examples
///
/// ```
/// use magic_address_types::address::shorten_address;
///
/// assert_eq!(
///     shorten_address("0xab00000000000000000000000000000000000123"),
///     "0xab0...123"
/// );
/// assert_eq!(shorten_address("0x12"), "0x12");
/// ```
pub fn shorten_address(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 8 {
        return value.to_string();
    }
    let head: String = chars[..5].iter().collect();
    let tail: String = chars[chars.len() - 3..].iter().collect();
    format!("{}...{}", head, tail)
}
