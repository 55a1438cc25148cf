use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine;
use crc::Crc;
use lazy_static::lazy_static;
use serde::de::{Error, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{TonAddressParseError, TonHash, ZERO_HASH};

lazy_static! {
    pub static ref CRC_16_XMODEM: Crc<u16> = Crc::<u16>::new(&crc::CRC_16_XMODEM);
}

/// Number of bits taken by `addr_std$10 anycast:nothing workchain_id:int8 address:bits256`.
pub const STD_ADDRESS_BIT_LEN: usize = 2 + 1 + 8 + 256;

const USER_FRIENDLY_LEN: usize = 48;
const USER_FRIENDLY_BYTES: usize = 36;

#[derive(PartialEq, Eq, Clone, Hash)]
pub struct TonAddress {
    pub workchain: i32,
    pub hash_part: TonHash,
}

/// Flags carried by the user-friendly form of an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TonAddressFlags {
    pub non_bounceable: bool,
    pub non_production: bool,
}

impl TonAddress {
    pub const NULL: TonAddress = TonAddress {
        workchain: 0,
        hash_part: ZERO_HASH,
    };

    pub fn new(workchain: i32, hash_part: &TonHash) -> TonAddress {
        TonAddress {
            workchain,
            hash_part: *hash_part,
        }
    }

    pub fn null() -> TonAddress {
        TonAddress::NULL.clone()
    }

    /// Parses raw form `<workchain>:<64 hex chars>`.
    pub fn from_hex_str(s: &str) -> Result<TonAddress, TonAddressParseError> {
        let (wc, hash_hex) = s
            .split_once(':')
            .ok_or_else(|| TonAddressParseError::new(s, "Raw address must be <wc>:<hash>"))?;
        let workchain = wc
            .parse::<i8>()
            .map_err(|_| TonAddressParseError::new(s, "Workchain must be an int8"))?;
        let hash_part: TonHash = hex::decode(hash_hex)
            .map_err(|_| TonAddressParseError::new(s, "Invalid hex in hash part"))?
            .as_slice()
            .try_into()
            .map_err(|_| TonAddressParseError::new(s, "Hash part must be 32 bytes"))?;
        Ok(TonAddress::new(workchain.into(), &hash_part))
    }

    pub fn from_base64_url(s: &str) -> Result<TonAddress, TonAddressParseError> {
        Ok(Self::from_base64_url_flags(s)?.0)
    }

    pub fn from_base64_url_flags(
        s: &str,
    ) -> Result<(TonAddress, TonAddressFlags), TonAddressParseError> {
        let bytes = decode_user_friendly(s, |v| URL_SAFE_NO_PAD.decode(v))?;
        Self::from_user_friendly_bytes(&bytes, s)
    }

    pub fn from_base64_std(s: &str) -> Result<TonAddress, TonAddressParseError> {
        Ok(Self::from_base64_std_flags(s)?.0)
    }

    pub fn from_base64_std_flags(
        s: &str,
    ) -> Result<(TonAddress, TonAddressFlags), TonAddressParseError> {
        let bytes = decode_user_friendly(s, |v| STANDARD_NO_PAD.decode(v))?;
        Self::from_user_friendly_bytes(&bytes, s)
    }

    fn from_user_friendly_bytes(
        bytes: &[u8; USER_FRIENDLY_BYTES],
        src: &str,
    ) -> Result<(TonAddress, TonAddressFlags), TonAddressParseError> {
        let tag = bytes[0];
        if tag & 0x3f != 0x11 {
            return Err(TonAddressParseError::new(src, "Wrong tag byte"));
        }
        let flags = TonAddressFlags {
            non_bounceable: tag & 0x40 != 0,
            non_production: tag & 0x80 != 0,
        };

        let crc = CRC_16_XMODEM.checksum(&bytes[0..34]);
        if crc.to_be_bytes() != bytes[34..36] {
            return Err(TonAddressParseError::new(src, "CRC mismatch"));
        }

        let mut hash_part = ZERO_HASH;
        hash_part.copy_from_slice(&bytes[2..34]);
        let workchain = bytes[1] as i8 as i32;
        Ok((TonAddress::new(workchain, &hash_part), flags))
    }

    pub fn to_hex(&self) -> String {
        format!("{}:{}", self.workchain, hex::encode(self.hash_part))
    }

    pub fn to_base64_url(&self) -> String {
        self.to_base64_url_flags(TonAddressFlags::default())
    }

    pub fn to_base64_url_flags(&self, flags: TonAddressFlags) -> String {
        URL_SAFE_NO_PAD.encode(self.user_friendly_bytes(flags))
    }

    pub fn to_base64_std(&self) -> String {
        self.to_base64_std_flags(TonAddressFlags::default())
    }

    pub fn to_base64_std_flags(&self, flags: TonAddressFlags) -> String {
        STANDARD_NO_PAD.encode(self.user_friendly_bytes(flags))
    }

    fn user_friendly_bytes(&self, flags: TonAddressFlags) -> [u8; USER_FRIENDLY_BYTES] {
        let mut bytes = [0u8; USER_FRIENDLY_BYTES];
        bytes[0] = 0x11
            | if flags.non_bounceable { 0x40 } else { 0 }
            | if flags.non_production { 0x80 } else { 0 };
        bytes[1] = (self.workchain & 0xff) as u8;
        bytes[2..34].copy_from_slice(&self.hash_part);
        let crc = CRC_16_XMODEM.checksum(&bytes[0..34]);
        bytes[34..36].copy_from_slice(&crc.to_be_bytes());
        bytes
    }
}

fn decode_user_friendly<F, E>(
    s: &str,
    decode: F,
) -> Result<[u8; USER_FRIENDLY_BYTES], TonAddressParseError>
where
    F: FnOnce(&str) -> Result<Vec<u8>, E>,
{
    if s.len() != USER_FRIENDLY_LEN {
        return Err(TonAddressParseError::new(s, "Wrong length"));
    }
    decode(s)
        .map_err(|_| TonAddressParseError::new(s, "Base64 decode error"))?
        .as_slice()
        .try_into()
        .map_err(|_| TonAddressParseError::new(s, "Unexpected decoded length"))
}

impl Display for TonAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_base64_url().as_str())
    }
}

impl Debug for TonAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_base64_url().as_str())
    }
}

impl FromStr for TonAddress {
    type Err = TonAddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != USER_FRIENDLY_LEN {
            TonAddress::from_hex_str(s)
        } else if s.contains('-') || s.contains('_') {
            TonAddress::from_base64_url(s)
        } else if s.contains('+') || s.contains('/') {
            TonAddress::from_base64_std(s)
        } else {
            // Alphabet-neutral string, both decoders agree
            TonAddress::from_base64_url(s)
        }
    }
}

impl TryFrom<String> for TonAddress {
    type Error = TonAddressParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(value.as_str())
    }
}

impl Serialize for TonAddress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.to_base64_url().as_str())
    }
}

struct TonAddressVisitor;

impl Visitor<'_> for TonAddressVisitor {
    type Value = TonAddress;

    fn expecting(&self, formatter: &mut Formatter) -> std::fmt::Result {
        formatter.write_str("a string with a raw or user-friendly TON address")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: Error,
    {
        v.parse().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for TonAddress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(TonAddressVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::{TonAddressFlags, TonAddressParseError};
    use crate::TonAddress;

    const RAW: &str = "0:e4d954ef9f4e1250a26b5bbad76a1cdd17cfd08babad6f4c23e372270aef6f76";
    const URL: &str = "EQDk2VTvn04SUKJrW7rXahzdF8_Qi6utb0wj43InCu9vdjrR";
    const STD: &str = "EQDk2VTvn04SUKJrW7rXahzdF8/Qi6utb0wj43InCu9vdjrR";

    #[test]
    fn all_forms_agree() -> Result<(), TonAddressParseError> {
        let addr = TonAddress::from_hex_str(RAW)?;
        assert_eq!(addr.workchain, 0);
        assert_eq!(addr.to_hex(), RAW);
        assert_eq!(addr.to_base64_url(), URL);
        assert_eq!(addr.to_base64_std(), STD);
        assert_eq!(URL.parse::<TonAddress>()?, addr);
        assert_eq!(STD.parse::<TonAddress>()?, addr);
        assert_eq!(RAW.parse::<TonAddress>()?, addr);
        Ok(())
    }

    #[test]
    fn flags_round_trip() -> Result<(), TonAddressParseError> {
        let addr = TonAddress::from_hex_str(RAW)?;
        let flags = TonAddressFlags {
            non_bounceable: true,
            non_production: false,
        };
        let encoded = addr.to_base64_url_flags(flags);
        assert!(encoded.starts_with("UQ"));
        let (decoded, decoded_flags) = TonAddress::from_base64_url_flags(&encoded)?;
        assert_eq!(decoded, addr);
        assert_eq!(decoded_flags, flags);
        Ok(())
    }

    #[test]
    fn masterchain_workchain_is_signed() -> Result<(), TonAddressParseError> {
        let addr = TonAddress::new(-1, &[0x11; 32]);
        let parsed: TonAddress = addr.to_base64_url().parse()?;
        assert_eq!(parsed.workchain, -1);
        assert_eq!(parsed, addr);
        Ok(())
    }

    #[test]
    fn rejects_corrupted_input() {
        assert!("EQDk2VTvn04SUKJrW7rXahzdF8_Qi6utb0wj43InCu9vdjra"
            .parse::<TonAddress>()
            .is_err());
        assert!("0:e4d9".parse::<TonAddress>().is_err());
        assert!("e4d954ef".parse::<TonAddress>().is_err());
        assert!("x:e4d954ef9f4e1250a26b5bbad76a1cdd17cfd08babad6f4c23e372270aef6f76"
            .parse::<TonAddress>()
            .is_err());
    }

    #[test]
    fn raw_workchain_must_fit_int8() -> Result<(), TonAddressParseError> {
        let hash = "e4d954ef9f4e1250a26b5bbad76a1cdd17cfd08babad6f4c23e372270aef6f76";
        assert!(TonAddress::from_hex_str(&format!("300:{}", hash)).is_err());
        assert!(TonAddress::from_hex_str(&format!("-129:{}", hash)).is_err());
        assert_eq!(TonAddress::from_hex_str(&format!("127:{}", hash))?.workchain, 127);
        assert_eq!(TonAddress::from_hex_str(&format!("-128:{}", hash))?.workchain, -128);
        Ok(())
    }

    #[test]
    fn serde_uses_base64_url() -> anyhow::Result<()> {
        let addr: TonAddress = serde_json::from_str(&format!("\"{}\"", RAW))?;
        assert_eq!(serde_json::to_string(&addr)?, format!("\"{}\"", URL));
        assert!(serde_json::from_str::<TonAddress>("\"124\"").is_err());
        Ok(())
    }
}
