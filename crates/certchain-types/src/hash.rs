use std::fmt;
use std::str::FromStr;

use crate::error::TypeError;

/// Fixed-size digest of a sealed block.
///
/// The next block stores this value (hex-encoded) as its `previous_hash`,
/// which is what links the chain together. Stored links are read back with
/// [`FromStr`], so hex case does not matter when comparing.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockHash([u8; 32]);

impl BlockHash {
    /// Wrap a pre-computed digest.
    pub const fn from_hash(hash: [u8; 32]) -> Self {
        Self(hash)
    }

    /// Hex-encoded string representation.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Short hex representation (first 8 characters).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }

    /// Parse from a hex string.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != 32 {
            return Err(TypeError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockHash({})", self.short_hex())
    }
}

impl fmt::Display for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for BlockHash {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_roundtrip() {
        let hash = BlockHash::from_hash([7; 32]);
        let parsed = BlockHash::from_hex(&hash.to_hex()).unwrap();
        assert_eq!(hash, parsed);
    }

    #[test]
    fn short_hex_is_8_chars() {
        assert_eq!(BlockHash::from_hash([1; 32]).short_hex().len(), 8);
    }

    #[test]
    fn display_is_full_hex() {
        let hash = BlockHash::from_hash([0xab; 32]);
        let display = format!("{hash}");
        assert_eq!(display.len(), 64);
        assert_eq!(display, hash.to_hex());
    }

    #[test]
    fn wrong_length_is_rejected() {
        let err = BlockHash::from_hex("abcd").unwrap_err();
        assert_eq!(
            err,
            TypeError::InvalidLength {
                expected: 32,
                actual: 2
            }
        );
    }

    #[test]
    fn invalid_hex_is_rejected() {
        assert!(matches!(
            BlockHash::from_hex("zz"),
            Err(TypeError::InvalidHex(_))
        ));
    }

    #[test]
    fn parse_accepts_uppercase_hex() {
        let hash = BlockHash::from_hash([0xcd; 32]);
        let parsed: BlockHash = hash.to_hex().to_uppercase().parse().unwrap();
        assert_eq!(parsed, hash);
        assert!("1".parse::<BlockHash>().is_err());
    }
}
