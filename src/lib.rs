//! BIP32: Hierarchical Deterministic key derivation
//!
//! [BIP32][bip32-spec] describes how to derive an unbounded tree of key pairs from a single
//! master secret. This crate implements the derivation core: the child key derivation
//! functions ([`ckd`]), the tree node that carries derivation metadata ([`HdNode`]), and the
//! reference 78-byte extended key format with its base58check text form ([`codec`]).
//!
//! The implementation is based on [generic-ec](generic_ec) library that provides generic
//! elliptic curve arithmetic. Derivation itself works over any curve, but the extended key
//! codec and master key derivation are defined for secp256k1 only.
//!
//! ### Features
//! * `serde`: implements serialization for child indexes, derivation paths and the network
//!   registry, so a registry can be loaded from a configuration file
//! * `curve-secp256r1`: enables secp256r1 curve in [curves] module
//!
//! ### Examples
//!
//! Derive a master key from the seed, and then derive a child key m/1<sub>H</sub>/10:
//! ```rust
//! let seed = b"16-64 bytes of high entropy".as_slice();
//! let master_key = hd_keychain::bip32::derive_master_key(seed)?;
//!
//! let child_key = master_key
//!     .child_private(1 + hd_keychain::H)?
//!     .child_private(10u32)?;
//! assert_eq!(child_key.depth(), 2);
//! # Ok::<(), hd_keychain::errors::Error>(())
//! ```
//!
//! Public-only node derives the very same public keys as the private one:
//! ```rust
//! # let seed = b"16-64 bytes of high entropy".as_slice();
//! let master_key = hd_keychain::bip32::derive_master_key(seed)?;
//!
//! let derived_privately = master_key.child_private(7u32)?.as_public();
//! let derived_publicly = master_key.as_public().child_public(7u32)?;
//! assert_eq!(derived_privately, derived_publicly);
//! # Ok::<(), hd_keychain::errors::Error>(())
//! ```
//!
//! Serialize a key as `xpub` and parse it back:
//! ```rust
//! use hd_keychain::network::{KeyKind, NetworkRegistry, BITCOIN};
//!
//! # let seed = b"16-64 bytes of high entropy".as_slice();
//! let master_key = hd_keychain::bip32::derive_master_key(seed)?;
//! let xpub = master_key.to_extended_key(&BITCOIN, KeyKind::Public)?;
//!
//! let registry = NetworkRegistry::builtin();
//! let decoded = hd_keychain::codec::from_extended_key(&xpub, &registry)?;
//! assert_eq!(decoded.network.code, "BTC");
//! assert_eq!(decoded.node, master_key.as_public());
//! # Ok::<(), hd_keychain::errors::Error>(())
//! ```
//!
//! [bip32-spec]: https://github.com/bitcoin/bips/blob/master/bip-0032.mediawiki

#![forbid(missing_docs, unsafe_code)]

use core::{fmt, ops};

use generic_array::{
    typenum::{U32, U64},
    GenericArray,
};

pub use generic_ec;
pub use generic_ec::curves;

pub mod bip32;
pub mod ckd;
pub mod codec;
pub mod errors;
pub mod hash;
pub mod network;
mod node;
pub mod path;
pub mod render;

pub use self::{node::Fingerprint, node::HdNode, path::DerivationPath};

type HmacSha512 = hmac::Hmac<sha2::Sha512>;

/// Beginning of hardened child indexes
///
/// $H = 2^{31}$ defines the range of hardened indexes. All indexes $i$ such that $H \le i$ are hardened.
///
/// ## Example
/// Derive a child key with a path m/1<sub>H</sub>
/// ```rust
/// # let seed = b"do not use this seed in prod :)".as_slice();
/// let master_key = hd_keychain::bip32::derive_master_key(seed)?;
///
/// let hardened_child = master_key.child_private(1 + hd_keychain::H)?;
/// assert_eq!(u32::from(hardened_child.child_index()), 0x8000_0001);
/// #
/// # Ok::<(), hd_keychain::errors::Error>(())
/// ```
pub const H: u32 = 1 << 31;

/// Child index, whether hardened or not
///
/// The wrapped `u32` always includes the hardened bit, exactly as the index is encoded
/// in the HMAC input and in the extended key payload. Use [`ChildIndex::hardened`] to
/// build a hardened index from its ordinal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(into = "u32"))]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(from = "u32"))]
pub enum ChildIndex {
    /// Hardened index
    Hardened(HardenedIndex),
    /// Non-hardened index
    NonHardened(NonHardenedIndex),
}

/// Child index in range $2^{31} \le i < 2^{32}$ corresponding to a hardened wallet
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(into = "u32"))]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(try_from = "u32"))]
pub struct HardenedIndex(u32);

/// Child index in range $0 \le i < 2^{31}$ corresponding to a non-hardened wallet
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(into = "u32"))]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(try_from = "u32"))]
pub struct NonHardenedIndex(u32);

/// Chain code of extended key as defined in BIP32
pub type ChainCode = [u8; 32];

impl HardenedIndex {
    /// The smallest possible value of hardened index. Equals to $2^{31}$
    pub const MIN: Self = Self(H);
    /// The largest possible value of hardened index. Equals to $2^{32} - 1$
    pub const MAX: Self = Self(u32::MAX);

    /// Constructs a hardened index from its ordinal, i.e. `from_ordinal(5)` is 5<sub>H</sub>
    ///
    /// Returns error if `ordinal` $\ge 2^{31}$
    pub fn from_ordinal(ordinal: u32) -> Result<Self, errors::OutOfRange> {
        if ordinal < H {
            Ok(Self(ordinal | H))
        } else {
            Err(errors::OutOfRange)
        }
    }

    /// Index with the hardened bit cleared
    pub fn ordinal(&self) -> u32 {
        self.0 & !H
    }
}
impl NonHardenedIndex {
    /// The smallest possible value of non-hardened index. Equals to $0$
    pub const MIN: Self = Self(0);
    /// The largest possible value of non-hardened index. Equals to $2^{31} - 1$
    pub const MAX: Self = Self(H - 1);
}
impl ChildIndex {
    /// Hardened index with given ordinal: `ChildIndex::hardened(5)` is 5<sub>H</sub> which is
    /// stored as `0x80000005`
    ///
    /// Returns error if `ordinal` $\ge 2^{31}$
    pub fn hardened(ordinal: u32) -> Result<Self, errors::OutOfRange> {
        HardenedIndex::from_ordinal(ordinal).map(Self::Hardened)
    }

    /// Non-hardened index
    ///
    /// Returns error if `index` $\ge 2^{31}$
    pub fn normal(index: u32) -> Result<Self, errors::OutOfRange> {
        NonHardenedIndex::try_from(index).map(Self::NonHardened)
    }

    /// Checks whether the index is hardened
    pub fn is_hardened(&self) -> bool {
        matches!(self, Self::Hardened(_))
    }

    /// Index with the hardened bit cleared
    pub fn ordinal(&self) -> u32 {
        **self & !H
    }
}
impl ops::Deref for HardenedIndex {
    type Target = u32;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl ops::Deref for NonHardenedIndex {
    type Target = u32;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl ops::Deref for ChildIndex {
    type Target = u32;
    fn deref(&self) -> &Self::Target {
        match self {
            Self::Hardened(i) => i,
            Self::NonHardened(i) => i,
        }
    }
}
impl From<u32> for ChildIndex {
    fn from(value: u32) -> Self {
        match value {
            H.. => Self::Hardened(HardenedIndex(value)),
            _ => Self::NonHardened(NonHardenedIndex(value)),
        }
    }
}
impl From<HardenedIndex> for ChildIndex {
    fn from(value: HardenedIndex) -> Self {
        Self::Hardened(value)
    }
}
impl From<NonHardenedIndex> for ChildIndex {
    fn from(value: NonHardenedIndex) -> Self {
        Self::NonHardened(value)
    }
}
impl TryFrom<u32> for HardenedIndex {
    type Error = errors::OutOfRange;
    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match ChildIndex::from(value) {
            ChildIndex::Hardened(v) => Ok(v),
            _ => Err(errors::OutOfRange),
        }
    }
}
impl TryFrom<u32> for NonHardenedIndex {
    type Error = errors::OutOfRange;
    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match ChildIndex::from(value) {
            ChildIndex::NonHardened(v) => Ok(v),
            _ => Err(errors::OutOfRange),
        }
    }
}
impl From<ChildIndex> for u32 {
    fn from(value: ChildIndex) -> Self {
        match value {
            ChildIndex::Hardened(v) => v.0,
            ChildIndex::NonHardened(v) => v.0,
        }
    }
}
impl From<HardenedIndex> for u32 {
    fn from(value: HardenedIndex) -> Self {
        value.0
    }
}
impl From<NonHardenedIndex> for u32 {
    fn from(value: NonHardenedIndex) -> Self {
        value.0
    }
}

/// Formats index in path notation: `5` for non-hardened index, `5H` for hardened one
impl fmt::Display for ChildIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hardened(i) => write!(f, "{}H", i.ordinal()),
            Self::NonHardened(i) => write!(f, "{}", **i),
        }
    }
}

/// Parses index in path notation
///
/// Hardened indexes are written as ordinal followed by one of `H`, `h`, `'` or `p`
/// (`5H` is `0x80000005`). A plain integer is taken as is, so `2147483653` is also 5<sub>H</sub>.
impl core::str::FromStr for ChildIndex {
    type Err = errors::ParseChildIndexError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.strip_suffix(['H', 'h', '\'', 'p']) {
            Some(ordinal) => {
                let ordinal = ordinal
                    .parse::<u32>()
                    .map_err(errors::ParseChildIndexError::ParseInt)?;
                ChildIndex::hardened(ordinal).map_err(errors::ParseChildIndexError::IndexNotInRange)
            }
            None => s
                .parse::<u32>()
                .map(Into::into)
                .map_err(errors::ParseChildIndexError::ParseInt),
        }
    }
}
impl core::str::FromStr for HardenedIndex {
    type Err = errors::ParseChildIndexError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<ChildIndex>()? {
            ChildIndex::Hardened(i) => Ok(i),
            ChildIndex::NonHardened(_) => Err(errors::ParseChildIndexError::IndexNotInRange(
                errors::OutOfRange,
            )),
        }
    }
}
impl core::str::FromStr for NonHardenedIndex {
    type Err = errors::ParseChildIndexError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let index = s
            .parse::<u32>()
            .map_err(errors::ParseChildIndexError::ParseInt)?;
        NonHardenedIndex::try_from(index).map_err(errors::ParseChildIndexError::IndexNotInRange)
    }
}

/// Splits array `I` of 64 bytes into two arrays `I_L = I[..32]` and `I_R = I[32..]`
fn split_into_two_halves(
    i: &GenericArray<u8, U64>,
) -> (&GenericArray<u8, U32>, &GenericArray<u8, U32>) {
    generic_array::sequence::Split::split(i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hardened_index_keeps_the_bit() {
        let i = ChildIndex::hardened(5).unwrap();
        assert!(i.is_hardened());
        assert_eq!(*i, 0x8000_0005);
        assert_eq!(i.ordinal(), 5);
        assert_eq!(i, ChildIndex::from(5 + H));
        assert_ne!(i, ChildIndex::from(5u32));

        assert_eq!(ChildIndex::hardened(H), Err(errors::OutOfRange));
        assert_eq!(ChildIndex::normal(H), Err(errors::OutOfRange));
        assert_eq!(*ChildIndex::normal(H - 1).unwrap(), H - 1);
    }

    #[test]
    fn parse_and_display() {
        for (s, expected) in [
            ("0", 0),
            ("5", 5),
            ("5H", 5 + H),
            ("5h", 5 + H),
            ("5'", 5 + H),
            ("5p", 5 + H),
            ("2147483653", 5 + H),
            ("2147483647H", u32::MAX),
        ] {
            let index: ChildIndex = s.parse().unwrap();
            assert_eq!(*index, expected, "{s}");
        }

        assert_eq!(ChildIndex::from(5 + H).to_string(), "5H");
        assert_eq!(ChildIndex::from(5u32).to_string(), "5");

        assert!("2147483648H".parse::<ChildIndex>().is_err());
        assert!("-1".parse::<ChildIndex>().is_err());
        assert!("H".parse::<ChildIndex>().is_err());
        assert!("5".parse::<HardenedIndex>().is_err());
        assert_eq!(*"5H".parse::<HardenedIndex>().unwrap(), 5 + H);
        assert!("2147483648".parse::<NonHardenedIndex>().is_err());
    }
}
