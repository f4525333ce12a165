//! Network registry
//!
//! Extended keys and addresses are prefixed with network-specific version bytes. [`Network`]
//! holds them for a single network, [`NetworkRegistry`] maps version bytes back to the network
//! when an extended key is parsed.
//!
//! Registry is an ordinary value, there's no global state. [`NetworkRegistry::builtin`]
//! contains a few well-known networks, a custom registry can be built with
//! [`NetworkRegistry::new`] or, with `serde` feature enabled, deserialized from a config:
//!
//! ```rust
//! # #[cfg(feature = "serde")] {
//! let config = r#"[{
//!     "code": "BTC",
//!     "name": "Bitcoin mainnet",
//!     "bip32_private_version": [4, 136, 173, 228],
//!     "bip32_public_version": [4, 136, 178, 30],
//!     "address_prefix": 0,
//!     "script_prefix": 5,
//!     "wif_prefix": 128
//! }]"#;
//! let registry: hd_keychain::network::NetworkRegistry = serde_json::from_str(config)?;
//! assert!(registry.by_code("BTC").is_some());
//! # }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::borrow::Cow;

use crate::errors::DuplicateNetwork;

/// Kind of an extended key: private (`xprv`) or public (`xpub`)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum KeyKind {
    /// Extended key contains the secret key
    Private,
    /// Extended key contains the public key only
    Public,
}

/// Network parameters used by the extended key codec and by [rendering](crate::render)
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Network {
    /// Short network code, e.g. `BTC` or `XTN`
    pub code: Cow<'static, str>,
    /// Human-readable name
    pub name: Cow<'static, str>,
    /// Version bytes of private extended keys
    pub bip32_private_version: [u8; 4],
    /// Version bytes of public extended keys
    pub bip32_public_version: [u8; 4],
    /// Prefix of pay-to-pubkey-hash addresses
    pub address_prefix: u8,
    /// Prefix of pay-to-script-hash addresses
    pub script_prefix: u8,
    /// Prefix of WIF-encoded secret keys
    pub wif_prefix: u8,
}

impl Network {
    /// Version bytes for given kind of extended key
    pub fn version(&self, kind: KeyKind) -> [u8; 4] {
        match kind {
            KeyKind::Private => self.bip32_private_version,
            KeyKind::Public => self.bip32_public_version,
        }
    }
}

/// Bitcoin mainnet: `xprv`/`xpub`
pub const BITCOIN: Network = Network {
    code: Cow::Borrowed("BTC"),
    name: Cow::Borrowed("Bitcoin mainnet"),
    bip32_private_version: [0x04, 0x88, 0xad, 0xe4],
    bip32_public_version: [0x04, 0x88, 0xb2, 0x1e],
    address_prefix: 0x00,
    script_prefix: 0x05,
    wif_prefix: 0x80,
};

/// Bitcoin testnet: `tprv`/`tpub`
pub const BITCOIN_TESTNET: Network = Network {
    code: Cow::Borrowed("XTN"),
    name: Cow::Borrowed("Bitcoin testnet"),
    bip32_private_version: [0x04, 0x35, 0x83, 0x94],
    bip32_public_version: [0x04, 0x35, 0x87, 0xcf],
    address_prefix: 0x6f,
    script_prefix: 0xc4,
    wif_prefix: 0xef,
};

/// Litecoin mainnet: `Ltpv`/`Ltub`
pub const LITECOIN: Network = Network {
    code: Cow::Borrowed("LTC"),
    name: Cow::Borrowed("Litecoin mainnet"),
    bip32_private_version: [0x01, 0x9d, 0x9c, 0xfe],
    bip32_public_version: [0x01, 0x9d, 0xa4, 0x62],
    address_prefix: 0x30,
    script_prefix: 0x32,
    wif_prefix: 0xb0,
};

/// Litecoin testnet: `ttpv`/`ttub`
pub const LITECOIN_TESTNET: Network = Network {
    code: Cow::Borrowed("XLT"),
    name: Cow::Borrowed("Litecoin testnet"),
    bip32_private_version: [0x04, 0x36, 0xef, 0x7d],
    bip32_public_version: [0x04, 0x36, 0xf6, 0xe1],
    address_prefix: 0x6f,
    script_prefix: 0x3a,
    wif_prefix: 0xef,
};

/// Dogecoin mainnet: `dgpv`/`dgub`
pub const DOGECOIN: Network = Network {
    code: Cow::Borrowed("DOGE"),
    name: Cow::Borrowed("Dogecoin mainnet"),
    bip32_private_version: [0x02, 0xfa, 0xc3, 0x98],
    bip32_public_version: [0x02, 0xfa, 0xca, 0xfd],
    address_prefix: 0x1e,
    script_prefix: 0x16,
    wif_prefix: 0x9e,
};

/// Set of networks with distinct codes and distinct extended key version bytes
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<Network>", into = "Vec<Network>")
)]
pub struct NetworkRegistry {
    networks: Vec<Network>,
}

impl NetworkRegistry {
    /// Constructs a registry
    ///
    /// Returns error if two networks share a code, or if any version bytes are used twice
    /// (including private and public versions of the same network).
    pub fn new(networks: impl IntoIterator<Item = Network>) -> Result<Self, DuplicateNetwork> {
        let mut registry = Self {
            networks: Vec::new(),
        };
        for network in networks {
            let conflicts = network.bip32_private_version == network.bip32_public_version
                || registry.by_code(&network.code).is_some()
                || registry.by_version(&network.bip32_private_version).is_some()
                || registry.by_version(&network.bip32_public_version).is_some();
            if conflicts {
                return Err(DuplicateNetwork {
                    code: network.code.into_owned(),
                });
            }
            registry.networks.push(network);
        }
        Ok(registry)
    }

    /// Registry of well-known networks: [BITCOIN], [BITCOIN_TESTNET], [LITECOIN],
    /// [LITECOIN_TESTNET], [DOGECOIN]
    pub fn builtin() -> Self {
        Self {
            networks: vec![
                BITCOIN,
                BITCOIN_TESTNET,
                LITECOIN,
                LITECOIN_TESTNET,
                DOGECOIN,
            ],
        }
    }

    /// Looks up a network by its code
    pub fn by_code(&self, code: &str) -> Option<&Network> {
        self.networks.iter().find(|network| network.code == code)
    }

    /// Looks up a network by extended key version bytes
    pub fn by_version(&self, version: &[u8; 4]) -> Option<(&Network, KeyKind)> {
        self.networks.iter().find_map(|network| {
            if &network.bip32_private_version == version {
                Some((network, KeyKind::Private))
            } else if &network.bip32_public_version == version {
                Some((network, KeyKind::Public))
            } else {
                None
            }
        })
    }

    /// All networks in the registry
    pub fn networks(&self) -> &[Network] {
        &self.networks
    }
}

impl Default for NetworkRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TryFrom<Vec<Network>> for NetworkRegistry {
    type Error = DuplicateNetwork;
    fn try_from(networks: Vec<Network>) -> Result<Self, Self::Error> {
        Self::new(networks)
    }
}

impl From<NetworkRegistry> for Vec<Network> {
    fn from(registry: NetworkRegistry) -> Self {
        registry.networks
    }
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use super::{KeyKind, Network, NetworkRegistry, BITCOIN, BITCOIN_TESTNET, DOGECOIN};

    #[test]
    fn builtin_registry_is_consistent() {
        let builtin = NetworkRegistry::builtin();
        let validated = NetworkRegistry::new(builtin.networks().to_vec()).unwrap();
        assert_eq!(builtin, validated);
    }

    #[test]
    fn lookup_by_version() {
        let registry = NetworkRegistry::builtin();

        let (network, kind) = registry.by_version(&[0x04, 0x88, 0xad, 0xe4]).unwrap();
        assert_eq!(network, &BITCOIN);
        assert_eq!(kind, KeyKind::Private);

        let (network, kind) = registry.by_version(&[0x04, 0x35, 0x87, 0xcf]).unwrap();
        assert_eq!(network, &BITCOIN_TESTNET);
        assert_eq!(kind, KeyKind::Public);

        assert!(registry.by_version(&[0, 0, 0, 0]).is_none());
        assert_eq!(registry.by_code("DOGE"), Some(&DOGECOIN));
        assert!(registry.by_code("doge").is_none());
    }

    #[test]
    fn conflicting_networks_are_rejected() {
        let same_code = Network {
            bip32_private_version: [1, 2, 3, 4],
            bip32_public_version: [1, 2, 3, 5],
            ..BITCOIN
        };
        let err = NetworkRegistry::new([BITCOIN, same_code]).unwrap_err();
        assert_eq!(err.code, "BTC");

        let same_version = Network {
            code: Cow::Borrowed("BTC2"),
            ..BITCOIN
        };
        assert!(NetworkRegistry::new([BITCOIN, same_version]).is_err());

        let public_equals_private = Network {
            code: Cow::Borrowed("ODD"),
            bip32_private_version: [9, 9, 9, 9],
            bip32_public_version: [9, 9, 9, 9],
            ..BITCOIN
        };
        assert!(NetworkRegistry::new([public_equals_private]).is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn registry_config_roundtrip() {
        let registry = NetworkRegistry::builtin();
        let config = serde_json::to_string(&registry).unwrap();
        let parsed: NetworkRegistry = serde_json::from_str(&config).unwrap();
        assert_eq!(parsed, registry);

        let duplicated = serde_json::to_string(&[BITCOIN, BITCOIN]).unwrap();
        assert!(serde_json::from_str::<NetworkRegistry>(&duplicated).is_err());
    }
}
