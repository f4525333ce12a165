//! Extended key codec
//!
//! Serializes [`HdNode`] into the 78-byte payload defined by BIP32 and its base58check text
//! form (`xprv...`/`xpub...`):
//!
//! | bytes    | field                                                      |
//! |----------|------------------------------------------------------------|
//! | `0..4`   | version bytes, see [`Network::version`]                    |
//! | `4`      | depth                                                      |
//! | `5..9`   | parent fingerprint                                         |
//! | `9..13`  | child index, big-endian, hardened bit included             |
//! | `13..45` | chain code                                                 |
//! | `45..78` | `0x00 ‖ secret key` or compressed public key               |
//!
//! Decoding is the exact inverse. Version bytes are resolved via [`NetworkRegistry`], so the
//! decoder learns both the network and whether the key is private.

use generic_ec::{curves::Secp256k1, Point, Scalar, SecretScalar};
use zeroize::Zeroizing;

use crate::{
    errors::{Error, MalformedPayload},
    network::{KeyKind, Network, NetworkRegistry},
    ChildIndex, HdNode,
};

/// Size of serialized extended key (without checksum)
pub const PAYLOAD_LEN: usize = 78;

/// Serialized extended key, wiped from memory on drop
pub type Payload = Zeroizing<[u8; PAYLOAD_LEN]>;

/// Decoded extended key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded<'r> {
    /// Network the version bytes belong to
    pub network: &'r Network,
    /// Whether extended key was private or public
    pub kind: KeyKind,
    /// Decoded node, it has a secret key iff `kind` is [`KeyKind::Private`]
    pub node: HdNode<Secp256k1>,
}

/// Serializes the node into 78-byte payload
///
/// Returns [`Error::NoPrivateMaterial`] if private serialization is requested for a
/// public-only node.
pub fn encode_payload(
    node: &HdNode<Secp256k1>,
    network: &Network,
    kind: KeyKind,
) -> Result<Payload, Error> {
    let mut payload = Zeroizing::new([0u8; PAYLOAD_LEN]);
    payload[0..4].copy_from_slice(&network.version(kind));
    payload[4] = node.depth();
    payload[5..9].copy_from_slice(node.parent_fingerprint());
    payload[9..13].copy_from_slice(&u32::from(node.child_index()).to_be_bytes());
    payload[13..45].copy_from_slice(node.chain_code());
    match kind {
        KeyKind::Private => {
            let secret_key = node.secret_key().ok_or(Error::NoPrivateMaterial)?;
            payload[45] = 0x00;
            payload[46..78].copy_from_slice(&secret_key.as_ref().to_be_bytes()[..]);
        }
        KeyKind::Public => {
            payload[45..78].copy_from_slice(&node.public_key().to_bytes(true)[..]);
        }
    }
    Ok(payload)
}

/// Serializes the node as base58check string, e.g. `xprv...` or `xpub...`
pub fn to_extended_key(
    node: &HdNode<Secp256k1>,
    network: &Network,
    kind: KeyKind,
) -> Result<String, Error> {
    let payload = encode_payload(node, network, kind)?;
    Ok(bs58::encode(&payload[..]).with_check().into_string())
}

/// Parses 78-byte payload
pub fn decode_payload<'r>(
    payload: &[u8],
    registry: &'r NetworkRegistry,
) -> Result<Decoded<'r>, Error> {
    if payload.len() != PAYLOAD_LEN {
        return Err(reject(MalformedPayload::Length(payload.len())));
    }

    let version: [u8; 4] = take(&payload[0..4]);
    let (network, kind) = registry
        .by_version(&version)
        .ok_or_else(|| reject(MalformedPayload::UnknownVersion(version)))?;

    let depth = payload[4];
    let parent_fingerprint: [u8; 4] = take(&payload[5..9]);
    let child_index = ChildIndex::from(u32::from_be_bytes(take(&payload[9..13])));
    let chain_code: [u8; 32] = take(&payload[13..45]);
    if depth == 0 && (parent_fingerprint != [0; 4] || *child_index != 0) {
        return Err(reject(MalformedPayload::RootMetadata));
    }

    let key = &payload[45..78];
    let node = match kind {
        KeyKind::Private => {
            if key[0] != 0x00 {
                return Err(reject(MalformedPayload::KeyPrefix));
            }
            let mut secret_key = Scalar::<Secp256k1>::from_be_bytes(&key[1..])
                .map_err(|_| reject(MalformedPayload::SecretKey))?;
            HdNode::from_secret_key(SecretScalar::new(&mut secret_key), chain_code)
                .map_err(|_| reject(MalformedPayload::SecretKey))?
        }
        KeyKind::Public => {
            // Compressed SEC1 form only
            if !matches!(key[0], 0x02 | 0x03) {
                return Err(reject(MalformedPayload::PublicKey));
            }
            let public_key = Point::<Secp256k1>::from_bytes(key)
                .map_err(|_| reject(MalformedPayload::PublicKey))?;
            HdNode::from_public_key(public_key, chain_code)
                .map_err(|_| reject(MalformedPayload::PublicKey))?
        }
    };

    Ok(Decoded {
        network,
        kind,
        node: node.with_metadata(depth, parent_fingerprint, child_index),
    })
}

/// Parses base58check extended key
pub fn from_extended_key<'r>(
    extended_key: &str,
    registry: &'r NetworkRegistry,
) -> Result<Decoded<'r>, Error> {
    let payload = bs58::decode(extended_key)
        .with_check(None)
        .into_vec()
        .map(Zeroizing::new)
        .map_err(|err| match err {
            bs58::decode::Error::InvalidChecksum { .. } => reject(MalformedPayload::Checksum),
            _ => reject(MalformedPayload::Base58),
        })?;
    decode_payload(&payload, registry)
}

impl HdNode<Secp256k1> {
    /// Serializes the node as base58check extended key
    ///
    /// Alias for [`to_extended_key`]
    pub fn to_extended_key(&self, network: &Network, kind: KeyKind) -> Result<String, Error> {
        to_extended_key(self, network, kind)
    }
}

fn reject(reason: MalformedPayload) -> Error {
    tracing::debug!(%reason, "extended key rejected");
    Error::MalformedPayload(reason)
}

/// Copies slice into array, slice length must be exactly `N`
fn take<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    out
}
