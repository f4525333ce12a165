//! Rendering keys as addresses and WIF
//!
//! Thin encoding helpers that consume only the public key or the secret key of a node.
//! Address policy beyond pay-to-pubkey-hash is out of scope of this crate.

use generic_ec::{Curve, Point, SecretScalar};
use zeroize::Zeroizing;

use crate::{errors::Error, hash, network::Network, HdNode};

/// Renders pay-to-pubkey-hash address: base58check of `address_prefix ‖ hash160(public_key)`
pub fn p2pkh_address<E: Curve>(
    public_key: &Point<E>,
    network: &Network,
    compressed: bool,
) -> String {
    let mut data = Vec::with_capacity(21);
    data.push(network.address_prefix);
    data.extend_from_slice(&hash::hash160(&public_key.to_bytes(compressed)[..]));
    bs58::encode(data).with_check().into_string()
}

/// Renders secret key in Wallet Import Format
///
/// `compressed` flag tells wallets that the key is used with compressed public key.
pub fn wif<E: Curve>(secret_key: &SecretScalar<E>, network: &Network, compressed: bool) -> String {
    let mut data = Zeroizing::new(Vec::with_capacity(34));
    data.push(network.wif_prefix);
    data.extend_from_slice(&secret_key.as_ref().to_be_bytes()[..]);
    if compressed {
        data.push(0x01);
    }
    bs58::encode(&data[..]).with_check().into_string()
}

impl<E: Curve> HdNode<E> {
    /// Pay-to-pubkey-hash address of the node's compressed public key
    pub fn address(&self, network: &Network) -> String {
        p2pkh_address(self.public_key(), network, true)
    }

    /// Secret key of the node in WIF (compressed)
    ///
    /// Returns [`Error::NoPrivateMaterial`] if node is public-only
    pub fn wif(&self, network: &Network) -> Result<String, Error> {
        let secret_key = self.secret_key().ok_or(Error::NoPrivateMaterial)?;
        Ok(wif(secret_key, network, true))
    }
}
