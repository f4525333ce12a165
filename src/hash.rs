//! Hash functions used for key identifiers and addresses

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// Computes SHA-256 of the input
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Computes Hash160: RIPEMD-160(SHA-256(data))
///
/// Hash160 of the compressed public key is the key identifier, its first 4 bytes form
/// the key fingerprint.
pub fn hash160(data: &[u8]) -> [u8; 20] {
    Ripemd160::digest(sha256(data)).into()
}
