//! BIP32-specific functions

use generic_ec::{curves::Secp256k1, Scalar, SecretScalar};
use hmac::Mac as _;

use crate::{errors::Error, HdNode};

/// Derives a master key from the seed
///
/// Seed must be 16-64 bytes long, otherwise an error is returned. Returns
/// [`Error::InvalidSecretKey`] if derived secret key is zero or not less than the group
/// order, in which case BIP32 asks to proceed with another seed.
pub fn derive_master_key(seed: &[u8]) -> Result<HdNode<Secp256k1>, Error> {
    if !(16 <= seed.len() && seed.len() <= 64) {
        return Err(Error::InvalidSeedLength(seed.len()));
    }

    let i = crate::HmacSha512::new_from_slice(b"Bitcoin seed")
        .expect("this never fails: hmac can handle keys of any size")
        .chain_update(seed)
        .finalize()
        .into_bytes();
    let (i_left, i_right) = crate::split_into_two_halves(&i);

    let mut secret_key =
        Scalar::<Secp256k1>::from_be_bytes(i_left).map_err(|_| Error::InvalidSecretKey)?;
    HdNode::from_secret_key(SecretScalar::new(&mut secret_key), (*i_right).into())
}
