//! Child key derivation (CKD) functions
//!
//! Two pure functions form the core of BIP32:
//! * [`derive_private_child`] maps a parent secret key and chain code to a child secret key and
//!   chain code, for both hardened and non-hardened indexes
//! * [`derive_public_child`] maps a parent public key and chain code to a child public key and
//!   chain code. It only accepts [`NonHardenedIndex`], as hardened derivation requires the
//!   parent secret key.
//!
//! For any non-hardened index, public key of the child derived by [`derive_private_child`]
//! equals to the public key derived by [`derive_public_child`] from the parent public key, and
//! chain codes are identical as well.
//!
//! Derivation fails with [`Error::InvalidDerivation`] when $I_L \ge n$ or when the child key
//! degenerates to zero. Probability of that is lower than $2^{-127}$. Unlike SLIP10, BIP32 does
//! not define a retry procedure: if the caller wants to skip to the next index, it must do it
//! on its own.

use generic_ec::{Curve, Point, Scalar, SecretScalar};
use hmac::Mac as _;

use crate::{errors::Error, ChainCode, ChildIndex, HmacSha512, NonHardenedIndex};

/// Derives child secret key and chain code from the parent secret key
///
/// `public_key` is an optional precomputed parent public key, it's only used for non-hardened
/// derivation. If it's `None`, it's computed from `secret_key`. The caller is responsible
/// to provide a public key that matches the secret key.
///
/// ### Example
/// ```rust
/// use hd_keychain::{ckd, ChildIndex};
/// use hd_keychain::generic_ec::{curves::Secp256k1, Point, Scalar, SecretScalar};
///
/// let secret_key = SecretScalar::<Secp256k1>::new(&mut Scalar::one());
/// let chain_code = [7u8; 32];
///
/// let (child_sk, child_chain_code) =
///     ckd::derive_private_child(&secret_key, &chain_code, ChildIndex::hardened(0)?, None)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn derive_private_child<E: Curve>(
    secret_key: &SecretScalar<E>,
    chain_code: &ChainCode,
    child_index: ChildIndex,
    public_key: Option<&Point<E>>,
) -> Result<(SecretScalar<E>, ChainCode), Error> {
    let hmac = HmacSha512::new_from_slice(chain_code)
        .expect("this never fails: hmac can handle keys of any size");
    let i = match child_index {
        ChildIndex::Hardened(_) => hmac
            .chain_update([0x00])
            .chain_update(secret_key.as_ref().to_be_bytes())
            .chain_update(child_index.to_be_bytes())
            .finalize()
            .into_bytes(),
        ChildIndex::NonHardened(_) => {
            let public_key = match public_key {
                Some(public_key) => *public_key,
                None => Point::generator() * secret_key,
            };
            hmac.chain_update(&public_key.to_bytes(true))
                .chain_update(child_index.to_be_bytes())
                .finalize()
                .into_bytes()
        }
    };
    let (i_left, i_right) = crate::split_into_two_halves(&i);

    let shift =
        Scalar::<E>::from_be_bytes(i_left).map_err(|_| undefined_child_key(child_index))?;
    let mut child_sk = secret_key + shift;
    if bool::from(subtle::ConstantTimeEq::ct_eq(&child_sk, &Scalar::zero())) {
        return Err(undefined_child_key(child_index));
    }

    Ok((SecretScalar::new(&mut child_sk), (*i_right).into()))
}

/// Derives child public key and chain code from the parent public key
///
/// ### Example
/// ```rust
/// use hd_keychain::{ckd, NonHardenedIndex};
/// use hd_keychain::generic_ec::{curves::Secp256k1, Point, Scalar};
///
/// let public_key = Point::<Secp256k1>::generator() * Scalar::<Secp256k1>::one();
/// let chain_code = [7u8; 32];
///
/// let (child_pk, child_chain_code) =
///     ckd::derive_public_child(&public_key, &chain_code, NonHardenedIndex::try_from(3u32)?)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn derive_public_child<E: Curve>(
    public_key: &Point<E>,
    chain_code: &ChainCode,
    child_index: NonHardenedIndex,
) -> Result<(Point<E>, ChainCode), Error> {
    let i = HmacSha512::new_from_slice(chain_code)
        .expect("this never fails: hmac can handle keys of any size")
        .chain_update(&public_key.to_bytes(true))
        .chain_update(child_index.to_be_bytes())
        .finalize()
        .into_bytes();
    let (i_left, i_right) = crate::split_into_two_halves(&i);

    let shift = Scalar::<E>::from_be_bytes(i_left)
        .map_err(|_| undefined_child_key(child_index.into()))?;
    let child_pk = *public_key + Point::generator() * shift;
    if child_pk.is_zero() {
        return Err(undefined_child_key(child_index.into()));
    }

    Ok((child_pk, (*i_right).into()))
}

fn undefined_child_key(child_index: ChildIndex) -> Error {
    tracing::error!(
        child_index = *child_index,
        hardened = child_index.is_hardened(),
        "child key is not defined for this index, this is extremely unlikely to happen by chance"
    );
    Error::InvalidDerivation {
        child_index: child_index.into(),
    }
}
