use std::collections::HashSet;

use hd_keychain::{
    bip32, codec,
    generic_ec::{curves::Secp256k1, Point, Scalar, SecretScalar},
    network::{KeyKind, Network, NetworkRegistry, BITCOIN, BITCOIN_TESTNET, LITECOIN},
    ChildIndex, DerivationPath, HdNode, H,
};
use hex_literal::hex;
use proptest::prelude::*;

const SEED: [u8; 16] = hex!("000102030405060708090a0b0c0d0e0f");

fn master() -> HdNode {
    bip32::derive_master_key(&SEED).unwrap()
}

#[test]
fn public_projection_commutes_with_derivation() {
    let master = master();
    for i in [0, 1, 2, 100, 1000000000, H - 1] {
        let derived_privately = master.child_private(i).unwrap().as_public();
        let derived_publicly = master.as_public().child_public(i).unwrap();
        assert_eq!(derived_privately, derived_publicly, "index {i}");
    }
}

#[test]
fn derivation_is_deterministic() {
    let path: DerivationPath = "m/44H/0H/0H/0/7".parse().unwrap();
    let a = master().derive_path(&path).unwrap();
    let b = master().derive_path(&path).unwrap();
    assert_eq!(a, b);
    assert_eq!(
        a.to_extended_key(&BITCOIN, KeyKind::Private).unwrap(),
        b.to_extended_key(&BITCOIN, KeyKind::Private).unwrap()
    );
}

#[test]
fn hardened_children_need_private_key() {
    let public = master().as_public();
    for i in [0, 1, H - 1] {
        assert_eq!(
            public.child_public(i + H).unwrap_err(),
            hd_keychain::errors::Error::NoPrivateMaterial
        );
    }
    // Non-hardened index right below the boundary is still fine
    assert!(public.child_public(H - 1).is_ok());
}

#[test]
fn chained_derivation_keeps_metadata() {
    let a = master().child_private(3 + H).unwrap();
    let b = a.child_private(5u32).unwrap().child_private(8u32).unwrap();
    let a_child = a.child_private(5u32).unwrap();

    assert_eq!(b.depth(), a.depth() + 2);
    assert_eq!(a_child.parent_fingerprint(), &a.fingerprint());
    assert_eq!(b.parent_fingerprint(), &a_child.fingerprint());
    assert_eq!(u32::from(b.child_index()), 8);

    let path: DerivationPath = "m/3H/5/8".parse().unwrap();
    assert_eq!(master().derive_path(&path).unwrap(), b);
}

#[test]
fn derive_public_path_matches_private_path() {
    let account = master().child_private(44 + H).unwrap();
    let path: DerivationPath = "m/0/7/12".parse().unwrap();

    let private = account.derive_path(&path).unwrap();
    let public = account.as_public().derive_public_path(&path).unwrap();
    assert_eq!(private.as_public(), public);

    // Hardened first step is allowed for a private node only
    let hardened: DerivationPath = "m/1H/2".parse().unwrap();
    assert!(account.derive_public_path(&hardened).is_ok());
    assert!(account.as_public().derive_public_path(&hardened).is_err());

    assert_eq!(account.derive_path(&DerivationPath::root()).unwrap(), account);
}

#[test]
fn golden_vector_for_secret_exponent_one() {
    let root: HdNode = HdNode::from_secret_key(
        SecretScalar::new(&mut Scalar::one()),
        hex!("873dff81c02f525623fd1fe5167eac3a55a049de3d314bb42ee227ffed37d508"),
    )
    .unwrap();

    let child = root.as_public().child_public(0u32).unwrap();
    assert_eq!(
        &child.public_key().to_bytes(true)[..],
        &hex!("02a0e9ab787e3c02f89f8e84004bee4c464d1b1961f757efa2bb4f37cda8e6bd4c"),
    );
    assert_eq!(
        child.chain_code(),
        &hex!("e942a1ed56bcd9816d066ada8ab7c05e81b6b5135a4c6441c6fd675269070abf"),
    );
    assert_eq!(child, root.child_private(0u32).unwrap().as_public());
}

#[test]
fn siblings_are_pairwise_distinct() {
    let master = master();
    let mut public_keys = HashSet::new();
    let mut chain_codes = HashSet::new();
    for i in (0..10).chain((0..10).map(|i| i + H)) {
        let child = master.child_private(i).unwrap();
        public_keys.insert(child.public_key().to_bytes(true)[..].to_vec());
        chain_codes.insert(*child.chain_code());
    }
    assert_eq!(public_keys.len(), 20);
    assert_eq!(chain_codes.len(), 20);
}

#[test]
fn index_encoding_includes_hardened_bit() {
    let hardened = master().child_private(ChildIndex::hardened(0).unwrap()).unwrap();
    let payload = codec::encode_payload(&hardened, &BITCOIN, KeyKind::Public).unwrap();
    assert_eq!(&payload[9..13], &hex!("80000000"));

    let normal = master().child_private(0u32).unwrap();
    let payload = codec::encode_payload(&normal, &BITCOIN, KeyKind::Public).unwrap();
    assert_eq!(&payload[9..13], &hex!("00000000"));
    assert_ne!(hardened.public_key(), normal.public_key());
}

#[test]
fn serialization_roundtrips_under_several_networks() {
    let custom = Network {
        code: "TEST".into(),
        name: "Custom network".into(),
        bip32_private_version: hex!("01020304"),
        bip32_public_version: hex!("05060708"),
        ..BITCOIN
    };
    let registry = NetworkRegistry::new([BITCOIN, BITCOIN_TESTNET, LITECOIN, custom]).unwrap();

    let path: DerivationPath = "m/0H/1/2H".parse().unwrap();
    let node = master().derive_path(&path).unwrap();

    for network in registry.networks() {
        for kind in [KeyKind::Private, KeyKind::Public] {
            let text = node.to_extended_key(network, kind).unwrap();
            let decoded = codec::from_extended_key(&text, &registry).unwrap();

            assert_eq!(decoded.network, network);
            assert_eq!(decoded.kind, kind);
            match kind {
                KeyKind::Private => assert_eq!(decoded.node, node),
                KeyKind::Public => assert_eq!(decoded.node, node.as_public()),
            }
            assert_eq!(decoded.node.to_extended_key(network, kind).unwrap(), text);
        }
    }
}

proptest! {
    #[test]
    fn public_and_private_derivation_agree(
        secret_key in any::<[u8; 32]>(),
        chain_code in any::<[u8; 32]>(),
        child_index in 0..H,
    ) {
        let secret_key = Scalar::<Secp256k1>::from_be_bytes(secret_key);
        prop_assume!(secret_key.is_ok());
        let mut secret_key = secret_key.unwrap();
        prop_assume!(secret_key != Scalar::zero());

        let node = HdNode::from_secret_key(SecretScalar::new(&mut secret_key), chain_code).unwrap();
        let private_child = node.child_private(child_index).unwrap();
        let public_child = node.as_public().child_public(child_index).unwrap();

        prop_assert_eq!(
            Point::generator() * private_child.secret_key().unwrap(),
            *public_child.public_key()
        );
        prop_assert_eq!(private_child.chain_code(), public_child.chain_code());
        prop_assert_eq!(private_child.as_public(), public_child);
    }

    #[test]
    fn path_display_roundtrips(indexes in proptest::collection::vec(any::<u32>(), 0..8)) {
        let path: DerivationPath = indexes.iter().copied().collect();
        let parsed: DerivationPath = path.to_string().parse().unwrap();
        prop_assert_eq!(parsed, path);
    }
}
