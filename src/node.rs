use core::fmt;

use generic_ec::{curves::Secp256k1, Curve, Point, SecretScalar};

use crate::{ckd, errors::Error, hash, ChainCode, ChildIndex, DerivationPath};

/// Key fingerprint: first 4 bytes of the key identifier
pub type Fingerprint = [u8; 4];

/// Node of BIP32 key tree
///
/// Node holds a public key and a chain code, and optionally a secret key. When the secret key
/// is present, public key always equals to $G \cdot \text{secret\\_key}$.
///
/// Besides the key material, node carries tree metadata: depth, fingerprint of the parent and
/// the index it was derived with. Metadata is never used in any cryptographic computation,
/// it's only needed to serialize the node as an extended key.
///
/// Node is immutable: derivation and [stripping](Self::as_public) always produce a new node.
#[derive(Clone)]
pub struct HdNode<E: Curve = Secp256k1> {
    secret_key: Option<SecretScalar<E>>,
    public_key: Point<E>,
    chain_code: ChainCode,
    depth: u8,
    parent_fingerprint: Fingerprint,
    child_index: ChildIndex,
}

impl<E: Curve> HdNode<E> {
    /// Constructs a root node from the secret key and chain code
    ///
    /// Returns error if secret key is zero
    pub fn from_secret_key(
        secret_key: SecretScalar<E>,
        chain_code: ChainCode,
    ) -> Result<Self, Error> {
        let public_key = Point::generator() * &secret_key;
        if public_key.is_zero() {
            return Err(Error::InvalidSecretKey);
        }
        Ok(Self {
            secret_key: Some(secret_key),
            public_key,
            chain_code,
            depth: 0,
            parent_fingerprint: [0; 4],
            child_index: ChildIndex::from(0u32),
        })
    }

    /// Constructs a public-only root node from the public key and chain code
    ///
    /// Returns error if public key is the point at infinity
    pub fn from_public_key(public_key: Point<E>, chain_code: ChainCode) -> Result<Self, Error> {
        if public_key.is_zero() {
            return Err(Error::InvalidPublicKey);
        }
        Ok(Self {
            secret_key: None,
            public_key,
            chain_code,
            depth: 0,
            parent_fingerprint: [0; 4],
            child_index: ChildIndex::from(0u32),
        })
    }

    /// Replaces tree metadata of the node
    ///
    /// Used when the node is restored from an extended key, as the node position in the tree
    /// can not be derived from its keys.
    pub fn with_metadata(
        self,
        depth: u8,
        parent_fingerprint: Fingerprint,
        child_index: ChildIndex,
    ) -> Self {
        Self {
            depth,
            parent_fingerprint,
            child_index,
            ..self
        }
    }

    /// Secret key, if the node has it
    pub fn secret_key(&self) -> Option<&SecretScalar<E>> {
        self.secret_key.as_ref()
    }

    /// Public key
    pub fn public_key(&self) -> &Point<E> {
        &self.public_key
    }

    /// Chain code
    pub fn chain_code(&self) -> &ChainCode {
        &self.chain_code
    }

    /// Depth in the tree, root node has depth 0
    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Fingerprint of the parent node, zeroes for the root node
    pub fn parent_fingerprint(&self) -> &Fingerprint {
        &self.parent_fingerprint
    }

    /// Index this node was derived with, `0` for the root node
    pub fn child_index(&self) -> ChildIndex {
        self.child_index
    }

    /// Checks whether the node has a secret key
    pub fn is_private(&self) -> bool {
        self.secret_key.is_some()
    }

    /// Returns a copy of the node with secret key removed
    ///
    /// All other fields are left unchanged. Public-only node can still derive non-hardened
    /// children, and they match public projection of children derived privately.
    pub fn as_public(&self) -> Self {
        Self {
            secret_key: None,
            ..self.clone()
        }
    }

    /// Key identifier: Hash160 of the compressed public key
    pub fn identifier(&self) -> [u8; 20] {
        hash::hash160(&self.public_key.to_bytes(true)[..])
    }

    /// Key fingerprint: first 4 bytes of the [identifier](Self::identifier)
    pub fn fingerprint(&self) -> Fingerprint {
        let id = self.identifier();
        [id[0], id[1], id[2], id[3]]
    }

    /// Derives a child node that keeps private key material
    ///
    /// Works for both hardened and non-hardened indexes. Returns [`Error::NoPrivateMaterial`]
    /// if this node is public-only.
    ///
    /// ### Example
    /// ```rust
    /// # let seed = b"16-64 bytes of high entropy".as_slice();
    /// let root = hd_keychain::bip32::derive_master_key(seed)?;
    ///
    /// let child = root.child_private(hd_keychain::ChildIndex::hardened(44)?)?;
    /// assert!(child.is_private());
    /// assert_eq!(child.parent_fingerprint(), &root.fingerprint());
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn child_private(&self, child_index: impl Into<ChildIndex>) -> Result<Self, Error> {
        let child_index = child_index.into();
        let secret_key = self.secret_key.as_ref().ok_or(Error::NoPrivateMaterial)?;
        let depth = self.child_depth()?;

        let (child_sk, chain_code) = ckd::derive_private_child(
            secret_key,
            &self.chain_code,
            child_index,
            Some(&self.public_key),
        )?;
        let public_key = Point::generator() * &child_sk;

        Ok(self.child(Some(child_sk), public_key, chain_code, depth, child_index))
    }

    /// Derives a public-only child node
    ///
    /// If the node has a secret key, the child is derived privately and then stripped, so
    /// hardened indexes are supported. Public-only node can only derive non-hardened children,
    /// requesting a hardened one results into [`Error::NoPrivateMaterial`].
    pub fn child_public(&self, child_index: impl Into<ChildIndex>) -> Result<Self, Error> {
        let child_index = child_index.into();
        match (&self.secret_key, child_index) {
            (Some(_), _) => self.child_private(child_index).map(|child| child.as_public()),
            (None, ChildIndex::NonHardened(i)) => {
                let depth = self.child_depth()?;
                let (public_key, chain_code) =
                    ckd::derive_public_child(&self.public_key, &self.chain_code, i)?;
                Ok(self.child(None, public_key, chain_code, depth, child_index))
            }
            (None, ChildIndex::Hardened(_)) => Err(Error::NoPrivateMaterial),
        }
    }

    /// Derives a descendant along the path, keeping private key material
    ///
    /// If path is empty, a copy of this node is returned.
    ///
    /// ### Example
    /// ```rust
    /// # let seed = b"16-64 bytes of high entropy".as_slice();
    /// let root = hd_keychain::bip32::derive_master_key(seed)?;
    ///
    /// let path: hd_keychain::DerivationPath = "m/44H/0H/0H/0/7".parse()?;
    /// let key = root.derive_path(&path)?;
    /// assert_eq!(key.depth(), 5);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn derive_path(&self, path: &DerivationPath) -> Result<Self, Error> {
        path.iter()
            .try_fold(self.clone(), |node, child_index| node.child_private(child_index))
    }

    /// Derives a public-only descendant along the path
    ///
    /// The first step already strips the secret key, so only the first index of the path
    /// may be hardened, and only if this node is private.
    pub fn derive_public_path(&self, path: &DerivationPath) -> Result<Self, Error> {
        path.iter()
            .try_fold(self.clone(), |node, child_index| node.child_public(child_index))
    }

    fn child_depth(&self) -> Result<u8, Error> {
        self.depth.checked_add(1).ok_or(Error::MaxDepthExceeded)
    }

    fn child(
        &self,
        secret_key: Option<SecretScalar<E>>,
        public_key: Point<E>,
        chain_code: ChainCode,
        depth: u8,
        child_index: ChildIndex,
    ) -> Self {
        tracing::trace!(depth, child_index = *child_index, "derived child node");
        Self {
            secret_key,
            public_key,
            chain_code,
            depth,
            parent_fingerprint: self.fingerprint(),
            child_index,
        }
    }
}

impl<E: Curve> PartialEq for HdNode<E> {
    fn eq(&self, other: &Self) -> bool {
        let same_secret_key = match (&self.secret_key, &other.secret_key) {
            (Some(a), Some(b)) => {
                bool::from(subtle::ConstantTimeEq::ct_eq(a.as_ref(), b.as_ref()))
            }
            (None, None) => true,
            _ => false,
        };
        same_secret_key
            && self.public_key == other.public_key
            && self.chain_code == other.chain_code
            && self.depth == other.depth
            && self.parent_fingerprint == other.parent_fingerprint
            && self.child_index == other.child_index
    }
}

impl<E: Curve> Eq for HdNode<E> {}

/// Debug output never reveals the secret key nor the chain code
impl<E: Curve> fmt::Debug for HdNode<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HdNode")
            .field("secret_key", &self.secret_key.as_ref().map(|_| "<redacted>"))
            .field("public_key", &self.public_key)
            .field("chain_code", &"<redacted>")
            .field("depth", &self.depth)
            .field("parent_fingerprint", &self.parent_fingerprint)
            .field("child_index", &self.child_index)
            .finish()
    }
}
