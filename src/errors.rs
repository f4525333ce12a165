//! When something goes wrong
//!
//! None of the errors defined here ever carry key material or chain codes, so they are
//! safe to log and to display to the user.

/// Error returned by HD derivation and extended key decoding
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Child key is not defined for given parent key and child index
    ///
    /// It happens when $I_L \ge n$ or when derived key is zero (point at infinity). This may
    /// only occur with negligible probability, seeing it in practice means either a bug or
    /// an adversarial input. Derivation is never retried with another index internally.
    #[error("child key is not defined for child index {child_index:#010x}")]
    InvalidDerivation {
        /// Child index (with hardened bit) that was requested
        child_index: u32,
    },
    /// Operation requires secret key, but the node is public-only
    #[error("operation requires private key material, but the node is public-only")]
    NoPrivateMaterial,
    /// Extended key could not be decoded
    #[error("malformed extended key: {0}")]
    MalformedPayload(#[from] MalformedPayload),
    /// Child index doesn't fit into the range of hardened or non-hardened indexes
    #[error("child index is out of range")]
    IndexOutOfRange,
    /// Node is at depth 255, its children can not be represented
    #[error("maximum depth reached: node at depth 255 can not have children")]
    MaxDepthExceeded,
    /// Seed must be 16-64 bytes long
    #[error("seed must be 16-64 bytes long, got {0} bytes")]
    InvalidSeedLength(usize),
    /// Secret key is zero or not less than the group order
    #[error("secret key is zero or not less than the group order")]
    InvalidSecretKey,
    /// Public key is the point at infinity
    #[error("public key is the point at infinity")]
    InvalidPublicKey,
}

impl From<OutOfRange> for Error {
    fn from(_: OutOfRange) -> Self {
        Error::IndexOutOfRange
    }
}

/// Reason why an extended key was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MalformedPayload {
    /// Text is not valid base58
    #[error("invalid base58 encoding")]
    Base58,
    /// Base58check checksum doesn't match
    #[error("checksum mismatch")]
    Checksum,
    /// Payload is not 78 bytes long
    #[error("payload must be 78 bytes long, got {0} bytes")]
    Length(usize),
    /// Version bytes are not registered for any network
    #[error("unknown version bytes {0:02x?}")]
    UnknownVersion([u8; 4]),
    /// Private key material doesn't start with `0x00`
    #[error("private key material must be prefixed with 0x00")]
    KeyPrefix,
    /// Secret key is zero or not less than the group order
    #[error("secret key is zero or out of range")]
    SecretKey,
    /// Public key is not a valid compressed point
    #[error("public key is not a valid compressed curve point")]
    PublicKey,
    /// Root key (depth 0) has non-zero parent fingerprint or child index
    #[error("key at depth 0 must have zero parent fingerprint and child index")]
    RootMetadata,
}

/// Value was out of range
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("out of range")]
pub struct OutOfRange;

/// Error returned by parsing child index
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseChildIndexError {
    /// Indicates that parsing an `u32` integer failed
    #[error("child index is not valid u32 integer")]
    ParseInt(#[source] core::num::ParseIntError),
    /// Parsed index was out of acceptable range
    #[error("child index is not in acceptable range")]
    IndexNotInRange(#[source] OutOfRange),
}

/// Error returned by parsing derivation path
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParsePathError {
    /// Path has an empty component, like in `m//1` or `m/1/`
    #[error("derivation path has an empty component at position {position}")]
    EmptyComponent {
        /// Zero-based position of the component (not counting the `m` prefix)
        position: usize,
    },
    /// Component is not a valid child index
    #[error("derivation path component at position {position} is invalid")]
    InvalidIndex {
        /// Zero-based position of the component (not counting the `m` prefix)
        position: usize,
        /// Parsing error
        #[source]
        source: ParseChildIndexError,
    },
}

/// Network registry contains conflicting entries
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("network `{code}` conflicts with another network by code or version bytes")]
pub struct DuplicateNetwork {
    /// Code of the network that caused the conflict
    pub code: String,
}
