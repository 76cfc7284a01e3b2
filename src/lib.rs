//! taptweak - secp256k1 arithmetic and Taproot output-key derivation
//!
//! Hand-rolled finite-field and elliptic-curve-group arithmetic for the
//! secp256k1 curve, plus the BIP341 key-tweaking protocol: from an internal
//! key pair and an optional script commitment, deterministically derive the
//! output key pair spendable by key path (the tweaked scalar) or script path
//! (the revealed internal key).
//!
//! Every operation is a pure transformation over immutable values; the only
//! shared state is the read-only curve constants. The arithmetic is
//! deliberately variable-time: this models the reference protocol, not a
//! hardened production signer.

#![deny(unsafe_code)]

pub mod error;
pub mod hash;
pub mod math;
pub mod tweak;

// Re-export key types for library usage
pub use error::Error;
pub use hash::tagged_hash;
pub use math::bigint::BigInt256;
pub use math::curve::Point;
pub use math::field::FieldElement;
pub use tweak::{tweak_from_bytes, tweak_key_pair, TweakedKeyPair};
