//! Error taxonomy for field, curve, and tweak operations
//!
//! Every fallible operation surfaces its error synchronously to the caller;
//! nothing is retried or defaulted internally.

use thiserror::Error;

/// Errors produced by field arithmetic, point construction/decoding, and the
/// tweak pipeline.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A value violated a construction-time invariant: a residue outside
    /// `[0, P)`, coordinates violating the curve equation, a private scalar
    /// outside `[1, N)`, or an attempt to serialize the point at infinity.
    #[error("construction error: {0}")]
    Construction(String),

    /// Division, inversion, or a derived operation was attempted on an
    /// operand that has no result in the field (the zero residue).
    #[error("undefined field operation: {0}")]
    UndefinedOperation(&'static str),

    /// Candidate square root recovered while decoding an x coordinate does
    /// not satisfy `beta^2 == alpha`: no point with that x exists.
    #[error("point is not on the secp256k1 curve")]
    NotOnCurve,

    /// Unsupported public-key buffer length or prefix byte.
    #[error("invalid public key encoding: {0}")]
    InvalidEncoding(String),

    /// Commitment length outside {0, 32} bytes.
    #[error("commitment must be empty or 32 bytes, got {0} bytes")]
    InvalidCommitment(usize),

    /// The tweak degenerated: out-of-range tweak scalar, zero tweaked key,
    /// point at infinity, or a failed `d' * G == Q` verification.
    #[error("tweak failure: {0}")]
    TweakFailure(&'static str),
}
