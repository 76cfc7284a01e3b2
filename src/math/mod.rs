//! Mathematics module: fixed-width integers, field residues, curve points
//!
//! The layering is bigint -> field -> curve, with the curve constants shared
//! by the upper two.

pub mod bigint;
pub mod constants;
pub mod curve;
pub mod field;

// Re-export commonly used types
pub use bigint::{BigInt256, BigInt512};
pub use curve::Point;
pub use field::FieldElement;
