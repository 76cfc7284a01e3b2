//! secp256k1 curve constants
//!
//! Process-wide immutable data: the field prime, group order, Weierstrass
//! coefficients, and the generator point. Initialized once on first use and
//! safe to share across threads without synchronization.

use std::sync::LazyLock;

use crate::math::bigint::BigInt256;
use crate::math::curve::Point;
use crate::math::field::FieldElement;

/// Field prime p = 2^256 - 2^32 - 977.
pub const FIELD_PRIME: &str =
    "fffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2f";
/// Group order n (the number of points on the curve).
pub const CURVE_ORDER: &str =
    "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141";
pub const GENERATOR_X: &str =
    "79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";
pub const GENERATOR_Y: &str =
    "483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8";

/// Weierstrass coefficient A in y^2 = x^3 + A*x + B.
pub const CURVE_A: u64 = 0;
/// Weierstrass coefficient B in y^2 = x^3 + A*x + B.
pub const CURVE_B: u64 = 7;

pub static FIELD_PRIME_BIGINT: LazyLock<BigInt256> =
    LazyLock::new(|| BigInt256::from_hex(FIELD_PRIME).expect("valid field prime"));

pub static CURVE_ORDER_BIGINT: LazyLock<BigInt256> =
    LazyLock::new(|| BigInt256::from_hex(CURVE_ORDER).expect("valid curve order"));

pub static CURVE_A_ELEMENT: LazyLock<FieldElement> =
    LazyLock::new(|| FieldElement::from_u64(CURVE_A));

pub static CURVE_B_ELEMENT: LazyLock<FieldElement> =
    LazyLock::new(|| FieldElement::from_u64(CURVE_B));

/// The fixed base point G.
pub static GENERATOR: LazyLock<Point> = LazyLock::new(|| {
    let x = FieldElement::new(BigInt256::from_hex(GENERATOR_X).expect("valid generator x"))
        .expect("generator x is in the field");
    let y = FieldElement::new(BigInt256::from_hex(GENERATOR_Y).expect("valid generator y"))
        .expect("generator y is in the field");
    Point::new(x, y).expect("generator is on the curve")
});
