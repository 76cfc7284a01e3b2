//! secp256k1 group of rational points
//!
//! Affine representation with a distinguished point at infinity, group-law
//! addition, double-and-add scalar multiplication, and the compressed,
//! uncompressed, and x-only wire encodings. Operations are deterministic and
//! variable-time.

use std::fmt;

use crate::error::Error;
use crate::math::bigint::BigInt256;
use crate::math::constants::{CURVE_A_ELEMENT, CURVE_B_ELEMENT, CURVE_ORDER_BIGINT, GENERATOR};
use crate::math::field::FieldElement;

/// Even-y compressed key prefix.
const PREFIX_EVEN: u8 = 0x02;
/// Odd-y compressed key prefix.
const PREFIX_ODD: u8 = 0x03;
/// Uncompressed key prefix.
const PREFIX_UNCOMPRESSED: u8 = 0x04;

/// A point on the curve, or the point at infinity (the group identity).
/// Immutable; every group operation returns a new point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    // None encodes infinity. Kept private so every affine point in existence
    // has passed the curve-equation check.
    coords: Option<(FieldElement, FieldElement)>,
}

impl Point {
    /// The point at infinity.
    pub fn infinity() -> Self {
        Point { coords: None }
    }

    /// Create an affine point, validating `y^2 = x^3 + 7`.
    pub fn new(x: FieldElement, y: FieldElement) -> Result<Self, Error> {
        if y * y != Self::curve_rhs(&x) {
            return Err(Error::Construction(format!(
                "({}, {}) is not on the secp256k1 curve",
                x.num(),
                y.num()
            )));
        }
        Ok(Point { coords: Some((x, y)) })
    }

    /// Derive the public point for a private scalar: `d * G`.
    /// The scalar must lie in `[1, N)`.
    pub fn from_private_key(d: &BigInt256) -> Result<Self, Error> {
        if d.is_zero() || d >= &*CURVE_ORDER_BIGINT {
            return Err(Error::Construction(format!(
                "private scalar {d} is not in [1, N)"
            )));
        }
        Ok(GENERATOR.mul(d))
    }

    /// Check if this is the point at infinity.
    pub fn is_infinity(&self) -> bool {
        self.coords.is_none()
    }

    /// X coordinate, if not infinity.
    pub fn x(&self) -> Option<FieldElement> {
        self.coords.map(|(x, _)| x)
    }

    /// Y coordinate, if not infinity.
    pub fn y(&self) -> Option<FieldElement> {
        self.coords.map(|(_, y)| y)
    }

    /// True iff the point is affine with an even y coordinate.
    pub fn is_even_y(&self) -> bool {
        matches!(self.coords, Some((_, y)) if y.is_even())
    }

    /// Check the curve equation. Infinity counts as on-curve.
    pub fn is_on_curve(&self) -> bool {
        match self.coords {
            None => true,
            Some((x, y)) => y * y == Self::curve_rhs(&x),
        }
    }

    /// Additive inverse: `(x, P - y)`; infinity negates to itself.
    pub fn negate(&self) -> Point {
        match self.coords {
            None => *self,
            Some((x, y)) => Point { coords: Some((x, FieldElement::zero() - y)) },
        }
    }

    /// Group-law addition. Cases in order: identity, additive inverses,
    /// chord, vertical tangent, doubling.
    pub fn add(&self, other: &Point) -> Point {
        let (x1, y1) = match self.coords {
            None => return *other,
            Some(c) => c,
        };
        let (x2, y2) = match other.coords {
            None => return *self,
            Some(c) => c,
        };

        // Same x, different y: the points are additive inverses.
        if x1 == x2 && y1 != y2 {
            return Point::infinity();
        }

        // Chord through two distinct points.
        if x1 != x2 {
            let slope = (y2 - y1)
                * (x2 - x1).invert().expect("x coordinates differ");
            let x3 = slope * slope - x1 - x2;
            let y3 = slope * (x1 - x3) - y1;
            return Point { coords: Some((x3, y3)) };
        }

        // Equal points with y = 0: the tangent is vertical.
        if y1.is_zero() {
            return Point::infinity();
        }

        // Doubling: slope of the tangent is 3x^2 / 2y.
        let slope = (FieldElement::from_u64(3) * x1 * x1)
            .div(&(FieldElement::from_u64(2) * y1))
            .expect("y is nonzero");
        let x3 = slope * slope - x1 - x1;
        let y3 = slope * (x1 - x3) - y1;
        Point { coords: Some((x3, y3)) }
    }

    /// Scalar multiplication `k * self` by double-and-add over the binary
    /// representation of `k`, O(log k) point operations. The caller must
    /// pre-reduce `k` modulo N; no implicit reduction happens here.
    pub fn mul(&self, k: &BigInt256) -> Point {
        let mut result = Point::infinity();
        let mut current = *self;
        for bit in 0..k.bit_length() {
            if k.get_bit(bit) {
                result = result.add(&current);
            }
            current = current.add(&current);
        }
        result
    }

    /// Compressed encoding: parity prefix (0x02 even / 0x03 odd) plus the
    /// 32-byte big-endian x coordinate.
    pub fn serialize_compressed(&self) -> Result<[u8; 33], Error> {
        let (x, y) = self.affine_coords()?;
        let mut out = [0u8; 33];
        out[0] = if y.is_even() { PREFIX_EVEN } else { PREFIX_ODD };
        out[1..].copy_from_slice(&x.to_bytes_be());
        Ok(out)
    }

    /// Uncompressed encoding: 0x04 plus both 32-byte coordinates.
    pub fn serialize_uncompressed(&self) -> Result<[u8; 65], Error> {
        let (x, y) = self.affine_coords()?;
        let mut out = [0u8; 65];
        out[0] = PREFIX_UNCOMPRESSED;
        out[1..33].copy_from_slice(&x.to_bytes_be());
        out[33..].copy_from_slice(&y.to_bytes_be());
        Ok(out)
    }

    /// X-only taproot encoding: the 32-byte big-endian x coordinate with the
    /// parity dropped.
    pub fn serialize_xonly(&self) -> Result<[u8; 32], Error> {
        let (x, _) = self.affine_coords()?;
        Ok(x.to_bytes_be())
    }

    /// Decode a public key from its 32-byte x-only, 33-byte compressed, or
    /// 65-byte uncompressed form. X-only keys resolve to the even-y root by
    /// convention. Any other length or prefix byte is rejected.
    pub fn from_pubkey(pubkey: &[u8]) -> Result<Point, Error> {
        match pubkey.len() {
            32 => {
                let x = Self::parse_coordinate(&pubkey[0..32])?;
                Self::lift_x(x, true)
            }
            33 => {
                let x = Self::parse_coordinate(&pubkey[1..33])?;
                match pubkey[0] {
                    PREFIX_EVEN => Self::lift_x(x, true),
                    PREFIX_ODD => Self::lift_x(x, false),
                    prefix => Err(Error::InvalidEncoding(format!(
                        "unsupported prefix byte 0x{prefix:02x} for a compressed key"
                    ))),
                }
            }
            65 => {
                if pubkey[0] != PREFIX_UNCOMPRESSED {
                    return Err(Error::InvalidEncoding(format!(
                        "unsupported prefix byte 0x{:02x} for an uncompressed key",
                        pubkey[0]
                    )));
                }
                let x = Self::parse_coordinate(&pubkey[1..33])?;
                let y = Self::parse_coordinate(&pubkey[33..65])?;
                Point::new(x, y)
            }
            n => Err(Error::InvalidEncoding(format!(
                "unsupported key length {n}, expected 32, 33, or 65 bytes"
            ))),
        }
    }

    /// Recover the point for an x coordinate, choosing the root with the
    /// requested parity. Fails `NotOnCurve` when x^3 + 7 has no square root.
    fn lift_x(x: FieldElement, want_even_y: bool) -> Result<Point, Error> {
        let alpha = Self::curve_rhs(&x);
        let beta = alpha.sqrt();
        if beta * beta != alpha {
            return Err(Error::NotOnCurve);
        }
        let y = if beta.is_even() == want_even_y {
            beta
        } else {
            FieldElement::zero() - beta
        };
        Ok(Point { coords: Some((x, y)) })
    }

    fn parse_coordinate(bytes: &[u8]) -> Result<FieldElement, Error> {
        let mut buf = [0u8; 32];
        buf.copy_from_slice(bytes);
        FieldElement::new(BigInt256::from_bytes_be(&buf))
    }

    /// Right-hand side of the curve equation: x^3 + A*x + B.
    fn curve_rhs(x: &FieldElement) -> FieldElement {
        *x * *x * *x + *CURVE_A_ELEMENT * *x + *CURVE_B_ELEMENT
    }

    fn affine_coords(&self) -> Result<(FieldElement, FieldElement), Error> {
        self.coords.ok_or_else(|| {
            Error::Construction("cannot serialize the point at infinity".to_string())
        })
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.coords {
            None => write!(f, "Point(infinity)"),
            Some((x, y)) => write!(f, "Point({}, {})", x.num().to_hex(), y.num().to_hex()),
        }
    }
}
