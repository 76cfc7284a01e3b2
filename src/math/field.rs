//! Residue arithmetic over the secp256k1 field prime
//!
//! A `FieldElement` is one residue in `[0, P)`. There is exactly one field in
//! this crate, so the modulus is the process-wide constant rather than a per
//! value parameter.

use std::fmt;
use std::ops::{Add, Mul, Sub};

use crate::error::Error;
use crate::math::bigint::BigInt256;
use crate::math::constants::FIELD_PRIME_BIGINT;

/// One residue modulo P. Immutable value type; equality is by residue value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldElement {
    num: BigInt256,
}

impl FieldElement {
    /// Create a field element, rejecting values outside `[0, P)`.
    pub fn new(num: BigInt256) -> Result<Self, Error> {
        if num >= *FIELD_PRIME_BIGINT {
            return Err(Error::Construction(format!(
                "residue {num} is not in the secp256k1 field range"
            )));
        }
        Ok(FieldElement { num })
    }

    /// The zero residue.
    pub fn zero() -> Self {
        FieldElement { num: BigInt256::zero() }
    }

    /// The one residue.
    pub fn one() -> Self {
        FieldElement { num: BigInt256::one() }
    }

    /// Create from u64 (always below P).
    pub fn from_u64(x: u64) -> Self {
        FieldElement { num: BigInt256::from_u64(x) }
    }

    /// The residue value.
    pub fn num(&self) -> &BigInt256 {
        &self.num
    }

    /// Residue as 32 big-endian bytes.
    pub fn to_bytes_be(&self) -> [u8; 32] {
        self.num.to_bytes_be()
    }

    /// Check if this is the zero residue.
    pub fn is_zero(&self) -> bool {
        self.num.is_zero()
    }

    /// Check if the residue is even.
    pub fn is_even(&self) -> bool {
        self.num.is_even()
    }

    /// Multiplicative inverse by Fermat's little theorem: a^(P-2) mod P.
    /// The zero residue has no inverse.
    pub fn invert(&self) -> Result<FieldElement, Error> {
        let inv = self
            .num
            .mod_inverse(&FIELD_PRIME_BIGINT)
            .ok_or(Error::UndefinedOperation("inverse of the zero residue"))?;
        Ok(FieldElement { num: inv })
    }

    /// Field division: `self * rhs^-1`.
    pub fn div(&self, rhs: &FieldElement) -> Result<FieldElement, Error> {
        Ok(*self * rhs.invert()?)
    }

    /// Exponentiation. The exponent is first reduced modulo P-1 (valid for
    /// the nonzero residues this protocol exponentiates).
    pub fn pow(&self, exponent: &BigInt256) -> FieldElement {
        let group_order = *FIELD_PRIME_BIGINT - BigInt256::one();
        let e = *exponent % group_order;
        FieldElement { num: self.num.mod_exp(&e, &FIELD_PRIME_BIGINT) }
    }

    /// Candidate square root: a^((P+1)/4) mod P, valid because P = 3 mod 4.
    /// The result is only a square root when `self` is a quadratic residue;
    /// callers must verify `candidate * candidate == self` before trusting it.
    pub fn sqrt(&self) -> FieldElement {
        let exp = (*FIELD_PRIME_BIGINT + BigInt256::one()) >> 2;
        FieldElement { num: self.num.mod_exp(&exp, &FIELD_PRIME_BIGINT) }
    }
}

impl Add for FieldElement {
    type Output = FieldElement;

    fn add(self, rhs: FieldElement) -> FieldElement {
        FieldElement { num: self.num.mod_add(&rhs.num, &FIELD_PRIME_BIGINT) }
    }
}

impl Sub for FieldElement {
    type Output = FieldElement;

    fn sub(self, rhs: FieldElement) -> FieldElement {
        FieldElement { num: self.num.mod_sub(&rhs.num, &FIELD_PRIME_BIGINT) }
    }
}

impl Mul for FieldElement {
    type Output = FieldElement;

    fn mul(self, rhs: FieldElement) -> FieldElement {
        FieldElement { num: self.num.mod_mul(&rhs.num, &FIELD_PRIME_BIGINT) }
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldElement({})", self.num)
    }
}
