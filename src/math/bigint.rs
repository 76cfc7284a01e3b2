//! Fixed-width 256-bit integer arithmetic
//!
//! `BigInt256` is the coordinate and scalar carrier for the curve layer;
//! `BigInt512` is the widening target for products before modular reduction.
//! All routines are deterministic and variable-time.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Rem, Shl, Shr, Sub};

use crate::error::Error;

/// 256-bit unsigned integer as 4 u64 limbs in little-endian order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BigInt256 {
    /// Limbs in little-endian order (limbs[0] is least significant).
    pub limbs: [u64; 4],
}

/// 512-bit unsigned integer as 8 u64 limbs in little-endian order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BigInt512 {
    /// Limbs in little-endian order (limbs[0] is least significant).
    pub limbs: [u64; 8],
}

impl BigInt256 {
    /// Create zero.
    pub fn zero() -> Self {
        BigInt256 { limbs: [0; 4] }
    }

    /// Create one.
    pub fn one() -> Self {
        BigInt256 { limbs: [1, 0, 0, 0] }
    }

    /// Create from u64.
    pub fn from_u64(x: u64) -> Self {
        BigInt256 { limbs: [x, 0, 0, 0] }
    }

    /// Parse a big-endian hex string of up to 64 digits, with or without a
    /// `0x` prefix. Shorter strings are left-padded with zeros.
    pub fn from_hex(s: &str) -> Result<Self, Error> {
        let s = s.trim_start_matches("0x");
        if s.is_empty() || s.len() > 64 {
            return Err(Error::InvalidEncoding(format!(
                "hex string must be 1..=64 digits, got {}",
                s.len()
            )));
        }
        let mut padded = String::with_capacity(64);
        for _ in s.len()..64 {
            padded.push('0');
        }
        padded.push_str(s);
        let bytes = hex::decode(&padded)
            .map_err(|e| Error::InvalidEncoding(format!("invalid hex digit: {e}")))?;
        let mut buf = [0u8; 32];
        buf.copy_from_slice(&bytes);
        Ok(Self::from_bytes_be(&buf))
    }

    /// Create from 32 big-endian bytes.
    pub fn from_bytes_be(bytes: &[u8; 32]) -> Self {
        let mut limbs = [0u64; 4];
        for i in 0..4 {
            let mut chunk = [0u8; 8];
            chunk.copy_from_slice(&bytes[i * 8..(i + 1) * 8]);
            limbs[3 - i] = u64::from_be_bytes(chunk);
        }
        BigInt256 { limbs }
    }

    /// Convert to 32 big-endian bytes.
    pub fn to_bytes_be(&self) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        for i in 0..4 {
            bytes[i * 8..(i + 1) * 8].copy_from_slice(&self.limbs[3 - i].to_be_bytes());
        }
        bytes
    }

    /// Convert to a 64-digit lowercase hex string.
    pub fn to_hex(&self) -> String {
        format!(
            "{:016x}{:016x}{:016x}{:016x}",
            self.limbs[3], self.limbs[2], self.limbs[1], self.limbs[0]
        )
    }

    /// Check if zero.
    pub fn is_zero(&self) -> bool {
        self.limbs == [0; 4]
    }

    /// Check if even.
    pub fn is_even(&self) -> bool {
        (self.limbs[0] & 1) == 0
    }

    /// Number of significant bits (0 for zero).
    pub fn bit_length(&self) -> usize {
        for i in (0..4).rev() {
            if self.limbs[i] != 0 {
                return 64 * (i + 1) - self.limbs[i].leading_zeros() as usize;
            }
        }
        0
    }

    /// Get bit at position (false beyond bit 255).
    pub fn get_bit(&self, bit: usize) -> bool {
        if bit >= 256 {
            return false;
        }
        (self.limbs[bit / 64] >> (bit % 64)) & 1 == 1
    }

    /// Addition with carry-out.
    pub fn overflowing_add(&self, other: &BigInt256) -> (BigInt256, bool) {
        let mut result = [0u64; 4];
        let mut carry = false;
        for i in 0..4 {
            let (sum, c1) = self.limbs[i].overflowing_add(other.limbs[i]);
            let (sum, c2) = sum.overflowing_add(carry as u64);
            result[i] = sum;
            carry = c1 || c2;
        }
        (BigInt256 { limbs: result }, carry)
    }

    /// Subtraction wrapping modulo 2^256, with borrow-out.
    pub fn overflowing_sub(&self, other: &BigInt256) -> (BigInt256, bool) {
        let mut result = [0u64; 4];
        let mut borrow = false;
        for i in 0..4 {
            let (diff, b1) = self.limbs[i].overflowing_sub(other.limbs[i]);
            let (diff, b2) = diff.overflowing_sub(borrow as u64);
            result[i] = diff;
            borrow = b1 || b2;
        }
        (BigInt256 { limbs: result }, borrow)
    }

    fn wrapping_sub(&self, other: &BigInt256) -> BigInt256 {
        self.overflowing_sub(other).0
    }

    /// Shift left by one bit, with carry-out.
    fn overflowing_shl1(&self) -> (BigInt256, bool) {
        let mut result = [0u64; 4];
        let mut carry = 0u64;
        for i in 0..4 {
            result[i] = (self.limbs[i] << 1) | carry;
            carry = self.limbs[i] >> 63;
        }
        (BigInt256 { limbs: result }, carry == 1)
    }

    /// Widening product: 256 x 256 -> 512 bits (schoolbook).
    pub fn mul_wide(&self, other: &BigInt256) -> BigInt512 {
        let mut out = [0u64; 8];
        for i in 0..4 {
            let mut carry = 0u128;
            for j in 0..4 {
                let acc = out[i + j] as u128
                    + (self.limbs[i] as u128) * (other.limbs[j] as u128)
                    + carry;
                out[i + j] = acc as u64;
                carry = acc >> 64;
            }
            out[i + 4] = carry as u64;
        }
        BigInt512 { limbs: out }
    }

    /// Modular addition; operands must already be reduced.
    pub fn mod_add(&self, other: &BigInt256, modulus: &BigInt256) -> BigInt256 {
        debug_assert!(self < modulus && other < modulus);
        let (sum, carry) = self.overflowing_add(other);
        if carry || sum >= *modulus {
            sum.wrapping_sub(modulus)
        } else {
            sum
        }
    }

    /// Modular subtraction; operands must already be reduced.
    pub fn mod_sub(&self, other: &BigInt256, modulus: &BigInt256) -> BigInt256 {
        debug_assert!(self < modulus && other < modulus);
        if self >= other {
            *self - *other
        } else {
            *modulus - (*other - *self)
        }
    }

    /// Modular multiplication via widening product and reduction.
    pub fn mod_mul(&self, other: &BigInt256, modulus: &BigInt256) -> BigInt256 {
        self.mul_wide(other).rem(modulus)
    }

    /// Modular exponentiation by square-and-multiply, LSB first.
    pub fn mod_exp(&self, exponent: &BigInt256, modulus: &BigInt256) -> BigInt256 {
        let mut result = BigInt256::one() % *modulus;
        let mut base = *self % *modulus;
        for bit in 0..exponent.bit_length() {
            if exponent.get_bit(bit) {
                result = result.mod_mul(&base, modulus);
            }
            base = base.mod_mul(&base, modulus);
        }
        result
    }

    /// Modular inverse by Fermat's little theorem: a^(m-2) mod m.
    /// The modulus must be prime. Returns `None` for the zero residue.
    pub fn mod_inverse(&self, modulus: &BigInt256) -> Option<BigInt256> {
        let reduced = *self % *modulus;
        if reduced.is_zero() {
            return None;
        }
        let exp = *modulus - BigInt256::from_u64(2);
        Some(reduced.mod_exp(&exp, modulus))
    }

    fn shift_left(&self, n: usize) -> BigInt256 {
        if n >= 256 {
            return BigInt256::zero();
        }
        let limb_shift = n / 64;
        let bit_shift = n % 64;
        let mut result = [0u64; 4];
        for i in limb_shift..4 {
            let src = i - limb_shift;
            result[i] = self.limbs[src] << bit_shift;
            if bit_shift > 0 && src > 0 {
                result[i] |= self.limbs[src - 1] >> (64 - bit_shift);
            }
        }
        BigInt256 { limbs: result }
    }

    fn shift_right(&self, n: usize) -> BigInt256 {
        if n >= 256 {
            return BigInt256::zero();
        }
        let limb_shift = n / 64;
        let bit_shift = n % 64;
        let mut result = [0u64; 4];
        for i in limb_shift..4 {
            let dst = i - limb_shift;
            result[dst] = self.limbs[i] >> bit_shift;
            if bit_shift > 0 && i + 1 < 4 {
                result[dst] |= self.limbs[i + 1] << (64 - bit_shift);
            }
        }
        BigInt256 { limbs: result }
    }
}

impl BigInt512 {
    /// Create from BigInt256 (zero-extended).
    pub fn from_bigint256(x: &BigInt256) -> Self {
        BigInt512 {
            limbs: [x.limbs[0], x.limbs[1], x.limbs[2], x.limbs[3], 0, 0, 0, 0],
        }
    }

    /// Get bit at position (false beyond bit 511).
    pub fn get_bit(&self, bit: usize) -> bool {
        if bit >= 512 {
            return false;
        }
        (self.limbs[bit / 64] >> (bit % 64)) & 1 == 1
    }

    /// Remainder modulo a 256-bit value. Full-width moduli (such as the field
    /// prime and curve order) take a folding fast path; smaller moduli fall
    /// back to binary long division.
    pub fn rem(&self, modulus: &BigInt256) -> BigInt256 {
        if modulus.is_zero() {
            panic!("division by zero");
        }
        if modulus.bit_length() == 256 {
            return self.rem_folded(modulus);
        }
        let mut rem = BigInt256::zero();
        for bit in (0..512).rev() {
            let (mut shifted, carry) = rem.overflowing_shl1();
            if self.get_bit(bit) {
                shifted.limbs[0] |= 1;
            }
            // A carry means the shifted value exceeds 2^256 and therefore the
            // modulus; one subtraction brings it back below, since rem < modulus
            // implies 2*rem + 1 < 2*modulus.
            if carry || shifted >= *modulus {
                shifted = shifted.wrapping_sub(modulus);
            }
            rem = shifted;
        }
        rem
    }

    /// Folding reduction for a modulus m with 2^255 <= m < 2^256: since
    /// 2^256 = (2^256 - m) mod m, the high half folds down as
    /// `hi * (2^256 - m) + lo`, at least halving the value each round.
    fn rem_folded(&self, modulus: &BigInt256) -> BigInt256 {
        let epsilon = BigInt256::zero().wrapping_sub(modulus); // 2^256 - m
        let mut x = *self;
        loop {
            let hi = BigInt256 {
                limbs: [x.limbs[4], x.limbs[5], x.limbs[6], x.limbs[7]],
            };
            let lo = BigInt256 {
                limbs: [x.limbs[0], x.limbs[1], x.limbs[2], x.limbs[3]],
            };
            if hi.is_zero() {
                // lo < 2^256 < 2m, so at most one subtraction remains.
                return if lo >= *modulus { lo.wrapping_sub(modulus) } else { lo };
            }
            x = hi.mul_wide(&epsilon).add_bigint256(&lo);
        }
    }

    /// Add a 256-bit value into the low half, carrying upward. The sum must
    /// fit in 512 bits.
    fn add_bigint256(&self, other: &BigInt256) -> BigInt512 {
        let mut result = self.limbs;
        let mut carry = false;
        for i in 0..8 {
            let addend = if i < 4 { other.limbs[i] } else { 0 };
            let (sum, c1) = result[i].overflowing_add(addend);
            let (sum, c2) = sum.overflowing_add(carry as u64);
            result[i] = sum;
            carry = c1 || c2;
        }
        debug_assert!(!carry, "BigInt512 addition overflow");
        BigInt512 { limbs: result }
    }
}

impl PartialOrd for BigInt256 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BigInt256 {
    fn cmp(&self, other: &Self) -> Ordering {
        for i in (0..4).rev() {
            match self.limbs[i].cmp(&other.limbs[i]) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        Ordering::Equal
    }
}

impl Add for BigInt256 {
    type Output = BigInt256;

    fn add(self, rhs: BigInt256) -> BigInt256 {
        let (sum, carry) = self.overflowing_add(&rhs);
        assert!(!carry, "BigInt256 addition overflow");
        sum
    }
}

impl Sub for BigInt256 {
    type Output = BigInt256;

    fn sub(self, rhs: BigInt256) -> BigInt256 {
        let (diff, borrow) = self.overflowing_sub(&rhs);
        assert!(!borrow, "BigInt256 subtraction underflow");
        diff
    }
}

impl Rem for BigInt256 {
    type Output = BigInt256;

    fn rem(self, rhs: BigInt256) -> BigInt256 {
        BigInt512::from_bigint256(&self).rem(&rhs)
    }
}

impl Shl<usize> for BigInt256 {
    type Output = BigInt256;

    fn shl(self, rhs: usize) -> BigInt256 {
        self.shift_left(rhs)
    }
}

impl Shr<usize> for BigInt256 {
    type Output = BigInt256;

    fn shr(self, rhs: usize) -> BigInt256 {
        self.shift_right(rhs)
    }
}

impl fmt::Display for BigInt256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for i in (0..4).rev() {
            write!(f, "{:016x}", self.limbs[i])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip() {
        let v = BigInt256::from_hex(
            "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141",
        )
        .expect("valid hex");
        assert_eq!(
            v.to_hex(),
            "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141"
        );
        assert_eq!(
            BigInt256::from_hex("0x7").expect("valid hex"),
            BigInt256::from_u64(7)
        );
        assert!(BigInt256::from_hex("zz").is_err());
        assert!(BigInt256::from_hex("").is_err());
    }

    #[test]
    fn bytes_round_trip() {
        let v = BigInt256::from_hex(
            "79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798",
        )
        .expect("valid hex");
        assert_eq!(BigInt256::from_bytes_be(&v.to_bytes_be()), v);
    }

    #[test]
    fn addition_carries_across_limbs() {
        let max_limb = BigInt256 { limbs: [u64::MAX, 0, 0, 0] };
        let (sum, carry) = max_limb.overflowing_add(&BigInt256::one());
        assert!(!carry);
        assert_eq!(sum.limbs, [0, 1, 0, 0]);

        let max = BigInt256 { limbs: [u64::MAX; 4] };
        let (wrapped, carry) = max.overflowing_add(&BigInt256::one());
        assert!(carry);
        assert!(wrapped.is_zero());
    }

    #[test]
    fn subtraction_borrows_across_limbs() {
        let v = BigInt256 { limbs: [0, 1, 0, 0] };
        assert_eq!((v - BigInt256::one()).limbs, [u64::MAX, 0, 0, 0]);
    }

    #[test]
    #[should_panic(expected = "underflow")]
    fn subtraction_underflow_panics() {
        let _ = BigInt256::zero() - BigInt256::one();
    }

    #[test]
    fn ordering_compares_most_significant_limb_first() {
        let small = BigInt256 { limbs: [u64::MAX, u64::MAX, 0, 0] };
        let big = BigInt256 { limbs: [0, 0, 1, 0] };
        assert!(small < big);
        assert!(big > small);
    }

    #[test]
    fn wide_multiplication() {
        // (2^64 - 1)^2 = 2^128 - 2^65 + 1
        let v = BigInt256::from_u64(u64::MAX);
        let prod = v.mul_wide(&v);
        assert_eq!(prod.limbs, [1, u64::MAX - 1, 0, 0, 0, 0, 0, 0]);

        let a = BigInt256::from_u64(0x1234_5678);
        let b = BigInt256::from_u64(0x9abc_def0);
        let ab = a.mul_wide(&b);
        let low = (ab.limbs[1] as u128) << 64 | ab.limbs[0] as u128;
        assert_eq!(low, 0x1234_5678u128 * 0x9abc_def0u128);
    }

    #[test]
    fn remainder_small_modulus() {
        let v = BigInt256::from_u64(1000);
        assert_eq!(v % BigInt256::from_u64(7), BigInt256::from_u64(6));
        // (2^64-1)^2 mod 10: (2^64-1) mod 10 = 5, and 5*5 mod 10 = 5
        let wide = BigInt256::from_u64(u64::MAX).mul_wide(&BigInt256::from_u64(u64::MAX));
        assert_eq!(wide.rem(&BigInt256::from_u64(10)), BigInt256::from_u64(5));
    }

    #[test]
    fn folded_remainder_matches_long_division() {
        // Full-width modulus takes the folding path; check it against values
        // with known residues.
        let p = BigInt256::from_hex(
            "fffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2f",
        )
        .expect("valid hex");
        let p_minus_1 = p - BigInt256::one();
        // (P-1)^2 = P^2 - 2P + 1 == 1 (mod P)
        assert_eq!(p_minus_1.mod_mul(&p_minus_1, &p), BigInt256::one());
        assert_eq!(BigInt512::from_bigint256(&p).rem(&p), BigInt256::zero());
        assert_eq!(
            BigInt512::from_bigint256(&p_minus_1).rem(&p),
            p_minus_1
        );
        // 2^512 - 1 mod P, cross-checked externally.
        let max = BigInt512 { limbs: [u64::MAX; 8] };
        let expected = BigInt256::from_hex("1000007a2000e90a0").expect("valid hex");
        assert_eq!(max.rem(&p), expected);
    }

    #[test]
    fn modular_arithmetic() {
        let m = BigInt256::from_u64(17);
        let a = BigInt256::from_u64(15);
        let b = BigInt256::from_u64(9);
        assert_eq!(a.mod_add(&b, &m), BigInt256::from_u64(7));
        assert_eq!(b.mod_sub(&a, &m), BigInt256::from_u64(11));
        assert_eq!(a.mod_mul(&b, &m), BigInt256::from_u64(16));
    }

    #[test]
    fn modular_exponentiation() {
        let m = BigInt256::from_u64(13);
        assert_eq!(
            BigInt256::from_u64(5).mod_exp(&BigInt256::from_u64(3), &m),
            BigInt256::from_u64(8)
        );
        assert_eq!(
            BigInt256::from_u64(5).mod_exp(&BigInt256::zero(), &m),
            BigInt256::one()
        );
    }

    #[test]
    fn modular_inverse_fermat() {
        let m = BigInt256::from_u64(17);
        let three = BigInt256::from_u64(3);
        let inv = three.mod_inverse(&m).expect("3 is invertible mod 17");
        assert_eq!(three.mod_mul(&inv, &m), BigInt256::one());
        assert!(BigInt256::zero().mod_inverse(&m).is_none());
    }

    #[test]
    fn shifts() {
        let v = BigInt256::from_u64(1);
        assert_eq!((v << 64).limbs, [0, 1, 0, 0]);
        assert_eq!((v << 64) >> 64, v);
        assert_eq!(v << 256, BigInt256::zero());
        assert_eq!(BigInt256::from_u64(0b1010) >> 1, BigInt256::from_u64(0b101));
    }

    #[test]
    fn bit_accessors() {
        let v = BigInt256 { limbs: [0, 0, 0, 1 << 63] };
        assert_eq!(v.bit_length(), 256);
        assert!(v.get_bit(255));
        assert!(!v.get_bit(254));
        assert_eq!(BigInt256::zero().bit_length(), 0);
        assert_eq!(BigInt256::one().bit_length(), 1);
    }

    #[test]
    fn display_matches_hex() {
        let v = BigInt256::from_u64(0xdead_beef);
        assert_eq!(format!("{v}"), format!("0x{}", v.to_hex()));
    }
}
