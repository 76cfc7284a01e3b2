//! Taproot output-key derivation (key tweaking)
//!
//! Stateless four-stage pipeline: raw key -> parity-normalized internal key
//! -> tweak scalar -> tweaked key pair. Each invocation is a pure function of
//! its inputs; nothing is cached or retained between calls.

use log::debug;

use crate::error::Error;
use crate::hash::tagged_hash;
use crate::math::bigint::BigInt256;
use crate::math::constants::{CURVE_ORDER_BIGINT, GENERATOR};
use crate::math::curve::Point;

/// Domain-separation tag for the tweak hash, per BIP341.
const TAP_TWEAK_TAG: &str = "TapTweak";

/// The tweaked key pair `(d', Q)`. `d'` signs key-path spends; `xonly(Q)` is
/// the on-chain output key committing to the script conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TweakedKeyPair {
    /// Tweaked private scalar d' in [1, N).
    pub secret: BigInt256,
    /// Tweaked public point Q = d' * G, never infinity.
    pub point: Point,
}

impl TweakedKeyPair {
    /// The 32-byte x-only output key used as the taproot commitment.
    pub fn output_key(&self) -> [u8; 32] {
        self.point
            .serialize_xonly()
            .expect("tweaked point is never infinity")
    }

    /// Tweaked private scalar as 32 big-endian bytes.
    pub fn secret_bytes(&self) -> [u8; 32] {
        self.secret.to_bytes_be()
    }
}

/// Normalize an internal private scalar so its public point has an even y
/// coordinate: if `d * G` has odd y, replace `d` with `N - d`. Returns the
/// normalized scalar and its point. This removes the sign ambiguity of
/// committing to the 32-byte x coordinate alone.
pub fn normalize_parity(d: &BigInt256) -> Result<(BigInt256, Point), Error> {
    let p = Point::from_private_key(d)?;
    if p.is_even_y() {
        return Ok((*d, p));
    }
    debug!("internal point has odd y, negating scalar");
    let d_even = *CURVE_ORDER_BIGINT - *d;
    let p_even = GENERATOR.mul(&d_even);
    debug_assert!(p_even.is_even_y());
    Ok((d_even, p_even))
}

/// Derive the tweak scalar `t = tagged_hash("TapTweak", xonly_key || c)`,
/// interpreted as a big-endian integer.
///
/// A digest at or above the curve order is rejected rather than reduced;
/// silently wrapping would accept a tweak the protocol defines as invalid
/// (probability about 2^-128).
pub fn compute_tweak(internal_xonly: &[u8; 32], commitment: &[u8]) -> Result<BigInt256, Error> {
    if !commitment.is_empty() && commitment.len() != 32 {
        return Err(Error::InvalidCommitment(commitment.len()));
    }
    let mut preimage = Vec::with_capacity(64);
    preimage.extend_from_slice(internal_xonly);
    preimage.extend_from_slice(commitment);
    let t = BigInt256::from_bytes_be(&tagged_hash(TAP_TWEAK_TAG, &preimage));
    if t >= *CURVE_ORDER_BIGINT {
        return Err(Error::TweakFailure("tweak scalar exceeds the curve order"));
    }
    Ok(t)
}

/// Derive the taproot output key pair for an internal scalar `d` in `[1, N)`
/// and a commitment of 0 bytes (key-path-only) or 32 bytes (script Merkle
/// root):
///
/// 1. `P = d * G`, negating `d` first if `P` would have odd y.
/// 2. `t = tagged_hash("TapTweak", xonly(P) || commitment)`.
/// 3. `d' = (d + t) mod N` and `Q = P + t * G`.
/// 4. Verify `d' * G == Q`.
///
/// Degenerate results (`d' == 0`, `Q` at infinity) are cryptographically
/// negligible but signaled as `TweakFailure`, never substituted.
pub fn tweak_key_pair(d: &BigInt256, commitment: &[u8]) -> Result<TweakedKeyPair, Error> {
    if !commitment.is_empty() && commitment.len() != 32 {
        return Err(Error::InvalidCommitment(commitment.len()));
    }

    let (d_even, p_even) = normalize_parity(d)?;
    let xonly = p_even.serialize_xonly()?;
    let t = compute_tweak(&xonly, commitment)?;
    debug!("tweak scalar t = {t}");

    let secret = d_even.mod_add(&t, &CURVE_ORDER_BIGINT);
    if secret.is_zero() {
        return Err(Error::TweakFailure("tweaked scalar is zero"));
    }

    let point = p_even.add(&GENERATOR.mul(&t));
    if point.is_infinity() {
        return Err(Error::TweakFailure("tweaked point is at infinity"));
    }

    // d' * G == Q must hold by construction; verify rather than trust.
    if GENERATOR.mul(&secret) != point {
        return Err(Error::TweakFailure(
            "tweaked scalar does not generate the tweaked point",
        ));
    }

    debug!("output key = {}", hex::encode(point.serialize_xonly()?));
    Ok(TweakedKeyPair { secret, point })
}

/// Byte-level entry point: consume the private scalar as 32 big-endian bytes.
pub fn tweak_from_bytes(secret: &[u8; 32], commitment: &[u8]) -> Result<TweakedKeyPair, Error> {
    tweak_key_pair(&BigInt256::from_bytes_be(secret), commitment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_commitment_lengths() {
        let d = BigInt256::from_u64(7);
        for len in [1usize, 16, 31, 33, 64] {
            assert_eq!(
                tweak_key_pair(&d, &vec![0u8; len]),
                Err(Error::InvalidCommitment(len))
            );
        }
    }

    #[test]
    fn rejects_out_of_range_scalar() {
        assert!(matches!(
            tweak_key_pair(&BigInt256::zero(), b""),
            Err(Error::Construction(_))
        ));
        assert!(matches!(
            tweak_key_pair(&CURVE_ORDER_BIGINT, b""),
            Err(Error::Construction(_))
        ));
    }

    #[test]
    fn unit_key_with_empty_commitment() {
        // d = 1: P = G (even y), t = tagged_hash("TapTweak", xonly(G)),
        // d' = 1 + t, Q = G + t*G.
        let pair = tweak_key_pair(&BigInt256::one(), b"").expect("valid inputs");
        assert_eq!(
            pair.secret.to_hex(),
            "3cf5216d476a5e637bf0da674e50ddf55c403270dd36494dfcca438132fa30e8"
        );
        assert_eq!(
            hex::encode(pair.output_key()),
            "da4710964f7852695de2da025290e24af6d8c281de5a0b902b7135fd9fd74d21"
        );
        let t = compute_tweak(
            &GENERATOR.serialize_xonly().expect("affine"),
            b"",
        )
        .expect("digest below order");
        assert_eq!(pair.point, GENERATOR.add(&GENERATOR.mul(&t)));
    }

    #[test]
    fn normalization_always_yields_even_y() {
        // d = 6 maps to a point with odd y, d = 1 to even y.
        for d in [1u64, 2, 5, 6, 7, 999] {
            let (d_even, p_even) =
                normalize_parity(&BigInt256::from_u64(d)).expect("in range");
            assert!(p_even.is_even_y());
            assert_eq!(GENERATOR.mul(&d_even), p_even);
        }
    }

    #[test]
    fn negated_scalar_used_for_odd_y_points() {
        let d = BigInt256::from_u64(6);
        assert!(!GENERATOR.mul(&d).is_even_y());
        let (d_even, _) = normalize_parity(&d).expect("in range");
        assert_eq!(d_even, *CURVE_ORDER_BIGINT - d);
    }

    #[test]
    fn tweaked_scalar_generates_tweaked_point() {
        for d in [1u64, 6, 0xdead_beef] {
            let pair = tweak_key_pair(&BigInt256::from_u64(d), &[0x42; 32])
                .expect("valid inputs");
            assert_eq!(GENERATOR.mul(&pair.secret), pair.point);
        }
    }

    #[test]
    fn deterministic_per_input() {
        let d = BigInt256::from_u64(31337);
        let c = [7u8; 32];
        assert_eq!(
            tweak_key_pair(&d, &c).expect("valid"),
            tweak_key_pair(&d, &c).expect("valid")
        );
    }

    #[test]
    fn commitment_changes_output_key() {
        let d = BigInt256::from_u64(31337);
        let key_path = tweak_key_pair(&d, b"").expect("valid");
        let script_path = tweak_key_pair(&d, &[1u8; 32]).expect("valid");
        assert_ne!(key_path.output_key(), script_path.output_key());
    }

    #[test]
    fn byte_entry_point_matches_scalar_entry_point() {
        let d = BigInt256::from_u64(424242);
        assert_eq!(
            tweak_from_bytes(&d.to_bytes_be(), b"").expect("valid"),
            tweak_key_pair(&d, b"").expect("valid")
        );
    }
}
