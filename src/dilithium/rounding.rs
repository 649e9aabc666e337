/*!
 * High/low bit decomposition of commitment coefficients
 *
 * Only the high part of `w = A·y` enters the challenge hash, so a perturbation
 * smaller than the distance to the nearest rounding boundary leaves the
 * challenge unchanged.
 */

use crate::error::CryptoResult;
use crate::params::RingParams;
use crate::ring::{PolyVec, RingElement};

/// Split `r` in [0, q) into `(r1, r0)` with `r = r1·alpha + r0` and
/// `-alpha/2 < r0 <= alpha/2`.
///
/// The top bucket `r - r0 = q - 1` folds onto `r1 = 0` with `r0` lowered by
/// one, so that `r1` ranges over `0..(q-1)/alpha`.
pub fn decompose(r: u32, alpha: u32, q: u32) -> (u32, i64) {
    let mut r0 = (r % alpha) as i64;
    if r0 > (alpha / 2) as i64 {
        r0 -= alpha as i64;
    }
    let base = r as i64 - r0;
    if base == (q - 1) as i64 {
        (0, r0 - 1)
    } else {
        ((base / alpha as i64) as u32, r0)
    }
}

/// High part of `r` for `alpha = 2·gamma2`
pub fn high_bits(r: u32, gamma2: u32, q: u32) -> u32 {
    decompose(r, 2 * gamma2, q).0
}

/// Low part of `r` for `alpha = 2·gamma2`
pub fn low_bits(r: u32, gamma2: u32, q: u32) -> i64 {
    decompose(r, 2 * gamma2, q).1
}

/// Apply [`high_bits`] to every coefficient. The result lives in the same
/// ring so it can be compared and encoded like any other element.
pub fn high_bits_poly(element: &RingElement, gamma2: u32) -> CryptoResult<RingElement> {
    let params: RingParams = element.params();
    let coeffs = element
        .coeffs()
        .iter()
        .map(|&c| high_bits(c, gamma2, params.q))
        .collect();
    RingElement::from_coeffs(params, coeffs)
}

/// Apply [`high_bits_poly`] to every component
pub fn high_bits_vec(v: &PolyVec, gamma2: u32) -> CryptoResult<PolyVec> {
    let elements = v
        .iter()
        .map(|e| high_bits_poly(e, gamma2))
        .collect::<CryptoResult<Vec<_>>>()?;
    PolyVec::new(elements)
}
