use super::*;
use crate::error::{error_codes, CryptoError};
use crate::hash::{Sha3_256Hash, Shake256Hash};
use crate::params::{DilithiumParameters, RingParams};
use crate::ring::{PolyVec, RingElement};
use crate::sampling::Sampler;
use std::sync::Arc;

const Q: u32 = 8_380_417;
const GAMMA2: u32 = 261_888;

fn toy_signer() -> DilithiumSigner {
    DilithiumSigner::new(DilithiumParameters::toy()).unwrap()
}

#[test]
fn test_dilithium_key_generation() {
    let signer = toy_signer();
    let key_pair = signer.keygen().unwrap();
    assert_eq!(key_pair.public_key.t.len(), 4);
    assert_eq!(key_pair.secret_key.s1.len(), 4);
    assert_eq!(key_pair.secret_key.s2.len(), 4);
    assert!(key_pair.secret_key.s1.inf_norm() <= 1);
    assert!(key_pair.secret_key.s2.inf_norm() <= 1);
    assert_eq!(key_pair.public_key.rho, key_pair.secret_key.rho);
}

#[test]
fn test_dilithium_sign_verify() {
    let signer = toy_signer();
    let key_pair = signer.keygen().unwrap();
    let message = b"This is a test message";

    let signature = signer.sign(message, &key_pair.secret_key).unwrap();
    assert!(signature.z.inf_norm() < signer.params().z_bound());
    assert_eq!(signature.c.weight(), 39);
    assert!(signer.verify(message, &signature, &key_pair.public_key).unwrap());
}

#[test]
fn test_verify_rejects_other_message() {
    let signer = toy_signer();
    let key_pair = signer.keygen().unwrap();
    let signature = signer.sign(b"original", &key_pair.secret_key).unwrap();
    assert!(!signer.verify(b"modified", &signature, &key_pair.public_key).unwrap());
}

#[test]
fn test_verify_rejects_other_key() {
    let signer = toy_signer();
    let alice = signer.keygen_from_seed(&[1u8; 32]).unwrap();
    let bob = signer.keygen_from_seed(&[2u8; 32]).unwrap();
    let signature = signer.sign(b"hello", &alice.secret_key).unwrap();
    assert!(!signer.verify(b"hello", &signature, &bob.public_key).unwrap());
}

#[test]
fn test_verify_rejects_z_on_the_norm_boundary() {
    let signer = toy_signer();
    let key_pair = signer.keygen().unwrap();
    let mut signature = signer.sign(b"boundary", &key_pair.secret_key).unwrap();

    let bound = signer.params().z_bound() as i64;
    let ring = signer.params().ring;
    let mut elements: Vec<RingElement> = signature.z.elements().to_vec();
    let mut coeffs: Vec<i64> = (0..ring.n).map(|i| elements[1].centered(i)).collect();
    coeffs[17] = -bound;
    elements[1] = RingElement::from_signed(ring, &coeffs).unwrap();
    signature.z = PolyVec::new(elements).unwrap();

    assert_eq!(signature.z.inf_norm() as i64, bound);
    assert!(!signer.verify(b"boundary", &signature, &key_pair.public_key).unwrap());
}

#[test]
fn test_verify_rejects_malformed_challenge() {
    let signer = toy_signer();
    let key_pair = signer.keygen().unwrap();
    let mut signature = signer.sign(b"challenge", &key_pair.secret_key).unwrap();
    signature.c = signature.c.scalar_mul(2);
    assert!(!signer.verify(b"challenge", &signature, &key_pair.public_key).unwrap());
}

#[test]
fn test_verify_fails_fast_on_wrong_shape() {
    let signer = toy_signer();
    let key_pair = signer.keygen().unwrap();
    let signature = signer.sign(b"shape", &key_pair.secret_key).unwrap();

    let short = DilithiumSignature::new(
        PolyVec::new(signature.z.elements()[..3].to_vec()).unwrap(),
        signature.c.clone(),
    );
    let result = signer.verify(b"shape", &short, &key_pair.public_key);
    assert!(matches!(result, Err(CryptoError::ParameterMismatch { .. })));
}

#[test]
fn test_sign_attempts_exhausted() {
    let mut params = DilithiumParameters::toy();
    // z_bound = 1: every nonzero z is rejected
    params.beta = params.gamma1 - 1;
    params.max_sign_attempts = 3;
    let signer = DilithiumSigner::new(params).unwrap();
    let key_pair = signer.keygen().unwrap();

    match signer.sign(b"never", &key_pair.secret_key) {
        Err(CryptoError::SignAttemptsExhausted { attempts, error_code }) => {
            assert_eq!(attempts, 3);
            assert_eq!(error_code, error_codes::DILITHIUM_SIGN_ATTEMPTS_EXHAUSTED);
        }
        other => panic!("expected SignAttemptsExhausted, got {:?}", other),
    }
}

#[test]
fn test_sign_with_stats_reports_attempts() {
    let signer = toy_signer();
    let key_pair = signer.keygen().unwrap();
    let (signature, attempts) = signer.sign_with_stats(b"stats", &key_pair.secret_key).unwrap();
    assert!(attempts >= 1);
    assert!(attempts <= signer.params().max_sign_attempts);
    assert!(signer.verify(b"stats", &signature, &key_pair.public_key).unwrap());
}

#[test]
fn test_sign_with_sampler_is_deterministic() {
    let signer = toy_signer();
    let key_pair = signer.keygen_from_seed(&[8u8; 32]).unwrap();
    let ring = signer.params().ring;

    let mut first = Sampler::from_seed(ring, [3u8; 32]);
    let mut second = Sampler::from_seed(ring, [3u8; 32]);
    let sig1 = signer.sign_with_sampler(b"det", &key_pair.secret_key, &mut first).unwrap();
    let sig2 = signer.sign_with_sampler(b"det", &key_pair.secret_key, &mut second).unwrap();
    assert_eq!(sig1, sig2);

    let mut wrong_ring = Sampler::from_seed(RingParams::kyber(), [3u8; 32]);
    assert!(signer
        .sign_with_sampler(b"det", &key_pair.secret_key, &mut wrong_ring)
        .is_err());
}

#[test]
fn test_custom_hash() {
    let signer = DilithiumSigner::with_hash(DilithiumParameters::toy(), Arc::new(Sha3_256Hash)).unwrap();
    let key_pair = signer.keygen().unwrap();
    let signature = signer.sign(b"sha3", &key_pair.secret_key).unwrap();
    assert!(signer.verify(b"sha3", &signature, &key_pair.public_key).unwrap());

    // A verifier using another hash derives other challenges
    let sha256 = toy_signer();
    assert!(!sha256.verify(b"sha3", &signature, &key_pair.public_key).unwrap());
}

#[test]
fn test_serialization() {
    let signer = toy_signer();
    let key_pair = signer.keygen().unwrap();
    let signature = signer.sign(b"bytes", &key_pair.secret_key).unwrap();

    let parsed = DilithiumSignature::from_bytes(&signature.to_bytes().unwrap()).unwrap();
    assert_eq!(parsed, signature);

    let pk = DilithiumPublicKey::from_bytes(&key_pair.public_key.to_bytes().unwrap()).unwrap();
    assert_eq!(pk, key_pair.public_key);
    assert_eq!(pk.fingerprint(), key_pair.public_key.fingerprint());

    let sk = DilithiumSecretKey::from_bytes(&key_pair.secret_key.to_bytes().unwrap()).unwrap();
    assert_eq!(sk, key_pair.secret_key);

    let pair = DilithiumKeyPair::from_bytes(&key_pair.to_bytes().unwrap()).unwrap();
    assert!(signer.verify(b"bytes", &signature, &pair.public_key()).unwrap());

    assert!(DilithiumSignature::from_bytes(&[0u8; 8]).is_err());
}

#[test]
fn test_decompose() {
    let alpha = 2 * GAMMA2;
    assert_eq!(decompose(0, alpha, Q), (0, 0));
    assert_eq!(decompose(GAMMA2, alpha, Q), (0, GAMMA2 as i64));
    assert_eq!(decompose(GAMMA2 + 1, alpha, Q), (1, -(GAMMA2 as i64) + 1));
    // The last bucket folds onto zero
    assert_eq!(decompose(Q - 1, alpha, Q), (0, -1));

    for r in [0, 1, 12_345, GAMMA2, alpha, 4_190_208, Q - GAMMA2, Q - 1] {
        let (r1, r0) = decompose(r, alpha, Q);
        assert!(r1 < (Q - 1) / alpha);
        let rebuilt = (r1 as i64 * alpha as i64 + r0).rem_euclid(Q as i64);
        assert_eq!(rebuilt, r as i64);
        assert_eq!(high_bits(r, GAMMA2, Q), r1);
        assert_eq!(low_bits(r, GAMMA2, Q), r0);
    }
}

#[test]
fn test_high_bits_vec_keeps_shape() {
    let ring = RingParams::dilithium();
    let mut sampler = Sampler::from_seed(ring, [0u8; 32]);
    let v = sampler.uniform_matrix(1, 3).unwrap();
    let row = PolyVec::new((0..3).map(|j| v.get(0, j).clone()).collect()).unwrap();
    let w1 = high_bits_vec(&row, GAMMA2).unwrap();
    assert_eq!(w1.len(), 3);
    assert!(w1.iter().all(|e| e.coeffs().iter().all(|&c| c < 16)));
}

#[test]
fn test_decoding_rejects_overlong_challenge() {
    let signer = toy_signer();
    let key_pair = signer.keygen_from_seed(&[8u8; 32]).unwrap();
    let signature = signer.sign(b"length", &key_pair.secret_key).unwrap();

    let value = serde_json::to_value(&signature).unwrap();
    let decoded: DilithiumSignature = serde_json::from_value(value.clone()).unwrap();
    assert!(signer.verify(b"length", &decoded, &key_pair.public_key).unwrap());

    // Same weight and the same +/-1 entries, spread over 2N coefficients
    let mut tampered = value;
    let coeffs = tampered["c"]["coeffs"].as_array_mut().unwrap();
    let first = coeffs.iter().position(|c| c.as_u64() != Some(0)).unwrap();
    let moved = coeffs[first].take();
    coeffs[first] = serde_json::json!(0);
    coeffs.extend(std::iter::repeat(serde_json::json!(0)).take(256));
    coeffs[511] = moved;
    assert!(serde_json::from_value::<DilithiumSignature>(tampered).is_err());
}

#[test]
fn test_challenge_from_other_ring_is_rejected() {
    let signer = toy_signer();
    let key_pair = signer.keygen_from_seed(&[9u8; 32]).unwrap();
    let signature = signer.sign(b"ring", &key_pair.secret_key).unwrap();
    let foreign = DilithiumSignature::new(signature.z.clone(), RingElement::zero(RingParams::kyber()));

    let result = signer.verify(b"ring", &foreign, &key_pair.public_key);
    assert!(matches!(result, Err(CryptoError::ParameterMismatch { .. })));

    let err = DilithiumSignature::from_bytes(&foreign.to_bytes().unwrap()).unwrap_err();
    assert_eq!(err.error_code(), error_codes::DILITHIUM_INVALID_SIGNATURE);
}

#[test]
fn test_empty_digest_hash_is_rejected() {
    let result = DilithiumSigner::with_hash(DilithiumParameters::toy(), Arc::new(Shake256Hash::new(0)));
    assert!(matches!(result, Err(CryptoError::InvalidParameter { .. })));
}

#[test]
fn test_secret_key_debug_is_redacted() {
    let signer = toy_signer();
    let key_pair = signer.keygen_from_seed(&[10u8; 32]).unwrap();
    let shown = format!("{:?}", key_pair);
    assert!(shown.contains("DilithiumSecretKey([REDACTED; l=4 k=4])"));
    assert!(!shown.contains("s1"));
}
