use super::*;
use crate::hash::{Sha256Hash, Sha3_256Hash};
use crate::params::RingParams;
use proptest::prelude::*;

#[test]
fn test_uniform_bounded_respects_bound() {
    let mut sampler = Sampler::from_seed(RingParams::dilithium(), [7u8; 32]);
    for bound in [1u32, 78, 523_776] {
        let element = sampler.uniform_bounded(bound).unwrap();
        assert!(element.inf_norm() <= bound, "bound {} violated", bound);
    }
}

#[test]
fn test_uniform_bounded_rejects_oversized_bound() {
    let mut sampler = Sampler::from_entropy(RingParams::kyber());
    assert!(sampler.uniform_bounded(1664).is_ok());
    assert!(sampler.uniform_bounded(1665).is_err());
}

#[test]
fn test_ternary_secret_uses_all_three_values() {
    let mut sampler = Sampler::from_seed(RingParams::dilithium(), [1u8; 32]);
    let element = sampler.uniform_bounded(1).unwrap();
    let q = RingParams::dilithium().q;
    assert!(element.coeffs().iter().all(|&c| c == 0 || c == 1 || c == q - 1));
    assert!(element.coeffs().contains(&0));
    assert!(element.coeffs().contains(&1));
    assert!(element.coeffs().contains(&(q - 1)));
}

#[test]
fn test_seeded_samplers_are_reproducible() {
    let params = RingParams::kyber();
    let mut a = Sampler::from_seed(params, [42u8; 32]);
    let mut b = Sampler::from_seed(params, [42u8; 32]);
    assert_eq!(a.centered_binomial(2).unwrap(), b.centered_binomial(2).unwrap());
    assert_eq!(a.uniform_matrix(2, 2).unwrap(), b.uniform_matrix(2, 2).unwrap());
}

#[test]
fn test_expand_matrix_depends_on_seed() {
    let params = RingParams::kyber();
    let a = Sampler::expand_matrix(params, &[1u8; 32], 2, 2).unwrap();
    let b = Sampler::expand_matrix(params, &[1u8; 32], 2, 2).unwrap();
    let c = Sampler::expand_matrix(params, &[2u8; 32], 2, 2).unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn test_cbd_distribution() {
    let mut sampler = Sampler::from_seed(RingParams::kyber(), [42u8; 32]);
    let poly = sampler.centered_binomial(2).unwrap();

    // All coefficients in [-eta, eta]
    assert!(poly.inf_norm() <= 2);

    // With eta = 2 the value 0 has probability 3/8
    let zeros = poly.coeffs().iter().filter(|&&c| c == 0).count();
    assert!(zeros > 40 && zeros < 160, "CBD distribution looks wrong: {} zeros", zeros);
}

#[test]
fn test_cbd_from_known_bytes() {
    let params = RingParams::kyber();
    let mut buffer = vec![0u8; cbd_buffer_len(params, 2)];
    assert_eq!(buffer.len(), 128);

    // coefficient 0 reads bits 0..2 (a) and 2..4 (b)
    buffer[0] = 0b0000_0011;
    // coefficient 1 reads bits 4..6 (a) and 6..8 (b)
    buffer[0] |= 0b1100_0000;
    let poly = cbd_from_bytes(params, &buffer, 2).unwrap();
    assert_eq!(poly.centered(0), 2);
    assert_eq!(poly.centered(1), -2);
    assert_eq!(poly.weight(), 2);

    assert!(cbd_from_bytes(params, &buffer[..64], 2).is_err());
}

#[test]
fn test_challenge_shape() {
    let params = RingParams::dilithium();
    let c = Sampler::challenge(params, &Sha256Hash, b"digest", 39).unwrap();
    assert_eq!(c.weight(), 39);
    assert_eq!(c.inf_norm(), 1);
}

#[test]
fn test_challenge_depends_on_hash_and_seed() {
    let params = RingParams::dilithium();
    let base = Sampler::challenge(params, &Sha256Hash, b"digest", 39).unwrap();
    assert_ne!(base, Sampler::challenge(params, &Sha256Hash, b"digest2", 39).unwrap());
    assert_ne!(base, Sampler::challenge(params, &Sha3_256Hash, b"digest", 39).unwrap());
}

#[test]
fn test_challenge_rejects_bad_weight() {
    let params = RingParams::dilithium();
    assert!(Sampler::challenge(params, &Sha256Hash, b"x", 0).is_err());
    assert!(Sampler::challenge(params, &Sha256Hash, b"x", 257).is_err());
    assert_eq!(
        Sampler::challenge(params, &Sha256Hash, b"x", 256).unwrap().weight(),
        256
    );
}

proptest! {
    #[test]
    fn prop_challenge_is_deterministic(
        seed in proptest::collection::vec(any::<u8>(), 0..64),
        tau in 1usize..=64,
    ) {
        let params = RingParams::dilithium();
        let first = Sampler::challenge(params, &Sha256Hash, &seed, tau).unwrap();
        let second = Sampler::challenge(params, &Sha256Hash, &seed, tau).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.weight(), tau);
        for i in 0..params.n {
            prop_assert!(first.centered(i).abs() <= 1);
        }
    }
}
