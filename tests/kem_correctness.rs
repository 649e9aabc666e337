use lattice_toy::kyber::{KyberCiphertext, KyberKem, KyberPublicKey};
use lattice_toy::params::KyberParameters;
use lattice_toy::sampling::Sampler;

#[test]
fn test_hundred_consecutive_encapsulations_agree() {
    let kem = KyberKem::new(KyberParameters::toy()).unwrap();
    let key_pair = kem.keygen_from_seed(&[0x5a; 32]).unwrap();

    for trial in 0..100 {
        let (ciphertext, sent) = kem.encapsulate(&key_pair.public_key).unwrap();
        let received = kem.decapsulate(&ciphertext, &key_pair.secret_key).unwrap();
        assert_eq!(sent, received, "shared secrets differ in trial {}", trial);
    }
}

#[test]
fn test_fresh_key_pairs_agree() {
    let kem = KyberKem::new(KyberParameters::toy()).unwrap();
    let mut failures = 0;
    for _ in 0..20 {
        let key_pair = kem.keygen().unwrap();
        let (ciphertext, sent) = kem.encapsulate(&key_pair.public_key).unwrap();
        if kem.decapsulate(&ciphertext, &key_pair.secret_key).unwrap() != sent {
            failures += 1;
        }
    }
    assert_eq!(failures, 0);
}

#[test]
fn test_wire_round_trip_between_parties() {
    let params = KyberParameters::toy();
    let kem = KyberKem::new(params).unwrap();

    // Receiver publishes a key, sender only sees its bytes
    let receiver = kem.keygen().unwrap();
    let published = receiver.public_key.to_bytes().unwrap();

    let sender_view = KyberPublicKey::from_bytes(&published).unwrap();
    let mut sampler = Sampler::from_entropy(params.ring);
    let (ciphertext, sent) = kem.encapsulate_with_sampler(&sender_view, &mut sampler).unwrap();
    let wire = ciphertext.to_bytes();
    assert_eq!(wire.len(), 768);

    let parsed = KyberCiphertext::from_bytes(&params, &wire).unwrap();
    let received = kem.decapsulate(&parsed, &receiver.secret_key).unwrap();
    assert_eq!(sent, received);
}

#[test]
fn test_different_encapsulations_give_different_secrets() {
    let kem = KyberKem::new(KyberParameters::toy()).unwrap();
    let key_pair = kem.keygen().unwrap();
    let (ct1, ss1) = kem.encapsulate(&key_pair.public_key).unwrap();
    let (ct2, ss2) = kem.encapsulate(&key_pair.public_key).unwrap();
    assert_ne!(ct1, ct2);
    assert_ne!(ss1, ss2);
}
