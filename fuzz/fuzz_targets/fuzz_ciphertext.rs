#![no_main]

use std::sync::OnceLock;

use lattice_toy::kyber::{KyberCiphertext, KyberKem, KyberKeyPair};
use lattice_toy::params::KyberParameters;
use libfuzzer_sys::fuzz_target;

fn fixture() -> &'static (KyberKem, KyberKeyPair) {
    static FIXTURE: OnceLock<(KyberKem, KyberKeyPair)> = OnceLock::new();
    FIXTURE.get_or_init(|| {
        let kem = KyberKem::new(KyberParameters::toy()).unwrap();
        let key_pair = kem.keygen_from_seed(&[7u8; 32]).unwrap();
        (kem, key_pair)
    })
}

fuzz_target!(|data: &[u8]| {
    let (kem, key_pair) = fixture();

    // Any ciphertext that parses must decapsulate to a 32-byte secret
    if let Ok(ciphertext) = KyberCiphertext::from_bytes(kem.params(), data) {
        let secret = kem.decapsulate(&ciphertext, &key_pair.secret_key).unwrap();
        assert_eq!(secret.len(), 32);
        assert_eq!(ciphertext.to_bytes(), data);
    }

    let _ = lattice_toy::kyber::KyberPublicKey::from_bytes(data);
});
