#![no_main]

use std::sync::OnceLock;

use arbitrary::Arbitrary;
use lattice_toy::dilithium::{DilithiumKeyPair, DilithiumSignature, DilithiumSigner};
use lattice_toy::params::DilithiumParameters;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct SignatureFuzzInput {
    message: Vec<u8>,
    signature: Vec<u8>,
}

fn fixture() -> &'static (DilithiumSigner, DilithiumKeyPair) {
    static FIXTURE: OnceLock<(DilithiumSigner, DilithiumKeyPair)> = OnceLock::new();
    FIXTURE.get_or_init(|| {
        let signer = DilithiumSigner::new(DilithiumParameters::toy()).unwrap();
        let key_pair = signer.keygen_from_seed(&[9u8; 32]).unwrap();
        (signer, key_pair)
    })
}

fuzz_target!(|input: SignatureFuzzInput| {
    let (signer, key_pair) = fixture();

    // Decoded signatures either verify, fail, or are rejected for their shape
    if let Ok(signature) = DilithiumSignature::from_bytes(&input.signature) {
        let _ = signer.verify(&input.message, &signature, &key_pair.public_key);
    }
});
