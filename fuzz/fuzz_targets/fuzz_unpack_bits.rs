#![no_main]

use arbitrary::Arbitrary;
use lattice_toy::ring::{pack_bits, unpack_bits};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct PackInput {
    bits: u8,
    count: u16,
    data: Vec<u8>,
}

fuzz_target!(|input: PackInput| {
    let bits = input.bits as u32;
    let count = input.count as usize % 1024;
    if let Ok(values) = unpack_bits(&input.data, bits, count) {
        assert_eq!(values.len(), count);
        // Padding bits in the last byte are ignored on the way in
        let repacked = pack_bits(&values, bits);
        assert_eq!(unpack_bits(&repacked, bits, count).unwrap(), values);
    }
});
