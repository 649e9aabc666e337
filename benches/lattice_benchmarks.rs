use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lattice_toy::{
    dilithium::DilithiumSigner,
    kyber::KyberKem,
    params::{DilithiumParameters, KyberParameters, RingParams},
    sampling::Sampler,
};

fn ring_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("ring");

    for (name, params) in [("kyber", RingParams::kyber()), ("dilithium", RingParams::dilithium())] {
        let mut sampler = Sampler::from_seed(params, [1u8; 32]);
        let a = sampler.uniform_bounded((params.q - 1) / 2).unwrap();
        let b = sampler.uniform_bounded((params.q - 1) / 2).unwrap();

        group.bench_with_input(BenchmarkId::new("schoolbook_mul", name), &params, |bench, _| {
            bench.iter(|| black_box(&a).mul(black_box(&b)))
        });
        group.bench_with_input(BenchmarkId::new("add", name), &params, |bench, _| {
            bench.iter(|| black_box(&a).add(black_box(&b)))
        });
    }

    let mut sampler = Sampler::from_seed(RingParams::kyber(), [2u8; 32]);
    let element = sampler.uniform_bounded(1664).unwrap();
    for d in [4u32, 10] {
        group.bench_with_input(BenchmarkId::new("compress", d), &d, |bench, &d| {
            bench.iter(|| element.compress(d))
        });
    }

    group.finish();
}

fn sampling_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("sampling");
    let mut sampler = Sampler::from_seed(RingParams::kyber(), [3u8; 32]);

    group.bench_function("centered_binomial_eta2", |b| b.iter(|| sampler.centered_binomial(2)));
    group.bench_function("challenge_tau39", |b| {
        let hash = lattice_toy::hash::Sha256Hash;
        b.iter(|| Sampler::challenge(RingParams::dilithium(), &hash, black_box(b"seed"), 39))
    });

    group.finish();
}

fn kyber_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("kyber");
    let kem = KyberKem::new(KyberParameters::toy()).unwrap();

    group.bench_function("key_generation", |b| b.iter(|| kem.keygen()));

    let key_pair = kem.keygen().unwrap();
    group.bench_function("encapsulation", |b| b.iter(|| kem.encapsulate(&key_pair.public_key)));

    let (ciphertext, _) = kem.encapsulate(&key_pair.public_key).unwrap();
    group.bench_function("decapsulation", |b| {
        b.iter(|| kem.decapsulate(&ciphertext, &key_pair.secret_key))
    });

    group.finish();
}

fn dilithium_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("dilithium");
    group.sample_size(10);
    let signer = DilithiumSigner::new(DilithiumParameters::toy()).unwrap();

    group.bench_function("key_generation", |b| b.iter(|| signer.keygen()));

    let key_pair = signer.keygen().unwrap();
    for size in [32usize, 1024] {
        let message = vec![0x42u8; size];
        group.bench_with_input(BenchmarkId::new("sign", size), &message, |b, message| {
            b.iter(|| signer.sign(message, &key_pair.secret_key))
        });

        let signature = signer.sign(&message, &key_pair.secret_key).unwrap();
        group.bench_with_input(BenchmarkId::new("verify", size), &message, |b, message| {
            b.iter(|| signer.verify(message, &signature, &key_pair.public_key))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    ring_benchmarks,
    sampling_benchmarks,
    kyber_benchmarks,
    dilithium_benchmarks
);
criterion_main!(benches);
