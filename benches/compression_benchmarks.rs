use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use huffman_codec::{compress, decompress};
use rand::{Rng, SeedableRng};

fn sample(len: usize, alphabet: u32) -> Vec<u8> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(42);
    (0..len).map(|_| rng.gen_range(0..alphabet) as u8).collect()
}

fn bench_compress(c: &mut Criterion) {
    let mut group = c.benchmark_group("compress");
    for alphabet in [4u32, 64, 256] {
        let data = sample(1 << 16, alphabet);
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(alphabet), &data, |b, data| {
            b.iter(|| compress(black_box(data)).unwrap())
        });
    }
    group.finish();
}

fn bench_decompress(c: &mut Criterion) {
    let mut group = c.benchmark_group("decompress");
    for alphabet in [4u32, 64, 256] {
        let data = sample(1 << 16, alphabet);
        let compressed = compress(&data).unwrap();
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(alphabet),
            &compressed,
            |b, compressed| {
                b.iter(|| {
                    decompress(black_box(&compressed.sidecar), black_box(&compressed.data))
                        .unwrap()
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_compress, bench_decompress);
criterion_main!(benches);
