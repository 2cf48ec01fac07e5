use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use texture_preview_bc::{decode_block_surface, BlockFormat};
use texture_preview_common::{cursor::StreamCursor, validate::DecodeLimits};

const WIDTH: u32 = 1024;
const HEIGHT: u32 = 1024;

/// Fills a surface with blocks whose bytes vary per block, so every decoder
/// sees a mix of modes and indices.
fn make_surface(format: BlockFormat) -> Vec<u8> {
    let block_size = format.bytes_per_block();
    let blocks = (WIDTH as usize / 4) * (HEIGHT as usize / 4);
    let mut data = vec![0u8; blocks * block_size];
    for (block_idx, block) in data.chunks_exact_mut(block_size).enumerate() {
        for (x, byte) in block.iter_mut().enumerate() {
            *byte = ((block_idx * (x + 1)) % 255) as u8;
        }
    }
    data
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("Decode Surface (BCn -> RGBA8888)");
    let limits = DecodeLimits::default();

    for &format in BlockFormat::all_values() {
        let data = make_surface(format);
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(format.name()), &data, |b, data| {
            b.iter(|| {
                let mut cursor = StreamCursor::new(data);
                decode_block_surface(&mut cursor, format, WIDTH, HEIGHT, &limits)
            })
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default();
    targets = criterion_benchmark
}

criterion_main!(benches);
