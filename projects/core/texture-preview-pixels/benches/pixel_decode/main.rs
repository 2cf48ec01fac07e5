use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use texture_preview_common::{color_8888::Color8888, cursor::StreamCursor};
use texture_preview_pixels::{
    decode_pixels,
    descriptor::{IndexLayout, PackedLayout},
    palette::Palette,
    swizzle::{deswizzle, TileScheme},
    DecodeContext, DecodeParams, PixelFormatDescriptor,
};

const WIDTH: u32 = 1024;
const HEIGHT: u32 = 1024;

fn make_data(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 31 % 251) as u8).collect()
}

fn bench_descriptors(c: &mut Criterion) {
    let mut group = c.benchmark_group("Decode Pixels (descriptor -> RGBA8888)");
    let descriptors = [
        PixelFormatDescriptor::packed(PackedLayout::RGBA8888),
        PixelFormatDescriptor::packed(PackedLayout::RGB565),
        PixelFormatDescriptor::packed(PackedLayout::ABGR1555),
        PixelFormatDescriptor::paletted("Indexed 8", IndexLayout::INDEX8),
        PixelFormatDescriptor::paletted("Indexed 4", IndexLayout::INDEX4),
    ];

    for descriptor in descriptors {
        let Some(size) = descriptor.data_size(WIDTH, HEIGHT) else {
            continue;
        };
        let data = make_data(size as usize);
        let palette: Vec<Color8888> = (0..=255u8).map(Color8888::grey).collect();

        group.throughput(Throughput::Bytes(size));
        group.bench_with_input(BenchmarkId::from_parameter(descriptor.name), &data, |b, data| {
            let mut ctx = DecodeContext::new();
            if let Some(palette) = Palette::new(palette.clone()) {
                ctx.palettes_mut().add_palette(palette);
            }
            b.iter(|| {
                let mut cursor = StreamCursor::new(data);
                decode_pixels(
                    &descriptor,
                    &mut cursor,
                    DecodeParams::new(WIDTH, HEIGHT),
                    &mut ctx,
                )
            })
        });
    }

    group.finish();
}

fn bench_deswizzle(c: &mut Criterion) {
    let mut group = c.benchmark_group("Deswizzle");
    let pixels: Vec<u32> = (0..WIDTH * HEIGHT).collect();
    group.throughput(Throughput::Elements(pixels.len() as u64));

    for (name, scheme) in [
        ("Morton", TileScheme::Morton),
        ("RowStripe 8", TileScheme::RowStripe { granularity: 8 }),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(name), &pixels, |b, pixels| {
            b.iter(|| deswizzle(pixels, WIDTH, HEIGHT, scheme))
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default();
    targets = bench_descriptors, bench_deswizzle
}

criterion_main!(benches);
