//! Benchmarks for the abstrakt pipeline.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use abstrakt::render::{blend, gaussian_smooth};
use abstrakt::synth::{NoiseField, NoiseParams};
use abstrakt::{
    generate, BlendMode, Canvas, Colour, Combiner, CompositionSpec, CompositionType,
    GenerateConfig, SeedStream, Style, TilePolicy,
};

fn gradient(width: u32, height: u32, blue: f32, alpha: f32) -> Canvas {
    Canvas::from_fn(width, height, |x, y| {
        Colour::new(
            x as f32 / width as f32,
            y as f32 / height as f32,
            blue,
            alpha,
        )
    })
    .unwrap()
}

// -- Synthesis benchmarks --

fn bench_synthesis(c: &mut Criterion) {
    let mut group = c.benchmark_group("synthesis");

    let noise = NoiseField::new(&mut SeedStream::new(Some(7)));
    let params = NoiseParams::default();

    group.bench_function("noise_128x128", |b| {
        b.iter(|| {
            let mut sum = 0.0;
            for y in 0..128 {
                for x in 0..128 {
                    sum += noise.sample_pixel(x as f32, y as f32, black_box(&params));
                }
            }
            sum
        })
    });

    for style in Style::ALL {
        let mut config = GenerateConfig::new(style);
        config.width = 128;
        config.height = 128;
        config.seed = Some(42);
        config.strokes = Some(20);

        group.bench_function(format!("generate_{}_128", style), |b| {
            b.iter(|| generate(black_box(&config)).unwrap())
        });
    }

    group.finish();
}

// -- Compositing benchmarks --

fn bench_compositing(c: &mut Criterion) {
    let mut group = c.benchmark_group("compositing");

    let base = gradient(256, 256, 0.2, 1.0);
    let layer = gradient(256, 256, 0.8, 0.6);

    for mode in BlendMode::ALL {
        group.bench_function(format!("blend_{}_256", mode), |b| {
            b.iter(|| {
                let mut canvas = base.clone();
                blend(&mut canvas, black_box(&layer), mode, 0.5).unwrap();
                canvas
            })
        });
    }

    group.bench_function("gaussian_smooth_256_r3", |b| {
        b.iter(|| {
            let mut canvas = base.clone();
            gaussian_smooth(&mut canvas, black_box(3.0));
            canvas
        })
    });

    let images = vec![base.clone(), layer.clone(), gradient(256, 256, 0.5, 1.0)];
    let mosaic = Combiner::new(CompositionSpec {
        tile_size: 16,
        tile_policy: TilePolicy::Random,
        seed: Some(1),
        ..CompositionSpec::new(CompositionType::Mosaic)
    })
    .unwrap();

    group.bench_function("mosaic_256_t16", |b| {
        b.iter(|| mosaic.combine(black_box(&images)).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_synthesis, bench_compositing);
criterion_main!(benches);
