use chordsweep_core::*;
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    for (name, config) in [
        ("beginner", GameConfig::beginner()),
        ("intermediate", GameConfig::intermediate()),
        ("expert", GameConfig::expert()),
    ] {
        group.bench_function(name, |b| {
            let mut seed = 0;
            b.iter(|| {
                seed += 1;
                let generator = ShuffleGenerator::new(seed, Coordinate::new(0, 0));
                black_box(generator.generate(config))
            })
        });
    }
    group.finish();
}

fn bench_flood_fill(c: &mut Criterion) {
    // single mine in the corner, opening the far corner floods the whole grid
    let layout = MineLayout::from_mine_coords((255, 255), &[Coordinate::new(0, 0)]).unwrap();

    c.bench_function("flood_fill_255x255", |b| {
        b.iter(|| {
            let mut board = Board::with_layout(&layout, Rules::default());
            let outcome = board.open(Coordinate::new(254, 254)).unwrap();
            black_box((outcome, board.drain_events().count()))
        })
    });
}

criterion_group!(benches, bench_generate, bench_flood_fill);
criterion_main!(benches);
