use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use winmine_core::*;

fn first_reveal(c: &mut Criterion) {
    let mut group = c.benchmark_group("first_reveal");
    for difficulty in Difficulty::ALL {
        group.bench_function(difficulty.name(), |b| {
            let mut seed = 0u64;
            b.iter(|| {
                seed = seed.wrapping_add(1);
                let mut engine = PlayEngine::new(difficulty.config(), seed, true);
                black_box(engine.reveal(black_box((8, 8))))
            })
        });
    }
    group.finish();
}

fn open_board_flood(c: &mut Criterion) {
    c.bench_function("flood_fill_200x200", |b| {
        b.iter(|| {
            let mut engine = PlayEngine::with_mines((200, 200), &[(199, 199)], false)
                .expect("layout fits the board");
            black_box(engine.reveal(black_box((0, 0))))
        })
    });
}

criterion_group!(benches, first_reveal, open_board_flood);
criterion_main!(benches);
