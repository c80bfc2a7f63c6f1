use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dfasim::prelude::*;

fn load_and_recognize(c: &mut Criterion) {
    let text = dfasim::random::generate_random_definition("BENCH", 200, 8);
    c.bench_function("load 200 states", |b| {
        b.iter(|| load_definitions(black_box(&text)))
    });

    let registry = load_definitions(&text);
    let aut = registry.get("BENCH").expect("generated automaton must exist");
    let words = (0..32)
        .map(|_| dfasim::random::random_word(aut, 1000).expect("alphabet is not empty"))
        .collect::<Vec<_>>();
    c.bench_function("recognize 32 words of length 1000", |b| {
        b.iter(|| {
            words
                .iter()
                .filter(|word| aut.recognize(black_box(word)).accepted())
                .count()
        })
    });
}

criterion_group!(benches, load_and_recognize);
criterion_main!(benches);
