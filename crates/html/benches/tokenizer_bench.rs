use criterion::{Criterion, black_box, criterion_group, criterion_main};
use html::{NullSink, TokenPools, Tokenizer, TokenizerConfig};

const SMALL_BLOCKS: usize = 64;
const LARGE_BLOCKS: usize = 20_000;

fn make_blocks(blocks: usize) -> String {
    let mut input = String::with_capacity(blocks * 64);
    input.push_str("<!DOCTYPE html>");
    for _ in 0..blocks {
        input.push_str("<div class=box><span>hello</span><img src=x></div>");
    }
    input
}

fn make_entity_dense(blocks: usize) -> String {
    let mut input = String::with_capacity(blocks * 48);
    for _ in 0..blocks {
        input.push_str("fish &amp; chips &lt;&gt; &#x2209; &notin; &copy ");
    }
    input
}

fn run_tokenizer(input: &str) -> u64 {
    let mut sink = NullSink;
    let mut tokenizer = Tokenizer::new(input, TokenPools::new(), TokenizerConfig::default());
    let produced = tokenizer.tokenize(&mut sink);
    assert!(produced);
    tokenizer.stats().tokens_emitted
}

fn bench_tokenize_small(c: &mut Criterion) {
    let input = make_blocks(SMALL_BLOCKS);
    c.bench_function("bench_tokenize_small", |b| {
        b.iter(|| black_box(run_tokenizer(black_box(&input))));
    });
}

fn bench_tokenize_large(c: &mut Criterion) {
    let input = make_blocks(LARGE_BLOCKS);
    c.bench_function("bench_tokenize_large", |b| {
        b.iter(|| black_box(run_tokenizer(black_box(&input))));
    });
}

fn bench_tokenize_entity_dense(c: &mut Criterion) {
    let input = make_entity_dense(LARGE_BLOCKS / 4);
    c.bench_function("bench_tokenize_entity_dense", |b| {
        b.iter(|| black_box(run_tokenizer(black_box(&input))));
    });
}

criterion_group!(
    benches,
    bench_tokenize_small,
    bench_tokenize_large,
    bench_tokenize_entity_dense
);
criterion_main!(benches);
