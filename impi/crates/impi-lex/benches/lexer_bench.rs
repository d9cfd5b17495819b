//! Lexer benchmarks.
//!
//! Run with: `cargo bench --package impi-lex`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use impi_lex::{Lexer, TokenKind};

fn lexer_token_count(source: &str) -> usize {
    let mut lexer = Lexer::new(source);
    let mut count = 0;
    loop {
        match lexer.next_token() {
            Ok(token) if token.kind == TokenKind::Eof => return count,
            Ok(_) => count += 1,
            Err(_) => return count,
        }
    }
}

fn bench_lexer_statements(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer");

    let source = "program { int n; int s; n = 5; s = 0; \
                  while (n > 0) { s = s + n; n = n - 1; } write(s); }";
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("assignment", |b| {
        b.iter(|| lexer_token_count(black_box("a = 2 + 3 * 4;")))
    });

    group.bench_function("loop_program", |b| {
        b.iter(|| lexer_token_count(black_box(source)))
    });

    group.finish();
}

fn bench_lexer_literals(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_literals");

    group.bench_function("integers", |b| {
        b.iter(|| lexer_token_count(black_box("1 22 333 4444 55555 666666;")))
    });

    group.bench_function("reals", |b| {
        b.iter(|| lexer_token_count(black_box("1.0 2.25 3.14159 0.5;")))
    });

    group.bench_function("strings", |b| {
        b.iter(|| {
            lexer_token_count(black_box(
                "\"short\" \"a somewhat longer string literal for the pool\";",
            ))
        })
    });

    group.finish();
}

fn bench_lexer_comments(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_comments");

    group.bench_function("comment_heavy", |b| {
        b.iter(|| {
            lexer_token_count(black_box(
                "/* a */ x /* b */ = /* c */ 1 /* d */ ; /* trailing */",
            ))
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_lexer_statements,
    bench_lexer_literals,
    bench_lexer_comments
);
criterion_main!(benches);
