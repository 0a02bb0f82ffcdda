use criterion::{criterion_group, criterion_main, Criterion};
use sexp_core::{format_text, refactor_text, DocumentKind};
use std::fmt::Write;
use std::hint::black_box;

/// A v3 level with `sectors` sectors, each holding a `width` x `height`
/// tilemap and a handful of objects.
fn generated_level(sectors: usize, width: usize, height: usize) -> String {
    let mut out = String::from("(supertux-level (version 3) (name (_ \"Bench\")) (sectors\n");
    for s in 0..sectors {
        write!(out, "(sector (name \"s{s}\") (music \"x.ogg\")").unwrap();
        write!(out, " (tilemap (solid #t) (width {width}) (height {height}) (tiles").unwrap();
        for i in 0..width * height {
            write!(out, " {}", i % 97).unwrap();
        }
        out.push_str("))");
        for i in 0..20 {
            write!(out, " (spiky (x {}) (y 64.5))", i * 32).unwrap();
        }
        out.push_str(")\n");
    }
    out.push_str("))\n");
    out
}

fn bench_layout(c: &mut Criterion) {
    let level = generated_level(4, 200, 30);
    let migrated = refactor_text(DocumentKind::Level, &level, 2).unwrap();

    c.bench_function("refactor_level", |b| {
        b.iter(|| refactor_text(DocumentKind::Level, black_box(&level), 2).unwrap())
    });
    c.bench_function("format_level", |b| {
        b.iter(|| format_text(black_box(&migrated), 2).unwrap())
    });
}

criterion_group!(benches, bench_layout);
criterion_main!(benches);
