//! Benchmarks for the page text passes.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use sight_text::{reflow, NoiseFilter};

/// Build OCR-like output: wrapped prose, hyphenated breaks and symbol debris.
fn make_page(num_lines: usize) -> String {
    let mut page = String::new();
    for i in 0..num_lines {
        match i % 7 {
            0 => page.push_str("Capítulo com título em maiúsculas\n"),
            3 => page.push_str("||| ~~ ### ^^ 1234\n"),
            4 => page.push_str("uma palavra quebra-\n"),
            6 => page.push('\n'),
            _ => page.push_str("texto   corrido que continua na linha seguinte sem pontuação\n"),
        }
    }
    page
}

fn bench_noise_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("NoiseFilter");
    let filter = NoiseFilter::default();
    let small = make_page(50);
    let large = make_page(2000);

    group.bench_function("page_50_lines", |b| {
        b.iter(|| black_box(filter.apply(black_box(&small))))
    });
    group.bench_function("page_2000_lines", |b| {
        b.iter(|| black_box(filter.apply(black_box(&large))))
    });

    group.finish();
}

fn bench_reflow(c: &mut Criterion) {
    let mut group = c.benchmark_group("Reflow");
    let filter = NoiseFilter::default();
    let cleaned = filter.apply(&make_page(2000));

    group.bench_function("reflow_2000_lines", |b| {
        b.iter(|| black_box(reflow(black_box(&cleaned))))
    });
    group.bench_function("filter_then_reflow_50_pages", |b| {
        let pages: Vec<String> = (0..50).map(|_| make_page(40)).collect();
        b.iter(|| {
            let mut text = String::new();
            for page in &pages {
                text.push_str(&filter.apply(page));
                text.push_str("\n\n");
            }
            black_box(reflow(&text))
        })
    });

    group.finish();
}

criterion_group!(benches, bench_noise_filter, bench_reflow);
criterion_main!(benches);
