use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use tidybridge_lib::diagnostics::{extract, segment};

/// A source file and the stderr perltidy would print for it, with `errors` diagnostics
fn generate_failure(lines: usize, errors: usize) -> (String, String) {
    let mut source = String::with_capacity(lines * 80);
    for i in 0..lines {
        source.push_str(&format!(
            "my $value_{i} = compute_something_long($argument_one, $argument_two, {i}) + 1\n"
        ));
    }

    let mut stderr = String::new();
    let step = (lines / errors.max(1)).max(1);
    for n in 0..errors {
        let line = (n * step).min(lines.saturating_sub(1)) + 1;
        match n % 3 {
            0 => stderr.push_str(&format!("<stdin>: {line}: (-se) Missing semicolon\n")),
            1 => {
                stderr.push_str(&format!(
                    "<stdin>: {line}: ... compute_something_long($argument_one, $argument_two ...\n"
                ));
                stderr.push_str(&format!("<stdin>: {line}:                 -------^\n"));
                stderr.push_str(&format!("<stdin>: {line}: found Scalar where operator expected\n"));
            }
            _ => {
                stderr.push_str(&format!("<stdin>: {line}: Unbalanced parens\n"));
                stderr.push_str("  (Missing right paren near here)\n");
            }
        }
    }
    stderr.push_str("<stdin>: 1: To save a full .LOG file rerun with -g\n");

    (source, stderr)
}

fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract");

    for (lines, errors) in [(100, 5), (1_000, 50), (10_000, 500)] {
        let (source, stderr) = generate_failure(lines, errors);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{lines}_lines_{errors}_errors")),
            &(source, stderr),
            |b, (source, stderr)| b.iter(|| extract(black_box(stderr), black_box(source))),
        );
    }

    group.finish();
}

fn bench_segment(c: &mut Criterion) {
    let (_, stderr) = generate_failure(10_000, 500);

    c.bench_function("segment_500_blocks", |b| b.iter(|| segment(black_box(&stderr))));
}

criterion_group!(benches, bench_extract, bench_segment);
criterion_main!(benches);
