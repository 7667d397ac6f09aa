use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fitplan::injury::{resolve, InjuryType, InjuryZone};
use fitplan::profile::Choice;
use fitplan::{bmi, presenter, render};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Benchmarks for the pure calculations behind the form and results views

fn bench_bmi(c: &mut Criterion) {
    let mut group = c.benchmark_group("BMI");

    group.bench_function("classify", |b| {
        b.iter(|| bmi::classify(black_box(70.0), black_box(170.0)))
    });

    for &count in &[10u32, 100, 1000] {
        let values: Vec<Decimal> = (0..count)
            .map(|i| Decimal::from(i) * dec!(0.05))
            .collect();

        group.throughput(Throughput::Elements(u64::from(count)));
        group.bench_with_input(BenchmarkId::new("position", count), &values, |b, values| {
            b.iter(|| {
                for value in values {
                    black_box(bmi::position(*value));
                }
            });
        });
    }

    group.bench_function("bar", |b| b.iter(|| render::bmi_bar(black_box(dec!(27.3)))));

    group.finish();
}

fn bench_injury_resolver(c: &mut Criterion) {
    c.bench_function("resolve all type/zone pairs", |b| {
        b.iter(|| {
            for zone in InjuryZone::ALL {
                for injury_type in InjuryType::ALL {
                    black_box(resolve(*zone, *injury_type));
                }
            }
        })
    });
}

fn bench_macro_shares(c: &mut Criterion) {
    c.bench_function("percent_share", |b| {
        b.iter(|| {
            presenter::percent_share(
                black_box(150),
                presenter::PROTEIN_KCAL_PER_GRAM,
                black_box(2500),
            )
        })
    });
}

criterion_group!(
    benches,
    bench_bmi,
    bench_injury_resolver,
    bench_macro_shares
);
criterion_main!(benches);
