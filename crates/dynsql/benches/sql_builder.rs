use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use dynsql::condition::{is_equal_to, is_in};
use dynsql::prelude::{QueryExpressionFinisher, QueryExpressionStage, WhereBuilder};
use dynsql::qb::SelectModel;
use dynsql::{Column, DataType, RenderConfig, Renderable, Table, select};

/// Build a select over `n` columns with one equality criterion per column:
/// select col0, col1, ... from t where col0 = $1 and col1 = $2 ...
fn build_select(n: usize) -> SelectModel {
    let table = Table::new("t");
    let columns: Vec<Column<i64>> = (0..n)
        .map(|i| table.column(&format!("col{i}"), DataType::BigInt))
        .collect();

    let mut dsl = select(columns.iter().collect::<Vec<_>>())
        .from(&table)
        .where_(&columns[0], is_equal_to(0i64));
    for (i, column) in columns.iter().enumerate().skip(1) {
        dsl = dsl.and(column, is_equal_to(i as i64));
    }
    dsl.build().expect("non-empty select list")
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/render");

    for n in [1, 5, 10, 50, 100] {
        let model = build_select(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &model, |b, model| {
            b.iter(|| black_box(model.to_statement()));
        });
    }

    group.finish();
}

fn bench_build_and_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/build_and_render");

    for n in [1, 5, 10, 50, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| black_box(build_select(n).to_statement()));
        });
    }

    group.finish();
}

fn bench_in_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/in_list");
    let table = Table::new("t");
    let id = table.column::<i64>("id", DataType::BigInt);
    let config = RenderConfig::numbered().no_truncate();

    for n in [5, 20, 100, 500] {
        let values: Vec<i64> = (0..n).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &values, |b, values| {
            b.iter(|| {
                let model = select(&id)
                    .from(&table)
                    .where_(&id, is_in(values.iter().copied()))
                    .build()
                    .expect("non-empty select list");
                black_box(model.render(&config));
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_render, bench_build_and_render, bench_in_list);
criterion_main!(benches);
