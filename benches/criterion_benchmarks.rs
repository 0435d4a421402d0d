use criterion::{black_box, criterion_group, criterion_main, Criterion};
use forgetful_map::ForgetfulTable;

fn make_table(cap: usize) -> ForgetfulTable<usize, usize> {
    ForgetfulTable::try_new(cap).unwrap()
}

pub fn criterion_benchmark(c: &mut Criterion) {
    const CACHE_SIZE: usize = 1000;
    let mut group = c.benchmark_group("Table Operations");

    {
        let mut table = make_table(CACHE_SIZE);
        for i in 0..CACHE_SIZE {
            table.put(i, i);
        }

        group.bench_function("get hit", |b| {
            b.iter(|| {
                for i in 0..100 {
                    black_box(table.get(&(i % CACHE_SIZE)));
                }
            });
        });

        group.bench_function("get miss", |b| {
            b.iter(|| {
                for i in 0..100 {
                    black_box(table.get(&(i + CACHE_SIZE)));
                }
            });
        });

        group.bench_function("access_count", |b| {
            b.iter(|| {
                for i in 0..100 {
                    black_box(table.access_count(&(i % CACHE_SIZE)));
                }
            });
        });
    }

    group.bench_function("put not full", |b| {
        b.iter(|| {
            let mut table = make_table(CACHE_SIZE);
            for i in 0..CACHE_SIZE / 2 {
                black_box(table.put(i, i));
            }
        });
    });

    {
        let mut table = make_table(CACHE_SIZE);
        for i in 0..CACHE_SIZE {
            table.put(i, i);
        }
        let mut next = CACHE_SIZE;

        // every put scans the full slot array for a victim
        group.bench_function("put with eviction", |b| {
            b.iter(|| {
                for _ in 0..100 {
                    next += 1;
                    black_box(table.put(next, next));
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
