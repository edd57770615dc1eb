use chrono::{NaiveDate, NaiveDateTime};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sla_time::{BusinessOffset, BusinessTimeCalculator, ClosureInterval, ClosureSet, WorkingCalendar};

fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, d)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

fn bench_add_business_time(c: &mut Criterion) {
    let cal = WorkingCalendar::default();
    let empty = ClosureSet::empty();
    let closures: ClosureSet = (8..=26)
        .map(|d| ClosureInterval::new(at(d, 12, 0), 60).unwrap())
        .collect();

    let plain = BusinessTimeCalculator::new(&cal, &empty, "bench");
    c.bench_function("add 3d 4h 30m, no closures", |b| {
        b.iter(|| plain.add(black_box(at(8, 10, 15)), black_box(BusinessOffset::new(3, 4, 30))))
    });

    let lunches = BusinessTimeCalculator::new(&cal, &closures, "bench");
    c.bench_function("add 10d, daily lunch closures", |b| {
        b.iter(|| lunches.add(black_box(at(8, 10, 15)), black_box(BusinessOffset::new(10, 0, 0))))
    });
}

criterion_group!(benches, bench_add_business_time);
criterion_main!(benches);
