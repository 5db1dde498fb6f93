use std::hint::black_box;

use chronos_engine::calendar::CalendarType;
use chronos_engine::config::{get_full_config, PartialTimeConfig};
use chronos_engine::convert::{calendar_to_ticks, ticks_to_calendar};
use chronos_engine::format::{format_local_date, DateFormat};
use criterion::{criterion_group, criterion_main, Criterion};

fn conversion(c: &mut Criterion) {
    let earth = get_full_config(&PartialTimeConfig::default());
    let mars = get_full_config(&PartialTimeConfig::for_calendar(CalendarType::MarsStandard));

    c.bench_function("ticks_to_calendar/earth", |b| {
        b.iter(|| ticks_to_calendar(black_box(987_654_321), &earth))
    });
    c.bench_function("ticks_to_calendar/mars", |b| {
        b.iter(|| ticks_to_calendar(black_box(987_654_321), &mars))
    });

    let date = ticks_to_calendar(987_654_321, &earth);
    c.bench_function("calendar_to_ticks/earth", |b| {
        b.iter(|| calendar_to_ticks(black_box(&date), &earth))
    });
    c.bench_function("render/full", |b| {
        b.iter(|| {
            format_local_date(
                &ticks_to_calendar(black_box(987_654_321), &earth),
                DateFormat::Full,
            )
        })
    });
}

fn config_resolution(c: &mut Criterion) {
    let partial = PartialTimeConfig {
        calendar: Some(CalendarType::MarsStandard),
        year_length: Some(700),
        ..PartialTimeConfig::default()
    };
    c.bench_function("get_full_config", |b| {
        b.iter(|| get_full_config(black_box(&partial)))
    });
}

criterion_group!(benches, conversion, config_resolution);
criterion_main!(benches);
