// Benchmark for layout passes
// Measures overlap placement and full week/month render passes

use calendar_layout::models::event::Event;
use calendar_layout::models::settings::LayoutSettings;
use calendar_layout::models::timezone::{EventTime, Timezone};
use calendar_layout::services::overlap::OverlapLayoutEngine;
use calendar_layout::services::render::RenderPass;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use chrono_tz::Tz;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn week_start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 5)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .unwrap()
}

/// `count` events spread over four weeks; every tenth one runs overnight.
fn generate_events(count: usize) -> Vec<Event> {
    let tz = Timezone::Named(Tz::Europe__Berlin);
    (0..count)
        .map(|i| {
            let start = week_start()
                + Duration::days((i % 28) as i64)
                + Duration::minutes(((i * 37) % 1380) as i64);
            let length = if i % 10 == 0 { 1800 } else { 30 + (i % 4) as i64 * 15 };
            Event::new(
                i as i64,
                EventTime::in_zone(start, tz),
                EventTime::in_zone(start + Duration::minutes(length), tz),
            )
        })
        .collect()
}

fn bench_overlap_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("overlap_layout");

    for count in [10, 100, 1000].iter() {
        let events: Vec<Event> = generate_events(*count)
            .into_iter()
            .map(|mut event| {
                // Fold everything onto one day
                event.start = event.start.map(|t| EventTime::floating(t.wall_clock()));
                event.end = event.start.map(|t| EventTime::floating(t.wall_clock() + Duration::minutes(45)));
                event
            })
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(count), &events, |b, events| {
            b.iter(|| OverlapLayoutEngine::layout(black_box(events), None, None));
        });
    }

    group.finish();
}

fn bench_render_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_pass");
    let settings = LayoutSettings {
        visitor_timezone: Some("Asia/Tokyo".to_string()),
        ..LayoutSettings::default()
    };
    let monday = week_start().date() + Duration::days(1);

    for count in [100, 1000].iter() {
        let events = generate_events(*count);

        group.bench_with_input(BenchmarkId::new("week", count), &events, |b, events| {
            b.iter(|| {
                let mut pass = RenderPass::new(black_box(events), &settings).unwrap();
                pass.week_view(monday)
                    .slots
                    .iter()
                    .map(|slots| slots.len())
                    .sum::<usize>()
            });
        });

        group.bench_with_input(BenchmarkId::new("month", count), &events, |b, events| {
            b.iter(|| {
                let mut pass = RenderPass::new(black_box(events), &settings).unwrap();
                pass.month_view(2025, 1).unwrap().rows.len()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_overlap_layout, bench_render_pass);
criterion_main!(benches);
