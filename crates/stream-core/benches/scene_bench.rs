use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use stream_core::{ChartConfig, Mount, Record, SceneTarget, Streamgraph};

fn build_graph(n: usize) -> Streamgraph {
    let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    let cfg = ChartConfig::default();
    let k = cfg.keys.len();
    let recs = (0..n)
        .map(|j| {
            let values = (0..k).map(|i| (j * (i + 3) % 97) as f64).collect();
            Record::new(start + Duration::days(j as i64), values)
        })
        .collect();
    Streamgraph::from_records(cfg, recs)
}

fn bench_scene(c: &mut Criterion) {
    let mut group = c.benchmark_group("chart_scene");
    for &n in &[12usize, 1_000, 10_000] {
        let g = build_graph(n);
        group.bench_function(format!("scene_{n}"), |b| b.iter(|| black_box(g.scene())));
        group.bench_function(format!("mount_{n}"), |b| {
            let mut mount = Mount::new(SceneTarget::new());
            b.iter(|| g.render(&mut mount).unwrap());
        });
        group.bench_function(format!("hit_{n}"), |b| b.iter(|| black_box(g.layer_at(210.0, 185.0).is_some())));
    }
    group.finish();
}

criterion_group!(benches, bench_scene);
criterion_main!(benches);
