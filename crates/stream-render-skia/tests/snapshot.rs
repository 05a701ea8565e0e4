// File: crates/stream-render-skia/tests/snapshot.rs
// Purpose: Golden snapshot harness with bless flow.
// Behavior:
// - Renders a deterministic streamgraph (no labels) to PNG bytes.
// - If env UPDATE_SNAPSHOTS=1, (re)writes the snapshot file.
// - A missing snapshot is blessed from a first render, then checked against a second one.
// - An existing snapshot must match the decoded pixels exactly.

use stream_core::{ChartConfig, RawRecord, Streamgraph};
use stream_render_skia::{render_to_png_bytes, RenderOptions};

fn render_bytes(hover: Option<&str>) -> Vec<u8> {
    let months = ["2024-01-01", "2024-02-01", "2024-03-01", "2024-04-01", "2024-05-01", "2024-06-01"];
    let raw: Vec<RawRecord> = months
        .iter()
        .enumerate()
        .map(|(i, d)| {
            let i = i as i32;
            RawRecord::new()
                .with("Date", *d)
                .with("LLaMA-3.1", 10 + 3 * i)
                .with("Claude", 20 - 2 * i)
                .with("PaLM-2", 5 + (i % 3) * 4)
                .with("Gemini", 12)
                .with("GPT-4", 8 + i * i)
        })
        .collect();
    let graph = Streamgraph::build(ChartConfig::default(), &raw).expect("build");
    let opts = RenderOptions { draw_labels: false, hover: hover.map(|k| (k.to_string(), 120.0, 60.0)) };
    render_to_png_bytes(&graph, &opts).expect("render")
}

fn check(name: &str, render: impl Fn() -> Vec<u8>) {
    let snap_dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/__snapshots__");
    let snap_path = snap_dir.join(name);

    let update = std::env::var("UPDATE_SNAPSHOTS").ok().map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    if update || !snap_path.exists() {
        let bytes = render();
        std::fs::create_dir_all(&snap_dir).expect("create snapshots dir");
        std::fs::write(&snap_path, &bytes).expect("write snapshot");
        eprintln!("[snapshot] Wrote {} ({} bytes)", snap_path.display(), bytes.len());
    }

    let want = std::fs::read(&snap_path).expect("read snapshot");
    let got_img = image::load_from_memory(&render()).expect("decode got").to_rgba8();
    let want_img = image::load_from_memory(&want).expect("decode want").to_rgba8();
    assert_eq!((got_img.width(), got_img.height()), (800, 400));
    assert_eq!(got_img.as_raw(), want_img.as_raw(), "rendered pixels differ from golden snapshot: {}", snap_path.display());
}

#[test]
fn golden_default_streamgraph() {
    check("streamgraph_default.png", || render_bytes(None));
}

#[test]
fn golden_hover_tooltip() {
    check("streamgraph_hover_gpt4.png", || render_bytes(Some("GPT-4")));
}

#[test]
fn hover_snapshot_differs_from_plain_chart() {
    let plain = image::load_from_memory(&render_bytes(None)).expect("decode plain").to_rgba8();
    let hover = image::load_from_memory(&render_bytes(Some("GPT-4"))).expect("decode hover").to_rgba8();
    let changed = plain.pixels().zip(hover.pixels()).filter(|(a, b)| a != b).count();
    assert!(changed > 1_000, "only {changed} pixels changed");
}
