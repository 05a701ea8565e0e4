// File: crates/stream-core/tests/hover.rs
// Purpose: Hover lifecycle against an in-memory target: one tooltip at a time, removed on leave.

use stream_core::interaction::HoverContext;
use stream_core::{
    ChartConfig, Effect, InteractionController, Mount, NodeClass, PointerEvent, RawRecord, SceneTarget, Streamgraph,
};

fn two_month_graph() -> Streamgraph {
    let raw = vec![
        RawRecord::new().with("Date", "2024-01-01").with("A", 7).with("B", 1),
        RawRecord::new().with("Date", "2024-02-01").with("A", 9).with("B", 2),
    ];
    Streamgraph::build(ChartConfig::for_keys(["A", "B"]), &raw).expect("build")
}

fn graph() -> Streamgraph {
    let raw = vec![
        RawRecord::new().with("Date", "2024-01-01").with("A", 10).with("B", 4),
        RawRecord::new().with("Date", "2024-02-01").with("A", 20).with("B", 5),
        RawRecord::new().with("Date", "2024-03-01").with("A", 15).with("B", 8),
    ];
    Streamgraph::build(ChartConfig::for_keys(["A", "B"]), &raw).expect("build")
}

fn enter(key: &str) -> PointerEvent {
    PointerEvent::Enter { key: key.into(), x: 100.0, y: 100.0 }
}

#[test]
fn enter_move_leave() {
    let g = graph();
    let mut mount = Mount::new(SceneTarget::new());
    let mut ctl = InteractionController::new();
    g.render(&mut mount).unwrap();
    let chart_nodes = mount.target().nodes().len();

    let fx = g.pointer(&mut ctl, &mut mount, enter("B")).unwrap();
    assert!(matches!(fx, Effect::Show { ref key, .. } if key == "B"));
    let tip = ctl.tooltip().expect("tooltip shown");
    assert_eq!(tip.chart.key, "B");
    assert_eq!(tip.chart.bars.iter().map(|b| b.value).collect::<Vec<_>>(), vec![4.0, 5.0, 8.0]);
    assert_eq!(tip.chart.bars.iter().map(|b| b.label.as_str()).collect::<Vec<_>>(), vec!["Jan", "Feb", "Mar"]);
    assert_eq!(tip.position, kurbo::Point::new(120.0, 120.0));
    assert_eq!(mount.target().count(NodeClass::Bar), 3);

    g.pointer(&mut ctl, &mut mount, PointerEvent::Move { x: 130.0, y: 90.0 }).unwrap();
    assert_eq!(ctl.tooltip().map(|t| t.position), Some(kurbo::Point::new(150.0, 110.0)));
    assert_eq!(mount.target().count(NodeClass::Bar), 3);

    let fx = g.pointer(&mut ctl, &mut mount, PointerEvent::Leave).unwrap();
    assert_eq!(fx, Effect::Hide);
    assert!(ctl.tooltip().is_none());
    assert_eq!(mount.target().nodes().len(), chart_nodes);
}

#[test]
fn reentering_never_stacks_tooltips() {
    let g = graph();
    let mut mount = Mount::new(SceneTarget::new());
    let mut ctl = InteractionController::new();
    g.render(&mut mount).unwrap();
    for key in ["A", "B", "A", "A"] {
        g.pointer(&mut ctl, &mut mount, enter(key)).unwrap();
        assert_eq!(mount.target().count(NodeClass::Bar), 3);
    }
    assert_eq!(ctl.tooltip().map(|t| t.chart.key.as_str()), Some("A"));
}

#[test]
fn unknown_key_and_idle_events_are_ignored() {
    let g = graph();
    let mut ctl = InteractionController::new();
    let ctx: HoverContext<'_> = g.hover_context();
    assert_eq!(ctl.handle(&ctx, enter("nope")), Effect::None);
    assert_eq!(ctl.handle(&ctx, PointerEvent::Move { x: 0.0, y: 0.0 }), Effect::None);
    assert_eq!(ctl.handle(&ctx, PointerEvent::Leave), Effect::None);
    assert!(ctl.tooltip().is_none());
}

#[test]
fn mini_chart_value_axis_starts_at_zero() {
    let g = graph();
    let mut ctl = InteractionController::new();
    ctl.handle(&g.hover_context(), enter("A"));
    let chart = &ctl.tooltip().expect("tooltip").chart;
    assert_eq!(chart.y.domain, (0.0, 20.0));
    let tallest = chart.bars.iter().map(|b| b.rect.height()).fold(0.0, f64::max);
    assert!((tallest - chart.height).abs() < 1e-9);
}

#[test]
fn new_dataset_drops_overlay() {
    let g = graph();
    let mut mount = Mount::new(SceneTarget::new());
    let mut ctl = InteractionController::new();
    g.render(&mut mount).unwrap();
    g.pointer(&mut ctl, &mut mount, enter("A")).unwrap();
    g.render(&mut mount).unwrap();
    assert!(mount.overlay().is_none());
    assert_eq!(mount.target().count(NodeClass::Bar), 0);
}

#[test]
fn new_dataset_discards_previous_hover() {
    let old = graph();
    let new = two_month_graph();
    assert_ne!(old.generation(), new.generation());

    let mut mount = Mount::new(SceneTarget::new());
    let mut ctl = InteractionController::new();
    old.render(&mut mount).unwrap();
    old.pointer(&mut ctl, &mut mount, enter("A")).unwrap();
    assert_eq!(mount.target().count(NodeClass::Bar), 3);

    new.render(&mut mount).unwrap();
    let fx = new.pointer(&mut ctl, &mut mount, PointerEvent::Move { x: 140.0, y: 90.0 }).unwrap();
    assert_eq!(fx, Effect::None);
    assert_eq!(ctl.state().key(), None);
    assert!(ctl.tooltip().is_none());
    assert_eq!(ctl.generation(), Some(new.generation()));
    assert_eq!(mount.target().count(NodeClass::Bar), 0);

    // Hovering again builds the mini chart from the new records.
    new.pointer(&mut ctl, &mut mount, enter("A")).unwrap();
    let values: Vec<f64> = ctl.tooltip().expect("tooltip").chart.bars.iter().map(|b| b.value).collect();
    assert_eq!(values, vec![7.0, 9.0]);
    assert_eq!(mount.target().count(NodeClass::Bar), 2);
}

#[test]
fn render_with_resets_controller() {
    let g = graph();
    let mut mount = Mount::new(SceneTarget::new());
    let mut ctl = InteractionController::new();
    g.render(&mut mount).unwrap();
    g.pointer(&mut ctl, &mut mount, enter("B")).unwrap();

    two_month_graph().render_with(&mut ctl, &mut mount).unwrap();
    assert_eq!(ctl.state().key(), None);
    assert!(ctl.tooltip().is_none());
    assert!(mount.overlay().is_none());
}
