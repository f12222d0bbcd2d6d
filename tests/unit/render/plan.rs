use super::*;
use crate::ops::{
    composer::PorterDuffOp,
    filter::{Nop, Translate},
    source::ColorSource,
};

fn rect(x: i32, y: i32, w: i32, h: i32) -> Rect {
    Rect::new(x, y, w, h).unwrap()
}

fn flat(graph: &mut Graph) -> NodeId {
    graph.add(ColorSource::new([1.0, 1.0, 1.0, 1.0]).unwrap())
}

#[test]
fn steps_are_dependencies_first() {
    let mut graph = Graph::new();
    let src = flat(&mut graph);
    let nop = graph.add(Nop);
    graph.connect_default(nop, src).unwrap();

    let plan = compile_plan(&graph, nop, rect(0, 0, 4, 4), 1.0, true).unwrap();
    assert_eq!(plan.len(), 2);
    assert_eq!(plan.steps[0].node, src);
    assert_eq!(plan.steps[1].node, nop);
    assert_eq!(plan.steps[1].input, Some(StepId(0)));
    assert_eq!(plan.revision, graph.revision());
    assert_eq!(plan.target, nop);
}

#[test]
fn translate_requests_a_shifted_rect_upstream() {
    let mut graph = Graph::new();
    let src = flat(&mut graph);
    let shift = graph.add(Translate::new(2.0, 3.0).unwrap());
    graph.connect_default(shift, src).unwrap();

    let plan = compile_plan(&graph, shift, rect(10, 10, 5, 5), 2.0, true).unwrap();
    assert_eq!(plan.steps[0].rect, rect(6, 4, 5, 5));
    assert_eq!(plan.steps[1].rect, rect(10, 10, 5, 5));
}

#[test]
fn memo_shares_diamond_branches() {
    let mut graph = Graph::new();
    let src = flat(&mut graph);
    let over = graph.add(PorterDuffOp::over());
    graph.node(over).input(src).unwrap().aux(src).unwrap();

    let shared = compile_plan(&graph, over, rect(0, 0, 2, 2), 1.0, true).unwrap();
    assert_eq!(shared.len(), 2);
    assert_eq!(shared.evaluations_of(src), 1);
    let last = shared.steps.last().unwrap();
    assert_eq!(last.input, Some(StepId(0)));
    assert_eq!(last.aux.as_slice(), &[("aux", StepId(0))]);

    let unshared = compile_plan(&graph, over, rect(0, 0, 2, 2), 1.0, false).unwrap();
    assert_eq!(unshared.len(), 3);
    assert_eq!(unshared.evaluations_of(src), 2);
}

#[test]
fn different_rects_are_not_shared() {
    let mut graph = Graph::new();
    let src = flat(&mut graph);
    let shift = graph.add(Translate::new(1.0, 0.0).unwrap());
    graph.connect_default(shift, src).unwrap();
    let over = graph.add(PorterDuffOp::over());
    graph.node(over).input(src).unwrap().aux(shift).unwrap();

    let plan = compile_plan(&graph, over, rect(0, 0, 2, 2), 1.0, true).unwrap();
    assert_eq!(plan.evaluations_of(src), 2);
}

#[test]
fn unbound_default_input_is_missing() {
    let mut graph = Graph::new();
    let nop = graph.add(Nop);
    let err = compile_plan(&graph, nop, rect(1, 2, 3, 4), 1.0, true).unwrap_err();
    match err {
        PortaError::MissingInput { node, slot, rect: r } => {
            assert_eq!(node, nop);
            assert_eq!(slot, INPUT_SLOT);
            assert_eq!(r, rect(1, 2, 3, 4));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn unbound_aux_is_skipped() {
    let mut graph = Graph::new();
    let src = flat(&mut graph);
    let over = graph.add(PorterDuffOp::over());
    graph.connect_default(over, src).unwrap();
    let plan = compile_plan(&graph, over, rect(0, 0, 1, 1), 1.0, true).unwrap();
    assert!(plan.steps[1].aux.is_empty());
}

#[test]
fn cycles_are_found_while_resolving() {
    let mut graph = Graph::new();
    let a = graph.add(Nop);
    let b = graph.add(Nop);
    graph.link_many(&[a, b, a]).unwrap();
    for memoize in [true, false] {
        assert!(matches!(
            compile_plan(&graph, b, rect(0, 0, 1, 1), 1.0, memoize),
            Err(PortaError::CyclicGraph { consumer, producer, .. })
                if consumer == a && producer == b
        ));
    }
}

#[test]
fn removed_producers_are_unknown() {
    let mut graph = Graph::new();
    let src = flat(&mut graph);
    let nop = graph.add(Nop);
    graph.connect_default(nop, src).unwrap();
    graph.remove_node(src).unwrap();
    assert!(matches!(
        compile_plan(&graph, nop, rect(0, 0, 1, 1), 1.0, true),
        Err(PortaError::UnknownNode(id)) if id == src
    ));
}

#[test]
fn request_is_validated() {
    let mut graph = Graph::new();
    let src = flat(&mut graph);
    for scale in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        assert!(matches!(
            compile_plan(&graph, src, rect(0, 0, 1, 1), scale, true),
            Err(PortaError::InvalidScale(_))
        ));
    }
    let negative = Rect {
        x: 0,
        y: 0,
        width: -1,
        height: 2,
    };
    assert!(matches!(
        compile_plan(&graph, src, negative, 1.0, true),
        Err(PortaError::InvalidDimension { width: -1, height: 2 })
    ));
}

#[test]
fn empty_requests_still_plan() {
    let mut graph = Graph::new();
    let src = flat(&mut graph);
    let plan = compile_plan(&graph, src, rect(5, 5, 0, 0), 1.0, true).unwrap();
    assert_eq!(plan.len(), 1);
}
