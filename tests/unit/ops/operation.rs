use super::*;

#[derive(Debug)]
struct Probe(OperationKind);

impl Operation for Probe {
    fn name(&self) -> &str {
        "probe"
    }

    fn kind(&self) -> OperationKind {
        self.0
    }

    fn evaluate(&self, _inputs: &ResolvedInputs<'_>, ctx: &EvalCtx) -> PortaResult<PixelBuffer> {
        PixelBuffer::for_rect(ctx.rect)
    }
}

fn bounded(x: i32, y: i32, w: i32, h: i32) -> Extent {
    Extent::Bounded(Rect::new(x, y, w, h).unwrap())
}

#[test]
fn kinds_declare_their_slots() {
    assert!(!OperationKind::Source.has_input());
    assert!(OperationKind::Filter.has_input());
    assert!(OperationKind::Composer.has_input());
    assert_eq!(OperationKind::Composer.aux_slots(), &[AUX_SLOT]);
    assert!(OperationKind::Filter.aux_slots().is_empty());
    assert_eq!(Probe(OperationKind::Composer).aux_slots(), &["aux"]);
}

#[test]
fn default_hooks() {
    let op = Probe(OperationKind::Filter);
    let roi = Rect::new(-3, 4, 5, 6).unwrap();
    assert_eq!(op.input_request(INPUT_SLOT, roi, 2.0), roi);
    assert_eq!(op.params(), serde_json::json!({}));
}

#[test]
fn default_defined_regions_follow_kind() {
    assert_eq!(
        Probe(OperationKind::Source).defined_region(None, None),
        Extent::Unbounded
    );
    assert_eq!(
        Probe(OperationKind::Filter).defined_region(Some(bounded(1, 1, 2, 2)), None),
        bounded(1, 1, 2, 2)
    );
    assert_eq!(
        Probe(OperationKind::Composer)
            .defined_region(Some(bounded(0, 0, 2, 2)), Some(bounded(4, 4, 2, 2))),
        bounded(0, 0, 6, 6)
    );
    assert_eq!(
        Probe(OperationKind::Composer).defined_region(None, Some(bounded(4, 4, 2, 2))),
        bounded(4, 4, 2, 2)
    );
}

#[test]
fn scene_point_samples_pixel_centres() {
    let ctx = EvalCtx {
        rect: Rect::new(2, -1, 4, 4).unwrap(),
        scale: 2.0,
        parallel: false,
    };
    assert_eq!(ctx.scene_point(0, 0), (1.25, -0.25));
    assert_eq!(ctx.scene_point(1, 2), (1.75, 0.75));
}

#[test]
fn resolved_inputs_lookup() {
    let buf = PixelBuffer::filled(1, 1, [0.0; 4]).unwrap();
    let mut inputs = ResolvedInputs::default();
    assert!(inputs.aux(AUX_SLOT).is_none());
    assert!(matches!(
        inputs.require_input("probe"),
        Err(PortaError::Validation(_))
    ));
    inputs.input = Some(&buf);
    inputs.aux.push((AUX_SLOT, &buf));
    assert!(inputs.aux(AUX_SLOT).is_some());
    assert!(inputs.aux("mask").is_none());
    assert!(inputs.require_input("probe").is_ok());
}
