use super::*;
use crate::foundation::{core::Rect, error::PortaError};
use serde_json::json;

fn ctx(w: i32, h: i32) -> EvalCtx {
    EvalCtx {
        rect: Rect::new(0, 0, w, h).unwrap(),
        scale: 1.0,
        parallel: true,
    }
}

#[test]
fn over_alias_shares_src_over() {
    let over = PorterDuffOp::over();
    assert_eq!(over.name(), "over");
    assert_eq!(over.op(), PorterDuff::SrcOver);
    assert_eq!(PorterDuffOp::new(PorterDuff::SrcOver).name(), "src_over");
    assert_eq!(over.kind(), OperationKind::Composer);
    assert_eq!(over.aux_slots(), &[AUX_SLOT]);
}

#[test]
fn aux_is_source_input_is_destination() {
    let input = PixelBuffer::filled(2, 2, [1.0, 0.0, 0.0, 1.0]).unwrap();
    let aux = PixelBuffer::filled(2, 2, [0.0, 0.0, 0.5, 0.5]).unwrap();
    let mut inputs = ResolvedInputs {
        input: Some(&input),
        ..Default::default()
    };
    inputs.aux.push((AUX_SLOT, &aux));

    let out = PorterDuffOp::over().evaluate(&inputs, &ctx(2, 2)).unwrap();
    assert_eq!(out.rgba(0, 0).unwrap(), [0.5, 0.0, 0.5, 1.0]);

    let out = PorterDuffOp::new(PorterDuff::Dst).evaluate(&inputs, &ctx(2, 2)).unwrap();
    assert_eq!(out, input);
}

#[test]
fn unbound_aux_passes_through() {
    let input = PixelBuffer::filled(1, 1, [0.1, 0.2, 0.3, 0.4]).unwrap();
    let inputs = ResolvedInputs {
        input: Some(&input),
        ..Default::default()
    };
    let out = PorterDuffOp::new(PorterDuff::Clear).evaluate(&inputs, &ctx(1, 1)).unwrap();
    assert_eq!(out, input);
}

#[test]
fn missing_input_is_an_error_even_with_aux() {
    let aux = PixelBuffer::filled(1, 1, [0.0; 4]).unwrap();
    let mut inputs = ResolvedInputs::default();
    inputs.aux.push((AUX_SLOT, &aux));
    assert!(matches!(
        PorterDuffOp::new(PorterDuff::Xor).evaluate(&inputs, &ctx(1, 1)),
        Err(PortaError::Validation(_))
    ));
}

#[test]
fn composers_take_no_parameters() {
    let op = PorterDuffOp::new(PorterDuff::Xor);
    assert!(op.with_params(&serde_json::Value::Null).is_ok());
    assert!(matches!(
        op.with_params(&json!({ "opacity": 0.5 })),
        Err(PortaError::UnknownParameter { op, .. }) if op == "xor"
    ));
}
