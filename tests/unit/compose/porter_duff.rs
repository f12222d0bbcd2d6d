use super::*;

const EPS: f32 = 1e-6;

/// The operator table written out literally, independent of the factor encoding.
fn reference(op: PorterDuff, a: Rgba, b: Rgba) -> Rgba {
    let (a_a, a_b) = (a[3], b[3]);
    let color = |c_a: f32, c_b: f32| match op {
        PorterDuff::Clear => 0.0,
        PorterDuff::Src => c_a,
        PorterDuff::Dst => c_b,
        PorterDuff::SrcOver => c_a + c_b * (1.0 - a_a),
        PorterDuff::DstOver => c_b + c_a * (1.0 - a_b),
        PorterDuff::SrcIn => c_a * a_b,
        PorterDuff::DstIn => c_b * a_a,
        PorterDuff::SrcOut => c_a * (1.0 - a_b),
        PorterDuff::DstOut => c_b * (1.0 - a_a),
        PorterDuff::SrcAtop => c_a * a_b + c_b * (1.0 - a_a),
        PorterDuff::DstAtop => c_b * a_a + c_a * (1.0 - a_b),
        PorterDuff::Xor => c_a * (1.0 - a_b) + c_b * (1.0 - a_a),
    };
    let alpha = match op {
        PorterDuff::Clear => 0.0,
        PorterDuff::Src => a_a,
        PorterDuff::Dst => a_b,
        PorterDuff::SrcOver | PorterDuff::DstOver => a_a + a_b - a_a * a_b,
        PorterDuff::SrcIn | PorterDuff::DstIn => a_a * a_b,
        PorterDuff::SrcOut => a_a * (1.0 - a_b),
        PorterDuff::DstOut => a_b * (1.0 - a_a),
        PorterDuff::SrcAtop => a_b,
        PorterDuff::DstAtop => a_a,
        PorterDuff::Xor => a_a + a_b - 2.0 * a_a * a_b,
    };
    [color(a[0], b[0]), color(a[1], b[1]), color(a[2], b[2]), alpha]
}

fn samples() -> Vec<f32> {
    vec![0.0, 0.1, 0.25, 0.5, 0.8, 1.0]
}

#[test]
fn every_operator_matches_the_table_on_a_grid() {
    for op in PorterDuff::ALL {
        for &a_a in &samples() {
            for &a_b in &samples() {
                for &c in &samples() {
                    // keep color premultiplied-plausible but exercise independent channels
                    let a = [c * a_a, 0.3 * a_a, a_a, a_a];
                    let b = [0.7 * a_b, c * a_b, 0.0, a_b];
                    let got = op.apply(a, b);
                    let want = reference(op, a, b);
                    for ch in 0..4 {
                        assert!(
                            (got[ch] - want[ch]).abs() <= EPS,
                            "{op} channel {ch}: got {got:?} want {want:?} for a={a:?} b={b:?}"
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn clear_is_always_transparent_black() {
    for a in [[1.0, 1.0, 1.0, 1.0], [0.2, 0.1, 0.0, 0.3], [5.0, -2.0, 0.0, 9.0]] {
        assert_eq!(PorterDuff::Clear.apply(a, [0.4, 0.4, 0.4, 0.4]), [0.0; 4]);
    }
}

#[test]
fn src_over_and_dst_over_share_the_alpha_formula() {
    let (a_a, a_b) = (0.6_f32, 0.3_f32);
    let a = [0.6, 0.0, 0.0, a_a];
    let b = [0.0, 0.3, 0.0, a_b];
    let expected = a_a + a_b - a_a * a_b;
    assert!((PorterDuff::SrcOver.apply(a, b)[3] - expected).abs() <= EPS);
    assert!((PorterDuff::DstOver.apply(a, b)[3] - expected).abs() <= EPS);
}

#[test]
fn xor_of_two_opaque_pixels_is_fully_transparent() {
    let out = PorterDuff::Xor.apply([1.0, 0.0, 0.0, 1.0], [0.0, 0.0, 1.0, 1.0]);
    assert_eq!(out, [0.0; 4]);
}

#[test]
fn out_of_range_inputs_are_not_clamped() {
    let out = PorterDuff::SrcOver.apply([2.0, 0.0, 0.0, 0.5], [1.0, 1.0, 1.0, 1.0]);
    assert!((out[0] - 2.5).abs() <= EPS);
    let out = PorterDuff::DstOut.apply([0.0, 0.0, 0.0, 1.5], [1.0, 1.0, 1.0, 1.0]);
    assert!((out[3] + 0.5).abs() <= EPS);
}

#[test]
fn src_and_dst_copy_exactly() {
    let a = [0.1, 0.2, 0.3, 0.4];
    let b = [0.5, 0.6, 0.7, 0.8];
    assert_eq!(PorterDuff::Src.apply(a, b), a);
    assert_eq!(PorterDuff::Dst.apply(a, b), b);
}

#[test]
fn names_parse_back_and_aliases_resolve() {
    for op in PorterDuff::ALL {
        assert_eq!(op.name().parse::<PorterDuff>().unwrap(), op);
        assert_eq!(op.formula().op, op);
    }
    assert_eq!("over".parse::<PorterDuff>().unwrap(), PorterDuff::SrcOver);
    assert_eq!("dst-atop".parse::<PorterDuff>().unwrap(), PorterDuff::DstAtop);
}

#[test]
fn unknown_operator_name_is_rejected() {
    let err = "multiply".parse::<PorterDuff>().unwrap_err();
    assert!(matches!(err, PortaError::UnknownOperator(ref s) if s == "multiply"));
}
