use super::*;

fn solid(w: u32, h: u32, px: [f32; 4]) -> PixelBuffer {
    PixelBuffer::filled(w, h, px).unwrap()
}

#[test]
fn src_over_opaque_aux_occludes_input() {
    let red = solid(2, 2, [1.0, 0.0, 0.0, 1.0]);
    let blue = solid(2, 2, [0.0, 0.0, 1.0, 1.0]);
    let out = compose(&red, Some(&blue), PorterDuff::SrcOver).unwrap();
    for px in out.pixels() {
        assert_eq!(px, &[0.0, 0.0, 1.0, 1.0]);
    }
}

#[test]
fn absent_aux_passes_input_through_for_every_operator() {
    let input = PixelBuffer::from_fn(3, 2, |x, y| [x as f32 * 0.1, y as f32 * 0.2, 0.5, 0.9]).unwrap();
    for op in PorterDuff::ALL {
        let out = compose(&input, None, op).unwrap();
        assert_eq!(out, input, "{op}");
        assert_eq!(
            out.to_byte_stream(PixelFormat::RaGaBaAFloat),
            input.to_byte_stream(PixelFormat::RaGaBaAFloat)
        );
    }
}

#[test]
fn mismatched_dimensions_are_rejected() {
    let a = solid(2, 2, [0.0; 4]);
    let b = solid(3, 2, [0.0; 4]);
    assert!(matches!(
        compose(&a, Some(&b), PorterDuff::Xor),
        Err(PortaError::FormatMismatch(_))
    ));
}

#[test]
fn non_working_formats_are_rejected() {
    let a = solid(1, 1, [0.0; 4]);
    let y = PixelBuffer::allocate(1, 1, PixelFormat::YFloat).unwrap();
    assert!(matches!(
        compose(&a, Some(&y), PorterDuff::Src),
        Err(PortaError::FormatMismatch(_))
    ));
    assert!(matches!(
        compose(&y, None, PorterDuff::Src),
        Err(PortaError::FormatMismatch(_))
    ));
}

#[test]
fn compose_named_resolves_or_fails() {
    let a = solid(1, 1, [0.5, 0.5, 0.5, 0.5]);
    let out = compose_named(&a, Some(&a), "clear").unwrap();
    assert_eq!(out.read_pixel(0, 0).unwrap(), &[0.0; 4]);
    assert!(matches!(
        compose_named(&a, Some(&a), "screen"),
        Err(PortaError::UnknownOperator(_))
    ));
}

#[test]
fn parallel_and_serial_rows_agree() {
    let (w, h) = (97u32, 83u32);
    let input = PixelBuffer::from_fn(w, h, |x, y| {
        let a = ((x * 7 + y * 3) % 11) as f32 / 10.0;
        [a * 0.5, a * (x % 3) as f32 / 2.0, a, a]
    })
    .unwrap();
    let aux = PixelBuffer::from_fn(w, h, |x, y| {
        let a = ((x + y * 5) % 13) as f32 / 12.0;
        [a, a * 0.25, 0.0, a]
    })
    .unwrap();
    for op in PorterDuff::ALL {
        let par = compose_with(&input, Some(&aux), op, true).unwrap();
        let ser = compose_with(&input, Some(&aux), op, false).unwrap();
        assert_eq!(
            par.to_byte_stream(PixelFormat::RaGaBaAFloat),
            ser.to_byte_stream(PixelFormat::RaGaBaAFloat),
            "{op}"
        );
    }
}

#[test]
fn empty_buffers_compose_to_empty() {
    let a = PixelBuffer::allocate(0, 4, PixelFormat::RaGaBaAFloat).unwrap();
    let out = compose(&a, Some(&a), PorterDuff::SrcOver).unwrap();
    assert!(out.is_empty());
    assert_eq!(out.height(), 4);
}
