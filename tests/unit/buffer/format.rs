use super::*;

#[test]
fn tags_round_trip_through_from_str() {
    for f in PixelFormat::ALL {
        assert_eq!(f.tag().parse::<PixelFormat>().unwrap(), f);
    }
}

#[test]
fn parsing_tolerates_extra_whitespace() {
    assert_eq!("  Y   u8 ".parse::<PixelFormat>().unwrap(), PixelFormat::YU8);
}

#[test]
fn unknown_tag_is_rejected() {
    let err = "CMYK u16".parse::<PixelFormat>().unwrap_err();
    assert!(matches!(err, PortaError::UnknownFormat(ref s) if s == "CMYK u16"));
}

#[test]
fn sizes_follow_channel_layout() {
    assert_eq!(PixelFormat::RaGaBaAFloat.bytes_per_pixel(), 16);
    assert_eq!(PixelFormat::RgbaU8.bytes_per_pixel(), 4);
    assert_eq!(PixelFormat::YaU8.bytes_per_pixel(), 2);
    assert_eq!(PixelFormat::YU8.bytes_per_pixel(), 1);
    assert_eq!(PixelFormat::YFloat.bytes_per_pixel(), 4);
    assert!(PixelFormat::default().is_premultiplied());
}
