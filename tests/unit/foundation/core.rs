use super::*;

#[test]
fn rect_rejects_negative_dimensions() {
    assert!(matches!(
        Rect::new(0, 0, -1, 4),
        Err(PortaError::InvalidDimension {
            width: -1,
            height: 4
        })
    ));
    assert!(Rect::new(-5, -5, 0, 0).unwrap().is_empty());
}

#[test]
fn rect_contains_boundaries() {
    let r = Rect::new(2, 3, 4, 2).unwrap();
    assert!(r.contains(2, 3));
    assert!(r.contains(5, 4));
    assert!(!r.contains(6, 4));
    assert!(!r.contains(5, 5));
    assert!(!r.contains(1, 3));
}

#[test]
fn rect_intersect_and_bounding_box() {
    let a = Rect::new(0, 0, 4, 4).unwrap();
    let b = Rect::new(2, 1, 4, 4).unwrap();
    assert_eq!(a.intersect(b), Rect::new(2, 1, 2, 3).unwrap());
    assert_eq!(a.bounding_box(b), Rect::new(0, 0, 6, 5).unwrap());

    let far = Rect::new(10, 10, 1, 1).unwrap();
    assert!(a.intersect(far).is_empty());
    assert_eq!(a.bounding_box(Rect::default()), a);
}

#[test]
fn rect_translate_and_contains_rect() {
    let a = Rect::new(0, 0, 8, 8).unwrap();
    let b = Rect::new(1, 1, 2, 2).unwrap();
    assert!(a.contains_rect(b));
    assert!(!a.contains_rect(b.translate(7, 0)));
    assert_eq!(b.translate(-1, 3), Rect::new(0, 4, 2, 2).unwrap());
}

#[test]
fn extent_union_is_unbounded_if_either_side_is() {
    let a = Extent::Bounded(Rect::new(0, 0, 2, 2).unwrap());
    let b = Extent::Bounded(Rect::new(4, 0, 2, 2).unwrap());
    assert_eq!(a.union(b), Extent::Bounded(Rect::new(0, 0, 6, 2).unwrap()));
    assert_eq!(a.union(Extent::Unbounded), Extent::Unbounded);
    assert_eq!(Extent::Unbounded.rect(), None);
}

#[test]
fn node_id_display_includes_generation_when_reused() {
    let fresh = NodeId {
        index: 4,
        generation: 0,
    };
    let reused = NodeId {
        index: 4,
        generation: 2,
    };
    assert_eq!(fresh.to_string(), "node#4");
    assert_eq!(reused.to_string(), "node#4v2");
}
