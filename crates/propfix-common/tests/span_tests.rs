use super::*;

#[test]
fn touching_spans_intersect_but_do_not_overlap() {
    let a = TextSpan::new(0, 4);
    let b = TextSpan::new(4, 8);
    assert!(a.intersects_with(b));
    assert!(b.intersects_with(a));
    assert!(!a.overlaps_with(b));
}

#[test]
fn disjoint_spans_do_not_intersect() {
    let a = TextSpan::new(0, 3);
    let b = TextSpan::new(5, 8);
    assert!(!a.intersects_with(b));
    assert!(!a.overlaps_with(b));
}

#[test]
fn empty_span_inside_intersects() {
    let outer = TextSpan::new(10, 20);
    assert!(outer.intersects_with(TextSpan::new(15, 15)));
    assert!(outer.contains_span(TextSpan::new(12, 14)));
    assert!(!outer.contains(20));
}

#[test]
fn shifted_saturates_at_zero() {
    assert_eq!(TextSpan::new(2, 5).shifted(3), TextSpan::new(5, 8));
    assert_eq!(TextSpan::new(2, 5).shifted(-4), TextSpan::new(0, 1));
}

#[test]
fn slice_respects_bounds() {
    let text = "private int _x;";
    assert_eq!(TextSpan::new(12, 14).slice(text), Some("_x"));
    assert_eq!(TextSpan::new(12, 40).slice(text), None);
}

#[test]
fn span_serializes_as_struct() {
    let json = serde_json::to_string(&TextSpan::new(1, 2)).unwrap();
    assert_eq!(json, r#"{"start":1,"end":2}"#);
}
