use super::*;

#[test]
fn span_basic() {
    let span = Span::new(10, 20);
    assert_eq!(span.len(), 10);
    assert!(!span.is_empty());
    assert!(span.contains(15));
    assert!(!span.contains(20));
}

#[test]
fn span_merge_covers_both() {
    let merged = Span::new(10, 20).merge(Span::new(15, 30));
    assert_eq!(merged, Span::new(10, 30));
}

#[test]
fn span_point_is_empty() {
    let p = Span::point(7);
    assert!(p.is_empty());
    assert_eq!(p.to_range(), 7..7);
}

#[test]
fn span_try_from_range_rejects_large_offsets() {
    let too_big = (u32::MAX as usize) + 1;
    assert_eq!(
        Span::try_from_range(0..too_big),
        Err(SpanError::EndTooLarge(too_big))
    );
    assert_eq!(Span::try_from_range(3..9), Ok(Span::new(3, 9)));
}

#[test]
fn span_orders_by_start() {
    assert!(Span::new(1, 5) < Span::new(2, 3));
}

#[test]
fn span_debug_format() {
    assert_eq!(format!("{:?}", Span::new(4, 8)), "4..8");
}
