use super::*;

#[test]
fn first_line() {
    assert_eq!(offset_to_line_col("class A {}", 0), (1, 1));
    assert_eq!(offset_to_line_col("class A {}", 6), (1, 7));
}

#[test]
fn later_lines() {
    let source = "namespace a;\nvar x: i32;\n  var y: i32;";
    assert_eq!(offset_to_line_col(source, 13), (2, 1));
    assert_eq!(offset_to_line_col(source, 17), (2, 5));
    assert_eq!(offset_to_line_col(source, 27), (3, 3));
    assert_eq!(line_number(source, Span::new(27, 30)), 3);
}

#[test]
fn columns_count_characters() {
    let source = "var é = 1;";
    // 'é' is two bytes; '=' sits at byte 7.
    assert_eq!(offset_to_line_col(source, 7), (1, 7));
}

#[test]
fn offset_past_end_clamps() {
    let source = "ab\ncd";
    assert_eq!(offset_to_line_col(source, 100), (2, 3));
}

#[test]
fn table_counts_lines() {
    let table = LineOffsetTable::build("a\nb\nc");
    assert_eq!(table.line_count(), 3);
    assert_eq!(table.line_from_offset(4), 3);
}
