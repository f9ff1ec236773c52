use super::*;
use pretty_assertions::assert_eq;

#[test]
fn builder_collects_parts() {
    let diag = Diagnostic::error(ErrorCode::E2001)
        .with_message("`x` is already declared")
        .with_label(Span::new(20, 21), "redeclared here")
        .with_secondary_label(Span::new(4, 5), "first declared here")
        .with_note("names must be unique within a class")
        .in_file(1);

    assert!(diag.is_error());
    assert_eq!(diag.primary_span(), Some(Span::new(20, 21)));
    assert_eq!(diag.labels.len(), 2);
    assert_eq!(diag.file, Some(1));
}

#[test]
fn primary_span_skips_secondary_labels() {
    let diag = Diagnostic::error(ErrorCode::E2002)
        .with_secondary_label(Span::new(0, 1), "context")
        .with_label(Span::new(5, 9), "here");
    assert_eq!(diag.primary_span(), Some(Span::new(5, 9)));

    let bare = Diagnostic::warning(ErrorCode::E3001);
    assert_eq!(bare.primary_span(), None);
    assert!(!bare.is_error());
}

#[test]
fn display_format() {
    let diag = Diagnostic::error(ErrorCode::E2004)
        .with_message("enum value must be integer")
        .with_label(Span::new(3, 7), "not an integer")
        .with_note("found a float constant");
    assert_eq!(
        diag.to_string(),
        "error [E2004]: enum value must be integer\n  --> 3..7: not an integer\n  = note: found a float constant"
    );
}
