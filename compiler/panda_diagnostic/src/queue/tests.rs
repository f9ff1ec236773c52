use super::*;
use panda_ir::Span;
use pretty_assertions::assert_eq;

fn err(msg: &str, start: u32) -> Diagnostic {
    Diagnostic::error(ErrorCode::E2002)
        .with_message(msg)
        .with_label(Span::new(start, start + 1), "here")
}

#[test]
fn flush_sorts_by_file_then_offset() {
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig::unlimited());
    queue.add(err("c", 5).in_file(1));
    queue.add(err("b", 40));
    queue.add(err("a", 2));

    let messages: Vec<String> = queue.flush().into_iter().map(|d| d.message).collect();
    assert_eq!(messages, vec!["a", "b", "c"]);
}

#[test]
fn same_position_keeps_emission_order() {
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig::unlimited());
    queue.add(err("first", 3));
    queue.add(err("second", 3));
    let messages: Vec<String> = queue.flush().into_iter().map(|d| d.message).collect();
    assert_eq!(messages, vec!["first", "second"]);
}

#[test]
fn deduplicates_repeated_error() {
    let mut queue = DiagnosticQueue::new();
    assert!(queue.add(err("unresolved reference `x`", 10)));
    assert!(!queue.add(err("unresolved reference `x`", 10)));
    assert!(queue.add(err("unresolved reference `x`", 11)));
    assert_eq!(queue.error_count(), 2);
}

#[test]
fn unlimited_keeps_duplicates() {
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig::unlimited());
    assert!(queue.add(err("dup", 1)));
    assert!(queue.add(err("dup", 1)));
    assert_eq!(queue.flush().len(), 2);
}

#[test]
fn error_limit_drops_and_reports() {
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig {
        error_limit: 2,
        deduplicate: false,
    });
    for i in 0..5 {
        queue.add(err("e", i * 10));
    }
    assert!(queue.limit_reached());

    let flushed = queue.flush();
    assert_eq!(flushed.len(), 3);
    assert_eq!(flushed[2].code, ErrorCode::E9002);
    assert_eq!(flushed[2].notes, vec!["3 further error(s) were not reported"]);
}

#[test]
fn warnings_do_not_count() {
    let mut queue = DiagnosticQueue::new();
    queue.add(Diagnostic::warning(ErrorCode::E3001).with_message("w"));
    assert_eq!(queue.error_count(), 0);
    assert!(queue.has_errors().is_none());
    assert_eq!(queue.peek().count(), 1);
}

#[test]
fn emit_error_yields_guarantee() {
    let mut queue = DiagnosticQueue::new();
    let _guar = queue.emit_error(err("boom", 0));
    assert!(queue.has_errors().is_some());
    queue.flush();
    assert!(queue.has_errors().is_none());
}
