use super::*;
use std::collections::HashSet;

#[test]
fn codes_are_unique_and_sorted() {
    let strs: Vec<&str> = ErrorCode::ALL.iter().map(ErrorCode::as_str).collect();
    let unique: HashSet<&str> = strs.iter().copied().collect();
    assert_eq!(unique.len(), strs.len());

    let mut sorted = strs.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, strs);
}

#[test]
fn display_matches_as_str() {
    for code in ErrorCode::ALL {
        assert_eq!(code.to_string(), code.as_str());
        assert!(!code.title().is_empty());
    }
}

#[test]
fn internal_range() {
    assert!(ErrorCode::E9001.is_internal());
    assert!(!ErrorCode::E2001.is_internal());
    assert!(!ErrorCode::W3001.is_internal());
}

#[test]
fn warning_range() {
    let warnings: Vec<ErrorCode> = ErrorCode::ALL
        .iter()
        .copied()
        .filter(ErrorCode::is_warning)
        .collect();
    assert_eq!(warnings, vec![ErrorCode::W3001]);
}
