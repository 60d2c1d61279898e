use wavelift::domain::RequestId;

#[test]
fn given_no_id_when_generating_then_ids_are_unique_uuids() {
    let a = RequestId::new();
    let b = RequestId::new();

    assert_ne!(a, b);
    assert_eq!(a.as_str().len(), 36);
}

#[test]
fn given_padded_id_when_parsing_then_whitespace_is_trimmed() {
    let id = RequestId::parse("  job-42 ").unwrap();

    assert_eq!(id.as_str(), "job-42");
}

#[test]
fn given_empty_or_slashed_id_when_parsing_then_returns_error() {
    assert!(RequestId::parse("").is_err());
    assert!(RequestId::parse("   ").is_err());
    assert!(RequestId::parse("a/b").is_err());
}
