use super::*;

#[test]
fn decodes_backend_json() {
    let json = r#"{
        "created": 1713833628,
        "data": [
            {"b64_json": "aGVsbG8=", "revised_prompt": "a red hat"},
            {"url": "https://example.invalid/1.png"}
        ],
        "usage": {"total_tokens": 100}
    }"#;
    let resp = EditResponse::from_json(json).unwrap();
    assert_eq!(resp.created, 1713833628);
    assert_eq!(resp.data.len(), 2);
    assert_eq!(resp.data[0].b64_json.as_deref(), Some("aGVsbG8="));
    assert_eq!(resp.data[0].revised_prompt.as_deref(), Some("a red hat"));
    assert_eq!(resp.data[1].url.as_deref(), Some("https://example.invalid/1.png"));
    assert!(resp.ensure_nonempty().is_ok());
}

#[test]
fn malformed_or_empty_responses_are_backend_errors() {
    let err = EditResponse::from_json("{not json").unwrap_err();
    assert!(matches!(err, MaskError::Backend(_)));

    let empty = EditResponse::from_json("{}").unwrap();
    assert!(matches!(
        empty.ensure_nonempty().unwrap_err(),
        MaskError::Backend(_)
    ));
}
