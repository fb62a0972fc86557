use dataprep::{digest, from_jsonl, to_jsonl, Conversation, Message, Record, Role};

fn conversation(system: &str, user: &str, assistant: &str) -> Conversation {
    Conversation(Record {
        category: "Open QA".to_string(),
        messages: vec![
            Message::new(Role::System, system),
            Message::new(Role::User, user),
            Message::new(Role::Assistant, assistant),
        ],
    })
}

#[test]
fn test_roundtrip_preserves_set_and_order() {
    let convs = vec![
        conversation("sys", "first question", "first answer"),
        conversation("sys", "second question", "second answer"),
        conversation("sys", "third question", "third answer"),
    ];

    let text = to_jsonl(&convs).unwrap();
    let parsed = from_jsonl(&text).unwrap();

    assert_eq!(parsed, convs);
}

#[test]
fn test_one_object_per_line() {
    let convs = vec![
        conversation("s", "q1", "a1"),
        conversation("s", "q2", "a2"),
    ];

    let text = to_jsonl(&convs).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 2);
    for line in lines {
        let v: serde_json::Value = serde_json::from_str(line).unwrap();
        assert!(v.is_object());
    }
    assert!(text.ends_with('\n'));
}

#[test]
fn test_non_ascii_emitted_literally() {
    let convs = vec![conversation(
        "Du er en hjælpsom assistent.",
        "Hvad hedder du? 日本語もOK?",
        "Jeg hedder Ærø — 你好!",
    )];

    let text = to_jsonl(&convs).unwrap();

    assert!(text.contains("hjælpsom"));
    assert!(text.contains("日本語もOK?"));
    assert!(text.contains("你好"));
    assert!(!text.contains("\\u"));

    let parsed = from_jsonl(&text).unwrap();
    assert_eq!(parsed, convs);
}

#[test]
fn test_role_serialized_lowercase() {
    let text = to_jsonl(&[conversation("s", "q", "a")]).unwrap();
    assert!(text.contains(r#""role":"system""#));
    assert!(text.contains(r#""role":"user""#));
    assert!(text.contains(r#""role":"assistant""#));
}

#[test]
fn test_blank_line_rejected() {
    let text = "{\"category\":\"Open QA\",\"messages\":[]}\n\n";
    assert!(from_jsonl(text).is_err());
}

#[test]
fn test_invalid_json_reports_line_number() {
    let good = to_jsonl(&[conversation("s", "q", "a")]).unwrap();
    let text = format!("{good}not json\n");

    let err = from_jsonl(&text).unwrap_err();
    assert!(err.to_string().contains("Line 2"));
}

#[test]
fn test_digest_stable_and_input_sensitive() {
    let a = to_jsonl(&[conversation("s", "q", "a")]).unwrap();
    let b = to_jsonl(&[conversation("s", "q", "b")]).unwrap();

    assert_eq!(digest(&a), digest(&a));
    assert_ne!(digest(&a), digest(&b));
    assert_eq!(digest(&a).len(), 64); // blake3 hex
}
