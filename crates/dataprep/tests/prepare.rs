use dataprep::{normalize, prepare, Message, PrepareConfig, Record, Role};

fn record(category: &str, messages: Vec<Message>) -> Record {
    Record { category: category.to_string(), messages }
}

fn qa_pair(question: &str, answer: &str) -> Vec<Message> {
    vec![
        Message::new(Role::User, question),
        Message::new(Role::Assistant, answer),
    ]
}

fn cfg() -> PrepareConfig {
    PrepareConfig::new("Open QA", "You are a helpful assistant.")
}

#[test]
fn test_normalize_prepends_system_message() {
    let rec = record("Open QA", qa_pair("What is Rust?", "A systems language."));
    let conv = normalize(rec, "You are a helpful assistant.");

    assert_eq!(conv.messages()[0].role, Role::System);
    assert_eq!(conv.messages()[0].content, "You are a helpful assistant.");
    assert_eq!(conv.messages().len(), 3);
}

#[test]
fn test_normalize_idempotent_on_system_first() {
    let mut messages = vec![Message::new(Role::System, "Custom instruction.")];
    messages.extend(qa_pair("q", "a"));
    let rec = record("Open QA", messages);

    let conv = normalize(rec.clone(), "You are a helpful assistant.");
    assert_eq!(conv.0, rec);

    // Normalizing a normalized conversation changes nothing
    let again = normalize(conv.0.clone(), "You are a helpful assistant.");
    assert_eq!(again, conv);
}

#[test]
fn test_normalize_handles_empty_messages() {
    let rec = record("Open QA", vec![]);
    let conv = normalize(rec, "fallback");

    assert_eq!(conv.messages().len(), 1);
    assert_eq!(conv.messages()[0].role, Role::System);
    assert_eq!(conv.turns(), 0);
}

#[test]
fn test_prepare_filters_by_category() {
    let records = vec![
        record("Open QA", qa_pair("q1", "a1")),
        record("Closed QA", qa_pair("q2", "a2")),
        record("Open QA", qa_pair("q3", "a3")),
        record("Summarization", qa_pair("q4", "a4")),
    ];

    let out = prepare(records, &cfg(), 100);
    assert_eq!(out.len(), 2);
    for conv in &out {
        assert_eq!(conv.0.category, "Open QA");
    }
}

#[test]
fn test_prepare_enforces_turn_bound() {
    let long = record(
        "Open QA",
        vec![
            Message::new(Role::User, "q1"),
            Message::new(Role::Assistant, "a1"),
            Message::new(Role::User, "q2"),
            Message::new(Role::Assistant, "a2"),
        ],
    );
    let short = record("Open QA", qa_pair("q", "a"));

    let out = prepare(vec![long, short.clone()], &cfg(), 100);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].0.messages[1..], short.messages[..]);

    // Every survivor respects len - 1 <= max_turns
    for conv in &out {
        assert!(conv.turns() <= 2);
    }
}

#[test]
fn test_prepare_drops_rather_than_truncates() {
    let long = record(
        "Open QA",
        vec![
            Message::new(Role::User, "q1"),
            Message::new(Role::Assistant, "a1"),
            Message::new(Role::User, "q2"),
        ],
    );

    let out = prepare(vec![long], &cfg(), 100);
    assert!(out.is_empty());
}

#[test]
fn test_prepare_honors_sample_limit_and_order() {
    let records: Vec<Record> = (0..10)
        .map(|i| record("Open QA", qa_pair(&format!("q{i}"), &format!("a{i}"))))
        .collect();

    let out = prepare(records, &cfg(), 4);
    assert_eq!(out.len(), 4);
    for (i, conv) in out.iter().enumerate() {
        assert_eq!(conv.messages()[1].content, format!("q{i}"));
    }
}

#[test]
fn test_prepare_configurable_turn_bound() {
    let four_turns = record(
        "Open QA",
        vec![
            Message::new(Role::User, "q1"),
            Message::new(Role::Assistant, "a1"),
            Message::new(Role::User, "q2"),
            Message::new(Role::Assistant, "a2"),
        ],
    );

    let strict = cfg();
    assert!(prepare(vec![four_turns.clone()], &strict, 10).is_empty());

    let relaxed = cfg().with_max_turns(4);
    assert_eq!(prepare(vec![four_turns], &relaxed, 10).len(), 1);
}
