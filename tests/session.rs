//! Session ledger integration tests

use solace_companion::{EmotionLabel, Session, Turn};

#[test]
fn flush_round_trips_the_ordered_ledger() {
    let dir = tempfile::tempdir().unwrap();

    let mut session = Session::start();
    session.append(Turn::new(
        "I feel overwhelmed",
        "That sounds exhausting. What's weighing on you most?",
        EmotionLabel::Neutral,
        "english",
    ));
    session.append(Turn::new(
        "work mostly",
        "Work stress can pile up quietly. You're allowed to set it down.",
        EmotionLabel::Neutral,
        "english",
    ));
    session.append(Turn::new(
        "thank you",
        "Any time. Take care of yourself.",
        EmotionLabel::Neutral,
        "english",
    ));

    let path = session.flush(dir.path()).unwrap();
    assert!(path.exists());
    assert!(
        path.file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("solace_session_")
    );

    let json = std::fs::read_to_string(&path).unwrap();
    let restored: Vec<Turn> = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.as_slice(), session.turns());
}

#[test]
fn flushed_records_use_the_documented_field_names() {
    let dir = tempfile::tempdir().unwrap();

    let mut session = Session::start();
    session.append(Turn::new("hi", "hello", EmotionLabel::Sadness, "english"));

    let path = session.flush(dir.path()).unwrap();
    let json = std::fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    let record = &value.as_array().unwrap()[0];
    assert_eq!(record["user"], "hi");
    assert_eq!(record["assistant"], "hello");
    assert_eq!(record["emotion"], "sadness");
    assert_eq!(record["language"], "english");
    // HH:MM:SS local time
    let timestamp = record["timestamp"].as_str().unwrap();
    assert_eq!(timestamp.len(), 8);
    assert_eq!(timestamp.as_bytes()[2], b':');
    assert_eq!(timestamp.as_bytes()[5], b':');
}

#[test]
fn failed_flush_keeps_the_ledger_in_memory() {
    let dir = tempfile::tempdir().unwrap();

    // A file where the data directory should be makes the flush fail
    let blocked = dir.path().join("not-a-directory");
    std::fs::write(&blocked, "occupied").unwrap();

    let mut session = Session::start();
    session.append(Turn::new("hi", "hello", EmotionLabel::Neutral, "english"));

    let result = session.flush(&blocked);
    assert!(result.is_err());

    // Nothing was lost
    assert_eq!(session.turns().len(), 1);
    assert_eq!(session.turns()[0].user_text, "hi");
}

#[test]
fn flush_creates_the_data_directory() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("data").join("sessions");

    let mut session = Session::start();
    session.append(Turn::new("hi", "hello", EmotionLabel::Neutral, "english"));

    let path = session.flush(&nested).unwrap();
    assert!(path.starts_with(&nested));
    assert!(path.exists());
}
