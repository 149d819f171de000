//! Multi-day learner flow through the library crates.
//!
//! Drives one learner from an empty state file through several review
//! sessions, persisting and restoring between days the way the CLI does.

use chrono::{DateTime, Duration, TimeZone, Utc};

use wordwise_core::blurb::{compose_blurb, BlurbSource};
use wordwise_core::goals::{BundledWordList, GoalItem, GoalManager};
use wordwise_core::lesson::{generate_tutor_lesson, LessonOptions};
use wordwise_core::traits::BlurbRequest;
use wordwise_core::{JsonFileStore, Phase, ReviewQueue, StaticWordList};
use wordwise_providers::mock::MockGenerator;

fn day(n: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap() + Duration::days(n)
}

#[test]
fn fresh_learner_walks_through_a_week() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("learner.json"));
    let defaults = StaticWordList::new(["hola", "adios", "gracias"]);

    // Day 0: nothing saved yet, the default list is tracked and studied.
    let mut queue = ReviewQueue::restore(&store, &defaults, day(0)).unwrap();
    assert_eq!(queue.len(), 3);
    assert_eq!(queue.rank("gracias"), Some(3));
    queue.review_word("hola", 5, day(0)).unwrap();
    queue.review_word("adios", 4, day(0)).unwrap();
    queue.review_word("gracias", 1, day(0)).unwrap();
    queue.persist(&store).unwrap();

    // Day 2: everything is due; the forgotten word has the same overdue
    // ratio but a worse rank, so the best-ranked words come first.
    let mut queue = ReviewQueue::restore(&store, &defaults, day(2)).unwrap();
    assert_eq!(queue.get("hola").unwrap().phase(), Phase::Learning);
    assert_eq!(queue.get("gracias").unwrap().phase(), Phase::Lapsed);
    assert_eq!(
        queue.due_ranked(day(2), 10),
        vec!["hola", "adios", "gracias"]
    );

    for word in ["hola", "adios", "gracias"] {
        queue.review_word(word, 5, day(2)).unwrap();
    }
    queue.persist(&store).unwrap();

    // Day 3: gracias is back on a one-day interval, the others wait six days.
    let queue = ReviewQueue::restore(&store, &defaults, day(3)).unwrap();
    assert_eq!(queue.get("hola").unwrap().interval, 6);
    assert_eq!(queue.get("gracias").unwrap().interval, 1);
    assert_eq!(queue.select_next_due(day(3)), None);
    assert_eq!(queue.select_next_due(day(4)), Some("gracias"));

    // The previous day's file is kept as a backup.
    let backup = store.load_backup().unwrap().unwrap();
    assert_eq!(backup.get("hola").unwrap().repetitions, 1);
}

#[test]
fn goals_drive_lessons() {
    let mut goals = GoalManager::new();
    goals.create_goal(GoalItem::new("casa", 1.0));
    goals.create_goal(GoalItem::new("perro", 5.0));
    goals.create_goal(GoalItem::new("gato", 3.0));

    let queue = ReviewQueue::from_ranks(goals.goal_ranks(), day(0)).unwrap();
    assert_eq!(queue.rank("perro"), Some(1));
    assert_eq!(queue.rank("casa"), Some(3));

    let options = LessonOptions {
        new_word_limit: 2,
        ..LessonOptions::default()
    };
    let lesson = generate_tutor_lesson("animals", &goals.ranked_words(), &queue, &options, day(0));
    let words: Vec<&str> = lesson.items.iter().map(|item| item.word()).collect();
    assert_eq!(words, vec!["perro", "gato"]);
}

#[test]
fn bundled_defaults_seed_the_queue() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("state.json"));

    let queue = ReviewQueue::restore(&store, &BundledWordList::new(4), day(0)).unwrap();
    let words: Vec<&str> = queue.iter().map(|entry| entry.word()).collect();
    assert_eq!(words, vec!["the", "be", "and", "of"]);
    assert!(queue.iter().all(|entry| entry.state().phase() == Phase::New));
}

#[tokio::test]
async fn blurb_uses_tracked_words() {
    let queue = ReviewQueue::from_ranks([("el", 1), ("gato", 2), ("duerme", 3)], day(0)).unwrap();
    let known: Vec<String> = queue
        .iter()
        .filter(|entry| entry.word() != "duerme")
        .map(|entry| entry.word().to_string())
        .collect();
    let request = BlurbRequest {
        known_words: known,
        new_words: vec!["duerme".into()],
        length: 3,
    };

    let generator = MockGenerator::with_fixed_response("el gato duerme");
    let blurb = compose_blurb(Some(&generator), &request).await;
    assert_eq!(blurb.text, "el gato duerme");
    assert!(matches!(blurb.source, BlurbSource::Generated { .. }));

    let stray = MockGenerator::with_fixed_response("el perro ladra");
    let blurb = compose_blurb(Some(&stray), &request).await;
    assert_eq!(blurb.source, BlurbSource::Template);
    assert_eq!(blurb.text, "duerme el gato");
}
