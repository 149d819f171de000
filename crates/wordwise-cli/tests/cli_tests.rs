//! CLI integration tests using assert_cmd.

use std::path::Path;

use assert_cmd::Command;
use chrono::{Duration, Utc};
use predicates::prelude::*;
use tempfile::TempDir;

/// A command isolated from the caller's config and environment.
fn wordwise(dir: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("wordwise").unwrap();
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env_remove("WORDWISE_OPENAI_KEY")
        .env_remove("RUST_LOG");
    cmd
}

fn record(reps: u32, interval: u32, overdue_days: i64, rank: u32) -> serde_json::Value {
    let next_review = Utc::now() - Duration::days(overdue_days);
    serde_json::json!({
        "repetitions": reps,
        "interval": interval,
        "efactor": 2.5,
        "next_review": next_review.to_rfc3339(),
        "goal_frequency_rank": rank,
    })
}

fn write_state(path: &Path, state: serde_json::Value) {
    std::fs::write(path, serde_json::to_string_pretty(&state).unwrap()).unwrap();
}

fn read_state(path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

/// apple is 3 days overdue at rank 1, banana 4 days at rank 2, carrot is
/// not due yet.
fn fruit_state(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("state.json");
    write_state(
        &path,
        serde_json::json!({
            "apple": record(2, 1, 3, 1),
            "banana": record(2, 1, 4, 2),
            "carrot": record(2, 6, -2, 1),
        }),
    );
    path
}

#[test]
fn init_creates_config() {
    let dir = TempDir::new().unwrap();

    wordwise(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created wordwise.toml"));

    let content = std::fs::read_to_string(dir.path().join("wordwise.toml")).unwrap();
    assert!(content.contains("state_path"));
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    wordwise(&dir).arg("init").assert().success();

    wordwise(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn first_run_seeds_default_words() {
    let dir = TempDir::new().unwrap();
    let state = dir.path().join("state.json");

    wordwise(&dir)
        .arg("--state")
        .arg(&state)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("the"))
        .stdout(predicate::str::contains("5 words tracked"));

    // Words are written in list order.
    let raw = std::fs::read_to_string(&state).unwrap();
    let positions: Vec<usize> = ["\"the\"", "\"be\"", "\"and\"", "\"of\"", "\"a\""]
        .iter()
        .map(|key| raw.find(key).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));

    let saved = read_state(&state);
    assert_eq!(saved.as_object().unwrap().len(), 5);
    assert_eq!(saved["of"]["goal_frequency_rank"], 4);
    assert_eq!(saved["the"]["repetitions"], 0);
}

#[test]
fn state_path_from_config() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("wordwise.toml"),
        "state_path = \"learner.json\"\ndefault_word_limit = 2\n",
    )
    .unwrap();

    wordwise(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 words tracked"));

    assert!(dir.path().join("learner.json").exists());
}

#[test]
fn add_tracks_word_and_updates_rank() {
    let dir = TempDir::new().unwrap();
    let state = fruit_state(&dir);

    wordwise(&dir)
        .args(["--state", state.to_str().unwrap(), "add", "--word", "gato", "--rank", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Tracking 'gato' (rank 2)"));

    wordwise(&dir)
        .args(["--state", state.to_str().unwrap(), "add", "--word", "apple", "--rank", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated 'apple' to rank 7"));

    let saved = read_state(&state);
    assert_eq!(saved["gato"]["goal_frequency_rank"], 2);
    assert_eq!(saved["gato"]["repetitions"], 0);
    assert_eq!(saved["apple"]["goal_frequency_rank"], 7);
    // Scheduling state is untouched by a rank change.
    assert_eq!(saved["apple"]["repetitions"], 2);
}

#[test]
fn add_rejects_rank_zero() {
    let dir = TempDir::new().unwrap();
    let state = fruit_state(&dir);

    wordwise(&dir)
        .args(["--state", state.to_str().unwrap(), "add", "--word", "x", "--rank", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid goal rank"));
}

#[test]
fn remove_word() {
    let dir = TempDir::new().unwrap();
    let state = fruit_state(&dir);

    wordwise(&dir)
        .args(["--state", state.to_str().unwrap(), "remove", "--word", "banana"])
        .assert()
        .success();
    assert!(read_state(&state).get("banana").is_none());

    wordwise(&dir)
        .args(["--state", state.to_str().unwrap(), "remove", "--word", "banana"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown word: banana"));
}

#[test]
fn next_lists_due_words_by_priority() {
    let dir = TempDir::new().unwrap();
    let state = fruit_state(&dir);

    wordwise(&dir)
        .args(["--state", state.to_str().unwrap(), "next"])
        .assert()
        .success()
        .stdout("apple\nbanana\n");

    wordwise(&dir)
        .args(["--state", state.to_str().unwrap(), "next", "--limit", "1"])
        .assert()
        .success()
        .stdout("apple\n");

    wordwise(&dir)
        .args(["--state", state.to_str().unwrap(), "next", "--visible", "banana,carrot"])
        .assert()
        .success()
        .stdout("banana\n");
}

#[test]
fn next_with_nothing_due() {
    let dir = TempDir::new().unwrap();
    let state = dir.path().join("state.json");
    write_state(&state, serde_json::json!({ "later": record(1, 1, -1, 1) }));

    wordwise(&dir)
        .args(["--state", state.to_str().unwrap(), "next"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing due."));
}

#[test]
fn review_updates_state_and_keeps_backup() {
    let dir = TempDir::new().unwrap();
    let state = dir.path().join("state.json");
    write_state(&state, serde_json::json!({ "apple": record(0, 0, 0, 1) }));

    wordwise(&dir)
        .args(["--state", state.to_str().unwrap(), "review", "--word", "apple", "--quality", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("in 1 days"));

    let saved = read_state(&state);
    assert_eq!(saved["apple"]["repetitions"], 1);
    assert_eq!(saved["apple"]["interval"], 1);
    assert_eq!(saved["apple"]["efactor"], 2.6);

    let backup = read_state(&dir.path().join("state.json.bak"));
    assert_eq!(backup["apple"]["repetitions"], 0);
}

#[test]
fn review_errors() {
    let dir = TempDir::new().unwrap();
    let state = fruit_state(&dir);

    wordwise(&dir)
        .args(["--state", state.to_str().unwrap(), "review", "--word", "kiwi", "--quality", "4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown word: kiwi"));

    wordwise(&dir)
        .args(["--state", state.to_str().unwrap(), "review", "--word", "apple", "--quality", "6"])
        .assert()
        .failure();
}

#[test]
fn malformed_state_is_an_error() {
    let dir = TempDir::new().unwrap();
    let state = dir.path().join("state.json");
    std::fs::write(&state, "{not json").unwrap();

    wordwise(&dir)
        .args(["--state", state.to_str().unwrap(), "status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed state"));

    // The corrupt file is left alone.
    assert_eq!(std::fs::read_to_string(&state).unwrap(), "{not json");
}

#[test]
fn recover_restores_previous_state() {
    let dir = TempDir::new().unwrap();
    let state = fruit_state(&dir);

    wordwise(&dir)
        .args(["--state", state.to_str().unwrap(), "add", "--word", "pear"])
        .assert()
        .success();
    std::fs::write(&state, "garbage").unwrap();

    wordwise(&dir)
        .args(["--state", state.to_str().unwrap(), "recover"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Restored"));

    let saved = read_state(&state);
    assert!(saved.get("apple").is_some());
    assert!(saved.get("pear").is_none());
}

#[test]
fn recover_without_backup_fails() {
    let dir = TempDir::new().unwrap();
    let state = fruit_state(&dir);

    wordwise(&dir)
        .args(["--state", state.to_str().unwrap(), "recover"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no backup found"));
}

#[test]
fn lesson_mixes_new_and_review_words() {
    let dir = TempDir::new().unwrap();
    let state = dir.path().join("state.json");
    write_state(
        &state,
        serde_json::json!({
            "apple": record(1, 1, 2, 2),
            "fresh": record(0, 0, 0, 1),
        }),
    );

    let output = wordwise(&dir)
        .args(["--state", state.to_str().unwrap(), "lesson", "--topic", "food"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["words"], serde_json::json!(["fresh", "apple"]));
    assert_eq!(json["lesson"]["topic"], "food");
    let items = json["lesson"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["type"], "mcq");
    assert_eq!(items[0]["word"], "fresh");
    assert_eq!(items[1]["word"], "apple");
}

#[test]
fn lesson_plan_outlines_chosen_words() {
    let dir = TempDir::new().unwrap();
    let state = dir.path().join("state.json");
    write_state(
        &state,
        serde_json::json!({
            "apple": record(1, 1, 2, 2),
            "fresh": record(0, 0, 0, 1),
        }),
    );

    let output = wordwise(&dir)
        .args(["--state", state.to_str().unwrap(), "lesson", "--topic", "food", "--plan"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(plan["topic"], "food");
    assert_eq!(plan["introduction"], "Today's lesson covers food.");
    assert_eq!(plan["vocabulary"], serde_json::json!(["fresh", "apple"]));
    assert_eq!(plan["exercises"].as_array().unwrap().len(), 3);
}

#[test]
fn goals_persist_and_rerank_tracked_words() {
    let dir = TempDir::new().unwrap();
    let state = fruit_state(&dir);
    let goals_file = dir.path().join("state.goals.json");

    wordwise(&dir)
        .args(["--state", state.to_str().unwrap(), "goal", "add", "--word", "kiwi", "--weight", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Goal 'kiwi' (weight 5) is rank 1"));

    wordwise(&dir)
        .args(["--state", state.to_str().unwrap(), "goal", "add", "--word", "apple", "--weight", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("is rank 2"));

    let saved_goals = read_state(&goals_file);
    assert_eq!(saved_goals[0]["word"], "kiwi");
    assert_eq!(saved_goals[1]["word"], "apple");

    let saved = read_state(&state);
    assert_eq!(saved["kiwi"]["goal_frequency_rank"], 1);
    assert_eq!(saved["kiwi"]["repetitions"], 0);
    assert_eq!(saved["apple"]["goal_frequency_rank"], 2);
    assert_eq!(saved["apple"]["repetitions"], 2);

    wordwise(&dir)
        .args(["--state", state.to_str().unwrap(), "goal", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("kiwi").and(predicate::str::contains("apple")));

    // Removing a goal keeps the word tracked and re-ranks the rest.
    wordwise(&dir)
        .args(["--state", state.to_str().unwrap(), "goal", "remove", "--word", "kiwi"])
        .assert()
        .success();
    let saved = read_state(&state);
    assert!(saved.get("kiwi").is_some());
    assert_eq!(saved["apple"]["goal_frequency_rank"], 1);

    wordwise(&dir)
        .args(["--state", state.to_str().unwrap(), "goal", "remove", "--word", "kiwi"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no goal for 'kiwi'"));
}

#[test]
fn lesson_introduces_saved_goal_words() {
    let dir = TempDir::new().unwrap();
    let state = fruit_state(&dir);
    std::fs::write(
        dir.path().join("state.goals.json"),
        r#"[{"word": "zebra", "weight": 3.0}, {"word": "yak", "weight": 9.0}]"#,
    )
    .unwrap();

    let output = wordwise(&dir)
        .args(["--state", state.to_str().unwrap(), "lesson", "--new-limit", "2"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    // New goal words by weight, interleaved with due reviews by priority.
    assert_eq!(
        json["words"],
        serde_json::json!(["yak", "apple", "zebra", "banana"])
    );
}

#[test]
fn blurb_offline_and_default_generator() {
    let dir = TempDir::new().unwrap();

    wordwise(&dir)
        .args(["blurb", "--known", "the,cat", "--new", "sleeps", "--length", "4", "--offline"])
        .assert()
        .success()
        .stdout("sleeps the cat sleeps\n");

    // Without a configured generator the offline backend answers.
    wordwise(&dir)
        .args(["blurb", "--known", "the,cat", "--new", "sleeps", "--length", "3"])
        .assert()
        .success()
        .stdout("sleeps the cat\n");
}

#[test]
fn default_words_json() {
    let dir = TempDir::new().unwrap();

    wordwise(&dir)
        .args(["default-words", "--limit", "3"])
        .assert()
        .success()
        .stdout("[\"the\",\"be\",\"and\"]\n");
}

#[test]
fn vocab_from_file() {
    let dir = TempDir::new().unwrap();
    let text = dir.path().join("text.txt");
    std::fs::write(&text, "Hello world! hello again.").unwrap();

    wordwise(&dir)
        .args(["vocab", "--file", text.to_str().unwrap()])
        .assert()
        .success()
        .stdout("{\"vocab\":[\"again\",\"hello\",\"world\"]}\n");

    wordwise(&dir)
        .args(["vocab", "--file", "missing.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}
