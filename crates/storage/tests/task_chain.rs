#![forbid(unsafe_code)]

use ec_core::{EventId, TaskId, UserId};
use ec_storage::{NewEvent, NewTask, NewUser, SqliteStore, TaskUpdate};
use rusqlite::{Connection, params};
use std::path::{Path, PathBuf};
use time::{Date, Month};

fn temp_dir(test_name: &str) -> PathBuf {
    let base = std::env::temp_dir();
    let pid = std::process::id();
    let nonce = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let dir = base.join(format!("ec_storage_{test_name}_{pid}_{nonce}"));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn raw_conn(dir: &Path) -> Connection {
    let conn = Connection::open(dir.join("eventchain.db")).expect("raw connection");
    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .expect("foreign keys on");
    conn
}

fn seed_event(store: &mut SqliteStore, name: &str) -> (UserId, EventId) {
    let user = store
        .create_user(NewUser {
            name: format!("{name} host"),
            email: None,
            kind: "CELEB".to_string(),
        })
        .expect("create user");
    let event = store
        .create_event(NewEvent {
            celeb_user_id: user.user_id,
            name: name.to_string(),
            event_date: Date::from_calendar_date(2026, Month::June, 20).expect("date"),
            event_time: None,
            guests_num: 80,
        })
        .expect("create event");
    (user.user_id, event.event_id)
}

fn append(store: &mut SqliteStore, event: EventId, description: &str) -> TaskId {
    store
        .append_task(event, NewTask::todo(description))
        .expect("append task")
        .task_id
}

fn descriptions(store: &SqliteStore, event: EventId) -> Vec<String> {
    store
        .ordered_tasks(event)
        .expect("ordered tasks")
        .into_iter()
        .map(|task| task.description)
        .collect()
}

#[test]
fn move_to_head_then_remove_keeps_chain_whole() {
    let storage_dir = temp_dir("move_to_head_then_remove_keeps_chain_whole");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");
    let (_, event) = seed_event(&mut store, "Gala");

    let a = append(&mut store, event, "A");
    let b = append(&mut store, event, "B");
    let c = append(&mut store, event, "C");
    assert_eq!(descriptions(&store, event), ["A", "B", "C"]);

    assert!(store.move_task(c, None).expect("move C to head"));
    assert_eq!(descriptions(&store, event), ["C", "A", "B"]);

    let removed = store.remove_task(a).expect("remove A");
    assert_eq!(removed.description, "A");
    assert_eq!(descriptions(&store, event), ["C", "B"]);
    assert_eq!(store.verify_chain(event).expect("verify"), 2);

    let head = store.get_task(c).expect("C");
    let tail = store.get_task(b).expect("B");
    assert_eq!((head.prev_task_id, head.next_task_id), (None, Some(b)));
    assert_eq!((tail.prev_task_id, tail.next_task_id), (Some(c), None));

    let err = store.get_task(a).expect_err("A is gone");
    assert_eq!(err.code(), "NOT_FOUND");
}

#[test]
fn insert_after_rewires_both_neighbours() {
    let storage_dir = temp_dir("insert_after_rewires_both_neighbours");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");
    let (_, event) = seed_event(&mut store, "Wedding");

    let a = append(&mut store, event, "A");
    let c = append(&mut store, event, "C");
    let b = store
        .create_task(event, Some(a), NewTask::todo("B"))
        .expect("insert B after A");
    assert_eq!(b.prev_task_id, Some(a));
    assert_eq!(b.next_task_id, Some(c));
    assert_eq!(store.get_task(a).expect("A").next_task_id, Some(b.task_id));
    assert_eq!(store.get_task(c).expect("C").prev_task_id, Some(b.task_id));

    let head = store
        .create_task(event, None, NewTask::todo("Z"))
        .expect("insert at head");
    assert_eq!(head.prev_task_id, None);
    assert_eq!(head.next_task_id, Some(a));
    assert_eq!(descriptions(&store, event), ["Z", "A", "B", "C"]);
}

#[test]
fn anchors_outside_the_event_are_invalid_references() {
    let storage_dir = temp_dir("anchors_outside_the_event_are_invalid_references");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");
    let (_, first) = seed_event(&mut store, "First");
    let (_, second) = seed_event(&mut store, "Second");
    let foreign = append(&mut store, second, "foreign");
    let local = append(&mut store, first, "local");

    let err = store
        .create_task(first, Some(foreign), NewTask::todo("x"))
        .expect_err("foreign anchor");
    assert_eq!(err.code(), "INVALID_REFERENCE");

    let err = store
        .create_task(first, Some(TaskId::new(9_999)), NewTask::todo("x"))
        .expect_err("missing anchor");
    assert_eq!(err.code(), "INVALID_REFERENCE");

    let err = store
        .move_task(local, Some(foreign))
        .expect_err("move across events");
    assert_eq!(err.code(), "INVALID_REFERENCE");

    assert_eq!(descriptions(&store, first), ["local"]);
    assert_eq!(descriptions(&store, second), ["foreign"]);
}

#[test]
fn moving_a_task_after_itself_is_a_cycle() {
    let storage_dir = temp_dir("moving_a_task_after_itself_is_a_cycle");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");
    let (_, event) = seed_event(&mut store, "Party");
    let a = append(&mut store, event, "A");
    let b = append(&mut store, event, "B");

    let err = store.move_task(b, Some(b)).expect_err("self anchor");
    assert_eq!(err.code(), "CYCLE_DETECTED");

    assert!(!store.move_task(b, Some(a)).expect("already in place"));
    assert!(!store.move_task(a, None).expect("already head"));
    assert_eq!(descriptions(&store, event), ["A", "B"]);

    let err = store.remove_task(TaskId::new(4_242)).expect_err("missing task");
    assert_eq!(err.code(), "NOT_FOUND");
}

#[test]
fn out_of_band_delete_is_reported_then_repaired() {
    init_logging();
    let storage_dir = temp_dir("out_of_band_delete_is_reported_then_repaired");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");
    let (_, event) = seed_event(&mut store, "Launch");
    let a = append(&mut store, event, "A");
    let b = append(&mut store, event, "B");
    let c = append(&mut store, event, "C");
    let d = append(&mut store, event, "D");

    let conn = raw_conn(&storage_dir);
    conn.execute("DELETE FROM tasks WHERE task_id=?1", params![b.get()])
        .expect("raw delete");
    drop(conn);

    // Neighbour pointers were nulled by the foreign key, leaving two fragments.
    assert_eq!(store.get_task(a).expect("A").next_task_id, None);
    assert_eq!(store.get_task(c).expect("C").prev_task_id, None);

    let err = store.verify_chain(event).expect_err("broken chain");
    assert_eq!(err.code(), "CHAIN_CORRUPTED");

    let sequence = store.task_sequence(event).expect("sequence");
    for _ in 0..2 {
        let steps: Vec<_> = sequence.iter().collect();
        assert_eq!(steps.len(), 1);
        assert!(matches!(&steps[0], Err(err) if err.code() == "CHAIN_CORRUPTED"));
    }

    let err = store
        .append_task(event, NewTask::todo("E"))
        .expect_err("mutation on a broken chain");
    assert_eq!(err.code(), "CHAIN_CORRUPTED");

    let repair = store.repair_chain(event).expect("repair");
    assert_eq!(repair.fragments, 2);
    assert_eq!(repair.relinked, 2);
    assert_eq!(descriptions(&store, event), ["A", "C", "D"]);
    assert_eq!(store.verify_chain(event).expect("verify"), 3);
    assert_eq!(store.get_task(d).expect("D").next_task_id, None);

    let again = store.repair_chain(event).expect("repair is idempotent");
    assert_eq!(again.fragments, 1);
    assert_eq!(again.relinked, 0);
}

#[test]
fn cyclic_pointers_terminate_traversal_and_block_mutations() {
    let storage_dir = temp_dir("cyclic_pointers_terminate_traversal_and_block_mutations");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");
    let (_, event) = seed_event(&mut store, "Loop");
    let a = append(&mut store, event, "A");
    append(&mut store, event, "B");
    let c = append(&mut store, event, "C");

    let conn = raw_conn(&storage_dir);
    conn.execute(
        "UPDATE tasks SET next_task_id=?2 WHERE task_id=?1",
        params![c.get(), a.get()],
    )
    .expect("raw loop");
    drop(conn);

    let sequence = store.task_sequence(event).expect("sequence");
    let steps: Vec<_> = sequence.iter().collect();
    assert_eq!(steps.len(), 4);
    assert!(steps[..3].iter().all(Result::is_ok));
    assert!(matches!(&steps[3], Err(err) if err.code() == "CHAIN_CORRUPTED"));

    let err = store.ordered_tasks(event).expect_err("ordered tasks");
    assert_eq!(err.code(), "CHAIN_CORRUPTED");

    let err = store
        .create_task(event, Some(a), NewTask::todo("X"))
        .expect_err("insert into a loop");
    assert_eq!(err.code(), "CHAIN_CORRUPTED");

    let err = store.repair_chain(event).expect_err("loops need manual repair");
    assert_eq!(err.code(), "CHAIN_CORRUPTED");
}

#[test]
fn schema_rejects_pointers_across_events() {
    let storage_dir = temp_dir("schema_rejects_pointers_across_events");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");
    let (_, first) = seed_event(&mut store, "First");
    let (_, second) = seed_event(&mut store, "Second");
    let a = append(&mut store, first, "A");
    let b = append(&mut store, second, "B");

    let conn = raw_conn(&storage_dir);
    let err = conn
        .execute(
            "UPDATE tasks SET next_task_id=?2 WHERE task_id=?1",
            params![a.get(), b.get()],
        )
        .expect_err("cross-event pointer");
    assert!(err.to_string().contains("within its event"));
}

#[test]
fn update_task_edits_details_but_not_position() {
    let storage_dir = temp_dir("update_task_edits_details_but_not_position");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");
    let (user, event) = seed_event(&mut store, "Expo");
    let a = append(&mut store, event, "A");
    let b = append(&mut store, event, "B");

    let updated = store
        .update_task(
            a,
            TaskUpdate {
                description: Some("Book hall".to_string()),
                category: Some(Some("venue".to_string())),
                responsible_user_id: Some(Some(user)),
                status: Some("in_progress".to_string()),
                ..TaskUpdate::default()
            },
        )
        .expect("update");
    assert_eq!(updated.description, "Book hall");
    assert_eq!(updated.category.as_deref(), Some("VENUE"));
    assert_eq!(updated.responsible_user_id, Some(user));
    assert_eq!(updated.status, "IN_PROGRESS");
    assert_eq!(updated.next_task_id, Some(b));

    let err = store
        .update_task(
            a,
            TaskUpdate {
                status: Some("SOMEDAY".to_string()),
                ..TaskUpdate::default()
            },
        )
        .expect_err("unknown status");
    assert_eq!(err.code(), "UNKNOWN_CODE");

    let mut task = NewTask::todo("C");
    task.responsible_user_id = Some(UserId::new(777));
    let err = store.append_task(event, task).expect_err("missing user");
    assert_eq!(err.code(), "NOT_FOUND");
    assert_eq!(store.verify_chain(event).expect("verify"), 2);
}

#[test]
fn deleting_an_event_cascades_its_tasks() {
    let storage_dir = temp_dir("deleting_an_event_cascades_its_tasks");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");
    let (_, event) = seed_event(&mut store, "Short");
    let a = append(&mut store, event, "A");
    append(&mut store, event, "B");

    store.delete_event(event).expect("delete event");
    assert_eq!(store.get_task(a).expect_err("task gone").code(), "NOT_FOUND");
    assert_eq!(
        store.task_sequence(event).expect_err("event gone").code(),
        "NOT_FOUND"
    );
    assert_eq!(
        store.delete_event(event).expect_err("second delete").code(),
        "NOT_FOUND"
    );
}
