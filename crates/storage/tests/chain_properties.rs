#![forbid(unsafe_code)]

use ec_core::{EventId, TaskId};
use ec_storage::{NewEvent, NewTask, NewUser, SqliteStore};
use proptest::prelude::*;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use time::{Date, Month};

static CASE: AtomicU64 = AtomicU64::new(0);

fn temp_dir(test_name: &str) -> PathBuf {
    let base = std::env::temp_dir();
    let pid = std::process::id();
    let case = CASE.fetch_add(1, Ordering::Relaxed);
    let nonce = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let dir = base.join(format!("ec_storage_{test_name}_{pid}_{case}_{nonce}"));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn fresh_event() -> (SqliteStore, EventId) {
    let mut store = SqliteStore::open(temp_dir("chain_properties")).expect("open store");
    let user = store
        .create_user(NewUser {
            name: "Host".to_string(),
            email: None,
            kind: "CELEB".to_string(),
        })
        .expect("user");
    let event = store
        .create_event(NewEvent {
            celeb_user_id: user.user_id,
            name: "Randomized".to_string(),
            event_date: Date::from_calendar_date(2026, Month::May, 1).expect("date"),
            event_time: None,
            guests_num: 0,
        })
        .expect("event");
    (store, event.event_id)
}

#[derive(Clone, Debug)]
enum Op {
    Insert { anchor: usize, at_head: bool },
    Remove { pick: usize },
    Move { pick: usize, anchor: usize, at_head: bool },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (any::<usize>(), any::<bool>())
            .prop_map(|(anchor, at_head)| Op::Insert { anchor, at_head }),
        1 => any::<usize>().prop_map(|pick| Op::Remove { pick }),
        2 => (any::<usize>(), any::<usize>(), any::<bool>())
            .prop_map(|(pick, anchor, at_head)| Op::Move { pick, anchor, at_head }),
    ]
}

fn stored_order(store: &SqliteStore, event: EventId) -> Vec<TaskId> {
    store
        .ordered_tasks(event)
        .expect("ordered tasks")
        .into_iter()
        .map(|task| task.task_id)
        .collect()
}

/// Index a task lands at when inserted after `after` (or at the head).
fn slot_after(model: &[TaskId], after: Option<TaskId>) -> usize {
    match after {
        None => 0,
        Some(anchor) => model.iter().position(|t| *t == anchor).expect("anchor") + 1,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn persisted_chain_matches_model_after_every_operation(
        ops in prop::collection::vec(op_strategy(), 1..24)
    ) {
        let (mut store, event) = fresh_event();
        let mut model: Vec<TaskId> = Vec::new();

        for op in ops {
            prop_assert_eq!(store.verify_chain(event).expect("verify before"), model.len());
            match op {
                Op::Insert { anchor, at_head } => {
                    let after = if at_head || model.is_empty() {
                        None
                    } else {
                        Some(model[anchor % model.len()])
                    };
                    let task = store
                        .create_task(event, after, NewTask::todo("step"))
                        .expect("insert")
                        .task_id;
                    model.insert(slot_after(&model, after), task);
                }
                Op::Remove { pick } => {
                    if model.is_empty() {
                        continue;
                    }
                    let task = model.remove(pick % model.len());
                    store.remove_task(task).expect("remove");
                }
                Op::Move { pick, anchor, at_head } => {
                    if model.is_empty() {
                        continue;
                    }
                    let task = model[pick % model.len()];
                    let after = if at_head { None } else { Some(model[anchor % model.len()]) };
                    if after == Some(task) {
                        let err = store.move_task(task, after).expect_err("self anchor");
                        prop_assert_eq!(err.code(), "CYCLE_DETECTED");
                        continue;
                    }
                    store.move_task(task, after).expect("move");
                    model.retain(|t| *t != task);
                    model.insert(slot_after(&model, after), task);
                }
            }
            prop_assert_eq!(store.verify_chain(event).expect("verify after"), model.len());
            prop_assert_eq!(stored_order(&store, event), model.clone());
        }
    }
}
