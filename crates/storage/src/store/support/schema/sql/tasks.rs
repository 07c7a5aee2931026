#![forbid(unsafe_code)]

pub(super) const SQL: &str = r#"

        CREATE TABLE IF NOT EXISTS tasks (
          task_id INTEGER PRIMARY KEY AUTOINCREMENT,
          event_id INTEGER NOT NULL
            REFERENCES events(event_id) ON DELETE CASCADE,
          description TEXT NOT NULL,
          category TEXT,
          responsible_user_id INTEGER
            REFERENCES users(user_id) ON DELETE SET NULL,
          eta TEXT,
          status TEXT NOT NULL,
          prev_task_id INTEGER
            REFERENCES tasks(task_id) ON DELETE SET NULL,
          next_task_id INTEGER
            REFERENCES tasks(task_id) ON DELETE SET NULL,
          created_at_ms INTEGER NOT NULL,
          updated_at_ms INTEGER NOT NULL,
          CHECK(prev_task_id IS NULL OR prev_task_id <> task_id),
          CHECK(next_task_id IS NULL OR next_task_id <> task_id),
          CHECK(prev_task_id IS NULL OR next_task_id IS NULL OR prev_task_id <> next_task_id)
        );

        CREATE INDEX IF NOT EXISTS idx_tasks_event
          ON tasks(event_id);

        -- No branching: a task is the predecessor (successor) of at most one task.
        CREATE UNIQUE INDEX IF NOT EXISTS ux_tasks_prev
          ON tasks(prev_task_id) WHERE prev_task_id IS NOT NULL;

        CREATE UNIQUE INDEX IF NOT EXISTS ux_tasks_next
          ON tasks(next_task_id) WHERE next_task_id IS NOT NULL;

        CREATE TRIGGER IF NOT EXISTS tasks_chain_same_event_insert
        BEFORE INSERT ON tasks
        WHEN (NEW.prev_task_id IS NOT NULL
              AND (SELECT event_id FROM tasks WHERE task_id = NEW.prev_task_id) IS NOT NEW.event_id)
          OR (NEW.next_task_id IS NOT NULL
              AND (SELECT event_id FROM tasks WHERE task_id = NEW.next_task_id) IS NOT NEW.event_id)
        BEGIN
          SELECT RAISE(ABORT, 'task chain pointer must stay within its event');
        END;

        CREATE TRIGGER IF NOT EXISTS tasks_chain_same_event_update
        BEFORE UPDATE OF event_id, prev_task_id, next_task_id ON tasks
        WHEN (NEW.prev_task_id IS NOT NULL
              AND (SELECT event_id FROM tasks WHERE task_id = NEW.prev_task_id) IS NOT NEW.event_id)
          OR (NEW.next_task_id IS NOT NULL
              AND (SELECT event_id FROM tasks WHERE task_id = NEW.next_task_id) IS NOT NEW.event_id)
        BEGIN
          SELECT RAISE(ABORT, 'task chain pointer must stay within its event');
        END;
"#;
