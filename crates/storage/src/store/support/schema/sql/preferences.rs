#![forbid(unsafe_code)]

pub(super) const SQL: &str = r#"

        CREATE TABLE IF NOT EXISTS preference_definitions (
          pref_code TEXT PRIMARY KEY,
          data_type TEXT NOT NULL,
          default_value_json TEXT NOT NULL,
          is_active INTEGER NOT NULL DEFAULT 1 CHECK(is_active IN (0, 1)),
          created_at_ms INTEGER NOT NULL,
          updated_at_ms INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS user_preferences (
          user_id INTEGER NOT NULL
            REFERENCES users(user_id) ON DELETE CASCADE,
          pref_code TEXT NOT NULL
            REFERENCES preference_definitions(pref_code) ON DELETE RESTRICT,
          value_json TEXT NOT NULL,
          updated_at_ms INTEGER NOT NULL,
          PRIMARY KEY(user_id, pref_code)
        );
"#;
