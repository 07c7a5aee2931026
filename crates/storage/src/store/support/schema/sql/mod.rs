#![forbid(unsafe_code)]

mod core;
mod events;
mod pragmas;
mod preferences;
mod suppliers;
mod tasks;

pub(super) const REQUIRED_TABLES: &[&str] = &[
    "schema_state",
    "lookup_state",
    "lookup_values",
    "users",
    "suppliers",
    "contracts",
    "events",
    "event_venues",
    "event_suppliers",
    "tasks",
    "preference_definitions",
    "user_preferences",
];

pub(super) fn full_schema_sql() -> String {
    let mut sql = String::new();
    sql.push_str(pragmas::SQL);
    sql.push_str(core::SQL);
    sql.push_str(suppliers::SQL);
    sql.push_str(events::SQL);
    sql.push_str(tasks::SQL);
    sql.push_str(preferences::SQL);
    sql
}
