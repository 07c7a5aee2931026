#![forbid(unsafe_code)]

/// A UNIQUE failure naming `column` (as `table.column`).
pub(in crate::store) fn is_unique_violation(err: &rusqlite::Error, column: &str) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(_, Some(message)) => {
            message.contains("UNIQUE constraint failed") && message.contains(column)
        }
        _ => false,
    }
}

pub(in crate::store) fn is_foreign_key_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(_, Some(message)) => {
            message.contains("FOREIGN KEY constraint failed")
        }
        _ => false,
    }
}
