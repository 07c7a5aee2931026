#![forbid(unsafe_code)]

use super::*;
use ec_core::{EntityKind, LookupDomain, UserId};
use rusqlite::{OptionalExtension, params};
use tracing::info;

impl SqliteStore {
    pub fn create_user(&mut self, request: NewUser) -> Result<UserRow, StoreError> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(StoreError::InvalidInput("user name must not be empty"));
        }
        let email = request
            .email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty());
        let kind = require_code(&self.lookups, LookupDomain::UserKind, &request.kind)?;

        let now_ms = now_ms();
        let tx = begin_write(&mut self.conn)?;
        let insert = tx.execute(
            "INSERT INTO users(name, email, kind, is_active, created_at_ms, updated_at_ms) \
             VALUES (?1, ?2, ?3, 1, ?4, ?4)",
            params![name, email, kind, now_ms],
        );
        if let Err(err) = insert {
            if is_unique_violation(&err, "users.email") {
                return Err(StoreError::InvalidInput("user email already exists"));
            }
            return Err(err.into());
        }
        let user_id = UserId::new(tx.last_insert_rowid());
        let row = user_by_id(&tx, user_id)?;
        tx.commit()?;

        info!(user_id = user_id.get(), kind = %row.kind, "user created");
        Ok(row)
    }

    pub fn get_user(&self, user_id: UserId) -> Result<UserRow, StoreError> {
        user_by_id(&self.conn, user_id)
    }

    pub fn set_user_active(
        &mut self,
        user_id: UserId,
        active: bool,
    ) -> Result<UserRow, StoreError> {
        let tx = begin_write(&mut self.conn)?;
        let updated = tx.execute(
            "UPDATE users SET is_active=?2, updated_at_ms=?3 WHERE user_id=?1",
            params![user_id.get(), active, now_ms()],
        )?;
        if updated == 0 {
            return Err(StoreError::not_found(EntityKind::User, user_id.get()));
        }
        let row = user_by_id(&tx, user_id)?;
        tx.commit()?;

        info!(user_id = user_id.get(), active, "user activity changed");
        Ok(row)
    }
}

pub(super) fn user_by_id(conn: &Connection, user_id: UserId) -> Result<UserRow, StoreError> {
    conn.query_row(
        &format!("SELECT {USER_COLUMNS} FROM users WHERE user_id=?1"),
        params![user_id.get()],
        user_row,
    )
    .optional()?
    .ok_or(StoreError::not_found(EntityKind::User, user_id.get()))
}
