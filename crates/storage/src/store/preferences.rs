#![forbid(unsafe_code)]

use super::users::user_by_id;
use super::*;
use ec_core::{LookupDomain, UserId};
use rusqlite::{OptionalExtension, params};
use serde_json::Value;
use tracing::{debug, info};

impl SqliteStore {
    /// Registers or updates a catalog entry. The default must satisfy the declared type and
    /// the type of an existing definition cannot change.
    pub fn define_preference(
        &mut self,
        request: NewPreference,
    ) -> Result<PreferenceDefinition, StoreError> {
        let code = preference_code(&request.code)?;
        require_code(
            &self.lookups,
            LookupDomain::PreferenceDataType,
            request.data_type.code(),
        )?;
        if !request.data_type.accepts(&request.default_value) {
            return Err(StoreError::TypeMismatch {
                code,
                expected: request.data_type,
            });
        }
        let default_json = serde_json::to_string(&request.default_value)?;

        let now_ms = now_ms();
        let tx = begin_write(&mut self.conn)?;
        if let Some(existing) = definition_by_code(&tx, &code)? {
            if existing.data_type != request.data_type {
                return Err(StoreError::InvalidInput(
                    "preference data type cannot change",
                ));
            }
        }
        tx.execute(
            "INSERT INTO preference_definitions(pref_code, data_type, default_value_json, \
               is_active, created_at_ms, updated_at_ms) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?5) \
             ON CONFLICT(pref_code) DO UPDATE SET \
               default_value_json=excluded.default_value_json, \
               is_active=excluded.is_active, \
               updated_at_ms=excluded.updated_at_ms",
            params![
                code,
                request.data_type.code(),
                default_json,
                request.is_active,
                now_ms
            ],
        )?;
        let row = definition_by_code(&tx, &code)?
            .ok_or(StoreError::UnknownPreference { code: code.clone() })?;
        tx.commit()?;

        info!(code = %code, data_type = %row.data_type, "preference defined");
        Ok(row)
    }

    pub fn set_preference_active(
        &mut self,
        code: &str,
        active: bool,
    ) -> Result<PreferenceDefinition, StoreError> {
        let code = preference_code(code)?;
        let tx = begin_write(&mut self.conn)?;
        let updated = tx.execute(
            "UPDATE preference_definitions SET is_active=?2, updated_at_ms=?3 WHERE pref_code=?1",
            params![code, active, now_ms()],
        )?;
        if updated == 0 {
            return Err(StoreError::UnknownPreference { code });
        }
        let row = definition_by_code(&tx, &code)?
            .ok_or(StoreError::UnknownPreference { code: code.clone() })?;
        tx.commit()?;

        info!(code = %code, active, "preference activity changed");
        Ok(row)
    }

    pub fn get_preference_definition(
        &self,
        code: &str,
    ) -> Result<PreferenceDefinition, StoreError> {
        let code = preference_code(code)?;
        definition_by_code(&self.conn, &code)?.ok_or(StoreError::UnknownPreference { code })
    }

    /// The user's stored value, or the definition's default when none is stored.
    pub fn get_preference(&self, user_id: UserId, code: &str) -> Result<Value, StoreError> {
        let code = preference_code(code)?;
        let tx = self.conn.unchecked_transaction()?;
        user_by_id(&tx, user_id)?;
        let definition = definition_by_code(&tx, &code)?
            .ok_or(StoreError::UnknownPreference { code: code.clone() })?;
        let stored = stored_value(&tx, user_id, &code)?;
        debug!(
            user_id = user_id.get(),
            code = %code,
            is_default = stored.is_none(),
            "preference read"
        );
        Ok(stored.unwrap_or(definition.default_value))
    }

    /// Upserts the user's value after checking it against the declared type.
    pub fn set_preference(
        &mut self,
        user_id: UserId,
        code: &str,
        value: Value,
    ) -> Result<Value, StoreError> {
        let code = preference_code(code)?;
        let tx = begin_write(&mut self.conn)?;
        user_by_id(&tx, user_id)?;
        let definition = active_definition(&tx, &code)?;
        if !definition.data_type.accepts(&value) {
            return Err(StoreError::TypeMismatch {
                code,
                expected: definition.data_type,
            });
        }
        tx.execute(
            "INSERT INTO user_preferences(user_id, pref_code, value_json, updated_at_ms) \
             VALUES (?1, ?2, ?3, ?4) \
             ON CONFLICT(user_id, pref_code) DO UPDATE SET \
               value_json=excluded.value_json, updated_at_ms=excluded.updated_at_ms",
            params![user_id.get(), code, serde_json::to_string(&value)?, now_ms()],
        )?;
        tx.commit()?;

        info!(user_id = user_id.get(), code = %code, "preference set");
        Ok(value)
    }

    /// Drops the user's override. Returns whether one existed.
    pub fn reset_preference(&mut self, user_id: UserId, code: &str) -> Result<bool, StoreError> {
        let code = preference_code(code)?;
        let tx = begin_write(&mut self.conn)?;
        user_by_id(&tx, user_id)?;
        if definition_by_code(&tx, &code)?.is_none() {
            return Err(StoreError::UnknownPreference { code });
        }
        let deleted = tx.execute(
            "DELETE FROM user_preferences WHERE user_id=?1 AND pref_code=?2",
            params![user_id.get(), code],
        )?;
        tx.commit()?;

        info!(user_id = user_id.get(), code = %code, deleted, "preference reset");
        Ok(deleted > 0)
    }

    /// Effective values of every active definition, ordered by code.
    pub fn list_preferences(
        &self,
        user_id: UserId,
    ) -> Result<Vec<EffectivePreference>, StoreError> {
        let tx = self.conn.unchecked_transaction()?;
        user_by_id(&tx, user_id)?;
        let mut stmt = tx.prepare(
            "SELECT d.pref_code, d.data_type, d.default_value_json, u.value_json \
             FROM preference_definitions d \
             LEFT JOIN user_preferences u ON u.pref_code = d.pref_code AND u.user_id = ?1 \
             WHERE d.is_active = 1 \
             ORDER BY d.pref_code ASC",
        )?;
        let rows = stmt
            .query_map(params![user_id.get()], |row| {
                let stored = row
                    .get::<_, Option<String>>(3)?
                    .map(|_| json_at(row, 3))
                    .transpose()?;
                Ok(EffectivePreference {
                    code: row.get(0)?,
                    data_type: preference_type_at(row, 1)?,
                    is_default: stored.is_none(),
                    value: match stored {
                        Some(value) => value,
                        None => json_at(row, 2)?,
                    },
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

fn preference_code(raw: &str) -> Result<String, StoreError> {
    let code = raw.trim();
    if code.is_empty() {
        return Err(StoreError::InvalidInput("pref_code must not be empty"));
    }
    Ok(code.to_string())
}

fn definition_by_code(
    conn: &Connection,
    code: &str,
) -> Result<Option<PreferenceDefinition>, StoreError> {
    Ok(conn
        .query_row(
            &format!("SELECT {PREFERENCE_COLUMNS} FROM preference_definitions WHERE pref_code=?1"),
            params![code],
            preference_row,
        )
        .optional()?)
}

fn active_definition(conn: &Connection, code: &str) -> Result<PreferenceDefinition, StoreError> {
    match definition_by_code(conn, code)? {
        Some(definition) if definition.is_active => Ok(definition),
        _ => Err(StoreError::UnknownPreference {
            code: code.to_string(),
        }),
    }
}

fn stored_value(
    conn: &Connection,
    user_id: UserId,
    code: &str,
) -> Result<Option<Value>, StoreError> {
    let raw = conn
        .query_row(
            "SELECT value_json FROM user_preferences WHERE user_id=?1 AND pref_code=?2",
            params![user_id.get(), code],
            |row| row.get::<_, String>(0),
        )
        .optional()?;
    Ok(raw.map(|raw| serde_json::from_str(&raw)).transpose()?)
}
