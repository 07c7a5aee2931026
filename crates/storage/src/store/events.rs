#![forbid(unsafe_code)]

use super::users::user_by_id;
use super::*;
use ec_core::{DEFAULT_EVENT_STATUS, EntityKind, EventId, LookupDomain, is_terminal_event_status};
use rusqlite::{OptionalExtension, params};
use tracing::info;

impl SqliteStore {
    /// New events start in `PLANNED` with an empty task chain, no venue and no suppliers.
    pub fn create_event(&mut self, request: NewEvent) -> Result<EventRow, StoreError> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(StoreError::InvalidInput("event name must not be empty"));
        }
        if request.guests_num < 0 {
            return Err(StoreError::InvalidInput("guests_num must be >= 0"));
        }
        let status = require_code(&self.lookups, LookupDomain::EventStatus, DEFAULT_EVENT_STATUS)?;

        let now_ms = now_ms();
        let tx = begin_write(&mut self.conn)?;
        user_by_id(&tx, request.celeb_user_id)?;
        tx.execute(
            "INSERT INTO events(celeb_user_id, name, event_date, event_time, guests_num, status, \
             created_at_ms, updated_at_ms) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
            params![
                request.celeb_user_id.get(),
                name,
                request.event_date,
                request.event_time,
                request.guests_num,
                status,
                now_ms
            ],
        )?;
        let event_id = EventId::new(tx.last_insert_rowid());
        let row = event_by_id(&tx, event_id)?;
        tx.commit()?;

        info!(event_id = event_id.get(), date = %row.event_date, "event created");
        Ok(row)
    }

    pub fn get_event(&self, event_id: EventId) -> Result<EventRow, StoreError> {
        event_by_id(&self.conn, event_id)
    }

    /// Changes the guest count. While a venue is selected the new count must fit it.
    pub fn set_event_guests(
        &mut self,
        event_id: EventId,
        guests_num: i64,
    ) -> Result<EventRow, StoreError> {
        if guests_num < 0 {
            return Err(StoreError::InvalidInput("guests_num must be >= 0"));
        }

        let tx = begin_write(&mut self.conn)?;
        event_by_id(&tx, event_id)?;
        if let Some(venue) = super::venues::selected_venue(&tx, event_id)? {
            if !venue.admits(guests_num) {
                return Err(StoreError::CapacityExceeded {
                    event_id,
                    venue_id: venue.venue_id,
                    guests: guests_num,
                    max_guests: venue.max_guests.unwrap_or(i64::MAX),
                });
            }
        }
        tx.execute(
            "UPDATE events SET guests_num=?2, updated_at_ms=?3 WHERE event_id=?1",
            params![event_id.get(), guests_num, now_ms()],
        )?;
        let row = event_by_id(&tx, event_id)?;
        tx.commit()?;

        info!(event_id = event_id.get(), guests_num, "event guests changed");
        Ok(row)
    }

    /// Moves the event to another `EVENT_STATUS`. Terminal statuses are final; the task
    /// chain is left as it is either way.
    pub fn set_event_status(
        &mut self,
        event_id: EventId,
        status: &str,
    ) -> Result<EventRow, StoreError> {
        let status = require_code(&self.lookups, LookupDomain::EventStatus, status)?;

        let tx = begin_write(&mut self.conn)?;
        let current = event_by_id(&tx, event_id)?;
        if current.status == status {
            return Ok(current);
        }
        if is_terminal_event_status(&current.status) {
            return Err(StoreError::TerminalStatus {
                event_id,
                status: current.status,
            });
        }
        tx.execute(
            "UPDATE events SET status=?2, updated_at_ms=?3 WHERE event_id=?1",
            params![event_id.get(), status, now_ms()],
        )?;
        let row = event_by_id(&tx, event_id)?;
        tx.commit()?;

        info!(
            event_id = event_id.get(),
            from = %current.status,
            to = %row.status,
            "event status changed"
        );
        Ok(row)
    }

    /// Deletes the event together with its tasks, venues and engagements.
    pub fn delete_event(&mut self, event_id: EventId) -> Result<(), StoreError> {
        let tx = begin_write(&mut self.conn)?;
        let deleted = tx.execute(
            "DELETE FROM events WHERE event_id=?1",
            params![event_id.get()],
        )?;
        if deleted == 0 {
            return Err(StoreError::not_found(EntityKind::Event, event_id.get()));
        }
        tx.commit()?;

        info!(event_id = event_id.get(), "event deleted");
        Ok(())
    }
}

pub(super) fn event_by_id(conn: &Connection, event_id: EventId) -> Result<EventRow, StoreError> {
    conn.query_row(
        &format!("SELECT {EVENT_COLUMNS} FROM events WHERE event_id=?1"),
        params![event_id.get()],
        event_row,
    )
    .optional()?
    .ok_or(StoreError::not_found(EntityKind::Event, event_id.get()))
}
