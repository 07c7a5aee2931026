#![forbid(unsafe_code)]

use super::events::event_by_id;
use super::*;
use ec_core::{EntityKind, EventId, VenueCost, VenueId};
use rusqlite::{OptionalExtension, params};
use tracing::{debug, info};

impl SqliteStore {
    pub fn add_venue(
        &mut self,
        event_id: EventId,
        request: NewVenue,
    ) -> Result<VenueRow, StoreError> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(StoreError::InvalidInput("venue name must not be empty"));
        }
        if request.max_guests.is_some_and(|max| max < 0) {
            return Err(StoreError::InvalidInput("max_guests must be >= 0"));
        }
        if request.agreed_price.is_negative() || request.addons.has_negative_price() {
            return Err(StoreError::InvalidInput("venue prices must be >= 0"));
        }

        let now_ms = now_ms();
        let addons = &request.addons;
        let tx = begin_write(&mut self.conn)?;
        event_by_id(&tx, event_id)?;
        tx.execute(
            "INSERT INTO event_venues(event_id, name, max_guests, agreed_price, \
               has_sound, sound_price, has_design, design_price, \
               has_lighting, lighting_price, has_bar, bar_price, \
               is_selected, created_at_ms, updated_at_ms) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, 0, ?13, ?13)",
            params![
                event_id.get(),
                name,
                request.max_guests,
                request.agreed_price.minor(),
                addons.sound.enabled,
                addons.sound.price.minor(),
                addons.design.enabled,
                addons.design.price.minor(),
                addons.lighting.enabled,
                addons.lighting.price.minor(),
                addons.bar.enabled,
                addons.bar.price.minor(),
                now_ms
            ],
        )?;
        let venue_id = VenueId::new(tx.last_insert_rowid());
        let row = venue_by_id(&tx, venue_id)?;
        tx.commit()?;

        info!(event_id = event_id.get(), venue_id = venue_id.get(), "venue added");
        Ok(row)
    }

    pub fn get_venue(&self, venue_id: VenueId) -> Result<VenueRow, StoreError> {
        venue_by_id(&self.conn, venue_id)
    }

    pub fn list_venues(&self, event_id: EventId) -> Result<Vec<VenueRow>, StoreError> {
        let tx = self.conn.unchecked_transaction()?;
        event_by_id(&tx, event_id)?;
        let mut stmt = tx.prepare(&format!(
            "SELECT {VENUE_COLUMNS} FROM event_venues WHERE event_id=?1 ORDER BY venue_id ASC"
        ))?;
        let rows = stmt
            .query_map(params![event_id.get()], venue_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Changes a venue's capacity. Shrinking the selected venue below the event's guest
    /// count is refused.
    pub fn set_venue_capacity(
        &mut self,
        venue_id: VenueId,
        max_guests: Option<i64>,
    ) -> Result<VenueRow, StoreError> {
        if max_guests.is_some_and(|max| max < 0) {
            return Err(StoreError::InvalidInput("max_guests must be >= 0"));
        }

        let tx = begin_write(&mut self.conn)?;
        let mut venue = venue_by_id(&tx, venue_id)?;
        if venue.is_selected {
            let event = event_by_id(&tx, venue.event_id)?;
            venue.max_guests = max_guests;
            if !venue.admits(event.guests_num) {
                return Err(capacity_exceeded(&event, &venue));
            }
        }
        tx.execute(
            "UPDATE event_venues SET max_guests=?2, updated_at_ms=?3 WHERE venue_id=?1",
            params![venue_id.get(), max_guests, now_ms()],
        )?;
        let row = venue_by_id(&tx, venue_id)?;
        tx.commit()?;

        info!(venue_id = venue_id.get(), ?max_guests, "venue capacity changed");
        Ok(row)
    }

    /// Removing the selected venue leaves the event without a selection.
    pub fn remove_venue(&mut self, venue_id: VenueId) -> Result<(), StoreError> {
        let tx = begin_write(&mut self.conn)?;
        let deleted = tx.execute(
            "DELETE FROM event_venues WHERE venue_id=?1",
            params![venue_id.get()],
        )?;
        if deleted == 0 {
            return Err(StoreError::not_found(EntityKind::Venue, venue_id.get()));
        }
        tx.commit()?;

        info!(venue_id = venue_id.get(), "venue removed");
        Ok(())
    }

    /// Selects `venue_id` and clears every other selection of the event in the same
    /// transaction. The event's guest count must fit the venue.
    pub fn select_venue(
        &mut self,
        event_id: EventId,
        venue_id: VenueId,
    ) -> Result<VenueRow, StoreError> {
        let tx = begin_write(&mut self.conn)?;
        let event = event_by_id(&tx, event_id)?;
        let venue = venue_by_id(&tx, venue_id)?;
        if venue.event_id != event_id {
            return Err(StoreError::InvalidReference {
                entity: EntityKind::Venue,
                id: venue_id.get(),
                owner: EntityKind::Event,
                owner_id: event_id.get(),
            });
        }
        if !venue.admits(event.guests_num) {
            return Err(capacity_exceeded(&event, &venue));
        }

        let now_ms = now_ms();
        let cleared = tx.execute(
            "UPDATE event_venues SET is_selected=0, updated_at_ms=?3 \
             WHERE event_id=?1 AND is_selected=1 AND venue_id<>?2",
            params![event_id.get(), venue_id.get(), now_ms],
        )?;
        if !venue.is_selected {
            tx.execute(
                "UPDATE event_venues SET is_selected=1, updated_at_ms=?2 WHERE venue_id=?1",
                params![venue_id.get(), now_ms],
            )?;
        }
        let row = venue_by_id(&tx, venue_id)?;
        tx.commit()?;

        info!(
            event_id = event_id.get(),
            venue_id = venue_id.get(),
            cleared,
            "venue selected"
        );
        Ok(row)
    }

    /// Clears the selection. Returns whether a venue was selected.
    pub fn deselect(&mut self, event_id: EventId) -> Result<bool, StoreError> {
        let tx = begin_write(&mut self.conn)?;
        event_by_id(&tx, event_id)?;
        let cleared = tx.execute(
            "UPDATE event_venues SET is_selected=0, updated_at_ms=?2 \
             WHERE event_id=?1 AND is_selected=1",
            params![event_id.get(), now_ms()],
        )?;
        tx.commit()?;

        info!(event_id = event_id.get(), cleared, "venue deselected");
        Ok(cleared > 0)
    }

    /// Selected venue's agreed price plus its enabled add-ons.
    pub fn compute_venue_cost(&self, event_id: EventId) -> Result<VenueCost, StoreError> {
        let tx = self.conn.unchecked_transaction()?;
        event_by_id(&tx, event_id)?;
        let Some(venue) = selected_venue(&tx, event_id)? else {
            debug!(event_id = event_id.get(), "no venue selected");
            return Ok(VenueCost::NoVenueSelected);
        };
        let cost = VenueCost::for_venue(venue.venue_id, venue.agreed_price, &venue.addons)
            .ok_or(StoreError::InvalidInput("venue cost overflows"))?;
        debug!(
            event_id = event_id.get(),
            venue_id = venue.venue_id.get(),
            total = ?cost.total(),
            "venue cost computed"
        );
        Ok(cost)
    }

    pub fn selected_venue(&self, event_id: EventId) -> Result<Option<VenueRow>, StoreError> {
        let tx = self.conn.unchecked_transaction()?;
        event_by_id(&tx, event_id)?;
        selected_venue(&tx, event_id)
    }
}

fn capacity_exceeded(event: &EventRow, venue: &VenueRow) -> StoreError {
    StoreError::CapacityExceeded {
        event_id: event.event_id,
        venue_id: venue.venue_id,
        guests: event.guests_num,
        max_guests: venue.max_guests.unwrap_or(i64::MAX),
    }
}

pub(super) fn venue_by_id(conn: &Connection, venue_id: VenueId) -> Result<VenueRow, StoreError> {
    conn.query_row(
        &format!("SELECT {VENUE_COLUMNS} FROM event_venues WHERE venue_id=?1"),
        params![venue_id.get()],
        venue_row,
    )
    .optional()?
    .ok_or(StoreError::not_found(EntityKind::Venue, venue_id.get()))
}

pub(super) fn selected_venue(
    conn: &Connection,
    event_id: EventId,
) -> Result<Option<VenueRow>, StoreError> {
    Ok(conn
        .query_row(
            &format!(
                "SELECT {VENUE_COLUMNS} FROM event_venues WHERE event_id=?1 AND is_selected=1"
            ),
            params![event_id.get()],
            venue_row,
        )
        .optional()?)
}
