#![forbid(unsafe_code)]

use super::super::types::*;
use ec_core::{
    ContractId, EventId, ListId, Money, PreferenceType, SupplierId, TaskId, UserId, VenueAddon,
    VenueAddons, VenueId,
};
use rusqlite::Row;
use rusqlite::types::Type;

pub(in crate::store) const USER_COLUMNS: &str =
    "user_id, name, email, kind, is_active, created_at_ms, updated_at_ms";

pub(in crate::store) const SUPPLIER_COLUMNS: &str =
    "supplier_id, name, supplier_type, payment_terms, is_active, created_at_ms, updated_at_ms";

pub(in crate::store) const CONTRACT_COLUMNS: &str =
    "contract_id, supplier_id, valid_from, valid_to, total_price, created_at_ms, updated_at_ms";

pub(in crate::store) const EVENT_COLUMNS: &str = "event_id, celeb_user_id, name, event_date, \
     event_time, guests_num, status, created_at_ms, updated_at_ms";

pub(in crate::store) const TASK_COLUMNS: &str = "task_id, event_id, description, category, \
     responsible_user_id, eta, status, prev_task_id, next_task_id, created_at_ms, updated_at_ms";

pub(in crate::store) const VENUE_COLUMNS: &str = "venue_id, event_id, name, max_guests, \
     agreed_price, has_sound, sound_price, has_design, design_price, has_lighting, \
     lighting_price, has_bar, bar_price, is_selected, created_at_ms, updated_at_ms";

pub(in crate::store) const ENGAGEMENT_COLUMNS: &str = "list_id, event_id, supplier_id, \
     contract_id, supplier_name_snapshot, payment_terms_snapshot, contract_total_snapshot, \
     agreed_price, is_confirmed, confirmed_at_ms, created_at_ms, updated_at_ms";

pub(in crate::store) const PREFERENCE_COLUMNS: &str =
    "pref_code, data_type, default_value_json, is_active, created_at_ms, updated_at_ms";

pub(in crate::store) fn user_row(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        user_id: UserId::new(row.get(0)?),
        name: row.get(1)?,
        email: row.get(2)?,
        kind: row.get(3)?,
        is_active: row.get(4)?,
        created_at_ms: row.get(5)?,
        updated_at_ms: row.get(6)?,
    })
}

pub(in crate::store) fn supplier_row(row: &Row<'_>) -> rusqlite::Result<SupplierRow> {
    Ok(SupplierRow {
        supplier_id: SupplierId::new(row.get(0)?),
        name: row.get(1)?,
        supplier_type: row.get(2)?,
        payment_terms: row.get(3)?,
        is_active: row.get(4)?,
        created_at_ms: row.get(5)?,
        updated_at_ms: row.get(6)?,
    })
}

pub(in crate::store) fn contract_row(row: &Row<'_>) -> rusqlite::Result<ContractRow> {
    Ok(ContractRow {
        contract_id: ContractId::new(row.get(0)?),
        supplier_id: SupplierId::new(row.get(1)?),
        valid_from: row.get(2)?,
        valid_to: row.get(3)?,
        total_price: Money::from_minor(row.get(4)?),
        created_at_ms: row.get(5)?,
        updated_at_ms: row.get(6)?,
    })
}

pub(in crate::store) fn event_row(row: &Row<'_>) -> rusqlite::Result<EventRow> {
    Ok(EventRow {
        event_id: EventId::new(row.get(0)?),
        celeb_user_id: UserId::new(row.get(1)?),
        name: row.get(2)?,
        event_date: row.get(3)?,
        event_time: row.get(4)?,
        guests_num: row.get(5)?,
        status: row.get(6)?,
        created_at_ms: row.get(7)?,
        updated_at_ms: row.get(8)?,
    })
}

pub(in crate::store) fn task_row(row: &Row<'_>) -> rusqlite::Result<TaskRow> {
    Ok(TaskRow {
        task_id: TaskId::new(row.get(0)?),
        event_id: EventId::new(row.get(1)?),
        description: row.get(2)?,
        category: row.get(3)?,
        responsible_user_id: row.get::<_, Option<i64>>(4)?.map(UserId::new),
        eta: row.get(5)?,
        status: row.get(6)?,
        prev_task_id: row.get::<_, Option<i64>>(7)?.map(TaskId::new),
        next_task_id: row.get::<_, Option<i64>>(8)?.map(TaskId::new),
        created_at_ms: row.get(9)?,
        updated_at_ms: row.get(10)?,
    })
}

fn addon(row: &Row<'_>, enabled: usize) -> rusqlite::Result<VenueAddon> {
    Ok(VenueAddon {
        enabled: row.get(enabled)?,
        price: Money::from_minor(row.get(enabled + 1)?),
    })
}

pub(in crate::store) fn venue_row(row: &Row<'_>) -> rusqlite::Result<VenueRow> {
    Ok(VenueRow {
        venue_id: VenueId::new(row.get(0)?),
        event_id: EventId::new(row.get(1)?),
        name: row.get(2)?,
        max_guests: row.get(3)?,
        agreed_price: Money::from_minor(row.get(4)?),
        addons: VenueAddons {
            sound: addon(row, 5)?,
            design: addon(row, 7)?,
            lighting: addon(row, 9)?,
            bar: addon(row, 11)?,
        },
        is_selected: row.get(13)?,
        created_at_ms: row.get(14)?,
        updated_at_ms: row.get(15)?,
    })
}

pub(in crate::store) fn engagement_row(row: &Row<'_>) -> rusqlite::Result<EngagementRow> {
    Ok(EngagementRow {
        list_id: ListId::new(row.get(0)?),
        event_id: EventId::new(row.get(1)?),
        supplier_id: SupplierId::new(row.get(2)?),
        contract_id: row.get::<_, Option<i64>>(3)?.map(ContractId::new),
        supplier_name_snapshot: row.get(4)?,
        payment_terms_snapshot: row.get(5)?,
        contract_total_snapshot: row.get::<_, Option<i64>>(6)?.map(Money::from_minor),
        agreed_price: Money::from_minor(row.get(7)?),
        is_confirmed: row.get(8)?,
        confirmed_at_ms: row.get(9)?,
        created_at_ms: row.get(10)?,
        updated_at_ms: row.get(11)?,
    })
}

pub(in crate::store) fn preference_row(row: &Row<'_>) -> rusqlite::Result<PreferenceDefinition> {
    Ok(PreferenceDefinition {
        code: row.get(0)?,
        data_type: preference_type_at(row, 1)?,
        default_value: json_at(row, 2)?,
        is_active: row.get(3)?,
        created_at_ms: row.get(4)?,
        updated_at_ms: row.get(5)?,
    })
}

pub(in crate::store) fn preference_type_at(
    row: &Row<'_>,
    idx: usize,
) -> rusqlite::Result<PreferenceType> {
    let raw = row.get::<_, String>(idx)?;
    PreferenceType::parse(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("unknown preference data type {raw}").into(),
        )
    })
}

pub(in crate::store) fn json_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<serde_json::Value> {
    let raw = row.get::<_, String>(idx)?;
    serde_json::from_str(&raw)
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err)))
}
