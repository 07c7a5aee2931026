#![forbid(unsafe_code)]

use ec_core::{ContractId, EventId, ListId, Money, SupplierId};

/// One supplier attached to one event. The `*_snapshot` fields are frozen at engagement
/// time and never follow later supplier or contract edits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngagementRow {
    pub list_id: ListId,
    pub event_id: EventId,
    pub supplier_id: SupplierId,
    pub contract_id: Option<ContractId>,
    pub supplier_name_snapshot: String,
    pub payment_terms_snapshot: Option<String>,
    pub contract_total_snapshot: Option<Money>,
    pub agreed_price: Money,
    pub is_confirmed: bool,
    pub confirmed_at_ms: Option<i64>,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}
