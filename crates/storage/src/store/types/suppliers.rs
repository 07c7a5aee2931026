#![forbid(unsafe_code)]

use ec_core::{ContractId, Money, SupplierId};
use time::Date;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SupplierRow {
    pub supplier_id: SupplierId,
    pub name: String,
    pub supplier_type: String,
    pub payment_terms: Option<String>,
    pub is_active: bool,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractRow {
    pub contract_id: ContractId,
    pub supplier_id: SupplierId,
    pub valid_from: Date,
    /// `None` is open-ended.
    pub valid_to: Option<Date>,
    pub total_price: Money,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

impl ContractRow {
    /// Whether `date` falls inside `[valid_from, valid_to]`.
    pub fn covers(&self, date: Date) -> bool {
        date >= self.valid_from && self.valid_to.is_none_or(|valid_to| date <= valid_to)
    }
}
