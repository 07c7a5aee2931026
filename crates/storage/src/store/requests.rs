#![forbid(unsafe_code)]

use ec_core::{ContractId, EventId, Money, PreferenceType, SupplierId, UserId, VenueAddons};
use serde_json::Value;
use time::{Date, Time};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: Option<String>,
    /// `USER_KIND` code.
    pub kind: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewSupplier {
    pub name: String,
    /// `SUPPLIER_TYPE` code.
    pub supplier_type: String,
    /// `PAYMENT_TERMS` code.
    pub payment_terms: Option<String>,
}

/// Fields left `None` keep their stored value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SupplierUpdate {
    pub name: Option<String>,
    pub supplier_type: Option<String>,
    pub payment_terms: Option<Option<String>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewContract {
    pub supplier_id: SupplierId,
    pub valid_from: Date,
    pub valid_to: Option<Date>,
    pub total_price: Money,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewEvent {
    pub celeb_user_id: UserId,
    pub name: String,
    pub event_date: Date,
    pub event_time: Option<Time>,
    pub guests_num: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewTask {
    pub description: String,
    /// `TASK_CATEGORY` code.
    pub category: Option<String>,
    pub responsible_user_id: Option<UserId>,
    pub eta: Option<Date>,
    /// `TASK_STATUS` code.
    pub status: String,
}

impl NewTask {
    pub fn todo(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            category: None,
            responsible_user_id: None,
            eta: None,
            status: "TODO".to_string(),
        }
    }
}

/// Fields left `None` keep their stored value. Chain pointers are not editable here.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    pub description: Option<String>,
    pub category: Option<Option<String>>,
    pub responsible_user_id: Option<Option<UserId>>,
    pub eta: Option<Option<Date>>,
    pub status: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewVenue {
    pub name: String,
    pub max_guests: Option<i64>,
    pub agreed_price: Money,
    pub addons: VenueAddons,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewEngagement {
    pub event_id: EventId,
    pub supplier_id: SupplierId,
    pub contract_id: Option<ContractId>,
    pub agreed_price: Money,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewPreference {
    pub code: String,
    pub data_type: PreferenceType,
    pub default_value: Value,
    pub is_active: bool,
}
