#![forbid(unsafe_code)]

use ec_core::PreferenceType;
use serde_json::Value;

#[derive(Clone, Debug, PartialEq)]
pub struct PreferenceDefinition {
    pub code: String,
    pub data_type: PreferenceType,
    pub default_value: Value,
    pub is_active: bool,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

/// A user's value for one active definition, falling back to the default.
#[derive(Clone, Debug, PartialEq)]
pub struct EffectivePreference {
    pub code: String,
    pub data_type: PreferenceType,
    pub value: Value,
    pub is_default: bool,
}
