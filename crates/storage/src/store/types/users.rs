#![forbid(unsafe_code)]

use ec_core::UserId;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserRow {
    pub user_id: UserId,
    pub name: String,
    pub email: Option<String>,
    pub kind: String,
    pub is_active: bool,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}
