#![forbid(unsafe_code)]

use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LookupDomain {
    UserKind,
    EventStatus,
    TaskStatus,
    TaskCategory,
    SupplierType,
    PaymentTerms,
    PreferenceDataType,
}

impl LookupDomain {
    pub const ALL: [LookupDomain; 7] = [
        Self::UserKind,
        Self::EventStatus,
        Self::TaskStatus,
        Self::TaskCategory,
        Self::SupplierType,
        Self::PaymentTerms,
        Self::PreferenceDataType,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::UserKind => "USER_KIND",
            Self::EventStatus => "EVENT_STATUS",
            Self::TaskStatus => "TASK_STATUS",
            Self::TaskCategory => "TASK_CATEGORY",
            Self::SupplierType => "SUPPLIER_TYPE",
            Self::PaymentTerms => "PAYMENT_TERMS",
            Self::PreferenceDataType => "PREFERENCE_DATA_TYPE",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|domain| domain.as_str().eq_ignore_ascii_case(value))
    }
}

impl std::fmt::Display for LookupDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LookupEntry {
    pub domain: LookupDomain,
    pub code: String,
    pub label: String,
    pub sort_order: i64,
    pub active: bool,
}

impl LookupEntry {
    pub fn new(domain: LookupDomain, code: &str, label: &str, sort_order: i64) -> Self {
        Self {
            domain,
            code: code.to_string(),
            label: label.to_string(),
            sort_order,
            active: true,
        }
    }
}

/// Immutable snapshot of every code table, tagged with the version it was loaded at.
#[derive(Clone, Debug, Default)]
pub struct LookupRegistry {
    version: i64,
    entries: BTreeMap<(LookupDomain, String), LookupEntry>,
}

impl LookupRegistry {
    pub fn from_entries(version: i64, entries: impl IntoIterator<Item = LookupEntry>) -> Self {
        let entries = entries
            .into_iter()
            .map(|entry| ((entry.domain, entry.code.clone()), entry))
            .collect();
        Self { version, entries }
    }

    pub fn version(&self) -> i64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, domain: LookupDomain, code: &str) -> Option<&LookupEntry> {
        self.entries.get(&(domain, code.to_string()))
    }

    pub fn is_active(&self, domain: LookupDomain, code: &str) -> bool {
        self.get(domain, code).is_some_and(|entry| entry.active)
    }

    /// Active entries of one domain in display order (`sort_order`, then code).
    pub fn active_entries(&self, domain: LookupDomain) -> Vec<&LookupEntry> {
        let mut out: Vec<&LookupEntry> = self
            .entries
            .values()
            .filter(|entry| entry.domain == domain && entry.active)
            .collect();
        out.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then_with(|| a.code.cmp(&b.code)));
        out
    }
}

/// Codes installed into a fresh database.
pub fn default_entries() -> Vec<LookupEntry> {
    let mut out = Vec::new();
    push_domain(
        &mut out,
        LookupDomain::UserKind,
        &[
            ("ADMIN", "Administrator"),
            ("RESIDENT", "Resident"),
            ("CELEB", "Celebrant"),
            ("STAFF", "Staff"),
        ],
    );
    push_domain(
        &mut out,
        LookupDomain::EventStatus,
        &[
            ("PLANNED", "Planned"),
            ("CONFIRMED", "Confirmed"),
            ("IN_PROGRESS", "In progress"),
            ("COMPLETED", "Completed"),
            ("CANCELLED", "Cancelled"),
        ],
    );
    push_domain(
        &mut out,
        LookupDomain::TaskStatus,
        &[
            ("TODO", "To do"),
            ("IN_PROGRESS", "In progress"),
            ("BLOCKED", "Blocked"),
            ("DONE", "Done"),
            ("CANCELLED", "Cancelled"),
        ],
    );
    push_domain(
        &mut out,
        LookupDomain::TaskCategory,
        &[
            ("VENUE", "Venue"),
            ("CATERING", "Catering"),
            ("MUSIC", "Music"),
            ("DECOR", "Decor"),
            ("PHOTOGRAPHY", "Photography"),
            ("LOGISTICS", "Logistics"),
            ("OTHER", "Other"),
        ],
    );
    push_domain(
        &mut out,
        LookupDomain::SupplierType,
        &[
            ("VENUE", "Venue"),
            ("CATERING", "Catering"),
            ("MUSIC", "Music"),
            ("DECOR", "Decor"),
            ("PHOTOGRAPHY", "Photography"),
            ("MAINTENANCE", "Maintenance"),
            ("OTHER", "Other"),
        ],
    );
    push_domain(
        &mut out,
        LookupDomain::PaymentTerms,
        &[
            ("IMMEDIATE", "Immediate"),
            ("NET_30", "Net 30"),
            ("NET_60", "Net 60"),
            ("INSTALLMENTS", "Installments"),
        ],
    );
    push_domain(
        &mut out,
        LookupDomain::PreferenceDataType,
        &[
            ("STRING", "Text"),
            ("INTEGER", "Integer"),
            ("NUMBER", "Number"),
            ("BOOLEAN", "Yes/No"),
            ("JSON", "Structured"),
        ],
    );
    out
}

fn push_domain(out: &mut Vec<LookupEntry>, domain: LookupDomain, codes: &[(&str, &str)]) {
    let mut sort_order = 0i64;
    for (code, label) in codes {
        sort_order += 10;
        out.push(LookupEntry::new(domain, code, label, sort_order));
    }
}
