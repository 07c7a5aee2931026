#![forbid(unsafe_code)]

use ec_core::{
    ChainFault, ContractId, EntityKind, EventId, LookupDomain, PreferenceType, SupplierId, TaskId,
    VenueId,
};
use time::Date;

#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Sql(rusqlite::Error),
    Json(serde_json::Error),
    InvalidInput(&'static str),
    NotFound {
        entity: EntityKind,
        id: i64,
    },
    /// `entity` exists but is not owned by `owner` (a task of another event, a contract of
    /// another supplier).
    InvalidReference {
        entity: EntityKind,
        id: i64,
        owner: EntityKind,
        owner_id: i64,
    },
    CycleDetected {
        task_id: TaskId,
    },
    ChainCorrupted {
        event_id: EventId,
        fault: ChainFault,
    },
    DuplicateEngagement {
        event_id: EventId,
        supplier_id: SupplierId,
    },
    ContractExpired {
        contract_id: ContractId,
        as_of: Date,
        valid_from: Date,
        valid_to: Option<Date>,
    },
    CapacityExceeded {
        event_id: EventId,
        venue_id: VenueId,
        guests: i64,
        max_guests: i64,
    },
    ReferencedEntity {
        entity: EntityKind,
        id: i64,
        referenced_by: &'static str,
    },
    UnknownPreference {
        code: String,
    },
    TypeMismatch {
        code: String,
        expected: PreferenceType,
    },
    UnknownCode {
        domain: LookupDomain,
        code: String,
    },
    TerminalStatus {
        event_id: EventId,
        status: String,
    },
}

impl StoreError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "STORE_IO",
            Self::Sql(_) => "STORE_SQL",
            Self::Json(_) => "STORE_JSON",
            Self::InvalidInput(message) if message.starts_with("RESET_REQUIRED") => {
                "RESET_REQUIRED"
            }
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::InvalidReference { .. } => "INVALID_REFERENCE",
            Self::CycleDetected { .. } => "CYCLE_DETECTED",
            Self::ChainCorrupted { .. } => "CHAIN_CORRUPTED",
            Self::DuplicateEngagement { .. } => "DUPLICATE_ENGAGEMENT",
            Self::ContractExpired { .. } => "CONTRACT_EXPIRED",
            Self::CapacityExceeded { .. } => "CAPACITY_EXCEEDED",
            Self::ReferencedEntity { .. } => "REFERENCED_ENTITY",
            Self::UnknownPreference { .. } => "UNKNOWN_PREFERENCE",
            Self::TypeMismatch { .. } => "TYPE_MISMATCH",
            Self::UnknownCode { .. } => "UNKNOWN_CODE",
            Self::TerminalStatus { .. } => "TERMINAL_STATUS",
        }
    }

    pub(crate) fn not_found(entity: EntityKind, id: i64) -> Self {
        Self::NotFound { entity, id }
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io: {err}"),
            Self::Sql(err) => write!(f, "sqlite: {err}"),
            Self::Json(err) => write!(f, "json: {err}"),
            Self::InvalidInput(message) => write!(f, "invalid input: {message}"),
            Self::NotFound { entity, id } => write!(f, "{entity} {id} not found"),
            Self::InvalidReference {
                entity,
                id,
                owner,
                owner_id,
            } => write!(f, "{entity} {id} does not belong to {owner} {owner_id}"),
            Self::CycleDetected { task_id } => {
                write!(f, "cycle detected: task {task_id} cannot follow itself")
            }
            Self::ChainCorrupted { event_id, fault } => {
                write!(f, "task chain of event {event_id} is corrupted: {fault}")
            }
            Self::DuplicateEngagement {
                event_id,
                supplier_id,
            } => write!(
                f,
                "supplier {supplier_id} is already engaged for event {event_id}"
            ),
            Self::ContractExpired {
                contract_id,
                as_of,
                valid_from,
                valid_to,
            } => match valid_to {
                Some(valid_to) => write!(
                    f,
                    "contract {contract_id} is not valid on {as_of} \
                     (valid {valid_from}..={valid_to})"
                ),
                None => write!(
                    f,
                    "contract {contract_id} is not valid on {as_of} (valid from {valid_from})"
                ),
            },
            Self::CapacityExceeded {
                event_id,
                venue_id,
                guests,
                max_guests,
            } => write!(
                f,
                "event {event_id} has {guests} guests but venue {venue_id} holds {max_guests}"
            ),
            Self::ReferencedEntity {
                entity,
                id,
                referenced_by,
            } => write!(
                f,
                "{entity} {id} is referenced by {referenced_by}; deactivate it instead"
            ),
            Self::UnknownPreference { code } => write!(f, "unknown preference {code}"),
            Self::TypeMismatch { code, expected } => {
                write!(f, "preference {code} expects a {expected} value")
            }
            Self::UnknownCode { domain, code } => write!(f, "unknown {domain} code {code}"),
            Self::TerminalStatus { event_id, status } => {
                write!(f, "event {event_id} is in terminal status {status}")
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Sql(err) => Some(err),
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sql(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}
