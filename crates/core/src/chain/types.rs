#![forbid(unsafe_code)]

use crate::ids::TaskId;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChainLinks {
    pub prev: Option<TaskId>,
    pub next: Option<TaskId>,
}

impl ChainLinks {
    pub const DETACHED: ChainLinks = ChainLinks {
        prev: None,
        next: None,
    };

    pub fn new(prev: Option<TaskId>, next: Option<TaskId>) -> Self {
        Self { prev, next }
    }
}

/// A task whose links differ between two versions of a chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LinkChange {
    pub task: TaskId,
    pub before: Option<ChainLinks>,
    pub after: ChainLinks,
}

/// Structural integrity violation found while verifying or walking a chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChainFault {
    NoHead,
    MultipleHeads { heads: Vec<TaskId> },
    MultipleTails { tails: Vec<TaskId> },
    Cycle { at: TaskId },
    Orphans { visited: usize, total: usize },
    DanglingPointer { from: TaskId, to: TaskId },
    AsymmetricLink { from: TaskId, to: TaskId },
    SelfLink { task: TaskId },
}

impl ChainFault {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NoHead => "no_head",
            Self::MultipleHeads { .. } => "multiple_heads",
            Self::MultipleTails { .. } => "multiple_tails",
            Self::Cycle { .. } => "cycle",
            Self::Orphans { .. } => "orphans",
            Self::DanglingPointer { .. } => "dangling_pointer",
            Self::AsymmetricLink { .. } => "asymmetric_link",
            Self::SelfLink { .. } => "self_link",
        }
    }
}

impl std::fmt::Display for ChainFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoHead => write!(f, "chain has no head"),
            Self::MultipleHeads { heads } => write!(f, "chain has {} heads", heads.len()),
            Self::MultipleTails { tails } => write!(f, "chain has {} tails", tails.len()),
            Self::Cycle { at } => write!(f, "cycle detected at task {at}"),
            Self::Orphans { visited, total } => {
                write!(f, "walk visited {visited} of {total} tasks")
            }
            Self::DanglingPointer { from, to } => {
                write!(f, "task {from} points at missing task {to}")
            }
            Self::AsymmetricLink { from, to } => {
                write!(f, "link {from} -> {to} is not mirrored")
            }
            Self::SelfLink { task } => write!(f, "task {task} links to itself"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChainError {
    UnknownTask(TaskId),
    DuplicateTask(TaskId),
    /// `move_after(t, Some(t))`: a task cannot be anchored after itself.
    SelfAnchor(TaskId),
    Corrupted(ChainFault),
}

impl std::fmt::Display for ChainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownTask(task) => write!(f, "task {task} is not part of this chain"),
            Self::DuplicateTask(task) => write!(f, "task {task} is already chained"),
            Self::SelfAnchor(task) => write!(f, "task {task} cannot follow itself"),
            Self::Corrupted(fault) => write!(f, "chain corrupted: {fault}"),
        }
    }
}

impl std::error::Error for ChainError {}

impl From<ChainFault> for ChainError {
    fn from(value: ChainFault) -> Self {
        Self::Corrupted(value)
    }
}
