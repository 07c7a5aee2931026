#![forbid(unsafe_code)]

use super::{ChainError, ChainFault, ChainLinks, ChainWalk, LinkChange};
use crate::ids::TaskId;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskChain {
    links: BTreeMap<TaskId, ChainLinks>,
}

impl TaskChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a chain from stored rows as-is. The result may be corrupt; call
    /// [`TaskChain::verify`] before trusting it.
    pub fn from_links(rows: impl IntoIterator<Item = (TaskId, ChainLinks)>) -> Self {
        Self {
            links: rows.into_iter().collect(),
        }
    }

    /// Builds a well-formed chain visiting `order` front to back.
    pub fn from_order(order: &[TaskId]) -> Result<Self, ChainError> {
        let mut seen = BTreeSet::new();
        for task in order {
            if !seen.insert(*task) {
                return Err(ChainError::DuplicateTask(*task));
            }
        }
        Ok(Self::link_sequence(order))
    }

    fn link_sequence(order: &[TaskId]) -> Self {
        let mut links = BTreeMap::new();
        for (index, task) in order.iter().enumerate() {
            let prev = index.checked_sub(1).map(|i| order[i]);
            let next = order.get(index + 1).copied();
            links.insert(*task, ChainLinks::new(prev, next));
        }
        Self { links }
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn contains(&self, task: TaskId) -> bool {
        self.links.contains_key(&task)
    }

    pub fn links(&self, task: TaskId) -> Option<ChainLinks> {
        self.links.get(&task).copied()
    }

    pub fn iter_links(&self) -> impl Iterator<Item = (TaskId, ChainLinks)> + '_ {
        self.links.iter().map(|(task, links)| (*task, *links))
    }

    pub fn head(&self) -> Result<Option<TaskId>, ChainFault> {
        let heads: Vec<TaskId> = self
            .links
            .iter()
            .filter(|(_, links)| links.prev.is_none())
            .map(|(task, _)| *task)
            .collect();
        match heads.len() {
            0 if self.links.is_empty() => Ok(None),
            0 => Err(ChainFault::NoHead),
            1 => Ok(Some(heads[0])),
            _ => Err(ChainFault::MultipleHeads { heads }),
        }
    }

    pub fn tail(&self) -> Option<TaskId> {
        self.links
            .iter()
            .find(|(_, links)| links.next.is_none())
            .map(|(task, _)| *task)
    }

    pub fn walk(&self) -> ChainWalk<'_> {
        ChainWalk::new(self)
    }

    /// Head-to-tail order, or the first fault met on the way.
    pub fn ordered(&self) -> Result<Vec<TaskId>, ChainFault> {
        self.walk().collect()
    }

    pub fn verify(&self) -> Result<(), ChainFault> {
        self.check_pointers()?;
        self.head()?;
        let tails: Vec<TaskId> = self
            .links
            .iter()
            .filter(|(_, links)| links.next.is_none())
            .map(|(task, _)| *task)
            .collect();
        if tails.len() > 1 {
            return Err(ChainFault::MultipleTails { tails });
        }
        for step in self.walk() {
            step?;
        }
        Ok(())
    }

    fn check_pointers(&self) -> Result<(), ChainFault> {
        for (task, links) in &self.links {
            let task = *task;
            if links.prev == Some(task) || links.next == Some(task) {
                return Err(ChainFault::SelfLink { task });
            }
            if let Some(prev) = links.prev {
                match self.links.get(&prev) {
                    None => return Err(ChainFault::DanglingPointer { from: task, to: prev }),
                    Some(other) if other.next != Some(task) => {
                        return Err(ChainFault::AsymmetricLink { from: prev, to: task });
                    }
                    Some(_) => {}
                }
            }
            if let Some(next) = links.next {
                match self.links.get(&next) {
                    None => return Err(ChainFault::DanglingPointer { from: task, to: next }),
                    Some(other) if other.prev != Some(task) => {
                        return Err(ChainFault::AsymmetricLink { from: task, to: next });
                    }
                    Some(_) => {}
                }
            }
        }
        Ok(())
    }

    pub fn insert_after(&mut self, after: Option<TaskId>, task: TaskId) -> Result<(), ChainError> {
        if self.contains(task) {
            return Err(ChainError::DuplicateTask(task));
        }
        if let Some(anchor) = after {
            if !self.contains(anchor) {
                return Err(ChainError::UnknownTask(anchor));
            }
        }
        self.verify()?;
        self.attach(after, task);
        Ok(())
    }

    pub fn remove(&mut self, task: TaskId) -> Result<ChainLinks, ChainError> {
        if !self.contains(task) {
            return Err(ChainError::UnknownTask(task));
        }
        self.verify()?;
        Ok(self.detach(task))
    }

    /// Moves `task` right after `after` (or to the head). Returns `false` when the task
    /// already sits there.
    pub fn move_after(&mut self, task: TaskId, after: Option<TaskId>) -> Result<bool, ChainError> {
        if after == Some(task) {
            return Err(ChainError::SelfAnchor(task));
        }
        let Some(current) = self.links(task) else {
            return Err(ChainError::UnknownTask(task));
        };
        if let Some(anchor) = after {
            if !self.contains(anchor) {
                return Err(ChainError::UnknownTask(anchor));
            }
        }
        self.verify()?;
        if current.prev == after {
            return Ok(false);
        }
        self.detach(task);
        self.attach(after, task);
        Ok(true)
    }

    // Callers guarantee: chain verified, `task` absent, `after` present.
    fn attach(&mut self, after: Option<TaskId>, task: TaskId) {
        let next = match after {
            None => self.head().ok().flatten(),
            Some(anchor) => self.links.get(&anchor).and_then(|links| links.next),
        };
        if let Some(anchor) = after {
            if let Some(links) = self.links.get_mut(&anchor) {
                links.next = Some(task);
            }
        }
        if let Some(next) = next {
            if let Some(links) = self.links.get_mut(&next) {
                links.prev = Some(task);
            }
        }
        self.links.insert(task, ChainLinks::new(after, next));
    }

    // Callers guarantee: chain verified, `task` present.
    fn detach(&mut self, task: TaskId) -> ChainLinks {
        let links = self.links.remove(&task).unwrap_or_default();
        if let Some(prev) = links.prev {
            if let Some(prev_links) = self.links.get_mut(&prev) {
                prev_links.next = links.next;
            }
        }
        if let Some(next) = links.next {
            if let Some(next_links) = self.links.get_mut(&next) {
                next_links.prev = links.prev;
            }
        }
        links
    }

    /// Tasks whose links are new or different compared to `before`.
    pub fn changes_since(&self, before: &TaskChain) -> Vec<LinkChange> {
        self.links
            .iter()
            .filter_map(|(task, after)| {
                let previous = before.links(*task);
                (previous != Some(*after)).then_some(LinkChange {
                    task: *task,
                    before: previous,
                    after: *after,
                })
            })
            .collect()
    }

    /// Maximal head-first runs of the chain. A well-formed chain has exactly one.
    pub fn fragments(&self) -> Result<Vec<Vec<TaskId>>, ChainFault> {
        self.check_pointers()?;
        let total = self.links.len();
        let mut covered = BTreeSet::new();
        let mut out = Vec::new();

        for (head, links) in &self.links {
            if links.prev.is_some() {
                continue;
            }
            let mut fragment = Vec::new();
            let mut cursor = Some(*head);
            while let Some(task) = cursor {
                if fragment.len() >= total {
                    return Err(ChainFault::Cycle { at: task });
                }
                fragment.push(task);
                covered.insert(task);
                cursor = self.links.get(&task).and_then(|links| links.next);
            }
            out.push(fragment);
        }

        if let Some(stray) = self.links.keys().find(|task| !covered.contains(task)) {
            return Err(ChainFault::Cycle { at: *stray });
        }
        Ok(out)
    }

    /// Rejoins broken fragments into one chain, ordering fragments by `key(head)`.
    pub fn repaired_by<K: Ord>(&self, key: impl Fn(TaskId) -> K) -> Result<TaskChain, ChainFault> {
        let mut fragments = self.fragments()?;
        fragments.sort_by_key(|fragment| key(fragment[0]));
        let order: Vec<TaskId> = fragments.into_iter().flatten().collect();
        Ok(Self::link_sequence(&order))
    }
}
