#![forbid(unsafe_code)]

use super::{ChainFault, TaskChain};
use crate::ids::TaskId;

/// Lazy head-to-tail traversal of a [`TaskChain`].
///
/// The walk is bounded by the chain length: stepping past it yields `ChainFault::Cycle`,
/// reaching the tail early yields `ChainFault::Orphans`. After the first fault the walk is
/// exhausted. Call [`TaskChain::walk`] again to restart from the head.
#[derive(Clone, Debug)]
pub struct ChainWalk<'a> {
    chain: &'a TaskChain,
    state: WalkState,
    last: Option<TaskId>,
    visited: usize,
}

#[derive(Clone, Copy, Debug)]
enum WalkState {
    Start,
    At(Option<TaskId>),
    Done,
}

impl<'a> ChainWalk<'a> {
    pub(super) fn new(chain: &'a TaskChain) -> Self {
        Self {
            chain,
            state: WalkState::Start,
            last: None,
            visited: 0,
        }
    }

    pub fn visited(&self) -> usize {
        self.visited
    }

    fn fail(&mut self, fault: ChainFault) -> Option<Result<TaskId, ChainFault>> {
        self.state = WalkState::Done;
        Some(Err(fault))
    }
}

impl Iterator for ChainWalk<'_> {
    type Item = Result<TaskId, ChainFault>;

    fn next(&mut self) -> Option<Self::Item> {
        let cursor = match self.state {
            WalkState::Done => return None,
            WalkState::Start => match self.chain.head() {
                Ok(head) => head,
                Err(fault) => return self.fail(fault),
            },
            WalkState::At(cursor) => cursor,
        };

        let total = self.chain.len();
        let Some(task) = cursor else {
            self.state = WalkState::Done;
            if self.visited < total {
                return Some(Err(ChainFault::Orphans {
                    visited: self.visited,
                    total,
                }));
            }
            return None;
        };

        if self.visited >= total {
            return self.fail(ChainFault::Cycle { at: task });
        }

        let Some(links) = self.chain.links(task) else {
            let from = self.last.unwrap_or(task);
            return self.fail(ChainFault::DanglingPointer { from, to: task });
        };

        self.visited += 1;
        self.last = Some(task);
        self.state = WalkState::At(links.next);
        Some(Ok(task))
    }
}
