//! Pending direction changes, one slot per snake
//!
//! Input sources write through an [`InboxSender`] from any thread or task.
//! The engine owns the [`Inbox`] and drains a snake's slot right before that
//! snake moves, so a tick never sees a half-applied turn. A slot holds only
//! the latest request; posting again overwrites it.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use super::direction::Direction;

const EMPTY: u8 = u8::MAX;

#[derive(Debug)]
struct Slots {
    pending: Box<[AtomicU8]>,
    closed: AtomicBool,
}

/// Engine side of the inbox
#[derive(Debug)]
pub struct Inbox {
    slots: Arc<Slots>,
}

/// Cloneable write handle for input listeners
#[derive(Debug, Clone)]
pub struct InboxSender {
    slots: Arc<Slots>,
}

impl Inbox {
    pub fn new(snakes: usize) -> Self {
        let pending = (0..snakes).map(|_| AtomicU8::new(EMPTY)).collect();
        Self {
            slots: Arc::new(Slots {
                pending,
                closed: AtomicBool::new(false),
            }),
        }
    }

    pub fn sender(&self) -> InboxSender {
        InboxSender {
            slots: Arc::clone(&self.slots),
        }
    }

    /// Take the pending request for `snake`, leaving the slot empty
    pub fn take(&self, snake: usize) -> Option<Direction> {
        let raw = self.slots.pending.get(snake)?.swap(EMPTY, Ordering::AcqRel);
        Direction::try_from(raw).ok()
    }

    /// Reject all further posts
    pub fn close(&self) {
        self.slots.closed.store(true, Ordering::Release);
        for slot in self.slots.pending.iter() {
            slot.store(EMPTY, Ordering::Release);
        }
    }
}

impl InboxSender {
    /// Overwrite the pending request for `snake`
    ///
    /// Returns false, without effect, when the index is out of range or the
    /// game is over.
    pub fn post(&self, snake: usize, direction: Direction) -> bool {
        if self.is_closed() {
            return false;
        }
        match self.slots.pending.get(snake) {
            Some(slot) => {
                slot.store(direction as u8, Ordering::Release);
                true
            }
            None => false,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.slots.closed.load(Ordering::Acquire)
    }

    /// Number of slots
    pub fn len(&self) -> usize {
        self.slots.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.pending.is_empty()
    }
}
