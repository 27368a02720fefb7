use crate::DieId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    Rolled {
        faces: Vec<u8>,
        dice: Vec<DieId>,
    },
    MeldTaken {
        faces: Vec<u8>,
        points: u32,
        bank: u32,
    },
    HotDice {
        dice: usize,
    },
    Banked {
        points: u32,
        total: u32,
    },
    Farkled {
        faces: Vec<u8>,
        lost: u32,
    },
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<Event>,
}

impl EventBus {
    pub fn push(&mut self, event: Event) {
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
