use crate::models::GameStatus;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Most-recent-first ring of earlier statuses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusHistory {
    entries: VecDeque<GameStatus>,
    cap: usize,
}

impl StatusHistory {
    pub fn new(cap: usize) -> Self {
        Self { entries: VecDeque::with_capacity(cap), cap: cap.max(1) }
    }

    /// Remember `status`, dropping the oldest entry when full
    pub fn push(&mut self, status: GameStatus) {
        self.entries.push_front(status);
        self.entries.truncate(self.cap);
    }

    /// `0` is the status right before the latest transition
    pub fn get(&self, index: usize) -> Option<&GameStatus> {
        self.entries.get(index)
    }

    /// Take the entry at `index`, discarding it and everything newer
    pub fn restore(&mut self, index: usize) -> Option<GameStatus> {
        if index >= self.entries.len() {
            return None;
        }
        self.entries.drain(..index);
        self.entries.pop_front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cap(&self) -> usize {
        self.cap
    }
}
