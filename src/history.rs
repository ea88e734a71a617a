//! Recently committed words, so backspace can reopen them.

use heapless::Deque;

use crate::buffers::DualBuffer;

pub const HISTORY_LEN: usize = 10;

/// Bounded ring of (transformed, raw) words; the oldest entry is dropped when full.
#[derive(Clone, Debug, Default)]
pub struct WordHistory {
    words: Deque<DualBuffer, HISTORY_LEN>,
}

impl WordHistory {
    pub const fn new() -> Self {
        Self {
            words: Deque::new(),
        }
    }

    pub fn push(&mut self, word: &DualBuffer) {
        if word.is_empty() {
            return;
        }
        if self.words.is_full() {
            self.words.pop_front();
        }
        let _ = self.words.push_back(word.clone());
    }

    pub fn pop(&mut self) -> Option<DualBuffer> {
        self.words.pop_back()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn clear(&mut self) {
        self.words.clear();
    }
}
