use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// Words of the theme that have not been used yet in this session.
/// Duplicate entries in the theme collapse to one.
pub fn available_words(theme_words: &[String], words_used: &BTreeSet<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    theme_words
        .iter()
        .filter(|word| !words_used.contains(*word) && seen.insert(word.as_str()))
        .cloned()
        .collect()
}

/// Uniform random permutation of the given words
pub fn draw_order<R: Rng + ?Sized>(mut words: Vec<String>, rng: &mut R) -> Vec<String> {
    words.shuffle(rng);
    words
}

/// Keep `order[..consumed]` in place and permute the rest
pub fn reshuffle_tail<R: Rng + ?Sized>(
    mut order: Vec<String>,
    consumed: usize,
    rng: &mut R,
) -> Vec<String> {
    let split = consumed.min(order.len());
    order[split..].shuffle(rng);
    order
}

/// The draw order of one round plus the cursor into it
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WordQueue {
    order: Vec<String>,
    cursor: usize,
}

impl WordQueue {
    pub fn shuffled<R: Rng + ?Sized>(available: Vec<String>, rng: &mut R) -> Self {
        Self {
            order: draw_order(available, rng),
            cursor: 0,
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.order.get(self.cursor).map(String::as_str)
    }

    /// Move to the next word. Returns false once the order is used up.
    pub fn advance(&mut self) -> bool {
        if self.cursor < self.order.len() {
            self.cursor += 1;
        }
        !self.is_exhausted()
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.order.len()
    }

    pub fn reshuffle_remaining<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let order = std::mem::take(&mut self.order);
        self.order = reshuffle_tail(order, self.cursor, rng);
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn order(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
