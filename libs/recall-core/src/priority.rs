//! Deck prioritization by mean easiness factor.
//!
//! Decks are inserted into an unbalanced binary search tree keyed on their
//! mean ease; an in-order walk gives the hardest deck first. Equal keys go to
//! the right subtree, so ties come out in insertion order. Insert, walk and
//! drop are all iterative so large deck counts cannot exhaust the stack.

use serde::{Deserialize, Serialize};

use crate::types::{DeckId, MINIMUM_EASE};

/// Upper end of the ease range used for performance scoring.
pub const SCORE_CEILING_EASE: f64 = 3.5;

/// Raw per-deck ease totals, as read from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct DeckEase {
    pub deck_id: DeckId,
    pub name: String,
    pub card_count: usize,
    /// Sum of ease over the deck's cards, with unseen cards counted at the default.
    pub ef_sum: f64,
}

impl DeckEase {
    /// Mean ease, or 0 for a deck without cards.
    pub fn avg_ef(&self) -> f64 {
        if self.card_count == 0 {
            0.0
        } else {
            self.ef_sum / self.card_count as f64
        }
    }
}

/// One entry of the priority listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckPriority {
    pub deck_id: DeckId,
    pub name: String,
    pub avg_ef: f64,
    pub card_count: usize,
}

impl From<&DeckEase> for DeckPriority {
    fn from(ease: &DeckEase) -> Self {
        Self {
            deck_id: ease.deck_id,
            name: ease.name.clone(),
            avg_ef: ease.avg_ef(),
            card_count: ease.card_count,
        }
    }
}

/// Coarse urgency classes used by the dashboard filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityBand {
    High,
    Medium,
    Low,
}

impl PriorityBand {
    pub fn from_avg_ef(avg_ef: f64) -> Self {
        if avg_ef < 2.0 {
            Self::High
        } else if avg_ef < 2.5 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn contains(self, avg_ef: f64) -> bool {
        Self::from_avg_ef(avg_ef) == self
    }
}

#[derive(Debug)]
struct Node {
    item: DeckPriority,
    left: Option<Box<Node>>,
    right: Option<Box<Node>>,
}

/// Ephemeral BST ordering decks by ascending mean ease.
#[derive(Debug, Default)]
pub struct DeckPriorityTree {
    root: Option<Box<Node>>,
    len: usize,
}

impl DeckPriorityTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn insert(&mut self, item: DeckPriority) {
        let mut slot = &mut self.root;
        while let Some(node) = slot {
            slot = if item.avg_ef < node.item.avg_ef {
                &mut node.left
            } else {
                &mut node.right
            };
        }
        *slot = Some(Box::new(Node {
            item,
            left: None,
            right: None,
        }));
        self.len += 1;
    }

    /// In-order walk, lowest mean ease first.
    pub fn in_order(&self) -> Vec<&DeckPriority> {
        let mut out = Vec::with_capacity(self.len);
        let mut stack: Vec<&Node> = Vec::new();
        let mut current = self.root.as_deref();
        loop {
            while let Some(node) = current {
                stack.push(node);
                current = node.left.as_deref();
            }
            match stack.pop() {
                Some(node) => {
                    out.push(&node.item);
                    current = node.right.as_deref();
                }
                None => break,
            }
        }
        out
    }
}

impl FromIterator<DeckPriority> for DeckPriorityTree {
    fn from_iter<I: IntoIterator<Item = DeckPriority>>(iter: I) -> Self {
        let mut tree = Self::new();
        for item in iter {
            tree.insert(item);
        }
        tree
    }
}

impl Drop for DeckPriorityTree {
    fn drop(&mut self) {
        let mut stack: Vec<Box<Node>> = self.root.take().into_iter().collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.left.take());
            stack.extend(node.right.take());
        }
    }
}

/// Rank decks hardest first.
pub fn prioritize(decks: &[DeckEase]) -> Vec<DeckPriority> {
    let tree: DeckPriorityTree = decks.iter().map(DeckPriority::from).collect();
    tree.in_order().into_iter().cloned().collect()
}

/// Map a deck's mean ease onto 0..=100. Empty decks (mean 0) score 0.
pub fn performance_score(avg_ef: f64) -> f64 {
    if avg_ef <= 0.0 || !avg_ef.is_finite() {
        return 0.0;
    }
    let score = (avg_ef - MINIMUM_EASE) / (SCORE_CEILING_EASE - MINIMUM_EASE) * 100.0;
    score.clamp(0.0, 100.0)
}
