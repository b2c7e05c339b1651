//! Item rosters receiving personal loot

use hashbrown::HashMap;

use super::EquippedItem;

/// Mutable item-count roster owned by the host.
pub trait ItemRoster {
    /// Remove every element.
    fn clear(&mut self);

    /// Add `count` copies of `item`, creating the element if needed.
    fn add_to_counts(&mut self, item: &EquippedItem, count: i32);

    /// Number of distinct elements.
    fn entry_count(&self) -> usize;
}

/// One roster element: an item and how many copies are offered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterElement {
    pub item: EquippedItem,
    pub amount: i32,
}

/// In-memory roster keeping insertion order.
///
/// Used by the replay CLI and the tests; a game integration adapts the
/// host's own roster type to [`ItemRoster`] instead.
#[derive(Debug, Clone, Default)]
pub struct LootRoster {
    elements: Vec<RosterElement>,
    index: HashMap<EquippedItem, usize>,
}

impl LootRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elements(&self) -> &[RosterElement] {
        &self.elements
    }

    /// Copies of `item` in the roster (0 if absent).
    pub fn amount_of(&self, item: &EquippedItem) -> i32 {
        self.index
            .get(item)
            .map_or(0, |&idx| self.elements[idx].amount)
    }

    /// Sum of all element amounts.
    pub fn total_amount(&self) -> i32 {
        self.elements.iter().map(|e| e.amount).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl ItemRoster for LootRoster {
    fn clear(&mut self) {
        self.elements.clear();
        self.index.clear();
    }

    fn add_to_counts(&mut self, item: &EquippedItem, count: i32) {
        if count == 0 {
            return;
        }
        match self.index.get(item) {
            Some(&idx) => {
                self.elements[idx].amount += count;
            }
            None => {
                self.index.insert(item.clone(), self.elements.len());
                self.elements.push(RosterElement {
                    item: item.clone(),
                    amount: count,
                });
            }
        }
    }

    fn entry_count(&self) -> usize {
        self.elements.len()
    }
}
