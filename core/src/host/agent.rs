//! Agent and equipment snapshots handed over by the host

use serde::{Deserialize, Serialize};

use kwyd_types::{ItemCategory, ItemType};

use super::{HeroId, TeamId};

/// Number of equipment slots on an agent's spawn equipment.
pub const EQUIPMENT_SLOT_COUNT: usize = 12;

/// Equipment slot, in host slot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentIndex {
    Weapon0,
    Weapon1,
    Weapon2,
    Weapon3,
    ExtraWeaponSlot,
    Head,
    Body,
    Leg,
    Gloves,
    Cape,
    Horse,
    HorseHarness,
}

impl EquipmentIndex {
    pub const ALL: [EquipmentIndex; EQUIPMENT_SLOT_COUNT] = [
        EquipmentIndex::Weapon0,
        EquipmentIndex::Weapon1,
        EquipmentIndex::Weapon2,
        EquipmentIndex::Weapon3,
        EquipmentIndex::ExtraWeaponSlot,
        EquipmentIndex::Head,
        EquipmentIndex::Body,
        EquipmentIndex::Leg,
        EquipmentIndex::Gloves,
        EquipmentIndex::Cape,
        EquipmentIndex::Horse,
        EquipmentIndex::HorseHarness,
    ];

    pub fn slot(self) -> usize {
        self as usize
    }
}

/// Catalog data for one item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemDescriptor {
    /// Catalog string id (e.g. `"imperial_sword_t2"`)
    pub id: String,
    pub name: String,
    /// Trade value in denars
    pub value: i32,
    pub tier: i32,
    pub item_type: ItemType,
    /// Item has a primary weapon component (swords, bows, but also shields)
    #[serde(default)]
    pub has_primary_weapon: bool,
    #[serde(default)]
    pub is_civilian: bool,
}

impl ItemDescriptor {
    pub fn category(&self) -> ItemCategory {
        ItemCategory::classify(self.item_type, self.has_primary_weapon)
    }
}

/// An item together with its modifier (e.g. "Rusty", "Masterwork").
///
/// This is what lands in the loot roster: the same catalog item with a
/// different modifier is a different roster element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EquippedItem {
    pub item: ItemDescriptor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifier: Option<String>,
}

impl EquippedItem {
    pub fn new(item: ItemDescriptor) -> Self {
        Self { item, modifier: None }
    }

    pub fn with_modifier(item: ItemDescriptor, modifier: impl Into<String>) -> Self {
        Self {
            item,
            modifier: Some(modifier.into()),
        }
    }

    /// Display name including the modifier, if any.
    pub fn display_name(&self) -> String {
        match &self.modifier {
            Some(modifier) => format!("{} {}", modifier, self.item.name),
            None => self.item.name.clone(),
        }
    }
}

/// Spawn equipment of an agent: one optional item per slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Equipment {
    slots: [Option<EquippedItem>; EQUIPMENT_SLOT_COUNT],
}

impl Equipment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put `item` into `index`, replacing whatever was there.
    pub fn with(mut self, index: EquipmentIndex, item: EquippedItem) -> Self {
        self.set(index, Some(item));
        self
    }

    pub fn set(&mut self, index: EquipmentIndex, item: Option<EquippedItem>) {
        self.slots[index.slot()] = item;
    }

    pub fn get(&self, index: EquipmentIndex) -> Option<&EquippedItem> {
        self.slots[index.slot()].as_ref()
    }

    /// Every slot in host order, empty ones included.
    pub fn slots(&self) -> impl Iterator<Item = (EquipmentIndex, Option<&EquippedItem>)> {
        EquipmentIndex::ALL
            .into_iter()
            .map(move |index| (index, self.get(index)))
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}

/// The host's view of one agent at the time of a callback.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentSnapshot {
    pub name: String,
    /// This agent is the player's own character
    pub is_main_agent: bool,
    /// Mounts are agents too; they are never looted as victims
    pub is_mount: bool,
    /// Set for named characters (the player included)
    pub hero: Option<HeroId>,
    /// Troop tier of the agent's character
    pub tier: i32,
    pub team: Option<TeamId>,
    /// The agent fights for the player's main party
    pub origin_is_main_party: bool,
    pub equipment: Option<Equipment>,
}

impl AgentSnapshot {
    pub fn is_hero(&self) -> bool {
        self.hero.is_some()
    }
}
