//! Victim class filter (regulars, elites, heroes)

use kwyd_types::LootSettings;

use crate::host::AgentSnapshot;

/// Victim class for the victim filter settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VictimClass {
    Hero,
    /// Non-hero troop at or above the elite tier threshold
    Elite,
    Regular,
}

impl VictimClass {
    pub fn of(victim: &AgentSnapshot, settings: &LootSettings) -> Self {
        if victim.is_hero() {
            VictimClass::Hero
        } else if victim.tier >= settings.elite_tier_threshold {
            VictimClass::Elite
        } else {
            VictimClass::Regular
        }
    }

    pub fn is_included(&self, settings: &LootSettings) -> bool {
        match self {
            VictimClass::Hero => settings.include_heroes,
            VictimClass::Elite => settings.include_elites,
            VictimClass::Regular => settings.include_regulars,
        }
    }
}

/// Whether the victim's gear may be collected at all. Mounts never are.
pub fn is_lootable_victim(victim: &AgentSnapshot, settings: &LootSettings) -> bool {
    !victim.is_mount && VictimClass::of(victim, settings).is_included(settings)
}
