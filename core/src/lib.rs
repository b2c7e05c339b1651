//! Personal loot engine
//!
//! Tracks which enemies the player (and optionally companions) personally
//! defeated in a campaign battle, collects their eligible gear, and hands it
//! out once through the battle's loot roster.

pub mod behavior;
pub mod config;
pub mod diagnostics;
pub mod filters;
pub mod host;
pub mod tracker;

#[cfg(test)]
mod test_support;

// Re-exports for convenience
pub use behavior::{LOADED_MESSAGE, LootShareSite, PersonalLoot};
pub use config::{ConfigError, LootSettingsExt, SettingsProvider, SharedSettings};
pub use diagnostics::{Diagnostics, MessageSink, SinkError};
pub use filters::{KillRejection, KillVerdict, is_eligible_item, is_eligible_kill};
pub use host::{
    AgentSnapshot, CasualtyReport, CombatEventId, Combatant, Equipment, EquipmentIndex,
    EquippedItem, GameHost, HeroId, ItemDescriptor, ItemRoster, KillingBlow, LootRoster, PartyId,
    RandomSource, RosterElement, SeededRandom, TeamId, ThreadRandom,
};
pub use kwyd_types::{AgentState, ItemCategory, ItemType, LootSettings};
pub use tracker::{DeliveryReport, LootEntry, LootTracker, TrackerPhase};
