//! Host game interfaces
//!
//! The loot engine never talks to the game directly. Everything it needs
//! from the host (the current battle, agents, teams, the loot roster,
//! randomness) comes in through the types and traits in this module, so a
//! game integration, the replay CLI and the tests all drive the same code.

mod agent;
mod random;
mod roster;

pub use agent::{
    AgentSnapshot, EQUIPMENT_SLOT_COUNT, Equipment, EquipmentIndex, EquippedItem, ItemDescriptor,
};
pub use random::{FixedSequence, RandomSource, SeededRandom, ThreadRandom};
pub use roster::{ItemRoster, LootRoster, RosterElement};

use kwyd_types::AgentState;

/// Identity of one combat event (a battle on the campaign map).
///
/// Issued by the host. Two ids are the same event exactly when they compare
/// equal; the engine attaches no other meaning to the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CombatEventId(pub u64);

/// Identity of a named character (hero).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HeroId(pub u64);

/// Identity of a battle team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TeamId(pub u32);

/// Identity of a party on the campaign map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PartyId(pub u64);

/// A member of the player's side that can be credited with a kill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combatant {
    Player,
    Hero(HeroId),
}

impl Combatant {
    pub fn is_player(&self) -> bool {
        matches!(self, Combatant::Player)
    }
}

/// Optional metadata about the blow that removed an agent.
///
/// No eligibility rule reads it; it is only traced with the kill decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KillingBlow {
    pub inflicted_damage: i32,
    pub is_missile: bool,
}

/// One agent-removed callback from the host.
///
/// Victim and killer are optional because the host routinely reports
/// removals without an affector (falls, despawns, routing).
#[derive(Debug, Clone, Default)]
pub struct CasualtyReport {
    pub victim: Option<AgentSnapshot>,
    pub killer: Option<AgentSnapshot>,
    pub state: AgentState,
    pub blow: Option<KillingBlow>,
}

/// Read access to the host's campaign and battle state.
pub trait GameHost {
    /// Whether the running game is a campaign (not custom battle, not multiplayer).
    fn is_campaign(&self) -> bool;

    /// The combat event the player's main party is currently engaged in.
    fn player_map_event(&self) -> Option<CombatEventId>;

    /// Whether the player's own agent is currently knocked unconscious.
    fn is_player_knocked_out(&self) -> bool;

    /// Whether two battle teams are enemies of each other.
    fn are_hostile(&self, a: TeamId, b: TeamId) -> bool;

    /// Whether `party` is the player's main party.
    fn is_main_party(&self, party: PartyId) -> bool;

    /// Victim and killer are enemies. An agent without a team is never hostile.
    fn is_enemy(&self, victim: &AgentSnapshot, killer: &AgentSnapshot) -> bool {
        match (victim.team, killer.team) {
            (Some(a), Some(b)) => self.are_hostile(a, b),
            _ => false,
        }
    }
}
