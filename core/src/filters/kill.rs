//! Kill eligibility
//!
//! Decides whether a casualty reported by the host is a personal-loot-worthy
//! kill for the player's side. Pure: reads the host and the settings, never
//! mutates anything.

use kwyd_types::{AgentState, LootSettings};

use crate::host::{AgentSnapshot, Combatant, GameHost};

/// Why a casualty was not counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KillRejection {
    /// Victim or killer could not be resolved
    MissingAgent,
    /// The agent was removed without being killed or knocked out
    NotACasualty,
    /// Killer is neither the player nor a counted companion
    KillerNotOnPlayerSide,
    /// The player is knocked out and loot-on-KO is disabled
    PlayerKnockedOut,
    /// Victim is on the killer's side and friendly kills are not counted
    FriendlyTarget,
    /// Victim is a noble and noble kills are not counted
    NobleTarget,
    /// Not a campaign battle of the player's party
    NoCampaignEvent,
}

impl KillRejection {
    pub fn describe(&self) -> &'static str {
        match self {
            KillRejection::MissingAgent => "victim or killer missing",
            KillRejection::NotACasualty => "agent was not killed or knocked out",
            KillRejection::KillerNotOnPlayerSide => {
                "killer is not the player or a counted companion"
            }
            KillRejection::PlayerKnockedOut => {
                "player is knocked out and 'Loot when hero knocked out' is disabled"
            }
            KillRejection::FriendlyTarget => {
                "friendly target and 'Count friendly fire' is disabled"
            }
            KillRejection::NobleTarget => {
                "noble target and 'Count nobles/lords killed' is disabled"
            }
            KillRejection::NoCampaignEvent => "no campaign battle active for the player's party",
        }
    }
}

/// Outcome of the kill eligibility check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KillVerdict {
    Eligible {
        /// Who gets the credit
        killer: Combatant,
        is_player_kill: bool,
    },
    Rejected(KillRejection),
}

impl KillVerdict {
    pub fn is_eligible(&self) -> bool {
        matches!(self, KillVerdict::Eligible { .. })
    }
}

/// Check whether a casualty counts as a personal-loot kill.
///
/// Rules run in order and the first failing one rejects:
/// 1. victim and killer present
/// 2. victim killed or knocked out
/// 3. killer is the player, or a hero of the player's party when companions count
/// 4. player not knocked out (unless loot-on-KO is enabled)
/// 5. hostile victim (unless friendly fire counts)
/// 6. non-noble victim (unless nobles count)
/// 7. campaign battle of the player's party
pub fn is_eligible_kill(
    victim: Option<&AgentSnapshot>,
    killer: Option<&AgentSnapshot>,
    state: AgentState,
    settings: &LootSettings,
    host: &dyn GameHost,
) -> KillVerdict {
    let (Some(victim), Some(killer)) = (victim, killer) else {
        return KillVerdict::Rejected(KillRejection::MissingAgent);
    };

    if !state.is_casualty() {
        return KillVerdict::Rejected(KillRejection::NotACasualty);
    }

    let Some(credited) = credited_killer(killer, settings) else {
        return KillVerdict::Rejected(KillRejection::KillerNotOnPlayerSide);
    };

    if host.is_player_knocked_out() && !settings.loot_when_player_ko {
        return KillVerdict::Rejected(KillRejection::PlayerKnockedOut);
    }

    if !host.is_enemy(victim, killer) && !settings.count_friendlies {
        return KillVerdict::Rejected(KillRejection::FriendlyTarget);
    }

    if victim.is_hero() && !settings.count_nobles {
        return KillVerdict::Rejected(KillRejection::NobleTarget);
    }

    if !host.is_campaign() || host.player_map_event().is_none() {
        return KillVerdict::Rejected(KillRejection::NoCampaignEvent);
    }

    KillVerdict::Eligible {
        killer: credited,
        is_player_kill: credited.is_player(),
    }
}

/// The player's own agent, or a hero fighting for the player's main party
/// when companion kills count.
fn credited_killer(killer: &AgentSnapshot, settings: &LootSettings) -> Option<Combatant> {
    if killer.is_main_agent {
        return Some(Combatant::Player);
    }
    if !settings.count_companions || !killer.origin_is_main_party {
        return None;
    }
    killer.hero.map(Combatant::Hero)
}
