//! Mission behavior facade
//!
//! [`PersonalLoot`] is what a game integration holds on to. It receives the
//! host's callbacks (game started, mission behavior initialized, agent
//! removed, loot roster built, settings changed), reads the settings at the
//! point of use and drives the filters, the tracker and delivery.
//!
//! None of the callbacks return errors to the host. Anything that cannot be
//! resolved is a silent no-op, logged at debug level.

#[cfg(test)]
mod behavior_tests;

use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use kwyd_types::LootSettings;

use crate::config::SettingsProvider;
use crate::diagnostics::Diagnostics;
use crate::filters::{KillVerdict, is_eligible_kill};
use crate::host::{
    CasualtyReport, CombatEventId, Combatant, GameHost, ItemRoster, PartyId, RandomSource,
    ThreadRandom,
};
use crate::tracker::{DeliveryReport, LootTracker};

pub const LOADED_MESSAGE: &str = "Keep What You Deserve successfully loaded";

/// Host code path that builds the player's share of the loot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LootShareSite {
    /// Roster offered to the player on the loot screen
    PlayerLootShare,
    /// Roster handed to a party receiving a share of the loot
    ReceivingLootShare,
}

impl LootShareSite {
    pub fn label(&self) -> &'static str {
        match self {
            LootShareSite::PlayerLootShare => "ItemRosterForPlayerLootShare",
            LootShareSite::ReceivingLootShare => "GetItemRosterReceivingLootShare",
        }
    }
}

/// Personal loot engine bound to one campaign session.
pub struct PersonalLoot {
    tracker: LootTracker,
    settings: Rc<dyn SettingsProvider>,
    diagnostics: Diagnostics,
    rng: Box<dyn RandomSource>,
    /// Settings generation the diagnostics cache was last refreshed for
    seen_generation: u64,
    loaded_message_shown: bool,
}

impl std::fmt::Debug for PersonalLoot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersonalLoot")
            .field("tracker", &self.tracker)
            .field("diagnostics", &self.diagnostics)
            .field("seen_generation", &self.seen_generation)
            .field("loaded_message_shown", &self.loaded_message_shown)
            .finish_non_exhaustive()
    }
}

impl PersonalLoot {
    pub fn new(settings: Rc<dyn SettingsProvider>) -> Self {
        let seen_generation = settings.generation();
        Self {
            tracker: LootTracker::new(),
            settings,
            diagnostics: Diagnostics::silent(),
            rng: Box::new(ThreadRandom),
            seen_generation,
            loaded_message_shown: false,
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn with_random(mut self, rng: Box<dyn RandomSource>) -> Self {
        self.rng = rng;
        self
    }

    pub fn tracker(&self) -> &LootTracker {
        &self.tracker
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Current settings, sanitized.
    pub fn settings(&self) -> LootSettings {
        self.settings.resolve()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Host callbacks
    // ─────────────────────────────────────────────────────────────────────────

    /// Game started. Announces the mod once, on the first campaign.
    pub fn on_game_start(&mut self, is_campaign: bool) {
        if self.loaded_message_shown || !is_campaign {
            return;
        }
        self.diagnostics.info(self.settings.as_ref(), LOADED_MESSAGE);
        self.loaded_message_shown = true;
    }

    /// Mission behavior attached to a new mission.
    pub fn on_behavior_initialize(&mut self, host: &dyn GameHost) {
        self.refresh_diagnostics();
        let started = self.tracker.begin_or_resync(host.player_map_event());
        tracing::debug!(
            event = host.player_map_event().map(|e| e.0),
            started,
            "Mission behavior initialized"
        );
        self.diagnostics.debug(
            self.settings.as_ref(),
            "Mission behavior initialized; tracking started (if map event present).",
        );
    }

    /// An agent left the battle. Returns the number of items collected.
    pub fn on_agent_removed(&mut self, host: &dyn GameHost, report: &CasualtyReport) -> usize {
        self.observe_settings();
        let settings = self.settings.resolve();
        let current = host.player_map_event();
        self.tracker.begin_or_resync(current);

        // Unattributed removals (falls, despawns) are not knockouts
        if let (Some(victim), Some(_)) = (&report.victim, &report.killer)
            && report.state.is_casualty()
        {
            if victim.is_main_agent {
                self.tracker.record_knockout(Combatant::Player);
            } else if let Some(hero) = victim.hero {
                self.tracker.record_knockout(Combatant::Hero(hero));
            }
        }

        let verdict = is_eligible_kill(
            report.victim.as_ref(),
            report.killer.as_ref(),
            report.state,
            &settings,
            host,
        );

        let (killer, is_player_kill) = match verdict {
            KillVerdict::Eligible {
                killer,
                is_player_kill,
            } => (killer, is_player_kill),
            KillVerdict::Rejected(reason) => {
                tracing::debug!(?reason, blow = ?report.blow, "Casualty not counted");
                self.diagnostics.debug(
                    self.settings.as_ref(),
                    &format!("Skipping kill: {}.", reason.describe()),
                );
                return 0;
            }
        };

        let Some(victim) = &report.victim else {
            return 0;
        };
        let added = self
            .tracker
            .record_kill(current, victim, Some(killer), is_player_kill, &settings);
        tracing::debug!(
            victim = %victim.name,
            ?killer,
            damage = report.blow.map(|b| b.inflicted_damage),
            missile = report.blow.map(|b| b.is_missile),
            added,
            "Kill counted"
        );

        self.diagnostics.info(
            self.settings.as_ref(),
            &format!(
                "Recorded kill on {}; collected {added} equipped items.",
                victim.name
            ),
        );
        added
    }

    /// The host built a loot roster for `party` in `event`.
    ///
    /// Only the player's main party receives personal loot. A panic while
    /// merging is contained so the loot screen still opens.
    pub fn on_loot_roster(
        &mut self,
        host: &dyn GameHost,
        site: LootShareSite,
        event: Option<CombatEventId>,
        party: Option<PartyId>,
        roster: Option<&mut dyn ItemRoster>,
    ) -> DeliveryReport {
        self.observe_settings();
        tracing::debug!(site = site.label(), "Loot roster hook entered");

        let (Some(party), Some(roster)) = (party, roster) else {
            tracing::debug!(site = site.label(), "Party or roster missing");
            return DeliveryReport::default();
        };

        if !host.is_main_party(party) {
            tracing::debug!(
                site = site.label(),
                party = party.0,
                "Not the main party, skipping"
            );
            return DeliveryReport::default();
        }

        let settings = self.settings.resolve();
        let tracker = &mut self.tracker;
        let rng = self.rng.as_mut();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            tracker.deliver_to_roster(event, roster, &settings, rng)
        }));

        match outcome {
            Ok(report) => {
                if report.delivered > 0 {
                    self.diagnostics.info(
                        self.settings.as_ref(),
                        &format!(
                            "Added {} personal items to the loot of {}.",
                            report.delivered,
                            site.label()
                        ),
                    );
                }
                report
            }
            Err(_) => {
                tracing::error!(
                    site = site.label(),
                    "Personal loot delivery panicked, roster left as is"
                );
                DeliveryReport::default()
            }
        }
    }

    /// The settings were edited. Re-reads the cached logging flag.
    pub fn on_settings_changed(&mut self) {
        self.refresh_diagnostics();
        tracing::debug!(generation = self.seen_generation, "Settings changed");
    }

    fn refresh_diagnostics(&mut self) {
        self.diagnostics.refresh(self.settings.as_ref());
        self.seen_generation = self.settings.generation();
    }

    /// Refresh the logging cache if the provider reports new settings.
    fn observe_settings(&mut self) {
        if self.settings.generation() != self.seen_generation {
            self.on_settings_changed();
        }
    }
}
