//! Battle replay
//!
//! Drives a [`PersonalLoot`] engine through the callbacks of a battle
//! script, with a scripted host standing in for the game.

use std::cell::RefCell;
use std::rc::Rc;

use kwyd_core::{
    AgentSnapshot, CasualtyReport, CombatEventId, DeliveryReport, Diagnostics, GameHost,
    ItemRoster, LootRoster, LootShareSite, MessageSink, PartyId, PersonalLoot, RandomSource,
    RosterElement, SeededRandom, SettingsProvider, SharedSettings, SinkError, TeamId,
    ThreadRandom,
};
use kwyd_types::{AgentState, LootSettings};

use crate::error::ScriptError;
use crate::script::{BattleScript, EventSpec, Step, apply_overrides};

pub const MAIN_PARTY: PartyId = PartyId(0);

/// Host state for one scripted combat event.
#[derive(Debug, Clone)]
pub struct ScriptedHost {
    pub campaign: bool,
    pub event: Option<CombatEventId>,
    pub player_knocked_out: bool,
}

impl ScriptedHost {
    pub fn for_event(event: &EventSpec) -> Self {
        Self {
            campaign: event.campaign,
            event: Some(CombatEventId(event.id)),
            player_knocked_out: false,
        }
    }
}

impl GameHost for ScriptedHost {
    fn is_campaign(&self) -> bool {
        self.campaign
    }

    fn player_map_event(&self) -> Option<CombatEventId> {
        self.event
    }

    fn is_player_knocked_out(&self) -> bool {
        self.player_knocked_out
    }

    /// Any two different teams are enemies.
    fn are_hostile(&self, a: TeamId, b: TeamId) -> bool {
        a != b
    }

    fn is_main_party(&self, party: PartyId) -> bool {
        party == MAIN_PARTY
    }
}

/// Collects in-game messages instead of displaying them.
struct MessageLog {
    lines: Rc<RefCell<Vec<String>>>,
}

impl MessageSink for MessageLog {
    fn display(&self, message: &str) -> Result<(), SinkError> {
        self.lines
            .try_borrow_mut()
            .map_err(|_| SinkError::new("message log busy"))?
            .push(message.to_string());
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReplayOptions {
    /// Settings the script overrides are merged over
    pub base_settings: LootSettings,
    /// Seed for drop chance rolls; thread RNG when absent
    pub seed: Option<u64>,
    /// Also collect debug-level in-game messages
    pub show_debug: bool,
}

/// One agent-removed callback and what it collected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KillOutcome {
    pub event: u64,
    pub victim: String,
    pub killer: Option<String>,
    pub state: AgentState,
    pub collected: usize,
}

/// One roster hook and the roster it left behind.
#[derive(Debug, Clone)]
pub struct LootOutcome {
    pub event: u64,
    pub site: LootShareSite,
    pub party: PartyId,
    pub report: DeliveryReport,
    pub roster: Vec<RosterElement>,
}

impl LootOutcome {
    /// Copies of the item with catalog id `id` in the roster.
    pub fn amount_of(&self, id: &str) -> i32 {
        self.roster
            .iter()
            .filter(|e| e.item.item.id == id)
            .map(|e| e.amount)
            .sum()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReplayOutcome {
    pub settings: LootSettings,
    pub kills: Vec<KillOutcome>,
    pub loots: Vec<LootOutcome>,
    /// In-game messages, prefixed
    pub messages: Vec<String>,
}

/// Replay every event of `script`, in order.
pub fn replay(
    script: &BattleScript,
    options: &ReplayOptions,
) -> Result<ReplayOutcome, ScriptError> {
    let settings = match &script.settings {
        Some(overrides) => apply_overrides(options.base_settings, overrides)?,
        None => options.base_settings.sanitized(),
    };
    let shared = Rc::new(SharedSettings::new(settings));

    let lines = Rc::new(RefCell::new(Vec::new()));
    let diagnostics = Diagnostics::new(Box::new(MessageLog {
        lines: Rc::clone(&lines),
    }))
    .with_debug_messages(options.show_debug);

    let rng: Box<dyn RandomSource> = match options.seed {
        Some(seed) => Box::new(SeededRandom::new(seed)),
        None => Box::new(ThreadRandom),
    };

    let mut engine = PersonalLoot::new(shared.clone())
        .with_diagnostics(diagnostics)
        .with_random(rng);

    let mut outcome = ReplayOutcome {
        settings,
        ..ReplayOutcome::default()
    };

    engine.on_game_start(true);
    for event in &script.events {
        replay_event(script, event, &mut engine, &shared, &mut outcome)?;
    }

    outcome.settings = shared.resolve();
    outcome.messages = lines.take();
    Ok(outcome)
}

fn replay_event(
    script: &BattleScript,
    event: &EventSpec,
    engine: &mut PersonalLoot,
    shared: &SharedSettings,
    outcome: &mut ReplayOutcome,
) -> Result<(), ScriptError> {
    let mut host = ScriptedHost::for_event(event);
    let mut roster = vanilla_roster(event);
    tracing::info!(event = event.id, steps = event.steps.len(), "Replaying event");

    engine.on_behavior_initialize(&host);

    for step in &event.steps {
        match step {
            Step::Kill {
                victim,
                killer,
                state,
            } => {
                let report = CasualtyReport {
                    victim: Some(snapshot(script, event, victim)?),
                    killer: Some(snapshot(script, event, killer)?),
                    state: *state,
                    blow: None,
                };
                let collected = engine.on_agent_removed(&host, &report);
                outcome.kills.push(KillOutcome {
                    event: event.id,
                    victim: victim.clone(),
                    killer: Some(killer.clone()),
                    state: *state,
                    collected,
                });
            }
            Step::Knockout { victim, killer } => {
                let collected = knock_out(script, event, engine, &host, victim, killer.as_deref())?;
                outcome.kills.push(KillOutcome {
                    event: event.id,
                    victim: victim.clone(),
                    killer: killer.clone(),
                    state: AgentState::Unconscious,
                    collected,
                });
            }
            Step::PlayerDown { killer } => {
                let player = script
                    .main_agent()
                    .ok_or(ScriptError::NoMainAgent { event: event.id })?;
                host.player_knocked_out = true;
                knock_out(script, event, engine, &host, &player.id, killer.as_deref())?;
            }
            Step::Loot { site, party } => {
                let party = party.map_or(MAIN_PARTY, PartyId);
                let mut other_roster;
                let target: &mut LootRoster = if party == MAIN_PARTY {
                    &mut roster
                } else {
                    other_roster = vanilla_roster(event);
                    &mut other_roster
                };
                let site = LootShareSite::from(*site);
                let report = engine.on_loot_roster(
                    &host,
                    site,
                    host.event,
                    Some(party),
                    Some(&mut *target),
                );
                outcome.loots.push(LootOutcome {
                    event: event.id,
                    site,
                    party,
                    report,
                    roster: target.elements().to_vec(),
                });
            }
            Step::ChangeSettings { set } => {
                let updated = apply_overrides(shared.resolve(), set)?;
                shared.set(updated);
                engine.on_settings_changed();
                tracing::info!(event = event.id, keys = set.len(), "Settings changed");
            }
        }
    }
    Ok(())
}

fn knock_out(
    script: &BattleScript,
    event: &EventSpec,
    engine: &mut PersonalLoot,
    host: &ScriptedHost,
    victim: &str,
    killer: Option<&str>,
) -> Result<usize, ScriptError> {
    let report = CasualtyReport {
        victim: Some(snapshot(script, event, victim)?),
        killer: killer.map(|k| snapshot(script, event, k)).transpose()?,
        state: AgentState::Unconscious,
        blow: None,
    };
    Ok(engine.on_agent_removed(host, &report))
}

fn snapshot(
    script: &BattleScript,
    event: &EventSpec,
    id: &str,
) -> Result<AgentSnapshot, ScriptError> {
    script
        .agent(id)
        .map(|agent| agent.snapshot())
        .ok_or_else(|| ScriptError::UnknownAgent {
            event: event.id,
            agent: id.to_string(),
        })
}

fn vanilla_roster(event: &EventSpec) -> LootRoster {
    let mut roster = LootRoster::new();
    for stack in &event.vanilla {
        roster.add_to_counts(&stack.item.to_equipped(), stack.count);
    }
    roster
}
