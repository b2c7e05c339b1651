//! Tests for the mission behavior facade, driven through host callbacks

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use kwyd_types::{AgentState, ItemType, LootSettings};

use crate::config::{SettingsProvider, SharedSettings};
use crate::diagnostics::{Diagnostics, MessageSink, SinkError};
use crate::host::{
    AgentSnapshot, CasualtyReport, CombatEventId, Equipment, EquipmentIndex, EquippedItem,
    FixedSequence, ItemRoster, KillingBlow, LootRoster, PartyId,
};
use crate::test_support::*;
use crate::tracker::{DeliveryReport, TrackerPhase};

use super::{LOADED_MESSAGE, LootShareSite, PersonalLoot};

const EVENT: u64 = 11;

struct Recorder {
    lines: Rc<RefCell<Vec<String>>>,
}

impl MessageSink for Recorder {
    fn display(&self, message: &str) -> Result<(), SinkError> {
        self.lines.borrow_mut().push(message.to_string());
        Ok(())
    }
}

/// Settings that change without announcing it.
struct SilentlyEdited {
    current: Cell<LootSettings>,
}

impl SettingsProvider for SilentlyEdited {
    fn settings(&self) -> Option<LootSettings> {
        Some(self.current.get())
    }
}

fn engine(settings: LootSettings) -> PersonalLoot {
    PersonalLoot::new(Rc::new(settings)).with_random(Box::new(FixedSequence::new([0.0])))
}

fn recording(provider: Rc<dyn SettingsProvider>) -> (PersonalLoot, Rc<RefCell<Vec<String>>>) {
    let lines = Rc::new(RefCell::new(Vec::new()));
    let engine = PersonalLoot::new(provider)
        .with_random(Box::new(FixedSequence::new([0.0])))
        .with_diagnostics(Diagnostics::new(Box::new(Recorder {
            lines: Rc::clone(&lines),
        })));
    (engine, lines)
}

fn casualty(victim: AgentSnapshot, killer: AgentSnapshot, state: AgentState) -> CasualtyReport {
    CasualtyReport {
        victim: Some(victim),
        killer: Some(killer),
        state,
        blow: None,
    }
}

fn killed_by(killer: AgentSnapshot) -> CasualtyReport {
    casualty(looter(), killer, AgentState::Killed)
}

fn grain() -> EquippedItem {
    item("grain", ItemType::Goods, 10, 0)
}

fn vanilla_roster() -> LootRoster {
    let mut roster = LootRoster::new();
    roster.add_to_counts(&grain(), 4);
    roster
}

fn loot(
    engine: &mut PersonalLoot,
    host: &FakeHost,
    site: LootShareSite,
    roster: &mut LootRoster,
) -> DeliveryReport {
    engine.on_loot_roster(host, site, host.map_event, Some(MAIN_PARTY), Some(roster))
}

// ═══════════════════════════════════════════════════════════════════════════
// Kills
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn player_kill_is_collected_and_delivered() {
    let host = FakeHost::in_battle(EVENT);
    let mut engine = engine(LootSettings::default());
    engine.on_behavior_initialize(&host);

    assert_eq!(engine.on_agent_removed(&host, &killed_by(player())), 2);

    let mut roster = vanilla_roster();
    let report = loot(&mut engine, &host, LootShareSite::PlayerLootShare, &mut roster);
    assert_eq!(report.delivered, 2);
    assert_eq!(roster.amount_of(&grain()), 4);
    assert_eq!(roster.amount_of(&sword(50)), 1);
    assert_eq!(engine.tracker().phase(), TrackerPhase::Idle);
}

#[test]
fn uncounted_companion_kill_records_nothing() {
    let host = FakeHost::in_battle(EVENT);
    let mut engine = engine(LootSettings {
        count_companions: false,
        ..LootSettings::default()
    });
    engine.on_behavior_initialize(&host);

    assert_eq!(engine.on_agent_removed(&host, &killed_by(companion())), 0);
    assert_eq!(engine.tracker().entry_count(), 0);
}

#[test]
fn counted_companion_kill_is_collected() {
    let host = FakeHost::in_battle(EVENT);
    let mut engine = engine(LootSettings {
        count_companions: true,
        ..LootSettings::default()
    });

    assert_eq!(engine.on_agent_removed(&host, &killed_by(companion())), 2);
}

#[test]
fn kills_outside_a_campaign_battle_are_ignored() {
    let mut engine = engine(LootSettings::default());

    let custom_battle = FakeHost {
        campaign: false,
        ..FakeHost::in_battle(EVENT)
    };
    assert_eq!(engine.on_agent_removed(&custom_battle, &killed_by(player())), 0);

    let no_event = FakeHost {
        map_event: None,
        ..FakeHost::in_battle(EVENT)
    };
    assert_eq!(engine.on_agent_removed(&no_event, &killed_by(player())), 0);
    assert_eq!(engine.tracker().phase(), TrackerPhase::Idle);
}

#[test]
fn removal_without_killer_is_a_no_op() {
    let host = FakeHost::in_battle(EVENT);
    let mut engine = engine(LootSettings::default());
    let report = CasualtyReport {
        victim: Some(looter()),
        state: AgentState::Killed,
        ..CasualtyReport::default()
    };

    assert_eq!(engine.on_agent_removed(&host, &report), 0);
    assert_eq!(engine.on_agent_removed(&host, &CasualtyReport::default()), 0);
}

#[test]
fn killing_blow_does_not_change_the_verdict() {
    let host = FakeHost::in_battle(EVENT);
    let mut engine = engine(LootSettings::default());
    let arrow = CasualtyReport {
        blow: Some(KillingBlow {
            inflicted_damage: 87,
            is_missile: true,
        }),
        ..killed_by(player())
    };
    assert_eq!(engine.on_agent_removed(&host, &arrow), 2);

    let stray = CasualtyReport {
        blow: Some(KillingBlow::default()),
        ..killed_by(enemy_lord())
    };
    assert_eq!(engine.on_agent_removed(&host, &stray), 0);
}

#[test]
fn routed_agents_are_not_casualties() {
    let host = FakeHost::in_battle(EVENT);
    let mut engine = engine(LootSettings::default());
    let report = casualty(looter(), player(), AgentState::Routed);
    assert_eq!(engine.on_agent_removed(&host, &report), 0);
}

// ═══════════════════════════════════════════════════════════════════════════
// Knockouts
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn player_knockout_forfeits_the_battle_loot() {
    let mut host = FakeHost::in_battle(EVENT);
    let mut engine = engine(LootSettings::default());
    engine.on_behavior_initialize(&host);
    assert_eq!(engine.on_agent_removed(&host, &killed_by(player())), 2);

    engine.on_agent_removed(&host, &casualty(player(), looter(), AgentState::Unconscious));
    assert!(engine.tracker().is_player_knocked_out());

    host.player_knocked_out = true;
    assert_eq!(engine.on_agent_removed(&host, &killed_by(player())), 0);

    let mut roster = vanilla_roster();
    let report = loot(&mut engine, &host, LootShareSite::PlayerLootShare, &mut roster);
    assert_eq!(report.delivered, 0);
    assert_eq!(roster.entry_count(), 1);
}

#[test]
fn unattributed_player_knockout_keeps_the_battle_loot() {
    let host = FakeHost::in_battle(EVENT);
    let mut engine = engine(LootSettings::default());
    engine.on_behavior_initialize(&host);
    assert_eq!(engine.on_agent_removed(&host, &killed_by(player())), 2);

    let fall = CasualtyReport {
        victim: Some(player()),
        state: AgentState::Unconscious,
        ..CasualtyReport::default()
    };
    assert_eq!(engine.on_agent_removed(&host, &fall), 0);
    assert!(!engine.tracker().is_player_knocked_out());

    let mut roster = LootRoster::new();
    let report = loot(&mut engine, &host, LootShareSite::PlayerLootShare, &mut roster);
    assert_eq!(report.delivered, 2);
}

#[test]
fn unattributed_companion_knockout_is_not_tracked() {
    let host = FakeHost::in_battle(EVENT);
    let mut engine = engine(LootSettings::default());
    engine.on_behavior_initialize(&host);

    let fall = CasualtyReport {
        victim: Some(companion()),
        state: AgentState::Unconscious,
        ..CasualtyReport::default()
    };
    engine.on_agent_removed(&host, &fall);
    assert!(!engine.tracker().is_hero_knocked_out(COMPANION));
}

#[test]
fn knocked_out_companion_loses_earlier_kills() {
    let host = FakeHost::in_battle(EVENT);
    let mut engine = engine(LootSettings {
        count_companions: true,
        ..LootSettings::default()
    });
    assert_eq!(engine.on_agent_removed(&host, &killed_by(companion())), 2);
    assert_eq!(engine.on_agent_removed(&host, &killed_by(player())), 2);

    engine.on_agent_removed(&host, &casualty(companion(), looter(), AgentState::Unconscious));
    assert!(engine.tracker().is_hero_knocked_out(COMPANION));

    let mut roster = LootRoster::new();
    let report = loot(&mut engine, &host, LootShareSite::PlayerLootShare, &mut roster);
    assert_eq!(report.delivered, 2);
}

// ═══════════════════════════════════════════════════════════════════════════
// Loot Roster Hooks
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn both_hook_sites_deliver_once_and_clear_vanilla_once() {
    let host = FakeHost::in_battle(EVENT);
    let mut engine = engine(LootSettings {
        remove_vanilla_item_loot: true,
        ..LootSettings::default()
    });
    engine.on_behavior_initialize(&host);
    engine.on_agent_removed(&host, &killed_by(player()));

    let mut roster = vanilla_roster();
    let first = loot(&mut engine, &host, LootShareSite::PlayerLootShare, &mut roster);
    let second = loot(&mut engine, &host, LootShareSite::ReceivingLootShare, &mut roster);

    assert!(first.cleared_vanilla);
    assert_eq!(first.delivered, 2);
    assert_eq!(second, DeliveryReport::default());
    assert_eq!(roster.amount_of(&grain()), 0);
    assert_eq!(roster.amount_of(&sword(50)), 1);
    assert_eq!(roster.amount_of(&shield(10)), 1);
}

#[test]
fn other_parties_are_left_untouched() {
    let host = FakeHost::in_battle(EVENT);
    let mut engine = engine(LootSettings {
        remove_vanilla_item_loot: true,
        ..LootSettings::default()
    });
    engine.on_agent_removed(&host, &killed_by(player()));

    let mut roster = vanilla_roster();
    let report = engine.on_loot_roster(
        &host,
        LootShareSite::ReceivingLootShare,
        host.map_event,
        Some(PartyId(4242)),
        Some(&mut roster),
    );
    assert_eq!(report, DeliveryReport::default());
    assert_eq!(roster.amount_of(&grain()), 4);
    assert_eq!(roster.entry_count(), 1);

    // The player's own share is still waiting
    assert_eq!(engine.tracker().entry_count(), 2);
}

#[test]
fn missing_party_or_roster_is_ignored() {
    let host = FakeHost::in_battle(EVENT);
    let mut engine = engine(LootSettings::default());
    engine.on_agent_removed(&host, &killed_by(player()));

    let mut roster = LootRoster::new();
    let report = engine.on_loot_roster(
        &host,
        LootShareSite::PlayerLootShare,
        host.map_event,
        None,
        Some(&mut roster),
    );
    assert_eq!(report, DeliveryReport::default());
    let report = engine.on_loot_roster(
        &host,
        LootShareSite::PlayerLootShare,
        host.map_event,
        Some(MAIN_PARTY),
        None,
    );
    assert_eq!(report, DeliveryReport::default());
    assert_eq!(engine.tracker().entry_count(), 2);
}

#[test]
fn loot_of_a_previous_battle_is_never_delivered() {
    let first = FakeHost::in_battle(EVENT);
    let second = FakeHost::in_battle(EVENT + 1);
    let mut engine = engine(LootSettings::default());
    engine.on_behavior_initialize(&first);
    engine.on_agent_removed(&first, &killed_by(player()));

    engine.on_behavior_initialize(&second);

    let mut roster = LootRoster::new();
    let report = engine.on_loot_roster(
        &second,
        LootShareSite::PlayerLootShare,
        Some(CombatEventId(EVENT)),
        Some(MAIN_PARTY),
        Some(&mut roster),
    );
    assert_eq!(report.delivered, 0);
    assert!(roster.is_empty());
}

struct BrokenRoster;

impl ItemRoster for BrokenRoster {
    fn clear(&mut self) {}

    fn add_to_counts(&mut self, _item: &EquippedItem, _count: i32) {
        panic!("roster is read-only");
    }

    fn entry_count(&self) -> usize {
        0
    }
}

#[test]
fn panicking_roster_does_not_escape_the_hook() {
    let host = FakeHost::in_battle(EVENT);
    let mut engine = engine(LootSettings::default());
    engine.on_agent_removed(&host, &killed_by(player()));

    let mut roster = BrokenRoster;
    let report = engine.on_loot_roster(
        &host,
        LootShareSite::PlayerLootShare,
        host.map_event,
        Some(MAIN_PARTY),
        Some(&mut roster),
    );
    assert_eq!(report, DeliveryReport::default());
}

// ═══════════════════════════════════════════════════════════════════════════
// In-Game Messages
// ═══════════════════════════════════════════════════════════════════════════

fn logging_enabled() -> LootSettings {
    LootSettings {
        enable_in_game_logging: true,
        ..LootSettings::default()
    }
}

#[test]
fn loaded_message_is_shown_once_per_session() {
    let (mut engine, lines) = recording(Rc::new(logging_enabled()));

    engine.on_game_start(false);
    assert!(lines.borrow().is_empty());

    engine.on_game_start(true);
    engine.on_game_start(true);
    assert_eq!(lines.borrow().as_slice(), [format!("[KWYD] {LOADED_MESSAGE}")]);
}

struct TornDownLog;

impl MessageSink for TornDownLog {
    fn display(&self, _message: &str) -> Result<(), SinkError> {
        panic!("message log torn down");
    }
}

#[test]
fn panicking_message_log_does_not_escape_callbacks() {
    let host = FakeHost::in_battle(EVENT);
    let mut engine = PersonalLoot::new(Rc::new(logging_enabled()))
        .with_random(Box::new(FixedSequence::new([0.0])))
        .with_diagnostics(Diagnostics::new(Box::new(TornDownLog)).with_debug_messages(true));

    engine.on_game_start(true);
    engine.on_behavior_initialize(&host);
    assert_eq!(engine.on_agent_removed(&host, &killed_by(player())), 2);

    let mut roster = LootRoster::new();
    let report = loot(&mut engine, &host, LootShareSite::PlayerLootShare, &mut roster);
    assert_eq!(report.delivered, 2);
}

#[test]
fn logging_flag_refreshes_only_on_settings_change() {
    let provider = Rc::new(SilentlyEdited {
        current: Cell::new(LootSettings::default()),
    });
    let (mut engine, lines) = recording(provider.clone());
    let host = FakeHost::in_battle(EVENT);
    engine.on_behavior_initialize(&host);

    provider.current.set(logging_enabled());
    engine.on_agent_removed(&host, &killed_by(player()));
    assert!(lines.borrow().is_empty());

    engine.on_settings_changed();
    engine.on_agent_removed(&host, &killed_by(player()));
    assert_eq!(
        lines.borrow().as_slice(),
        ["[KWYD] Recorded kill on Looter; collected 2 equipped items."]
    );
}

#[test]
fn generation_bump_counts_as_settings_change() {
    let shared = Rc::new(SharedSettings::new(LootSettings::default()));
    let (mut engine, lines) = recording(shared.clone());
    let host = FakeHost::in_battle(EVENT);
    engine.on_behavior_initialize(&host);

    shared.update(|s| s.enable_in_game_logging = true);
    engine.on_agent_removed(&host, &killed_by(player()));
    assert_eq!(lines.borrow().len(), 1);
}

#[test]
fn settings_edits_apply_to_the_next_kill() {
    let shared = Rc::new(SharedSettings::new(LootSettings::default()));
    let mut engine = PersonalLoot::new(shared.clone());
    let host = FakeHost::in_battle(EVENT);

    assert_eq!(engine.on_agent_removed(&host, &killed_by(player())), 2);
    shared.update(|s| s.include_shields = false);
    assert_eq!(engine.on_agent_removed(&host, &killed_by(player())), 1);
    assert!(!engine.settings().include_shields);
}

#[test]
fn unavailable_settings_fall_back_to_defaults() {
    let mut engine = PersonalLoot::new(Rc::new(SharedSettings::unavailable()));
    let host = FakeHost::in_battle(EVENT);
    assert_eq!(engine.on_agent_removed(&host, &killed_by(player())), 2);
}

#[test]
fn unavailable_settings_keep_gear_of_any_value() {
    let shared = Rc::new(SharedSettings::unavailable());
    let mut engine = PersonalLoot::new(shared.clone());
    let host = FakeHost::in_battle(EVENT);
    let crown = item("crown", ItemType::HeadArmor, 2_000_000, 6);
    let wearer = enemy_with(2, Equipment::new().with(EquipmentIndex::Head, crown));
    let kill = casualty(wearer, player(), AgentState::Killed);

    assert_eq!(engine.on_agent_removed(&host, &kill), 1);

    shared.set(LootSettings::default());
    assert_eq!(engine.on_agent_removed(&host, &kill), 0);
}
